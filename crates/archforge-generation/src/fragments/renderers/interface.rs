//! Plain `interface` declarations

use crate::{
    context::TemplateContext,
    fragments::{
        buffer::CodeBuffer,
        error::FragmentError,
        renderers::{ensure_unique, identifier, property, structural},
    },
    templates::definition::InterfaceShape,
};

const KIND: &str = "interface";

/// Render `export interface Name { ... }`
pub fn render(
    buffer: &mut CodeBuffer,
    shape: &InterfaceShape,
    context: &TemplateContext,
) -> Result<(), FragmentError> {
    let name = identifier(KIND, "interface name", &shape.name, context)?;
    let fields = shape
        .fields
        .iter()
        .map(|f| Ok((identifier(KIND, "field name", &f.name, context)?, f)))
        .collect::<Result<Vec<_>, FragmentError>>()?;
    ensure_unique(KIND, "field", fields.iter().map(|(n, _)| n.as_str()))?;

    if let Some(doc) = &shape.doc {
        buffer.doc(&structural(doc, context)?);
    }
    if fields.is_empty() {
        buffer.line(format!("export interface {} {{}}", name));
        return Ok(());
    }
    buffer.block(&format!("export interface {} {{", name), "}", |b| {
        for (field_name, field) in &fields {
            if let Some(doc) = &field.doc {
                b.doc(&structural(doc, context)?);
            }
            b.line(property(
                field.readonly,
                field_name,
                field.optional,
                &structural(&field.ty, context)?,
            ));
        }
        Ok::<(), FragmentError>(())
    })
}
