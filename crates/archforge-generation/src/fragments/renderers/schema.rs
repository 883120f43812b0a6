//! `Schema` declarations

use crate::{
    context::TemplateContext,
    fragments::{
        buffer::{quote, CodeBuffer},
        config::{FragmentConfig, SchemaConfig, SchemaKind},
        error::FragmentError,
        renderers::{ensure_unique, identifier, structural},
    },
    templates::definition::ImportSpec,
};

/// Registered fragment type
pub const FRAGMENT_TYPE: &str = "validated-schema";

/// Imports every schema needs
pub fn required_imports() -> Vec<ImportSpec> {
    vec![ImportSpec::named("effect", ["Schema"])]
}

/// Registry entry point
pub fn render_fragment(
    buffer: &mut CodeBuffer,
    config: &FragmentConfig,
    context: &TemplateContext,
) -> Result<(), FragmentError> {
    match config {
        FragmentConfig::ValidatedSchema(config) => render(buffer, config, context),
        other => Err(FragmentError::ConfigMismatch {
            fragment_type: FRAGMENT_TYPE.to_string(),
            found: other.shape(),
        }),
    }
}

/// Render a struct, tagged struct or class schema
pub fn render(
    buffer: &mut CodeBuffer,
    config: &SchemaConfig,
    context: &TemplateContext,
) -> Result<(), FragmentError> {
    let name = identifier(FRAGMENT_TYPE, "schema name", &config.name, context)?;

    if config.kind == SchemaKind::Class && (config.brand.is_some() || config.type_alias.is_some()) {
        return Err(FragmentError::invalid(
            FRAGMENT_TYPE,
            format!("class schema '{}' cannot carry a brand or type alias", name),
        ));
    }

    let fields = config
        .fields
        .iter()
        .map(|f| {
            let field_name = identifier(FRAGMENT_TYPE, "field name", &f.name, context)?;
            let schema = structural(&f.schema, context)?;
            let expr = if f.optional {
                format!("Schema.optional({})", schema)
            } else {
                schema
            };
            Ok((field_name, expr))
        })
        .collect::<Result<Vec<_>, FragmentError>>()?;
    ensure_unique(FRAGMENT_TYPE, "field", fields.iter().map(|(n, _)| n.as_str()))?;

    let annotations = config
        .annotations
        .iter()
        .map(|a| {
            Ok(format!(
                "{}: {}",
                identifier(FRAGMENT_TYPE, "annotation key", &a.key, context)?,
                quote(&structural(&a.value, context)?)
            ))
        })
        .collect::<Result<Vec<_>, FragmentError>>()?;

    let tag = match &config.tag {
        Some(tag) => structural(tag, context)?,
        None => name.clone(),
    };

    if let Some(doc) = &config.doc {
        buffer.doc_block(&structural(doc, context)?);
    }

    let open = match config.kind {
        SchemaKind::Struct => format!("export const {} = Schema.Struct({{", name),
        SchemaKind::TaggedStruct => {
            format!("export const {} = Schema.TaggedStruct({}, {{", name, quote(&tag))
        }
        SchemaKind::Class => format!(
            "export class {} extends Schema.Class<{}>({})({{",
            name,
            name,
            quote(&tag)
        ),
    };

    let brand = config
        .brand
        .as_deref()
        .map(|b| structural(b, context))
        .transpose()?;
    let close = close_suffix(config.kind, &annotations, brand.as_deref());

    if fields.is_empty() {
        buffer.line(format!("{}}}{}", open, close));
    } else {
        buffer.line(open);
        buffer.indented(|b| {
            for (field_name, expr) in &fields {
                b.line(format!("{}: {},", field_name, expr));
            }
            Ok::<(), FragmentError>(())
        })?;
        buffer.line(format!("}}{}", close));
    }

    if let Some(alias) = &config.type_alias {
        let alias = identifier(FRAGMENT_TYPE, "type alias", alias, context)?;
        buffer.blank_line();
        buffer.line(format!("export type {} = typeof {}.Type", alias, name));
    }
    Ok(())
}

/// Text after the closing `}` of the field record
fn close_suffix(kind: SchemaKind, annotations: &[String], brand: Option<&str>) -> String {
    let annotation_arg = (!annotations.is_empty()).then(|| format!("{{ {} }}", annotations.join(", ")));
    if kind == SchemaKind::Class {
        return match annotation_arg {
            Some(arg) => format!(", {}) {{}}", arg),
            None => ") {}".to_string(),
        };
    }

    let mut pipes = Vec::new();
    if let Some(brand) = brand {
        pipes.push(format!("Schema.brand({})", quote(brand)));
    }
    if let Some(arg) = annotation_arg {
        pipes.push(format!("Schema.annotations({})", arg));
    }
    if pipes.is_empty() {
        ")".to_string()
    } else {
        format!(").pipe({})", pipes.join(", "))
    }
}
