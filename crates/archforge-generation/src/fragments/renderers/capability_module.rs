//! `Context.Tag` capability modules

use crate::{
    context::TemplateContext,
    fragments::{
        buffer::{quote, CodeBuffer},
        config::{CapabilityModuleConfig, FragmentConfig},
        error::FragmentError,
        renderers::{ensure_unique, identifier, param_list, structural},
    },
    templates::definition::ImportSpec,
};

/// Registered fragment type
pub const FRAGMENT_TYPE: &str = "capability-module";

/// Imports every capability module needs
pub fn required_imports() -> Vec<ImportSpec> {
    vec![ImportSpec::named("effect", ["Context", "Effect", "Layer"])]
}

/// Registry entry point
pub fn render_fragment(
    buffer: &mut CodeBuffer,
    config: &FragmentConfig,
    context: &TemplateContext,
) -> Result<(), FragmentError> {
    match config {
        FragmentConfig::CapabilityModule(config) => render(buffer, config, context),
        other => Err(FragmentError::ConfigMismatch {
            fragment_type: FRAGMENT_TYPE.to_string(),
            found: other.shape(),
        }),
    }
}

/// Render a service tag class with its method record and environment members
pub fn render(
    buffer: &mut CodeBuffer,
    config: &CapabilityModuleConfig,
    context: &TemplateContext,
) -> Result<(), FragmentError> {
    let name = identifier(FRAGMENT_TYPE, "service name", &config.name, context)?;
    let tag = match &config.tag {
        Some(tag) => identifier(FRAGMENT_TYPE, "tag", tag, context)?,
        None => name.clone(),
    };

    let mut methods = Vec::with_capacity(config.methods.len());
    for method in &config.methods {
        let method_name = identifier(FRAGMENT_TYPE, "method name", &method.name, context)?;
        let doc = method
            .doc
            .as_deref()
            .map(|d| structural(d, context))
            .transpose()?;
        let signature = format!(
            "readonly {}: ({}) => {}",
            method_name,
            param_list(&method.params, context)?,
            structural(&method.returns, context)?
        );
        methods.push((method_name, doc, signature));
    }
    ensure_unique(FRAGMENT_TYPE, "method", methods.iter().map(|(n, _, _)| n.as_str()))?;

    let environments = config
        .environments
        .iter()
        .map(|env| {
            Ok((
                identifier(FRAGMENT_TYPE, "environment", &env.name, context)?,
                env.implementation.as_str(),
            ))
        })
        .collect::<Result<Vec<_>, FragmentError>>()?;
    ensure_unique(FRAGMENT_TYPE, "environment", environments.iter().map(|(n, _)| n.as_str()))?;

    if let Some(doc) = &config.doc {
        buffer.doc_block(&structural(doc, context)?);
    }

    buffer.line(format!(
        "export class {} extends Context.Tag({})<",
        name,
        quote(&tag)
    ));
    buffer.indented(|b| {
        b.line(format!("{},", name));
        if methods.is_empty() {
            b.line("{}");
            return Ok::<(), FragmentError>(());
        }
        b.block("{", "}", |inner| {
            for (_, doc, signature) in &methods {
                if let Some(doc) = doc {
                    inner.doc(doc);
                }
                inner.line(signature);
            }
            Ok(())
        })
    })?;

    if environments.is_empty() {
        buffer.line(">() {}");
        return Ok(());
    }

    buffer.block(">() {", "}", |b| {
        for (index, (env_name, implementation)) in environments.iter().enumerate() {
            if index > 0 {
                b.blank_line();
            }
            b.assignment(&format!("static readonly {} = ", env_name), implementation);
        }
        Ok(())
    })
}
