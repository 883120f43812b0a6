//! Environment layers

use crate::{
    context::TemplateContext,
    fragments::{
        buffer::CodeBuffer,
        config::{FragmentConfig, LayerConfig},
        error::FragmentError,
        renderers::{identifier, structural},
    },
    templates::definition::ImportSpec,
};

/// Registered fragment type
pub const FRAGMENT_TYPE: &str = "layer";

/// Imports every layer needs
pub fn required_imports() -> Vec<ImportSpec> {
    vec![ImportSpec::named("effect", ["Layer"])]
}

/// Registry entry point
pub fn render_fragment(
    buffer: &mut CodeBuffer,
    config: &FragmentConfig,
    context: &TemplateContext,
) -> Result<(), FragmentError> {
    match config {
        FragmentConfig::Layer(config) => render(buffer, config, context),
        other => Err(FragmentError::ConfigMismatch {
            fragment_type: FRAGMENT_TYPE.to_string(),
            found: other.shape(),
        }),
    }
}

/// Render `export const Name = Layer.<kind>(Target, impl)` with optional provides
pub fn render(
    buffer: &mut CodeBuffer,
    config: &LayerConfig,
    context: &TemplateContext,
) -> Result<(), FragmentError> {
    let name = identifier(FRAGMENT_TYPE, "layer name", &config.name, context)?;
    let target = identifier(FRAGMENT_TYPE, "target", &config.target, context)?;
    if config.implementation.trim().is_empty() {
        return Err(FragmentError::invalid(
            FRAGMENT_TYPE,
            format!("layer '{}' has no implementation", name),
        ));
    }
    let provides = config
        .provides
        .iter()
        .map(|p| identifier(FRAGMENT_TYPE, "provided layer", p, context))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(doc) = &config.doc {
        buffer.doc(&structural(doc, context)?);
    }

    buffer.line(format!(
        "export const {} = Layer.{}(",
        name,
        config.kind.constructor()
    ));
    buffer.indented(|b| {
        b.line(format!("{},", target));
        b.lines(&config.implementation);
        Ok::<(), FragmentError>(())
    })?;

    match provides.as_slice() {
        [] => buffer.line(")"),
        [single] => buffer.line(format!(").pipe(Layer.provide({}))", single)),
        many => buffer.line(format!(
            ").pipe(Layer.provide(Layer.mergeAll({})))",
            many.join(", ")
        )),
    };
    Ok(())
}
