//! Built-in structural renderers
//!
//! Each renderer interpolates names, types and parameter lists, and copies
//! bodies and implementation expressions through untouched.

pub mod capability_module;
pub mod interface;
pub mod layer;
pub mod schema;
pub mod tagged_error;

use std::collections::HashSet;

use crate::{
    context::TemplateContext,
    fragments::{config::Param, error::FragmentError},
    templates::interpolation::interpolate,
};

/// Interpolate a structural string
pub(crate) fn structural(text: &str, context: &TemplateContext) -> Result<String, FragmentError> {
    Ok(interpolate(text, context)?)
}

/// Interpolate an identifier and reject empty or whitespace-bearing results
pub(crate) fn identifier(
    fragment_type: &str,
    what: &str,
    text: &str,
    context: &TemplateContext,
) -> Result<String, FragmentError> {
    let value = structural(text, context)?;
    if value.is_empty() {
        return Err(FragmentError::invalid(fragment_type, format!("{} must not be empty", what)));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(FragmentError::invalid(
            fragment_type,
            format!("{} '{}' must not contain whitespace", what, value),
        ));
    }
    Ok(value)
}

/// Render `a: A, b: B`
pub(crate) fn param_list(params: &[Param], context: &TemplateContext) -> Result<String, FragmentError> {
    let rendered = params
        .iter()
        .map(|p| Ok(format!("{}: {}", structural(&p.name, context)?, structural(&p.ty, context)?)))
        .collect::<Result<Vec<_>, FragmentError>>()?;
    Ok(rendered.join(", "))
}

/// Fail on the first repeated name
pub(crate) fn ensure_unique<'a>(
    fragment_type: &str,
    what: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), FragmentError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(FragmentError::invalid(
                fragment_type,
                format!("duplicate {} '{}'", what, name),
            ));
        }
    }
    Ok(())
}

/// `readonly name?: type`
pub(crate) fn property(readonly: bool, name: &str, optional: bool, ty: &str) -> String {
    format!(
        "{}{}{}: {}",
        if readonly { "readonly " } else { "" },
        name,
        if optional { "?" } else { "" },
        ty
    )
}
