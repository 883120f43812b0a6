//! Placeholder interpolation
//!
//! Placeholders use a single-brace form, `{name}`, where `name` matches
//! `[A-Za-z_][A-Za-z0-9_]*`. A brace preceded by `$` belongs to the target
//! language's template literals (`${expr}`) and is never substituted, so example
//! code embedded in raw sections survives untouched.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::{context::TemplateContext, templates::error::InterpolationError};

/// Matches `{name}` with an optional leading `$` captured in group 1
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\$?)\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Placeholder name of a capture, or `None` for runtime `${...}` syntax
fn placeholder_name<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    let dollar = caps.get(1).map_or(0, |m| m.len());
    if dollar > 0 {
        return None;
    }
    caps.get(2).map(|m| m.as_str())
}

/// Cheap check for whether `text` contains at least one placeholder
pub fn has_interpolation(text: &str) -> bool {
    text.contains('{') && PLACEHOLDER.captures_iter(text).any(|c| placeholder_name(&c).is_some())
}

/// Every placeholder name referenced by `text`
pub fn extract_variables(text: &str) -> BTreeSet<String> {
    if !text.contains('{') {
        return BTreeSet::new();
    }
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|c| placeholder_name(&c).map(str::to_string))
        .collect()
}

/// Substitute every placeholder in `text`
///
/// Fails with an [`InterpolationError`] listing every unresolved name, not just
/// the first one.
pub fn interpolate(text: &str, context: &TemplateContext) -> Result<String, InterpolationError> {
    let mut missing = Vec::new();
    let rendered = substitute(text, context, &mut missing);
    if missing.is_empty() {
        Ok(rendered)
    } else {
        Err(InterpolationError::new(missing))
    }
}

/// Substitute placeholders in every string leaf of a JSON value
///
/// Objects and arrays are walked recursively; non-string leaves are returned
/// unchanged. Missing names are collected across the whole tree.
pub fn interpolate_deep(value: &Value, context: &TemplateContext) -> Result<Value, InterpolationError> {
    let mut missing = Vec::new();
    let rendered = substitute_value(value, context, &mut missing);
    if missing.is_empty() {
        Ok(rendered)
    } else {
        Err(InterpolationError::new(missing))
    }
}

fn substitute(text: &str, context: &TemplateContext, missing: &mut Vec<String>) -> String {
    if !text.contains('{') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), placeholder_name(&caps)) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        match context.scalar(name) {
            Some(value) => out.push_str(&value),
            None => {
                missing.push(name.to_string());
                out.push_str(whole.as_str());
            }
        }
        last = whole.end();
    }
    out.push_str(&text[last..]);
    out
}

fn substitute_value(value: &Value, context: &TemplateContext, missing: &mut Vec<String>) -> Value {
    match value {
        Value::String(s) => Value::String(substitute(s, context, missing)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| substitute_value(item, context, missing))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute_value(v, context, missing)))
                .collect::<Map<String, Value>>(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ctx() -> TemplateContext {
        TemplateContext::from_pairs([
            ("className", json!("User")),
            ("propertyName", json!("user")),
            ("enabled", json!(true)),
            ("retries", json!(3)),
            ("nested", json!({"a": 1})),
        ])
    }

    #[test]
    fn test_interpolate_simple() {
        let result = interpolate("export class {className}Service {}", &ctx()).unwrap();
        assert_eq!(result, "export class UserService {}");
    }

    #[test]
    fn test_interpolate_scalars() {
        let result = interpolate("{enabled}:{retries}", &ctx()).unwrap();
        assert_eq!(result, "true:3");
    }

    #[test]
    fn test_runtime_template_literal_untouched() {
        let text = "`User ${propertyName} not found: ${id}` for {className}";
        let result = interpolate(text, &ctx()).unwrap();
        assert_eq!(result, "`User ${propertyName} not found: ${id}` for User");
    }

    #[test]
    fn test_object_literals_untouched() {
        let text = "return { id, name: {className} }";
        assert_eq!(interpolate(text, &ctx()).unwrap(), "return { id, name: User }");
    }

    #[test]
    fn test_collects_every_missing_name() {
        let err = interpolate("{b} {a} {className} {b} {nested}", &ctx()).unwrap_err();
        assert_eq!(err.missing, vec!["a", "b", "nested"]);
    }

    #[test]
    fn test_extract_variables() {
        let vars = extract_variables("{className} ${skip} {propertyName} {className} { spaced }");
        let expected: BTreeSet<String> = ["className", "propertyName"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(vars, expected);
    }

    #[test]
    fn test_has_interpolation() {
        assert!(has_interpolation("{className}"));
        assert!(!has_interpolation("${className}"));
        assert!(!has_interpolation("no braces"));
        assert!(!has_interpolation("{ not a placeholder }"));
    }

    #[test]
    fn test_interpolate_deep() {
        let value = json!({
            "title": "{className} errors",
            "items": ["{propertyName}", 1, false, null],
            "inner": {"deep": "${raw} {className}"}
        });
        let result = interpolate_deep(&value, &ctx()).unwrap();
        assert_eq!(
            result,
            json!({
                "title": "User errors",
                "items": ["user", 1, false, null],
                "inner": {"deep": "${raw} User"}
            })
        );
    }

    #[test]
    fn test_interpolate_deep_collects_missing() {
        let value = json!({"a": "{x}", "b": ["{y}", {"c": "{x}"}]});
        let err = interpolate_deep(&value, &ctx()).unwrap_err();
        assert_eq!(err.missing, vec!["x", "y"]);
    }
}
