//! `Data.TaggedError` classes

use crate::{
    context::TemplateContext,
    fragments::{
        buffer::{quote, CodeBuffer},
        config::{FragmentConfig, TaggedErrorConfig},
        error::FragmentError,
        renderers::{ensure_unique, identifier, param_list, property, structural},
    },
    templates::definition::ImportSpec,
};

/// Registered fragment type
pub const FRAGMENT_TYPE: &str = "tagged-error";

/// Imports every tagged error needs
pub fn required_imports() -> Vec<ImportSpec> {
    vec![ImportSpec::named("effect", ["Data"])]
}

/// Registry entry point
pub fn render_fragment(
    buffer: &mut CodeBuffer,
    config: &FragmentConfig,
    context: &TemplateContext,
) -> Result<(), FragmentError> {
    match config {
        FragmentConfig::TaggedError(config) => render(buffer, config, context),
        other => Err(FragmentError::ConfigMismatch {
            fragment_type: FRAGMENT_TYPE.to_string(),
            found: other.shape(),
        }),
    }
}

/// Render a tagged error class
///
/// ```text
/// export class UserNotFoundError extends Data.TaggedError("UserNotFoundError")<{
///   readonly userId: string
/// }> {
///   static create(...) {
///     <body>
///   }
/// }
/// ```
pub fn render(
    buffer: &mut CodeBuffer,
    config: &TaggedErrorConfig,
    context: &TemplateContext,
) -> Result<(), FragmentError> {
    let class_name = identifier(FRAGMENT_TYPE, "class name", &config.class_name, context)?;
    let tag = match &config.tag {
        Some(tag) => identifier(FRAGMENT_TYPE, "tag", tag, context)?,
        None => class_name.clone(),
    };

    let fields = config
        .fields
        .iter()
        .map(|f| {
            Ok((
                identifier(FRAGMENT_TYPE, "field name", &f.name, context)?,
                f,
            ))
        })
        .collect::<Result<Vec<_>, FragmentError>>()?;
    ensure_unique(FRAGMENT_TYPE, "field", fields.iter().map(|(n, _)| n.as_str()))?;

    let methods = config
        .static_methods
        .iter()
        .map(|m| Ok((identifier(FRAGMENT_TYPE, "method name", &m.name, context)?, m)))
        .collect::<Result<Vec<_>, FragmentError>>()?;
    ensure_unique(FRAGMENT_TYPE, "static method", methods.iter().map(|(n, _)| n.as_str()))?;

    if let Some(doc) = &config.doc {
        buffer.doc_block(&structural(doc, context)?);
    }

    buffer.line(format!(
        "export class {} extends Data.TaggedError({})<{{",
        class_name,
        quote(&tag)
    ));
    buffer.indented(|b| {
        for (name, field) in &fields {
            if let Some(doc) = &field.doc {
                b.doc(&structural(doc, context)?);
            }
            b.line(property(
                field.readonly,
                name,
                field.optional,
                &structural(&field.ty, context)?,
            ));
        }
        Ok::<(), FragmentError>(())
    })?;

    if methods.is_empty() {
        buffer.line("}> {}");
        return Ok(());
    }

    buffer.line("}> {");
    buffer.indented(|b| {
        for (index, (name, method)) in methods.iter().enumerate() {
            if index > 0 {
                b.blank_line();
            }
            if let Some(doc) = &method.doc {
                b.doc(&structural(doc, context)?);
            }
            let returns = match &method.returns {
                Some(ty) => format!(": {}", structural(ty, context)?),
                None => String::new(),
            };
            b.line(format!(
                "static {}({}){} {{",
                name,
                param_list(&method.params, context)?,
                returns
            ));
            b.indented(|inner| {
                inner.lines(&method.body);
                Ok::<(), FragmentError>(())
            })?;
            b.line("}");
        }
        Ok::<(), FragmentError>(())
    })?;
    buffer.line("}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fragments::config::{FieldSpec, Param, StaticMethod};

    fn ctx() -> TemplateContext {
        TemplateContext::from_pairs([("className", json!("User")), ("propertyName", json!("user"))])
    }

    fn not_found() -> TaggedErrorConfig {
        TaggedErrorConfig {
            class_name: "{className}NotFoundError".to_string(),
            doc: Some("Raised when a {className} does not exist".to_string()),
            fields: vec![
                FieldSpec::new("{propertyName}Id", "string"),
                FieldSpec::new("message", "string").optional(),
            ],
            static_methods: vec![StaticMethod::new(
                "create",
                vec![Param::new("{propertyName}Id", "string")],
                "return new this({ userId, message: `User ${userId} not found` })",
            )],
            ..Default::default()
        }
    }

    #[test]
    fn test_render_not_found_error() {
        let mut buf = CodeBuffer::new();
        render(&mut buf, &not_found(), &ctx()).unwrap();
        let out = buf.finish();
        assert_eq!(
            out,
            [
                "/**",
                " * Raised when a User does not exist",
                " */",
                "export class UserNotFoundError extends Data.TaggedError(\"UserNotFoundError\")<{",
                "  readonly userId: string",
                "  readonly message?: string",
                "}> {",
                "  static create(userId: string) {",
                "    return new this({ userId, message: `User ${userId} not found` })",
                "  }",
                "}",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_body_is_emitted_verbatim() {
        let mut config = not_found();
        config.static_methods[0].body = "return `{className} ${ {className} }`".to_string();
        let mut buf = CodeBuffer::new();
        render(&mut buf, &config, &ctx()).unwrap();
        assert!(buf.finish().contains("return `{className} ${ {className} }`"));
    }

    #[test]
    fn test_multiline_literal_body_keeps_its_bytes() {
        let mut config = not_found();
        config.static_methods[0].body =
            "const s = `a  \nb`\nreturn new this({ userId, message: `line one\nline two` })".to_string();
        let mut buf = CodeBuffer::new();
        render(&mut buf, &config, &ctx()).unwrap();
        let out = buf.finish();
        assert!(out.contains("    const s = `a  \nb`\n"), "{}", out);
        assert!(
            out.contains("    return new this({ userId, message: `line one\nline two` })\n  }"),
            "{}",
            out
        );
    }

    #[test]
    fn test_no_methods_closes_inline() {
        let config = TaggedErrorConfig {
            class_name: "Boom".to_string(),
            tag: Some("app/Boom".to_string()),
            ..Default::default()
        };
        let mut buf = CodeBuffer::new();
        render(&mut buf, &config, &ctx()).unwrap();
        assert_eq!(
            buf.finish(),
            "export class Boom extends Data.TaggedError(\"app/Boom\")<{\n}> {}"
        );
    }

    #[test]
    fn test_duplicate_fields_rejected() {
        let mut config = not_found();
        config.fields.push(FieldSpec::new("userId", "number"));
        let err = render(&mut CodeBuffer::new(), &config, &ctx()).unwrap_err();
        assert!(matches!(err, FragmentError::InvalidConfig { .. }));
    }

    #[test]
    fn test_missing_structural_variable() {
        let config = TaggedErrorConfig {
            class_name: "{entity}Error".to_string(),
            ..Default::default()
        };
        let err = render(&mut CodeBuffer::new(), &config, &ctx()).unwrap_err();
        assert_eq!(
            err,
            FragmentError::Interpolation(crate::templates::error::InterpolationError::new([
                "entity".to_string()
            ]))
        );
    }

    #[test]
    fn test_wrong_shape_is_mismatch() {
        let config = FragmentConfig::Layer(Default::default());
        let err = render_fragment(&mut CodeBuffer::new(), &config, &ctx()).unwrap_err();
        assert_eq!(
            err,
            FragmentError::ConfigMismatch {
                fragment_type: "tagged-error".to_string(),
                found: "layer",
            }
        );
    }
}
