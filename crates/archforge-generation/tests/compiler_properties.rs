//! Property-based tests for template compilation
//!
//! Covers determinism, fail-fast completeness, conditional isolation and the
//! guarantee that bodies and implementations are emitted verbatim.

use std::collections::BTreeSet;

use archforge_generation::{
    fragments::{
        CapabilityModuleConfig, EnvironmentVariant, FieldSpec, FragmentConfig, FragmentDefinition,
        LayerConfig, LayerKind, MethodSpec, Param, StaticMethod, TaggedErrorConfig,
    },
    templates::ConditionalBlock,
    Compiler, CompilationError, ImportSpec, Section, TemplateContext, TemplateDefinition,
    TemplateMeta,
};
use proptest::prelude::*;
use serde_json::json;

/// Strategy for placeholder names
fn var_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,6}"
}

/// Strategy for values that never contain placeholder syntax
fn value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,12}"
}

/// Multi-line template literal with trailing whitespace, a `${...}`
/// substitution and placeholder-like text, opened on the first line
fn literal_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(("[A-Za-z0-9 .,:]{0,10}", "[ ]{0,3}"), 1..4),
        var_name_strategy(),
    )
        .prop_map(|(lines, ident)| {
            let mut text: Vec<String> = lines
                .into_iter()
                .map(|(words, trailing)| format!("{}{}", words, trailing))
                .collect();
            text.insert(1, format!("  ${{{}}} and {{{}}}  ", ident, ident));
            format!("`{}`", text.join("\n"))
        })
}

fn order_context() -> TemplateContext {
    TemplateContext::from_pairs([("className", json!("Order"))])
}

fn definition_using(vars: &BTreeSet<String>) -> TemplateDefinition {
    let body: Vec<String> = vars
        .iter()
        .map(|v| format!("export const {}Value = \"{{{}}}\"", v, v))
        .collect();
    TemplateDefinition::new("props/vars", TemplateMeta::new("Vars", "", ""))
        .with_section(Section::raw(body.join("\n")))
}

proptest! {
    /// Compiling the same definition against the same context twice yields
    /// byte-identical output.
    #[test]
    fn prop_compile_is_deterministic(
        class_name in "[A-Z][a-z]{1,8}",
        package in "@[a-z]{2,6}/[a-z]{2,8}",
        flag in any::<bool>(),
    ) {
        let definition = TemplateDefinition::new(
            "props/determinism",
            TemplateMeta::new("{className} Module", "Things about {className}.", "{packageName}"),
        )
        .with_import(ImportSpec::named("effect", ["Effect", "Data"]))
        .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::TaggedError(
            TaggedErrorConfig {
                class_name: "{className}Error".to_string(),
                ..Default::default()
            },
        ))))
        .with_conditional(
            ConditionalBlock::new("extra").with_section(Section::raw("export const extra = true")),
        );
        let context = TemplateContext::from_pairs([
            ("className", json!(class_name)),
            ("packageName", json!(package)),
            ("extra", json!(flag)),
        ]);

        let compiler = Compiler::shared();
        let first = compiler.compile(&definition, &context).unwrap();
        let second = compiler.compile(&definition, &context).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(first.ends_with('\n'));
        prop_assert!(!first.ends_with("\n\n"));
    }

    /// A context missing variables fails with exactly the missing set.
    #[test]
    fn prop_missing_variables_are_all_reported(
        vars in prop::collection::btree_set(var_name_strategy(), 1..6),
        keep_mask in prop::collection::vec(any::<bool>(), 6),
        value in value_strategy(),
    ) {
        let definition = definition_using(&vars);
        let mut present = Vec::new();
        let mut expected_missing = Vec::new();
        for (i, var) in vars.iter().enumerate() {
            if keep_mask[i] {
                present.push((var.clone(), json!(value.clone())));
            } else {
                expected_missing.push(var.clone());
            }
        }
        let context = TemplateContext::from_pairs(present);

        let result = Compiler::shared().compile(&definition, &context);
        if expected_missing.is_empty() {
            prop_assert!(result.is_ok());
        } else {
            match result {
                Err(err @ CompilationError::Interpolation { .. }) => {
                    prop_assert_eq!(err.missing(), expected_missing.as_slice());
                }
                other => prop_assert!(false, "expected interpolation error, got {:?}", other),
            }
        }
    }

    /// Inactive conditional blocks contribute neither imports, sections nor
    /// variable requirements.
    #[test]
    fn prop_inactive_conditionals_are_isolated(
        falsy in prop_oneof![
            Just(json!(false)),
            Just(json!(null)),
            Just(json!(0)),
            Just(json!("")),
        ],
        module in "[a-z]{3,8}",
    ) {
        let definition = TemplateDefinition::new("props/conditional", TemplateMeta::new("Title", "", ""))
            .with_section(Section::raw("export const base = 1"))
            .with_conditional(
                ConditionalBlock::new("feature")
                    .with_import(ImportSpec::named(format!("@cond/{}", module), ["{ghost}"]))
                    .with_section(Section::raw("export const {ghost} = 2")),
            );
        let without_flag = TemplateContext::new();
        let with_falsy = TemplateContext::from_pairs([("feature", falsy)]);

        let compiler = Compiler::shared();
        let a = compiler.compile(&definition, &without_flag).unwrap();
        let b = compiler.compile(&definition, &with_falsy).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert!(!a.contains("@cond/"));
        prop_assert!(a.contains("export const base = 1"));
    }

    /// Placeholder-like text inside method bodies is never interpolated and
    /// never required from the context.
    #[test]
    fn prop_bodies_are_emitted_verbatim(ident in var_name_strategy()) {
        let body = format!("return new this({{{}}})", ident);
        let definition = TemplateDefinition::new("props/bodies", TemplateMeta::new("{className}", "", ""))
            .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::TaggedError(
                TaggedErrorConfig {
                    class_name: "{className}Error".to_string(),
                    static_methods: vec![StaticMethod::new(
                        "make",
                        vec![Param::new("input", "unknown")],
                        body.clone(),
                    )],
                    ..Default::default()
                },
            ))));
        let context = TemplateContext::from_pairs([("className", json!("Order"))]);

        let out = Compiler::shared().compile(&definition, &context).unwrap();
        prop_assert!(out.contains(&body));
        prop_assert!(out.contains("export class OrderError"));
    }

    /// Multi-line method bodies keep template literal contents byte for byte,
    /// trailing whitespace included.
    #[test]
    fn prop_multiline_bodies_are_emitted_verbatim(literal in literal_strategy()) {
        let body = format!("return new this({{ message: {} }})", literal);
        let definition = TemplateDefinition::new("props/multiline", TemplateMeta::new("{className}", "", ""))
            .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::TaggedError(
                TaggedErrorConfig {
                    class_name: "{className}Error".to_string(),
                    static_methods: vec![StaticMethod::new("make", Vec::new(), body.clone())],
                    ..Default::default()
                },
            ))));

        let out = Compiler::shared().compile(&definition, &order_context()).unwrap();
        prop_assert!(out.contains(&format!("    {}", body)), "{}", out);
    }

    /// Layer implementations are never interpolated or re-indented inside
    /// template literals.
    #[test]
    fn prop_layer_implementations_are_emitted_verbatim(literal in literal_strategy()) {
        let implementation = format!("Effect.succeed({})", literal);
        let definition = TemplateDefinition::new("props/layer", TemplateMeta::new("{className}", "", ""))
            .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::Layer(
                LayerConfig {
                    name: "{className}Live".to_string(),
                    kind: LayerKind::Effect,
                    target: "{className}Service".to_string(),
                    implementation: implementation.clone(),
                    ..Default::default()
                },
            ))));

        let out = Compiler::shared().compile(&definition, &order_context()).unwrap();
        prop_assert!(out.contains("export const OrderLive = Layer.effect("));
        prop_assert!(out.contains(&format!("  OrderService,\n  {}\n)", implementation)), "{}", out);
    }

    /// Capability-module environment implementations are emitted verbatim.
    #[test]
    fn prop_environment_implementations_are_emitted_verbatim(literal in literal_strategy()) {
        let implementation = format!("Layer.succeed(this, {{ describe: () => Effect.succeed({}) }})", literal);
        let definition = TemplateDefinition::new("props/capability", TemplateMeta::new("{className}", "", ""))
            .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::CapabilityModule(
                CapabilityModuleConfig {
                    name: "{className}Describer".to_string(),
                    methods: vec![MethodSpec::new("describe", Vec::new(), "Effect.Effect<string>")],
                    environments: vec![EnvironmentVariant::new("Test", implementation.clone())],
                    ..Default::default()
                },
            ))));

        let out = Compiler::shared().compile(&definition, &order_context()).unwrap();
        prop_assert!(out.contains(&format!("  static readonly Test = {}", implementation)), "{}", out);
    }

    /// Missing names are reported once each, however many sections and
    /// fragments reference them.
    #[test]
    fn prop_missing_variables_reported_once_across_sections(
        vars in prop::collection::btree_set(var_name_strategy(), 1..5),
        keep_mask in prop::collection::vec(any::<bool>(), 5),
        value in value_strategy(),
    ) {
        let mut definition = definition_using(&vars);
        for var in &vars {
            definition = definition
                .with_section(Section::raw(format!("// {{{}}} again", var)).titled(format!("{{{}}}", var)));
        }
        let fields = vars
            .iter()
            .enumerate()
            .map(|(i, var)| FieldSpec::new(format!("field{}", i), format!("{{{}}}", var)))
            .collect();
        definition = definition.with_section(Section::fragment(FragmentDefinition::new(
            FragmentConfig::TaggedError(TaggedErrorConfig {
                class_name: "SharedError".to_string(),
                fields,
                ..Default::default()
            }),
        )));

        let mut present = Vec::new();
        let mut expected_missing = Vec::new();
        for (i, var) in vars.iter().enumerate() {
            if keep_mask[i] {
                present.push((var.clone(), json!(value.clone())));
            } else {
                expected_missing.push(var.clone());
            }
        }
        let context = TemplateContext::from_pairs(present);

        let result = Compiler::shared().compile(&definition, &context);
        if expected_missing.is_empty() {
            prop_assert!(result.is_ok(), "{:?}", result);
        } else {
            match result {
                Err(err @ CompilationError::Interpolation { .. }) => {
                    prop_assert_eq!(err.missing(), expected_missing.as_slice());
                }
                other => prop_assert!(false, "expected interpolation error, got {:?}", other),
            }
        }
    }
}
