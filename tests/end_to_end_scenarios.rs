//! End-to-end generation scenarios
//!
//! Each test drives the public API the way the CLI does and checks the
//! generated TypeScript for the names a user would look for.

use archforge_generation::{
    ArtifactKind, Generator, LibraryOptions, TemplateContext, TemplateRegistry, TEMPLATE_NOT_FOUND,
};
use serde_json::json;

fn contract_context(class_name: &str, property_name: &str) -> TemplateContext {
    TemplateContext::from_pairs([
        ("className", json!(class_name)),
        ("propertyName", json!(property_name)),
        ("packageName", json!(format!("@shop/contract-{}", property_name))),
    ])
}

#[test]
fn test_not_found_error_for_user() {
    let file = Generator::new()
        .generate_file(ArtifactKind::Contract, "errors", &contract_context("User", "user"))
        .unwrap();

    assert!(file
        .content
        .contains("export class UserNotFoundError extends Data.TaggedError(\"UserNotFoundError\")<{"));
    assert!(file.content.contains("  readonly userId: string"));
    assert!(file
        .content
        .contains("static create(props: { readonly userId: string }): UserNotFoundError {"));
    assert!(file.content.contains("Raised when no user exists for the requested id."));
}

#[test]
fn test_order_repository_capability_module() {
    let file = Generator::new()
        .generate_file(ArtifactKind::Contract, "ports", &contract_context("Order", "order"))
        .unwrap();

    assert!(file
        .content
        .contains("export class OrderRepository extends Context.Tag(\"OrderRepository\")<"));
    for method in ["findById", "findAll", "create", "update", "delete", "exists"] {
        assert!(
            file.content.contains(&format!("readonly {}: (", method)),
            "missing method {}:\n{}",
            method,
            file.content
        );
    }
    assert!(file.content.contains("import { Context, Effect, Layer } from \"effect\""));
    assert!(file.content.contains("import type { OrderAlreadyExistsError, OrderNotFoundError } from \"./errors\""));
}

#[test]
fn test_include_cqrs_toggles_block() {
    let generator = Generator::new();
    let off = generator
        .generate_library(
            &LibraryOptions::new("user", "@shop", ArtifactKind::Contract).with_file_kinds(["index"]),
        )
        .unwrap();
    let on = generator
        .generate_library(
            &LibraryOptions::new("user", "@shop", ArtifactKind::Contract)
                .with_file_kinds(["index"])
                .with_override("includeCQRS", true),
        )
        .unwrap();

    let off = &off.files[0].content;
    let on = &on.files[0].content;
    assert!(!off.contains("CreateUserCommand"));
    assert!(!off.contains("// CQRS"));
    assert!(on.contains("// CQRS"));
    assert!(on.contains("CreateUserCommand"));
    assert!(on.len() > off.len());
}

#[test]
fn test_unknown_kind_fails_validation() {
    let registry = TemplateRegistry::global();
    for key in ["widget/errors", "contract/doesNotExist", "garbage"] {
        let validation = registry.validate_context(key, &TemplateContext::new());
        assert!(!validation.valid, "{}", key);
        assert_eq!(validation.missing, vec![TEMPLATE_NOT_FOUND.to_string()]);
        assert_eq!(validation.missing, vec!["Template not found".to_string()]);
    }
}

#[test]
fn test_generate_domain_customer() {
    let results = Generator::new()
        .generate_domain(
            "customer",
            "@shop",
            &[ArtifactKind::Contract, ArtifactKind::DataAccess, ArtifactKind::Feature],
        )
        .unwrap();

    assert_eq!(results.len(), 3);
    let kinds: Vec<ArtifactKind> = results.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![ArtifactKind::Contract, ArtifactKind::DataAccess, ArtifactKind::Feature]
    );

    for result in &results {
        assert!(result.warnings.is_empty());
        for file in &result.files {
            assert!(
                file.content.contains("Customer") || file.content.contains("customer"),
                "{} does not mention the domain",
                file.path
            );
            assert!(!file.content.contains("{className}"), "{}", file.path);
            assert!(!file.content.contains("{propertyName}"), "{}", file.path);
            assert!(file.path.contains("/customer/"), "{}", file.path);
        }
    }

    let data_access = &results[1].files[0].content;
    assert!(data_access.contains("from \"@shop/contract-customer\""));
    let feature_layers = results[2]
        .files
        .iter()
        .find(|f| f.template_id == "feature/layers")
        .unwrap();
    assert!(feature_layers
        .content
        .contains("import { CustomerRepositoryLive } from \"@shop/data-access-customer\""));
}
