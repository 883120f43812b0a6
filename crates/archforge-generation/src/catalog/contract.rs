//! Contract libraries: errors, entities, ports and events of one domain

use crate::{
    catalog::CatalogEntry,
    fragments::config::{
        Annotation, CapabilityModuleConfig, FieldSpec, FragmentConfig, FragmentDefinition,
        MethodSpec, Param, SchemaConfig, SchemaField, SchemaKind, StaticMethod, TaggedErrorConfig,
    },
    models::ArtifactKind,
    templates::definition::{
        ConditionalBlock, ImportSpec, Section, SectionContent, TemplateDefinition, TemplateMeta,
    },
};

const KIND: ArtifactKind = ArtifactKind::Contract;

pub(super) fn entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(KIND, "errors", &["className", "propertyName", "packageName"], errors()),
        CatalogEntry::new(KIND, "entities", &["className", "packageName"], entities()),
        CatalogEntry::new(KIND, "ports", &["className", "propertyName", "packageName"], ports()),
        CatalogEntry::new(KIND, "events", &["className", "propertyName", "packageName"], events()),
        CatalogEntry::new(KIND, "index", &["className", "packageName"], index()),
    ]
}

fn id_props() -> Param {
    Param::new("props", "{ readonly {propertyName}Id: string }")
}

fn errors() -> TemplateDefinition {
    let not_found = TaggedErrorConfig {
        class_name: "{className}NotFoundError".to_string(),
        doc: Some("Raised when no {propertyName} exists for the requested id.".to_string()),
        fields: vec![
            FieldSpec::new("{propertyName}Id", "string"),
            FieldSpec::new("message", "string"),
        ],
        static_methods: vec![StaticMethod::new(
            "create",
            vec![id_props()],
            "const [id] = Object.values(props)\nreturn new this({ ...props, message: `Not found: ${id}` })",
        )
        .returns("{className}NotFoundError")],
        ..Default::default()
    };

    let validation = TaggedErrorConfig {
        class_name: "{className}ValidationError".to_string(),
        doc: Some("Raised when {propertyName} input fails validation.".to_string()),
        fields: vec![
            FieldSpec::new("field", "string"),
            FieldSpec::new("message", "string"),
        ],
        static_methods: vec![StaticMethod::new(
            "forField",
            vec![Param::new("field", "string"), Param::new("message", "string")],
            "return new this({ field, message })",
        )],
        ..Default::default()
    };

    let already_exists = TaggedErrorConfig {
        class_name: "{className}AlreadyExistsError".to_string(),
        fields: vec![FieldSpec::new("{propertyName}Id", "string")],
        ..Default::default()
    };

    TemplateDefinition::new(
        "contract/errors",
        TemplateMeta::new(
            "{className} Errors",
            "Domain errors for the {propertyName} aggregate.",
            "{packageName}/errors",
        ),
    )
    .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::TaggedError(not_found))))
    .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::TaggedError(validation))))
    .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::TaggedError(
        already_exists,
    ))))
    .with_section(Section::raw(
        "export type {className}DomainError =\n  | {className}NotFoundError\n  | {className}ValidationError\n  | {className}AlreadyExistsError",
    ))
}

fn entities() -> TemplateDefinition {
    let entity = SchemaConfig {
        name: "{className}".to_string(),
        kind: SchemaKind::Class,
        doc: Some("{className} aggregate root".to_string()),
        fields: vec![
            SchemaField::new("id", "{className}Id"),
            SchemaField::new("createdAt", "Schema.DateFromSelf"),
            SchemaField::new("updatedAt", "Schema.DateFromSelf"),
        ],
        annotations: vec![Annotation::new("identifier", "{className}")],
        ..Default::default()
    };
    let create_input = SchemaConfig {
        name: "Create{className}Input".to_string(),
        fields: vec![SchemaField::new("id", "Schema.optional({className}Id)")],
        type_alias: Some("Create{className}InputType".to_string()),
        ..Default::default()
    };
    let update_input = SchemaConfig {
        name: "Update{className}Input".to_string(),
        fields: vec![SchemaField::new("updatedAt", "Schema.DateFromSelf").optional()],
        type_alias: Some("Update{className}InputType".to_string()),
        ..Default::default()
    };

    TemplateDefinition::new(
        "contract/entities",
        TemplateMeta::new(
            "{className} Entities",
            "Validated schemas for the {className} aggregate and its inputs.",
            "{packageName}/entities",
        ),
    )
    .with_section(
        Section::raw(
            "export const {className}Id = Schema.String.pipe(Schema.brand(\"{className}Id\"))\nexport type {className}Id = typeof {className}Id.Type",
        )
        .titled("Identifiers"),
    )
    .with_section(Section::new(SectionContent::ValidatedSchema(entity)).titled("Aggregate"))
    .with_section(Section::new(SectionContent::ValidatedSchema(create_input)).titled("Inputs"))
    .with_section(Section::new(SectionContent::ValidatedSchema(update_input)))
}

fn ports() -> TemplateDefinition {
    let repository = CapabilityModuleConfig {
        name: "{className}Repository".to_string(),
        doc: Some("Persistence port for {propertyName} aggregates.".to_string()),
        methods: vec![
            MethodSpec::new(
                "findById",
                vec![Param::new("id", "{className}Id")],
                "Effect.Effect<{className}, {className}NotFoundError>",
            )
            .doc("Load one {propertyName} or fail with not-found"),
            MethodSpec::new("findAll", vec![], "Effect.Effect<ReadonlyArray<{className}>>"),
            MethodSpec::new(
                "create",
                vec![Param::new("input", "Create{className}InputType")],
                "Effect.Effect<{className}, {className}AlreadyExistsError>",
            ),
            MethodSpec::new(
                "update",
                vec![
                    Param::new("id", "{className}Id"),
                    Param::new("input", "Update{className}InputType"),
                ],
                "Effect.Effect<{className}, {className}NotFoundError>",
            ),
            MethodSpec::new(
                "delete",
                vec![Param::new("id", "{className}Id")],
                "Effect.Effect<void, {className}NotFoundError>",
            ),
            MethodSpec::new(
                "exists",
                vec![Param::new("id", "{className}Id")],
                "Effect.Effect<boolean>",
            ),
        ],
        ..Default::default()
    };

    TemplateDefinition::new(
        "contract/ports",
        TemplateMeta::new(
            "{className} Ports",
            "Capability modules the {propertyName} domain depends on.",
            "{packageName}/ports",
        ),
    )
    .with_import(ImportSpec::types(
        "./entities",
        [
            "{className}",
            "{className}Id",
            "Create{className}InputType",
            "Update{className}InputType",
        ],
    ))
    .with_import(ImportSpec::types(
        "./errors",
        [
            "{className}AlreadyExistsError",
            "{className}NotFoundError",
        ],
    ))
    .with_section(Section::new(SectionContent::CapabilityModule(repository)))
}

fn event(name: &str) -> Section {
    Section::fragment(FragmentDefinition::new(FragmentConfig::ValidatedSchema(SchemaConfig {
        name: name.to_string(),
        kind: SchemaKind::TaggedStruct,
        fields: vec![
            SchemaField::new("{propertyName}Id", "{className}Id"),
            SchemaField::new("occurredAt", "Schema.DateFromSelf"),
        ],
        ..Default::default()
    })))
}

fn events() -> TemplateDefinition {
    TemplateDefinition::new(
        "contract/events",
        TemplateMeta::new(
            "{className} Events",
            "Domain events published by the {propertyName} aggregate.",
            "{packageName}/events",
        ),
    )
    .with_import(ImportSpec::named("./entities", ["{className}Id"]))
    .with_section(event("{className}Created"))
    .with_section(event("{className}Updated"))
    .with_section(event("{className}Deleted"))
    .with_section(Section::raw(
        "export const {className}Event = Schema.Union({className}Created, {className}Updated, {className}Deleted)\nexport type {className}Event = typeof {className}Event.Type",
    ))
}

fn index() -> TemplateDefinition {
    let command = SchemaConfig {
        name: "Create{className}Command".to_string(),
        kind: SchemaKind::TaggedStruct,
        fields: vec![SchemaField::new("input", "Create{className}Input")],
        ..Default::default()
    };
    let query = SchemaConfig {
        name: "Get{className}Query".to_string(),
        kind: SchemaKind::TaggedStruct,
        fields: vec![SchemaField::new("id", "{className}Id")],
        ..Default::default()
    };

    TemplateDefinition::new(
        "contract/index",
        TemplateMeta::new(
            "{className} Contract",
            "Public surface of the {className} contract library.",
            "{packageName}",
        ),
    )
    .with_section(Section::raw(
        "export * from \"./lib/errors\"\nexport * from \"./lib/entities\"\nexport * from \"./lib/ports\"\nexport * from \"./lib/events\"",
    ))
    .with_conditional(
        ConditionalBlock::new("includeCQRS")
            .with_import(ImportSpec::named(
                "./lib/entities",
                ["Create{className}Input", "{className}Id"],
            ))
            .with_section(
                Section::fragment(FragmentDefinition::new(FragmentConfig::ValidatedSchema(command)))
                    .titled("CQRS"),
            )
            .with_section(Section::fragment(FragmentDefinition::new(
                FragmentConfig::ValidatedSchema(query),
            ))),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{context::TemplateContext, templates::compiler::Compiler};

    fn ctx(extra: &[(&str, serde_json::Value)]) -> TemplateContext {
        let mut pairs = vec![
            ("className", json!("User")),
            ("propertyName", json!("user")),
            ("packageName", json!("@shop/contract-user")),
        ];
        pairs.extend(extra.iter().cloned());
        TemplateContext::from_pairs(pairs)
    }

    #[test]
    fn test_errors_template() {
        let out = Compiler::shared().compile(&errors(), &ctx(&[])).unwrap();
        assert!(out.contains("export class UserNotFoundError extends Data.TaggedError(\"UserNotFoundError\")<{"));
        assert!(out.contains("  readonly userId: string"));
        assert!(out.contains("static create(props: { readonly userId: string }): UserNotFoundError {"));
        assert!(out.contains("message: `Not found: ${id}`"));
        assert!(out.starts_with("/**\n * User Errors\n"));
        assert_eq!(out.matches("import { Data } from \"effect\"").count(), 1);
    }

    #[test]
    fn test_index_cqrs_toggle() {
        let off = Compiler::shared().compile(&index(), &ctx(&[])).unwrap();
        assert!(!off.contains("CreateUserCommand"));
        assert!(!off.contains("import"));

        let on = Compiler::shared()
            .compile(&index(), &ctx(&[("includeCQRS", json!(true))]))
            .unwrap();
        assert!(on.contains("export const CreateUserCommand = Schema.TaggedStruct(\"CreateUserCommand\", {"));
        assert!(on.contains("import { Schema } from \"effect\""));
        assert!(on.contains("import { CreateUserInput, UserId } from \"./lib/entities\""));
    }
}
