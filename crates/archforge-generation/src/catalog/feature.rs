//! Feature libraries: business services composed over contract ports

use crate::{
    catalog::CatalogEntry,
    fragments::config::{
        CapabilityModuleConfig, FieldSpec, FragmentConfig, FragmentDefinition, LayerConfig,
        LayerKind, MethodSpec, Param, StaticMethod, TaggedErrorConfig,
    },
    models::ArtifactKind,
    templates::definition::{ImportSpec, Section, SectionContent, TemplateDefinition, TemplateMeta},
};

const KIND: ArtifactKind = ArtifactKind::Feature;

const CONTRACT: &str = "{scope}/contract-{fileName}";

const REQUIRED: &[&str] = &["className", "propertyName", "fileName", "scope", "packageName"];

pub(super) fn entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(KIND, "service", REQUIRED, service()),
        CatalogEntry::new(KIND, "errors", &["className", "propertyName", "packageName"], errors()),
        CatalogEntry::new(KIND, "layers", REQUIRED, layers()),
        CatalogEntry::new(KIND, "index", &["className", "packageName"], index()),
    ]
}

const MAKE_SERVICE: &str = r#"export const make = Effect.gen(function* () {
  const repository = yield* {className}Repository

  const guard = <A, E>(operation: string, effect: Effect.Effect<A, E>) =>
    effect.pipe(Effect.withSpan("{className}Service." + operation))

  return {className}Service.of({
    get: (id) => guard("get", repository.findById(id)),
    list: () => guard("list", repository.findAll()),
    create: (input) => guard("create", repository.create(input)),
    update: (id, input) => guard("update", repository.update(id, input)),
    remove: (id) => guard("remove", repository.delete(id))
  })
})"#;

fn service() -> TemplateDefinition {
    let module = CapabilityModuleConfig {
        name: "{className}Service".to_string(),
        doc: Some("Use cases of the {propertyName} feature.".to_string()),
        methods: vec![
            MethodSpec::new(
                "get",
                vec![Param::new("id", "{className}Id")],
                "Effect.Effect<{className}, {className}NotFoundError>",
            ),
            MethodSpec::new("list", vec![], "Effect.Effect<ReadonlyArray<{className}>>"),
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
                "remove",
                vec![Param::new("id", "{className}Id")],
                "Effect.Effect<void, {className}NotFoundError>",
            ),
        ],
        ..Default::default()
    };

    TemplateDefinition::new(
        "feature/service",
        TemplateMeta::new(
            "{className} Service",
            "Business operations over {propertyName} aggregates.",
            "{packageName}/service",
        ),
    )
    .with_import(ImportSpec::named(CONTRACT, ["{className}Repository"]))
    .with_import(ImportSpec::types(
        CONTRACT,
        [
            "{className}",
            "{className}AlreadyExistsError",
            "{className}Id",
            "{className}NotFoundError",
            "Create{className}InputType",
            "Update{className}InputType",
        ],
    ))
    .with_section(Section::new(SectionContent::CapabilityModule(module)))
    .with_section(Section::raw(MAKE_SERVICE))
}

fn errors() -> TemplateDefinition {
    let failure = TaggedErrorConfig {
        class_name: "{className}ServiceError".to_string(),
        doc: Some("Unexpected failure inside a {propertyName} use case.".to_string()),
        fields: vec![
            FieldSpec::new("operation", "string"),
            FieldSpec::new("cause", "unknown").optional(),
        ],
        static_methods: vec![StaticMethod::new(
            "fromCause",
            vec![Param::new("operation", "string"), Param::new("cause", "unknown")],
            "return new this({ operation, cause })",
        )],
        ..Default::default()
    };
    let forbidden = TaggedErrorConfig {
        class_name: "{className}ForbiddenError".to_string(),
        fields: vec![FieldSpec::new("reason", "string")],
        ..Default::default()
    };

    TemplateDefinition::new(
        "feature/errors",
        TemplateMeta::new(
            "{className} Feature Errors",
            "",
            "{packageName}/errors",
        ),
    )
    .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::TaggedError(failure))))
    .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::TaggedError(
        forbidden,
    ))))
}

fn layers() -> TemplateDefinition {
    let live = LayerConfig {
        name: "{className}ServiceLive".to_string(),
        kind: LayerKind::Effect,
        target: "{className}Service".to_string(),
        implementation: "make".to_string(),
        provides: vec!["{className}RepositoryLive".to_string()],
        doc: Some("{className}Service wired to the default repository".to_string()),
    };

    TemplateDefinition::new(
        "feature/layers",
        TemplateMeta::new("{className} Feature Layers", "", "{packageName}/layers"),
    )
    .with_import(ImportSpec::named("./service", ["{className}Service", "make"]))
    .with_import(ImportSpec::named(
        "{scope}/data-access-{fileName}",
        ["{className}RepositoryLive"],
    ))
    .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::Layer(live))))
}

fn index() -> TemplateDefinition {
    TemplateDefinition::new(
        "feature/index",
        TemplateMeta::new(
            "{className} Feature",
            "Public surface of the {className} feature library.",
            "{packageName}",
        ),
    )
    .with_section(Section::raw(
        "export { {className}Service } from \"./lib/service\"\nexport * from \"./lib/errors\"\nexport * from \"./lib/layers\"",
    ))
}
