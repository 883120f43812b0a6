//! Infra libraries: process-level services such as caches

use crate::{
    catalog::CatalogEntry,
    fragments::config::{
        CapabilityModuleConfig, EnvironmentVariant, FragmentConfig, FragmentDefinition,
        LayerConfig, LayerKind, MethodSpec, Param,
    },
    models::ArtifactKind,
    templates::definition::{ImportSpec, Section, SectionContent, TemplateDefinition, TemplateMeta},
};

const KIND: ArtifactKind = ArtifactKind::Infra;

pub(super) fn entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(KIND, "service", &["className", "propertyName", "packageName"], service()),
        CatalogEntry::new(KIND, "layers", &["className", "packageName"], layers()),
        CatalogEntry::new(KIND, "index", &["className", "packageName"], index()),
    ]
}

const TEST_STORE: &str = r#"Layer.sync(this, () => {
  const store = new Map<string, string>()
  return {
    get: (key) => Effect.sync(() => Option.fromNullable(store.get(key))),
    set: (key, value) => Effect.sync(() => void store.set(key, value)),
    invalidate: (key) => Effect.sync(() => void store.delete(key))
  }
})"#;

const SCOPED_STORE: &str = r#"Effect.acquireRelease(
  Effect.sync(() => new Map<string, string>()),
  (store) => Effect.sync(() => store.clear())
).pipe(
  Effect.map((store) => ({
    get: (key: string) => Effect.sync(() => Option.fromNullable(store.get(key))),
    set: (key: string, value: string) => Effect.sync(() => void store.set(key, value)),
    invalidate: (key: string) => Effect.sync(() => void store.delete(key))
  }))
)"#;

fn service() -> TemplateDefinition {
    let module = CapabilityModuleConfig {
        name: "{className}Service".to_string(),
        tag: Some("@infra/{className}Service".to_string()),
        doc: Some("Key/value {propertyName} store shared across features.".to_string()),
        methods: vec![
            MethodSpec::new(
                "get",
                vec![Param::new("key", "string")],
                "Effect.Effect<Option.Option<string>>",
            ),
            MethodSpec::new(
                "set",
                vec![Param::new("key", "string"), Param::new("value", "string")],
                "Effect.Effect<void>",
            ),
            MethodSpec::new(
                "invalidate",
                vec![Param::new("key", "string")],
                "Effect.Effect<void>",
            )
            .doc("Drop one key; missing keys are ignored"),
        ],
        environments: vec![EnvironmentVariant::new("Test", TEST_STORE)],
    };

    TemplateDefinition::new(
        "infra/service",
        TemplateMeta::new(
            "{className} Service",
            "Infrastructure capability for {propertyName} storage.",
            "{packageName}/service",
        ),
    )
    .with_import(ImportSpec::named("effect", ["Option"]))
    .with_section(Section::new(SectionContent::CapabilityModule(module)))
}

fn layers() -> TemplateDefinition {
    let live = LayerConfig {
        name: "{className}ServiceLive".to_string(),
        kind: LayerKind::Scoped,
        target: "{className}Service".to_string(),
        implementation: SCOPED_STORE.to_string(),
        doc: Some("Scoped {className}Service released with its scope".to_string()),
        ..Default::default()
    };

    TemplateDefinition::new(
        "infra/layers",
        TemplateMeta::new("{className} Layers", "", "{packageName}/layers"),
    )
    .with_import(ImportSpec::named("effect", ["Effect", "Option"]))
    .with_import(ImportSpec::named("./service", ["{className}Service"]))
    .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::Layer(live))))
}

fn index() -> TemplateDefinition {
    TemplateDefinition::new(
        "infra/index",
        TemplateMeta::new("{className} Infra", "", "{packageName}"),
    )
    .with_section(Section::raw(
        "export * from \"./lib/service\"\nexport * from \"./lib/layers\"",
    ))
}
