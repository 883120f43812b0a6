//! Provider libraries: adapters around third-party SDKs

use crate::{
    catalog::CatalogEntry,
    fragments::config::{
        CapabilityModuleConfig, EnvironmentVariant, FieldSpec, FragmentConfig, FragmentDefinition,
        LayerConfig, LayerKind, MethodSpec, Param, SchemaConfig, SchemaField, StaticMethod,
        TaggedErrorConfig,
    },
    models::ArtifactKind,
    templates::definition::{ImportSpec, Section, SectionContent, TemplateDefinition, TemplateMeta},
};

const KIND: ArtifactKind = ArtifactKind::Provider;

const REQUIRED: &[&str] = &["className", "propertyName", "constantName", "packageName"];

pub(super) fn entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(KIND, "service", REQUIRED, service()),
        CatalogEntry::new(KIND, "errors", &["className", "packageName"], errors()),
        CatalogEntry::new(KIND, "layers", REQUIRED, layers()),
        CatalogEntry::new(KIND, "index", &["className", "packageName"], index()),
    ]
}

const MAKE_CLIENT: &str = r#"export const make = Effect.gen(function* () {
  const apiKey = yield* Config.redacted("{constantName}_API_KEY")
  const baseUrl = yield* Config.string("{constantName}_BASE_URL")

  const send = (request: {className}RequestType) =>
    Effect.tryPromise({
      try: () =>
        fetch(`${baseUrl}/requests`, {
          method: "POST",
          headers: { authorization: `Bearer ${Redacted.value(apiKey)}` },
          body: JSON.stringify(request)
        }).then((response) => response.json()),
      catch: (cause) => {className}ProviderError.fromCause("send", cause)
    }).pipe(Effect.flatMap(Schema.decodeUnknown({className}Response)), Effect.mapError((cause) => {className}ProviderError.fromCause("decode", cause)))

  return {className}Client.of({
    send,
    healthCheck: () => send({ ping: true }).pipe(Effect.as(true))
  })
})"#;

const TEST_CLIENT: &str = r#"Layer.succeed(this, {
  send: () => Effect.succeed({ ok: true }),
  healthCheck: () => Effect.succeed(true)
})"#;

fn service() -> TemplateDefinition {
    let request = SchemaConfig {
        name: "{className}Request".to_string(),
        fields: vec![SchemaField::new("ping", "Schema.Boolean").optional()],
        type_alias: Some("{className}RequestType".to_string()),
        ..Default::default()
    };
    let response = SchemaConfig {
        name: "{className}Response".to_string(),
        fields: vec![SchemaField::new("ok", "Schema.Boolean")],
        type_alias: Some("{className}ResponseType".to_string()),
        ..Default::default()
    };
    let client = CapabilityModuleConfig {
        name: "{className}Client".to_string(),
        doc: Some("Typed client for the {className} API.".to_string()),
        methods: vec![
            MethodSpec::new(
                "send",
                vec![Param::new("request", "{className}RequestType")],
                "Effect.Effect<{className}ResponseType, {className}ProviderError>",
            ),
            MethodSpec::new(
                "healthCheck",
                vec![],
                "Effect.Effect<boolean, {className}ProviderError>",
            ),
        ],
        environments: vec![EnvironmentVariant::new("Test", TEST_CLIENT)],
        ..Default::default()
    };

    TemplateDefinition::new(
        "provider/service",
        TemplateMeta::new(
            "{className} Provider",
            "Adapter exposing the {className} SDK as an Effect service.\nCredentials come from {constantName}_API_KEY.",
            "{packageName}/service",
        ),
    )
    .with_import(ImportSpec::named("effect", ["Config", "Redacted"]))
    .with_import(ImportSpec::named("./errors", ["{className}ProviderError"]))
    .with_section(Section::new(SectionContent::ValidatedSchema(request)).titled("Wire types"))
    .with_section(Section::new(SectionContent::ValidatedSchema(response)))
    .with_section(Section::new(SectionContent::CapabilityModule(client)).titled("Client"))
    .with_section(Section::raw(MAKE_CLIENT))
}

fn errors() -> TemplateDefinition {
    let provider_error = TaggedErrorConfig {
        class_name: "{className}ProviderError".to_string(),
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
    let rate_limited = TaggedErrorConfig {
        class_name: "{className}RateLimitError".to_string(),
        doc: Some("The {className} API asked the caller to back off.".to_string()),
        fields: vec![FieldSpec::new("retryAfterMs", "number")],
        ..Default::default()
    };

    TemplateDefinition::new(
        "provider/errors",
        TemplateMeta::new("{className} Provider Errors", "", "{packageName}/errors"),
    )
    .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::TaggedError(
        provider_error,
    ))))
    .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::TaggedError(
        rate_limited,
    ))))
}

fn layers() -> TemplateDefinition {
    let live = LayerConfig {
        name: "{className}ClientLive".to_string(),
        kind: LayerKind::Effect,
        target: "{className}Client".to_string(),
        implementation: "make".to_string(),
        doc: Some("Reads {constantName}_API_KEY and {constantName}_BASE_URL from config".to_string()),
        ..Default::default()
    };

    TemplateDefinition::new(
        "provider/layers",
        TemplateMeta::new("{className} Provider Layers", "", "{packageName}/layers"),
    )
    .with_import(ImportSpec::named("./service", ["{className}Client", "make"]))
    .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::Layer(live))))
}

fn index() -> TemplateDefinition {
    TemplateDefinition::new(
        "provider/index",
        TemplateMeta::new("{className} Provider", "", "{packageName}"),
    )
    .with_section(Section::raw(
        "export * from \"./lib/service\"\nexport * from \"./lib/errors\"\nexport * from \"./lib/layers\"",
    ))
}
