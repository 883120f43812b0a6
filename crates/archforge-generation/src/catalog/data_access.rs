//! Data-access libraries: repository implementations behind contract ports

use crate::{
    catalog::CatalogEntry,
    fragments::config::{FragmentConfig, FragmentDefinition, LayerConfig, LayerKind},
    models::ArtifactKind,
    templates::definition::{ImportSpec, Section, TemplateDefinition, TemplateMeta},
};

const KIND: ArtifactKind = ArtifactKind::DataAccess;

const CONTRACT: &str = "{scope}/contract-{fileName}";

pub(super) fn entries() -> Vec<CatalogEntry> {
    let required = &["className", "propertyName", "fileName", "scope", "packageName"];
    vec![
        CatalogEntry::new(KIND, "repository", required, repository()),
        CatalogEntry::new(KIND, "layers", required, layers()),
        CatalogEntry::new(KIND, "index", &["className", "packageName"], index()),
    ]
}

const MAKE_REPOSITORY: &str = r#"export const make = Effect.gen(function* () {
  const store = yield* Ref.make(HashMap.empty<{className}Id, {className}>())

  const findById = (id: {className}Id) =>
    Ref.get(store).pipe(
      Effect.map(HashMap.get(id)),
      Effect.flatMap(Option.match({
        onNone: () => Effect.fail({className}NotFoundError.create({ {propertyName}Id: id })),
        onSome: Effect.succeed
      }))
    )

  const exists = (id: {className}Id) => Ref.get(store).pipe(Effect.map(HashMap.has(id)))

  return {className}Repository.of({
    findById,
    findAll: () => Ref.get(store).pipe(Effect.map((map) => Array.from(HashMap.values(map)))),
    create: (input) =>
      Effect.gen(function* () {
        const now = new Date()
        const entity = new {className}({ ...input, id: input.id ?? {className}Id.make(crypto.randomUUID()), createdAt: now, updatedAt: now })
        if (yield* exists(entity.id)) {
          return yield* Effect.fail(new {className}AlreadyExistsError({ {propertyName}Id: entity.id }))
        }
        yield* Ref.update(store, HashMap.set(entity.id, entity))
        return entity
      }),
    update: (id, input) =>
      Effect.gen(function* () {
        const current = yield* findById(id)
        const next = new {className}({ ...current, ...input, updatedAt: new Date() })
        yield* Ref.update(store, HashMap.set(id, next))
        return next
      }),
    delete: (id) => findById(id).pipe(Effect.zipRight(Ref.update(store, HashMap.remove(id)))),
    exists
  })
})"#;

fn repository() -> TemplateDefinition {
    TemplateDefinition::new(
        "data-access/repository",
        TemplateMeta::new(
            "{className} Repository",
            "In-memory implementation of the {className}Repository port.",
            "{packageName}/repository",
        ),
    )
    .with_import(ImportSpec::named("effect", ["Effect", "HashMap", "Option", "Ref"]))
    .with_import(ImportSpec::named(
        CONTRACT,
        [
            "{className}",
            "{className}AlreadyExistsError",
            "{className}Id",
            "{className}NotFoundError",
            "{className}Repository",
        ],
    ))
    .with_section(Section::raw(MAKE_REPOSITORY).titled("Implementation"))
}

fn layers() -> TemplateDefinition {
    let live = LayerConfig {
        name: "{className}RepositoryLive".to_string(),
        kind: LayerKind::Effect,
        target: "{className}Repository".to_string(),
        implementation: "make".to_string(),
        doc: Some("In-memory {className}Repository".to_string()),
        ..Default::default()
    };

    TemplateDefinition::new(
        "data-access/layers",
        TemplateMeta::new(
            "{className} Repository Layers",
            "",
            "{packageName}/layers",
        ),
    )
    .with_import(ImportSpec::named(CONTRACT, ["{className}Repository"]))
    .with_import(ImportSpec::named("./repository", ["make"]))
    .with_section(Section::fragment(FragmentDefinition::new(FragmentConfig::Layer(live))))
}

fn index() -> TemplateDefinition {
    TemplateDefinition::new(
        "data-access/index",
        TemplateMeta::new(
            "{className} Data Access",
            "Repository implementations for the {className} contract.",
            "{packageName}",
        ),
    )
    .with_section(Section::raw(
        "export { make as make{className}Repository } from \"./lib/repository\"\nexport * from \"./lib/layers\"",
    ))
}
