//! Import merging and rendering

use std::collections::{BTreeSet, HashMap};

use crate::{fragments::buffer::quote, templates::definition::ImportSpec};

#[derive(Default)]
struct ModuleImports {
    from: String,
    values: BTreeSet<String>,
    types: BTreeSet<String>,
}

/// Merge imports targeting the same module
///
/// Modules keep first-appearance order. Within a module the value import comes
/// before the type-only import, items are sorted and de-duplicated, and a type
/// item that is also value-imported is dropped. A module seen only with empty
/// item lists becomes a single side-effect import.
pub fn merge_imports<'a>(imports: impl IntoIterator<Item = &'a ImportSpec>) -> Vec<ImportSpec> {
    let mut order: Vec<ModuleImports> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for import in imports {
        let slot = *index.entry(import.from.clone()).or_insert_with(|| {
            order.push(ModuleImports {
                from: import.from.clone(),
                ..Default::default()
            });
            order.len() - 1
        });
        let target = if import.type_only {
            &mut order[slot].types
        } else {
            &mut order[slot].values
        };
        target.extend(import.items.iter().cloned());
    }

    let mut merged = Vec::with_capacity(order.len());
    for module in order {
        let types: Vec<String> = module.types.difference(&module.values).cloned().collect();
        if module.values.is_empty() && types.is_empty() {
            merged.push(ImportSpec::named(module.from, Vec::<String>::new()));
            continue;
        }
        if !module.values.is_empty() {
            merged.push(ImportSpec::named(module.from.clone(), module.values));
        }
        if !types.is_empty() {
            merged.push(ImportSpec::types(module.from, types));
        }
    }
    merged
}

/// Render one `import` statement
pub fn render_import(import: &ImportSpec) -> String {
    if import.items.is_empty() {
        return format!("import {}", quote(&import.from));
    }
    format!(
        "import {}{{ {} }} from {}",
        if import.type_only { "type " } else { "" },
        import.items.join(", "),
        quote(&import.from)
    )
}

/// Render merged imports, one per line
pub fn render_imports(imports: &[ImportSpec]) -> String {
    imports.iter().map(render_import).collect::<Vec<_>>().join("\n")
}
