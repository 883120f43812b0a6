//! Property-based tests for import merging

use std::collections::BTreeSet;

use archforge_generation::{
    templates::{merge_imports, render_imports},
    ImportSpec,
};
use proptest::prelude::*;

fn module_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("effect".to_string()),
        Just("./errors".to_string()),
        Just("@shop/contract-user".to_string()),
    ]
}

fn import_strategy() -> impl Strategy<Value = ImportSpec> {
    (
        module_strategy(),
        prop::collection::vec("[A-Z][a-z]{0,4}", 0..4),
        any::<bool>(),
    )
        .prop_map(|(from, items, type_only)| {
            if type_only {
                ImportSpec::types(from, items)
            } else {
                ImportSpec::named(from, items)
            }
        })
}

proptest! {
    /// Every module is imported by at most one value statement and one type
    /// statement, and no name appears twice for the same module.
    #[test]
    fn prop_merged_imports_are_unique(imports in prop::collection::vec(import_strategy(), 0..12)) {
        let merged = merge_imports(&imports);

        let mut statements = BTreeSet::new();
        for import in &merged {
            prop_assert!(
                statements.insert((import.from.clone(), import.type_only)),
                "duplicate statement for {}",
                import.from
            );
            let mut sorted = import.items.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(&sorted, &import.items);
        }

        for import in merged.iter().filter(|i| i.type_only) {
            let values = merged
                .iter()
                .find(|v| !v.type_only && v.from == import.from);
            if let Some(values) = values {
                for item in &import.items {
                    prop_assert!(!values.items.contains(item), "{} imported as value and type", item);
                }
            }
        }
    }

    /// Merging keeps every imported name and never invents one.
    #[test]
    fn prop_merge_preserves_names(imports in prop::collection::vec(import_strategy(), 1..12)) {
        let merged = merge_imports(&imports);
        let before: BTreeSet<(String, String)> = imports
            .iter()
            .flat_map(|i| i.items.iter().map(move |item| (i.from.clone(), item.clone())))
            .collect();
        let after: BTreeSet<(String, String)> = merged
            .iter()
            .flat_map(|i| i.items.iter().map(move |item| (i.from.clone(), item.clone())))
            .collect();
        prop_assert_eq!(before, after);
    }

    /// Merging is idempotent and rendering is stable across repeated merges.
    #[test]
    fn prop_merge_is_idempotent(imports in prop::collection::vec(import_strategy(), 0..12)) {
        let once = merge_imports(&imports);
        let twice = merge_imports(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(render_imports(&once), render_imports(&twice));
    }
}
