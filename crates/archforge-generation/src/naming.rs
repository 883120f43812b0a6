//! Naming variants derived from a short name

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase};
use serde::{Deserialize, Serialize};

/// The four casings every template context is seeded with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingVariants {
    /// PascalCase (e.g., OrderItem)
    pub class_name: String,
    /// camelCase (e.g., orderItem)
    pub property_name: String,
    /// kebab-case (e.g., order-item)
    pub file_name: String,
    /// SCREAMING_SNAKE_CASE (e.g., ORDER_ITEM)
    pub constant_name: String,
}

/// Derives naming variants from a short name
///
/// Implementations must be pure: the same input always yields the same variants.
pub trait NamingProvider: Send + Sync {
    /// Compute the variants for `name`
    fn variants(&self, name: &str) -> NamingVariants;
}

/// Default provider backed by `heck` case conversions
#[derive(Debug, Clone, Copy, Default)]
pub struct HeckNaming;

impl NamingProvider for HeckNaming {
    fn variants(&self, name: &str) -> NamingVariants {
        NamingVariants {
            class_name: name.to_pascal_case(),
            property_name: name.to_lower_camel_case(),
            file_name: name.to_kebab_case(),
            constant_name: name.to_shouty_snake_case(),
        }
    }
}
