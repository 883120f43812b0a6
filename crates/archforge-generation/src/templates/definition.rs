//! Template definition model
//!
//! Pure data: a definition describes one generatable file and is shared across
//! every compile that uses it. Ordering is always carried by `Vec`s so the
//! compiler never depends on map iteration order.

use serde::{Deserialize, Serialize};

use crate::fragments::config::{
    CapabilityModuleConfig, FieldSpec, FragmentDefinition, SchemaConfig, Structural,
};

/// File-level documentation, every field interpolated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMeta {
    /// Header title
    pub title: String,
    /// Header description, may span lines
    #[serde(default)]
    pub description: String,
    /// `@module` path
    #[serde(default)]
    pub module_path: String,
}

impl TemplateMeta {
    /// Create metadata
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        module_path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            module_path: module_path.into(),
        }
    }
}

/// One import statement before merging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSpec {
    /// Module specifier
    pub from: String,
    /// Imported names; empty means a side-effect import
    #[serde(default)]
    pub items: Vec<String>,
    /// Emit as `import type`
    #[serde(default)]
    pub type_only: bool,
}

impl ImportSpec {
    /// Value import
    pub fn named<I, S>(from: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            from: from.into(),
            items: items.into_iter().map(Into::into).collect(),
            type_only: false,
        }
    }

    /// Type-only import
    pub fn types<I, S>(from: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_only: true,
            ..Self::named(from, items)
        }
    }
}

/// Structural interface declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceShape {
    /// Interface name
    pub name: String,
    /// Documentation
    #[serde(default)]
    pub doc: Option<String>,
    /// Ordered fields
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// Closed set of section content shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SectionContent {
    /// Interpolated text; the author is responsible for well-formedness
    Raw {
        /// Block text
        text: String,
    },
    /// Interface declaration
    Interface(InterfaceShape),
    /// Capability module declaration
    CapabilityModule(CapabilityModuleConfig),
    /// Validated schema declaration
    ValidatedSchema(SchemaConfig),
    /// Delegation to a registered fragment renderer
    Fragment(FragmentDefinition),
}

impl Structural for InterfaceShape {
    fn visit_structural(&self, visit: &mut dyn FnMut(&str)) {
        visit(&self.name);
        if let Some(doc) = &self.doc {
            visit(doc);
        }
        self.fields.iter().for_each(|f| f.visit_structural(visit));
    }
}

impl Structural for SectionContent {
    fn visit_structural(&self, visit: &mut dyn FnMut(&str)) {
        match self {
            SectionContent::Raw { text } => visit(text),
            SectionContent::Interface(shape) => shape.visit_structural(visit),
            SectionContent::CapabilityModule(config) => config.visit_structural(visit),
            SectionContent::ValidatedSchema(config) => config.visit_structural(visit),
            SectionContent::Fragment(def) => def.config.visit_structural(visit),
        }
    }
}

/// One unit of a template body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Optional banner title, interpolated
    #[serde(default)]
    pub title: Option<String>,
    /// Content shape
    pub content: SectionContent,
}

impl Section {
    /// Untitled section
    pub fn new(content: SectionContent) -> Self {
        Self {
            title: None,
            content,
        }
    }

    /// Untitled raw text section
    pub fn raw(text: impl Into<String>) -> Self {
        Self::new(SectionContent::Raw { text: text.into() })
    }

    /// Section delegating to a fragment
    pub fn fragment(definition: FragmentDefinition) -> Self {
        Self::new(SectionContent::Fragment(definition))
    }

    /// Attach a banner title
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Imports and sections included only when `flag` is truthy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalBlock {
    /// Context flag gating the block
    pub flag: String,
    /// Extra imports
    #[serde(default)]
    pub imports: Vec<ImportSpec>,
    /// Extra sections, appended after base sections
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl ConditionalBlock {
    /// Empty block gated on `flag`
    pub fn new(flag: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            imports: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Add an import
    pub fn with_import(mut self, import: ImportSpec) -> Self {
        self.imports.push(import);
        self
    }

    /// Add a section
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}

/// Immutable description of one generatable file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    /// Unique id, conventionally `artifact-kind/file-kind`
    pub id: String,
    /// Header metadata
    pub meta: TemplateMeta,
    /// Base imports
    #[serde(default)]
    pub imports: Vec<ImportSpec>,
    /// Base sections in render order
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Conditional blocks in declared order
    #[serde(default)]
    pub conditionals: Vec<ConditionalBlock>,
}

impl TemplateDefinition {
    /// Empty definition
    pub fn new(id: impl Into<String>, meta: TemplateMeta) -> Self {
        Self {
            id: id.into(),
            meta,
            imports: Vec::new(),
            sections: Vec::new(),
            conditionals: Vec::new(),
        }
    }

    /// Add a base import
    pub fn with_import(mut self, import: ImportSpec) -> Self {
        self.imports.push(import);
        self
    }

    /// Add a base section
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Add a conditional block
    pub fn with_conditional(mut self, block: ConditionalBlock) -> Self {
        self.conditionals.push(block);
        self
    }

    /// Flags of every conditional block, in declared order
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.conditionals.iter().map(|c| c.flag.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let def = TemplateDefinition::new("t", TemplateMeta::new("T", "", ""))
            .with_section(Section::raw("a"))
            .with_section(Section::raw("b"))
            .with_conditional(ConditionalBlock::new("second"))
            .with_conditional(ConditionalBlock::new("first"));
        let texts: Vec<_> = def
            .sections
            .iter()
            .map(|s| match &s.content {
                SectionContent::Raw { text } => text.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(texts, vec!["a", "b"]);
        assert_eq!(def.flags().collect::<Vec<_>>(), vec!["second", "first"]);
    }

    #[test]
    fn test_definition_from_yaml() {
        let yaml = r#"
id: feature/metrics
meta:
  title: "{className} metrics"
  modulePath: "{packageName}/metrics"
imports:
  - from: effect
    items: [Metric]
sections:
  - title: Counters
    content:
      type: raw
      text: "export const {propertyName}Requests = Metric.counter(\"{fileName}_requests\")"
  - content:
      type: interface
      name: "{className}MetricsProps"
      fields:
        - name: enabled
          type: boolean
          optional: true
conditionals:
  - flag: includeGauges
    sections:
      - content:
          type: raw
          text: "export const {propertyName}Gauge = Metric.gauge(\"{fileName}\")"
"#;
        let def: TemplateDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "feature/metrics");
        assert_eq!(def.meta.description, "");
        assert_eq!(def.sections.len(), 2);
        assert_eq!(def.sections[0].title.as_deref(), Some("Counters"));
        assert!(matches!(def.sections[1].content, SectionContent::Interface(_)));
        assert_eq!(def.conditionals[0].flag, "includeGauges");
    }
}
