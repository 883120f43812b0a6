//! Template compiler
//!
//! Turns a [`TemplateDefinition`] plus a [`TemplateContext`] into the text of one
//! file. Compilation runs in a fixed order:
//! - validate every referenced variable up front
//! - render the header doc block
//! - merge and render imports
//! - render base sections, then active conditional sections
//! - join blocks with one blank line
//!
//! Nothing here reads a clock, draws randomness or iterates a hash-ordered map,
//! so equal inputs always yield byte-identical output.

use std::{collections::BTreeSet, sync::Arc};

use tracing::debug;

use crate::{
    context::TemplateContext,
    fragments::{
        buffer::CodeBuffer,
        config::Structural,
        error::FragmentError,
        registry::{is_active, FragmentRegistry},
        renderers::{capability_module, interface, schema},
    },
    templates::{
        definition::{ImportSpec, Section, SectionContent, TemplateDefinition},
        error::{CompilationError, InterpolationError},
        imports::{merge_imports, render_imports},
        interpolation::{extract_variables, interpolate},
    },
};

const BANNER_RULE: &str =
    "// ============================================================================";

/// Compiles template definitions against contexts
#[derive(Debug, Clone)]
pub struct Compiler {
    fragments: Arc<FragmentRegistry>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::shared()
    }
}

impl Compiler {
    /// Compiler dispatching fragments through `fragments`
    pub fn new(fragments: Arc<FragmentRegistry>) -> Self {
        Self { fragments }
    }

    /// Compiler over the process-wide built-in fragments
    pub fn shared() -> Self {
        Self::new(FragmentRegistry::shared())
    }

    /// Fragment registry in use
    pub fn fragments(&self) -> &FragmentRegistry {
        &self.fragments
    }

    /// Every variable the definition would interpolate under `context`
    ///
    /// Inactive conditional blocks and gated-off fragments contribute nothing;
    /// method bodies and implementation expressions are never inspected.
    pub fn referenced_variables(
        &self,
        definition: &TemplateDefinition,
        context: &TemplateContext,
    ) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        let mut visit = |text: &str| vars.extend(extract_variables(text));

        visit(&definition.meta.title);
        visit(&definition.meta.description);
        visit(&definition.meta.module_path);

        for import in active_imports(definition, context) {
            visit(&import.from);
            import.items.iter().for_each(|item| visit(item));
        }

        for section in active_sections(definition, context) {
            if let Some(title) = &section.title {
                visit(title);
            }
            section.content.visit_structural(&mut visit);
        }
        vars
    }

    /// Compile `definition` into file text ending in a single newline
    pub fn compile(
        &self,
        definition: &TemplateDefinition,
        context: &TemplateContext,
    ) -> Result<String, CompilationError> {
        let id = definition.id.as_str();

        let missing: Vec<String> = self
            .referenced_variables(definition, context)
            .into_iter()
            .filter(|name| context.scalar(name).is_none())
            .collect();
        if !missing.is_empty() {
            debug!(template = id, missing = ?missing, "Context is missing template variables");
            return Err(CompilationError::Interpolation {
                template_id: id.to_string(),
                source: InterpolationError::new(missing),
            });
        }

        let interpolation = |source: InterpolationError| CompilationError::Interpolation {
            template_id: id.to_string(),
            source,
        };
        let fragment = |source: FragmentError| CompilationError::Fragment {
            template_id: id.to_string(),
            source,
        };

        let mut blocks = Vec::new();
        blocks.push(self.render_header(definition, context).map_err(interpolation)?);
        blocks.push(self.render_import_block(definition, context).map_err(interpolation)?);

        let sections: Vec<&Section> = active_sections(definition, context).collect();
        for section in sections {
            blocks.push(self.render_section(section, context).map_err(fragment)?);
        }

        let mut out = blocks
            .into_iter()
            .filter(|block| !block.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        out.push('\n');
        debug!(template = id, bytes = out.len(), "Compiled template");
        Ok(out)
    }

    fn render_header(
        &self,
        definition: &TemplateDefinition,
        context: &TemplateContext,
    ) -> Result<String, InterpolationError> {
        let meta = &definition.meta;
        let mut paragraphs = vec![interpolate(&meta.title, context)?];
        let description = interpolate(&meta.description, context)?;
        if !description.trim().is_empty() {
            paragraphs.push(description.trim().to_string());
        }
        let module_path = interpolate(&meta.module_path, context)?;
        if !module_path.is_empty() {
            paragraphs.push(format!("@module {}", module_path));
        }

        let mut buffer = CodeBuffer::new();
        buffer.doc_block(&paragraphs.join("\n\n"));
        Ok(buffer.finish())
    }

    fn render_import_block(
        &self,
        definition: &TemplateDefinition,
        context: &TemplateContext,
    ) -> Result<String, InterpolationError> {
        let declared = active_imports(definition, context)
            .map(|import| interpolate_import(import, context))
            .collect::<Result<Vec<_>, _>>()?;
        let declared = merge_imports(&declared);

        let sections: Vec<&Section> = active_sections(definition, context).collect();
        let fragment_imports = self.fragments.required_imports(
            sections.iter().filter_map(|s| match &s.content {
                SectionContent::Fragment(def) => Some(def),
                _ => None,
            }),
            context,
        );
        let implicit: Vec<ImportSpec> = sections
            .iter()
            .flat_map(|s| match &s.content {
                SectionContent::CapabilityModule(_) => capability_module::required_imports(),
                SectionContent::ValidatedSchema(_) => schema::required_imports(),
                _ => Vec::new(),
            })
            .collect();

        let merged = merge_imports(declared.iter().chain(&fragment_imports).chain(&implicit));
        Ok(render_imports(&merged))
    }

    fn render_section(
        &self,
        section: &Section,
        context: &TemplateContext,
    ) -> Result<String, FragmentError> {
        let mut buffer = CodeBuffer::new();
        if let Some(title) = &section.title {
            buffer.line(BANNER_RULE);
            buffer.line(format!("// {}", interpolate(title, context)?));
            buffer.line(BANNER_RULE);
            buffer.blank_line();
        }
        match &section.content {
            SectionContent::Raw { text } => {
                buffer.lines(&interpolate(text, context)?);
            }
            SectionContent::Interface(shape) => interface::render(&mut buffer, shape, context)?,
            SectionContent::CapabilityModule(config) => {
                capability_module::render(&mut buffer, config, context)?
            }
            SectionContent::ValidatedSchema(config) => schema::render(&mut buffer, config, context)?,
            SectionContent::Fragment(definition) => {
                self.fragments.render(&mut buffer, definition, context)?
            }
        }
        Ok(buffer.finish())
    }
}

fn interpolate_import(
    import: &ImportSpec,
    context: &TemplateContext,
) -> Result<ImportSpec, InterpolationError> {
    Ok(ImportSpec {
        from: interpolate(&import.from, context)?,
        items: import
            .items
            .iter()
            .map(|item| interpolate(item, context))
            .collect::<Result<_, _>>()?,
        type_only: import.type_only,
    })
}

fn active_imports<'a>(
    definition: &'a TemplateDefinition,
    context: &'a TemplateContext,
) -> impl Iterator<Item = &'a ImportSpec> {
    definition.imports.iter().chain(
        definition
            .conditionals
            .iter()
            .filter(move |block| context.is_truthy(&block.flag))
            .flat_map(|block| block.imports.iter()),
    )
}

/// Base sections then active conditional sections, minus gated-off fragments
fn active_sections<'a>(
    definition: &'a TemplateDefinition,
    context: &'a TemplateContext,
) -> impl Iterator<Item = &'a Section> {
    definition
        .sections
        .iter()
        .chain(
            definition
                .conditionals
                .iter()
                .filter(move |block| context.is_truthy(&block.flag))
                .flat_map(|block| block.sections.iter()),
        )
        .filter(move |section| match &section.content {
            SectionContent::Fragment(def) => is_active(def, context),
            _ => true,
        })
}
