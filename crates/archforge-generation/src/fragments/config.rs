//! Descriptors consumed by fragment renderers
//!
//! Every string in these types is *structural* (interpolated against the
//! context) except method bodies and implementation expressions, which are
//! emitted byte-for-byte.

use serde::{Deserialize, Serialize};

fn default_readonly() -> bool {
    true
}

/// A named, typed property of an error, interface or schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Property name
    pub name: String,
    /// Target-language type expression
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether the property may be absent
    #[serde(default)]
    pub optional: bool,
    /// Whether the property is emitted `readonly`
    #[serde(default = "default_readonly")]
    pub readonly: bool,
    /// One-line documentation
    #[serde(default)]
    pub doc: Option<String>,
}

impl FieldSpec {
    /// Required readonly field
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            optional: false,
            readonly: true,
            doc: None,
        }
    }

    /// Mark the field optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the field mutable
    pub fn mutable(mut self) -> Self {
        self.readonly = false;
        self
    }

    /// Attach documentation
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A function parameter, rendered `name: type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// Parameter type
    #[serde(rename = "type")]
    pub ty: String,
}

impl Param {
    /// Create a parameter
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A method exposed by a capability module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSpec {
    /// Method name
    pub name: String,
    /// Ordered parameters
    #[serde(default)]
    pub params: Vec<Param>,
    /// Return effect type
    pub returns: String,
    /// One-line documentation
    #[serde(default)]
    pub doc: Option<String>,
}

impl MethodSpec {
    /// Create a method signature
    pub fn new(name: impl Into<String>, params: Vec<Param>, returns: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params,
            returns: returns.into(),
            doc: None,
        }
    }

    /// Attach documentation
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A static factory on a tagged error; the body is opaque
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticMethod {
    /// Method name
    pub name: String,
    /// Ordered parameters
    #[serde(default)]
    pub params: Vec<Param>,
    /// Optional return type annotation
    #[serde(default)]
    pub returns: Option<String>,
    /// Method body, never interpolated
    pub body: String,
    /// One-line documentation
    #[serde(default)]
    pub doc: Option<String>,
}

impl StaticMethod {
    /// Create a static method
    pub fn new(name: impl Into<String>, params: Vec<Param>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params,
            returns: None,
            body: body.into(),
            doc: None,
        }
    }

    /// Annotate the return type
    pub fn returns(mut self, returns: impl Into<String>) -> Self {
        self.returns = Some(returns.into());
        self
    }

    /// Attach documentation
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A named environment implementation of a capability module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariant {
    /// Static member name, e.g. `Live` or `Test`
    pub name: String,
    /// Implementation expression, never interpolated
    pub implementation: String,
}

impl EnvironmentVariant {
    /// Create a variant
    pub fn new(name: impl Into<String>, implementation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            implementation: implementation.into(),
        }
    }
}

/// Tagged error class, e.g. `class NotFound extends Data.TaggedError("NotFound")`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedErrorConfig {
    /// Class name
    pub class_name: String,
    /// Discriminant tag; defaults to the class name
    #[serde(default)]
    pub tag: Option<String>,
    /// Class documentation
    #[serde(default)]
    pub doc: Option<String>,
    /// Error payload fields
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// Static factory methods
    #[serde(default)]
    pub static_methods: Vec<StaticMethod>,
}

/// Dependency-injection boundary, e.g. `class Repo extends Context.Tag("Repo")`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityModuleConfig {
    /// Service class name
    pub name: String,
    /// Tag identifier string; defaults to the service name
    #[serde(default)]
    pub tag: Option<String>,
    /// Class documentation
    #[serde(default)]
    pub doc: Option<String>,
    /// Ordered method signatures
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
    /// Static environment members, e.g. `Live`, `Test`, `Dev`
    #[serde(default)]
    pub environments: Vec<EnvironmentVariant>,
}

/// Top-level constructor of a validated schema
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaKind {
    /// `Schema.Struct({...})`
    #[default]
    Struct,
    /// `Schema.TaggedStruct("Tag", {...})`
    TaggedStruct,
    /// `class X extends Schema.Class<X>("X")({...}) {}`
    Class,
}

/// One field of a validated schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    /// Property name
    pub name: String,
    /// Schema expression, e.g. `Schema.String`
    pub schema: String,
    /// Whether the field is wrapped in `Schema.optional`
    #[serde(default)]
    pub optional: bool,
}

impl SchemaField {
    /// Required field
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            optional: false,
        }
    }

    /// Mark the field optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// A schema annotation rendered as `key: "value"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation key, e.g. `identifier`
    pub key: String,
    /// Annotation value, emitted as a string literal
    pub value: String,
}

impl Annotation {
    /// Create an annotation
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Validated data schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaConfig {
    /// Exported constant (or class) name
    pub name: String,
    /// Constructor kind
    #[serde(default)]
    pub kind: SchemaKind,
    /// Discriminant for tagged structs; defaults to the name
    #[serde(default)]
    pub tag: Option<String>,
    /// Documentation
    #[serde(default)]
    pub doc: Option<String>,
    /// Ordered fields
    #[serde(default)]
    pub fields: Vec<SchemaField>,
    /// Nominal brand
    #[serde(default)]
    pub brand: Option<String>,
    /// Ordered annotations
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Name of a derived `typeof X.Type` alias
    #[serde(default)]
    pub type_alias: Option<String>,
}

/// How a layer constructs its service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    /// `Layer.succeed(Tag, value)`
    #[default]
    Succeed,
    /// `Layer.effect(Tag, effect)`
    Effect,
    /// `Layer.scoped(Tag, effect)`
    Scoped,
    /// `Layer.sync(Tag, thunk)`
    Sync,
}

impl LayerKind {
    /// Constructor function name on `Layer`
    pub fn constructor(&self) -> &'static str {
        match self {
            LayerKind::Succeed => "succeed",
            LayerKind::Effect => "effect",
            LayerKind::Scoped => "scoped",
            LayerKind::Sync => "sync",
        }
    }
}

/// Named environment layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConfig {
    /// Exported constant name
    pub name: String,
    /// Construction kind
    #[serde(default)]
    pub kind: LayerKind,
    /// Service tag the layer provides
    pub target: String,
    /// Implementation expression, never interpolated
    pub implementation: String,
    /// Layers composed in with `Layer.provide`
    #[serde(default)]
    pub provides: Vec<String>,
    /// Documentation
    #[serde(default)]
    pub doc: Option<String>,
}

/// Closed set of fragment inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum FragmentConfig {
    /// Tagged error class
    TaggedError(TaggedErrorConfig),
    /// Capability module
    CapabilityModule(CapabilityModuleConfig),
    /// Validated schema
    ValidatedSchema(SchemaConfig),
    /// Environment layer
    Layer(LayerConfig),
}

impl FragmentConfig {
    /// Shape name, matching the built-in fragment type that renders it
    pub fn shape(&self) -> &'static str {
        match self {
            FragmentConfig::TaggedError(_) => "tagged-error",
            FragmentConfig::CapabilityModule(_) => "capability-module",
            FragmentConfig::ValidatedSchema(_) => "validated-schema",
            FragmentConfig::Layer(_) => "layer",
        }
    }
}

/// A fragment invocation inside a template section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentDefinition {
    /// Registered fragment type to dispatch to
    #[serde(rename = "type")]
    pub fragment_type: String,
    /// Renderer input
    pub config: FragmentConfig,
    /// Flag gating the fragment; rendered only when truthy
    #[serde(default)]
    pub condition: Option<String>,
}

impl FragmentDefinition {
    /// Invoke the built-in renderer for the config's shape
    pub fn new(config: FragmentConfig) -> Self {
        Self {
            fragment_type: config.shape().to_string(),
            config,
            condition: None,
        }
    }

    /// Dispatch to a specific registered type
    pub fn with_type(fragment_type: impl Into<String>, config: FragmentConfig) -> Self {
        Self {
            fragment_type: fragment_type.into(),
            config,
            condition: None,
        }
    }

    /// Gate on a context flag
    pub fn when(mut self, flag: impl Into<String>) -> Self {
        self.condition = Some(flag.into());
        self
    }
}

/// Visits every structural (interpolated) string of a descriptor
pub trait Structural {
    /// Call `visit` once per structural string, in declaration order
    fn visit_structural(&self, visit: &mut dyn FnMut(&str));
}

fn visit_opt(value: &Option<String>, visit: &mut dyn FnMut(&str)) {
    if let Some(value) = value {
        visit(value);
    }
}

impl Structural for FieldSpec {
    fn visit_structural(&self, visit: &mut dyn FnMut(&str)) {
        visit(&self.name);
        visit(&self.ty);
        visit_opt(&self.doc, visit);
    }
}

impl Structural for Param {
    fn visit_structural(&self, visit: &mut dyn FnMut(&str)) {
        visit(&self.name);
        visit(&self.ty);
    }
}

impl Structural for MethodSpec {
    fn visit_structural(&self, visit: &mut dyn FnMut(&str)) {
        visit(&self.name);
        self.params.iter().for_each(|p| p.visit_structural(visit));
        visit(&self.returns);
        visit_opt(&self.doc, visit);
    }
}

impl Structural for StaticMethod {
    fn visit_structural(&self, visit: &mut dyn FnMut(&str)) {
        visit(&self.name);
        self.params.iter().for_each(|p| p.visit_structural(visit));
        visit_opt(&self.returns, visit);
        visit_opt(&self.doc, visit);
    }
}

impl Structural for TaggedErrorConfig {
    fn visit_structural(&self, visit: &mut dyn FnMut(&str)) {
        visit(&self.class_name);
        visit_opt(&self.tag, visit);
        visit_opt(&self.doc, visit);
        self.fields.iter().for_each(|f| f.visit_structural(visit));
        self.static_methods.iter().for_each(|m| m.visit_structural(visit));
    }
}

impl Structural for CapabilityModuleConfig {
    fn visit_structural(&self, visit: &mut dyn FnMut(&str)) {
        visit(&self.name);
        visit_opt(&self.tag, visit);
        visit_opt(&self.doc, visit);
        self.methods.iter().for_each(|m| m.visit_structural(visit));
        self.environments.iter().for_each(|e| visit(&e.name));
    }
}

impl Structural for SchemaConfig {
    fn visit_structural(&self, visit: &mut dyn FnMut(&str)) {
        visit(&self.name);
        visit_opt(&self.tag, visit);
        visit_opt(&self.doc, visit);
        for field in &self.fields {
            visit(&field.name);
            visit(&field.schema);
        }
        visit_opt(&self.brand, visit);
        for annotation in &self.annotations {
            visit(&annotation.key);
            visit(&annotation.value);
        }
        visit_opt(&self.type_alias, visit);
    }
}

impl Structural for LayerConfig {
    fn visit_structural(&self, visit: &mut dyn FnMut(&str)) {
        visit(&self.name);
        visit(&self.target);
        self.provides.iter().for_each(|p| visit(p));
        visit_opt(&self.doc, visit);
    }
}

impl Structural for FragmentConfig {
    fn visit_structural(&self, visit: &mut dyn FnMut(&str)) {
        match self {
            FragmentConfig::TaggedError(c) => c.visit_structural(visit),
            FragmentConfig::CapabilityModule(c) => c.visit_structural(visit),
            FragmentConfig::ValidatedSchema(c) => c.visit_structural(visit),
            FragmentConfig::Layer(c) => c.visit_structural(visit),
        }
    }
}
