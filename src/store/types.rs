use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

impl ComponentId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct BindingId(pub u32);

impl BindingId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// A lifetime tier attached to a component or a binding.
///
/// Identity is the annotation name plus its optional attribute value
/// (e.g. `Per(MyComponent.class)`). `reusable` marks the non-retainable
/// scope; it does not take part in equality.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub name: String,
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub reusable: bool,
}

impl Scope {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attribute: None, reusable: false }
    }

    pub fn with_attribute(name: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self { name: name.into(), attribute: Some(attribute.into()), reusable: false }
    }

    /// The conventional widest-lifetime scope.
    pub fn singleton() -> Self { Self::new("Singleton") }

    pub fn reusable() -> Self {
        Self { name: "Reusable".into(), attribute: None, reusable: true }
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.attribute == other.attribute
    }
}

impl Hash for Scope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.attribute.hash(state);
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some(attr) => write!(f, "@{}({})", self.name, attr),
            None => write!(f, "@{}", self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    /// A module method that returns the bound value (`@Provides`).
    Provision,
    /// An alias from one key to another (`@Binds`).
    Delegate,
    /// A type with an injectable constructor.
    InjectedConstructor,
    /// An instance handed to the builder.
    Instance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub kind: BindingKind,
    pub scope: Option<Scope>,
    pub owner: ComponentId,
    /// Human readable identity, only used in diagnostics.
    pub description: String,
    /// Name of the generated factory/field the binding is served from.
    pub key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Component,
    Subcomponent,
}

/// A fully qualified (possibly nested) type name, e.g. `test.Outer.Inner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TypeName(pub String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self { Self(name.into()) }

    pub fn nested(&self, simple_name: &str) -> Self {
        Self(format!("{}.{}", self.0, simple_name))
    }

    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: TypeName,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self { name: name.into(), type_name: TypeName::new(type_name) }
    }
}

/// An externally visible request method declared on the component interface
/// (or on one of its supertypes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub name: String,
    pub return_type: Option<TypeName>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Key of the binding that satisfies the request.
    pub key: String,
}

/// The user-declared builder API, if the component declares one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BuilderSpec {
    pub definition_type: Option<TypeName>,
    pub build_method: Option<String>,
}

/// The parent method that creates a subcomponent directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryMethod {
    pub name: String,
    pub return_type: TypeName,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRequirement {
    pub name: String,
    pub type_name: TypeName,
    /// True when the requirement cannot be constructed without the caller
    /// supplying an instance (abstract module, module with constructor
    /// arguments, component dependency).
    pub requires_passed_instance: bool,
}

/// Everything the resolver knows about a component's declared API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub definition_type: TypeName,
    /// Names of every method declared locally or inherited by the definition type.
    #[serde(default)]
    pub declared_methods: Vec<String>,
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
    #[serde(default)]
    pub builder: Option<BuilderSpec>,
    #[serde(default)]
    pub factory_method: Option<FactoryMethod>,
    #[serde(default)]
    pub requirements: Vec<ComponentRequirement>,
}

impl ComponentDescriptor {
    pub fn new(definition_type: impl Into<String>) -> Self {
        Self { definition_type: TypeName::new(definition_type), ..Default::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    pub name: String,
    pub kind: ComponentKind,
    pub scope: Option<Scope>,
    pub explicit_dependencies: Vec<ComponentId>,
    pub parent: Option<ComponentId>,
    pub bindings: Vec<BindingId>,
    pub children: smallvec::SmallVec<[ComponentId; 4]>,
    pub descriptor: ComponentDescriptor,
}

impl ComponentNode {
    pub fn is_top_level(&self) -> bool { self.parent.is_none() }

    pub fn is_scoped(&self) -> bool { self.scope.is_some() }
}
