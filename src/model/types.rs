use crate::store::{ComponentId, EntryPoint, Parameter, TypeName};
use smallvec::SmallVec;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ModelId(pub u32);

impl ModelId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// An opaque, already-rendered code fragment. The assembler only orders
/// statements; it never looks inside them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement(pub String);

impl Statement {
    pub fn new(code: impl Into<String>) -> Self { Self(code.into()) }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
}

impl Modifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
        }
    }
}

pub type Modifiers = SmallVec<[Modifier; 3]>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterModel {
    pub name: String,
    pub type_name: TypeName,
    pub modifiers: Modifiers,
}

impl ParameterModel {
    pub fn new(name: impl Into<String>, type_name: TypeName) -> Self {
        Self { name: name.into(), type_name, modifiers: Modifiers::new() }
    }

    pub fn to_final(&self) -> Self {
        let mut param = self.clone();
        param.modifiers.push(Modifier::Final);
        param
    }
}

impl From<&Parameter> for ParameterModel {
    fn from(param: &Parameter) -> Self {
        Self::new(param.name.clone(), param.type_name.clone())
    }
}

const CONSTRUCTOR_NAME: &str = "<init>";

/// A method, constructor, or static factory of a generated type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodModel {
    pub name: String,
    pub modifiers: Modifiers,
    pub annotations: Vec<String>,
    /// `None` for constructors and `void` methods.
    pub return_type: Option<TypeName>,
    pub parameters: Vec<ParameterModel>,
    pub body: Vec<Statement>,
}

impl MethodModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::new(),
            annotations: Vec::new(),
            return_type: None,
            parameters: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn constructor() -> Self { Self::new(CONSTRUCTOR_NAME) }

    pub fn is_constructor(&self) -> bool { self.name == CONSTRUCTOR_NAME }

    pub fn with_modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers.extend_from_slice(modifiers);
        self
    }

    pub fn returns(mut self, return_type: TypeName) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<ParameterModel>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn statement(mut self, code: impl Into<String>) -> Self {
        self.body.push(Statement::new(code));
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool { self.modifiers.contains(&modifier) }
}

/// Identity of a component method for de-duplication: name plus ordered
/// parameter types. The return type does not take part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: String,
    pub parameter_types: Vec<TypeName>,
}

impl From<&EntryPoint> for MethodSignature {
    fn from(entry_point: &EntryPoint) -> Self {
        Self {
            name: entry_point.name.clone(),
            parameter_types: entry_point.parameters.iter().map(|p| p.type_name.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// The builder of a root component.
    ComponentBuilder,
    /// The builder of a subcomponent, nested in whichever model hosts it.
    SubcomponentBuilder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldModel {
    pub name: String,
    pub type_name: TypeName,
}

/// A nested type emitted alongside a component implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeModel {
    pub kind: TypeKind,
    pub name: TypeName,
    pub supertype: Option<TypeName>,
    pub fields: Vec<FieldModel>,
    pub methods: Vec<MethodModel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderModel {
    pub name: TypeName,
    /// The user's builder interface, when one is declared.
    pub definition_type: Option<TypeName>,
    pub build_method: String,
}

/// The assembled, emission-ready description of one component implementation.
///
/// Mutated only while its component is being assembled, then frozen.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedComponentModel {
    pub name: TypeName,
    pub component: ComponentId,
    pub parent: Option<ModelId>,
    pub is_abstract: bool,
    pub is_root: bool,
    pub supertypes: Vec<TypeName>,
    pub builder: Option<BuilderModel>,
    pub types: Vec<TypeModel>,
    pub factory_methods: Vec<MethodModel>,
    pub component_methods: Vec<MethodModel>,
    pub subcomponents: Vec<ModelId>,
    pub initialization_statements: Vec<Statement>,
    pub initialize_methods: Vec<MethodModel>,
    pub constructor: Option<MethodModel>,
    frozen: bool,
}

impl GeneratedComponentModel {
    pub(crate) fn new(name: TypeName, component: ComponentId, parent: Option<ModelId>, is_root: bool, is_abstract: bool) -> Self {
        Self {
            name,
            component,
            parent,
            is_abstract,
            is_root,
            supertypes: Vec::new(),
            builder: None,
            types: Vec::new(),
            factory_methods: Vec::new(),
            component_methods: Vec::new(),
            subcomponents: Vec::new(),
            initialization_statements: Vec::new(),
            initialize_methods: Vec::new(),
            constructor: None,
            frozen: false,
        }
    }

    /// Nested models get a constructor that the parent calls directly.
    pub fn is_nested(&self) -> bool { self.parent.is_some() }

    pub fn is_frozen(&self) -> bool { self.frozen }

    fn check_mutable(&self) {
        assert!(!self.frozen, "BUG: GeneratedComponentModel for [{}] is frozen and cannot be modified.", self.name);
    }

    pub(crate) fn add_supertype(&mut self, supertype: TypeName) {
        self.check_mutable();
        self.supertypes.push(supertype);
    }

    pub(crate) fn set_builder(&mut self, builder: BuilderModel) {
        self.check_mutable();
        self.builder = Some(builder);
    }

    pub(crate) fn add_type(&mut self, type_model: TypeModel) {
        self.check_mutable();
        self.types.push(type_model);
    }

    pub(crate) fn add_factory_method(&mut self, method: MethodModel) {
        self.check_mutable();
        self.factory_methods.push(method);
    }

    pub(crate) fn add_component_method(&mut self, method: MethodModel) {
        self.check_mutable();
        self.component_methods.push(method);
    }

    pub(crate) fn add_subcomponent(&mut self, child: ModelId) {
        self.check_mutable();
        self.subcomponents.push(child);
    }

    pub(crate) fn add_initializations(&mut self, statements: impl IntoIterator<Item = Statement>) {
        self.check_mutable();
        self.initialization_statements.extend(statements);
    }

    pub(crate) fn add_initialize_method(&mut self, method: MethodModel) {
        self.check_mutable();
        self.initialize_methods.push(method);
    }

    pub(crate) fn set_constructor(&mut self, constructor: MethodModel) {
        self.check_mutable();
        self.constructor = Some(constructor);
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }
}

/// Every model produced by one assembly pass, addressed by `ModelId`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentModelTree {
    pub(crate) models: Vec<GeneratedComponentModel>,
    pub(crate) root: ModelId,
}

impl ComponentModelTree {
    pub fn root(&self) -> &GeneratedComponentModel { self.get(self.root) }

    pub fn root_id(&self) -> ModelId { self.root }

    pub fn get(&self, id: ModelId) -> &GeneratedComponentModel { &self.models[id.index()] }

    pub fn len(&self) -> usize { self.models.len() }

    pub fn is_empty(&self) -> bool { self.models.is_empty() }

    pub fn subcomponents(&self, id: ModelId) -> impl Iterator<Item = &GeneratedComponentModel> + '_ {
        self.get(id).subcomponents.iter().map(move |c| self.get(*c))
    }

    pub fn parent(&self, id: ModelId) -> Option<&GeneratedComponentModel> {
        self.get(id).parent.map(|p| self.get(p))
    }

    pub fn find(&self, name: &str) -> Option<&GeneratedComponentModel> {
        self.models.iter().find(|m| m.name.as_str() == name)
    }
}
