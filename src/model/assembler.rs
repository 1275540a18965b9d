//! Assembles the generated-implementation model for a component tree.
//!
//! One `ComponentModelBuilder` produces one `ComponentModelTree`. Each node is
//! assembled in a fixed sequence (supertype, builder class, method-name
//! claims, factory methods, component methods, initializations,
//! subcomponents, constructor) because later steps read the claims and
//! method lists written by earlier ones.
use super::expressions::BindingExpressions;
use super::names::NameAllocator;
use super::types::{
    BuilderModel, ComponentModelTree, FieldModel, GeneratedComponentModel, MethodModel, MethodSignature, ModelId,
    Modifier, ParameterModel, Statement, TypeKind, TypeModel,
};
use crate::config::CompilerOptions;
use crate::store::{BuilderSpec, ComponentId, ComponentNode, GraphRegistry, TypeName};
use std::collections::HashSet;
use tracing::debug;

/// Upper bound on statements per generated `initialize` method.
pub const INITIALIZATIONS_PER_INITIALIZE_METHOD: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssemblyMode {
    /// A complete, instantiable implementation.
    Concrete,
    /// A reusable partial implementation, specialized by a later pass.
    AbstractBase,
}

/// The three node behaviors. Selected per node from context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Root,
    ConcreteSubcomponent,
    BaseSubcomponent,
}

/// Behaviors that differ between variants.
struct Strategy {
    add_builder_class: fn(&mut Pass<'_>, ModelId, &BuilderSpec),
    add_factory_methods: fn(&mut Pass<'_>, ModelId),
    add_subcomponents: fn(&mut Pass<'_>, ModelId),
}

static ROOT: Strategy = Strategy {
    add_builder_class: root_builder_class,
    add_factory_methods: root_factory_methods,
    add_subcomponents: concrete_subcomponents,
};

static CONCRETE_SUBCOMPONENT: Strategy = Strategy {
    add_builder_class: subcomponent_builder_class,
    add_factory_methods: subcomponent_factory_methods,
    add_subcomponents: concrete_subcomponents,
};

// Abstract inner subcomponents are deferred to the concrete pass.
static BASE_SUBCOMPONENT: Strategy = Strategy {
    add_builder_class: base_builder_class,
    add_factory_methods: skip,
    add_subcomponents: skip,
};

impl VariantKind {
    fn strategy(self) -> &'static Strategy {
        match self {
            VariantKind::Root => &ROOT,
            VariantKind::ConcreteSubcomponent => &CONCRETE_SUBCOMPONENT,
            VariantKind::BaseSubcomponent => &BASE_SUBCOMPONENT,
        }
    }
}

/// Builds the model tree for one root component.
///
/// Only intended to be built once: `build` claims names from the allocator
/// as a side effect, so a second call panics. Use a new builder to
/// regenerate.
pub struct ComponentModelBuilder<'a> {
    registry: &'a GraphRegistry,
    options: &'a CompilerOptions,
    root: ComponentId,
    name: TypeName,
    mode: AssemblyMode,
    done: bool,
}

impl<'a> ComponentModelBuilder<'a> {
    pub fn new(
        registry: &'a GraphRegistry,
        root: ComponentId,
        name: TypeName,
        mode: AssemblyMode,
        options: &'a CompilerOptions,
    ) -> Self {
        Self { registry, options, root, name, mode, done: false }
    }

    pub fn build(
        &mut self,
        names: &mut dyn NameAllocator,
        expressions: &mut dyn BindingExpressions,
    ) -> ComponentModelTree {
        assert!(!self.done, "BUG: ComponentModelBuilder has already built the model for [{}].", self.name);

        let node = self.registry.node(self.root);
        let variant = if self.mode == AssemblyMode::AbstractBase || !node.is_top_level() {
            assert!(
                self.options.ahead_of_time_subcomponents,
                "BUG: building an abstract base implementation of [{}] when not generating ahead-of-time subcomponents.",
                node.descriptor.definition_type
            );
            VariantKind::BaseSubcomponent
        } else {
            VariantKind::Root
        };

        let mut pass = Pass { registry: self.registry, models: Vec::new(), assembled: HashSet::new(), names, expressions };
        let root = pass.assemble(self.root, self.name.clone(), None, variant);
        self.done = true;

        ComponentModelTree { models: pass.models, root }
    }
}

/// State of a single assembly pass. Owns the model arena while it grows.
struct Pass<'a> {
    registry: &'a GraphRegistry,
    models: Vec<GeneratedComponentModel>,
    assembled: HashSet<ComponentId>,
    names: &'a mut dyn NameAllocator,
    expressions: &'a mut dyn BindingExpressions,
}

impl<'a> Pass<'a> {
    fn assemble(&mut self, component: ComponentId, name: TypeName, parent: Option<ModelId>, variant: VariantKind) -> ModelId {
        let registry = self.registry;
        let node = registry.node(component);
        assert!(self.assembled.insert(component), "BUG: component [{}] was already assembled in this pass.", node.name);

        let id = ModelId::new(self.models.len());
        let is_root = variant == VariantKind::Root;
        let is_abstract = variant == VariantKind::BaseSubcomponent;
        self.models.push(GeneratedComponentModel::new(name, component, parent, is_root, is_abstract));
        let strategy = variant.strategy();

        self.model_mut(id).add_supertype(node.descriptor.definition_type.clone());
        // Top-level components always get a builder; subcomponents only when they declare one.
        let builder = match (&node.descriptor.builder, variant) {
            (Some(spec), _) => Some(spec.clone()),
            (None, VariantKind::Root) => Some(BuilderSpec::default()),
            (None, _) => None,
        };
        if let Some(spec) = builder {
            (strategy.add_builder_class)(self, id, &spec);
        }

        let owner = self.model(id).name.clone();
        for method in &node.descriptor.declared_methods {
            self.names.claim_method_name(&owner, method);
        }

        (strategy.add_factory_methods)(self, id);
        self.add_component_methods(id, node);
        self.add_initializations(id, node);
        (strategy.add_subcomponents)(self, id);
        self.add_constructor(id, node);

        let model = self.model_mut(id);
        model.freeze();
        debug!(
            model = %model.name,
            variant = ?variant,
            component_methods = model.component_methods.len(),
            initialize_methods = model.initialize_methods.len(),
            "assembled component model"
        );
        id
    }

    fn model(&self, id: ModelId) -> &GeneratedComponentModel { &self.models[id.index()] }

    fn model_mut(&mut self, id: ModelId) -> &mut GeneratedComponentModel { &mut self.models[id.index()] }

    /// One method per distinct signature, first declaration wins.
    fn add_component_methods(&mut self, id: ModelId, node: &ComponentNode) {
        let mut seen = HashSet::new();

        for entry_point in &node.descriptor.entry_points {
            if !seen.insert(MethodSignature::from(entry_point)) {
                continue;
            }
            let expression = self.expressions.request_expression(node, entry_point);
            let method = MethodModel::new(entry_point.name.clone())
                .with_modifiers(&[Modifier::Public])
                .annotated("Override")
                .with_parameters(entry_point.parameters.iter().map(ParameterModel::from).collect());
            let method = match &entry_point.return_type {
                Some(return_type) => method.returns(return_type.clone()).statement(format!("return {};", expression)),
                None => method.statement(format!("{};", expression)),
            };
            self.model_mut(id).add_component_method(method);
        }
    }

    fn add_initializations(&mut self, id: ModelId, node: &ComponentNode) {
        let registry = self.registry;
        for binding in registry.bindings_of(self.model(id).component) {
            let statements = self.expressions.initialization(node, binding);
            self.model_mut(id).add_initializations(statements);
        }
    }

    /// Splits the initializations into `initialize` batches and emits the
    /// constructor that runs them in order.
    fn add_constructor(&mut self, id: ModelId, node: &ComponentNode) {
        let model = self.model(id);
        let parameters = constructor_parameters(model, node);
        let initialize_parameters: Vec<_> = parameters.iter().map(ParameterModel::to_final).collect();
        let arguments = parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ");
        let visibility = if model.is_abstract { Modifier::Protected } else { Modifier::Private };

        let owner = model.name.clone();
        let batches: Vec<Vec<Statement>> = model
            .initialization_statements
            .chunks(INITIALIZATIONS_PER_INITIALIZE_METHOD)
            .map(<[Statement]>::to_vec)
            .collect();

        let mut constructor = MethodModel::constructor().with_modifiers(&[visibility]).with_parameters(parameters);
        for batch in batches {
            let method_name = self.names.unique_method_name(&owner, "initialize");
            constructor = constructor.statement(format!("{}({});", method_name, arguments));

            let mut initialize = MethodModel::new(method_name)
                .with_modifiers(&[Modifier::Private])
                .annotated("SuppressWarnings(\"unchecked\")")
                .with_parameters(initialize_parameters.clone());
            initialize.body = batch;
            self.model_mut(id).add_initialize_method(initialize);
        }
        self.model_mut(id).set_constructor(constructor);
    }

    /// The nested builder type for `id`, with one field and setter per requirement.
    fn builder_type(&self, id: ModelId, kind: TypeKind, name: TypeName, spec: &BuilderSpec) -> (TypeModel, BuilderModel) {
        let model = self.model(id);
        let node = self.registry.node(model.component);
        let build_method = spec.build_method.clone().unwrap_or_else(|| "build".to_string());
        let setter_returns = spec.definition_type.clone().unwrap_or_else(|| name.clone());

        let mut fields = Vec::with_capacity(node.descriptor.requirements.len());
        let mut methods = Vec::with_capacity(node.descriptor.requirements.len() + 1);
        for requirement in &node.descriptor.requirements {
            fields.push(FieldModel { name: requirement.name.clone(), type_name: requirement.type_name.clone() });
            methods.push(
                MethodModel::new(requirement.name.clone())
                    .with_modifiers(&[Modifier::Public])
                    .returns(setter_returns.clone())
                    .with_parameters(vec![ParameterModel::new(requirement.name.clone(), requirement.type_name.clone())])
                    .statement(format!("this.{0} = {0};", requirement.name))
                    .statement("return this;"),
            );
        }
        methods.push(
            MethodModel::new(build_method.clone())
                .with_modifiers(&[Modifier::Public])
                .returns(node.descriptor.definition_type.clone())
                .statement(format!("return new {}(this);", model.name.simple_name())),
        );

        let type_model = TypeModel { kind, name: name.clone(), supertype: spec.definition_type.clone(), fields, methods };
        let builder = BuilderModel { name, definition_type: spec.definition_type.clone(), build_method };
        (type_model, builder)
    }
}

fn constructor_parameters(model: &GeneratedComponentModel, node: &ComponentNode) -> Vec<ParameterModel> {
    if let Some(builder) = &model.builder {
        vec![ParameterModel::new("builder", builder.name.clone())]
    } else if let Some(factory_method) = &node.descriptor.factory_method {
        factory_method.parameters.iter().map(ParameterModel::from).collect()
    } else if model.is_abstract && !model.is_nested() {
        Vec::new()
    } else {
        panic!("BUG: expected either a component builder or factory method for [{}] but found neither.", model.name);
    }
}

fn parent_of(pass: &Pass<'_>, id: ModelId) -> ModelId {
    match pass.model(id).parent {
        Some(parent) => parent,
        None => panic!("BUG: subcomponent model [{}] has no parent.", pass.model(id).name),
    }
}

/// `Child2Impl` -> `Child2`
fn unique_simple_name(model: &GeneratedComponentModel) -> &str {
    let simple = model.name.simple_name();
    simple.strip_suffix("Impl").unwrap_or(simple)
}

fn skip(_: &mut Pass<'_>, _: ModelId) {}

fn root_builder_class(pass: &mut Pass<'_>, id: ModelId, spec: &BuilderSpec) {
    let name = pass.model(id).name.nested("Builder");
    let (type_model, builder) = pass.builder_type(id, TypeKind::ComponentBuilder, name, spec);
    let model = pass.model_mut(id);
    model.set_builder(builder);
    model.add_type(type_model);
}

fn subcomponent_builder_class(pass: &mut Pass<'_>, id: ModelId, spec: &BuilderSpec) {
    let parent = parent_of(pass, id);
    let name = pass.model(parent).name.nested(&format!("{}Builder", unique_simple_name(pass.model(id))));
    let (type_model, builder) = pass.builder_type(id, TypeKind::SubcomponentBuilder, name, spec);
    pass.model_mut(id).set_builder(builder);
    pass.model_mut(parent).add_type(type_model);
}

fn base_builder_class(pass: &mut Pass<'_>, id: ModelId, spec: &BuilderSpec) {
    let model = pass.model(id);
    let definition = &pass.registry.node(model.component).descriptor.definition_type;
    let name = model.name.nested(&format!("{}Builder", definition.simple_name()));
    let (type_model, builder) = pass.builder_type(id, TypeKind::SubcomponentBuilder, name, spec);
    let model = pass.model_mut(id);
    model.set_builder(builder);
    model.add_type(type_model);
}

/// `builder()` always; `create()` only when every requirement can be
/// instantiated without a caller-supplied instance.
fn root_factory_methods(pass: &mut Pass<'_>, id: ModelId) {
    let registry = pass.registry;
    let model = pass.model_mut(id);
    let descriptor = &registry.node(model.component).descriptor;
    let Some(builder) = model.builder.clone() else {
        panic!("BUG: root component [{}] has no builder.", model.name);
    };

    let builder_returns = builder.definition_type.clone().unwrap_or_else(|| builder.name.clone());
    model.add_factory_method(
        MethodModel::new("builder")
            .with_modifiers(&[Modifier::Public, Modifier::Static])
            .returns(builder_returns)
            .statement(format!("return new {}();", builder.name.simple_name())),
    );

    if descriptor.requirements.iter().all(|r| !r.requires_passed_instance) {
        model.add_factory_method(
            MethodModel::new("create")
                .with_modifiers(&[Modifier::Public, Modifier::Static])
                .returns(descriptor.definition_type.clone())
                .statement(format!("return new Builder().{}();", builder.build_method)),
        );
    }
}

/// Overrides the parent's factory method for this subcomponent, when it is
/// created through one rather than installed by a module.
fn subcomponent_factory_methods(pass: &mut Pass<'_>, id: ModelId) {
    let registry = pass.registry;
    let model = pass.model(id);
    let Some(factory_method) = &registry.node(model.component).descriptor.factory_method else {
        return;
    };

    let arguments = factory_method.parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ");
    let method = MethodModel::new(factory_method.name.clone())
        .with_modifiers(&[Modifier::Public])
        .annotated("Override")
        .returns(factory_method.return_type.clone())
        .with_parameters(factory_method.parameters.iter().map(ParameterModel::from).collect())
        .statement(format!("return new {}({});", model.name.simple_name(), arguments));

    let parent = parent_of(pass, id);
    pass.model_mut(parent).add_component_method(method);
}

fn concrete_subcomponents(pass: &mut Pass<'_>, id: ModelId) {
    let registry = pass.registry;
    let component = pass.model(id).component;

    for &child in registry.children(component) {
        let simple_name = pass.names.unique_subcomponent_name(registry.node(child));
        let name = pass.model(id).name.nested(&format!("{}Impl", simple_name));
        let child_id = pass.assemble(child, name, Some(id), VariantKind::ConcreteSubcomponent);
        pass.model_mut(id).add_subcomponent(child_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProviderFieldExpressions, ScopedNames};
    use crate::store::{
        BindingKind, ComponentDescriptor, ComponentRequirement, EntryPoint, FactoryMethod, Parameter,
    };
    use rstest::rstest;

    fn build(registry: &GraphRegistry, root: ComponentId) -> ComponentModelTree {
        let options = CompilerOptions::default();
        let mut builder =
            ComponentModelBuilder::new(registry, root, TypeName::new("GeneratedApp"), AssemblyMode::Concrete, &options);
        builder.build(&mut ScopedNames::new(), &mut ProviderFieldExpressions)
    }

    fn app(registry: &mut GraphRegistry) -> ComponentId {
        registry.add_component("test.App", None, ComponentDescriptor::new("test.App")).unwrap()
    }

    fn entry_point(name: &str, return_type: &str, key: &str) -> EntryPoint {
        EntryPoint { name: name.into(), return_type: Some(TypeName::new(return_type)), parameters: Vec::new(), key: key.into() }
    }

    fn body(method: &MethodModel) -> Vec<String> {
        method.body.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(100, 1)]
    #[case(101, 2)]
    #[case(250, 3)]
    fn test_initializations_are_batched(#[case] statements: usize, #[case] batches: usize) {
        let mut registry = GraphRegistry::new();
        let root = app(&mut registry);
        for i in 0..statements {
            registry.add_binding(root, BindingKind::Provision, None, format!("B{} test.M.b{}()", i, i), format!("b{}", i)).unwrap();
        }

        let tree = build(&registry, root);
        let model = tree.root();
        assert_eq!(model.initialize_methods.len(), batches);

        let flattened: Vec<Statement> = model.initialize_methods.iter().flat_map(|m| m.body.clone()).collect();
        assert_eq!(flattened, model.initialization_statements);
        assert!(model.initialize_methods.iter().all(|m| m.body.len() <= INITIALIZATIONS_PER_INITIALIZE_METHOD));

        let expected_calls: Vec<String> = model.initialize_methods.iter().map(|m| format!("{}(builder);", m.name)).collect();
        assert_eq!(body(model.constructor.as_ref().unwrap()), expected_calls);
    }

    #[test]
    fn test_batches_are_named_and_annotated() {
        let mut registry = GraphRegistry::new();
        let root = app(&mut registry);
        for i in 0..201 {
            registry.add_binding(root, BindingKind::Provision, None, format!("B{}", i), format!("b{}", i)).unwrap();
        }

        let tree = build(&registry, root);
        let methods = &tree.root().initialize_methods;
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["initialize", "initialize2", "initialize3"]);
        assert_eq!(body(&methods[0])[0], "this.b0Provider = B0_Factory.create();");
        assert_eq!(body(&methods[2]), ["this.b200Provider = B200_Factory.create();"]);

        let method = &methods[0];
        assert!(method.has_modifier(Modifier::Private));
        assert_eq!(method.annotations, ["SuppressWarnings(\"unchecked\")"]);
        assert!(method.parameters[0].modifiers.contains(&Modifier::Final));
    }

    #[test]
    fn test_declared_initialize_method_is_not_reused() {
        let mut registry = GraphRegistry::new();
        let mut descriptor = ComponentDescriptor::new("test.App");
        descriptor.declared_methods = vec!["initialize".into()];
        let root = registry.add_component("test.App", None, descriptor).unwrap();
        registry.add_binding(root, BindingKind::Provision, None, "String test.M.s()", "string").unwrap();

        let tree = build(&registry, root);
        assert_eq!(tree.root().initialize_methods[0].name, "initialize2");
    }

    #[test]
    fn test_root_builder_and_factory_methods() {
        let mut registry = GraphRegistry::new();
        let root = app(&mut registry);

        let tree = build(&registry, root);
        let model = tree.root();
        assert!(model.is_root);
        assert_eq!(model.supertypes, [TypeName::new("test.App")]);
        assert_eq!(model.types.len(), 1);
        assert_eq!(model.types[0].kind, TypeKind::ComponentBuilder);
        assert_eq!(model.types[0].name.as_str(), "GeneratedApp.Builder");

        let factories: Vec<&str> = model.factory_methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(factories, ["builder", "create"]);
        assert_eq!(body(&model.factory_methods[0]), ["return new Builder();"]);
        assert_eq!(body(&model.factory_methods[1]), ["return new Builder().build();"]);
        assert!(model.factory_methods[1].has_modifier(Modifier::Static));

        let constructor = model.constructor.as_ref().unwrap();
        assert!(constructor.has_modifier(Modifier::Private));
        assert_eq!(constructor.parameters, [ParameterModel::new("builder", TypeName::new("GeneratedApp.Builder"))]);
        assert!(model.is_frozen());
    }

    #[test]
    fn test_user_builder_and_required_instance() {
        let mut registry = GraphRegistry::new();
        let mut descriptor = ComponentDescriptor::new("test.App");
        descriptor.builder = Some(BuilderSpec {
            definition_type: Some(TypeName::new("test.App.Builder")),
            build_method: Some("make".into()),
        });
        descriptor.requirements = vec![ComponentRequirement {
            name: "parentModule".into(),
            type_name: TypeName::new("test.ParentModule"),
            requires_passed_instance: true,
        }];
        let root = registry.add_component("test.App", None, descriptor).unwrap();

        let tree = build(&registry, root);
        let model = tree.root();
        assert_eq!(model.factory_methods.len(), 1);
        assert_eq!(model.factory_methods[0].return_type, Some(TypeName::new("test.App.Builder")));

        let builder_type = &model.types[0];
        assert_eq!(builder_type.supertype, Some(TypeName::new("test.App.Builder")));
        assert_eq!(builder_type.fields[0].name, "parentModule");
        let methods: Vec<&str> = builder_type.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(methods, ["parentModule", "make"]);
        assert_eq!(body(&builder_type.methods[1]), ["return new GeneratedApp(this);"]);
    }

    #[test]
    fn test_component_methods_collapse_by_signature() {
        let mut registry = GraphRegistry::new();
        let mut descriptor = ComponentDescriptor::new("test.App");
        descriptor.entry_points = vec![
            entry_point("string", "java.lang.String", "string"),
            entry_point("string", "java.lang.CharSequence", "string"),
            entry_point("number", "java.lang.Integer", "number"),
        ];
        let root = registry.add_component("test.App", None, descriptor).unwrap();

        let tree = build(&registry, root);
        let methods = &tree.root().component_methods;
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].return_type, Some(TypeName::new("java.lang.String")));
        assert_eq!(body(&methods[0]), ["return stringProvider.get();"]);
        assert_eq!(methods[1].name, "number");
    }

    #[test]
    fn test_subcomponent_factory_method_constructor() {
        let mut registry = GraphRegistry::new();
        let root = app(&mut registry);
        let mut child = ComponentDescriptor::new("test.Child");
        child.factory_method = Some(FactoryMethod {
            name: "child".into(),
            return_type: TypeName::new("test.Child"),
            parameters: vec![Parameter::new("module", "test.ChildModule")],
        });
        registry.add_subcomponent(root, "test.Child", None, child).unwrap();

        let tree = build(&registry, root);
        assert_eq!(tree.len(), 2);
        let child = tree.subcomponents(tree.root_id()).next().unwrap();
        assert_eq!(child.name.as_str(), "GeneratedApp.ChildImpl");
        assert!(child.is_nested());
        assert_eq!(tree.parent(ModelId(1)).unwrap().name.as_str(), "GeneratedApp");

        let constructor = child.constructor.as_ref().unwrap();
        assert_eq!(constructor.parameters, [ParameterModel::new("module", TypeName::new("test.ChildModule"))]);

        let overriding = &tree.root().component_methods[0];
        assert_eq!(overriding.name, "child");
        assert_eq!(overriding.annotations, ["Override"]);
        assert_eq!(body(overriding), ["return new ChildImpl(module);"]);
    }

    #[test]
    fn test_subcomponent_builder_wins_over_factory_method() {
        let mut registry = GraphRegistry::new();
        let root = app(&mut registry);
        let mut child = ComponentDescriptor::new("test.Child");
        child.builder = Some(BuilderSpec::default());
        child.factory_method = Some(FactoryMethod {
            name: "child".into(),
            return_type: TypeName::new("test.Child"),
            parameters: vec![Parameter::new("module", "test.ChildModule")],
        });
        registry.add_subcomponent(root, "test.Child", None, child).unwrap();

        let tree = build(&registry, root);
        let child = tree.subcomponents(tree.root_id()).next().unwrap();
        let constructor = child.constructor.as_ref().unwrap();
        assert_eq!(constructor.parameters, [ParameterModel::new("builder", TypeName::new("GeneratedApp.ChildBuilder"))]);
    }

    #[test]
    fn test_subcomponent_builder_is_nested_in_parent() {
        let mut registry = GraphRegistry::new();
        let root = app(&mut registry);
        let mut first = ComponentDescriptor::new("a.Child");
        first.builder = Some(BuilderSpec::default());
        let mut second = ComponentDescriptor::new("b.Child");
        second.builder = Some(BuilderSpec::default());
        registry.add_subcomponent(root, "a.Child", None, first).unwrap();
        registry.add_subcomponent(root, "b.Child", None, second).unwrap();

        let tree = build(&registry, root);
        let names: Vec<&str> = tree.subcomponents(tree.root_id()).map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["GeneratedApp.ChildImpl", "GeneratedApp.Child2Impl"]);

        let types: Vec<(&str, TypeKind)> = tree.root().types.iter().map(|t| (t.name.as_str(), t.kind)).collect();
        assert_eq!(
            types,
            [
                ("GeneratedApp.Builder", TypeKind::ComponentBuilder),
                ("GeneratedApp.ChildBuilder", TypeKind::SubcomponentBuilder),
                ("GeneratedApp.Child2Builder", TypeKind::SubcomponentBuilder),
            ]
        );
        let second = tree.find("GeneratedApp.Child2Impl").unwrap();
        assert_eq!(
            second.constructor.as_ref().unwrap().parameters,
            [ParameterModel::new("builder", TypeName::new("GeneratedApp.Child2Builder"))]
        );
        assert!(second.types.is_empty());
    }

    #[test]
    fn test_abstract_base_skips_factories_and_children() {
        let mut registry = GraphRegistry::new();
        let root = app(&mut registry);
        registry.add_subcomponent(root, "test.Child", None, ComponentDescriptor::new("test.Child")).unwrap();
        let options = CompilerOptions { ahead_of_time_subcomponents: true, ..Default::default() };

        let mut builder =
            ComponentModelBuilder::new(&registry, root, TypeName::new("GeneratedApp"), AssemblyMode::AbstractBase, &options);
        let tree = builder.build(&mut ScopedNames::new(), &mut ProviderFieldExpressions);
        let model = tree.root();
        assert_eq!(tree.len(), 1);
        assert!(model.is_abstract);
        assert!(model.factory_methods.is_empty());
        let constructor = model.constructor.as_ref().unwrap();
        assert!(constructor.has_modifier(Modifier::Protected));
        assert!(constructor.parameters.is_empty());
    }

    #[test]
    #[should_panic(expected = "already built")]
    fn test_second_build_panics() {
        let mut registry = GraphRegistry::new();
        let root = app(&mut registry);
        let options = CompilerOptions::default();
        let mut builder =
            ComponentModelBuilder::new(&registry, root, TypeName::new("GeneratedApp"), AssemblyMode::Concrete, &options);
        builder.build(&mut ScopedNames::new(), &mut ProviderFieldExpressions);
        builder.build(&mut ScopedNames::new(), &mut ProviderFieldExpressions);
    }

    #[test]
    #[should_panic(expected = "ahead-of-time subcomponents")]
    fn test_abstract_base_requires_ahead_of_time_option() {
        let mut registry = GraphRegistry::new();
        let root = app(&mut registry);
        let options = CompilerOptions::default();
        let mut builder =
            ComponentModelBuilder::new(&registry, root, TypeName::new("GeneratedApp"), AssemblyMode::AbstractBase, &options);
        builder.build(&mut ScopedNames::new(), &mut ProviderFieldExpressions);
    }

    #[test]
    #[should_panic(expected = "found neither")]
    fn test_subcomponent_without_builder_or_factory_panics() {
        let mut registry = GraphRegistry::new();
        let root = app(&mut registry);
        registry.add_subcomponent(root, "test.Child", None, ComponentDescriptor::new("test.Child")).unwrap();
        build(&registry, root);
    }

    #[test]
    #[should_panic(expected = "already assembled")]
    fn test_child_listed_twice_panics() {
        let mut registry = GraphRegistry::new();
        let root = app(&mut registry);
        let mut child = ComponentDescriptor::new("test.Child");
        child.builder = Some(BuilderSpec::default());
        let child = registry.add_subcomponent(root, "test.Child", None, child).unwrap();
        registry.components[root.index()].children.push(child);
        build(&registry, root);
    }
}
