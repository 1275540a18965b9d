use super::types::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;

pub use self::error::GraphError;
mod error {
    use super::*;
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum GraphError {
        #[error("Component '{0}' is already registered")]
        DuplicateComponent(String),
        #[error("Unknown component {0:?}")]
        UnknownComponent(ComponentId),
        #[error("Unknown binding {0:?}")]
        UnknownBinding(BindingId),
        #[error("Component '{name}' cannot be its own {relation}")]
        SelfReference { name: String, relation: &'static str },
        #[error("Invalid graph snapshot: {0}")]
        Snapshot(String),
    }
}

/// Arena storage for the resolved component graph.
///
/// Components and bindings are addressed by dense ids. Parent links are
/// plain indices, so the subcomponent tree carries no owning cycles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphRegistry {
    pub components: Vec<ComponentNode>,
    pub bindings: Vec<Binding>,

    // Ephemeral state for uniqueness checks (Not serialized, rebuilt on load)
    #[serde(skip)]
    pub used_names: HashSet<String>,
}

impl GraphRegistry {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.components.len() }

    /// Rebuilds the `used_names` set after deserialization.
    pub fn rebuild_name_cache(&mut self) {
        self.used_names = self.components.iter().map(|c| c.name.clone()).collect();
    }

    pub fn add_component(
        &mut self,
        name: impl Into<String>,
        scope: Option<Scope>,
        descriptor: ComponentDescriptor,
    ) -> Result<ComponentId, GraphError> {
        self.push_component(name.into(), ComponentKind::Component, scope, None, descriptor)
    }

    /// Registers a subcomponent and appends it to `parent`'s ordered children.
    pub fn add_subcomponent(
        &mut self,
        parent: ComponentId,
        name: impl Into<String>,
        scope: Option<Scope>,
        descriptor: ComponentDescriptor,
    ) -> Result<ComponentId, GraphError> {
        self.component(parent)?;
        let id = self.push_component(name.into(), ComponentKind::Subcomponent, scope, Some(parent), descriptor)?;
        self.components[parent.index()].children.push(id);
        Ok(id)
    }

    fn push_component(
        &mut self,
        name: String,
        kind: ComponentKind,
        scope: Option<Scope>,
        parent: Option<ComponentId>,
        descriptor: ComponentDescriptor,
    ) -> Result<ComponentId, GraphError> {
        // --- Unique Name Enforcement ---
        if !self.used_names.insert(name.clone()) {
            return Err(GraphError::DuplicateComponent(name));
        }

        let id = ComponentId::new(self.components.len());
        self.components.push(ComponentNode {
            name,
            kind,
            scope,
            explicit_dependencies: Vec::new(),
            parent,
            bindings: Vec::new(),
            children: SmallVec::new(),
            descriptor,
        });
        Ok(id)
    }

    /// Declares `dependency` as an explicit (peer) dependency of `component`.
    /// Declaration order is preserved; it drives diagnostic ordering.
    pub fn add_dependency(&mut self, component: ComponentId, dependency: ComponentId) -> Result<(), GraphError> {
        self.component(dependency)?;
        let node = self.component_mut(component)?;
        if component == dependency {
            return Err(GraphError::SelfReference { name: node.name.clone(), relation: "dependency" });
        }
        node.explicit_dependencies.push(dependency);
        Ok(())
    }

    pub fn add_binding(
        &mut self,
        owner: ComponentId,
        kind: BindingKind,
        scope: Option<Scope>,
        description: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<BindingId, GraphError> {
        self.component(owner)?;
        let id = BindingId::new(self.bindings.len());
        self.bindings.push(Binding {
            kind,
            scope,
            owner,
            description: description.into(),
            key: key.into(),
        });
        self.components[owner.index()].bindings.push(id);
        Ok(id)
    }

    // --- Accessors ---

    pub fn component(&self, id: ComponentId) -> Result<&ComponentNode, GraphError> {
        self.components.get(id.index()).ok_or(GraphError::UnknownComponent(id))
    }

    fn component_mut(&mut self, id: ComponentId) -> Result<&mut ComponentNode, GraphError> {
        self.components.get_mut(id.index()).ok_or(GraphError::UnknownComponent(id))
    }

    pub fn binding(&self, id: BindingId) -> Result<&Binding, GraphError> {
        self.bindings.get(id.index()).ok_or(GraphError::UnknownBinding(id))
    }

    /// Infallible lookup for ids handed out by this registry.
    #[inline(always)]
    pub fn node(&self, id: ComponentId) -> &ComponentNode { &self.components[id.index()] }

    pub fn find(&self, name: &str) -> Option<ComponentId> {
        self.components.iter().position(|c| c.name == name).map(ComponentId::new)
    }

    pub fn children(&self, id: ComponentId) -> &[ComponentId] { &self.node(id).children }

    pub fn dependencies(&self, id: ComponentId) -> &[ComponentId] { &self.node(id).explicit_dependencies }

    /// The component's own bindings in registration order.
    pub fn bindings_of(&self, id: ComponentId) -> impl Iterator<Item = &Binding> + '_ {
        self.node(id).bindings.iter().map(move |b| &self.bindings[b.index()])
    }

    // --- Snapshots ---

    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(self).map_err(|e| GraphError::Snapshot(e.to_string()))
    }

    /// Loads a snapshot and re-checks the references it carries.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let mut registry: Self = serde_json::from_str(json).map_err(|e| GraphError::Snapshot(e.to_string()))?;
        registry.rebuild_name_cache();
        if registry.used_names.len() != registry.components.len() {
            return Err(GraphError::Snapshot("component names are not unique".into()));
        }

        let count = registry.count();
        for node in &registry.components {
            let linked = node.explicit_dependencies.iter()
                .chain(node.children.iter())
                .chain(node.parent.iter());
            if let Some(bad) = linked.copied().find(|id| id.index() >= count) {
                return Err(GraphError::UnknownComponent(bad));
            }
            if let Some(bad) = node.bindings.iter().copied().find(|id| id.index() >= registry.bindings.len()) {
                return Err(GraphError::UnknownBinding(bad));
            }
        }
        Ok(registry)
    }
}
