//! Collision-free identifiers for generated types and methods.
use crate::store::{ComponentNode, TypeName};
use std::collections::{HashMap, HashSet};

/// Supplies identifiers while a model tree is assembled.
///
/// Claims are made in traversal order, so a deterministic allocator yields
/// the same names for the same input graph.
pub trait NameAllocator {
    /// Simple name for the implementation of a nested subcomponent, unique
    /// across the whole assembly pass.
    fn unique_subcomponent_name(&mut self, component: &ComponentNode) -> String;

    /// Reserves a method name already present on `owner` (declared or inherited).
    fn claim_method_name(&mut self, owner: &TypeName, name: &str);

    /// A method name not yet used on `owner`, derived from `hint`.
    fn unique_method_name(&mut self, owner: &TypeName, hint: &str) -> String;
}

/// A set of names where each new request gets the first free candidate
/// from `base`, `base2`, `base3`, ...
#[derive(Debug, Clone, Default)]
pub struct UniqueNameSet {
    used: HashSet<String>,
}

impl UniqueNameSet {
    pub fn new() -> Self { Self::default() }

    /// Returns false if the name was already taken.
    pub fn claim(&mut self, name: &str) -> bool {
        self.used.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool { self.used.contains(name) }

    pub fn unique_name(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut counter = 2;

        while self.used.contains(&candidate) {
            candidate = format!("{}{}", base, counter);
            counter += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Default allocator: one tree-wide set for subcomponent names and one set
/// of method names per generated type.
#[derive(Debug, Clone, Default)]
pub struct ScopedNames {
    subcomponents: UniqueNameSet,
    methods: HashMap<TypeName, UniqueNameSet>,
}

impl ScopedNames {
    pub fn new() -> Self { Self::default() }
}

impl NameAllocator for ScopedNames {
    fn unique_subcomponent_name(&mut self, component: &ComponentNode) -> String {
        self.subcomponents.unique_name(component.descriptor.definition_type.simple_name())
    }

    fn claim_method_name(&mut self, owner: &TypeName, name: &str) {
        self.methods.entry(owner.clone()).or_default().claim(name);
    }

    fn unique_method_name(&mut self, owner: &TypeName, hint: &str) -> String {
        self.methods.entry(owner.clone()).or_default().unique_name(hint)
    }
}
