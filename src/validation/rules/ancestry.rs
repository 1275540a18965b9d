//! Validation rule for the ordering of scopes along a dependency chain.

use crate::analysis::topology::scoped_dependencies;
use crate::store::{ComponentId, GraphRegistry, Scope};
use crate::validation::error::{ChainEntry, ScopeDiagnostic, ScopeRule};
use std::collections::HashSet;

/// Dependencies point from shorter lifetimes to longer ones, so scopes along
/// the chain of single scoped dependencies must never cycle.
///
/// The walk follows one scoped dependency per step and stops as soon as a
/// step has zero or several (the latter is reported separately). A scope
/// that repeats on adjacent links is tolerated; one that comes back after a
/// different scope intervened is not.
pub(crate) fn validate_scope_hierarchy(registry: &GraphRegistry, id: ComponentId) -> Option<ScopeDiagnostic> {
    let start_scope = registry.node(id).scope.as_ref()?;

    // Narrowest first.
    let mut path: Vec<ComponentId> = vec![id];
    let mut scopes: Vec<&Scope> = vec![start_scope];
    let mut visited = HashSet::from([id]);
    let mut current = id;

    loop {
        let scoped = scoped_dependencies(registry, current);
        let &[next] = scoped.as_slice() else {
            return None;
        };
        // Structural cycles are reported by the cycle check.
        if !visited.insert(next) {
            return None;
        }
        let next_scope = registry.node(next).scope.as_ref()?;
        let previous_scope = scopes[scopes.len() - 1];
        let reappears = scopes.contains(&next_scope) && previous_scope != next_scope;

        path.push(next);
        scopes.push(next_scope);

        if reappears {
            let chain = path.iter().rev().map(|&c| ChainEntry::component(registry.node(c))).collect();
            return Some(ScopeDiagnostic::new(ScopeRule::NonHierarchicalScopeOrdering, id, chain));
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ComponentDescriptor;
    use rstest::rstest;

    /// Builds a chain narrowest first: `names[0]` depends on `names[1]`, ...
    fn chain(scopes: &[&str]) -> (GraphRegistry, ComponentId) {
        let mut reg = GraphRegistry::new();
        let ids: Vec<ComponentId> = scopes
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let name = format!("test.Component{}", i);
                reg.add_component(name.clone(), Some(Scope::new(*s)), ComponentDescriptor::new(name)).unwrap()
            })
            .collect();
        for pair in ids.windows(2) {
            reg.add_dependency(pair[0], pair[1]).unwrap();
        }
        (reg, ids[0])
    }

    #[test]
    fn test_component_scope_ancestry_must_not_cycle() {
        let mut reg = GraphRegistry::new();
        let long = reg
            .add_component("test.ComponentLong", Some(Scope::new("test.ScopeA")), ComponentDescriptor::new("test.ComponentLong"))
            .unwrap();
        let medium = reg
            .add_component("test.ComponentMedium", Some(Scope::new("test.ScopeB")), ComponentDescriptor::new("test.ComponentMedium"))
            .unwrap();
        let short = reg
            .add_component("test.ComponentShort", Some(Scope::new("test.ScopeA")), ComponentDescriptor::new("test.ComponentShort"))
            .unwrap();
        reg.add_dependency(medium, long).unwrap();
        reg.add_dependency(short, medium).unwrap();

        let diag = validate_scope_hierarchy(&reg, short).unwrap();
        assert_eq!(
            diag.to_string(),
            "test.ComponentShort depends on scoped components in a non-hierarchical scope ordering:\n\
             \x20     @test.ScopeA test.ComponentLong\n\
             \x20     @test.ScopeB test.ComponentMedium\n\
             \x20     @test.ScopeA test.ComponentShort"
        );
        assert_eq!(diag.component, short);
    }

    #[rstest]
    #[case(&["A", "B", "C"])]
    #[case(&["A", "A", "B"])]
    #[case(&["A", "B", "B", "C"])]
    #[case(&["A"])]
    fn test_hierarchical_chains_pass(#[case] scopes: &[&str]) {
        let (reg, start) = chain(scopes);
        assert_eq!(validate_scope_hierarchy(&reg, start), None);
    }

    #[rstest]
    #[case(&["A", "B", "A"], 3)]
    #[case(&["A", "A", "B", "A"], 4)]
    #[case(&["A", "B", "C", "B", "D"], 4)]
    fn test_non_hierarchical_chains_fail(#[case] scopes: &[&str], #[case] chain_len: usize) {
        let (reg, start) = chain(scopes);
        let diag = validate_scope_hierarchy(&reg, start).unwrap();
        assert_eq!(diag.chain.len(), chain_len);
        // Widest first, the validated component last.
        assert_eq!(diag.chain.last().unwrap().to_string(), format!("@{} test.Component0", scopes[0]));
    }

    #[test]
    fn test_walk_stops_at_multiple_scoped_dependencies() {
        let (mut reg, start) = chain(&["A", "B"]);
        let extra = reg.add_component("test.Extra", Some(Scope::new("A")), ComponentDescriptor::new("test.Extra")).unwrap();
        reg.add_dependency(ComponentId(1), extra).unwrap();
        let second = reg.add_component("test.Second", Some(Scope::new("C")), ComponentDescriptor::new("test.Second")).unwrap();
        reg.add_dependency(ComponentId(1), second).unwrap();

        assert_eq!(validate_scope_hierarchy(&reg, start), None);
    }
}
