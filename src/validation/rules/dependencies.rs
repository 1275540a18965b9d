//! Validation rules for a component's explicit (peer) dependencies.

use crate::analysis::topology::scoped_dependencies;
use crate::config::CompilerOptions;
use crate::store::{ComponentId, GraphRegistry};
use crate::validation::error::{ChainEntry, ScopeDiagnostic, ScopeRule};
use std::collections::HashSet;

fn chain_of(registry: &GraphRegistry, id: ComponentId, listed: &[ComponentId]) -> Vec<ChainEntry> {
    std::iter::once(id)
        .chain(listed.iter().copied())
        .map(|c| ChainEntry::component(registry.node(c)))
        .collect()
}

/// A component may be nested inside at most one longer-lived scope, so at
/// most one of its direct dependencies may be scoped.
pub(crate) fn validate_single_scoped_dependency(registry: &GraphRegistry, id: ComponentId) -> Option<ScopeDiagnostic> {
    let scoped = scoped_dependencies(registry, id);
    if scoped.len() > 1 {
        return Some(ScopeDiagnostic::new(
            ScopeRule::MultipleScopedDependencies,
            id,
            chain_of(registry, id, &scoped),
        ));
    }
    None
}

/// Something without a lifetime cannot hold on to something with one.
pub(crate) fn validate_unscoped_dependencies(registry: &GraphRegistry, id: ComponentId) -> Option<ScopeDiagnostic> {
    if registry.node(id).is_scoped() {
        return None;
    }
    let scoped = scoped_dependencies(registry, id);
    if scoped.is_empty() {
        return None;
    }
    Some(ScopeDiagnostic::new(ScopeRule::UnscopedDependsOnScoped, id, chain_of(registry, id, &scoped)))
}

/// The unbounded scope is the widest lifetime, so nothing it depends on may
/// carry a scope, directly or through unscoped intermediates.
pub(crate) fn validate_unbounded_dependencies(
    registry: &GraphRegistry,
    id: ComponentId,
    options: &CompilerOptions,
) -> Option<ScopeDiagnostic> {
    let scope = registry.node(id).scope.as_ref()?;
    if !options.is_unbounded(scope) {
        return None;
    }

    let mut found = Vec::new();
    let mut visited = HashSet::from([id]);
    let mut frontier = vec![id];

    // Breadth first so direct dependencies are listed before transitive ones.
    while !frontier.is_empty() {
        let mut next = Vec::new();
        for current in frontier {
            for &dep in registry.dependencies(current) {
                if !visited.insert(dep) {
                    continue;
                }
                if registry.node(dep).is_scoped() {
                    found.push(dep);
                } else {
                    next.push(dep);
                }
            }
        }
        frontier = next;
    }

    if found.is_empty() {
        return None;
    }
    Some(ScopeDiagnostic::new(ScopeRule::UnboundedDependsOnScoped, id, chain_of(registry, id, &found)))
}
