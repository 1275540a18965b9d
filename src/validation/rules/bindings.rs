//! Validation rules for the scopes of a component's own bindings.

use crate::store::{Binding, ComponentId, GraphRegistry};
use crate::validation::error::{ChainEntry, ScopeDiagnostic, ScopeRule};

/// "Lifetimes nest": a component may only expose bindings that live as long
/// as the component itself.
///
/// An unscoped component may not expose any scoped binding; a scoped
/// component may expose unscoped bindings and bindings with its own scope.
/// Bindings with the non-retainable scope are allowed everywhere.
pub(crate) fn validate_binding_scopes(registry: &GraphRegistry, id: ComponentId) -> Option<ScopeDiagnostic> {
    let component = registry.node(id);

    let offending: Vec<&Binding> = registry
        .bindings_of(id)
        .filter(|b| match &b.scope {
            Some(scope) if !scope.reusable => component.scope.as_ref() != Some(scope),
            _ => false,
        })
        .collect();

    if offending.is_empty() {
        return None;
    }

    let rule = if component.is_scoped() {
        ScopeRule::IncompatiblyScopedBindings
    } else {
        ScopeRule::UnscopedComponentWithScopedBindings
    };
    let chain = std::iter::once(ChainEntry::component(component))
        .chain(offending.into_iter().map(ChainEntry::binding))
        .collect();
    Some(ScopeDiagnostic::new(rule, id, chain))
}
