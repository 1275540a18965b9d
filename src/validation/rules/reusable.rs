//! Validation rule for non-retainable scopes on component declarations.

use crate::store::{ComponentId, GraphRegistry};
use crate::validation::error::{ChainEntry, ScopeDiagnostic, ScopeRule};

/// A non-retainable scope only makes sense on bindings; a component needs a
/// real lifetime of its own.
pub(crate) fn validate_component_scope(registry: &GraphRegistry, id: ComponentId) -> Option<ScopeDiagnostic> {
    let component = registry.node(id);
    match &component.scope {
        Some(scope) if scope.reusable => Some(ScopeDiagnostic::new(
            ScopeRule::NonRetainableScopeOnComponent,
            id,
            vec![ChainEntry::component(component)],
        )),
        _ => None,
    }
}
