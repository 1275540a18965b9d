//! The central validator that orchestrates the execution of all scope rules.
use super::error::{ChainEntry, ScopeDiagnostic, ScopeRule, Severity};
use super::rules::{ancestry, bindings, dependencies, reusable};
use crate::analysis::topology;
use crate::config::{CompilerOptions, ScopeCycleValidation};
use crate::store::{ComponentId, GraphRegistry};
use tracing::{trace, warn};

/// The orchestrator for scope validation.
///
/// Walks the root and its subcomponents, applying every rule to each one.
/// Rules never short-circuit each other: all violations are collected in a
/// single pass.
pub struct ScopeValidator<'a> {
    registry: &'a GraphRegistry,
    options: &'a CompilerOptions,
}

impl<'a> ScopeValidator<'a> {
    pub fn new(registry: &'a GraphRegistry, options: &'a CompilerOptions) -> Self {
        Self { registry, options }
    }

    /// Executes all rules against the component tree rooted at `root`.
    ///
    /// # Returns
    /// - `Ok(())` if no error-severity diagnostics are found.
    /// - `Err(Vec<ScopeDiagnostic>)` containing every error discovered.
    ///
    /// Warning-severity diagnostics are logged and do not fail validation.
    pub fn validate(&self, root: ComponentId) -> Result<(), Vec<ScopeDiagnostic>> {
        let (errors, warnings): (Vec<_>, Vec<_>) = self.report(root).into_iter().partition(|d| d.is_error());

        for diagnostic in &warnings {
            warn!(component = %self.registry.node(diagnostic.component).name, "{}", diagnostic);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Every diagnostic, errors and warnings, in traversal order.
    pub fn report(&self, root: ComponentId) -> Vec<ScopeDiagnostic> {
        let mut diagnostics = Vec::new();

        for cycle in topology::dependency_cycles(self.registry, root) {
            let chain = cycle.iter().map(|&c| ChainEntry::component(self.registry.node(c))).collect();
            diagnostics.push(ScopeDiagnostic::new(ScopeRule::DependencyCycle, cycle[0], chain));
        }

        for id in topology::subtree_preorder(self.registry, root) {
            self.check_component(id, &mut diagnostics);
        }
        diagnostics
    }

    fn check_component(&self, id: ComponentId, diagnostics: &mut Vec<ScopeDiagnostic>) {
        let registry = self.registry;
        trace!(component = %registry.node(id).name, "checking scopes");

        diagnostics.extend(reusable::validate_component_scope(registry, id));
        diagnostics.extend(bindings::validate_binding_scopes(registry, id));

        if registry.dependencies(id).is_empty() {
            return;
        }
        diagnostics.extend(dependencies::validate_single_scoped_dependency(registry, id));
        diagnostics.extend(dependencies::validate_unscoped_dependencies(registry, id));

        diagnostics.extend(dependencies::validate_unbounded_dependencies(registry, id, self.options));

        // Only the hierarchy walk is subject to the scope-cycle switch.
        let severity = match self.options.scope_cycle_validation {
            ScopeCycleValidation::None => return,
            ScopeCycleValidation::Warning => Severity::Warning,
            ScopeCycleValidation::Error => Severity::Error,
        };
        diagnostics.extend(ancestry::validate_scope_hierarchy(registry, id).map(|mut d| {
            d.severity = severity;
            d
        }));
    }
}
