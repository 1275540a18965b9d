//! Defines the diagnostic types for the validation module.
use crate::store::{Binding, BindingKind, ComponentId, ComponentNode, Scope};
use std::fmt;

/// The specific rule a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeRule {
    /// An unscoped component exposes scoped bindings.
    UnscopedComponentWithScopedBindings,
    /// A scoped component exposes bindings with a different scope.
    IncompatiblyScopedBindings,
    /// More than one explicit dependency carries a scope.
    MultipleScopedDependencies,
    /// An unscoped component explicitly depends on a scoped one.
    UnscopedDependsOnScoped,
    /// The unbounded scope depends on another scoped component.
    UnboundedDependsOnScoped,
    /// A scope reappears further up the dependency chain.
    NonHierarchicalScopeOrdering,
    /// A non-retainable scope is applied to a component declaration.
    NonRetainableScopeOnComponent,
    /// Parentage and explicit dependencies form a cycle.
    DependencyCycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Component(String),
    Binding { kind: BindingKind, description: String },
}

/// One link of a diagnostic chain: an entity and the scope it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEntry {
    pub entity: Entity,
    pub scope: Option<Scope>,
}

impl ChainEntry {
    pub fn component(node: &ComponentNode) -> Self {
        Self { entity: Entity::Component(node.name.clone()), scope: node.scope.clone() }
    }

    pub fn binding(binding: &Binding) -> Self {
        Self {
            entity: Entity::Binding { kind: binding.kind, description: binding.description.clone() },
            scope: binding.scope.clone(),
        }
    }
}

impl fmt::Display for ChainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope.as_ref().map(|s| format!("{} ", s)).unwrap_or_default();
        match &self.entity {
            Entity::Component(name) => write!(f, "{}{}", scope, name),
            Entity::Binding { kind, description } => match kind {
                BindingKind::Provision => write!(f, "@Provides {}{}", scope, description),
                BindingKind::Delegate => write!(f, "@Binds {}{}", scope, description),
                BindingKind::InjectedConstructor => write!(f, "{}class {}", scope, description),
                BindingKind::Instance => write!(f, "{}{}", scope, description),
            },
        }
    }
}

/// A structured report from the scope validator.
///
/// `chain` is the ordered violation path. For the binding and dependency
/// rules it starts with the offending component; for scope ordering it runs
/// from the widest scope down to the offending component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeDiagnostic {
    pub rule: ScopeRule,
    pub severity: Severity,
    /// The component whose validation produced this diagnostic.
    pub component: ComponentId,
    pub chain: Vec<ChainEntry>,
}

impl ScopeDiagnostic {
    pub(crate) fn new(rule: ScopeRule, component: ComponentId, chain: Vec<ChainEntry>) -> Self {
        Self { rule, severity: Severity::Error, component, chain }
    }

    pub fn is_error(&self) -> bool { self.severity == Severity::Error }

    /// The entry naming the component the diagnostic is reported on.
    pub fn subject(&self) -> &ChainEntry {
        match self.rule {
            ScopeRule::NonHierarchicalScopeOrdering => &self.chain[self.chain.len() - 1],
            _ => &self.chain[0],
        }
    }

    /// The entries rendered below the header line.
    pub fn listed(&self) -> &[ChainEntry] {
        match self.rule {
            ScopeRule::NonHierarchicalScopeOrdering
            | ScopeRule::NonRetainableScopeOnComponent
            | ScopeRule::DependencyCycle => &self.chain,
            _ => &self.chain[1..],
        }
    }

    fn subject_name(&self) -> &str {
        match &self.subject().entity {
            Entity::Component(name) => name,
            Entity::Binding { description, .. } => description,
        }
    }

    fn subject_scope(&self) -> String {
        self.subject().scope.as_ref().map(|s| s.to_string()).unwrap_or_default()
    }
}

impl fmt::Display for ScopeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.subject_name();
        match self.rule {
            ScopeRule::UnscopedComponentWithScopedBindings => {
                write!(f, "{} (unscoped) may not reference scoped bindings:", name)?
            }
            ScopeRule::IncompatiblyScopedBindings => write!(
                f,
                "{} scoped with {} may not reference bindings with different scopes:",
                name,
                self.subject_scope()
            )?,
            ScopeRule::MultipleScopedDependencies => {
                write!(f, "{} depends on more than one scoped component:", self.subject())?
            }
            ScopeRule::UnscopedDependsOnScoped => {
                write!(f, "{} (unscoped) cannot depend on scoped components:", name)?
            }
            ScopeRule::UnboundedDependsOnScoped => {
                write!(f, "This {} component cannot depend on scoped components:", self.subject_scope())?
            }
            ScopeRule::NonHierarchicalScopeOrdering => {
                write!(f, "{} depends on scoped components in a non-hierarchical scope ordering:", name)?
            }
            ScopeRule::NonRetainableScopeOnComponent => {
                write!(f, "{} cannot be applied to components or subcomponents", self.subject_scope())?
            }
            ScopeRule::DependencyCycle => write!(f, "{} is part of a component dependency cycle:", name)?,
        }
        for entry in self.listed() {
            write!(f, "\n      {}", entry)?;
        }
        Ok(())
    }
}
