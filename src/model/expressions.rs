//! The code fragments each binding contributes to a component implementation.
use super::types::Statement;
use crate::store::{Binding, BindingKind, ComponentNode, EntryPoint};

/// Yields the initialization statements and use-site expressions for
/// bindings. The assembler treats everything returned here as opaque,
/// ordered code.
pub trait BindingExpressions {
    /// Statements run in the component constructor to set up `binding`.
    fn initialization(&mut self, component: &ComponentNode, binding: &Binding) -> Vec<Statement>;

    /// The expression a component method returns for `entry_point`.
    fn request_expression(&mut self, component: &ComponentNode, entry_point: &EntryPoint) -> String;
}

/// One provider field per binding, created through the binding's factory
/// and memoized when the binding is scoped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderFieldExpressions;

impl ProviderFieldExpressions {
    fn field(key: &str) -> String { format!("{}Provider", key) }

    fn factory(key: &str) -> String {
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => format!("{}{}_Factory", first.to_uppercase(), chars.as_str()),
            None => "_Factory".to_string(),
        }
    }
}

impl BindingExpressions for ProviderFieldExpressions {
    fn initialization(&mut self, _component: &ComponentNode, binding: &Binding) -> Vec<Statement> {
        let field = Self::field(&binding.key);
        let create = match binding.kind {
            BindingKind::Instance => format!("InstanceFactory.create({})", binding.key),
            _ => format!("{}.create()", Self::factory(&binding.key)),
        };
        let memoized = match &binding.scope {
            Some(scope) if scope.reusable => format!("SingleCheck.provider({})", create),
            Some(_) => format!("DoubleCheck.provider({})", create),
            None => create,
        };
        vec![Statement::new(format!("this.{} = {};", field, memoized))]
    }

    fn request_expression(&mut self, _component: &ComponentNode, entry_point: &EntryPoint) -> String {
        format!("{}.get()", Self::field(&entry_point.key))
    }
}
