//! Validate-then-assemble driver.
use crate::config::CompilerOptions;
use crate::model::{
    AssemblyMode, BindingExpressions, ComponentModelBuilder, ComponentModelTree, NameAllocator, ProviderFieldExpressions,
    ScopedNames,
};
use crate::store::{ComponentId, GraphError, GraphRegistry, TypeName};
use crate::validation::{ScopeDiagnostic, ScopeValidator};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Scope validation failed with {} error(s)", .0.len())]
    Validation(Vec<ScopeDiagnostic>),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl PipelineError {
    /// The user-facing diagnostics, empty for structural failures.
    pub fn diagnostics(&self) -> &[ScopeDiagnostic] {
        match self {
            PipelineError::Validation(diagnostics) => diagnostics,
            PipelineError::Graph(_) => &[],
        }
    }
}

pub struct Pipeline;

impl Pipeline {
    /// Validates the tree rooted at `root` and, only if it is valid,
    /// assembles its model with the given collaborators.
    pub fn run(
        registry: &GraphRegistry,
        root: ComponentId,
        mode: AssemblyMode,
        options: &CompilerOptions,
        names: &mut dyn NameAllocator,
        expressions: &mut dyn BindingExpressions,
    ) -> Result<ComponentModelTree, PipelineError> {
        let node = registry.component(root)?;

        ScopeValidator::new(registry, options).validate(root).map_err(PipelineError::Validation)?;

        let name = generated_name(options, &node.descriptor.definition_type);
        let tree = ComponentModelBuilder::new(registry, root, name, mode, options).build(names, expressions);

        info!(component = %node.name, models = tree.len(), "generated component model");
        Ok(tree)
    }

    /// `run` with the default name allocator and provider-field expressions.
    pub fn compile(
        registry: &GraphRegistry,
        root: ComponentId,
        options: &CompilerOptions,
    ) -> Result<ComponentModelTree, PipelineError> {
        Self::run(registry, root, AssemblyMode::Concrete, options, &mut ScopedNames::new(), &mut ProviderFieldExpressions)
    }
}

/// `test.App` -> `GeneratedApp`
fn generated_name(options: &CompilerOptions, definition_type: &TypeName) -> TypeName {
    TypeName::new(format!("{}{}", options.generated_type_prefix, definition_type.simple_name()))
}
