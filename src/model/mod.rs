//! The generated-implementation model and the assembler that builds it.

pub use self::assembler::{AssemblyMode, ComponentModelBuilder, VariantKind, INITIALIZATIONS_PER_INITIALIZE_METHOD};
pub use self::expressions::{BindingExpressions, ProviderFieldExpressions};
pub use self::names::{NameAllocator, ScopedNames, UniqueNameSet};
pub use self::types::*;

mod assembler;
mod expressions;
mod names;
mod types;
