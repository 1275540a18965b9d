//! Scope validation and implementation-model assembly for resolved
//! dependency-injection component graphs.
//!
//! The graph is loaded into a [`store::GraphRegistry`], checked by
//! [`validation::ScopeValidator`], and turned into a
//! [`model::ComponentModelTree`] by [`model::ComponentModelBuilder`].
//! [`pipeline::Pipeline`] runs both steps in order.

pub mod analysis;
pub mod config;
pub mod display;
pub mod model;
pub mod pipeline;
pub mod store;
pub mod validation;

pub use config::{CompilerOptions, ScopeCycleValidation};
pub use pipeline::{Pipeline, PipelineError};
