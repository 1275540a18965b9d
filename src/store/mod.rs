//! Arena storage for the resolved component graph.
pub mod registry;
pub mod types;

pub use registry::{GraphError, GraphRegistry};
pub use types::*;
