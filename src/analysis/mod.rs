//! Structural analysis of the component graph.
pub mod topology;
