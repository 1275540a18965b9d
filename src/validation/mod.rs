//! Scope consistency validation for the component graph.
//!
//! This module provides the `ScopeValidator`, which proves that the scopes
//! attached to components and their bindings nest properly *before* any
//! code model is assembled. Every violation is reported as a structured
//! `ScopeDiagnostic` chain; nothing here aborts early.

pub use self::error::{ChainEntry, Entity, ScopeDiagnostic, ScopeRule, Severity};
pub use self::validator::ScopeValidator;

mod error;
mod validator;
mod rules {
    pub mod ancestry;
    pub mod bindings;
    pub mod dependencies;
    pub mod reusable;
}
