//! Options shared by the scope validator and the model assembler.
use crate::store::Scope;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// How non-hierarchical scope chains are reported. Dependencies of the
/// unbounded scope are always errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeCycleValidation {
    #[default]
    Error,
    Warning,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Whether abstract base implementations of subcomponents may be built
    /// ahead of their concrete instantiation.
    pub ahead_of_time_subcomponents: bool,
    /// The widest lifetime tier. Components carrying it may not depend on
    /// any other scoped component.
    pub unbounded_scope: Option<Scope>,
    pub scope_cycle_validation: ScopeCycleValidation,
    /// Prefix of the generated root implementation's simple name.
    pub generated_type_prefix: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            ahead_of_time_subcomponents: false,
            unbounded_scope: Some(Scope::singleton()),
            scope_cycle_validation: ScopeCycleValidation::Error,
            generated_type_prefix: "Generated".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed options: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CompilerOptions {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn is_unbounded(&self, scope: &Scope) -> bool {
        self.unbounded_scope.as_ref() == Some(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let options = CompilerOptions::from_json(r#"{ "ahead_of_time_subcomponents": true }"#).unwrap();
        assert!(options.ahead_of_time_subcomponents);
        assert_eq!(options.unbounded_scope, Some(Scope::singleton()));
        assert_eq!(options.scope_cycle_validation, ScopeCycleValidation::Error);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "unbounded_scope": {{ "name": "AppScope" }}, "scope_cycle_validation": "warning" }}"#
        )
        .unwrap();

        let options = CompilerOptions::from_path(file.path()).unwrap();
        assert!(options.is_unbounded(&Scope::new("AppScope")));
        assert!(!options.is_unbounded(&Scope::singleton()));
        assert_eq!(options.scope_cycle_validation, ScopeCycleValidation::Warning);
    }

    #[test]
    fn test_malformed_options_are_reported() {
        let err = CompilerOptions::from_json("{ nope").unwrap_err();
        assert!(err.to_string().starts_with("Malformed options"));
    }
}
