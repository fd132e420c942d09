//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `multigit` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the application. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the application to simplify function signatures and ensure
//!   type safety.
//!
//! ## Error Taxonomy
//!
//! The variants fall into three classes with different propagation rules:
//!
//! - **Construction errors** (`TemplateArity`, `ConfigParse`, `Schema`):
//!   caller bugs or bad input, surfaced immediately before any git process
//!   is spawned.
//! - **Resolution errors** (`UnresolvableReference`): the requested ref is
//!   neither an exact tag nor a valid branch anywhere; short-circuits the
//!   whole operation.
//! - **Per-repo process failures** are NOT errors at this level: a git
//!   command failing in one repository is recorded in that repository's
//!   `ExecutionResult` and never aborts sibling work.

use thiserror::Error;

/// Main error type for multigit operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing the `mgit.yaml` configuration file.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An error occurred while loading or validating the workspace schema.
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// A command template and its argument columns disagree on arity.
    ///
    /// Raised before any process is spawned; this is always a caller bug,
    /// never a runtime condition of the repositories themselves.
    #[error("Command template arity error: {message}")]
    TemplateArity { message: String },

    /// The requested reference is neither an exact tag nor a valid branch
    /// in any selected repository, and force was not requested.
    #[error("Unable to resolve '{reference}' to a tag or branch in any repo")]
    UnresolvableReference { reference: String },

    /// A worker pool could not be constructed for a parallel dispatch.
    #[error("Worker pool error: {message}")]
    WorkerPool { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config_parse() {
        let error = Error::ConfigParse {
            message: "Invalid YAML".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("Invalid YAML"));
    }

    #[test]
    fn test_error_display_config_parse_with_hint() {
        let error = Error::ConfigParse {
            message: "Missing server field".to_string(),
            hint: Some("Add 'server:' to mgit.yaml".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Missing server field"));
        assert!(display.contains("hint:"));
        assert!(display.contains("Add 'server:'"));
    }

    #[test]
    fn test_error_display_template_arity() {
        let error = Error::TemplateArity {
            message: "2 placeholders but 1 argument column".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("arity error"));
        assert!(display.contains("2 placeholders but 1 argument column"));
    }

    #[test]
    fn test_error_display_unresolvable_reference() {
        let error = Error::UnresolvableReference {
            reference: "release/9.9/nope".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("release/9.9/nope"));
        assert!(display.contains("tag or branch"));
    }

    #[test]
    fn test_error_display_schema() {
        let error = Error::Schema {
            message: "duplicate clone path 'src/app'".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Schema error"));
        assert!(display.contains("src/app"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_str = "invalid: [unclosed";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: Error = yaml_error.into();
        let display = format!("{}", error);
        assert!(display.contains("YAML parsing error"));
    }
}
