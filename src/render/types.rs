//! Render error definitions

use thiserror::Error;

/// Failure to produce raw template contents
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("View not found: {0}")]
    NotFound(String),

    #[error("Invalid view name: {0}")]
    InvalidName(String),

    #[error("Failed to read view {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to supply a validation schema
#[derive(Debug, Error)]
pub enum SchemaRegistryError {
    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("Failed to read schema {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema {name} is not valid JSON: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema {name} cannot be compiled: {message}")]
    Invalid { name: String, message: String },

    #[error("Schema key {0} is claimed by more than one file")]
    Duplicate(String),
}

/// A single schema violation in a rendered document
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// JSON pointer into the rendered document
    pub instance_path: String,
    /// JSON pointer into the schema naming the failed rule
    pub schema_path: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.instance_path.is_empty() {
            "/"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "{}: {} (rule {})", path, self.message, self.schema_path)
    }
}

/// Render-specific error type
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template {name} could not be retrieved: {source}")]
    Template {
        name: String,
        #[source]
        source: ViewError,
    },

    #[error("Template {name} is not a valid resource document: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Schema {name} unavailable: {source}")]
    SchemaUnavailable {
        name: String,
        #[source]
        source: SchemaRegistryError,
    },

    #[error("Document failed validation against {schema}: {}", summarize(.violations))]
    Validation {
        schema: String,
        violations: Vec<Violation>,
    },
}

fn summarize(violations: &[Violation]) -> String {
    match violations {
        [] => "no details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_includes_first_violation() {
        let err = RenderError::Validation {
            schema: "ComputerSystemCollection".to_string(),
            violations: vec![
                Violation {
                    instance_path: "/Name".to_string(),
                    schema_path: "/properties/Name/type".to_string(),
                    message: "42 is not of type \"string\"".to_string(),
                },
                Violation {
                    instance_path: "".to_string(),
                    schema_path: "/required".to_string(),
                    message: "\"Members\" is a required property".to_string(),
                },
            ],
        };

        let message = err.to_string();
        assert!(message.contains("/Name"));
        assert!(message.contains("and 1 more"));
    }
}
