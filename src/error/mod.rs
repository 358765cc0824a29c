use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::classifier::{ClassifierConfigError, ClassifyError};
use crate::render::{RenderError, SchemaRegistryError};

const MESSAGE_ODATA_TYPE: &str = "/redfish/v1/$metadata#Message.1.0.0.Message";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Classifier configuration error: {0}")]
    ClassifierConfig(#[from] ClassifierConfigError),

    #[error("Schema registry error: {0}")]
    SchemaRegistry(#[from] SchemaRegistryError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// Redfish extended error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(rename = "@Message.ExtendedInfo")]
    pub extended_info: Vec<ExtendedInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtendedInfo {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    pub message_id: String,
    pub message: String,
    pub severity: String,
    pub resolution: String,
}

impl ExtendedInfo {
    fn new(message_id: &str, message: String, resolution: &str) -> Self {
        Self {
            odata_type: MESSAGE_ODATA_TYPE.to_string(),
            message_id: message_id.to_string(),
            message,
            severity: "Critical".to_string(),
            resolution: resolution.to_string(),
        }
    }
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl AppError {
    /// Status and Redfish message id for this error
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Classify(ClassifyError::InvalidNode(_)) => {
                (StatusCode::NOT_FOUND, "Base.1.0.ResourceMissingAtURI")
            }
            AppError::Classify(ClassifyError::Directory(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Base.1.0.InternalError")
            }
            AppError::Render(RenderError::Validation { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Base.1.0.PropertyValueFormatError")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Base.1.0.InternalError"),
        }
    }

    /// Build the Redfish error body; `production` hides internal detail
    pub fn to_error_response(&self, production: bool) -> (StatusCode, ErrorResponse) {
        let (status, message_id) = self.classify();

        let client_message = match self {
            // Part of the contract: callers match on this exact text
            AppError::Classify(ClassifyError::InvalidNode(_)) => self.to_string(),
            _ if production => "An internal error occurred".to_string(),
            _ => self.to_string(),
        };

        let extended_info = match self {
            AppError::Render(RenderError::Validation { violations, .. }) if !production => {
                violations
                    .iter()
                    .map(|v| {
                        ExtendedInfo::new(
                            message_id,
                            v.to_string(),
                            "Correct the resource template and resubmit the request.",
                        )
                    })
                    .collect()
            }
            _ => vec![ExtendedInfo::new(
                message_id,
                client_message.clone(),
                "None",
            )],
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: "Base.1.0.GeneralError".to_string(),
                message: client_message,
                extended_info,
            },
        };

        (status, body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_error_response(is_production());

        // Always log the detailed error server-side
        tracing::error!(
            status = %status.as_u16(),
            message = %self,
            "Redfish API error"
        );

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::DirectoryError;
    use crate::render::Violation;

    #[test]
    fn test_invalid_node_is_not_found() {
        let err = AppError::from(ClassifyError::InvalidNode("testid".to_string()));
        let (status, body) = err.to_error_response(true);

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.message, "invalid node id.");
        assert_eq!(
            body.error.extended_info[0].message_id,
            "Base.1.0.ResourceMissingAtURI"
        );
    }

    #[test]
    fn test_directory_failure_is_unavailable() {
        let err = AppError::from(ClassifyError::Directory(DirectoryError::Unavailable(
            "timeout".to_string(),
        )));
        let (status, body) = err.to_error_response(true);

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.error.message, "An internal error occurred");
    }

    #[test]
    fn test_validation_lists_each_violation() {
        let violation = |path: &str| Violation {
            instance_path: path.to_string(),
            schema_path: "/required".to_string(),
            message: "missing".to_string(),
        };
        let err = AppError::from(RenderError::Validation {
            schema: "ComputerSystem".to_string(),
            violations: vec![violation("/Id"), violation("/Name")],
        });

        let (status, body) = err.to_error_response(false);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.extended_info.len(), 2);
        assert!(body.error.extended_info[1].message.starts_with("/Name"));
    }

    #[test]
    fn test_body_shape() {
        let err = AppError::from(RenderError::SchemaNotFound("Chassis".to_string()));
        let (_, body) = err.to_error_response(false);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["error"]["code"], "Base.1.0.GeneralError");
        assert_eq!(value["error"]["message"], "Schema not found: Chassis");
        let info = &value["error"]["@Message.ExtendedInfo"][0];
        assert_eq!(info["@odata.type"], MESSAGE_ODATA_TYPE);
        assert_eq!(info["MessageId"], "Base.1.0.InternalError");
        assert_eq!(info["Severity"], "Critical");
    }
}
