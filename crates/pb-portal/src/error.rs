use crate::coefficient::CoefficientSettingsError;
use crate::committee::{RepositoryError, ScoringServiceError};
use crate::config::ConfigError;
use crate::finance::ImportError;
use crate::roles::RoleParseError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(ImportError),
    Role(RoleParseError),
    Scoring(ScoringServiceError),
    Settings(CoefficientSettingsError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Role(err) => write!(f, "{}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
            AppError::Settings(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Role(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Settings(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Import(_) | AppError::Role(_) => StatusCode::BAD_REQUEST,
            AppError::Settings(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Scoring(err) => match err {
                ScoringServiceError::Forbidden { .. }
                | ScoringServiceError::RestrictedView { .. }
                | ScoringServiceError::ScoringClosed => StatusCode::FORBIDDEN,
                ScoringServiceError::UnknownCriterion { .. }
                | ScoringServiceError::OutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ScoringServiceError::AlreadyFinal { .. } => StatusCode::CONFLICT,
                ScoringServiceError::Repository(RepositoryError::NotFound) => {
                    StatusCode::NOT_FOUND
                }
                ScoringServiceError::Repository(RepositoryError::Unavailable(_)) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            AppError::Settings(err) => Json(json!({
                "error": self.to_string(),
                "problems": err.problems,
            })),
            _ => Json(json!({ "error": self.to_string() })),
        };
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<RoleParseError> for AppError {
    fn from(value: RoleParseError) -> Self {
        Self::Role(value)
    }
}

impl From<ScoringServiceError> for AppError {
    fn from(value: ScoringServiceError) -> Self {
        Self::Scoring(value)
    }
}

impl From<CoefficientSettingsError> for AppError {
    fn from(value: CoefficientSettingsError) -> Self {
        Self::Settings(value)
    }
}
