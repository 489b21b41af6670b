//! Failures of a report run.

use rocket::http::Status;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

/// Fatal outcomes of a report run. Unknown sort keys are not errors; they are
/// logged and reported as warnings in the summary.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Missing or invalid request input. Raised before any external call.
    #[error("Invalid report configuration: {0}")]
    Configuration(String),

    /// The search or the enrichment step produced no usable videos.
    #[error("No results: {0}")]
    EmptyResult(String),

    /// A search, enrichment or surface call failed.
    #[error("External service failed: {0}")]
    ExternalService(String),
}

impl ReportError {
    pub fn external(context: &str, err: anyhow::Error) -> Self {
        ReportError::ExternalService(format!("{context}: {err:#}"))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::Configuration(_) => "configuration",
            ReportError::EmptyResult(_) => "empty_result",
            ReportError::ExternalService(_) => "external_service",
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ReportError::Configuration(_) => Status::BadRequest,
            ReportError::EmptyResult(_) => Status::NotFound,
            ReportError::ExternalService(_) => Status::BadGateway,
        }
    }
}
