use reqwest::StatusCode;
use service_core::error::AppError;
use thiserror::Error;

use crate::forms::validation::ValidationError;

/// Failures talking to the backend of record. None of them are retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("backend returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot build a request URL from {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },
}

impl GatewayError {
    pub fn outcome(&self) -> &'static str {
        match self {
            GatewayError::Transport { .. } => "transport",
            GatewayError::Status { .. } => "status",
            GatewayError::Decode { .. } => "decode",
            GatewayError::InvalidUrl { .. } => "invalid_url",
            GatewayError::NotFound { .. } => "not_found",
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            GatewayError::NotFound { .. } => true,
            GatewayError::Status { status, .. } => *status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }
}

/// Failure of a form operation that may touch the backend.
#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::UnprocessableEntity(err.to_string())
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        if err.is_not_found() {
            AppError::NotFound(anyhow::anyhow!(err.to_string()))
        } else {
            AppError::BadGateway(err.to_string())
        }
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(err) => err.into(),
            FormError::Gateway(err) => err.into(),
        }
    }
}
