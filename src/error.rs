use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("mining aborted before a solution was found (previous solution {previous_solution})")]
    MiningAborted { previous_solution: u64 },
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid node address `{0}`")]
    InvalidAddress(String),
}

/// Why a peer's chain could not be obtained. Never surfaced to API callers.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("peer answered with status {0}")]
    Status(u16),

    #[error("malformed chain response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Some elements of the transaction are missing: `{0}`")]
    MissingField(&'static str),

    #[error("No Node Address Found!")]
    MissingNodes,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::MissingNodes | ApiError::Registry(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Ledger(LedgerError::MiningAborted { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
