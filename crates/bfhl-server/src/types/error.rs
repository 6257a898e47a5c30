//! Errors raised while serving a request.
//!
//! None of these reach the caller verbatim: validation problems are
//! [`bfhl::Rejection`]s, and everything here is logged and answered with
//! the generic 500 envelope.

/// Message sent to the caller for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// All errors that can occur in the server.
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("Math error: {0}")]
    Math(#[from] bfhl::MathError),

    #[error("Core error: {0}")]
    Core(#[from] bfhl::BfhlError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;
