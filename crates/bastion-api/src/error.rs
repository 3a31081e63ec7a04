use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Every outcome a handler can fail with.
///
/// The first four are expected and handled inside the route that produced
/// them (notice + redirect). Only `Internal` ever becomes a response on its
/// own.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no active session")]
    Unauthenticated,

    /// Deliberately covers both "missing" and "owned by someone else".
    #[error("website not found or unauthorized")]
    NotFoundOrUnauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        match self {
            Self::Internal(e) => {
                error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>Internal Server Error</h1>"),
                )
                    .into_response()
            }
            other => {
                // Handlers are expected to catch these; reaching here is a bug
                // in the route, not something the client should learn about.
                error!("Unhandled console error: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
