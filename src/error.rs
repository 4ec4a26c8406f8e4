use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sea_orm::DbErr;

use crate::{store::StoreError, tmdb::TmdbError};

/// Failures that end the current request with an error page.
///
/// Form validation problems are not errors in this sense: handlers re-render
/// the form with messages instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Upstream(#[from] TmdbError),
    #[error("database error: {0}")]
    Internal(#[from] DbErr),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateTitle(_) => AppError::Conflict(err.to_string()),
            StoreError::Db(err) => AppError::Internal(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, heading) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "Already in your list"),
            AppError::Upstream(err) => {
                tracing::warn!(error = %err, "movie database request failed");
                let heading = match err {
                    TmdbError::Request(_) => "Movie database unavailable",
                    TmdbError::Status(_) | TmdbError::Malformed(_) | TmdbError::MissingYear { .. } => {
                        "Movie database error"
                    },
                };
                (StatusCode::BAD_GATEWAY, heading)
            },
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
            },
        };

        let message = match self {
            AppError::Internal(_) => "An unexpected error occurred.".to_string(),
            other => other.to_string(),
        };

        (status, Html(crate::templates::error_page(heading, &message))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
