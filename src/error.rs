use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    #[error("paste not found")]
    NotFound,
    #[error("paste expired or deleted")]
    Gone,
    #[error("invalid request body: {reason}")]
    InvalidBody { reason: String },
    #[error("paste content must not be empty")]
    EmptyContent,
    #[error("paste content must be at most {max} characters")]
    ContentTooLarge { max: usize },
    #[error("expireAfterSeconds must be between 1 and {max}")]
    InvalidExpireAfterSeconds { max: i64 },
    #[error("expireAfterViews must be a positive integer")]
    InvalidExpireAfterViews,
    #[error("too many requests")]
    RateLimited,
    #[error("database error")]
    Database { source: sqlx::Error },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Gone => StatusCode::GONE,
            ApiError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            ApiError::EmptyContent => StatusCode::BAD_REQUEST,
            ApiError::ContentTooLarge { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidExpireAfterSeconds { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidExpireAfterViews => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Database { source } => {
                error!("database error: {source}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status_code, format!("{self}")).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            _ => ApiError::Database { source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_lifecycle() {
        assert_eq!(
            ApiError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::Gone.into_response().status(), StatusCode::GONE);
        assert_eq!(
            ApiError::RateLimited.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );

        let database = ApiError::Database {
            source: sqlx::Error::PoolClosed,
        };
        assert_eq!(
            database.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn every_validation_failure_is_a_bad_request() {
        let errors = [
            ApiError::InvalidBody {
                reason: "missing field `content`".to_owned(),
            },
            ApiError::EmptyContent,
            ApiError::ContentTooLarge { max: 20_000 },
            ApiError::InvalidExpireAfterSeconds { max: 60 },
            ApiError::InvalidExpireAfterViews,
        ];
        for error in errors {
            assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn missing_rows_become_not_found() {
        assert!(matches!(
            ApiError::from(sqlx::Error::RowNotFound),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from(sqlx::Error::PoolClosed),
            ApiError::Database { .. }
        ));
    }
}
