use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use tracing::error;

pub type Result<T> = core::result::Result<T, Error>;

pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug)]
pub enum Error {
    NotFound,
    LoginRequired,
    InternalServerError,
    BadRequest(String),
    Validation(validator::ValidationErrors),
    DatabaseError(sqlx::Error),
    InvalidHashFormat(argon2::password_hash::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // A hidden or missing entity answers with a 404 status; a missing
        // login answers with a redirect into the login flow.
        let (status, message) = match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            Self::LoginRequired => return Redirect::to(LOGIN_PATH).into_response(),
            Self::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Validation(errors) => {
                let body = Json(json!({ "error": "Invalid input", "fields": errors }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            Self::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            Self::InvalidHashFormat(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid hash format".to_string(),
            ),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        error!("Database error: {:?}", err);
        Self::DatabaseError(err)
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        error!("Invalid hash format");
        Self::InvalidHashFormat(err)
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
