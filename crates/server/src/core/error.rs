use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Auth Errors
    #[error("token missing or invalid")]
    AuthFailNoToken,
    #[error("invalid token")]
    AuthFailInvalidToken,
    #[error("token expired")]
    AuthFailTokenExpired,
    #[error("auth context missing")]
    AuthFailCtxNotInRequestExt,
    #[error("Invalid username or password.")]
    LoginFail,
    #[error("{0}")]
    Forbidden(&'static str),

    // Model Errors
    #[error("malformatted id")]
    MalformattedId,
    #[error("{0} not found")]
    NotFound(&'static str),

    // Generic
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::AuthFailNoToken
            | Error::AuthFailInvalidToken
            | Error::AuthFailTokenExpired
            | Error::Forbidden(_) => StatusCode::UNAUTHORIZED,
            Error::AuthFailCtxNotInRequestExt | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::LoginFail | Error::MalformattedId | Error::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Internal(format!("database error: {}", err))
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Error::Internal(format!("password hashing failed: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Error::AuthFailTokenExpired,
            _ => Error::AuthFailInvalidToken,
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}
