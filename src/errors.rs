use actix_web::{
    error,
    http::{header, StatusCode},
    HttpResponse,
};
use derive_more::{Display, Error};
use serde_json::json;

/// Where an owner without a session is sent to authenticate.
pub const LOGIN_PATH: &str = "/auth";

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum AppError {
    #[display(fmt = "invalid {}: {}", field, reason)]
    Validation { field: String, reason: String },

    /// Zero rows matched the conditional update. Covers both "already
    /// reserved" and "no such gift".
    #[display(fmt = "gift no longer available")]
    ReservationConflict,

    #[display(fmt = "authentication required")]
    AuthorizationRequired,

    #[display(fmt = "not found")]
    NotFound,

    #[display(fmt = "service temporarily unavailable")]
    StoreUnavailable,

    #[display(fmt = "invalid or expired token")]
    InvalidToken,
}

impl AppError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl error::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            AppError::AuthorizationRequired | AppError::InvalidToken => {
                builder
                    .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                    .json(json!({ "error": self.to_string(), "login": LOGIN_PATH }))
            }
            _ => builder.json(json!({ "error": self.to_string() })),
        }
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::ReservationConflict => StatusCode::CONFLICT,
            AppError::AuthorizationRequired => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
        }
    }
}
