//! Unified error handling for page handlers.
//!
//! Handlers return `Result<Response, AppError>`. An `AppError` renders the
//! generic error view with a status that matches its kind; the underlying
//! detail is logged and never shown to the visitor.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::fmt;

use crate::auth::token::TokenError;
use crate::db::StoreError;
use crate::ui::{render, ErrorTemplate, Page};

/// Category of a failure that escaped its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    StoreFailure,
    Unhandled,
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Unhandled => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::StoreFailure => "store_failure",
            ErrorKind::Unhandled => "unhandled",
        }
    }

    /// Text shown to the visitor
    pub fn public_message(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "Sorry, we appear to have lost that page.",
            ErrorKind::Forbidden => "You do not have permission to view this page.",
            ErrorKind::StoreFailure | ErrorKind::Unhandled => {
                "Oh no! There was a crash. Maybe try a different route?"
            }
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    status: StatusCode,
    /// Internal detail, logged only
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: kind.status_code(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unhandled, message)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(kind = self.kind.as_str(), status = %self.status, "{}", self.message);
        } else {
            tracing::debug!(kind = self.kind.as_str(), status = %self.status, "{}", self.message);
        }

        let template = ErrorTemplate {
            page: Page::bare(self.status.as_u16().to_string()),
            status: self.status.as_u16(),
            message: self.kind.public_message().to_string(),
        };
        match render(self.status, template) {
            Ok(response) => response,
            Err(_) => (self.status, Html(self.kind.public_message())).into_response(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::new(ErrorKind::StoreFailure, err.to_string())
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::internal(format!("template error: {}", err))
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::internal(err.to_string())
    }
}
