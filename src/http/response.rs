//! Response translation.
//!
//! # Responsibilities
//! - Map dispatch results to HTTP status codes and bodies
//! - Serve the role document as JSON
//!
//! # Design Decisions
//! - Handler results and errors are plain text
//! - Error bodies are the error's description, nothing appended

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::DispatchError;
use crate::servant::Dispatched;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

impl IntoResponse for Dispatched {
    fn into_response(self) -> Response {
        (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_PLAIN)], self.body).into_response()
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], self.to_string()).into_response()
    }
}

/// 200 response carrying a serialized role document.
pub fn json_document(document: String) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, APPLICATION_JSON)], document).into_response()
}
