//! Error taxonomy for registration and dispatch.
//!
//! Registration errors surface synchronously from `Registry::register_handler`
//! and abort only that one registration. Dispatch errors are scoped to a single
//! request and are translated into HTTP responses by the transport layer.

use thiserror::Error;

/// Errors raised while registering a handler.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// A template did not compile into a valid pattern.
    #[error("invalid pattern for template '{template}': {source}")]
    InvalidPattern {
        template: String,
        #[source]
        source: regex::Error,
    },

    /// The templates capture a different number of arguments than the handler takes.
    #[error("handler '{handler}' takes {arity} argument(s) but its templates capture {captures}")]
    ArityMismatch {
        handler: String,
        captures: usize,
        arity: usize,
    },
}

/// Errors raised while dispatching a single request.
///
/// The `Display` form of each variant is exactly the response body sent to
/// the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The request body could not be read.
    #[error("{0}")]
    RequestRead(String),

    /// No registered handler matched method, path and body.
    #[error("No handler found")]
    NoHandlerMatched,

    /// The selected handler reported a failure.
    #[error("{message}")]
    HandlerFailed { handler: String, message: String },

    /// The selected handler panicked before producing an outcome.
    ///
    /// `handler` is `None` only when the dispatch task itself was lost.
    #[error("Handler panicked")]
    HandlerPanicked { handler: Option<String> },
}

impl DispatchError {
    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::NoHandlerMatched => 404,
            DispatchError::RequestRead(_)
            | DispatchError::HandlerFailed { .. }
            | DispatchError::HandlerPanicked { .. } => 500,
        }
    }

    /// Name of the handler involved, if one was selected.
    pub fn handler(&self) -> Option<&str> {
        match self {
            DispatchError::HandlerFailed { handler, .. } => Some(handler),
            DispatchError::HandlerPanicked { handler } => handler.as_deref(),
            _ => None,
        }
    }
}
