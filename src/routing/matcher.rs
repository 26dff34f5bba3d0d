//! Request matching logic.
//!
//! # Responsibilities
//! - Match the HTTP method (exact, case-sensitive)
//! - Match the path against the compiled path template
//! - Match the body against the compiled body template, when present
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - No method normalization: `get` and `GET` are different methods
//! - Captures are path captures followed by body captures

use std::fmt;

use crate::routing::template::{LiteralMode, Template};
use crate::error::RegistrationError;
use crate::servant::handler::BoxedHandler;

/// The parts of an inbound request the matcher looks at.
#[derive(Debug, Clone, Copy)]
pub struct DispatchRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub body: &'a str,
}

impl<'a> DispatchRequest<'a> {
    pub fn new(method: &'a str, path: &'a str, body: &'a str) -> Self {
        Self { method, path, body }
    }
}

/// A registered handler in its runtime form.
pub struct CompiledMatcher {
    name: String,
    method: String,
    path: Template,
    body: Option<Template>,
    handler: BoxedHandler,
}

impl CompiledMatcher {
    /// Compile the path template and, when non-empty, the body template.
    pub fn compile(
        name: &str,
        method: &str,
        path_template: &str,
        body_template: &str,
        mode: LiteralMode,
        handler: BoxedHandler,
    ) -> Result<Self, RegistrationError> {
        let path = Template::compile_with(path_template, mode)?;
        let body = if body_template.is_empty() {
            None
        } else {
            Some(Template::compile_with(body_template, mode)?)
        };

        Ok(Self {
            name: name.to_string(),
            method: method.to_string(),
            path,
            body,
            handler,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    /// Total number of arguments a successful match produces.
    pub fn capture_count(&self) -> usize {
        self.path.slot_count() + self.body.as_ref().map_or(0, Template::slot_count)
    }

    /// Returns the handler arguments if method, path and body all match.
    pub fn matches(&self, request: &DispatchRequest<'_>) -> Option<Vec<String>> {
        if request.method != self.method {
            return None;
        }
        let mut args = self.path.captures(request.path)?;
        if let Some(body) = &self.body {
            args.extend(body.captures(request.body)?);
        }
        Some(args)
    }
}

impl fmt::Debug for CompiledMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledMatcher")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("path", &self.path.source())
            .field("body", &self.body.as_ref().map(Template::source))
            .field("arity", &self.handler.arity())
            .finish()
    }
}
