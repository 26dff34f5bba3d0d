//! Dispatch engine.
//!
//! # Responsibilities
//! - Select the first registered matcher accepting method, path and body
//! - Invoke its handler with path captures followed by body captures
//! - Translate the handler's outcome into a response body or error
//!
//! # Design Decisions
//! - First match wins; a body mismatch moves on to the next handler
//! - Invocation is synchronous; callers that must not block an async
//!   executor run this on a blocking thread
//! - No locking: the registry is read-only while dispatching
//! - A panicking handler is reported as a failure of that handler

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::DispatchError;
use crate::routing::DispatchRequest;
use crate::servant::handler::Outcome;
use crate::servant::registry::Registry;

/// A successfully handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Name of the handler that served the request.
    pub handler: String,
    /// Response body; empty when the handler produced nothing.
    pub body: String,
}

impl Registry {
    /// Route a request to the first matching handler and invoke it.
    pub fn call_handler(&self, request: &DispatchRequest<'_>) -> Result<Dispatched, DispatchError> {
        let Some((matcher, args)) = self
            .matchers()
            .iter()
            .find_map(|m| m.matches(request).map(|args| (m, args)))
        else {
            tracing::debug!(method = %request.method, path = %request.path, "No handler matched");
            return Err(DispatchError::NoHandlerMatched);
        };

        tracing::debug!(
            handler = %matcher.name(),
            method = %request.method,
            path = %request.path,
            args = args.len(),
            "Dispatching"
        );

        let handler = matcher.handler();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.call(args))).map_err(|payload| {
            tracing::error!(
                handler = %matcher.name(),
                panic = %panic_message(&*payload),
                "Handler panicked"
            );
            DispatchError::HandlerPanicked {
                handler: Some(matcher.name().to_string()),
            }
        })?;

        match outcome {
            Outcome::Empty => Ok(Dispatched {
                handler: matcher.name().to_string(),
                body: String::new(),
            }),
            Outcome::Value(body) => Ok(Dispatched {
                handler: matcher.name().to_string(),
                body,
            }),
            Outcome::Failure(message) => {
                tracing::warn!(handler = %matcher.name(), error = %message, "Handler failed");
                Err(DispatchError::HandlerFailed {
                    handler: matcher.name().to_string(),
                    message,
                })
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servant::protocol::HandlerDescriptor;
    use std::sync::{Arc, Mutex};

    fn get(path: &str) -> DispatchRequest<'_> {
        DispatchRequest::new("GET", path, "")
    }

    #[test]
    fn test_single_argument() {
        let received = Arc::new(Mutex::new(String::from("unmodified")));
        let sink = received.clone();

        let mut registry = Registry::new();
        registry
            .register_handler(
                HandlerDescriptor::new("test 1", "GET", "/test1/$(arg1)"),
                move |arg1: String| {
                    *sink.lock().unwrap() = arg1;
                    "ok"
                },
            )
            .unwrap();

        let dispatched = registry.call_handler(&get("/test1/argumentReceived")).unwrap();
        assert_eq!(dispatched.body, "ok");
        assert_eq!(dispatched.handler, "test 1");
        assert_eq!(*received.lock().unwrap(), "argumentReceived");
    }

    #[test]
    fn test_no_handler_found() {
        let received = Arc::new(Mutex::new(String::from("unmodified")));
        let sink = received.clone();

        let mut registry = Registry::new();
        registry
            .register_handler(
                HandlerDescriptor::new("test 1", "GET", "/test1/$(arg 1)"),
                move |arg1: String| {
                    *sink.lock().unwrap() = arg1;
                    "ok"
                },
            )
            .unwrap();

        let err = registry.call_handler(&get("/notatest")).unwrap_err();
        assert_eq!(err, DispatchError::NoHandlerMatched);
        assert_eq!(err.to_string(), "No handler found");
        assert_eq!(*received.lock().unwrap(), "unmodified");

        let wrong_method = DispatchRequest::new("POST", "/test1/x", "");
        assert_eq!(registry.call_handler(&wrong_method), Err(DispatchError::NoHandlerMatched));
    }

    #[test]
    fn test_multiple_handlers() {
        let mut registry = Registry::new();
        registry
            .register_handler(HandlerDescriptor::new("test 1", "GET", "/test1/$(arg 1)"), |a: String| a)
            .unwrap();
        registry
            .register_handler(
                HandlerDescriptor::new("test 2", "GET", "/test2/$(arg 1)/$(arg 2)"),
                |a: String, b: String| a + &b,
            )
            .unwrap();

        let dispatched = registry.call_handler(&get("/test2/cat/dog")).unwrap();
        assert_eq!(dispatched.handler, "test 2");
        assert_eq!(dispatched.body, "catdog");
    }

    #[test]
    fn test_empty_result() {
        let mut registry = Registry::new();
        registry
            .register_handler(HandlerDescriptor::new("test 1", "GET", "/test1/$(arg 1)"), |_: String| ())
            .unwrap();

        let dispatched = registry.call_handler(&get("/test1/catdog")).unwrap();
        assert_eq!(dispatched.body, "");
    }

    #[test]
    fn test_failure_result() {
        let mut registry = Registry::new();
        registry
            .register_handler(
                HandlerDescriptor::new("test 1", "GET", "/test1/$(arg 1)"),
                |arg1: String| -> Result<String, String> {
                    if arg1 == "bomb" {
                        Err("kaboom".to_string())
                    } else {
                        Ok(arg1)
                    }
                },
            )
            .unwrap();

        assert_eq!(registry.call_handler(&get("/test1/catdog")).unwrap().body, "catdog");

        let err = registry.call_handler(&get("/test1/bomb")).unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "kaboom");
        assert_eq!(err.handler(), Some("test 1"));
    }

    #[test]
    fn test_first_registered_wins() {
        let mut registry = Registry::new();
        registry
            .register_handler(HandlerDescriptor::new("broad", "GET", "/items/$(rest)"), |_: String| "broad")
            .unwrap();
        registry
            .register_handler(HandlerDescriptor::new("narrow", "GET", "/items/$(id)"), |_: String| "narrow")
            .unwrap();

        assert_eq!(registry.call_handler(&get("/items/7")).unwrap().body, "broad");
    }

    #[test]
    fn test_body_pattern_differentiates_shared_path() {
        let mut registry = Registry::new();
        registry
            .register_handler(
                HandlerDescriptor::new("on", "POST", "/light/$(id)").with_data("on"),
                |id: String| format!("{id} on"),
            )
            .unwrap();
        registry
            .register_handler(
                HandlerDescriptor::new("level", "POST", "/light/$(id)").with_data("level=$(n)"),
                |id: String, n: String| format!("{id} at {n}"),
            )
            .unwrap();

        let on = registry
            .call_handler(&DispatchRequest::new("POST", "/light/porch", "on"))
            .unwrap();
        assert_eq!(on.body, "porch on");

        let level = registry
            .call_handler(&DispatchRequest::new("POST", "/light/porch", "level=40"))
            .unwrap();
        assert_eq!(level.handler, "level");
        assert_eq!(level.body, "porch at 40");

        let neither = registry.call_handler(&DispatchRequest::new("POST", "/light/porch", "off"));
        assert_eq!(neither, Err(DispatchError::NoHandlerMatched));
    }

    #[test]
    fn test_panicking_handler_keeps_its_name() {
        let mut registry = Registry::new();
        registry
            .register_handler(HandlerDescriptor::new("fragile", "GET", "/fragile/$(what)"), |what: String| -> String {
                panic!("cannot handle {what}")
            })
            .unwrap();
        registry
            .register_handler(HandlerDescriptor::new("sturdy", "GET", "/sturdy"), || "fine")
            .unwrap();

        let err = registry.call_handler(&get("/fragile/glass")).unwrap_err();
        assert_eq!(
            err,
            DispatchError::HandlerPanicked {
                handler: Some("fragile".to_string())
            }
        );
        assert_eq!(err.handler(), Some("fragile"));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "Handler panicked");

        assert_eq!(registry.call_handler(&get("/sturdy")).unwrap().body, "fine");
    }
}
