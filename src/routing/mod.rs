//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     path/body template
//!     → template.rs (substitute `$(...)`, compile anchored pattern)
//!     → matcher.rs (method + path + optional body, bound to a handler)
//!     → appended to the Registry in call order
//!
//! Incoming Request (method, path, body)
//!     → matcher.rs (evaluate method, path, body with AND semantics)
//!     → Return: ordered captures or no match
//! ```
//!
//! # Design Decisions
//! - Matchers compiled at startup, immutable at runtime
//! - Deterministic: first registered, first matched
//! - Captures are positional strings; labels are documentation only

pub mod matcher;
pub mod template;

pub use matcher::{CompiledMatcher, DispatchRequest};
pub use template::{LiteralMode, Template};
