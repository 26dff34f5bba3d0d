//! Servant core: handler registry, dispatch engine and role reporting.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     HandlerDescriptor + callable
//!     → handler.rs (adapt callable to the uniform Handler contract)
//!     → registry.rs (compile templates, check arity, append)
//!
//! Request time:
//!     DispatchRequest
//!     → dispatch.rs (first match, invoke, interpret Outcome)
//!     → Dispatched | DispatchError
//!
//! Discovery:
//!     Registry → protocol.rs → { "roles": [ ... ] }
//! ```

pub mod dispatch;
pub mod handler;
pub mod protocol;
pub mod registry;

pub use dispatch::Dispatched;
pub use handler::{BoxedHandler, Handler, IntoHandler, IntoOutcome, Outcome, Variadic};
pub use protocol::{HandlerDescriptor, RoleDescriptor, RoleProtocol};
pub use registry::Registry;
