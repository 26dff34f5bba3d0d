//! Role servant library.
//!
//! Exposes named handlers over HTTP using `$(label)` path and body templates,
//! and describes them to peers through a role protocol document.

// Core
pub mod error;
pub mod routing;
pub mod servant;

// Transport
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

// Example services
pub mod servants;

pub use config::ServantConfig;
pub use error::{DispatchError, RegistrationError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{DispatchRequest, LiteralMode};
pub use servant::{HandlerDescriptor, Outcome, Registry, RoleDescriptor, RoleProtocol};
