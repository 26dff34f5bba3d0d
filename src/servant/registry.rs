//! Handler registry.
//!
//! # Responsibilities
//! - Hold the role descriptor reported to peers
//! - Hold compiled matchers in registration order for dispatch
//! - Reject registrations whose templates do not compile or whose capture
//!   count does not fit the handler
//!
//! # Design Decisions
//! - Registration is all-or-nothing: a failed call mutates nothing
//! - Mutation needs `&mut self`; the server shares the registry behind an
//!   `Arc`, so it is frozen once serving starts
//! - Nothing is ever removed or reordered

use crate::error::RegistrationError;
use crate::routing::{CompiledMatcher, LiteralMode};
use crate::servant::handler::IntoHandler;
use crate::servant::protocol::{HandlerDescriptor, RoleDescriptor, RoleProtocol};

/// Registered handlers of one service.
#[derive(Debug, Default)]
pub struct Registry {
    role: RoleDescriptor,
    matchers: Vec<CompiledMatcher>,
    literal_mode: LiteralMode,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry whose templates treat literal text as `mode` says.
    pub fn with_literal_mode(mode: LiteralMode) -> Self {
        Self {
            literal_mode: mode,
            ..Self::default()
        }
    }

    /// Set the URL identifying this service's role. Not validated.
    pub fn set_role_url(&mut self, url: impl Into<String>) {
        self.role.role_url = url.into();
    }

    /// Compile and append a handler.
    pub fn register_handler<H, Args>(
        &mut self,
        descriptor: HandlerDescriptor,
        handler: H,
    ) -> Result<(), RegistrationError>
    where
        H: IntoHandler<Args>,
    {
        let handler = handler.into_handler();
        let matcher = CompiledMatcher::compile(
            &descriptor.name,
            &descriptor.method,
            &descriptor.path_template,
            &descriptor.body_template,
            self.literal_mode,
            handler,
        )?;

        if let Some(arity) = matcher.handler().arity() {
            let captures = matcher.capture_count();
            if arity != captures {
                return Err(RegistrationError::ArityMismatch {
                    handler: descriptor.name,
                    captures,
                    arity,
                });
            }
        }

        tracing::info!(
            handler = %descriptor.name,
            method = %descriptor.method,
            path = %descriptor.path_template,
            data = %descriptor.body_template,
            "Handler registered"
        );

        self.role.handlers.push(descriptor);
        self.matchers.push(matcher);
        Ok(())
    }

    /// The role descriptor, handlers in registration order.
    pub fn role(&self) -> &RoleDescriptor {
        &self.role
    }

    /// Compiled matchers in registration order.
    pub fn matchers(&self) -> &[CompiledMatcher] {
        &self.matchers
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// The discovery document for this service.
    pub fn protocol(&self) -> RoleProtocol {
        RoleProtocol::single(self.role.clone())
    }

    /// The discovery document, serialized.
    pub fn report_roles(&self) -> Result<String, serde_json::Error> {
        self.protocol().to_json()
    }
}
