//! Speech servant: prints whatever it is told to say.

use crate::error::RegistrationError;
use crate::servant::{HandlerDescriptor, Registry};

pub const ROLE_URL: &str = "http://belphanior.net/roles/speech/v1";

pub fn register(registry: &mut Registry) -> Result<(), RegistrationError> {
    registry.set_role_url(ROLE_URL);
    registry.register_handler(
        HandlerDescriptor::new("output", "POST", "/say").with_data("$(output)"),
        |message: String| {
            tracing::debug!(bytes = message.len(), "Saying message");
            println!("{message}");
        },
    )
}
