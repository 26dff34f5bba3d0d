//! Example servants hosted by the `role-servant` binary.

pub mod echo;
pub mod time;

use clap::ValueEnum;

use crate::error::RegistrationError;
use crate::routing::LiteralMode;
use crate::servant::Registry;

/// Which example servant to host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServantKind {
    /// Prints posted messages (`POST /say`).
    Echo,
    /// Reports the local time (`GET /time`).
    Time,
}

/// Build the registry for `kind`.
pub fn build_registry(kind: ServantKind, mode: LiteralMode) -> Result<Registry, RegistrationError> {
    let mut registry = Registry::with_literal_mode(mode);
    match kind {
        ServantKind::Echo => echo::register(&mut registry)?,
        ServantKind::Time => time::register(&mut registry)?,
    }
    Ok(registry)
}
