//! Role protocol documents.
//!
//! Field names and field order are part of the wire format peers parse:
//!
//! ```text
//! { "roles": [ { "role_url": "...",
//!                "handlers": [ { "name": "...", "method": "...", "path": "...", "data": "..." } ] } ] }
//! ```
//!
//! `data` is omitted entirely when a handler has no body template.

use serde::{Deserialize, Serialize};

/// Discovery description of one handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerDescriptor {
    /// Descriptive name.
    pub name: String,

    /// HTTP method, matched exactly.
    pub method: String,

    /// Path template.
    #[serde(rename = "path")]
    pub path_template: String,

    /// Body template; empty means no body pattern is required.
    #[serde(rename = "data", default, skip_serializing_if = "String::is_empty")]
    pub body_template: String,
}

impl HandlerDescriptor {
    pub fn new(
        name: impl Into<String>,
        method: impl Into<String>,
        path_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            path_template: path_template.into(),
            body_template: String::new(),
        }
    }

    /// Require the request body to match `body_template`.
    pub fn with_data(mut self, body_template: impl Into<String>) -> Self {
        self.body_template = body_template.into();
        self
    }
}

/// A service's advertised capability set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDescriptor {
    pub role_url: String,
    pub handlers: Vec<HandlerDescriptor>,
}

/// Top-level discovery document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProtocol {
    pub roles: Vec<RoleDescriptor>,
}

impl RoleProtocol {
    /// A document advertising exactly one role.
    pub fn single(role: RoleDescriptor) -> Self {
        Self { roles: vec![role] }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
