use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// Roles travel as opaque upper-case strings (`"ADMIN"`, `"SUPERVISOR"`,
/// `"VENDEDOR"`) exactly as the upstream backend issues them. Deserializing
/// goes through [`Role::new`], so form input like `"admin"` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("ADMIN"));
    pub const SUPERVISOR: Role = Role(Cow::Borrowed("SUPERVISOR"));
    pub const VENDEDOR: Role = Role(Cow::Borrowed("VENDEDOR"));

    /// Normalizes case and surrounding whitespace.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.chars().any(|c| c.is_lowercase()) || trimmed.len() != name.len() {
            Self(Cow::Owned(trimmed.to_uppercase()))
        } else {
            Self(name)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        *self == Role::ADMIN
    }

    /// Label shown next to the session owner.
    pub fn label(&self) -> &'static str {
        match self.as_str() {
            "ADMIN" => "Administrador",
            "SUPERVISOR" => "Supervisor",
            _ => "Vendedor",
        }
    }

    /// Numeric role id the backend expects when creating accounts.
    pub fn backend_id(&self) -> Option<i64> {
        match self.as_str() {
            "ADMIN" => Some(2),
            "SUPERVISOR" => Some(3),
            "VENDEDOR" => Some(4),
            _ => None,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::VENDEDOR
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Role::new(name)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.0.into_owned()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
