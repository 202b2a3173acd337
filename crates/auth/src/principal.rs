use serde::{Deserialize, Serialize};

use crate::Role;

/// The authenticated staff member behind a request.
///
/// Built from verified session claims; never from request input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Upstream identity (user id or cédula, whatever the backend returned).
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}
