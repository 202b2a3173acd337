use papeleria_auth::{Principal, Role, SessionClaims};

/// Authenticated session attached to every guarded request.
///
/// Built only by the route guard from a verified session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    principal: Principal,
    access_token: String,
}

impl SessionContext {
    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            principal: claims.principal(),
            access_token: claims.access_token,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn name(&self) -> &str {
        &self.principal.name
    }

    pub fn role(&self) -> &Role {
        &self.principal.role
    }

    /// Upstream bearer token issued at login.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}
