//! Authentication and authorization module.

pub mod authorize;
pub mod claims;
pub mod credentials;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod session;
pub mod user;

pub use authorize::{ActionAuthorization, AuthzError, authorize, authorize_action, permissions_for_role};
pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use credentials::{LoginForm, RegisterForm};
pub use permissions::Permission;
pub use principal::Principal;
pub use roles::Role;
pub use session::{Hs256SessionCodec, JwtValidator, SessionGrant, TokenError};
pub use user::{NewUserForm, NewUserPayload, StaffAccount};
