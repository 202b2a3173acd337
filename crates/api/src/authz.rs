//! Role gating at the route boundary.
//!
//! Checked before any upstream call is issued.

use papeleria_auth::{AuthzError, Permission, authorize_action};

use crate::context::SessionContext;

pub fn require(session: &SessionContext, permission: Permission) -> Result<(), AuthzError> {
    authorize_action(session.principal(), &permission)
}
