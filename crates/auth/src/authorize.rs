use thiserror::Error;

use crate::{Permission, Principal, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Action-side authorization contract (checked at the route boundary).
///
/// Implement this on actions that require permissions; the API layer checks
/// them before any upstream call is issued.
pub trait ActionAuthorization {
    fn required_permissions(&self) -> &[Permission];
}

/// A bare permission guards an action that needs exactly that permission.
impl ActionAuthorization for Permission {
    fn required_permissions(&self) -> &[Permission] {
        core::slice::from_ref(self)
    }
}

/// Authorize a principal for every permission an action requires.
pub fn authorize_action<A: ActionAuthorization>(principal: &Principal, action: &A) -> Result<(), AuthzError> {
    action
        .required_permissions()
        .iter()
        .try_for_each(|perm| authorize(principal, perm))
}

/// Role → permission policy.
///
/// ADMIN holds the wildcard. SUPERVISOR may additionally edit the catalog.
/// Every authenticated role may operate sales, quotes, collections, reports
/// and exchange rates.
pub fn permissions_for_role(role: &Role) -> Vec<Permission> {
    if role.is_admin() {
        return vec![Permission::WILDCARD];
    }

    let mut perms = vec![
        Permission::INVENTORY_READ,
        Permission::SALES,
        Permission::PRICING,
        Permission::ACCOUNTS,
        Permission::REPORTS,
        Permission::EXCHANGE,
    ];
    if *role == Role::SUPERVISOR {
        perms.push(Permission::INVENTORY_WRITE);
    }
    perms
}

/// Authorize a principal for one permission.
///
/// - No IO
/// - No panics
/// - Pure policy check
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let granted = permissions_for_role(&principal.role);
    if granted.iter().any(|p| p.is_wildcard() || p == required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal::new("1", "Ana", role)
    }

    #[test]
    fn admin_is_granted_everything() {
        let p = principal(Role::ADMIN);
        assert!(authorize(&p, &Permission::USERS_MANAGE).is_ok());
        assert!(authorize(&p, &Permission::new("anything.else")).is_ok());
    }

    #[test]
    fn user_management_is_admin_only() {
        for role in [Role::SUPERVISOR, Role::VENDEDOR] {
            let err = authorize(&principal(role), &Permission::USERS_MANAGE).unwrap_err();
            assert_eq!(err, AuthzError::Forbidden("users.manage".to_string()));
        }
    }

    #[test]
    fn only_supervisors_and_admins_edit_inventory() {
        assert!(authorize(&principal(Role::SUPERVISOR), &Permission::INVENTORY_WRITE).is_ok());
        assert!(authorize(&principal(Role::VENDEDOR), &Permission::INVENTORY_WRITE).is_err());
        assert!(authorize(&principal(Role::VENDEDOR), &Permission::INVENTORY_READ).is_ok());
    }

    #[test]
    fn single_permission_guards_an_action() {
        let seller = principal(Role::VENDEDOR);
        assert_eq!(Permission::SALES.required_permissions(), &[Permission::SALES]);
        assert!(authorize_action(&seller, &Permission::SALES).is_ok());
        assert_eq!(
            authorize_action(&seller, &Permission::USERS_MANAGE),
            Err(AuthzError::Forbidden("users.manage".to_string()))
        );
    }

    #[test]
    fn every_role_can_collect_payments() {
        for role in [Role::ADMIN, Role::SUPERVISOR, Role::VENDEDOR, Role::new("cajero")] {
            assert!(authorize(&principal(role), &Permission::ACCOUNTS).is_ok());
        }
    }
}
