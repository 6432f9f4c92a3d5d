//! Role predicates.
//!
//! One pure function per access level, each over the closed [`Role`] enum.
//! Everything beyond `anyone` and `authenticated` also requires an active
//! account.
//!
//! [`Role`]: domain::Role

use crate::middleware::CurrentUser;

type Identity<'a> = Option<&'a CurrentUser>;

fn active_with(identity: Identity<'_>, rule: impl Fn(&CurrentUser) -> bool) -> bool {
    identity.map_or(false, |user| user.is_active && rule(user))
}

/// Open endpoints (login, self-service registration).
pub fn anyone(_: Identity<'_>) -> bool {
    true
}

pub fn authenticated(identity: Identity<'_>) -> bool {
    identity.is_some()
}

pub fn active(identity: Identity<'_>) -> bool {
    active_with(identity, |_| true)
}

pub fn super_admin(identity: Identity<'_>) -> bool {
    active_with(identity, |u| u.role.is_super_admin())
}

/// Super admin or the landlord's owner.
pub fn account_owner(identity: Identity<'_>) -> bool {
    active_with(identity, |u| u.role.is_super_admin() || u.role.is_owner())
}

/// Super admin, owner or admin.
pub fn administrator(identity: Identity<'_>) -> bool {
    active_with(identity, |u| {
        u.role.is_super_admin() || u.role.is_owner() || u.role.is_admin()
    })
}

/// Owner or admin of a landlord.
pub fn settings_admin(identity: Identity<'_>) -> bool {
    active_with(identity, |u| u.role.is_owner() || u.role.is_admin())
}

/// Owner, admin or manager of a landlord.
pub fn manager(identity: Identity<'_>) -> bool {
    active_with(identity, |u| {
        u.role.is_owner() || u.role.is_admin() || u.role.is_manager()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Role;
    use uuid::Uuid;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            landlord_id: (!role.is_super_admin()).then(Uuid::new_v4),
            email: "someone@example.com".to_string(),
            role,
            is_active: true,
        }
    }

    type Predicate = fn(Identity<'_>) -> bool;

    #[test]
    fn test_anonymous_is_denied_except_open_endpoints() {
        let guarded: [Predicate; 7] = [
            authenticated,
            active,
            super_admin,
            account_owner,
            administrator,
            settings_admin,
            manager,
        ];
        for predicate in guarded {
            assert!(!predicate(None));
        }
        assert!(anyone(None));
    }

    #[test]
    fn test_manager_predicate() {
        assert!(manager(Some(&user(Role::Owner))));
        assert!(manager(Some(&user(Role::Admin))));
        assert!(manager(Some(&user(Role::Manager))));
        assert!(!manager(Some(&user(Role::Staff))));
        assert!(!manager(Some(&user(Role::SuperAdmin))));
    }

    #[test]
    fn test_administrator_includes_super_admin() {
        assert!(administrator(Some(&user(Role::SuperAdmin))));
        assert!(!administrator(Some(&user(Role::Manager))));
        assert!(!settings_admin(Some(&user(Role::SuperAdmin))));
    }

    #[test]
    fn test_inactive_accounts_fail_role_checks() {
        let mut owner = user(Role::Owner);
        owner.is_active = false;

        assert!(authenticated(Some(&owner)));
        assert!(!active(Some(&owner)));
        assert!(!account_owner(Some(&owner)));
    }
}
