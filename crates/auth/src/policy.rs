use std::collections::BTreeSet;

use serde::Serialize;

use crate::Role;

/// Declarative authorization policy attached to a route at registration time.
///
/// Immutable once built. `allow_same_user` lets the subject named by the
/// route's `id` path segment through regardless of role.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AuthorizationPolicy {
    allowed_roles: BTreeSet<Role>,
    allow_same_user: bool,
}

impl AuthorizationPolicy {
    /// Policy admitting exactly the listed roles.
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: roles.into_iter().collect(),
            allow_same_user: false,
        }
    }

    /// Additionally admit the subject whose id matches the route's `id` segment.
    pub fn allow_same_user(mut self) -> Self {
        self.allow_same_user = true;
        self
    }

    /// Only managers; used for role administration.
    pub fn managers_only() -> Self {
        Self::roles([Role::Manager])
    }

    pub fn allowed_roles(&self) -> &BTreeSet<Role> {
        &self.allowed_roles
    }

    pub fn allows_same_user(&self) -> bool {
        self.allow_same_user
    }

    pub fn admits_role(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_admits_nobody() {
        let policy = AuthorizationPolicy::default();
        assert!(!policy.allows_same_user());
        assert!(Role::ALL.iter().all(|r| !policy.admits_role(*r)));
    }

    #[test]
    fn builder_sets_roles_and_self_access() {
        let policy = AuthorizationPolicy::roles([Role::Officer, Role::Manager]).allow_same_user();
        assert!(policy.allows_same_user());
        assert!(policy.admits_role(Role::Officer));
        assert!(policy.admits_role(Role::Manager));
        assert!(!policy.admits_role(Role::User));
    }

    #[test]
    fn duplicate_roles_collapse() {
        let policy = AuthorizationPolicy::roles([Role::User, Role::User]);
        assert_eq!(policy.allowed_roles().len(), 1);
    }
}
