// SPDX-License-Identifier: MPL-2.0
//! Route access rules.
//!
//! Each navigable view may declare the set of roles allowed to enter it.
//! An empty set means the view has no role restriction.

use super::session::Role;
use std::collections::{BTreeMap, BTreeSet};

/// Set of roles permitted on a view. Empty means unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllowedRoles(BTreeSet<Role>);

impl AllowedRoles {
    /// No restriction.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Exactly one role.
    #[must_use]
    pub fn only(role: Role) -> Self {
        Self(BTreeSet::from([role]))
    }

    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns whether a session with `role` may enter.
    ///
    /// Unrestricted sets admit every role, including an absent one.
    #[must_use]
    pub fn permits(&self, role: Option<Role>) -> bool {
        if self.0.is_empty() {
            return true;
        }
        role.is_some_and(|r| self.0.contains(&r))
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Role> for AllowedRoles {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Mapping from view path to its allowed roles.
///
/// Paths are matched exactly after trailing-slash normalization; views that
/// are not listed are unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteAccessTable {
    routes: BTreeMap<String, AllowedRoles>,
}

impl RouteAccessTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares (or replaces) the rule for `path`.
    #[must_use]
    pub fn with_route(mut self, path: &str, roles: AllowedRoles) -> Self {
        self.insert(path, roles);
        self
    }

    /// Declares (or replaces) the rule for `path`.
    pub fn insert(&mut self, path: &str, roles: AllowedRoles) {
        self.routes.insert(normalize_path(path), roles);
    }

    /// Allowed roles for `path`; unrestricted when the view is not listed.
    #[must_use]
    pub fn allowed_roles(&self, path: &str) -> AllowedRoles {
        self.routes
            .get(&normalize_path(path))
            .cloned()
            .unwrap_or_default()
    }

    /// Iterates declared rules in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AllowedRoles)> {
        self.routes.iter().map(|(path, roles)| (path.as_str(), roles))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Strips the query string, fragment and trailing slashes; keeps `/` as is.
fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrestricted_permits_every_role_and_none() {
        let roles = AllowedRoles::any();
        assert!(roles.permits(None));
        for role in Role::ALL {
            assert!(roles.permits(Some(role)));
        }
    }

    #[test]
    fn restricted_rejects_absent_role() {
        let roles = AllowedRoles::only(Role::Admin);
        assert!(roles.permits(Some(Role::Admin)));
        assert!(!roles.permits(Some(Role::Patient)));
        assert!(!roles.permits(None));
    }

    #[test]
    fn unknown_route_is_unrestricted() {
        let table = RouteAccessTable::new().with_route("/admin", AllowedRoles::only(Role::Admin));
        assert!(table.allowed_roles("/citas").is_unrestricted());
    }

    #[test]
    fn lookup_normalizes_trailing_slash_and_query() {
        let table = RouteAccessTable::new().with_route("/admin/", AllowedRoles::only(Role::Admin));
        assert_eq!(table.allowed_roles("/admin"), AllowedRoles::only(Role::Admin));
        assert_eq!(
            table.allowed_roles("/admin?tab=users#top"),
            AllowedRoles::only(Role::Admin)
        );
        assert_eq!(table.allowed_roles("admin"), AllowedRoles::only(Role::Admin));
    }

    #[test]
    fn root_path_is_kept() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn insert_replaces_existing_rule() {
        let mut table = RouteAccessTable::new();
        table.insert("/agenda", AllowedRoles::only(Role::Patient));
        table.insert("/agenda", [Role::Specialist, Role::Admin].into_iter().collect());
        assert_eq!(table.len(), 1);
        let roles = table.allowed_roles("/agenda");
        assert!(!roles.permits(Some(Role::Patient)));
        assert!(roles.permits(Some(Role::Specialist)));
    }
}
