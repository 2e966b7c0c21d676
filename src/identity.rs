//! External identity and group membership types
//!
//! These are the values produced by an [`IdentityProvider`](crate::providers::IdentityProvider)
//! during a single authentication attempt. Nothing here is persisted.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Minimal user profile obtained from the external provider
///
/// # Examples
///
/// ```
/// use authgate::identity::ExternalIdentity;
///
/// let identity = ExternalIdentity::new("alice", "a@x.com");
/// assert_eq!(identity.display_name, "alice");
/// assert_eq!(identity.email, "a@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    /// Provider username, used as the display name
    pub display_name: String,
    /// Email reported by the provider (empty when not disclosed)
    pub email: String,
}

impl ExternalIdentity {
    /// Create a new identity from a display name and email
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
        }
    }
}

/// One group the external user belongs to, as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupMembership {
    /// Group `path` (GitLab; the last path segment, not `full_path`) or
    /// organization login (GitHub)
    pub path: String,
}

impl GroupMembership {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Result of a membership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Authorized,
    Forbidden,
}

/// Final outcome of [`authenticate`](crate::gate::authenticate)
///
/// `Forbidden` carries no identity: a denied user's profile is never handed
/// back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The user is authenticated and allowed in
    Authenticated(ExternalIdentity),
    /// The user is authenticated but not a member of any allowed group
    Forbidden,
}

/// Configured allowlist of group paths
///
/// Paths are compared by exact string equality. An empty allowlist disables
/// the membership check altogether.
///
/// # Examples
///
/// ```
/// use authgate::identity::{AllowedGroups, Decision, GroupMembership};
///
/// let allowed = AllowedGroups::new(["core-team"]);
/// let groups = vec![GroupMembership::new("other"), GroupMembership::new("core-team")];
/// assert_eq!(allowed.decide(&groups), Decision::Authorized);
///
/// let groups = vec![GroupMembership::new("core-team/sub")];
/// assert_eq!(allowed.decide(&groups), Decision::Forbidden);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedGroups {
    paths: HashSet<String>,
}

impl AllowedGroups {
    /// Build an allowlist from any iterator of group paths
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// An allowlist that authorizes every authenticated user
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Decide membership against the complete list of the user's groups
    ///
    /// Callers must pass every group across every page; a partial list could
    /// produce a false `Forbidden`.
    pub fn decide(&self, groups: &[GroupMembership]) -> Decision {
        if self.is_empty() || groups.iter().any(|group| self.contains(&group.path)) {
            Decision::Authorized
        } else {
            Decision::Forbidden
        }
    }
}
