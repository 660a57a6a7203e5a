//! Explicit caller identity
//!
//! There is no ambient "current user" anywhere in this crate. Signing in
//! yields an [`AuthContext`] and every role-gated service operation takes it
//! as an argument, so authorization is enforced where the data is accessed
//! rather than in whatever UI sits in front of it.

use crate::error::Error;
use crate::models::{UserProfile, UserRole};

use super::session::Session;

/// An authenticated caller: the provider session plus the portal profile
/// (which carries the role claim)
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub session: Session,
    pub profile: UserProfile,
}

impl AuthContext {
    pub fn new(session: Session, profile: UserProfile) -> Self {
        Self { session, profile }
    }

    /// The caller's user id
    pub fn uid(&self) -> &str {
        &self.profile.uid
    }

    /// The caller's role
    pub fn role(&self) -> UserRole {
        self.profile.role
    }

    pub fn is_admin(&self) -> bool {
        self.role() == UserRole::Admin
    }

    pub fn is_resident(&self) -> bool {
        self.role() == UserRole::Resident
    }

    /// Require the administrator role
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("administrator role required"))
        }
    }

    /// Require the resident role
    pub fn require_resident(&self) -> Result<(), Error> {
        if self.is_resident() {
            Ok(())
        } else {
            Err(Error::forbidden("resident role required"))
        }
    }

    /// Whether the caller may read records belonging to `user_id`:
    /// admins may read anyone's, everyone else only their own
    pub fn can_access_user(&self, user_id: &str) -> bool {
        self.is_admin() || self.uid() == user_id
    }

    /// The caller's access token
    pub(crate) fn token(&self) -> &str {
        &self.session.access_token
    }
}
