//! Explicit authentication context passed into every identity-scoped call.

use super::UserId;

/// Who is making a request. Built at the transport boundary from the session
/// cookie or Basic credentials and handed to services as a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthContext {
    #[default]
    Anonymous,
    Authenticated(UserId),
}

impl AuthContext {
    #[must_use]
    pub const fn authenticated(id: UserId) -> Self {
        Self::Authenticated(id)
    }

    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(id) => Some(*id),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
