//! Session models.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Access/refresh token pair as issued by the auth endpoints.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// An authenticated session.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

const MASK: &str = "********";

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &MASK)
            .field("refresh", &MASK)
            .finish()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &MASK)
            .field("refresh_token", &MASK)
            .field("user", &self.user)
            .finish()
    }
}

/// Authentication state published to the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
    /// Refresh failed and the session was cleared by the client.
    Expired,
}

impl SessionStatus {
    pub fn is_authenticated(self) -> bool {
        self == SessionStatus::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_tokens() {
        let session = Session {
            access_token: "eyJhbGciOi.access".into(),
            refresh_token: "eyJhbGciOi.refresh".into(),
            user: User {
                id: 1,
                username: "alice".into(),
                email: String::new(),
                first_name: String::new(),
                last_name: String::new(),
                full_name: None,
                is_staff: false,
                two_factor_enabled: false,
            },
        };
        let pair = TokenPair {
            access: session.access_token.clone(),
            refresh: session.refresh_token.clone(),
        };

        for printed in [format!("{session:?}"), format!("{pair:?}")] {
            assert!(!printed.contains("eyJhbGciOi"), "{printed}");
        }
        assert!(format!("{session:?}").contains("alice"));
    }
}
