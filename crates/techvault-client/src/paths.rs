//! Fixed endpoints outside the generic entity resources.

pub const LOGIN: &str = "/api/auth/login/";
pub const REGISTRATION: &str = "/api/auth/registration/";
pub const LOGOUT: &str = "/api/auth/logout/";
pub const TOKEN_REFRESH: &str = "/api/token/refresh/";
pub const PROFILE: &str = "/api/user/profile/";
pub const CHOICES: &str = "/api/meta/choices/";

/// Report endpoint for a given report kind.
pub fn report(kind: &str) -> String {
    format!("/api/reports/{kind}/")
}
