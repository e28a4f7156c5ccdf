// File: src/role.rs
// Purpose: Session role as supplied by the auth provider

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of the current session.
///
/// The auth provider pushes a new value through
/// [`Navigator::update_role`](crate::Navigator::update_role) on login,
/// logout and token refresh. Guards read it live on every navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Guest,
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Guest => "guest",
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    /// Any signed-in role (admin included)
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, UserRole::Guest)
    }

    pub fn all() -> [UserRole; 3] {
        [UserRole::Guest, UserRole::User, UserRole::Admin]
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role string is not one of `guest`, `user`, `admin`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}' (expected guest, user or admin)")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(UserRole::Guest),
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!("admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!(" User ".parse::<UserRole>(), Ok(UserRole::User));
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_authenticated() {
        assert!(!UserRole::Guest.is_authenticated());
        assert!(UserRole::User.is_authenticated());
        assert!(UserRole::Admin.is_authenticated());
    }

    #[test]
    fn test_default_is_guest() {
        assert_eq!(UserRole::default(), UserRole::Guest);
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }
}
