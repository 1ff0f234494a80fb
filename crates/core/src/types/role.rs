//! Application roles.

use serde::{Deserialize, Serialize};

/// Role assigned to a profile, gating route access.
///
/// A profile has at most one role, set at sign-up. A profile with no role
/// row resolves to `None` and is treated as unauthenticated-equivalent by
/// the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Marketplace operator: manages users and vendor memberships.
    Admin,
    /// Sells products; owns a catalog and a membership record.
    Vendor,
    /// Shops the catalog; owns a cart, orders, and a guest list.
    User,
}

impl Role {
    /// The route this role lands on after login.
    #[must_use]
    pub const fn home_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Vendor => "/vendor",
            Self::User => "/user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Vendor => write!(f, "vendor"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "vendor" => Ok(Self::Vendor),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_home_paths() {
        assert_eq!(Role::Admin.home_path(), "/admin");
        assert_eq!(Role::Vendor.home_path(), "/vendor");
        assert_eq!(Role::User.home_path(), "/user");
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Vendor).unwrap(), "\"vendor\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("superuser".parse::<Role>().is_err());
    }
}
