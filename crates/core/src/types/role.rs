//! Admin role for the back-office.

use serde::{Deserialize, Serialize};

/// Role carried in the admin session identity.
///
/// The back-office uses a single shared credential, so there is exactly one
/// role today; the enum keeps the wire format explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access to all back-office operations.
    Admin,
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        let json = serde_json::to_string(&AdminRole::Admin).expect("serialize");
        assert_eq!(json, "\"admin\"");
        assert_eq!("admin".parse::<AdminRole>(), Ok(AdminRole::Admin));
        assert!("super_admin".parse::<AdminRole>().is_err());
    }
}
