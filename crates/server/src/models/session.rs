//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use hondana_core::AdminRole;

/// Identity carried in the signed session cookie.
///
/// The back-office authenticates with one shared password, so this is a fixed
/// identity rather than a database row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Stable identifier of the shared admin identity.
    pub id: String,
    /// Display name shown in the back-office.
    pub name: String,
    /// Role/permission level.
    pub role: AdminRole,
}

impl CurrentAdmin {
    /// The identity issued on a successful shared-password login.
    #[must_use]
    pub fn shared() -> Self {
        Self {
            id: "admin-1".to_string(),
            name: "Administrator".to_string(),
            role: AdminRole::Admin,
        }
    }
}
