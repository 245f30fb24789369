//! # Roles
//!
//! The role a caller acts under. How the role is derived (identity token,
//! group claims) lives in the adapter; the core only consumes the result.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::AccessError;

/// What the caller may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    /// A customer. Basket operations only.
    #[default]
    User,
    /// Event staff. May feed newly created products into the basket.
    Admin,
}

impl Role {
    /// Role for an externally computed admin flag.
    pub const fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Fails unless the role is [`Role::Admin`].
    pub fn require_admin(&self, operation: &str) -> Result<(), AccessError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AccessError::AdminRequired {
                operation: operation.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin() {
        assert!(Role::Admin.require_admin("add created product").is_ok());

        let err = Role::User.require_admin("add created product").unwrap_err();
        assert_eq!(err.to_string(), "add created product requires the admin role");
    }

    #[test]
    fn test_from_flag() {
        assert_eq!(Role::from_admin_flag(true), Role::Admin);
        assert_eq!(Role::from_admin_flag(false), Role::User);
        assert_eq!(Role::default(), Role::User);
    }
}
