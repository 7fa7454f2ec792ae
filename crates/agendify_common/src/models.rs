// This file contains data structures that are common across the application.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The authenticated caller of a core operation.
///
/// Materialized once at the HTTP boundary and passed explicitly into every
/// operation; core code never reaches into ambient session state. Tenant
/// scoping of reads and writes always derives from this struct, never from
/// client-supplied identifiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CallerContext {
    /// The caller's user id. For staff members this doubles as their staff id.
    pub user_id: Uuid,
    /// The tenant every read and write is scoped by.
    pub tenant_id: Uuid,
    /// The caller's role within the tenant.
    pub role: Role,
}

impl CallerContext {
    pub fn new(user_id: Uuid, tenant_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            tenant_id,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Caller role within a tenant.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Staff => write!(f, "staff"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("staff".parse::<Role>().unwrap(), Role::Staff);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_admin_check_follows_role() {
        let ctx = CallerContext::new(Uuid::new_v4(), Uuid::new_v4(), Role::Staff);
        assert!(!ctx.is_admin());
        let ctx = CallerContext { role: Role::Admin, ..ctx };
        assert!(ctx.is_admin());
    }
}
