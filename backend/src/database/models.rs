//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the `users` table. Note that these may differ from API-specific
//! models: [`AccountProfile`] is the only account shape that leaves the
//! service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access level of an account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
    #[serde(rename = "Super Admin")]
    SuperAdmin,
}

impl Role {
    /// Roles allowed to list every account.
    pub const ADMINISTRATORS: [Role; 2] = [Role::Admin, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
            Role::SuperAdmin => "Super Admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        Self::ADMINISTRATORS.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Role::User),
            "Admin" => Ok(Role::Admin),
            "Super Admin" => Ok(Role::SuperAdmin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// A persisted user account.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub verified: bool,
    pub phone_number: Option<i64>,
    pub bvn: Option<i64>,
    pub health_plan: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating an account. Id and timestamps are
/// assigned by the directory.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub verified: bool,
    pub role: Role,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountUpdate {
    pub phone_number: Option<i64>,
    pub bvn: Option<i64>,
    pub health_plan: Option<String>,
}

/// Account view safe to return to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub verified: bool,
    pub role: Role,
    pub health_plan: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountProfile {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            verified: account.verified,
            role: account.role,
            health_plan: account.health_plan.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"Super Admin\""
        );
        assert_eq!("Super Admin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert!("superadmin".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_admin_roles() {
        assert!(Role::Admin.is_admin());
        assert!(Role::SuperAdmin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn test_profile_omits_secrets() {
        let now = Utc::now();
        let account = Account {
            id: "id-1".to_string(),
            email: "a@b.com".to_string(),
            first_name: "a".to_string(),
            last_name: "b".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            verified: true,
            phone_number: Some(2347034568886),
            bvn: Some(12345678901),
            health_plan: Some("Gold".to_string()),
            role: Role::User,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(AccountProfile::from(&account)).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object["healthPlan"], "Gold");
        assert_eq!(object["firstName"], "a");
        for hidden in ["password", "passwordHash", "BVN", "bvn", "phoneNumber"] {
            assert!(!object.contains_key(hidden), "{} leaked", hidden);
        }
    }
}
