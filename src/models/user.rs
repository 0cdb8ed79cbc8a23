use std::fmt;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Hr,
    Department,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Hr => "hr",
            Role::Department => "department",
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Hr | Role::Department)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session token payload. The role is fixed at issuance and is what route
/// gates check against.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// HR and Department accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffUser {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl StaffUser {
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        role: Role,
        department: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name,
            email,
            password_hash,
            role,
            department,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StaffUserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&StaffUser> for StaffUserResponse {
    fn from(user: &StaffUser) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            department: user.department.clone(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Hr).unwrap(), "\"hr\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"department\"").unwrap(),
            Role::Department
        );
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn test_staff_roles() {
        assert!(Role::Department.is_staff());
        assert!(Role::Hr.is_staff());
        assert!(!Role::Candidate.is_staff());
    }
}
