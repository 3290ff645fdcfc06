use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Coach,
    Member,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "Admin"),
            UserRole::Coach => write!(f, "Coach"),
            UserRole::Member => write!(f, "Member"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Banned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Sparse filter for the users list. Absent fields are dropped from the
/// query string by the transport.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "perPage")]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BanRequest {
    pub reason: String,
    /// Open-ended ban when absent.
    pub until: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_parses_wire_shape() {
        let json = r#"{
            "id": 7,
            "email": "pat@example.com",
            "firstName": "Pat",
            "lastName": "Jones",
            "role": "member",
            "status": "active",
            "createdAt": "2026-01-10T08:30:00Z"
        }"#;
        let user: User = serde_json::from_str(json).expect("user");
        assert_eq!(user.full_name(), "Pat Jones");
        assert_eq!(user.role, UserRole::Member);
        assert_eq!(user.status, UserStatus::Active);
    }
}
