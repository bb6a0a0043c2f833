//! User entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access: manages projects, tasks, and users.
    Admin,
    /// Limited access: sees assigned work, updates own task status.
    Student,
}

impl Role {
    /// Returns the lowercase role name used in credentials.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }
}

/// A user in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Globally unique username.
    pub username: String,
    /// Hashed login credential. Never exposed through the API.
    pub password_hash: String,
    /// Role, immutable after creation.
    pub role: Role,
    /// University identifier, required for students.
    pub university_id: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            university_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the university identifier.
    pub fn with_university_id(mut self, university_id: impl Into<String>) -> Self {
        self.university_id = Some(university_id.into());
        self
    }

    /// Returns true if this user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("student1", "hash", Role::Student).with_university_id("12345");

        assert_eq!(user.username, "student1");
        assert_eq!(user.role, Role::Student);
        assert_eq!(user.university_id, Some("12345".to_string()));
        assert!(!user.is_admin());
    }
}
