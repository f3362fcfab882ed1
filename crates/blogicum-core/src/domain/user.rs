use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UNSAVED_ID;

/// User entity - an account that writes posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields a user may change on their own account.
#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    /// Create a new, unsaved user.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: UNSAVED_ID,
            username,
            first_name: String::new(),
            last_name: String::new(),
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }

    pub fn apply_profile(&mut self, changes: ProfileChanges) {
        self.username = changes.username;
        self.first_name = changes.first_name;
        self.last_name = changes.last_name;
        self.email = changes.email;
    }
}
