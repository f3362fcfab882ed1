use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UNSAVED_ID;

/// Comment entity - a reply left under a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment on `post_id` written by `author_id`.
    pub fn new(post_id: i64, author_id: i64, text: String) -> Self {
        Self {
            id: UNSAVED_ID,
            post_id,
            author_id,
            text,
            created_at: Utc::now(),
        }
    }
}
