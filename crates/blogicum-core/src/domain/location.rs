use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UNSAVED_ID;

/// Location entity - where a post was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn new(name: String) -> Self {
        Self {
            id: UNSAVED_ID,
            name,
            is_published: true,
            created_at: Utc::now(),
        }
    }
}
