use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UNSAVED_ID;

/// Post entity - a blog publication, possibly scheduled for the future.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The author-editable part of a post.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub image: Option<String>,
}

/// A post annotated with the number of comments it has.
#[derive(Debug, Clone)]
pub struct PostSummary {
    pub post: Post,
    pub comment_count: u64,
}

impl Post {
    /// Create a new post. The author always comes from the caller, never from the draft.
    pub fn new(author_id: i64, draft: PostDraft) -> Self {
        Self {
            id: UNSAVED_ID,
            author_id,
            category_id: draft.category_id,
            location_id: draft.location_id,
            title: draft.title,
            text: draft.text,
            pub_date: draft.pub_date,
            is_published: draft.is_published,
            image: draft.image,
            created_at: Utc::now(),
        }
    }

    /// Replace every editable field. Author and creation time stay untouched.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.text = draft.text;
        self.pub_date = draft.pub_date;
        self.is_published = draft.is_published;
        self.category_id = draft.category_id;
        self.location_id = draft.location_id;
        self.image = draft.image;
    }

    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}
