use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MAX_LENGTH, UNSAVED_ID};
use crate::error::DomainError;

/// Category entity - groups posts under a URL-stable slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new, published category. The slug may only hold latin letters,
    /// digits, hyphens and underscores.
    pub fn new(title: String, description: String, slug: String) -> Result<Self, DomainError> {
        if title.trim().is_empty() || title.chars().count() > MAX_LENGTH {
            return Err(DomainError::invalid(format!(
                "title: must be between 1 and {MAX_LENGTH} characters"
            )));
        }
        if !is_valid_slug(&slug) {
            return Err(DomainError::invalid(
                "slug: only latin letters, digits, hyphen and underscore are allowed",
            ));
        }

        Ok(Self {
            id: UNSAVED_ID,
            title,
            description,
            slug,
            is_published: true,
            created_at: Utc::now(),
        })
    }

    pub fn unpublished(mut self) -> Self {
        self.is_published = false;
        self
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_LENGTH
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
