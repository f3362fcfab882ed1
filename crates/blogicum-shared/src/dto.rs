//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::response::PageResponse;

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Description of the login endpoint, returned to redirected clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPageResponse {
    pub login_url: String,
    pub next: Option<String>,
}

/// A user as shown next to their posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: i64,
    pub username: String,
}

/// A user's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: DateTime<Utc>,
}

/// The requester's own account, as shown on the edit page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSummary {
    pub id: i64,
    pub name: String,
}

/// A post with its resolved relations and comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub image: Option<String>,
    pub author: AuthorSummary,
    pub category: Option<CategorySummary>,
    pub location: Option<LocationSummary>,
    pub comment_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author: AuthorSummary,
}

/// Single post page: the post and its comment thread, oldest comment first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: ProfileSummary,
    pub posts: PageResponse<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPageResponse {
    pub category: CategoryResponse,
    pub posts: PageResponse<PostResponse>,
}
