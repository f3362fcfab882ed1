use async_trait::async_trait;

use crate::domain::{Category, Comment, Location, Post, PostSummary, User};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};
use crate::visibility::{PostFilter, Visibility};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity. Unsaved entities are inserted and receive an ID,
    /// stored ones are updated in place.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, applying the store's delete rules to
    /// dependent rows.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with account lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository with visibility-aware reads.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Fetch a single post if `visibility` admits it.
    async fn find_visible(
        &self,
        id: i64,
        visibility: Visibility,
    ) -> Result<Option<Post>, RepoError>;

    /// List posts matching `filter`, newest publication date first, each
    /// annotated with its comment count.
    async fn list(
        &self,
        filter: PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, i64> {
    /// Find a published category by slug. Unpublished categories are absent.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}

/// Location repository.
pub trait LocationRepository: BaseRepository<Location, i64> {}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    /// Comments on a post, oldest first.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError>;
}
