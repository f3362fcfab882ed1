//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};

use blogicum_core::domain::{Category, Comment, Post, PostSummary, User};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use blogicum_core::visibility::{PostFilter, Visibility};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::Entity as LocationEntity;
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// SQL form of the visibility gate. Expects `categories` to be joined.
fn gate(now: chrono::DateTime<chrono::Utc>) -> Condition {
    Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(category::Column::IsPublished.eq(true))
        .add(post::Column::PubDate.lte(now))
}

pub(crate) fn visibility_condition(visibility: Visibility) -> Condition {
    match visibility {
        Visibility::Public { now } => gate(now),
        Visibility::PublicOrAuthoredBy { author_id, now } => Condition::any()
            .add(gate(now))
            .add(post::Column::AuthorId.eq(author_id)),
        Visibility::Published => Condition::all().add(post::Column::IsPublished.eq(true)),
        Visibility::All => Condition::all(),
    }
}

pub(crate) fn filter_condition(filter: PostFilter) -> Condition {
    let mut condition = Condition::all().add(visibility_condition(filter.visibility));
    if let Some(author_id) = filter.author_id {
        condition = condition.add(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = filter.category_id {
        condition = condition.add(post::Column::CategoryId.eq(category_id));
    }
    condition
}

/// A post row with its comment count.
#[derive(Debug, FromQueryResult)]
struct PostWithCount {
    id: i64,
    author_id: i64,
    category_id: Option<i64>,
    location_id: Option<i64>,
    title: String,
    text: String,
    pub_date: DateTimeWithTimeZone,
    is_published: bool,
    image: Option<String>,
    created_at: DateTimeWithTimeZone,
    comment_count: i64,
}

impl From<PostWithCount> for PostSummary {
    fn from(row: PostWithCount) -> Self {
        let post = post::Model {
            id: row.id,
            author_id: row.author_id,
            category_id: row.category_id,
            location_id: row.location_id,
            title: row.title,
            text: row.text,
            pub_date: row.pub_date,
            is_published: row.is_published,
            image: row.image,
            created_at: row.created_at,
        };

        Self {
            post: post.into(),
            comment_count: row.comment_count.max(0) as u64,
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_visible(
        &self,
        id: i64,
        visibility: Visibility,
    ) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .join(JoinType::LeftJoin, post::Relation::Category.def())
            .filter(visibility_condition(visibility))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(
        &self,
        filter: PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError> {
        let base = PostEntity::find()
            .join(JoinType::LeftJoin, post::Relation::Category.def())
            .filter(filter_condition(filter));

        let total = base.clone().count(&self.db).await.map_err(repo_err)?;
        let window = page.resolve(total)?;

        let rows = base
            .join(JoinType::LeftJoin, post::Relation::Comments.def())
            .column_as(comment::Column::Id.count(), "comment_count")
            .group_by(post::Column::Id)
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .offset(window.offset())
            .limit(window.per_page)
            .into_model::<PostWithCount>()
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        tracing::debug!(
            total,
            page = window.number,
            returned = rows.len(),
            "Listed posts"
        );

        Ok(window.into_page(rows.into_iter().map(Into::into).collect()))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .filter(category::Column::IsPublished.eq(true))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}

impl LocationRepository for PostgresLocationRepository {}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
