//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All repositories handed out by one [`InMemoryDatabase`] share the same
//! tables. Unique keys, foreign keys and delete rules mirror the SQL schema:
//! deleting a user or a post cascades, deleting a category or a location
//! clears the reference on its posts.
//! Note: Data is lost on process restart.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blogicum_core::domain::{Category, Comment, Location, Post, PostSummary, UNSAVED_ID, User};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};
use blogicum_core::visibility::{PostFilter, Visibility};

#[derive(Default)]
pub struct Tables {
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    locations: BTreeMap<i64, Location>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn category_of(&self, post: &Post) -> Option<&Category> {
        post.category_id.and_then(|id| self.categories.get(&id))
    }

    fn comment_count(&self, post_id: i64) -> u64 {
        self.comments
            .values()
            .filter(|c| c.post_id == post_id)
            .count() as u64
    }

    fn delete_post_cascade(&mut self, post_id: i64) {
        self.posts.remove(&post_id);
        self.comments.retain(|_, c| c.post_id != post_id);
    }
}

/// A row type stored in [`Tables`].
pub trait MemoryRecord: Clone + Send + Sync + 'static {
    fn id(&self) -> i64;

    fn assign_id(&mut self, id: i64);

    fn table(tables: &Tables) -> &BTreeMap<i64, Self>;

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self>;

    /// Unique and foreign key checks run before a write.
    fn check_constraints(&self, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }

    /// Remove the row and apply the delete rule to dependent rows.
    fn delete_from(id: i64, tables: &mut Tables) {
        Self::table_mut(tables).remove(&id);
    }
}

fn missing_reference(what: &str, id: i64) -> RepoError {
    RepoError::Constraint(format!("{what} {id} does not exist"))
}

impl MemoryRecord for User {
    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.users
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.users
    }

    fn check_constraints(&self, tables: &Tables) -> Result<(), RepoError> {
        let taken = tables
            .users
            .values()
            .any(|u| u.username == self.username && u.id != self.id);
        if taken {
            return Err(RepoError::Constraint(
                "A user with that username already exists.".to_string(),
            ));
        }
        Ok(())
    }

    fn delete_from(id: i64, tables: &mut Tables) {
        tables.users.remove(&id);
        let authored: Vec<i64> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in authored {
            tables.delete_post_cascade(post_id);
        }
        tables.comments.retain(|_, c| c.author_id != id);
    }
}

impl MemoryRecord for Category {
    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.categories
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.categories
    }

    fn check_constraints(&self, tables: &Tables) -> Result<(), RepoError> {
        let taken = tables
            .categories
            .values()
            .any(|c| c.slug == self.slug && c.id != self.id);
        if taken {
            return Err(RepoError::Constraint(format!(
                "Category slug '{}' already exists",
                self.slug
            )));
        }
        Ok(())
    }

    fn delete_from(id: i64, tables: &mut Tables) {
        tables.categories.remove(&id);
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
    }
}

impl MemoryRecord for Location {
    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.locations
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.locations
    }

    fn delete_from(id: i64, tables: &mut Tables) {
        tables.locations.remove(&id);
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
    }
}

impl MemoryRecord for Post {
    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.posts
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.posts
    }

    fn check_constraints(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.users.contains_key(&self.author_id) {
            return Err(missing_reference("user", self.author_id));
        }
        if let Some(id) = self.category_id.filter(|id| !tables.categories.contains_key(id)) {
            return Err(missing_reference("category", id));
        }
        if let Some(id) = self.location_id.filter(|id| !tables.locations.contains_key(id)) {
            return Err(missing_reference("location", id));
        }
        Ok(())
    }

    fn delete_from(id: i64, tables: &mut Tables) {
        tables.delete_post_cascade(id);
    }
}

impl MemoryRecord for Comment {
    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.comments
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.comments
    }

    fn check_constraints(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.posts.contains_key(&self.post_id) {
            return Err(missing_reference("post", self.post_id));
        }
        if !tables.users.contains_key(&self.author_id) {
            return Err(missing_reference("user", self.author_id));
        }
        Ok(())
    }
}

/// Shared in-memory tables and a factory for repositories over them.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryRepository::new(self.tables.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryRepository::new(self.tables.clone())
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryRepository::new(self.tables.clone())
    }

    pub fn locations(&self) -> InMemoryLocationRepository {
        InMemoryRepository::new(self.tables.clone())
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryRepository::new(self.tables.clone())
    }
}

/// Generic in-memory repository over one table.
pub struct InMemoryRepository<T> {
    tables: Arc<RwLock<Tables>>,
    _record: PhantomData<fn() -> T>,
}

impl<T> InMemoryRepository<T> {
    fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self {
            tables,
            _record: PhantomData,
        }
    }
}

pub type InMemoryUserRepository = InMemoryRepository<User>;
pub type InMemoryPostRepository = InMemoryRepository<Post>;
pub type InMemoryCategoryRepository = InMemoryRepository<Category>;
pub type InMemoryLocationRepository = InMemoryRepository<Location>;
pub type InMemoryCommentRepository = InMemoryRepository<Comment>;

#[async_trait]
impl<T: MemoryRecord> BaseRepository<T, i64> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, RepoError> {
        let tables = self.tables.read().await;
        Ok(T::table(&tables).get(&id).cloned())
    }

    async fn save(&self, mut entity: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        entity.check_constraints(&tables)?;

        if entity.id() == UNSAVED_ID {
            let id = tables.next_id();
            entity.assign_id(id);
        } else if !T::table(&tables).contains_key(&entity.id()) {
            return Err(RepoError::NotFound);
        }

        T::table_mut(&mut tables).insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !T::table(&tables).contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        T::delete_from(id, &mut tables);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_visible(
        &self,
        id: i64,
        visibility: Visibility,
    ) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .get(&id)
            .filter(|post| visibility.admits(post, tables.category_of(post)))
            .cloned())
    }

    async fn list(
        &self,
        filter: PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError> {
        let tables = self.tables.read().await;

        let mut matching: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| filter.admits(post, tables.category_of(post)))
            .collect();
        matching.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));

        let window = page.resolve(matching.len() as u64)?;
        let items = matching
            .into_iter()
            .skip(window.offset() as usize)
            .take(window.per_page as usize)
            .map(|post| PostSummary {
                post: post.clone(),
                comment_count: tables.comment_count(post.id),
            })
            .collect();

        Ok(window.into_page(items))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|c| c.slug == slug && c.is_published)
            .cloned())
    }
}

impl LocationRepository for InMemoryLocationRepository {}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogicum_core::domain::PostDraft;
    use blogicum_core::pagination::PageNumber;
    use blogicum_core::visibility::Viewer;
    use chrono::{DateTime, TimeDelta, Utc};

    struct Fixture {
        db: InMemoryDatabase,
        author: User,
        category: Category,
    }

    async fn fixture() -> Fixture {
        let db = InMemoryDatabase::new();
        let author = db
            .users()
            .save(User::new("author".into(), "a@example.com".into(), "hash".into()))
            .await
            .unwrap();
        let category = db
            .categories()
            .save(Category::new("News".into(), String::new(), "news".into()).unwrap())
            .await
            .unwrap();
        Fixture {
            db,
            author,
            category,
        }
    }

    async fn add_post(
        f: &Fixture,
        title: &str,
        pub_date: DateTime<Utc>,
        is_published: bool,
    ) -> Post {
        f.db.posts()
            .save(Post::new(
                f.author.id,
                PostDraft {
                    title: title.into(),
                    text: "Text".into(),
                    pub_date,
                    is_published,
                    category_id: Some(f.category.id),
                    location_id: None,
                    image: None,
                },
            ))
            .await
            .unwrap()
    }

    fn first_page(per_page: u64) -> PageRequest {
        PageRequest::new(PageNumber::Number(1), per_page)
    }

    #[tokio::test]
    async fn test_feed_lists_gated_posts_newest_first_with_counts() {
        let f = fixture().await;
        let now = Utc::now();
        let older = add_post(&f, "older", now - TimeDelta::days(2), true).await;
        let newer = add_post(&f, "newer", now - TimeDelta::days(1), true).await;
        add_post(&f, "scheduled", now + TimeDelta::days(1), true).await;
        add_post(&f, "hidden", now - TimeDelta::days(1), false).await;

        f.db.comments()
            .save(Comment::new(older.id, f.author.id, "first".into()))
            .await
            .unwrap();

        let page = f
            .db
            .posts()
            .list(PostFilter::feed(now), first_page(10))
            .await
            .unwrap();

        let ids: Vec<i64> = page.items.iter().map(|s| s.post.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert_eq!(page.items[1].comment_count, 1);
        assert_eq!(page.total_items, 2);
    }

    #[tokio::test]
    async fn test_unpublished_category_hides_posts_from_feed() {
        let f = fixture().await;
        let now = Utc::now();
        add_post(&f, "post", now - TimeDelta::hours(1), true).await;

        let mut category = f.category.clone();
        category.is_published = false;
        f.db.categories().save(category).await.unwrap();

        let page = f
            .db
            .posts()
            .list(PostFilter::feed(now), first_page(10))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_find_visible_lets_author_preview() {
        let f = fixture().await;
        let now = Utc::now();
        let draft = add_post(&f, "draft", now + TimeDelta::days(1), false).await;
        let posts = f.db.posts();

        let as_author = Visibility::for_detail(Viewer::User(f.author.id), now);
        let as_anonymous = Visibility::for_detail(Viewer::Anonymous, now);

        assert!(posts.find_visible(draft.id, as_author).await.unwrap().is_some());
        assert!(posts.find_visible(draft.id, as_anonymous).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_post_cascades_to_comments() {
        let f = fixture().await;
        let post = add_post(&f, "post", Utc::now(), true).await;
        let comment = f
            .db
            .comments()
            .save(Comment::new(post.id, f.author.id, "hi".into()))
            .await
            .unwrap();

        f.db.posts().delete(post.id).await.unwrap();

        assert!(f.db.comments().find_by_id(comment.id).await.unwrap().is_none());
        assert!(f.db.comments().list_for_post(post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_category_and_location_nulls_reference() {
        let f = fixture().await;
        let location = f
            .db
            .locations()
            .save(Location::new("Island".into()))
            .await
            .unwrap();
        let mut post = add_post(&f, "post", Utc::now(), true).await;
        post.location_id = Some(location.id);
        let post = f.db.posts().save(post).await.unwrap();

        f.db.categories().delete(f.category.id).await.unwrap();
        f.db.locations().delete(location.id).await.unwrap();

        let stored = f.db.posts().find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.category_id, None);
        assert_eq!(stored.location_id, None);
    }

    #[tokio::test]
    async fn test_comments_listed_oldest_first() {
        let f = fixture().await;
        let post = add_post(&f, "post", Utc::now(), true).await;
        let comments = f.db.comments();

        let mut late = Comment::new(post.id, f.author.id, "late".into());
        late.created_at = Utc::now() + TimeDelta::minutes(5);
        comments.save(late).await.unwrap();
        comments
            .save(Comment::new(post.id, f.author.id, "early".into()))
            .await
            .unwrap();

        let texts: Vec<String> = comments
            .list_for_post(post.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn test_unique_username_and_slug() {
        let f = fixture().await;
        let duplicate_user = f
            .db
            .users()
            .save(User::new("author".into(), String::new(), "hash".into()))
            .await;
        assert!(matches!(duplicate_user, Err(RepoError::Constraint(_))));

        let duplicate_slug = f
            .db
            .categories()
            .save(Category::new("Other".into(), String::new(), "news".into()).unwrap())
            .await;
        assert!(matches!(duplicate_slug, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_comment_requires_existing_post() {
        let f = fixture().await;
        let result = f
            .db
            .comments()
            .save(Comment::new(9999, f.author.id, "orphan".into()))
            .await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_unpublished_category_not_found_by_slug() {
        let f = fixture().await;
        let hidden = Category::new("Hidden".into(), String::new(), "hidden".into())
            .unwrap()
            .unpublished();
        f.db.categories().save(hidden).await.unwrap();

        let categories = f.db.categories();
        assert!(categories.find_published_by_slug("news").await.unwrap().is_some());
        assert!(categories.find_published_by_slug("hidden").await.unwrap().is_none());
        assert!(categories.find_published_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pagination_out_of_range() {
        let f = fixture().await;
        for i in 0..3 {
            add_post(&f, &format!("p{i}"), Utc::now() - TimeDelta::hours(1), true).await;
        }
        let posts = f.db.posts();
        let filter = PostFilter::feed(Utc::now());

        let last = posts
            .list(filter, PageRequest::new(PageNumber::Last, 2))
            .await
            .unwrap();
        assert_eq!(last.number, 2);
        assert_eq!(last.items.len(), 1);

        let beyond = posts
            .list(filter, PageRequest::new(PageNumber::Number(3), 2))
            .await;
        assert!(matches!(beyond, Err(RepoError::InvalidPage(_))));
    }
}
