//! Turns stored records into response bodies.
//!
//! Listings reference the same authors and categories over and over, so each
//! related record is fetched at most once per response.

use std::collections::HashMap;

use blogicum_core::domain::{Category, Comment, Post, PostSummary, User};
use blogicum_core::pagination::Page;
use blogicum_shared::PageResponse;
use blogicum_shared::dto::{
    AuthorSummary, CategoryResponse, CategorySummary, CommentResponse, LocationSummary,
    PostResponse, ProfileSummary,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) struct Presenter<'a> {
    state: &'a AppState,
    authors: HashMap<i64, AuthorSummary>,
    categories: HashMap<i64, Option<CategorySummary>>,
    locations: HashMap<i64, Option<LocationSummary>>,
}

impl<'a> Presenter<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            authors: HashMap::new(),
            categories: HashMap::new(),
            locations: HashMap::new(),
        }
    }

    async fn author(&mut self, user_id: i64) -> AppResult<AuthorSummary> {
        if let Some(author) = self.authors.get(&user_id) {
            return Ok(author.clone());
        }

        let user = self
            .state
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("author {user_id} is missing")))?;
        let author = AuthorSummary {
            id: user.id,
            username: user.username,
        };
        self.authors.insert(user_id, author.clone());
        Ok(author)
    }

    async fn category(&mut self, category_id: Option<i64>) -> AppResult<Option<CategorySummary>> {
        let Some(id) = category_id else {
            return Ok(None);
        };
        if let Some(category) = self.categories.get(&id) {
            return Ok(category.clone());
        }

        let category = self
            .state
            .categories
            .find_by_id(id)
            .await?
            .map(|c| CategorySummary {
                id: c.id,
                title: c.title,
                slug: c.slug,
            });
        self.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn location(&mut self, location_id: Option<i64>) -> AppResult<Option<LocationSummary>> {
        let Some(id) = location_id else {
            return Ok(None);
        };
        if let Some(location) = self.locations.get(&id) {
            return Ok(location.clone());
        }

        let location = self
            .state
            .locations
            .find_by_id(id)
            .await?
            .map(|l| LocationSummary {
                id: l.id,
                name: l.name,
            });
        self.locations.insert(id, location.clone());
        Ok(location)
    }

    pub async fn post(&mut self, post: Post, comment_count: u64) -> AppResult<PostResponse> {
        let author = self.author(post.author_id).await?;
        let category = self.category(post.category_id).await?;
        let location = self.location(post.location_id).await?;

        Ok(PostResponse {
            id: post.id,
            title: post.title,
            text: post.text,
            pub_date: post.pub_date,
            is_published: post.is_published,
            created_at: post.created_at,
            image: post.image,
            author,
            category,
            location,
            comment_count,
        })
    }

    pub async fn posts(&mut self, page: Page<PostSummary>) -> AppResult<PageResponse<PostResponse>> {
        let has_next = page.has_next();
        let has_previous = page.has_previous();

        let mut items = Vec::with_capacity(page.items.len());
        for summary in page.items {
            items.push(self.post(summary.post, summary.comment_count).await?);
        }

        Ok(PageResponse {
            items,
            page: page.number,
            per_page: page.per_page,
            total_items: page.total_items,
            total_pages: page.total_pages,
            has_next,
            has_previous,
        })
    }

    pub async fn comment(&mut self, comment: Comment) -> AppResult<CommentResponse> {
        let author = self.author(comment.author_id).await?;

        Ok(CommentResponse {
            id: comment.id,
            post_id: comment.post_id,
            text: comment.text,
            created_at: comment.created_at,
            author,
        })
    }
}

pub(crate) fn profile_summary(user: &User) -> ProfileSummary {
    ProfileSummary {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        date_joined: user.created_at,
    }
}

pub(crate) fn category_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
    }
}
