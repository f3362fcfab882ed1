//! Category page.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::error::DomainError;
use blogicum_core::pagination::CATEGORY_PAGE_SIZE;
use blogicum_core::visibility::PostFilter;
use blogicum_shared::dto::CategoryPageResponse;

use super::PageQuery;
use super::present::{Presenter, category_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /category/{slug}
pub async fn category_posts(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let category = state
        .categories
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| {
            tracing::debug!(slug = %slug, "Category missing or unpublished");
            DomainError::not_found("Category", &slug)
        })?;

    let page = state
        .posts
        .list(
            PostFilter::category(category.id, Utc::now()),
            query.request(CATEGORY_PAGE_SIZE)?,
        )
        .await?;
    let posts = Presenter::new(&state).posts(page).await?;

    Ok(HttpResponse::Ok().json(CategoryPageResponse {
        category: category_response(category),
        posts,
    }))
}
