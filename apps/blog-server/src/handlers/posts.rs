//! Post handlers: home feed, detail page and the author-only mutations.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::access::ensure_post_author;
use blogicum_core::domain::{Post, PostDraft};
use blogicum_core::error::DomainError;
use blogicum_core::pagination::FEED_PAGE_SIZE;
use blogicum_core::ports::Notification;
use blogicum_core::visibility::{PostFilter, Visibility};
use blogicum_shared::dto::PostDetailResponse;
use blogicum_shared::forms::PostForm;

use super::present::Presenter;
use super::{FormBody, HOME_URL, PageQuery, form_data, post_url, redirect};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Validate a submitted post form, including its references.
async fn draft_from_form(state: &AppState, form: PostForm) -> AppResult<PostDraft> {
    let mut errors = form.validate();

    if let Some(id) = form.category_id {
        if state.categories.find_by_id(id).await?.is_none() {
            errors.push(format!("category_id: Category {id} does not exist."));
        }
    }
    if let Some(id) = form.location_id {
        if state.locations.find_by_id(id).await?.is_none() {
            errors.push(format!("location_id: Location {id} does not exist."));
        }
    }

    match (errors.is_empty(), form.pub_date) {
        (true, Some(pub_date)) => Ok(PostDraft {
            title: form.title,
            text: form.text,
            pub_date,
            is_published: form.is_published,
            category_id: form.category_id,
            location_id: form.location_id,
            image: form.image.filter(|i| !i.is_empty()),
        }),
        _ => Err(AppError::Validation(errors)),
    }
}

/// Load a post for an author-only action. Missing posts are 404, foreign
/// posts send the viewer back to the detail page.
async fn owned_post(state: &AppState, post_id: i64, identity: &OptionalIdentity) -> AppResult<Post> {
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;

    ensure_post_author(&post, identity.viewer()).inspect_err(|_| {
        tracing::debug!(post_id, "Non-author redirected from post mutation");
    })?;

    Ok(post)
}

/// GET /
pub async fn feed(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .list(PostFilter::feed(Utc::now()), query.request(FEED_PAGE_SIZE)?)
        .await?;

    let response = Presenter::new(&state).posts(page).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /posts/{post_id}
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let visibility = Visibility::for_detail(identity.viewer(), Utc::now());

    let post = state
        .posts
        .find_visible(post_id, visibility)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;
    let comments = state.comments.list_for_post(post_id).await?;

    let mut presenter = Presenter::new(&state);
    let post = presenter.post(post, comments.len() as u64).await?;
    let mut thread = Vec::with_capacity(comments.len());
    for comment in comments {
        thread.push(presenter.comment(comment).await?);
    }

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post,
        comments: thread,
    }))
}

/// GET /posts/new - initial form values.
pub async fn new_form(_identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(PostForm {
        title: String::new(),
        text: String::new(),
        pub_date: Some(Utc::now()),
        is_published: true,
        category_id: None,
        location_id: None,
        image: None,
    })
}

/// POST /posts/new
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: FormBody<PostForm>,
) -> AppResult<HttpResponse> {
    let draft = draft_from_form(&state, form_data(body)?).await?;
    let post = state.posts.save(Post::new(identity.user_id, draft)).await?;

    tracing::info!(post_id = post.id, user_id = identity.user_id, "Post created");

    if let Err(e) = state
        .notifier
        .notify(Notification::post_created(&post.title))
        .await
    {
        tracing::warn!(post_id = post.id, error = %e, "Post notification failed");
    }

    Ok(redirect(post_url(post.id)))
}

/// GET /posts/{post_id}/edit - current values.
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, path.into_inner(), &identity).await?;
    let comment_count = state.comments.list_for_post(post.id).await?.len() as u64;
    let response = Presenter::new(&state).post(post, comment_count).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /posts/{post_id}/edit
pub async fn update(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<i64>,
    body: FormBody<PostForm>,
) -> AppResult<HttpResponse> {
    let mut post = owned_post(&state, path.into_inner(), &identity).await?;
    let draft = draft_from_form(&state, form_data(body)?).await?;

    post.apply(draft);
    let post = state.posts.save(post).await?;

    tracing::info!(post_id = post.id, "Post updated");
    Ok(redirect(post_url(post.id)))
}

/// GET /posts/{post_id}/delete - the post about to be deleted.
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    edit_form(state, identity, path).await
}

/// POST /posts/{post_id}/delete
pub async fn delete(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, path.into_inner(), &identity).await?;
    state.posts.delete(post.id).await?;

    tracing::info!(post_id = post.id, "Post deleted");
    Ok(redirect(HOME_URL))
}
