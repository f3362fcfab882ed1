//! Comment handlers.
//!
//! Editing someone else's comment redirects to the post; deleting it is 403.

use actix_web::{HttpResponse, web};

use blogicum_core::access::{Denial, ensure_comment_editor, ensure_comment_remover};
use blogicum_core::domain::Comment;
use blogicum_core::error::DomainError;
use blogicum_core::visibility::Viewer;
use blogicum_shared::forms::CommentForm;

use super::present::Presenter;
use super::{FormBody, form_data, post_url, redirect};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn guarded_comment(
    state: &AppState,
    comment_id: i64,
    viewer: Viewer,
    guard: fn(&Comment, Viewer) -> Result<(), Denial>,
) -> AppResult<Comment> {
    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Comment", comment_id))?;

    guard(&comment, viewer).inspect_err(|denial| {
        tracing::debug!(comment_id, ?denial, "Comment mutation denied");
    })?;

    Ok(comment)
}

fn validated_text(form: CommentForm) -> AppResult<String> {
    let errors = form.validate();
    if errors.is_empty() {
        Ok(form.text)
    } else {
        Err(AppError::Validation(errors))
    }
}

/// POST /posts/{post_id}/comment
///
/// The post is resolved before the login check and the body is read last,
/// so a missing post is 404 even for anonymous or empty requests.
pub async fn create(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<i64>,
    body: FormBody<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;
    let identity = identity.require()?;

    let text = validated_text(form_data(body)?)?;
    let comment = state
        .comments
        .save(Comment::new(post.id, identity.user_id, text))
        .await?;

    tracing::info!(
        comment_id = comment.id,
        post_id = post.id,
        user_id = identity.user_id,
        "Comment created"
    );
    Ok(redirect(post_url(post.id)))
}

/// GET /comments/{comment_id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let comment = guarded_comment(
        &state,
        path.into_inner(),
        identity.viewer(),
        ensure_comment_editor,
    )
    .await?;

    let response = Presenter::new(&state).comment(comment).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /comments/{comment_id}/edit
pub async fn update(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<i64>,
    body: FormBody<CommentForm>,
) -> AppResult<HttpResponse> {
    let mut comment = guarded_comment(
        &state,
        path.into_inner(),
        identity.viewer(),
        ensure_comment_editor,
    )
    .await?;

    comment.text = validated_text(form_data(body)?)?;
    let comment = state.comments.save(comment).await?;

    tracing::info!(comment_id = comment.id, "Comment updated");
    Ok(redirect(post_url(comment.post_id)))
}

/// GET /comments/{comment_id}/delete
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let comment = guarded_comment(
        &state,
        path.into_inner(),
        identity.viewer(),
        ensure_comment_remover,
    )
    .await?;

    let response = Presenter::new(&state).comment(comment).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /comments/{comment_id}/delete
pub async fn delete(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let comment = guarded_comment(
        &state,
        path.into_inner(),
        identity.viewer(),
        ensure_comment_remover,
    )
    .await?;

    state.comments.delete(comment.id).await?;

    tracing::info!(comment_id = comment.id, post_id = comment.post_id, "Comment deleted");
    Ok(redirect(post_url(comment.post_id)))
}
