//! Profile pages.

use actix_web::{HttpResponse, web};

use blogicum_core::domain::{ProfileChanges, User};
use blogicum_core::error::DomainError;
use blogicum_core::pagination::PROFILE_PAGE_SIZE;
use blogicum_core::visibility::PostFilter;
use blogicum_shared::dto::{AccountResponse, ProfileResponse};
use blogicum_shared::forms::ProfileForm;

use super::present::{Presenter, profile_summary};
use super::{FormBody, PROFILE_EDIT_URL, PageQuery, form_data, redirect};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn account_response(user: User) -> AccountResponse {
    AccountResponse {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
    }
}

async fn own_account(state: &AppState, identity: &Identity) -> AppResult<User> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", &identity.username))?;
    Ok(user)
}

/// GET /profile/{username}
///
/// The owner sees every post; other viewers see the published ones,
/// scheduled posts included.
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let owner = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::not_found("User", &username))?;

    let page = state
        .posts
        .list(
            PostFilter::profile(owner.id, identity.viewer()),
            query.request(PROFILE_PAGE_SIZE)?,
        )
        .await?;
    let posts = Presenter::new(&state).posts(page).await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile: profile_summary(&owner),
        posts,
    }))
}

/// GET /profile/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = own_account(&state, &identity).await?;
    Ok(HttpResponse::Ok().json(account_response(user)))
}

/// POST /profile/edit
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: FormBody<ProfileForm>,
) -> AppResult<HttpResponse> {
    let form = form_data(body)?;
    let errors = form.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut user = own_account(&state, &identity).await?;
    user.apply_profile(ProfileChanges {
        username: form.username,
        first_name: form.first_name,
        last_name: form.last_name,
        email: form.email,
    });
    state.users.save(user).await?;

    tracing::info!(user_id = identity.user_id, "Profile updated");
    Ok(redirect(PROFILE_EDIT_URL))
}
