//! Authentication handlers.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use std::sync::Arc;

use blogicum_core::domain::User;
use blogicum_core::error::DomainError;
use blogicum_core::ports::{AuthError, PasswordService, TokenService};
use blogicum_shared::dto::{AuthResponse, LoginPageResponse, LoginRequest};
use blogicum_shared::forms::RegistrationForm;

use super::LOGIN_URL;
use crate::middleware::auth::ACCESS_TOKEN_COOKIE;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn token_response(token_service: &dyn TokenService, user: &User) -> AppResult<AuthResponse> {
    let token = token_service.generate_token(user.id, &user.username)?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
    })
}

/// POST /auth/registration
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegistrationForm>,
) -> AppResult<HttpResponse> {
    let form = body.into_inner();

    let errors = form.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if state.users.find_by_username(&form.username).await?.is_some() {
        return Err(DomainError::Duplicate(
            "A user with that username already exists.".to_string(),
        )
        .into());
    }

    let password_hash = password_service.hash(&form.password)?;
    let user = state
        .users
        .save(User::new(form.username, form.email, password_hash))
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let response = token_response(token_service.get_ref().as_ref(), &user)?;
    Ok(HttpResponse::Created().json(response))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !password_service.verify(&req.password, &user.password_hash)? {
        tracing::debug!(username = %req.username, "Rejected login");
        return Err(AuthError::InvalidCredentials.into());
    }

    let response = token_response(token_service.get_ref().as_ref(), &user)?;
    let cookie = Cookie::build(ACCESS_TOKEN_COOKIE, response.access_token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(response.expires_in as i64))
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(response))
}

/// POST /auth/logout
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(ACCESS_TOKEN_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::NoContent().cookie(cookie).finish()
}

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub next: Option<String>,
}

/// GET /auth/login - where login-required pages send anonymous clients.
pub async fn login_page(query: web::Query<LoginPageQuery>) -> HttpResponse {
    HttpResponse::Ok().json(LoginPageResponse {
        login_url: LOGIN_URL.to_string(),
        next: query.into_inner().next,
    })
}
