//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod present;
mod profile;


use actix_web::{HttpResponse, http::header, web};
use serde::Deserialize;

use blogicum_core::pagination::{PageNumber, PageRequest};

use crate::middleware::error::{AppError, AppResult};

pub const HOME_URL: &str = "/";
pub const LOGIN_URL: &str = "/auth/login";
pub const PROFILE_EDIT_URL: &str = "/profile/edit";

pub fn post_url(post_id: i64) -> String {
    format!("/posts/{post_id}")
}

/// `302 Found` to `location`.
pub(crate) fn redirect(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.as_ref()))
        .finish()
}

/// A JSON form whose parse error is held until the handler has resolved and
/// guarded its target.
pub(crate) type FormBody<T> = Result<web::Json<T>, actix_web::Error>;

pub(crate) fn form_data<T>(body: FormBody<T>) -> AppResult<T> {
    body.map(web::Json::into_inner)
        .map_err(|err| match err.as_error::<AppError>() {
            Some(AppError::BadRequest(detail)) => AppError::BadRequest(detail.clone()),
            _ => AppError::BadRequest(err.to_string()),
        })
}

/// `?page=N` or `?page=last`.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn request(&self, per_page: u64) -> AppResult<PageRequest> {
        let number = PageNumber::parse(self.page.as_deref())?;
        Ok(PageRequest::new(number, per_page))
    }
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/", web::get().to(posts::feed))
        // Profiles
        .service(
            web::resource("/profile/edit")
                .route(web::get().to(profile::edit_form))
                .route(web::post().to(profile::update)),
        )
        .route("/profile/{username}", web::get().to(profile::profile))
        // Posts
        .service(
            web::resource("/posts/new")
                .route(web::get().to(posts::new_form))
                .route(web::post().to(posts::create)),
        )
        .route("/posts/{post_id}", web::get().to(posts::detail))
        .service(
            web::resource("/posts/{post_id}/edit")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::update)),
        )
        .service(
            web::resource("/posts/{post_id}/delete")
                .route(web::get().to(posts::delete_form))
                .route(web::post().to(posts::delete)),
        )
        .route("/posts/{post_id}/comment", web::post().to(comments::create))
        // Comments
        .service(
            web::resource("/comments/{comment_id}/edit")
                .route(web::get().to(comments::edit_form))
                .route(web::post().to(comments::update)),
        )
        .service(
            web::resource("/comments/{comment_id}/delete")
                .route(web::get().to(comments::delete_form))
                .route(web::post().to(comments::delete)),
        )
        // Categories
        .route("/category/{slug}", web::get().to(categories::category_posts))
        // Auth
        .service(
            web::scope("/auth")
                .route("/registration", web::post().to(auth::register))
                .service(
                    web::resource("/login")
                        .route(web::get().to(auth::login_page))
                        .route(web::post().to(auth::login)),
                )
                .route("/logout", web::post().to(auth::logout)),
        );
}
