//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use blogicum_core::access::Denial;
use blogicum_core::error::{DomainError, RepoError};
use blogicum_core::ports::AuthError;
use blogicum_shared::ErrorResponse;
use std::fmt;

use crate::handlers::{LOGIN_URL, post_url};

const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

/// Application-level error type that converts to RFC 7807 responses.
///
/// Two variants are not errors on the wire: `Redirect` and `LoginRequired`
/// both answer `302 Found`.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    Internal(String),
    Validation(Vec<String>),
    /// Silent denial: send the client elsewhere without an error body.
    Redirect(String),
    /// Anonymous request to a login-only page; `next` is the requested path.
    LoginRequired { next: String },
}

impl AppError {
    fn login_location(next: &str) -> String {
        match serde_urlencoded::to_string([("next", next)]) {
            Ok(query) => format!("{LOGIN_URL}?{query}"),
            Err(_) => LOGIN_URL.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
            AppError::Redirect(to) => write!(f, "Redirect to {}", to),
            AppError::LoginRequired { next } => write!(f, "Login required for {}", next),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Redirect(_) | AppError::LoginRequired { .. } => StatusCode::FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::Redirect(to) => {
                return HttpResponse::Found()
                    .insert_header((header::LOCATION, to.as_str()))
                    .finish();
            }
            AppError::LoginRequired { next } => {
                return HttpResponse::Found()
                    .insert_header((header::LOCATION, Self::login_location(next)))
                    .finish();
            }
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Forbidden(detail) => ErrorResponse::forbidden(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::invalid_form(errors.clone()),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::InvalidPage(msg) => AppError::NotFound(msg),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::RedirectToPost(post_id) => AppError::Redirect(post_url(post_id)),
            Denial::Forbidden => AppError::Forbidden(PERMISSION_DENIED.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid username or password".to_string())
            }
            AuthError::TokenExpired => AppError::Unauthorized(
                "Your authentication token has expired. Please login again.".to_string(),
            ),
            AuthError::InvalidToken(msg) => AppError::Unauthorized(msg),
            AuthError::MissingAuth => AppError::Unauthorized(
                "Please provide a valid Bearer token in the Authorization header.".to_string(),
            ),
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_encodes_next() {
        let response = AppError::LoginRequired {
            next: "/posts/5?page=2".to_string(),
        }
        .error_response();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/login?next=%2Fposts%2F5%3Fpage%3D2"
        );
    }

    #[test]
    fn test_denials_map_to_redirect_and_forbidden() {
        let redirect = AppError::from(Denial::RedirectToPost(5)).error_response();
        assert_eq!(redirect.status(), StatusCode::FOUND);
        assert_eq!(redirect.headers().get(header::LOCATION).unwrap(), "/posts/5");

        let forbidden = AppError::from(Denial::Forbidden);
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_invalid_page_is_not_found() {
        let err = AppError::from(RepoError::InvalidPage("page 9".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_constraint_violation_is_conflict() {
        let err = AppError::from(RepoError::Constraint("users_username_key".into()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
