//! Authentication extractors.
//!
//! The access token is read from `Authorization: Bearer <token>` first and
//! from the `access_token` cookie second.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};
use std::sync::Arc;

use blogicum_core::ports::{AuthError, TokenClaims, TokenService};
use blogicum_core::visibility::Viewer;

use super::error::AppError;

/// Cookie set on login and read back by the extractors.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authenticated user identity extractor.
///
/// Anonymous requests are redirected to the login page:
/// ```ignore
/// async fn create_post(identity: Identity) -> AppResult<HttpResponse> {
///     // identity.user_id is the author
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<Option<String>, AuthError> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(|t| Some(t.to_string()))
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let token_service = req
        .app_data::<web::Data<Arc<dyn TokenService>>>()
        .ok_or_else(|| {
            tracing::error!("TokenService not found in app data");
            AuthError::InvalidToken("Server configuration error".to_string())
        })?;

    let token = match bearer_token(req)? {
        Some(token) => token,
        None => req
            .cookie(ACCESS_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or(AuthError::MissingAuth)?,
    };

    token_service.validate_token(&token).map(Identity::from)
}

/// Path and query of the request, used as the post-login destination.
fn requested_path(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string())
}

fn login_required(req: &HttpRequest) -> AppError {
    AppError::LoginRequired {
        next: requested_path(req),
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(|e| {
            tracing::debug!(path = req.path(), reason = %e, "Login required");
            login_required(req)
        }))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
///
/// Used where the target must be resolved before the login requirement applies.
pub struct OptionalIdentity {
    identity: Option<Identity>,
    next: String,
}

impl OptionalIdentity {
    pub fn viewer(&self) -> Viewer {
        Viewer::from_user_id(self.identity.as_ref().map(|i| i.user_id))
    }

    /// Demand a login now, redirecting anonymous requests.
    pub fn require(self) -> Result<Identity, AppError> {
        self.identity
            .ok_or(AppError::LoginRequired { next: self.next })
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity {
            identity: authenticate(req).ok(),
            next: requested_path(req),
        }))
    }
}
