use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::auth::Caller;
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

pub const INVALID_TOKEN_FORMAT: &str = "Access denied. Invalid token format.";

/// An authenticated caller. Rejects with 401 on a missing, malformed, expired
/// or forged bearer token and with 404 when the token's subject no longer exists.
pub struct AuthUser(pub Caller);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let token = parse_bearer(header)
            .ok_or_else(|| AppError::Unauthenticated(INVALID_TOKEN_FORMAT.into()))?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claims = app_state.auth_service.verify(token)?;

        let user = app_state.user_repo.find_by_id(&claims.sub).await?
            .ok_or_else(|| AppError::NotFound("User not found.".into()))?;

        Span::current().record("user_id", &user.id);

        Ok(AuthUser(Caller::from(&user)))
    }
}

/// An authenticated caller holding the admin role.
pub struct AdminUser(pub Caller);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(caller) = AuthUser::from_request_parts(parts, state).await?;
        if !caller.is_admin() {
            return Err(AppError::Forbidden("Access denied. Admins only.".into()));
        }
        Ok(AdminUser(caller))
    }
}

/// Returns the token of a `Bearer <seg>.<seg>.<seg>` header, where every
/// segment is non-empty base64url.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?;
    let segments: Vec<&str> = token.split('.').collect();
    let well_formed = segments.len() == 3
        && segments.iter().all(|seg| {
            !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        });
    well_formed.then_some(token)
}
