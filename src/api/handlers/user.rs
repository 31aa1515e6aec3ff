use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::{AuthUser, AdminUser};
use crate::domain::models::user::Role;
use std::sync::Arc;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(_caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_repo.list_by_role(Role::User.as_str()).await?;
    Ok(Json(users))
}

pub async fn list_admins(
    State(state): State<Arc<AppState>>,
    AdminUser(_caller): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let admins = state.user_repo.list_by_role(Role::Admin.as_str()).await?;
    Ok(Json(admins))
}
