use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::json::ValidatedJson;
use crate::api::dtos::requests::{SignupRequest, SigninRequest};
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::domain::models::user::{Role, User};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn signup_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    register(&state, payload, Role::User).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({"message": "User registered successfully"}))))
}

pub async fn signup_admin(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    register(&state, payload, Role::Admin).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({"message": "Admin registered successfully"}))))
}

async fn register(state: &AppState, payload: SignupRequest, role: Role) -> Result<User, AppError> {
    if let Some(existing) = state.user_repo.find_by_username_or_email(&payload.username, &payload.email).await? {
        let message = if existing.username == payload.username {
            "Username is already taken"
        } else {
            "Email is already registered"
        };
        return Err(AppError::Conflict(message.into()));
    }

    let password_hash = state.auth_service.hash_password(&payload.password)?;
    let user = state.user_repo
        .create(&User::new(payload.username, payload.email, password_hash, role))
        .await?;

    info!("Registered {} account: {}", role, user.id);
    Ok(user)
}

pub async fn signin(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<SigninRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invalid = || AppError::Unauthenticated("Invalid credentials".into());

    let user = state.user_repo.find_by_email(&payload.email).await?
        .ok_or_else(invalid)?;

    if !state.auth_service.verify_password(&payload.password, &user.password_hash) {
        warn!("Failed sign-in attempt for user: {}", user.id);
        return Err(invalid());
    }

    let token = state.auth_service.issue_token(&user)?;

    info!("User signed in: {}", user.id);

    Ok(Json(AuthResponse {
        token,
        user: UserProfile::from(user),
    }))
}
