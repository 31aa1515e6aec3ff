use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::{auth::AuthUser, json::{validate, JsonBody, ValidatedJson}};
use crate::api::dtos::requests::{ReviewDraft, UpdateReviewRequest};
use crate::domain::models::review::Review;
use crate::domain::services::authorization::{authorize, Access};
use std::sync::Arc;
use tracing::info;

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    JsonBody(draft): JsonBody<ReviewDraft>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(draft.event_id()?).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    // Organizers and admins are turned away before rating or content is parsed.
    authorize(&caller, &event, Access::Consume)?;

    let payload = draft.into_request()?;
    validate(&payload)?;

    let review = Review::new(event.id, caller.id, payload.rating, payload.content);
    let created = state.review_repo.create(&review).await?;

    info!("Review {} created for event {}", created.id, created.event_id);

    Ok((StatusCode::CREATED, Json(serde_json::json!({
        "message": "Review created successfully",
        "review": created,
    }))))
}

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    AuthUser(_caller): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reviews = state.review_repo.list_by_event(&event_id).await?;
    Ok(Json(reviews))
}

pub async fn update_review(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(review_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut review = state.review_repo.find_by_id(&review_id).await?
        .ok_or(AppError::NotFound("Review not found".into()))?;

    authorize(&caller, &review, Access::Author)?;

    let event = state.event_repo.find_by_id(&review.event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    authorize(&caller, &event, Access::Consume)?;

    if let Some(rating) = payload.rating { review.rating = rating; }
    if let Some(content) = payload.content { review.content = content; }

    let updated = state.review_repo.update(&review).await?;

    info!("Review updated: {}", updated.id);

    Ok(Json(serde_json::json!({
        "message": "Review updated successfully",
        "review": updated,
    })))
}

pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(review_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let review = state.review_repo.find_by_id(&review_id).await?
        .ok_or(AppError::NotFound("Review not found".into()))?;

    authorize(&caller, &review, Access::Author)?;

    state.review_repo.delete(&review.id).await?;

    info!("Review deleted: {}", review.id);
    Ok(Json(serde_json::json!({"message": "Review deleted successfully"})))
}
