use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::{auth::AuthUser, json::ValidatedJson};
use crate::api::dtos::{
    requests::{CreateEventRequest, UpdateEventRequest},
    responses::{CachedResponse, DataSource},
};
use crate::domain::models::event::{Event, EventCategory, NewEventParams};
use crate::domain::services::authorization::{authorize, Access};
use std::sync::Arc;
use chrono::Utc;
use tracing::{debug, info};

fn parse_category(raw: &str) -> Result<EventCategory, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation("Category must be one of Music, Sports, Education, Tech, Health, or Business.".into()))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = Event::new(NewEventParams {
        title: payload.title,
        description: payload.description,
        date: payload.date,
        location: payload.location,
        category: parse_category(&payload.category)?,
        organizer_id: caller.id.clone(),
    });

    let created = state.event_repo.create(&event).await?;
    info!("Event created: {} by {}", created.id, caller.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    AuthUser(_caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_details().await?;
    Ok(Json(events))
}

/// Read-through: answers from the event cache when it can, otherwise loads
/// from the repository and populates the cache unless an update or delete
/// invalidated it while the load was in flight.
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    AuthUser(_caller): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(details) = state.event_cache.get(&event_id).await {
        debug!("Cache hit for event {}", event_id);
        return Ok(Json(CachedResponse { source: DataSource::Cache, data: details }));
    }

    let epoch = state.event_cache.epoch().await;
    let details = state.event_repo.find_details_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !state.event_cache.insert_if_unchanged(event_id.clone(), details.clone(), epoch).await {
        debug!("Skipped caching event {}: invalidated during load", event_id);
    }

    Ok(Json(CachedResponse { source: DataSource::Primary, data: details }))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(event_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    authorize(&caller, &event, Access::Manage)?;

    if let Some(title) = payload.title { event.title = title; }
    if let Some(description) = payload.description { event.description = description; }
    if let Some(date) = payload.date { event.date = date; }
    if let Some(location) = payload.location { event.location = location; }
    if let Some(category) = payload.category {
        event.category = parse_category(&category)?.as_str().to_string();
    }
    event.updated_at = Utc::now();

    let updated = state.event_repo.update(&event).await?;
    state.event_cache.invalidate(&event_id).await;

    info!("Event updated: {}", event_id);
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    authorize(&caller, &event, Access::Manage)?;

    state.event_repo.delete(&event_id).await?;
    state.event_cache.invalidate(&event_id).await;

    info!("Event deleted: {}", event_id);
    Ok(Json(serde_json::json!({"message": "Event deleted successfully"})))
}
