use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::{auth::AuthUser, json::ValidatedJson};
use crate::api::dtos::requests::{CreateTicketRequest, UpdateTicketRequest};
use crate::domain::models::ticket::{Ticket, TicketChanges};
use crate::domain::services::authorization::{authorize, Access};
use std::sync::Arc;
use tracing::info;

fn duplicate_type(ticket_type: &str) -> AppError {
    AppError::Conflict(format!("A ticket of type '{}' already exists for this event.", ticket_type))
}

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&payload.event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    authorize(&caller, &event, Access::Manage)?;

    if state.ticket_repo.find_by_event_and_type(&event.id, &payload.ticket_type).await?.is_some() {
        return Err(duplicate_type(&payload.ticket_type));
    }

    let ticket = Ticket::new(event.id, caller.id, payload.ticket_type, payload.price, payload.quantity);
    let created = state.ticket_repo.create(&ticket).await?;

    info!("Ticket type '{}' created for event {}", created.ticket_type, created.event_id);

    Ok((StatusCode::CREATED, Json(serde_json::json!({
        "message": "Ticket created successfully",
        "ticket": created,
    }))))
}

pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    AuthUser(_caller): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tickets = state.ticket_repo.list_by_event(&event_id).await?;
    Ok(Json(tickets))
}

pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(ticket_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = state.ticket_repo.find_by_id(&ticket_id).await?
        .ok_or(AppError::NotFound("Ticket not found".into()))?;

    let event = state.event_repo.find_by_id(&ticket.event_id).await?
        .ok_or(AppError::NotFound("Associated event not found".into()))?;

    authorize(&caller, &event, Access::Manage)?;

    if let Some(ticket_type) = payload.ticket_type.as_deref() {
        if ticket_type != ticket.ticket_type {
            let clash = state.ticket_repo.find_by_event_and_type(&ticket.event_id, ticket_type).await?;
            if clash.is_some_and(|other| other.id != ticket.id) {
                return Err(duplicate_type(ticket_type));
            }
        }
    }

    let changes = TicketChanges {
        ticket_type: payload.ticket_type,
        price: payload.price,
        quantity: payload.quantity,
    };
    let updated = state.ticket_repo.update(&ticket.id, &changes).await?;

    info!("Ticket updated: {}", updated.id);

    Ok(Json(serde_json::json!({
        "message": "Ticket updated successfully",
        "ticket": updated,
    })))
}
