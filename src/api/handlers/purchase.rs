use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::{auth::AuthUser, json::ValidatedJson};
use crate::api::dtos::requests::PurchaseRequest;
use crate::domain::services::authorization::{authorize, Access};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn purchase_tickets(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    ValidatedJson(payload): ValidatedJson<PurchaseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = state.ticket_repo.find_by_id(&payload.ticket_id).await?
        .ok_or(AppError::NotFound("Ticket not found.".into()))?;

    let event = state.event_repo.find_by_id(&ticket.event_id).await?
        .ok_or(AppError::NotFound("Event not found.".into()))?;

    authorize(&caller, &event, Access::Consume)?;

    let (purchase, remaining) = match state.purchase_repo.purchase(&ticket.id, &caller.id, payload.quantity).await {
        Ok(result) => result,
        Err(AppError::InsufficientInventory) => {
            warn!(
                ticket_id = %ticket.id,
                requested = payload.quantity,
                "Purchase rejected: not enough tickets available"
            );
            return Err(AppError::InsufficientInventory);
        }
        Err(e) => return Err(e),
    };

    info!(
        purchase_id = %purchase.id,
        ticket_id = %remaining.id,
        quantity = purchase.quantity,
        remaining = remaining.quantity,
        "Tickets purchased"
    );

    Ok((StatusCode::CREATED, Json(serde_json::json!({
        "message": "Ticket purchased successfully",
        "purchase": purchase,
    }))))
}

pub async fn list_my_purchases(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let purchases = state.purchase_repo.list_by_user(&caller.id).await?;
    Ok(Json(purchases))
}
