use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, auth, user, event, ticket, purchase, review, image};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Identity
        .route("/api/auth/user/signup", post(auth::signup_user))
        .route("/api/auth/admin/signup", post(auth::signup_admin))
        .route("/api/auth/signin", post(auth::signin))
        .route("/api/all/users", get(user::list_users))
        .route("/api/all/admins", get(user::list_admins))

        // Events
        .route("/api/events/create", post(event::create_event))
        .route("/api/events/all", get(event::list_events))
        .route("/api/events/{id}", get(event::get_event).put(event::update_event).delete(event::delete_event))

        // Ticket inventory
        .route("/api/tickets/create", post(ticket::create_ticket))
        .route("/api/tickets/event/{event_id}", get(ticket::list_tickets))
        .route("/api/tickets/{id}", put(ticket::update_ticket))

        // Purchases
        .route("/api/purchase/tickets", post(purchase::purchase_tickets).get(purchase::list_my_purchases))

        // Reviews. GET takes an event id, PUT/DELETE a review id.
        .route("/api/reviews/create", post(review::create_review))
        .route("/api/reviews/{id}", get(review::list_reviews).put(review::update_review).delete(review::delete_review))

        // Images
        .route("/api/image/upload", post(image::upload_image))
        .route("/api/image/{id}", get(image::get_image))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
