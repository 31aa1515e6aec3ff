mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::json;
use ticketing_backend::config::CacheConfig;

#[tokio::test]
async fn test_create_event_validation() {
    let app = TestApp::new().await;
    let token = app.register("organizer", false).await;

    let (status, body) = app.send("POST", "/api/events/create", Some(&token), Some(json!({
        "title": "Past gig",
        "description": "Already happened",
        "date": (Utc::now() - Duration::days(1)).to_rfc3339(),
        "location": "Riverside Arena",
        "category": "Music"
    }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Date must be in the future.");

    let (status, _) = app.send("POST", "/api/events/create", Some(&token), Some(json!({
        "title": "Gig",
        "description": "",
        "date": (Utc::now() + Duration::days(1)).to_rfc3339(),
        "location": "Riverside Arena",
        "category": "Opera"
    }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.send("POST", "/api/events/create", Some(&token), Some(json!({
        "title": "Gig"
    }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_events_includes_organizer_username() {
    let app = TestApp::new().await;
    let token = app.register("organizer", false).await;
    app.create_event(&token, "Summer Fest").await;

    let (status, body) = app.send("GET", "/api/events/all", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Summer Fest");
    assert_eq!(events[0]["organizer_username"], "organizer");
}

#[tokio::test]
async fn test_second_read_is_served_from_cache() {
    let app = TestApp::new().await;
    let token = app.register("organizer", false).await;
    let event_id = app.create_event(&token, "Summer Fest").await;
    let uri = format!("/api/events/{}", event_id);

    let (status, first) = app.send("GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["source"], "primary");
    assert_eq!(first["data"]["id"], event_id.as_str());

    let (status, second) = app.send("GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["source"], "cache");
    assert_eq!(second["data"], first["data"]);
}

#[tokio::test]
async fn test_missing_event_is_not_cached() {
    let app = TestApp::new().await;
    let token = app.register("organizer", false).await;

    let (status, body) = app.send("GET", "/api/events/nope", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found");
    assert!(app.state.event_cache.is_empty().await);
}

#[tokio::test]
async fn test_cache_entry_expires_after_ttl() {
    let app = TestApp::with_cache(CacheConfig {
        ttl: std::time::Duration::from_millis(300),
        extended_ttl: std::time::Duration::from_millis(300),
        sweep_interval: std::time::Duration::from_secs(120),
    }).await;
    let token = app.register("organizer", false).await;
    let event_id = app.create_event(&token, "Summer Fest").await;
    let uri = format!("/api/events/{}", event_id);

    let (_, body) = app.send("GET", &uri, Some(&token), None).await;
    assert_eq!(body["source"], "primary");

    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    let (_, body) = app.send("GET", &uri, Some(&token), None).await;
    assert_eq!(body["source"], "primary");
}

#[tokio::test]
async fn test_update_invalidates_cache_and_applies_changes() {
    let app = TestApp::new().await;
    let token = app.register("organizer", false).await;
    let event_id = app.create_event(&token, "Summer Fest").await;
    let uri = format!("/api/events/{}", event_id);

    app.send("GET", &uri, Some(&token), None).await;
    let (_, cached) = app.send("GET", &uri, Some(&token), None).await;
    assert_eq!(cached["source"], "cache");

    let (status, updated) = app.send("PUT", &uri, Some(&token), Some(json!({
        "title": "Winter Fest",
        "category": "Business"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Winter Fest");
    assert_eq!(updated["location"], "Riverside Arena");

    let (_, fresh) = app.send("GET", &uri, Some(&token), None).await;
    assert_eq!(fresh["source"], "primary");
    assert_eq!(fresh["data"]["title"], "Winter Fest");
    assert_eq!(fresh["data"]["category"], "Business");
}

#[tokio::test]
async fn test_read_loaded_before_update_does_not_refill_cache() {
    let app = TestApp::new().await;
    let token = app.register("organizer", false).await;
    let event_id = app.create_event(&token, "Summer Fest").await;
    let uri = format!("/api/events/{}", event_id);

    // A reader loads the row, then an update commits before it fills the cache.
    let epoch = app.state.event_cache.epoch().await;
    let stale = app.state.event_repo.find_details_by_id(&event_id).await.unwrap().unwrap();

    let (status, _) = app.send("PUT", &uri, Some(&token), Some(json!({ "title": "Winter Fest" }))).await;
    assert_eq!(status, StatusCode::OK);

    assert!(!app.state.event_cache.insert_if_unchanged(event_id.clone(), stale, epoch).await);

    let (_, fresh) = app.send("GET", &uri, Some(&token), None).await;
    assert_eq!(fresh["source"], "primary");
    assert_eq!(fresh["data"]["title"], "Winter Fest");
}

#[tokio::test]
async fn test_only_owner_or_admin_manage_events() {
    let app = TestApp::new().await;
    let owner = app.register("organizer", false).await;
    let stranger = app.register("stranger", false).await;
    let admin = app.register("root", true).await;
    let event_id = app.create_event(&owner, "Summer Fest").await;
    let uri = format!("/api/events/{}", event_id);

    let (status, _) = app.send("PUT", &uri, Some(&stranger), Some(json!({"title": "Hijacked"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("DELETE", &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("PUT", &uri, Some(&admin), Some(json!({"location": "Harbour Hall"}))).await;
    assert_eq!(status, StatusCode::OK);

    app.send("GET", &uri, Some(&owner), None).await;
    let (status, body) = app.send("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted successfully");

    let (status, _) = app.send("GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
