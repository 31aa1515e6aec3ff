mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_review_lifecycle_for_author() {
    let app = TestApp::new().await;
    let organizer = app.register("organizer", false).await;
    let reviewer = app.register("reviewer", false).await;
    let event_id = app.create_event(&organizer, "Summer Fest").await;

    let (status, body) = app.send("POST", "/api/reviews/create", Some(&reviewer), Some(json!({
        "eventId": event_id, "rating": 4, "content": "Great sound"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Review created successfully");
    let review_id = body["review"]["id"].as_str().unwrap().to_string();

    let (status, reviews) = app.send("GET", &format!("/api/reviews/{}", event_id), Some(&organizer), None).await;
    assert_eq!(status, StatusCode::OK);
    let reviews = reviews.as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["username"], "reviewer");
    assert_eq!(reviews[0]["rating"], 4);

    let uri = format!("/api/reviews/{}", review_id);
    let (status, body) = app.send("PUT", &uri, Some(&reviewer), Some(json!({"rating": 5}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["review"]["rating"], 5);
    assert_eq!(body["review"]["content"], "Great sound");

    let (status, body) = app.send("DELETE", &uri, Some(&reviewer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Review deleted successfully");

    let (_, reviews) = app.send("GET", &format!("/api/reviews/{}", event_id), Some(&organizer), None).await;
    assert!(reviews.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_organizer_and_admin_are_refused_before_validation() {
    let app = TestApp::new().await;
    let organizer = app.register("organizer", false).await;
    let admin = app.register("root", true).await;
    let event_id = app.create_event(&organizer, "Summer Fest").await;

    for token in [&organizer, &admin] {
        // Out-of-range rating: exclusion still wins.
        let (status, _) = app.send("POST", "/api/reviews/create", Some(token), Some(json!({
            "eventId": event_id, "rating": 9, "content": "x".repeat(600)
        }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Bodies that would not even parse as a review.
        let (status, _) = app.send("POST", "/api/reviews/create", Some(token), Some(json!({
            "eventId": event_id, "rating": 5
        }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.send("POST", "/api/reviews/create", Some(token), Some(json!({
            "eventId": event_id, "rating": 4.5, "content": "Loved it"
        }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.send("POST", "/api/reviews/create", Some(token), Some(json!({
            "eventId": event_id, "rating": 5, "content": "Loved it"
        }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let reviewer = app.register("reviewer", false).await;
    let (status, body) = app.send("POST", "/api/reviews/create", Some(&reviewer), Some(json!({
        "eventId": event_id, "rating": 5
    }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Review content is required.");

    let (status, body) = app.send("POST", "/api/reviews/create", Some(&reviewer), Some(json!({
        "eventId": event_id, "rating": 4.5, "content": "Loved it"
    }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Rating must be a whole number.");
}

#[tokio::test]
async fn test_review_validation_and_missing_event() {
    let app = TestApp::new().await;
    let organizer = app.register("organizer", false).await;
    let reviewer = app.register("reviewer", false).await;
    let event_id = app.create_event(&organizer, "Summer Fest").await;

    let (status, body) = app.send("POST", "/api/reviews/create", Some(&reviewer), Some(json!({
        "eventId": event_id, "rating": 0, "content": "meh"
    }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Rating must be between 1 and 5.");

    let (status, _) = app.send("POST", "/api/reviews/create", Some(&reviewer), Some(json!({
        "eventId": event_id, "rating": 3, "content": "x".repeat(501)
    }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.send("POST", "/api/reviews/create", Some(&reviewer), Some(json!({
        "eventId": "missing", "rating": 3, "content": "ok"
    }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_author_edits_or_deletes() {
    let app = TestApp::new().await;
    let organizer = app.register("organizer", false).await;
    let author = app.register("author", false).await;
    let other = app.register("other", false).await;
    let admin = app.register("root", true).await;
    let event_id = app.create_event(&organizer, "Summer Fest").await;

    let (_, body) = app.send("POST", "/api/reviews/create", Some(&author), Some(json!({
        "eventId": event_id, "rating": 2, "content": "Too loud"
    }))).await;
    let uri = format!("/api/reviews/{}", body["review"]["id"].as_str().unwrap());

    for token in [&other, &admin, &organizer] {
        let (status, _) = app.send("PUT", &uri, Some(token), Some(json!({"rating": 5}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.send("DELETE", &uri, Some(token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, _) = app.send("PUT", "/api/reviews/missing", Some(&author), Some(json!({"rating": 5}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("PUT", &uri, Some(&author), Some(json!({"rating": 6}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
