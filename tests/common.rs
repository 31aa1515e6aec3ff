use ticketing_backend::{
    api::router::create_router,
    state::AppState,
    config::{Config, CacheConfig, CloudinaryConfig},
    domain::ports::BlobStorage,
    infra::factory::{run_sqlite_migrations, sqlite_state},
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::{json, Value};

/// Records uploads instead of sending them anywhere.
#[derive(Default)]
pub struct MockBlobStorage {
    pub uploads: Mutex<Vec<(String, String, usize)>>,
}

#[async_trait]
impl BlobStorage for MockBlobStorage {
    async fn upload(&self, file_name: &str, content_type: &str, data: Vec<u8>) -> Result<String, AppError> {
        self.uploads.lock().unwrap().push((file_name.to_string(), content_type.to_string(), data.len()));
        Ok(format!("https://cdn.test/ImageAsserts/{}", file_name))
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub blob_storage: Arc<MockBlobStorage>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_cache(CacheConfig::default()).await
    }

    pub async fn with_cache(cache: CacheConfig) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: include_str!("../tests/keys/test_private.pem").to_string(),
            jwt_public_key: include_str!("../tests/keys/test_public.pem").to_string(),
            auth_issuer: "test-issuer".to_string(),
            log_dir: "logs".to_string(),
            cache,
            cloudinary: CloudinaryConfig::default(),
        };

        let blob_storage = Arc::new(MockBlobStorage::default());
        let state = Arc::new(
            sqlite_state(&config, pool.clone(), blob_storage.clone()).expect("Failed to build state"),
        );
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            blob_storage,
        }
    }

    /// Sends a JSON request, optionally with a bearer token, and returns status and parsed body.
    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    /// Registers an account with the given role and returns a signed-in token.
    pub async fn register(&self, username: &str, admin: bool) -> String {
        let path = if admin { "/api/auth/admin/signup" } else { "/api/auth/user/signup" };
        let (status, body) = self.send("POST", path, None, Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123",
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

        self.signin(&format!("{}@example.com", username), "password123").await
    }

    pub async fn signin(&self, email: &str, password: &str) -> String {
        let (status, body) = self.send("POST", "/api/auth/signin", None, Some(json!({
            "email": email,
            "password": password,
        }))).await;
        assert_eq!(status, StatusCode::OK, "signin failed: {}", body);
        body["token"].as_str().expect("No token in body").to_string()
    }

    /// Creates an event one month out and returns its id.
    pub async fn create_event(&self, token: &str, title: &str) -> String {
        let (status, body) = self.send("POST", "/api/events/create", Some(token), Some(json!({
            "title": title,
            "description": "An evening out",
            "date": (chrono::Utc::now() + chrono::Duration::days(30)).to_rfc3339(),
            "location": "Riverside Arena",
            "category": "Music",
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "event creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Creates a ticket type and returns its id.
    pub async fn create_ticket(&self, token: &str, event_id: &str, ticket_type: &str, price: f64, quantity: i64) -> String {
        let (status, body) = self.send("POST", "/api/tickets/create", Some(token), Some(json!({
            "eventId": event_id,
            "type": ticket_type,
            "price": price,
            "quantity": quantity,
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "ticket creation failed: {}", body);
        body["ticket"]["id"].as_str().unwrap().to_string()
    }

    pub async fn ticket(&self, token: &str, event_id: &str, ticket_id: &str) -> Value {
        let (_, body) = self.send("GET", &format!("/api/tickets/event/{}", event_id), Some(token), None).await;
        body.as_array()
            .and_then(|tickets| tickets.iter().find(|t| t["id"] == ticket_id).cloned())
            .expect("ticket not listed")
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
