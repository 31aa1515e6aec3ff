use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const DURATION_SECS: u64 = 20;
const BASE_URL: &str = "http://localhost:3000";
const PASSWORD: &str = "benchmark-password";
const TICKET_STOCK: i64 = 10_000_000;

struct Target {
    name: &'static str,
    method: &'static str,
    url: String,
    token: Option<String>,
    body: Option<serde_json::Value>,
}

#[tokio::main]
async fn main() {
    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", BASE_URL);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    if client.get(format!("{}/health", BASE_URL)).send().await.is_err() {
        eprintln!("{}", "❌ Server is NOT reachable at localhost:3000. Please start it first.".red().bold());
        return;
    }

    println!("\n{}", "⚙️  Setting up benchmark data...".yellow());
    let run_id = Uuid::new_v4().simple().to_string();
    let organizer_email = format!("org-{}@bench.local", &run_id[..8]);
    let buyer_email = format!("buyer-{}@bench.local", &run_id[..8]);
    let organizer = register(&client, &format!("org{}", &run_id[..8]), &organizer_email).await;
    let buyer = register(&client, &format!("buyer{}", &run_id[..8]), &buyer_email).await;
    let event_id = setup_event(&client, &organizer).await;
    let ticket_id = setup_ticket(&client, &organizer, &event_id).await;

    println!("{}", "✅ Data created successfully.".green());
    println!("   Event ID:  {}", event_id);
    println!("   Ticket ID: {}", ticket_id);

    let targets = vec![
        Target {
            name: "Health Check (Public)",
            method: "GET",
            url: format!("{}/health", BASE_URL),
            token: None,
            body: None,
        },
        Target {
            name: "Get Event By Id (Cached Read)",
            method: "GET",
            url: format!("{}/api/events/{}", BASE_URL, event_id),
            token: Some(buyer.clone()),
            body: None,
        },
        Target {
            name: "List Tickets (Uncached Read)",
            method: "GET",
            url: format!("{}/api/tickets/event/{}", BASE_URL, event_id),
            token: Some(buyer.clone()),
            body: None,
        },
        Target {
            name: "Purchase Ticket (Contended Write)",
            method: "POST",
            url: format!("{}/api/purchase/tickets", BASE_URL),
            token: Some(buyer.clone()),
            body: Some(json!({ "ticketId": ticket_id, "quantity": 1 })),
        },
        Target {
            name: "Signin Flow (Crypto Intensive)",
            method: "POST",
            url: format!("{}/api/auth/signin", BASE_URL),
            token: None,
            body: Some(json!({ "email": buyer_email, "password": PASSWORD })),
        },
    ];

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, rps).await;
        }
    }
}

/// Signs up a fresh account and returns its bearer token.
async fn register(client: &Client, username: &str, email: &str) -> String {
    let res = client.post(format!("{}/api/auth/user/signup", BASE_URL))
        .json(&json!({
            "username": username,
            "email": email,
            "password": PASSWORD
        }))
        .send()
        .await
        .expect("Failed to send signup request");

    if !res.status().is_success() {
        panic!("Failed to sign up {}: status {}", username, res.status());
    }

    let res = client.post(format!("{}/api/auth/signin", BASE_URL))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .expect("Signin failed during setup");

    if !res.status().is_success() {
        panic!("Signin failed. Status: {}", res.status());
    }

    let body: Value = res.json().await.expect("Failed to parse signin response");
    body["token"].as_str().expect("No token").to_string()
}

async fn setup_event(client: &Client, token: &str) -> String {
    let res = client.post(format!("{}/api/events/create", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": "Benchmark Concert",
            "description": "Load testing",
            "date": (Utc::now() + ChronoDuration::days(365)).to_rfc3339(),
            "location": "Server room",
            "category": "Tech"
        }))
        .send()
        .await
        .expect("Failed to create event");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to create event data. Status: {}. Body: {}", status, txt);
    }

    let body: Value = res.json().await.unwrap();
    body["id"].as_str().expect("No event id").to_string()
}

async fn setup_ticket(client: &Client, token: &str, event_id: &str) -> String {
    let res = client.post(format!("{}/api/tickets/create", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "eventId": event_id,
            "type": "General Admission",
            "price": 10.0,
            "quantity": TICKET_STOCK
        }))
        .send()
        .await
        .expect("Failed to create ticket");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to create ticket data. Status: {}. Body: {}", status, txt);
    }

    let body: Value = res.json().await.unwrap();
    body["ticket"]["id"].as_str().expect("No ticket id").to_string()
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).unwrap())
    ));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let body = target.body.clone();
            let token = target.token.clone();
            let method = target.method;
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let mut req = match method {
                    "POST" => client.post(&url),
                    _ => client.get(&url),
                };
                if let Some(token) = token {
                    req = req.bearer_auth(token);
                }
                if let Some(b) = body {
                    req = req.json(&b);
                }
                let res = req.send().await;
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        histogram.record(latency.as_micros() as u64).unwrap();
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}