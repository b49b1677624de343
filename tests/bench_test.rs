//! Benchmark tests for critical operations
//!
//! Run with: cargo test --release -- --ignored --nocapture bench

use std::sync::Arc;
use std::time::Instant;

use axum::{body::Body, http::Request};
use serde_json::json;
use tempfile::NamedTempFile;
use tower::ServiceExt;

use edgelink::config::Config;
use edgelink::database::{init_db, AppState, RedbStore};
use edgelink::handler::admin_api;
use edgelink::route::create_app;

fn bench_state() -> (AppState, String, NamedTempFile) {
    let admin = "b".repeat(64);
    let temp_db = NamedTempFile::new().unwrap();
    let db = init_db(temp_db.path().to_str().unwrap()).unwrap();
    let config = Config::from_lookup(|key| match key {
        "ADMIN_PATH" => Some(admin.clone()),
        _ => None,
    });
    let state = AppState::new(Arc::new(RedbStore::new(db)), config).unwrap();
    (state, admin, temp_db)
}

fn report(name: &str, iterations: usize, start: Instant) {
    let duration = start.elapsed();
    let avg_ms = duration.as_millis() as f64 / iterations as f64;
    let ops_per_sec = (iterations as f64 / duration.as_secs_f64()) as u64;

    println!("  {} ({} iterations)", name, iterations);
    println!("    Total time: {:?}", duration);
    println!("    Avg time: {:.3}ms", avg_ms);
    println!("    Throughput: {} ops/sec\n", ops_per_sec);
}

#[tokio::test]
#[ignore] // Run explicitly with: cargo test bench --release -- --ignored --nocapture
async fn bench_upsert_and_list() {
    println!("\n=== Benchmark: Admin API ===\n");

    let (state, _admin, _temp_db) = bench_state();

    let iterations = 1000;
    let start = Instant::now();
    for i in 0..iterations {
        let body = json!({
            "action": "create",
            "slug": format!("bench-{}", i),
            "target": "https://example.com/bench",
        })
        .to_string();
        let response = admin_api(&state, body.as_bytes()).await;
        assert!(response.success);
    }
    report("Create links", iterations, start);

    let list = json!({"action": "list"}).to_string();
    let start = Instant::now();
    for _ in 0..10 {
        let response = admin_api(&state, list.as_bytes()).await;
        assert_eq!(response.data.map(|d| d.len()), Some(iterations));
    }
    report("List 1000 links", 10, start);
}

#[tokio::test]
#[ignore]
async fn bench_redirects() {
    println!("\n=== Benchmark: Redirects ===\n");

    let (state, _admin, _temp_db) = bench_state();
    let body = json!({"action": "create", "slug": "hot", "target": "https://example.com"}).to_string();
    assert!(admin_api(&state, body.as_bytes()).await.success);

    let app = create_app(state);
    let iterations = 1000;
    let start = Instant::now();
    for _ in 0..iterations {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/hot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 302);
    }
    report("Resolve /hot", iterations, start);
}
