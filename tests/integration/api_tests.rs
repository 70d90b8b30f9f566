//! API integration tests
//!
//! Require a running server with an empty-ish database and the bootstrap
//! admin configured as admin/admin.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an admin token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Create a 30 minute service and return its id
async fn create_service(client: &Client, token: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/services", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "name": name,
            "price": "30.00",
            "durationMinutes": 30
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No service id")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["user"]["roles"][0], "admin");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_booking_reuses_customer() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let service_id = create_service(&client, &token, "Integration cut").await;

    let book = |start: &'static str| {
        client
            .post(format!("{}/appointments", BASE_URL))
            .json(&json!({
                "service": { "id": service_id },
                "customer": {
                    "firstName": "Ana",
                    "lastName": "Lopez",
                    "email": "ana.integration@example.com"
                },
                "startTime": start,
                "notes": "First visit"
            }))
            .send()
    };

    let first = book("2031-05-15T10:00:00").await.expect("Failed to send request");
    assert_eq!(first.status(), 201);
    let first: Value = first.json().await.expect("Failed to parse response");
    assert_eq!(first["status"], "ACTIVE");
    assert_eq!(first["endTime"], "2031-05-15T10:30:00");

    let second = book("2031-05-16T10:00:00").await.expect("Failed to send request");
    assert_eq!(second.status(), 201);
    let second: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(first["customer"]["id"], second["customer"]["id"]);

    let response = client
        .get(format!(
            "{}/appointments/by-date-range?start=2031-05-15T00:00:00&end=2031-05-16T23:59:59",
            BASE_URL
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let list: Value = response.json().await.expect("Failed to parse response");
    assert!(list.as_array().map(|a| a.len() >= 2).unwrap_or(false));
}

#[tokio::test]
#[ignore]
async fn test_booking_requires_service_and_email() {
    let client = Client::new();

    let response = client
        .post(format!("{}/appointments", BASE_URL))
        .json(&json!({
            "customer": { "email": "nobody@example.com" },
            "startTime": "2031-05-15T10:00:00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], 400);
    assert_eq!(body["path"], "/api/v1/appointments");
}

#[tokio::test]
#[ignore]
async fn test_date_range_rejects_bad_datetime() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!(
            "{}/appointments/by-date-range?start=yesterday&end=2031-05-16T23:59:59",
            BASE_URL
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_unknown_appointment_is_not_found() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/appointments/999999999", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let response = client
        .delete(format!("{}/appointments/999999999", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_blocked_slot_validation() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // start after end
    let response = client
        .post(format!("{}/blockedtimeslots", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "startTime": "14:00",
            "endTime": "13:00",
            "specificDate": "2031-05-15"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // repeating without a weekday
    let response = client
        .post(format!("{}/blockedtimeslots", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "startTime": "12:00",
            "endTime": "13:00",
            "repeating": true
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/blockedtimeslots", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "description": "Lunch",
            "startTime": "12:00",
            "endTime": "13:00",
            "specificDate": "2031-05-15"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/blockedtimeslots/date/2031-05-15", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let blocks: Value = response.json().await.expect("Failed to parse response");
    assert!(blocks
        .as_array()
        .map(|a| a.iter().any(|b| b["startTime"] == "12:00"))
        .unwrap_or(false));
}

#[tokio::test]
#[ignore]
async fn test_statistics_require_admin() {
    let client = Client::new();

    let response = client
        .get(format!("{}/statistics/detailed-counts", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    let token = get_auth_token(&client).await;
    let response = client
        .get(format!(
            "{}/statistics/detailed-counts?startDate=2031-05-01&endDate=2031-05-31",
            BASE_URL
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["daysInPeriod"], 31);
    assert_eq!(body["previousPeriodEnd"], "2031-04-30");
    assert_eq!(body["cancellationRate"]["isGrowthGood"], false);
}

#[tokio::test]
#[ignore]
async fn test_report_lists_service_breakdown() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!(
            "{}/reports?startDate=2031-05-01&endDate=2031-05-31",
            BASE_URL
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["reportStartDate"], "2031-05-01");
    assert!(body["serviceBreakdown"].is_array());
}
