//! API integration tests
//!
//! Need a running panel API in front of a reachable reservation store, and
//! an owner token in `CANCHAS_TEST_TOKEN`.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn owner_token() -> String {
    std::env::var("CANCHAS_TEST_TOKEN").expect("CANCHAS_TEST_TOKEN not set")
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
async fn test_missing_token_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/panel/courts", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "NotAuthorized");
}

#[tokio::test]
#[ignore]
async fn test_month_calendar() {
    let client = Client::new();

    let response = client
        .get(format!("{}/panel/calendar/2026/2", BASE_URL))
        .bearer_auth(owner_token())
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["label"], "Febrero 2026");
    let days = body["cells"]
        .as_array()
        .expect("cells is an array")
        .iter()
        .filter(|c| c["kind"] == "day")
        .count();
    assert_eq!(days, 28);
}

#[tokio::test]
#[ignore]
async fn test_malformed_date_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/panel/days/12-09-2026", BASE_URL))
        .bearer_auth(owner_token())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_booking_lifecycle() {
    let client = Client::new();
    let token = owner_token();

    let courts: Value = client
        .get(format!("{}/panel/courts", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse courts");
    let court = courts
        .as_array()
        .and_then(|c| c.iter().find(|c| c["isActive"] == true))
        .expect("No active court");

    let date = (chrono::Local::now().date_naive() + chrono::Duration::days(30)).to_string();

    let slots: Value = client
        .get(format!("{}/panel/days/{}/slots", BASE_URL, date))
        .query(&[("courtId", court["id"].to_string()), ("duration", "60".to_string())])
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse slots");
    let start = slots
        .as_array()
        .and_then(|s| s.iter().find(|o| o["disabled"] == false))
        .map(|o| o["slot"].clone())
        .expect("No free slot");

    let draft = json!({
        "courtId": court["id"],
        "date": date,
        "start": start,
        "durationMinutes": 60,
        "clientName": "Prueba",
        "clientPhone": "000",
        "note": "integration test"
    });

    let response = client
        .post(format!("{}/panel/reservations", BASE_URL))
        .bearer_auth(&token)
        .json(&draft)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.expect("Failed to parse reservation");
    assert_eq!(created["paymentStatus"], "pending");

    // same slot again
    let response = client
        .post(format!("{}/panel/reservations", BASE_URL))
        .bearer_auth(&token)
        .json(&draft)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .put(format!("{}/panel/reservations/{}/cancel", BASE_URL, created["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
