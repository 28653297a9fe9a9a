//! End-to-end booking flows through the REST router over in-memory storage.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::{create_api_router, AppState};
use crate::application::{create_event_bus, CacheService, EventDispatcher};
use crate::config::CacheConfig;
use crate::infrastructure::{InMemoryRepositoryProvider, MemoryCacheStore};

fn app() -> Router {
    let cache = Arc::new(CacheService::new(
        Arc::new(MemoryCacheStore::new()),
        CacheConfig::default(),
    ));
    let events = EventDispatcher::new(create_event_bus(64), Duration::from_secs(2));
    let state = AppState::new(Arc::new(InMemoryRepositoryProvider::new()), cache, events);
    create_api_router(state, None)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 3, 1, 14, 0, 0).unwrap() + ChronoDuration::days(offset)
}

struct Fixture {
    user_id: i64,
    hotel_id: i64,
    room_id: i64,
}

/// One hotel with a 100/night room for two, and one guest.
async fn seed(app: &Router) -> Fixture {
    let (status, hotel) = send(
        app,
        Method::POST,
        "/api/v1/hotels",
        Some(json!({
            "name": "Harbour View",
            "address": "Quay 3",
            "city": "Tallinn",
            "country": "Estonia",
            "rating": 4.5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{hotel}");
    let hotel_id = hotel["data"]["id"].as_i64().unwrap();

    let (status, room) = send(
        app,
        Method::POST,
        "/api/v1/rooms",
        Some(json!({
            "hotel_id": hotel_id,
            "room_number": "101",
            "floor": 1,
            "room_type": "double",
            "price_per_night": 100.0,
            "capacity": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{room}");
    let room_id = room["data"]["id"].as_i64().unwrap();

    let (status, user) = send(
        app,
        Method::POST,
        "/api/v1/users",
        Some(json!({
            "email": "mari@example.com",
            "first_name": "Mari",
            "last_name": "Tamm"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{user}");
    let user_id = user["data"]["id"].as_i64().unwrap();

    Fixture {
        user_id,
        hotel_id,
        room_id,
    }
}

fn booking_body(f: &Fixture, from: i64, to: i64, guests: i32) -> Value {
    json!({
        "user_id": f.user_id,
        "hotel_id": f.hotel_id,
        "room_id": f.room_id,
        "check_in_date": day(from),
        "check_out_date": day(to),
        "number_of_guests": guests
    })
}

async fn room_status(app: &Router, room_id: i64) -> String {
    let (status, room) = send(app, Method::GET, &format!("/api/v1/rooms/{room_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    room["data"]["status"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn booking_two_nights_prices_stay_and_occupies_room() {
    let app = app();
    let f = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(booking_body(&f, 0, 2, 2)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "confirmed");
    assert_eq!(body["data"]["nights"], 2);
    assert_eq!(body["data"]["total_price"].as_f64(), Some(200.0));
    assert!(uuid::Uuid::parse_str(body["data"]["booking_reference"].as_str().unwrap()).is_ok());

    assert_eq!(room_status(&app, f.room_id).await, "occupied");
}

#[tokio::test]
async fn overlapping_booking_is_rejected() {
    let app = app();
    let f = seed(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(booking_body(&f, 0, 3, 1)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(booking_body(&f, 1, 4, 1)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let code = body["code"].as_str().unwrap();
    assert!(
        code == "ROOM_UNAVAILABLE" || code == "DATE_CONFLICT",
        "unexpected code {code}"
    );
}

#[tokio::test]
async fn guests_over_capacity_persist_nothing() {
    let app = app();
    let f = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(booking_body(&f, 0, 2, 3)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CAPACITY_EXCEEDED");

    let (status, list) = send(&app, Method::GET, "/api/v1/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"]["total"], 0);
    assert_eq!(room_status(&app, f.room_id).await, "available");
}

#[tokio::test]
async fn cancel_frees_room_for_same_dates() {
    let app = app();
    let f = seed(&app).await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(booking_body(&f, 0, 2, 2)),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/bookings/{id}/cancel"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "cancelled");
    assert_eq!(room_status(&app, f.room_id).await, "available");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/bookings/{id}/cancel"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ALREADY_CANCELLED");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(booking_body(&f, 0, 2, 2)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn full_stay_leaves_room_for_cleaning() {
    let app = app();
    let f = seed(&app).await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(booking_body(&f, 0, 2, 2)),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/bookings/{id}/check-in"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "checked_in");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/bookings/{id}/check-out"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(room_status(&app, f.room_id).await, "cleaning");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/bookings/{id}"),
        Some(json!({ "number_of_guests": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BOOKING_IMMUTABLE");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/rooms/{}/mark-clean", f.room_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(room_status(&app, f.room_id).await, "available");
}

#[tokio::test]
async fn date_update_recomputes_price() {
    let app = app();
    let f = seed(&app).await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(booking_body(&f, 0, 2, 2)),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/bookings/{id}"),
        Some(json!({ "check_out_date": day(5) })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["total_price"].as_f64(), Some(500.0));

    let (status, details) = send(&app, Method::GET, &format!("/api/v1/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["data"]["total_price"].as_f64(), Some(500.0));
    assert_eq!(details["data"]["room"]["room_number"], "101");
    assert_eq!(details["data"]["user"]["email"], "mari@example.com");
}

#[tokio::test]
async fn missing_booking_is_404_and_bad_json_is_400() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/bookings/4242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "BOOKING_NOT_FOUND");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/bookings")
        .header("content-type", "application/json")
        .body(Body::from("{\"user_id\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_guest_count_is_422() {
    let app = app();
    let f = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(booking_body(&f, 0, 2, 0)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn stats_count_created_bookings() {
    let app = app();
    let f = seed(&app).await;
    send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(booking_body(&f, 0, 1, 1)),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/stats/bookings?hotel_id={}", f.hotel_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_bookings"], 1);
    assert_eq!(body["data"]["hotel_bookings"], 1);
}

#[tokio::test]
async fn health_reports_in_memory_storage() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["status"], "in_memory");
}

fn query_date(offset: i64) -> String {
    day(offset).to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[tokio::test]
async fn search_across_hotels_returns_room_with_hotel() {
    let app = app();
    let f = seed(&app).await;
    send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(booking_body(&f, 0, 2, 1)),
    )
    .await;

    let uri = format!(
        "/api/v1/rooms/search/available?city=tall&room_type=DOUBLE&guests=2&check_in_date={}&check_out_date={}",
        query_date(5),
        query_date(7)
    );
    // The only room is occupied by the first stay.
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, second) = send(
        &app,
        Method::POST,
        "/api/v1/rooms",
        Some(json!({
            "hotel_id": f.hotel_id,
            "room_number": "102",
            "room_type": "Double Deluxe",
            "price_per_night": 140.0,
            "capacity": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{second}");

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let found = body["data"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["room_number"], "102");
    assert_eq!(found[0]["hotel"]["city"], "Tallinn");

    let (status, body) = send(
        &app,
        Method::GET,
        &format!(
            "/api/v1/rooms/search/available?check_in_date={}",
            query_date(5)
        ),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn cache_clear_reports_removed_entries() {
    let app = app();
    let f = seed(&app).await;
    send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(booking_body(&f, 0, 1, 1)),
    )
    .await;

    let (status, body) = send(&app, Method::POST, "/api/v1/cache/clear?prefix=stats:", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["prefix"], "stats:");
    assert_eq!(body["data"]["removed"], 3);

    let (_, stats) = send(&app, Method::GET, "/api/v1/stats/bookings", None).await;
    assert_eq!(stats["data"]["total_bookings"], 0);
}
