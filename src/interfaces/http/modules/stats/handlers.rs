use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::BookingStats;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatsQuery {
    pub hotel_id: Option<i32>,
    pub room_id: Option<i32>,
}

/// Counters since the cache was last emptied
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingStatsDto {
    pub total_bookings: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_bookings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_bookings: Option<i64>,
}

impl From<BookingStats> for BookingStatsDto {
    fn from(s: BookingStats) -> Self {
        Self {
            total_bookings: s.total_bookings,
            hotel_id: s.hotel_id,
            hotel_bookings: s.hotel_bookings,
            room_id: s.room_id,
            room_bookings: s.room_bookings,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/stats/bookings",
    tag = "Stats",
    params(StatsQuery),
    responses((status = 200, description = "Booking counters", body = ApiResponse<BookingStatsDto>))
)]
pub async fn booking_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Json<ApiResponse<BookingStatsDto>> {
    let stats = state
        .stats
        .booking_stats(query.hotel_id, query.room_id)
        .await;
    Json(ApiResponse::success(stats.into()))
}
