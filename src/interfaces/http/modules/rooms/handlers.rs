//! Room API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    parse_room_status, AvailableRoomsQuery, CreateRoomRequest, ListRoomsQuery, RoomBookingsQuery,
    RoomDto, RoomSearchQuery, RoomWithHotelDto, SetRoomStatusRequest, UpdateRoomRequest,
};
use crate::interfaces::http::common::{ApiError, ApiResponse, PaginatedResponse, ValidatedJson};
use crate::interfaces::http::modules::bookings::BookingDto;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    params(ListRoomsQuery),
    responses(
        (status = 200, description = "Room list", body = PaginatedResponse<RoomDto>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    Query(query): Query<ListRoomsQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<RoomDto>>>, ApiError> {
    let result = state.rooms.list(query.filter()?, query.pagination()).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        RoomDto::from,
    ))))
}

/// Rooms of a hotel that are Available and free for the whole stay.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/available",
    tag = "Rooms",
    params(AvailableRoomsQuery),
    responses(
        (status = 200, description = "Free rooms", body = ApiResponse<Vec<RoomDto>>),
        (status = 400, description = "Invalid date range"),
        (status = 404, description = "Hotel not found")
    )
)]
pub async fn available_rooms(
    State(state): State<AppState>,
    Query(query): Query<AvailableRoomsQuery>,
) -> Result<Json<ApiResponse<Vec<RoomDto>>>, ApiError> {
    let rooms = state
        .rooms
        .search_available(query.hotel_id, query.stay()?, query.filter()?)
        .await?;
    Ok(Json(ApiResponse::success(
        rooms.into_iter().map(RoomDto::from).collect(),
    )))
}

/// Available rooms in any hotel, filtered by location, type and party size.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/search/available",
    tag = "Rooms",
    params(RoomSearchQuery),
    responses(
        (status = 200, description = "Matching rooms with their hotel", body = ApiResponse<Vec<RoomWithHotelDto>>),
        (status = 400, description = "Invalid date range or price")
    )
)]
pub async fn search_rooms(
    State(state): State<AppState>,
    Query(query): Query<RoomSearchQuery>,
) -> Result<Json<ApiResponse<Vec<RoomWithHotelDto>>>, ApiError> {
    let found = state.rooms.search_all(query.to_search()?).await?;
    Ok(Json(ApiResponse::success(
        found.into_iter().map(RoomWithHotelDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room details", body = ApiResponse<RoomDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RoomDto>>, ApiError> {
    let room = state.rooms.get(id).await?;
    Ok(Json(ApiResponse::success(room.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    tag = "Rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = ApiResponse<RoomDto>),
        (status = 400, description = "Duplicate room number or invalid terms"),
        (status = 404, description = "Hotel not found")
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RoomDto>>), ApiError> {
    let room = state.rooms.create(request.into_new_room()?).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(room.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated", body = ApiResponse<RoomDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateRoomRequest>,
) -> Result<Json<ApiResponse<RoomDto>>, ApiError> {
    let room = state.rooms.update(id, request.into_patch()?).await?;
    Ok(Json(ApiResponse::success(room.into())))
}

/// Administrative status change. Not booking-aware.
#[utoipa::path(
    put,
    path = "/api/v1/rooms/{id}/status",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID")),
    request_body = SetRoomStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<RoomDto>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Not found")
    )
)]
pub async fn set_room_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<SetRoomStatusRequest>,
) -> Result<Json<ApiResponse<RoomDto>>, ApiError> {
    let status = parse_room_status(&request.status)?;
    let room = state.rooms.set_status(id, status).await?;
    Ok(Json(ApiResponse::success(room.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/rooms/{id}/mark-clean",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room is available again", body = ApiResponse<RoomDto>),
        (status = 400, description = "Room is not being cleaned"),
        (status = 404, description = "Not found")
    )
)]
pub async fn mark_room_clean(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RoomDto>>, ApiError> {
    let room = state.rooms.mark_clean(id).await?;
    Ok(Json(ApiResponse::success(room.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room deleted; data is the number of bookings removed", body = ApiResponse<u64>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<u64>>, ApiError> {
    let removed = state.rooms.delete(id).await?;
    Ok(Json(ApiResponse::success(removed)))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}/bookings",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID"), RoomBookingsQuery),
    responses(
        (status = 200, description = "Bookings ordered by check-in", body = ApiResponse<Vec<BookingDto>>),
        (status = 404, description = "Room not found")
    )
)]
pub async fn room_bookings(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<RoomBookingsQuery>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, ApiError> {
    let bookings = state.rooms.bookings(id, query.to_query()?).await?;
    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingDto::from).collect(),
    )))
}
