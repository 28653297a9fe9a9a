//! Booking API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    BookingDetailsDto, BookingDto, CreateBookingRequest, TransitionResponse, UpdateBookingRequest,
};
use crate::interfaces::http::common::{
    ApiError, ApiResponse, PaginatedResponse, PaginationQuery, ValidatedJson,
};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking confirmed", body = ApiResponse<BookingDto>),
        (status = 400, description = "Room unavailable, capacity exceeded, bad dates or overlap"),
        (status = 404, description = "User, hotel or room not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let booking = state.bookings.create(request.into()).await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    params(PaginationQuery),
    responses((status = 200, description = "Bookings, newest first", body = PaginatedResponse<BookingDto>))
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<BookingDto>>>, ApiError> {
    let result = state.bookings.list((&query).into()).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        BookingDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking with user, hotel and room", body = ApiResponse<BookingDetailsDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDetailsDto>>, ApiError> {
    let details = state.bookings.get(id).await?;
    Ok(Json(ApiResponse::success(details.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/reference/{reference}",
    tag = "Bookings",
    params(("reference" = String, Path, description = "Booking reference")),
    responses(
        (status = 200, description = "Booking", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let booking = state.bookings.find_by_reference(&reference).await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/user/{user_id}/bookings",
    tag = "Bookings",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user's bookings, newest first", body = ApiResponse<Vec<BookingDto>>),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, ApiError> {
    let bookings = state.bookings.list_for_user(user_id).await?;
    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingDto::from).collect(),
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Booking updated", body = ApiResponse<BookingDto>),
        (status = 400, description = "Booking immutable, invalid transition or overlap"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let booking = state.bookings.update(id, request.into_patch()?).await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled, room released", body = ApiResponse<TransitionResponse>),
        (status = 400, description = "Already cancelled, completed or checked in"),
        (status = 404, description = "Not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TransitionResponse>>, ApiError> {
    let booking = state.bookings.cancel(id).await?;
    Ok(Json(ApiResponse::success(TransitionResponse::new(
        "Booking cancelled successfully",
        &booking,
    ))))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/check-in",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Guest checked in", body = ApiResponse<TransitionResponse>),
        (status = 400, description = "Booking is not confirmed"),
        (status = 404, description = "Not found")
    )
)]
pub async fn check_in_booking(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TransitionResponse>>, ApiError> {
    let booking = state.bookings.check_in(id).await?;
    Ok(Json(ApiResponse::success(TransitionResponse::new(
        "Guest checked in successfully",
        &booking,
    ))))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/check-out",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Guest checked out, room set to cleaning", body = ApiResponse<TransitionResponse>),
        (status = 400, description = "Guest is not checked in"),
        (status = 404, description = "Not found")
    )
)]
pub async fn check_out_booking(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TransitionResponse>>, ApiError> {
    let booking = state.bookings.check_out(id).await?;
    Ok(Json(ApiResponse::success(TransitionResponse::new(
        "Guest checked out successfully",
        &booking,
    ))))
}
