//! Hotel API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateHotelRequest, HotelDeletionDto, HotelDto, ListHotelsQuery, UpdateHotelRequest,
};
use crate::interfaces::http::common::{ApiError, ApiResponse, PaginatedResponse, ValidatedJson};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/hotels",
    tag = "Hotels",
    params(ListHotelsQuery),
    responses((status = 200, description = "Hotel list", body = PaginatedResponse<HotelDto>))
)]
pub async fn list_hotels(
    State(state): State<AppState>,
    Query(query): Query<ListHotelsQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<HotelDto>>>, ApiError> {
    let result = state
        .hotels
        .list(query.filter(), query.pagination())
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        HotelDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/hotels/{id}",
    tag = "Hotels",
    params(("id" = i32, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Hotel details", body = ApiResponse<HotelDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<HotelDto>>, ApiError> {
    let hotel = state.hotels.get(id).await?;
    Ok(Json(ApiResponse::success(hotel.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/hotels",
    tag = "Hotels",
    request_body = CreateHotelRequest,
    responses(
        (status = 201, description = "Hotel created", body = ApiResponse<HotelDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_hotel(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateHotelRequest>,
) -> Result<(StatusCode, Json<ApiResponse<HotelDto>>), ApiError> {
    let hotel = state.hotels.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(hotel.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/hotels/{id}",
    tag = "Hotels",
    params(("id" = i32, Path, description = "Hotel ID")),
    request_body = UpdateHotelRequest,
    responses(
        (status = 200, description = "Hotel updated", body = ApiResponse<HotelDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_hotel(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateHotelRequest>,
) -> Result<Json<ApiResponse<HotelDto>>, ApiError> {
    let hotel = state.hotels.update(id, request.into()).await?;
    Ok(Json(ApiResponse::success(hotel.into())))
}

/// Deletes the hotel together with its rooms and their bookings.
#[utoipa::path(
    delete,
    path = "/api/v1/hotels/{id}",
    tag = "Hotels",
    params(("id" = i32, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Hotel deleted", body = ApiResponse<HotelDeletionDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_hotel(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<HotelDeletionDto>>, ApiError> {
    let deletion = state.hotels.delete(id).await?;
    Ok(Json(ApiResponse::success(deletion.into())))
}
