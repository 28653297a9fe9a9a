//! API Router with Swagger UI

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, PaginatedResponse};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{bookings, cache, health, hotels, rooms, stats, users};
use super::state::AppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Bookings
        bookings::create_booking,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::get_booking_by_reference,
        bookings::user_bookings,
        bookings::update_booking,
        bookings::cancel_booking,
        bookings::check_in_booking,
        bookings::check_out_booking,
        // Hotels
        hotels::list_hotels,
        hotels::get_hotel,
        hotels::create_hotel,
        hotels::update_hotel,
        hotels::delete_hotel,
        // Rooms
        rooms::list_rooms,
        rooms::available_rooms,
        rooms::search_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::update_room,
        rooms::set_room_status,
        rooms::mark_room_clean,
        rooms::delete_room,
        rooms::room_bookings,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Stats
        stats::booking_stats,
        // Cache
        cache::clear_cache,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginatedResponse<bookings::BookingDto>,
            bookings::BookingDto,
            bookings::BookingDetailsDto,
            bookings::CreateBookingRequest,
            bookings::UpdateBookingRequest,
            bookings::TransitionResponse,
            hotels::HotelDto,
            hotels::CreateHotelRequest,
            hotels::UpdateHotelRequest,
            hotels::HotelDeletionDto,
            rooms::RoomDto,
            rooms::RoomWithHotelDto,
            rooms::CreateRoomRequest,
            rooms::UpdateRoomRequest,
            rooms::SetRoomStatusRequest,
            users::UserDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            users::UserDeletionDto,
            stats::BookingStatsDto,
            cache::CacheClearedDto,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Bookings", description = "Reservations and their lifecycle: confirm, check in, check out, cancel"),
        (name = "Hotels", description = "Hotel inventory"),
        (name = "Rooms", description = "Rooms, operational status and availability search"),
        (name = "Users", description = "Guest accounts"),
        (name = "Stats", description = "Booking counters"),
        (name = "Cache", description = "Cache maintenance"),
    ),
    info(
        title = "Hotel Booking API",
        version = "1.0.0",
        description = "Hotel inventory and reservation service",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

fn api_routes() -> Router<AppState> {
    let booking_routes = Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/{id}",
            get(bookings::get_booking).put(bookings::update_booking),
        )
        .route(
            "/reference/{reference}",
            get(bookings::get_booking_by_reference),
        )
        .route("/user/{user_id}/bookings", get(bookings::user_bookings))
        .route("/{id}/cancel", put(bookings::cancel_booking))
        .route("/{id}/check-in", put(bookings::check_in_booking))
        .route("/{id}/check-out", put(bookings::check_out_booking));

    let hotel_routes = Router::new()
        .route("/", get(hotels::list_hotels).post(hotels::create_hotel))
        .route(
            "/{id}",
            get(hotels::get_hotel)
                .put(hotels::update_hotel)
                .delete(hotels::delete_hotel),
        );

    let room_routes = Router::new()
        .route("/", get(rooms::list_rooms).post(rooms::create_room))
        .route("/available", get(rooms::available_rooms))
        .route("/search/available", get(rooms::search_rooms))
        .route(
            "/{id}",
            get(rooms::get_room)
                .put(rooms::update_room)
                .delete(rooms::delete_room),
        )
        .route("/{id}/status", put(rooms::set_room_status))
        .route("/{id}/mark-clean", put(rooms::mark_room_clean))
        .route("/{id}/bookings", get(rooms::room_bookings));

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    Router::new()
        .nest("/bookings", booking_routes)
        .nest("/hotels", hotel_routes)
        .nest("/rooms", room_routes)
        .nest("/users", user_routes)
        .route("/stats/bookings", get(stats::booking_stats))
        .route("/cache/clear", post(cache::clear_cache))
}

/// Create the API router with all routes.
///
/// `/metrics` is only mounted when a Prometheus recorder is installed.
pub fn create_api_router(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state);

    if let Some(handle) = metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
