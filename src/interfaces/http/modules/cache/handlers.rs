use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ClearCacheQuery {
    /// Key prefix such as `rooms_search:` or `booking:`; omitted clears everything
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CacheClearedDto {
    pub prefix: String,
    pub removed: u64,
}

#[utoipa::path(
    post,
    path = "/api/v1/cache/clear",
    tag = "Cache",
    params(ClearCacheQuery),
    responses((status = 200, description = "Entries removed", body = ApiResponse<CacheClearedDto>))
)]
pub async fn clear_cache(
    State(state): State<AppState>,
    Query(query): Query<ClearCacheQuery>,
) -> Json<ApiResponse<CacheClearedDto>> {
    let removed = state.stats.clear_cache(&query.prefix).await;
    Json(ApiResponse::success(CacheClearedDto {
        prefix: query.prefix,
        removed,
    }))
}
