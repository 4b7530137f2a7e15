//! Per-user favorites routes. The caller's identity arrives in the
//! `x-user-id` header, set by the auth layer in front of this service.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderMap,
    Extension, Json,
};
use hybridhunt_core::{
    badge_label, favorite_records, query_raw, DealId, QueryResult, RecordSource, ToggleAction,
    UserContext, UserId,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{
    deals::DealsQuery, map_engine_error, map_rejection, sort_or_default, ApiError, ApiResponse,
    AppState, USER_ID_HEADER,
};

#[derive(Debug, Serialize)]
pub(super) struct CountData {
    count: usize,
    badge: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ToggleData {
    deal_id: DealId,
    action: ToggleAction,
    count: usize,
}

#[derive(Debug, Deserialize)]
pub(super) struct RemoveFavoritesBody {
    deal_ids: Vec<DealId>,
}

#[derive(Debug, Serialize)]
pub(super) struct RemoveData {
    removed: usize,
    count: usize,
}

fn user_context(headers: &HeaderMap, request_id: &str) -> Result<UserContext, ApiError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(UserId::new)
        .map(UserContext::new)
        .ok_or_else(|| {
            ApiError::new(
                request_id,
                "bad_request",
                format!("missing {USER_ID_HEADER} header"),
            )
        })
}

pub(super) async fn list_favorites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    query: Result<Query<DealsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<QueryResult>>, ApiError> {
    let ctx = user_context(&headers, &req_id.0)?;
    let Query(query) = query.map_err(|r| map_rejection(&req_id.0, r.body_text()))?;
    let records = favorite_records(state.favorites.as_ref(), state.catalog.as_ref(), &ctx);
    let sort = sort_or_default(query.sort, &state.config);
    let result = query_raw(&records, query.criteria, &sort)
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, result)))
}

pub(super) async fn favorites_count(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<CountData>>, ApiError> {
    let ctx = user_context(&headers, &req_id.0)?;
    let count = state.favorites.count(&ctx);

    Ok(Json(ApiResponse::new(
        req_id.0,
        CountData {
            count,
            badge: badge_label(count),
        },
    )))
}

pub(super) async fn toggle_favorite(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    deal_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<ToggleData>>, ApiError> {
    let ctx = user_context(&headers, &req_id.0)?;
    let Path(deal_id) = deal_id.map_err(|r| map_rejection(&req_id.0, r.body_text()))?;
    let deal_id = DealId(deal_id);
    if !state.catalog.contains(deal_id) {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("deal {deal_id} not found"),
        ));
    }

    let action = state.favorites.toggle(&ctx, deal_id);
    let count = state.favorites.count(&ctx);
    tracing::info!(user_id = %ctx.user_id, deal_id = %deal_id, ?action, count, "favorite toggled");

    Ok(Json(ApiResponse::new(
        req_id.0,
        ToggleData {
            deal_id,
            action,
            count,
        },
    )))
}

pub(super) async fn remove_favorites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Json<RemoveFavoritesBody>, JsonRejection>,
) -> Result<Json<ApiResponse<RemoveData>>, ApiError> {
    let ctx = user_context(&headers, &req_id.0)?;
    let Json(body) = body.map_err(|r| map_rejection(&req_id.0, r.body_text()))?;
    let removed = state.favorites.remove_many(&ctx, &body.deal_ids);
    let count = state.favorites.count(&ctx);

    Ok(Json(ApiResponse::new(req_id.0, RemoveData { removed, count })))
}
