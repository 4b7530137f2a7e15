use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use hybridhunt_core::{resolve_shared, QueryResult, ShareLink};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_rejection, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SharedQuery {
    pub ids: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SharedData {
    sharer: String,
    #[serde(flatten)]
    result: QueryResult,
}

pub(super) async fn get_shared(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<SharedQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<SharedData>>, ApiError> {
    let Query(query) = query.map_err(|r| map_rejection(&req_id.0, r.body_text()))?;
    let link = ShareLink::from_parts(query.ids.as_deref().unwrap_or_default(), query.user.as_deref())
        .map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.to_string()))?;

    let result = resolve_shared(state.catalog.as_ref(), &link, state.config.share_max_ids);

    Ok(Json(ApiResponse::new(
        req_id.0,
        SharedData {
            sharer: link.sharer,
            result,
        },
    )))
}
