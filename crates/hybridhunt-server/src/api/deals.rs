use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use hybridhunt_core::{query_raw, QueryResult, RawFilterCriteria};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{
    map_engine_error, map_rejection, sort_or_default, ApiError, ApiResponse, AppState,
};

/// Filter and sort parameters shared by the deal and favorites listings.
#[derive(Debug, Default, Deserialize)]
pub(super) struct DealsQuery {
    #[serde(flatten)]
    pub criteria: RawFilterCriteria,
    pub sort: Option<String>,
}

pub(super) async fn list_deals(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<DealsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<QueryResult>>, ApiError> {
    let Query(query) = query.map_err(|r| map_rejection(&req_id.0, r.body_text()))?;
    let sort = sort_or_default(query.sort, &state.config);
    let result = query_raw(state.catalog.records(), query.criteria, &sort)
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, result)))
}
