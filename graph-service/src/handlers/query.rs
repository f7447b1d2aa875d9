use axum::extract::{Path, State};
use axum::Json;

use graph_core::AppError;
use graph_engine::dto::{QueryRequest, QueryResponse};
use graph_security::{Level, Principal};

use crate::auth_gate::require_level;
use crate::state::AppState;

pub async fn run_query(
    State(state): State<AppState>,
    principal: Principal,
    Path(org_id): Path<String>,
    Json(body): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    require_level(&principal, &org_id, Level::Read)?;
    let response = state.query_service.run(&org_id, body).await.map_err(AppError::from)?;
    Ok(Json(response))
}
