use axum::extract::{Path, State};
use axum::Json;

use graph_core::AppError;
use graph_data::AuditContext;
use graph_engine::dto::{ImportRequest, ImportResponse};
use graph_security::{Level, Principal};

use crate::auth_gate::require_level;
use crate::extract::{client_audit, RequestContext};
use crate::state::AppState;

pub async fn export(
    State(state): State<AppState>,
    principal: Principal,
    Path(org_id): Path<String>,
) -> Result<Json<graph_data::Snapshot>, AppError> {
    require_level(&principal, &org_id, Level::Read)?;
    let snapshot = state.snapshot_service.export(&org_id).await.map_err(AppError::from)?;

    if let Err(e) = state
        .snapshot_store
        .put_export(&org_id, snapshot.timestamp, snapshot.nodes.len(), snapshot.edges.len(), &snapshot)
        .await
    {
        tracing::warn!(org_id = %org_id, error = %e, "failed to persist export to snapshot store");
    }

    Ok(Json(snapshot))
}

pub async fn import(
    State(state): State<AppState>,
    principal: Principal,
    Path(org_id): Path<String>,
    ctx: RequestContext,
    Json(body): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, AppError> {
    require_level(&principal, &org_id, Level::Write)?;
    let audit: AuditContext = client_audit(&principal, &ctx);
    let timestamp = chrono::Utc::now();
    let (imported_nodes, imported_edges) = state
        .snapshot_service
        .import(&org_id, body, &audit)
        .await
        .map_err(AppError::from)?;

    Ok(Json(ImportResponse {
        org_id,
        imported_nodes,
        imported_edges,
        timestamp,
        imported_by: principal.sub,
    }))
}
