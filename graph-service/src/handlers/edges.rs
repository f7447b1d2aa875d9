use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use graph_core::AppError;
use graph_data::{AuditContext, EdgeFilter};
use graph_engine::dto::{CreateEdgeRequest, DeleteEdgeResult, EdgeListResponse, UpdateEdgeRequest};
use graph_security::{Level, Principal};

use crate::auth_gate::require_level;
use crate::extract::{client_audit, RequestContext};
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct EdgeListQuery {
    #[serde(rename = "type")]
    pub relationship_type: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<u32>,
}

impl From<EdgeListQuery> for EdgeFilter {
    fn from(query: EdgeListQuery) -> Self {
        let mut filter = EdgeFilter::new();
        filter.relationship_type = query.relationship_type;
        filter.from_node = query.from;
        filter.to_node = query.to;
        if let Some(limit) = query.limit {
            filter.limit = limit;
        }
        filter
    }
}

pub async fn get_edge(
    State(state): State<AppState>,
    principal: Principal,
    Path((org_id, id)): Path<(String, String)>,
) -> Result<Json<graph_data::EdgeRecord>, AppError> {
    require_level(&principal, &org_id, Level::Read)?;
    let edge = state.edge_service.get(&org_id, &id).await.map_err(AppError::from)?;
    Ok(Json(edge))
}

pub async fn list_edges(
    State(state): State<AppState>,
    principal: Principal,
    Path(org_id): Path<String>,
    Query(query): Query<EdgeListQuery>,
) -> Result<Json<EdgeListResponse>, AppError> {
    require_level(&principal, &org_id, Level::Read)?;
    let filter: EdgeFilter = query.into();
    let response = state.edge_service.list(&org_id, &filter).await.map_err(AppError::from)?;
    Ok(Json(response))
}

pub async fn create_edge(
    State(state): State<AppState>,
    principal: Principal,
    Path(org_id): Path<String>,
    ctx: RequestContext,
    Json(body): Json<CreateEdgeRequest>,
) -> Result<Json<graph_data::EdgeRecord>, AppError> {
    require_level(&principal, &org_id, Level::Write)?;
    let audit: AuditContext = client_audit(&principal, &ctx);
    let edge = state
        .edge_service
        .create(&org_id, body, &audit)
        .await
        .map_err(AppError::from)?;
    Ok(Json(edge))
}

pub async fn update_edge(
    State(state): State<AppState>,
    principal: Principal,
    Path((org_id, id)): Path<(String, String)>,
    ctx: RequestContext,
    Json(body): Json<UpdateEdgeRequest>,
) -> Result<Json<graph_data::EdgeRecord>, AppError> {
    require_level(&principal, &org_id, Level::Write)?;
    let audit: AuditContext = client_audit(&principal, &ctx);
    let edge = state
        .edge_service
        .update(&org_id, &id, body, &audit)
        .await
        .map_err(AppError::from)?;
    Ok(Json(edge))
}

pub async fn delete_edge(
    State(state): State<AppState>,
    principal: Principal,
    Path((org_id, id)): Path<(String, String)>,
) -> Result<Json<DeleteEdgeResult>, AppError> {
    require_level(&principal, &org_id, Level::Write)?;
    let result = state.edge_service.delete(&org_id, &id).await.map_err(AppError::from)?;
    Ok(Json(result))
}
