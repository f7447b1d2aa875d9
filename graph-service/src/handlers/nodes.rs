use axum::extract::{Path, Query, State};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use graph_core::AppError;
use graph_data::{AuditContext, NodeFilter, SortOrder};
use graph_engine::dto::{CreateNodeRequest, UpdateNodeRequest};
use graph_security::{Level, Principal};

use crate::auth_gate::require_level;
use crate::extract::{client_audit, RequestContext};
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct NodeListQuery {
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl From<NodeListQuery> for NodeFilter {
    fn from(query: NodeListQuery) -> Self {
        let mut filter = NodeFilter::new();
        filter.node_type = query.node_type;
        filter.created_by = query.created_by;
        filter.updated_by = query.updated_by;
        if let Some(page) = query.page {
            filter.page = page;
        }
        if let Some(limit) = query.limit {
            filter.limit = limit;
        }
        if let Some(sort_by) = query.sort_by {
            filter.sort_by = sort_by;
        }
        if let Some(order) = query.sort_order {
            filter.sort_order = match order.to_ascii_uppercase().as_str() {
                "ASC" => SortOrder::Asc,
                _ => SortOrder::Desc,
            };
        }
        filter
    }
}

pub async fn get_node(
    State(state): State<AppState>,
    principal: Principal,
    Path((org_id, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    require_level(&principal, &org_id, Level::Read)?;
    let (node, cache_status) = state.node_service.get(&org_id, &id).await.map_err(AppError::from)?;
    let mut response = Json(node).into_response();
    response
        .headers_mut()
        .insert("X-Node-Cache", HeaderValue::from_static(cache_status.header_value()));
    Ok(response)
}

pub async fn list_nodes(
    State(state): State<AppState>,
    principal: Principal,
    Path(org_id): Path<String>,
    Query(query): Query<NodeListQuery>,
) -> Result<Json<graph_engine::dto::NodeListResponse>, AppError> {
    require_level(&principal, &org_id, Level::Read)?;
    let filter: NodeFilter = query.into();
    let response = state.node_service.list(&org_id, &filter).await.map_err(AppError::from)?;
    Ok(Json(response))
}

pub async fn create_node(
    State(state): State<AppState>,
    principal: Principal,
    Path(org_id): Path<String>,
    ctx: RequestContext,
    Json(body): Json<CreateNodeRequest>,
) -> Result<Json<graph_data::NodeRecord>, AppError> {
    require_level(&principal, &org_id, Level::Write)?;
    let audit: AuditContext = client_audit(&principal, &ctx);
    let node = state
        .node_service
        .create(&org_id, body, &audit)
        .await
        .map_err(AppError::from)?;
    Ok(Json(node))
}

pub async fn update_node(
    State(state): State<AppState>,
    principal: Principal,
    Path((org_id, id)): Path<(String, String)>,
    ctx: RequestContext,
    Json(body): Json<UpdateNodeRequest>,
) -> Result<Json<graph_data::NodeRecord>, AppError> {
    require_level(&principal, &org_id, Level::Write)?;
    let audit: AuditContext = client_audit(&principal, &ctx);
    let node = state
        .node_service
        .update(&org_id, &id, body, &audit)
        .await
        .map_err(AppError::from)?;
    Ok(Json(node))
}

pub async fn delete_node(
    State(state): State<AppState>,
    principal: Principal,
    Path((org_id, id)): Path<(String, String)>,
) -> Result<Json<graph_engine::dto::DeleteNodeResult>, AppError> {
    require_level(&principal, &org_id, Level::Write)?;
    let result = state.node_service.delete(&org_id, &id).await.map_err(AppError::from)?;
    Ok(Json(result))
}
