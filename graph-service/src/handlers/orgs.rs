use axum::Json;
use serde::Serialize;

use graph_security::Principal;

#[derive(Debug, Serialize)]
pub struct OrgsResponse {
    pub orgs: Vec<String>,
}

/// `GET /orgs`, per SPEC_FULL.md §6.1: session-cookie-authenticated, returns
/// the distinct orgs the principal holds any scope for.
pub async fn list_orgs(principal: Principal) -> Json<OrgsResponse> {
    Json(OrgsResponse {
        orgs: principal.held_orgs(),
    })
}
