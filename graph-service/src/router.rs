use std::sync::Arc;

use axum::http::Method;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use graph_core::{health_routes, request_id_middleware, HealthState};
use graph_oidc::OidcState;

use crate::handlers::{edges, nodes, orgs, query, snapshot, traverse};
use crate::state::AppState;

/// Assembles the full route table from SPEC_FULL.md §6.1, merging the
/// standalone OIDC callback sub-router built with its own `OidcState`.
/// Grounded on `r2e-oidc::oidc_routes`'s pattern of building a type-erased
/// `Router` (`with_state` applied, so the outer router's state type does not
/// need to encompass it) and `.merge()`-ing it into the application router.
pub fn build_router(
    state: AppState,
    oidc_state: Arc<OidcState>,
    health_state: Arc<HealthState>,
    cors_allowed_origins: Option<&str>,
) -> Router {
    let oidc_router = Router::new()
        .route("/auth/callback", get(graph_oidc::callback))
        .with_state(oidc_state);

    let api_router = Router::new()
        .route("/orgs", get(orgs::list_orgs))
        .route("/{org}/nodes", get(nodes::list_nodes).post(nodes::create_node))
        .route(
            "/{org}/nodes/{id}",
            get(nodes::get_node).put(nodes::update_node).delete(nodes::delete_node),
        )
        .route("/{org}/edges", get(edges::list_edges))
        .route("/{org}/edge", post(edges::create_edge))
        .route(
            "/{org}/edge/{id}",
            get(edges::get_edge)
                .put(edges::update_edge)
                .patch(edges::update_edge)
                .delete(edges::delete_edge),
        )
        .route("/{org}/query", post(query::run_query))
        .route("/{org}/traverse", post(traverse::run_traverse))
        .route("/{org}/metadata/export", get(snapshot::export))
        .route("/{org}/metadata/import", post(snapshot::import))
        .with_state(state);

    let cors = match cors_allowed_origins {
        Some(origins) => {
            let parsed = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect::<Vec<_>>();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
                .allow_credentials(true)
        }
        None => CorsLayer::permissive(),
    };

    Router::new()
        .merge(health_routes(health_state))
        .merge(oidc_router)
        .merge(api_router)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(request_id_middleware))
}
