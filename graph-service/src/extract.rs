use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use std::convert::Infallible;
use std::net::SocketAddr;

use graph_data::AuditContext;
use graph_security::Principal;

/// Request-transport provenance (source IP, user-agent), extracted alongside
/// the authenticated [`Principal`] to stamp audit fields per SPEC_FULL.md
/// §3.2(5) / §4.1's "derived request carrying ... source-ip, user-agent".
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let client_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        let user_agent = parts
            .headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(RequestContext { client_ip, user_agent })
    }
}

pub fn client_audit(principal: &Principal, ctx: &RequestContext) -> AuditContext {
    AuditContext {
        principal_id: principal.sub.clone(),
        user_agent: ctx.user_agent.clone(),
        client_ip: ctx.client_ip.clone(),
    }
}
