//! HTTP adapter
//!
//! Every HTTP request falls through to one axum handler that builds a
//! [`Request`], picks the caller's identity and runs it through the [`App`].
//! Authentication happens upstream; this adapter trusts the identity headers.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response as HttpResponse},
    Router,
};
use seill_acl::Identity;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::payload::{build_payload, PayloadSources};
use crate::request::Request;
use crate::response::HttpReply;
use crate::service::App;

/// Request ID header name
pub const X_REQUEST_ID: &str = "x-request-id";

/// User pool of an external identity
pub const X_USER_POOL: &str = "x-user-pool";

/// Username of an external identity
pub const X_USERNAME: &str = "x-username";

/// Member id of the caller
pub const X_MEMBER_ID: &str = "x-member-id";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<App>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(app: App, config: ServerConfig) -> Self {
        Self {
            app: Arc::new(app),
            config: Arc::new(config),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResponse {
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4)
        .to_string();

    let body = String::from_utf8_lossy(&body);
    let cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");

    let payload = build_payload(&PayloadSources {
        stage_variables: &state.config.stage_variables,
        body: &body,
        query: uri.query(),
        cookie: (!cookie.is_empty()).then_some(cookie.as_str()),
    });

    let mut request = Request::new(state.config.stage.clone(), request_id.clone(), payload);
    if let Some(identity) = identity_for(&state.config, &headers) {
        request = request.with_identity(identity);
    }

    let reply = state.app.execute(&method, uri.path(), request).await;
    into_http(reply, &request_id)
}

/// Local mode identity, or an external identity from the trusted headers
fn identity_for(config: &ServerConfig, headers: &HeaderMap) -> Option<Identity> {
    if config.local {
        return Some(ServerConfig::local_identity());
    }

    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let identity = Identity::external(header(X_USER_POOL)?, header(X_USERNAME)?);

    Some(match header(X_MEMBER_ID) {
        Some(member_id) => identity.with_member_id(member_id),
        None => identity,
    })
}

fn into_http(reply: HttpReply, request_id: &str) -> HttpResponse {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Body::from(reply.body)).into_response();

    let headers = response.headers_mut();
    for (name, value) in reply.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!("Dropping invalid response header {}", name),
        }
    }
    if let Ok(value) = HeaderValue::from_str(request_id) {
        headers.insert(X_REQUEST_ID, value);
    }

    response
}
