use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method as HttpMethod, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};
use tracing::warn;
use triad_gate::{Method, RawQuery, RequestBody, RequestContext};

use crate::auth::Credentials;
use crate::router::AppState;

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Hands every other request to the access pipeline.
pub async fn dispatch(
    State(state): State<AppState>,
    method: HttpMethod,
    uri: Uri,
    headers: HeaderMap,
    query: Result<Query<BTreeMap<String, String>>, QueryRejection>,
    body: Bytes,
) -> Response {
    let session = match state
        .sessions
        .authenticate(&Credentials::from_headers(&headers))
        .await
    {
        Ok(session) => session,
        Err(err) => {
            warn!(error = %err, "session lookup failed");
            return err.into_response();
        }
    };

    let query = match query {
        Ok(Query(params)) => RawQuery::Params(params),
        Err(rejection) => RawQuery::Malformed(rejection.body_text()),
    };

    let mut ctx = RequestContext::new(Method::parse(method.as_str()), uri.path())
        .with_query(query)
        .with_body(RequestBody::from_bytes(&body))
        .with_session(session);

    let reply = state.pipeline.handle(&mut ctx).await;
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply.body)).into_response()
}
