//! HTTP server for triad.
//!
//! Every request except the health check is handed to the access pipeline
//! unchanged: the method, raw path, query string, body and the session
//! established from the bearer token. The pipeline's reply becomes the
//! response.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use auth::{AnonymousSessions, Credentials, SessionProvider, StaticTokenSessions};
pub use config::{ServerConfig, SessionsConfig};
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::TriadServer;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    const TOKEN: &str = "ada-token";

    fn app() -> Router {
        let mut config = ServerConfig::default();
        config.sessions.tokens.insert(TOKEN.into(), "ada".into());
        TriadServer::new(config).router().unwrap()
    }

    fn request(method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };
        builder.body(body).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = send(&app(), request("GET", "/_health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn restricted_path() {
        let app = app();
        for method in ["GET", "DELETE", "PATCH"] {
            let req = request(method, "/core/authorization_token/t1", None, Some(TOKEN));
            let (status, body) = send(&app, req).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["message"], "That operation is restricted");
        }
    }

    #[tokio::test]
    async fn create_read_update_delete() {
        let app = app();

        let req = request("POST", "/app/note", Some(json!({"title": "hi"})), Some(TOKEN));
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        let id = body.as_str().unwrap().to_string();

        let (status, body) =
            send(&app, request("GET", &format!("/app/note/{id}"), None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "hi");
        assert_eq!(body["$"]["id"], id.as_str());

        let req = request("PUT", &format!("/app/note/{id}"), Some(json!({"title": "bye"})), Some(TOKEN));
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("Success"));

        let (_, body) =
            send(&app, request("GET", &format!("/app/note/{id}/data"), None, None)).await;
        assert_eq!(body, json!({"title": "bye"}));

        let req = request("DELETE", &format!("/app/note/{id}"), None, Some(TOKEN));
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            send(&app, request("GET", &format!("/app/note/{id}"), None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], format!("Item app/note/{id} not found"));
    }

    #[tokio::test]
    async fn mutation_without_valid_token() {
        let app = app();
        for token in [None, Some("wrong")] {
            let req = request("POST", "/app/note", Some(json!({})), token);
            let (status, body) = send(&app, req).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["message"], "You need to log in to do that");
        }
    }

    #[tokio::test]
    async fn list_with_query_string() {
        let app = app();
        for i in 0..4 {
            let req = request("POST", &format!("/app/note/n{i}"), Some(json!({"rank": i})), Some(TOKEN));
            send(&app, req).await;
        }

        let (status, body) = send(&app, request("GET", "/app/note?pageSize=3&sort=-rank", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 4);
        assert_eq!(body["pageSize"], 3);
        assert_eq!(body["hasNext"], true);
        assert_eq!(body["items"][0]["rank"], 3);

        let (status, _) = send(&app, request("GET", "/app/note?pageSize=0", None, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let req = Request::builder()
            .method("PUT")
            .uri("/app/note/n1")
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _) = send(&app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unrouted_requests() {
        let app = app();
        let (status, _) = send(&app, request("PATCH", "/app/note/n1", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(&app, request("PATCH", "/app/note/n1", None, Some(TOKEN))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No route for PATCH /app/note/n1");
    }

    #[tokio::test]
    async fn custom_session_provider() {
        let store = std::sync::Arc::new(triad_store::InMemoryStore::new());
        let mut state = AppState::from_config(&ServerConfig::default(), store).unwrap();
        state.sessions = std::sync::Arc::new(AnonymousSessions);
        let app = build_router(state);

        let req = request("POST", "/app/note", Some(json!({})), Some(TOKEN));
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
