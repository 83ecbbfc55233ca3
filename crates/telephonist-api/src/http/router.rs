//! Axum router configuration with middleware.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the relay router with request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::talk::talk).delete(handlers::talk::hang_up),
        )
        .route("/ping", get(handlers::ping::ping))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use secrecy::SecretString;
    use serde_json::Value;
    use tower::ServiceExt;

    use telephonist_core::session::registry::SessionRegistry;
    use telephonist_infra::llm::mistral::MistralClient;
    use telephonist_infra::sqlite::dialog::SqliteDialogStore;
    use telephonist_infra::translate::YandexTranslator;
    use telephonist_types::config::TelephonistConfig;
    use telephonist_types::message::Message;
    use telephonist_types::session::Session;

    fn test_state() -> AppState {
        let llm = MistralClient::new("mistral-small-latest", Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let translator = YandexTranslator::new(
            SecretString::from("k".to_string()),
            "folder",
            "de",
            "ru",
            Duration::from_secs(1),
        )
        .unwrap()
        .with_base_url("http://127.0.0.1:9");

        AppState::with_parts(
            llm,
            translator,
            SqliteDialogStore::dry_run(),
            TelephonistConfig::default(),
        )
    }

    fn json_request(method: Method, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn ping_pongs() {
        let response = build_router(test_state())
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "pong");
    }

    #[tokio::test]
    async fn talk_with_missing_fields_is_bad_request() {
        let response = build_router(test_state())
            .oneshot(json_request(Method::POST, r#"{"input": "Hallo"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["status"], "EMPTY_USER_ID\nEMPTY_KEY");
    }

    #[tokio::test]
    async fn talk_with_garbage_body_is_wrong_format() {
        let response = build_router(test_state())
            .oneshot(json_request(Method::POST, "not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["status"], "WRONG_BODY_FORMAT");
    }

    #[tokio::test]
    async fn hang_up_without_session_is_ok_without_id() {
        let response = build_router(test_state())
            .oneshot(json_request(Method::DELETE, r#"{"user_id": 7}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "OK");
        assert!(body.get("dialog_id").is_none());
    }

    #[tokio::test]
    async fn hang_up_removes_live_session() {
        let state = test_state();
        let mut session = Session::new("7", "persona");
        session.messages.push(Message::user("Hallo"));
        session.messages.push(Message::assistant("Hallo!"));
        state.engine.registry().store("7", session);

        let response = build_router(state.clone())
            .oneshot(json_request(Method::DELETE, r#"{"user_id": "7"}"#))
            .await
            .unwrap();

        // Dry-run store: archived without an id.
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await.get("dialog_id").is_none());
        assert!(state.engine.registry().is_empty());
    }

    #[tokio::test]
    async fn hang_up_without_user_id_is_bad_request() {
        let response = build_router(test_state())
            .oneshot(json_request(Method::DELETE, "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["status"], "EMPTY_USER_ID");
    }
}
