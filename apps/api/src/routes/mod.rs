pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::interviews::handlers;
use crate::users::handlers as users;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interviews API
        .route(
            "/api/v1/interviews",
            get(handlers::handle_list_interviews).post(handlers::handle_create_interview),
        )
        .route(
            "/api/v1/interviews/:id",
            get(handlers::handle_get_interview).put(handlers::handle_update_interview),
        )
        .route(
            "/api/v1/interviews/:id/feedback",
            post(handlers::handle_submit_feedback).get(handlers::handle_get_feedback),
        )
        // Users API
        .route(
            "/api/v1/users/me",
            put(users::handle_sign_in).get(users::handle_get_me),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::USER_ID_HEADER;
    use crate::llm_client::testing::ScriptedService;
    use crate::llm_client::LlmClient;
    use crate::store::MemoryDocumentStore;

    const QUESTIONS: &str = "```json\n[{\"question\": \"What is a goroutine?\", \"answer\": \"A lightweight thread managed by the Go runtime.\"}]\n```";
    const SCORE: &str = "[{\"score\": 72, \"feedback\": \"Mention the scheduler.\"}]";

    fn app() -> Router {
        let service = ScriptedService::new(|prompt| {
            let reply = if prompt.contains("Candidate Answer:") {
                SCORE
            } else {
                QUESTIONS
            };
            (Duration::ZERO, Ok(reply.to_string()))
        });
        build_router(AppState {
            store: Arc::new(MemoryDocumentStore::new()),
            llm: LlmClient::with_service(service),
        })
    }

    fn request(method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user);
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn valid_request() -> Value {
        json!({
            "position": "Backend Engineer",
            "description": "Design and operate Go services",
            "experience": "3",
            "techStack": "Go, PostgreSQL"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), request("GET", "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "mockprep-api");
        assert_eq!(body["store"], "memory");
        assert_eq!(body["model"], "gemini-2.0-flash-exp");
    }

    #[tokio::test]
    async fn test_interviews_require_identity() {
        let app = app();
        let (status, body) = send(
            &app,
            request("POST", "/api/v1/interviews", None, Some(valid_request())),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (status, _) = send(&app, request("GET", "/api/v1/interviews", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_then_fetch_interview() {
        let app = app();
        let (status, created) = send(
            &app,
            request("POST", "/api/v1/interviews", Some("user_1"), Some(valid_request())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["userId"], "user_1");
        assert_eq!(created["experience"], 3.0);
        assert_eq!(created["questions"][0]["question"], "What is a goroutine?");

        let id = created["id"].as_str().unwrap();
        let uri = format!("/api/v1/interviews/{id}");
        let (status, fetched) = send(&app, request("GET", &uri, Some("user_1"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, _) = send(&app, request("GET", &uri, Some("user_2"), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, list) =
            send(&app, request("GET", "/api/v1/interviews", Some("user_1"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["interviews"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_request_is_bad_request() {
        let mut body = valid_request();
        body["experience"] = json!(-1);
        body["position"] = json!("   ");
        let (status, response) = send(
            &app(),
            request("POST", "/api/v1/interviews", Some("user_1"), Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
        let message = response["error"]["message"].as_str().unwrap();
        assert!(message.contains("Position is required"));
        assert!(message.contains("Experience cannot be empty or negative"));
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let app = app();
        let (_, created) = send(
            &app,
            request("POST", "/api/v1/interviews", Some("user_1"), Some(valid_request())),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let mut changed = valid_request();
        changed["position"] = json!("Platform Engineer");
        let (status, updated) = send(
            &app,
            request("PUT", &format!("/api/v1/interviews/{id}"), Some("user_1"), Some(changed)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["createdAt"], created["createdAt"]);
        assert_eq!(updated["position"], "Platform Engineer");
        assert!(updated.get("updatedAt").is_some());
    }

    #[tokio::test]
    async fn test_unknown_interview_is_not_found() {
        let (status, body) = send(
            &app(),
            request("GET", "/api/v1/interviews/missing", Some("user_1"), None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_feedback_flow() {
        let app = app();
        let (_, created) = send(
            &app,
            request("POST", "/api/v1/interviews", Some("user_1"), Some(valid_request())),
        )
        .await;
        let uri = format!("/api/v1/interviews/{}/feedback", created["id"].as_str().unwrap());

        let (status, _) = send(&app, request("GET", &uri, Some("user_1"), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let answers = json!({"answers": ["A green thread scheduled by Go."]});
        let (status, feedback) =
            send(&app, request("POST", &uri, Some("user_1"), Some(answers))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(feedback["scores"][0]["score"], 72);
        assert_eq!(feedback["overallScore"], 72.0);

        let (status, stored) = send(&app, request("GET", &uri, Some("user_1"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored, feedback);

        let again = json!({"answers": ["A second attempt."]});
        let (status, body) = send(&app, request("POST", &uri, Some("user_1"), Some(again))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        let (_, unchanged) = send(&app, request("GET", &uri, Some("user_1"), None)).await;
        assert_eq!(unchanged, feedback);
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_shape() {
        let mut body = valid_request();
        body["experience"] = json!("five");
        let (status, response) = send(
            &app(),
            request("POST", "/api/v1/interviews", Some("user_1"), Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
        assert!(response["error"]["message"]
            .as_str()
            .unwrap()
            .contains("expected a number"));
    }

    #[tokio::test]
    async fn test_sign_in_creates_user_once() {
        let app = app();
        let profile = json!({"fullName": "Ada Lovelace", "email": "ada@example.com"});

        let (status, created) = send(
            &app,
            request("PUT", "/api/v1/users/me", Some("user_1"), Some(profile)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Ada Lovelace");

        let (status, again) = send(
            &app,
            request("PUT", "/api/v1/users/me", Some("user_1"), Some(json!({}))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again, created);

        let (status, me) = send(&app, request("GET", "/api/v1/users/me", Some("user_1"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me, created);

        let (status, _) = send(&app, request("GET", "/api/v1/users/me", Some("user_2"), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_feedback_answer_count_mismatch_is_bad_request() {
        let app = app();
        let (_, created) = send(
            &app,
            request("POST", "/api/v1/interviews", Some("user_1"), Some(valid_request())),
        )
        .await;
        let uri = format!("/api/v1/interviews/{}/feedback", created["id"].as_str().unwrap());
        let (status, _) = send(
            &app,
            request("POST", &uri, Some("user_1"), Some(json!({"answers": ["one", "two"]}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
