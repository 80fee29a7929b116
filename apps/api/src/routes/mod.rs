pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::cv::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document
        .route(
            "/api/v1/cv",
            get(handlers::handle_get_cv).put(handlers::handle_replace_cv),
        )
        .route("/api/v1/cv/reset", post(handlers::handle_reset))
        .route("/api/v1/cv/personal", put(handlers::handle_update_personal))
        .route(
            "/api/v1/cv/professional",
            put(handlers::handle_update_professional),
        )
        .route(
            "/api/v1/cv/experiences",
            post(handlers::handle_add_experience),
        )
        .route(
            "/api/v1/cv/experiences/:index",
            put(handlers::handle_update_experience).delete(handlers::handle_remove_experience),
        )
        .route("/api/v1/cv/educations", post(handlers::handle_add_education))
        .route(
            "/api/v1/cv/educations/:index",
            put(handlers::handle_update_education).delete(handlers::handle_remove_education),
        )
        .route("/api/v1/cv/skills/:bucket", post(handlers::handle_add_skill))
        .route(
            "/api/v1/cv/skills/:bucket/:index",
            put(handlers::handle_update_skill).delete(handlers::handle_remove_skill),
        )
        .route(
            "/api/v1/cv/additional",
            put(handlers::handle_update_additional),
        )
        .route(
            "/api/v1/cv/additional/:section",
            post(handlers::handle_add_additional_item),
        )
        .route(
            "/api/v1/cv/additional/:section/:index",
            delete(handlers::handle_remove_additional_item),
        )
        // Wizard navigation
        .route("/api/v1/wizard", get(handlers::handle_get_wizard))
        .route("/api/v1/wizard/next", post(handlers::handle_wizard_next))
        .route("/api/v1/wizard/back", post(handlers::handle_wizard_back))
        .route("/api/v1/wizard/step", put(handlers::handle_wizard_go_to))
        // Readiness, preview and export
        .route("/api/v1/cv/readiness", get(handlers::handle_readiness))
        .route("/api/v1/cv/preview", get(handlers::handle_preview))
        .route("/api/v1/cv/export", get(handlers::handle_export))
        .route(
            "/api/v1/documents/preview",
            post(handlers::handle_project_document),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::layout::default_page_config;

    fn app() -> Router {
        build_router(AppState::new(Config::default(), default_page_config()))
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(request(method, uri, body))
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    // ── health ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send_json(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "cv-builder");
    }

    // ── document editing ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_fresh_session_document() {
        let (status, body) = send_json(&app(), Method::GET, "/api/v1/cv", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["firstName"], "");
        assert_eq!(body["experiences"].as_array().unwrap().len(), 1);
        assert_eq!(body["educations"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_personal_and_professional_updates() {
        let app = app();
        send(
            &app,
            Method::PUT,
            "/api/v1/cv/personal",
            Some(json!({"firstName": "Anna Maria", "lastName": "Lopez"})),
        )
        .await;
        let (status, body) = send_json(
            &app,
            Method::PUT,
            "/api/v1/cv/professional",
            Some(json!({"jobTitle": "Engineer"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["firstName"], "Anna Maria");
        assert_eq!(body["jobTitle"], "Engineer");
    }

    #[tokio::test]
    async fn test_experience_lifecycle() {
        let app = app();
        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/v1/cv/experiences",
            Some(json!({"jobTitle": "Eng", "company": "Acme", "startDate": "2022-01", "current": true})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["index"], 1);

        let (status, _) = send(&app, Method::DELETE, "/api/v1/cv/experiences/0", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, doc) = send_json(&app, Method::GET, "/api/v1/cv", None).await;
        assert_eq!(doc["experiences"].as_array().unwrap().len(), 1);
        assert_eq!(doc["experiences"][0]["company"], "Acme");
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_not_found() {
        let (status, body) =
            send_json(&app(), Method::DELETE, "/api/v1/cv/educations/7", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_skills_routes() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/cv/skills/technical",
            Some(json!("Go")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/cv/skills/technical",
            Some(json!({"name": "Rust", "level": 9})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, doc) = send_json(&app, Method::GET, "/api/v1/cv", None).await;
        assert_eq!(
            doc["skills"]["technical"],
            json!(["Go", {"name": "Rust", "level": 5}])
        );

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/v1/cv/skills/magic",
            Some(json!("Juggling")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_additional_routes() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/cv/additional/languages",
            Some(json!({"name": "Spanish", "proficiency": "fluent"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, doc) = send_json(
            &app,
            Method::PUT,
            "/api/v1/cv/additional",
            Some(json!({"interests": "Chess"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["interests"], "Chess");
        assert_eq!(doc["additionalInfo"]["languages"][0]["name"], "Spanish");

        let (status, _) = send(&app, Method::DELETE, "/api/v1/cv/additional/hobbies/0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ── wizard ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_wizard_navigation() {
        let app = app();
        let (_, body) = send_json(&app, Method::POST, "/api/v1/wizard/next", None).await;
        assert_eq!(body["current"]["step"], "professional");
        assert_eq!(body["current"]["path"], "/professional-info");

        let (_, body) = send_json(
            &app,
            Method::PUT,
            "/api/v1/wizard/step",
            Some(json!({"step": "/cv-templates"})),
        )
        .await;
        assert_eq!(body["current"]["step"], "template");
        assert!(body["next"].is_null());

        let (_, body) = send_json(&app, Method::POST, "/api/v1/wizard/back", None).await;
        assert_eq!(body["current"]["step"], "additional-info");

        let (_, body) = send_json(&app, Method::POST, "/api/v1/cv/reset", None).await;
        assert_eq!(body["position"], 1);
    }

    // ── readiness / preview / export ────────────────────────────────────────

    #[tokio::test]
    async fn test_readiness_report() {
        let (status, body) = send_json(&app(), Method::GET, "/api/v1/cv/readiness", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sections"].as_array().unwrap().len(), 6);
        assert!(!body["warnings"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_preview_is_normalized() {
        let (status, body) = send_json(
            &app(),
            Method::GET,
            "/api/v1/cv/preview?skills=grouped",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["file_name"], "John_Doe_CV.pdf");
        let kinds: Vec<&str> = body["document"]["sections"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["kind"].as_str().unwrap())
            .collect();
        assert!(kinds.contains(&"experience"));
        assert!(kinds.contains(&"skills"));
    }

    #[tokio::test]
    async fn test_export_returns_pdf_attachment() {
        let app = app();
        send(
            &app,
            Method::PUT,
            "/api/v1/cv/personal",
            Some(json!({"firstName": "Anna Maria", "lastName": "Lopez"})),
        )
        .await;

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/v1/cv/export", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Anna_Maria_Lopez_CV.pdf\"; filename*=UTF-8''Anna_Maria_Lopez_CV.pdf"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn test_export_with_quote_or_control_character_in_name() {
        for first_name in ["Ann\"a", "Ann\u{1}a"] {
            let app = app();
            send(
                &app,
                Method::PUT,
                "/api/v1/cv/personal",
                Some(json!({"firstName": first_name, "lastName": "Lopez"})),
            )
            .await;

            let response = app
                .clone()
                .oneshot(request(Method::GET, "/api/v1/cv/export", None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers()[header::CONTENT_DISPOSITION],
                "attachment; filename=\"Anna_Lopez_CV.pdf\"; filename*=UTF-8''Anna_Lopez_CV.pdf"
            );
        }
    }

    #[tokio::test]
    async fn test_stateless_projection() {
        let app = app();
        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/v1/documents/preview",
            Some(json!({"firstName": "Ada", "professionalSummary": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sections"].as_array().unwrap().len(), 1);

        let (_, body) =
            send_json(&app, Method::POST, "/api/v1/documents/preview", Some(json!(null))).await;
        assert_eq!(body["sections"][0]["kind"], "no_data");

        let (_, body) = send_json(
            &app,
            Method::POST,
            "/api/v1/documents/preview?normalize=true",
            Some(json!(null)),
        )
        .await;
        assert_eq!(body["title"], "John Doe");
    }
}
