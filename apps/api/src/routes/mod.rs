pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{analysis, business, catalog, community, gamification, matching, progress, search};

/// Headroom for multipart framing and the `email` field on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog
        .route(
            "/api/v1/standards",
            get(catalog::handlers::handle_list_standards),
        )
        .route(
            "/api/v1/standards/:code",
            get(catalog::handlers::handle_get_standard),
        )
        .route(
            "/api/v1/search/suggestions",
            get(search::handlers::handle_suggestions),
        )
        // Learner progress
        .route(
            "/api/v1/progress",
            get(progress::handlers::handle_get_progress)
                .delete(progress::handlers::handle_clear_progress),
        )
        .route(
            "/api/v1/progress/enrollments",
            post(progress::handlers::handle_enroll),
        )
        .route(
            "/api/v1/progress/toggle",
            post(progress::handlers::handle_toggle_module),
        )
        .route(
            "/api/v1/gamification",
            get(gamification::handlers::handle_get_gamification),
        )
        .route("/api/v1/jobs", get(matching::handlers::handle_list_jobs))
        // Résumé analysis
        .route(
            "/api/v1/analysis",
            post(analysis::handlers::handle_analyze_text),
        )
        .route(
            "/api/v1/analysis/upload",
            post(analysis::handlers::handle_analyze_upload),
        )
        // Community
        .route(
            "/api/v1/community/posts",
            get(community::handlers::handle_list_posts)
                .post(community::handlers::handle_create_post),
        )
        .route(
            "/api/v1/community/posts/:id/like",
            post(community::handlers::handle_like_post),
        )
        // Business
        .route(
            "/api/v1/business/candidates/search",
            post(business::handlers::handle_search_candidates),
        )
        .route(
            "/api/v1/business/chat",
            post(business::handlers::handle_sales_chat),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use aws_sdk_s3::config::{BehaviorVersion, Region};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::build_router;
    use crate::analysis::intake::ResumeArchive;
    use crate::catalog::memory::InMemoryCatalog;
    use crate::config::Config;
    use crate::llm_client::LlmClient;
    use crate::models::catalog::{BadgeBenefitRow, JobOpening};
    use crate::progress::repository::InMemoryProgressRepository;
    use crate::progress::store::tests::make_standard;
    use crate::search::debounce::SuggestionSessions;
    use crate::state::AppState;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/portal".to_string(),
            redis_url: "redis://localhost".to_string(),
            s3_bucket: "resumes".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            anthropic_api_key: "test".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            search_debounce_ms: 0,
            llm_max_attempts: 1,
            max_upload_bytes: 1024,
        }
    }

    /// Nothing listens here, so every model call fails fast.
    const UNREACHABLE_LLM_URL: &str = "http://127.0.0.1:9/v1/messages";

    fn test_catalog() -> InMemoryCatalog {
        InMemoryCatalog::with_standards(vec![
            make_standard("EC0217.01", 2),
            make_standard("EC0301", 3),
        ])
    }

    fn test_app() -> Router {
        test_app_with(test_catalog())
    }

    fn test_app_with(catalog: InMemoryCatalog) -> Router {
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();

        build_router(AppState {
            catalog: Arc::new(catalog),
            learners: Arc::new(InMemoryProgressRepository::default()),
            resume_archive: ResumeArchive::new(
                aws_sdk_s3::Client::from_conf(s3_config),
                "resumes".to_string(),
            ),
            llm: LlmClient::new("test".to_string(), 1)
                .unwrap()
                .with_api_url(UNREACHABLE_LLM_URL),
            config: test_config(),
            suggestions: Arc::new(SuggestionSessions::new(Duration::ZERO)),
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "portal-api");
    }

    #[tokio::test]
    async fn test_standard_detail_and_missing_standard() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/api/v1/standards/EC0301", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["standard"]["code"], "EC0301");
        assert_eq!(body["related"][0]["code"], "EC0217.01");

        let (status, body) = send(&app, "GET", "/api/v1/standards/EC9999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_suggestions_without_client_id() {
        let app = test_app();
        let (status, body) =
            send(&app, "GET", "/api/v1/search/suggestions?q=ec0217", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["superseded"], false);
        assert_eq!(body["suggestions"][0]["code"], "EC0217.01");
    }

    #[tokio::test]
    async fn test_enroll_toggle_and_read_progress() {
        let app = test_app();
        let email = "ana@mail.com";

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/progress/enrollments",
            Some(json!({"email": email, "standard_code": "EC0217.01"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["percent"], 0);
        assert_eq!(body["modules"][0]["status"], "unlocked");
        assert_eq!(body["modules"][1]["status"], "locked");

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/progress/toggle",
            Some(json!({"email": email, "standard_code": "EC0217.01", "module_id": "m2"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/progress/toggle",
            Some(json!({"email": email, "standard_code": "EC0217.01", "module_id": "m1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["percent"], 50);

        let (status, body) =
            send(&app, "GET", "/api/v1/progress?email=ana@mail.com", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_completed_modules"], 1);

        let (status, _) = send(&app, "DELETE", "/api/v1/progress?email=ana@mail.com", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", "/api/v1/progress?email=ana@mail.com", None).await;
        assert_eq!(body["total_completed_modules"], 0);
    }

    #[tokio::test]
    async fn test_invalid_email_is_bad_request() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/progress/enrollments",
            Some(json!({"email": "nope", "standard_code": "EC0217.01"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_community_post_and_like() {
        let app = test_app();
        let (status, post) = send(
            &app,
            "POST",
            "/api/v1/community/posts",
            Some(json!({
                "author_name": "Ana",
                "author_email": "ana@mail.com",
                "content": "Certified in EC0217!",
                "standard_code": "EC0217.01"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let id = post["id"].as_str().unwrap();
        let (status, liked) =
            send(&app, "POST", &format!("/api/v1/community/posts/{id}/like"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(liked["likes"], 1);

        let (_, feed) = send(&app, "GET", "/api/v1/community/posts?q=certified", None).await;
        assert_eq!(feed.as_array().map(Vec::len), Some(1));

        let missing = uuid::Uuid::new_v4();
        let (status, _) =
            send(&app, "POST", &format!("/api/v1/community/posts/{missing}/like"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    fn job(title: &str, codes: &[&str]) -> JobOpening {
        JobOpening {
            id: uuid::Uuid::new_v4(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "CDMX".to_string(),
            description: String::new(),
            required_standard_codes: codes.iter().map(|c| c.to_string()).collect(),
        }
    }

    async fn enroll_and_complete_first(app: &Router, email: &str) {
        let (status, _) = send(
            app,
            "POST",
            "/api/v1/progress/enrollments",
            Some(json!({"email": email, "standard_code": "EC0217.01"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(
            app,
            "POST",
            "/api/v1/progress/toggle",
            Some(json!({"email": email, "standard_code": "EC0217.01", "module_id": "m1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_jobs_ranked_by_enrolled_standards() {
        let mut catalog = test_catalog();
        catalog.jobs = vec![
            job("Auditor", &["EC0301", "EC9999"]),
            job("Trainer", &["EC0217.01"]),
        ];
        let app = test_app_with(catalog);
        enroll_and_complete_first(&app, "ana@mail.com").await;

        let (status, body) = send(&app, "GET", "/api/v1/jobs?email=ana@mail.com", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enrolled_codes"], json!(["EC0217.01"]));
        assert_eq!(body["jobs"][0]["title"], "Trainer");
        assert_eq!(body["jobs"][0]["compatibility"]["percent"], 100);
        assert_eq!(body["jobs"][1]["title"], "Auditor");
        assert_eq!(body["jobs"][1]["compatibility"]["percent"], 0);
    }

    #[tokio::test]
    async fn test_gamification_reflects_completions_and_benefits() {
        let mut catalog = test_catalog();
        catalog.benefits = vec![BadgeBenefitRow {
            badge_id: "first-module".to_string(),
            discount_pct: 10,
            premium_access_days: 30,
            special_features: vec![],
        }];
        let app = test_app_with(catalog);
        enroll_and_complete_first(&app, "ana@mail.com").await;

        let (status, body) =
            send(&app, "GET", "/api/v1/gamification?email=ana@mail.com", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_completed_modules"], 1);
        assert_eq!(body["xp"], 100);
        assert_eq!(body["level"], 1);
        assert_eq!(body["current_streak"], 1);

        let badges = body["badges"].as_array().unwrap();
        let first = badges.iter().find(|b| b["id"] == "first-module").unwrap();
        assert_eq!(first["unlocked"], true);
        assert!(first["unlocked_at"].is_string());
        assert_eq!(first["benefit"]["discount_pct"], 10);
    }

    #[tokio::test]
    async fn test_failed_upload_analysis_is_not_archived_or_recorded() {
        let app = test_app();
        let boundary = "portal-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"email\"\r\n\r\n\
             ana@mail.com\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cv.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             Ten years training adults in workplace safety and compliance.\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analysis/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        // The archive client has no credentials; reaching it would surface as a 500.
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let (_, progress) = send(&app, "GET", "/api/v1/progress?email=ana@mail.com", None).await;
        assert!(progress["last_analysis"].is_null());
    }

    #[tokio::test]
    async fn test_empty_sales_chat_rejected_before_llm() {
        let app = test_app();
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/business/chat",
            Some(json!({"messages": []})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
