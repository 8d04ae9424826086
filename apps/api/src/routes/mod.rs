pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::cv::handlers as cv;
use crate::cv::models::{EducationEntry, Entry, ExperienceEntry, ProjectEntry};
use crate::preview::handlers as preview;
use crate::state::AppState;
use crate::wizard::handlers as wizard;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(wizard::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(wizard::handle_get_session).delete(wizard::handle_delete_session),
        )
        // Wizard navigation
        .route("/api/v1/sessions/:id/wizard", get(wizard::handle_get_wizard))
        .route(
            "/api/v1/sessions/:id/wizard/next",
            post(wizard::handle_wizard_next),
        )
        .route(
            "/api/v1/sessions/:id/wizard/previous",
            post(wizard::handle_wizard_previous),
        )
        .route(
            "/api/v1/sessions/:id/wizard/go-to",
            post(wizard::handle_wizard_go_to),
        )
        // Job description + keywords
        .route(
            "/api/v1/sessions/:id/job-description",
            put(cv::handle_set_job_description),
        )
        .route("/api/v1/sessions/:id/keywords", get(cv::handle_get_keywords))
        .route(
            "/api/v1/sessions/:id/keywords/analyze",
            post(cv::handle_analyze_keywords),
        )
        // Fixed sections
        .route(
            "/api/v1/sessions/:id/personal-info",
            patch(cv::handle_update_personal_info),
        )
        .route("/api/v1/sessions/:id/summary", put(cv::handle_update_summary))
        .route("/api/v1/sessions/:id/skills", patch(cv::handle_update_skills))
        .route(
            "/api/v1/sessions/:id/additional",
            patch(cv::handle_update_additional),
        )
        // Repeatable sections
        .merge(entry_routes::<EducationEntry>())
        .merge(entry_routes::<ExperienceEntry>())
        .merge(entry_routes::<ProjectEntry>())
        // Preview + export
        .route("/api/v1/sessions/:id/preview", get(preview::handle_get_preview))
        .route(
            "/api/v1/sessions/:id/preview/toggle",
            post(preview::handle_toggle_preview),
        )
        .route("/api/v1/sessions/:id/export", get(preview::handle_export))
        .with_state(state)
}

/// The same four endpoints for every repeatable section, mounted under its name.
fn entry_routes<T: Entry>() -> Router<AppState> {
    let base = format!("/api/v1/sessions/:id/{}", T::SECTION.as_str());
    Router::new()
        .route(
            &format!("{base}/entries"),
            get(cv::handle_list_entries::<T>).post(cv::handle_append_entry::<T>),
        )
        .route(
            &format!("{base}/entries/:index"),
            patch(cv::handle_update_entry::<T>).delete(cv::handle_remove_entry::<T>),
        )
        .route(&format!("{base}/import"), post(cv::handle_import_entries::<T>))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    struct Reply {
        status: StatusCode,
        headers: axum::http::HeaderMap,
        body: Vec<u8>,
    }

    impl Reply {
        fn json(&self) -> Value {
            if self.body.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&self.body).unwrap()
            }
        }

        fn text(&self) -> String {
            String::from_utf8(self.body.clone()).unwrap()
        }
    }

    fn app() -> Router {
        build_router(AppState::new(Config::default()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Reply {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        send_request(app, request).await
    }

    async fn send_request(app: &Router, request: Request<Body>) -> Reply {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        Reply {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    async fn new_session(app: &Router) -> String {
        let reply = send(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(reply.status, StatusCode::CREATED);
        reply.json()["sessionId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let reply = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()["status"], "ok");
        assert_eq!(reply.json()["activeSessions"], 0);
    }

    #[tokio::test]
    async fn test_create_session_returns_blank_snapshot() {
        let app = app();
        let reply = send(&app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(reply.status, StatusCode::CREATED);
        let body = reply.json();
        assert_eq!(body["wizard"]["currentIndex"], 0);
        assert_eq!(body["wizard"]["totalSteps"], 9);
        assert_eq!(body["wizard"]["progressPercent"], 11);
        assert_eq!(body["document"]["education"].as_array().unwrap().len(), 1);
        assert_eq!(body["keywords"], json!([]));
        assert_eq!(body["hints"], Value::Null);
    }

    fn snake_case_keys(value: &Value, path: &str, found: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let here = format!("{path}.{key}");
                    if key.contains('_') {
                        found.push(here.clone());
                    }
                    snake_case_keys(child, &here, found);
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    snake_case_keys(child, &format!("{path}[{i}]"), found);
                }
            }
            _ => {}
        }
    }

    #[tokio::test]
    async fn test_every_response_key_is_camel_case() {
        let app = app();
        let id = new_session(&app).await;
        send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/job-description"),
            Some(json!({"text": "python, teamwork, leadership"})),
        )
        .await;
        send(&app, Method::POST, &format!("/api/v1/sessions/{id}/keywords/analyze"), None).await;
        send(
            &app,
            Method::PATCH,
            &format!("/api/v1/sessions/{id}/education/entries/0"),
            Some(json!({"field": "relevantModules", "value": "Statistics"})),
        )
        .await;

        let mut found = Vec::new();
        for uri in [
            format!("/api/v1/sessions/{id}"),
            format!("/api/v1/sessions/{id}/wizard"),
            format!("/api/v1/sessions/{id}/preview"),
            format!("/api/v1/sessions/{id}/education/entries"),
            format!("/api/v1/sessions/{id}/export?format=json"),
            "/health".to_string(),
        ] {
            let reply = send(&app, Method::GET, &uri, None).await;
            assert_eq!(reply.status, StatusCode::OK, "{uri}");
            snake_case_keys(&reply.json(), &uri, &mut found);
        }
        let reply = send(&app, Method::POST, &format!("/api/v1/sessions/{id}/preview/toggle"), None).await;
        snake_case_keys(&reply.json(), "toggle", &mut found);

        assert!(found.is_empty(), "snake_case keys in responses: {found:?}");

        let snapshot = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await.json();
        assert_eq!(snapshot["sessionId"], id.as_str());
        assert_eq!(snapshot["previewVisible"], true);
        assert_eq!(snapshot["document"]["education"][0]["relevantModules"], "Statistics");
        assert_eq!(snapshot["hints"]["softSkills"], json!(["teamwork", "leadership"]));
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let reply = send(&app(), Method::GET, &uri, None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.json()["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_keywords_are_stale_until_analyzed() {
        let app = app();
        let id = new_session(&app).await;

        let reply = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/job-description"),
            Some(json!({"text": "I need Python and teamwork"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK);

        let reply = send(&app, Method::GET, &format!("/api/v1/sessions/{id}/keywords"), None).await;
        assert_eq!(reply.json()["keywords"], json!([]));

        let reply = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/keywords/analyze"),
            None,
        )
        .await;
        let body = reply.json();
        assert_eq!(body["keywords"], json!(["teamwork", "python"]));
        assert_eq!(body["hints"]["technicalSkills"], json!(["python"]));
        assert_eq!(body["hints"]["softSkills"], json!(["teamwork"]));
    }

    #[tokio::test]
    async fn test_fixed_section_updates_reach_preview() {
        let app = app();
        let id = new_session(&app).await;

        let reply = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/sessions/{id}/personal-info"),
            Some(json!({"field": "fullName", "value": "Ada Lovelace"})),
        )
        .await;
        assert_eq!(reply.json()["fullName"], "Ada Lovelace");

        send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/summary"),
            Some(json!({"value": "Analytical graduate"})),
        )
        .await;
        send(
            &app,
            Method::PATCH,
            &format!("/api/v1/sessions/{id}/skills"),
            Some(json!({"field": "soft", "value": "Communication"})),
        )
        .await;

        let preview = send(&app, Method::GET, &format!("/api/v1/sessions/{id}/preview"), None)
            .await
            .json();
        assert_eq!(preview["header"]["name"], "Ada Lovelace");
        assert_eq!(preview["summary"]["status"], "present");
        assert_eq!(preview["skills"]["content"]["soft"], "Communication");
        assert_eq!(preview["additional"]["status"], "absent");
    }

    #[tokio::test]
    async fn test_unknown_field_name_is_rejected() {
        let app = app();
        let id = new_session(&app).await;
        let reply = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/sessions/{id}/skills"),
            Some(json!({"field": "juggling", "value": "yes"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_entry_lifecycle_keeps_one_entry() {
        let app = app();
        let id = new_session(&app).await;
        let entries = format!("/api/v1/sessions/{id}/education/entries");

        let reply = send(
            &app,
            Method::PATCH,
            &format!("{entries}/0"),
            Some(json!({"field": "institution", "value": "X"})),
        )
        .await;
        assert_eq!(reply.json()["canRemove"], false);

        let reply = send(&app, Method::POST, &entries, None).await;
        let body = reply.json();
        assert_eq!(body["section"], "education");
        assert_eq!(body["entries"].as_array().unwrap().len(), 2);
        assert_eq!(body["canRemove"], true);

        let preview = send(&app, Method::GET, &format!("/api/v1/sessions/{id}/preview"), None)
            .await
            .json();
        assert_eq!(preview["education"]["content"].as_array().unwrap().len(), 2);

        let reply = send(&app, Method::DELETE, &format!("{entries}/5"), None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.json()["error"]["code"], "VALIDATION_ERROR");

        let reply = send(&app, Method::DELETE, &format!("{entries}/1"), None).await;
        assert_eq!(reply.json()["entries"].as_array().unwrap().len(), 1);

        let reply = send(&app, Method::DELETE, &format!("{entries}/0"), None).await;
        let body = reply.json();
        assert_eq!(body["entries"].as_array().unwrap().len(), 1);
        assert_eq!(body["entries"][0]["institution"], "");
    }

    #[tokio::test]
    async fn test_wizard_navigation_clamps() {
        let app = app();
        let id = new_session(&app).await;
        let base = format!("/api/v1/sessions/{id}/wizard");

        let reply = send(&app, Method::POST, &format!("{base}/previous"), None).await;
        assert_eq!(reply.json()["currentIndex"], 0);

        let reply = send(&app, Method::POST, &format!("{base}/next"), None).await;
        assert_eq!(reply.json()["step"]["title"], "Personal Information");

        let reply = send(
            &app,
            Method::POST,
            &format!("{base}/go-to"),
            Some(json!({"index": 99})),
        )
        .await;
        let body = reply.json();
        assert_eq!(body["currentIndex"], 8);
        assert_eq!(body["progressPercent"], 100);
        assert_eq!(body["canGoForward"], false);

        let reply = send(&app, Method::POST, &format!("{base}/next"), None).await;
        assert_eq!(reply.json()["currentIndex"], 8);
    }

    #[tokio::test]
    async fn test_csv_import_fills_section() {
        let app = app();
        let id = new_session(&app).await;
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/v1/sessions/{id}/experience/import"))
            .header(header::CONTENT_TYPE, "text/csv")
            .body(Body::from(
                "organisation,title,startDate,endDate\nAcme Ltd,Intern,Jun 2023,Aug 2023\nBeta plc,Volunteer,,\n",
            ))
            .unwrap();
        let body = send_request(&app, request).await.json();
        assert_eq!(body["imported"], 2);
        assert_eq!(body["entries"][0]["organisation"], "Acme Ltd");
        assert_eq!(body["entries"].as_array().unwrap().len(), 2);

        let preview = send(&app, Method::GET, &format!("/api/v1/sessions/{id}/preview"), None)
            .await
            .json();
        let experience = &preview["experience"]["content"];
        assert_eq!(experience[0]["dates"]["start"], "Jun 2023");
        assert_eq!(experience[1]["dates"], Value::Null);
    }

    #[tokio::test]
    async fn test_export_formats() {
        let app = app();
        let id = new_session(&app).await;
        send(
            &app,
            Method::PATCH,
            &format!("/api/v1/sessions/{id}/personal-info"),
            Some(json!({"field": "fullName", "value": "Ada Lovelace"})),
        )
        .await;
        let export = format!("/api/v1/sessions/{id}/export");

        let reply = send(&app, Method::GET, &export, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        let body = reply.json();
        assert_eq!(body["document"]["personalInfo"]["fullName"], "Ada Lovelace");
        assert_eq!(body["preview"]["header"]["name"], "Ada Lovelace");

        let reply = send(&app, Method::GET, &format!("{export}?format=text"), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"cv.txt\""
        );
        assert_eq!(reply.text(), "Ada Lovelace\n");

        let reply = send(&app, Method::GET, &format!("{export}?format=pdf"), None).await;
        assert_eq!(reply.status, StatusCode::NOT_IMPLEMENTED);

        let reply = send(&app, Method::GET, &format!("{export}?format=docx"), None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preview_toggle_and_session_delete() {
        let app = app();
        let id = new_session(&app).await;

        let reply = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/preview/toggle"),
            None,
        )
        .await;
        assert_eq!(reply.json()["previewVisible"], true);

        let reply = send(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(reply.status, StatusCode::NO_CONTENT);

        let reply = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_session_capacity_is_enforced() {
        let config = Config {
            max_sessions: 1,
            ..Config::default()
        };
        let app = build_router(AppState::new(config));
        new_session(&app).await;
        let reply = send(&app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(reply.json()["error"]["code"], "CAPACITY_EXCEEDED");
    }
}
