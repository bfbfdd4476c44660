// Router tests against the in-memory store
//
// Each test builds the full app with a scripted suggester and drives it
// in-process with `oneshot`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use memorylane_api::{build_app, AppConfig, DiskMediaStore, StorageBackend, TimelineService};
use memorylane_core::{MilestonePolicy, MilestoneTrigger, ScriptedSuggester};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "memorylane-test-boundary";

/// Minimal multipart/form-data encoder
#[derive(Default)]
struct Form {
    body: Vec<u8>,
}

impl Form {
    fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn into_request(mut self) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri("/events")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

fn event_form(title: &str, timeline_id: Option<&str>) -> Form {
    let form = Form::default()
        .text("title", title)
        .text("description", "")
        .text("date", "2024-06-01")
        .text("privacy", "friends");
    match timeline_id {
        Some(id) => form.text("timelineId", id),
        None => form,
    }
}

struct TestApp {
    router: Router,
    suggester: Arc<ScriptedSuggester>,
    uploads: TempDir,
}

impl TestApp {
    async fn new(suggester: ScriptedSuggester, trigger: MilestoneTrigger) -> Self {
        Self::with_config(
            suggester,
            AppConfig {
                milestone: trigger,
                ..Default::default()
            },
        )
        .await
    }

    /// Build the app with `config`, pointing its upload dir at a fresh temp dir
    async fn with_config(suggester: ScriptedSuggester, mut config: AppConfig) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        config.upload_dir = uploads.path().to_path_buf();

        let media = DiskMediaStore::create(&config.upload_dir).await.unwrap();
        let suggester = Arc::new(suggester);
        let service = Arc::new(TimelineService::new(
            Arc::new(StorageBackend::in_memory()),
            Arc::new(media),
            suggester.clone(),
            config.milestone,
        ));

        Self {
            router: build_app(service, &config),
            suggester,
            uploads,
        }
    }

    fn stored_upload_count(&self) -> usize {
        std::fs::read_dir(self.uploads.path()).unwrap().count()
    }

    async fn default_app() -> Self {
        Self::new(
            ScriptedSuggester::always("First Job Offer"),
            MilestoneTrigger::default(),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn create(&self, form: Form) -> (StatusCode, Value) {
        self.send_json(form.into_request()).await
    }

    async fn list(&self, timeline_id: &str) -> Vec<Value> {
        let (status, body) = self
            .send_json(
                Request::builder()
                    .uri(format!("/events/{timeline_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().unwrap().clone()
    }

    async fn update(&self, id: &str, body: Value) -> (StatusCode, Value) {
        self.send_json(
            Request::builder()
                .method("PUT")
                .uri(format!("/events/{id}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn delete(&self, id: &str) -> (StatusCode, Value) {
        self.send_json(
            Request::builder()
                .method("DELETE")
                .uri(format!("/events/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::default_app().await;
    let (status, body) = app
        .send_json(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_three_events_produce_a_milestone() {
    let app = TestApp::default_app().await;

    for title in ["Trip", "Dinner"] {
        let (status, body) = app.create(event_form(title, Some("abc12345"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": "Event added", "timelineId": "abc12345"})
        );
    }

    let (status, body) = app
        .create(event_form("Graduation", Some("abc12345")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timelineId"], "abc12345");
    assert_eq!(body["milestone"]["status"], "suggested");
    assert_eq!(body["milestone"]["event"]["title"], "First Job Offer");

    let events = app.list("abc12345").await;
    assert_eq!(events.len(), 4);
    let titles: Vec<&str> = events.iter().map(|e| e["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Trip", "Dinner", "Graduation", "First Job Offer"]);

    assert_eq!(events[0]["privacy"], "friends");
    assert_eq!(events[0]["suggested"], false);
    assert_eq!(events[0]["date"], "2024-06-01T00:00:00Z");

    let suggested = &events[3];
    assert_eq!(suggested["suggested"], true);
    assert_eq!(suggested["privacy"], "private");
    assert_eq!(suggested["description"], "AI Suggested Event");
    assert_eq!(suggested["media"], json!([]));
    assert_eq!(suggested["timelineId"], "abc12345");

    assert_eq!(
        app.suggester.calls(),
        vec![vec![
            "Trip".to_string(),
            "Dinner".to_string(),
            "Graduation".to_string()
        ]]
    );
}

#[tokio::test]
async fn test_generated_timeline_id_is_reusable() {
    let app = TestApp::default_app().await;

    let (status, body) = app.create(event_form("Trip", None)).await;
    assert_eq!(status, StatusCode::OK);
    let timeline_id = body["timelineId"].as_str().unwrap().to_string();
    assert_eq!(timeline_id.len(), 8);

    let (_, body) = app.create(event_form("Dinner", Some(&timeline_id))).await;
    assert_eq!(body["timelineId"], timeline_id.as_str());
    assert_eq!(app.list(&timeline_id).await.len(), 2);
}

#[tokio::test]
async fn test_unknown_timeline_is_empty() {
    let app = TestApp::default_app().await;
    assert!(app.list("nope1234").await.is_empty());
}

#[tokio::test]
async fn test_every_event_policy_suggests_again() {
    let app = TestApp::default_app().await;
    for title in ["Trip", "Dinner", "Graduation", "Wedding"] {
        app.create(event_form(title, Some("abc12345"))).await;
    }

    let calls = app.suggester.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1],
        vec!["Trip", "Dinner", "Graduation", "First Job Offer", "Wedding"]
    );
    assert_eq!(app.list("abc12345").await.len(), 6);
}

#[tokio::test]
async fn test_once_per_timeline_policy_suggests_once() {
    let app = TestApp::new(
        ScriptedSuggester::always("First Job Offer"),
        MilestoneTrigger::new(MilestonePolicy::OncePerTimeline, 3),
    )
    .await;

    for title in ["Trip", "Dinner", "Graduation", "Wedding", "Move"] {
        let (status, _) = app.create(event_form(title, Some("abc12345"))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let events = app.list("abc12345").await;
    assert_eq!(events.len(), 6);
    assert_eq!(events.iter().filter(|e| e["suggested"] == true).count(), 1);
    assert_eq!(app.suggester.call_count(), 1);
}

#[tokio::test]
async fn test_failed_suggestion_still_adds_event() {
    let app = TestApp::new(
        ScriptedSuggester::failing("OpenAI API error (503): unavailable"),
        MilestoneTrigger::default(),
    )
    .await;

    for title in ["Trip", "Dinner"] {
        app.create(event_form(title, Some("abc12345"))).await;
    }
    let (status, body) = app
        .create(event_form("Graduation", Some("abc12345")))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event added");
    assert_eq!(body["milestone"]["status"], "failed");
    assert!(body["milestone"]["error"]
        .as_str()
        .unwrap()
        .contains("503"));

    let events = app.list("abc12345").await;
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e["suggested"] == false));
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let app = TestApp::default_app().await;

    let cases = [
        Form::default()
            .text("date", "2024-06-01")
            .text("timelineId", "abc12345"),
        Form::default()
            .text("title", "   ")
            .text("date", "2024-06-01")
            .text("timelineId", "abc12345"),
        Form::default()
            .text("title", "Trip")
            .text("date", "someday")
            .text("timelineId", "abc12345"),
        Form::default()
            .text("title", "Trip")
            .text("date", "2024-06-01")
            .text("privacy", "everyone")
            .text("timelineId", "abc12345"),
        Form::default()
            .text("title", "Trip")
            .text("date", "2024-06-01")
            .text("timelineId", &"x".repeat(65)),
    ];

    for form in cases {
        let (status, body) = app.create(form).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    assert!(app.list("abc12345").await.is_empty());
    assert_eq!(app.suggester.call_count(), 0);
}

#[tokio::test]
async fn test_media_is_stored_and_served() {
    let app = TestApp::default_app().await;

    let form = event_form("Trip", Some("abc12345"))
        .file("media", "beach day.jpg", "image/jpeg", b"jpeg-bytes")
        .file("media", "waves.mp4", "video/mp4", b"mp4-bytes");
    let (status, _) = app.create(form).await;
    assert_eq!(status, StatusCode::OK);

    let events = app.list("abc12345").await;
    let media = events[0]["media"].as_array().unwrap();
    assert_eq!(media.len(), 2);
    assert_eq!(media[0]["type"], "photo");
    assert_eq!(media[1]["type"], "video");

    let url = media[0]["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with("-beach_day.jpg"));

    let (status, bytes) = app
        .send(Request::builder().uri(url).body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"jpeg-bytes");
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let app = TestApp::with_config(
        ScriptedSuggester::always("First Job Offer"),
        AppConfig {
            max_upload_bytes: 1024,
            ..Default::default()
        },
    )
    .await;

    let form = event_form("Trip", Some("abc12345")).file(
        "media",
        "big.jpg",
        "image/jpeg",
        &vec![0u8; 4096],
    );
    let (status, _) = app.send(form.into_request()).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.stored_upload_count(), 0);
    assert!(app.list("abc12345").await.is_empty());

    // Small requests still go through under the same limit
    let (status, _) = app.create(event_form("Trip", Some("abc12345"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.list("abc12345").await.len(), 1);
}

#[tokio::test]
async fn test_update_event() {
    let app = TestApp::default_app().await;
    let form = event_form("Trip", Some("abc12345")).file(
        "media",
        "a.png",
        "image/png",
        b"png",
    );
    app.create(form).await;
    let original = app.list("abc12345").await.remove(0);
    let id = original["id"].as_str().unwrap();

    let (status, updated) = app
        .update(
            id,
            json!({
                "title": "Road Trip",
                "privacy": "public",
                "suggested": true,
                "timelineId": "other123"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Road Trip");
    assert_eq!(updated["privacy"], "public");
    assert_eq!(updated["date"], original["date"]);
    assert_eq!(updated["media"], original["media"]);
    assert_eq!(updated["suggested"], false);
    assert_eq!(updated["timelineId"], "abc12345");

    let events = app.list("abc12345").await;
    assert_eq!(events[0]["title"], "Road Trip");
}

#[tokio::test]
async fn test_update_missing_event_returns_null() {
    let app = TestApp::default_app().await;

    let (status, body) = app
        .update(
            "0190a6d2-0000-7000-8000-000000000000",
            json!({"title": "Nothing"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (status, body) = app.update("not-an-id", json!({"title": "Nothing"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_update_rejects_invalid_privacy() {
    let app = TestApp::default_app().await;
    app.create(event_form("Trip", Some("abc12345"))).await;
    let id = app.list("abc12345").await[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = app.update(&id, json!({"privacy": "secret"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("secret"));
}

#[tokio::test]
async fn test_delete_event() {
    let app = TestApp::default_app().await;
    app.create(event_form("Trip", Some("abc12345"))).await;
    let id = app.list("abc12345").await[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = app.delete(&id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Event deleted"}));
    assert!(app.list("abc12345").await.is_empty());

    // Deleting again, or an id that never existed, still succeeds
    let (status, body) = app.delete(&id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted");

    let (status, _) = app.delete("not-an-id").await;
    assert_eq!(status, StatusCode::OK);
}
