//! Integration tests for the Gemini provider and the search flow.
//!
//! Each test spins up an Axum stub of the `generateContent` endpoint on a
//! random port and points the rig-backed provider from `create_provider` at it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Json, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use mentor_match::error::LlmError;
use mentor_match::generation::{GeneratorConfig, MentorGenerator, PHOTO_POOL};
use mentor_match::llm::{
    ChatMessage, CompletionRequest, LlmBackend, LlmConfig, LlmProvider, create_provider,
};
use mentor_match::model::{
    BudgetRange, DayOfWeek, ExperienceLevel, Industry, Language, LearningGoal, TimeSlot,
};
use mentor_match::wizard::{Action, SearchForm, Step, WizardManager};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A request as the stub saw it: path segment, API key, JSON body.
type Seen = (String, Option<String>, Value);

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: Value,
    seen: Arc<Mutex<Vec<Seen>>>,
}

async fn generate_content(
    State(stub): State<Stub>,
    Path(model_action): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    // Gemini accepts the key either as a header or as a query parameter.
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .or_else(|| query.get("key").cloned());
    stub.seen.lock().unwrap().push((model_action, key, body));
    (stub.status, Json(stub.body.clone()))
}

/// Start the stub on a random port, return (base url, recorded requests).
async fn start_stub(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let stub = Stub {
        status,
        body,
        seen: Arc::clone(&seen),
    };
    let app = Router::new()
        .route("/v1beta/models/{model_action}", post(generate_content))
        .with_state(stub);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{port}"), seen)
}

fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {
            "promptTokenCount": 900,
            "candidatesTokenCount": 2100,
            "totalTokenCount": 3000
        },
        "modelVersion": "stub-model",
        "responseId": "stub-response"
    })
}

fn google_error(code: u16, status: &str, details: Value) -> Value {
    json!({
        "error": {
            "code": code,
            "message": "stubbed failure",
            "status": status,
            "details": details
        }
    })
}

fn mentor_items(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "id": format!("g-{i}"),
                "name": format!("Mentor {i}"),
                "role": "Head of Product",
                "company": "Notion",
                "industry": "Fintech",
                "bio": "Builds teams. Ships products. Mentors PMs.",
                "successStories": ["Story A", "Story B"],
                "mentoringStyle": ["Candid", "Structured", "Warm"],
                "rating": 4.8,
                "sessionCount": 150,
                "languages": ["English"],
                "hourlyRate": "$90",
                "avatar": PHOTO_POOL[0],
                "availability": ["Monday", "Wednesday"],
                "timeSlots": ["10:00 AM"]
            })
        })
        .collect()
}

fn provider(base: &str) -> Arc<dyn LlmProvider> {
    let config = LlmConfig {
        backend: LlmBackend::Gemini,
        api_key: SecretString::from("test-key"),
        model: "stub-model".to_string(),
        api_base: base.to_string(),
    };
    create_provider(&config).unwrap()
}

fn search_form() -> SearchForm {
    let mut form = SearchForm {
        industry: Some(Industry::SaaS),
        experience_level: Some(ExperienceLevel::Intermediate),
        language: Some(Language::English),
        budget: Some(BudgetRange::Mid),
        ..Default::default()
    };
    form.toggle_day(DayOfWeek::Monday);
    form.toggle_day(DayOfWeek::Wednesday);
    form.toggle_slot(TimeSlot::TenAm);
    form
}

async fn manager_on_search(base: &str) -> WizardManager {
    let generator = MentorGenerator::new(provider(base), GeneratorConfig::default());
    let manager = WizardManager::new(Arc::new(generator));
    manager.dispatch(Action::SubmitName("Ada".into())).await.unwrap();
    manager
        .dispatch(Action::SelectGoal(LearningGoal::SkillMastery))
        .await
        .unwrap();
    manager
}

// ── Provider ─────────────────────────────────────────────────────────

#[tokio::test]
async fn provider_sends_key_model_and_schema() {
    timeout(TEST_TIMEOUT, async {
        let (base, seen) = start_stub(StatusCode::OK, gemini_reply("[]")).await;

        let request = CompletionRequest::new(vec![ChatMessage::user("hello")])
            .with_json_schema(json!({ "type": "ARRAY" }));
        let response = provider(&base).complete(request).await.unwrap();
        assert_eq!(response.content, "[]");
        assert_eq!(response.input_tokens, 900);
        assert_eq!(response.output_tokens, 2100);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (path, key, body) = &seen[0];
        assert_eq!(path, "stub-model:generateContent");
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unauthorized_maps_to_auth_failed() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_stub(
            StatusCode::UNAUTHORIZED,
            google_error(401, "UNAUTHENTICATED", json!([])),
        )
        .await;

        let err = provider(&base)
            .complete(CompletionRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::AuthFailed { .. }), "{err}");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn too_many_requests_carries_retry_delay() {
    timeout(TEST_TIMEOUT, async {
        let details = json!([{
            "@type": "type.googleapis.com/google.rpc.RetryInfo",
            "retryDelay": "7s"
        }]);
        let (base, _) = start_stub(
            StatusCode::TOO_MANY_REQUESTS,
            google_error(429, "RESOURCE_EXHAUSTED", details),
        )
        .await;

        let err = provider(&base)
            .complete(CompletionRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap_err();
        match err {
            LlmError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Some(Duration::from_secs(7)));
            }
            other => panic!("expected rate limit, got {other}"),
        }
    })
    .await
    .expect("test timed out");
}

// ── Search flow ──────────────────────────────────────────────────────

#[tokio::test]
async fn search_through_gemini_repairs_payload() {
    timeout(TEST_TIMEOUT, async {
        let mut items = mentor_items(6);
        items[2]["avatar"] = json!("http://not-secure.example.com/p.jpg");
        items[4].as_object_mut().unwrap().remove("id");
        let text = Value::Array(items).to_string();
        let (base, seen) = start_stub(StatusCode::OK, gemini_reply(&text)).await;

        let manager = manager_on_search(&base).await;
        assert_eq!(manager.search(search_form()).await, Ok(6));

        let state = manager.snapshot().await;
        assert_eq!(state.step, Step::Recommendations);
        assert!(!state.is_loading);
        assert_eq!(state.mentors.len(), 6);
        assert!(state.mentors.iter().all(|m| m.industry == Industry::SaaS));
        assert!(state.mentors.iter().all(|m| m.avatar.starts_with("https://")));
        assert_eq!(state.mentors[2].avatar, PHOTO_POOL[2]);
        assert_eq!(state.mentors[4].id, "m-4");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "exactly one generation call per search");
        let prompt = seen[0].2["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Skill Mastery"));
        assert!(prompt.contains("Monday, Wednesday"));
        let schema = &seen[0].2["generationConfig"]["responseSchema"];
        assert_eq!(schema["items"]["required"].as_array().unwrap().len(), 14);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn server_error_leaves_empty_recommendations() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_stub(
            StatusCode::INTERNAL_SERVER_ERROR,
            google_error(500, "INTERNAL", json!([])),
        )
        .await;

        let manager = manager_on_search(&base).await;
        assert_eq!(manager.search(search_form()).await, Ok(0));

        let state = manager.snapshot().await;
        assert_eq!(state.step, Step::Recommendations);
        assert!(state.mentors.is_empty());
        assert!(!state.is_loading);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unreachable_service_leaves_empty_recommendations() {
    timeout(TEST_TIMEOUT, async {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let manager = manager_on_search(&format!("http://127.0.0.1:{port}")).await;
        assert_eq!(manager.search(search_form()).await, Ok(0));
        assert!(!manager.snapshot().await.is_loading);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn book_after_search() {
    timeout(TEST_TIMEOUT, async {
        let text = Value::Array(mentor_items(2)).to_string();
        let (base, _) = start_stub(StatusCode::OK, gemini_reply(&text)).await;

        let manager = manager_on_search(&base).await;
        manager.search(search_form()).await.unwrap();
        manager.dispatch(Action::SelectMentor("g-1".into())).await.unwrap();
        manager.confirm_booking().await.unwrap();
        manager.dispatch(Action::Reset).await.unwrap();

        let state = manager.snapshot().await;
        assert_eq!(state.step, Step::Welcome);
        assert!(state.selected_mentor.is_none());
        assert_eq!(state.sessions.len(), 1);
        assert_eq!(state.sessions[0].mentor.id, "g-1");
        assert_eq!(state.mentee_name.as_deref(), Some("Ada"));
    })
    .await
    .expect("test timed out");
}
