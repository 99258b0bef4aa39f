//! Exercises `AtlasClient` and `ResponseDriver` against an in-process axum
//! stand-in for the chat and settings backend.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;
use shared::{
    ApiError, AtlasClient, ChatSession, MessageKind, Sender, Settings,
    chat::{ERROR_REPLY_TEXT, ResponseDriver, SessionEvent},
    models::{ChatRequest, ChatResponse},
};
use url::Url;

#[derive(Default)]
struct FakeBackend {
    settings: Mutex<Settings>,
    chat_calls: AtomicUsize,
    settings_posts: AtomicUsize,
    fail_chat: AtomicBool,
    stall_chat: AtomicBool,
}

/// Longer than any client timeout used below.
const STALL: Duration = Duration::from_secs(5);
const SHORT_TIMEOUT: Duration = Duration::from_millis(200);

type Shared = Arc<FakeBackend>;

async fn chat(State(state): State<Shared>, Json(request): Json<ChatRequest>) -> Response {
    state.chat_calls.fetch_add(1, Ordering::SeqCst);
    if state.stall_chat.load(Ordering::SeqCst) {
        tokio::time::sleep(STALL).await;
    }
    if state.fail_chat.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "model offline" })),
        )
            .into_response();
    }
    Json(ChatResponse {
        response: format!("echo: {}", request.message),
    })
    .into_response()
}

async fn get_settings(State(state): State<Shared>) -> Json<Settings> {
    Json(state.settings.lock().unwrap().clone())
}

async fn save_settings(State(state): State<Shared>, Json(settings): Json<Settings>) -> StatusCode {
    state.settings_posts.fetch_add(1, Ordering::SeqCst);
    *state.settings.lock().unwrap() = settings;
    StatusCode::NO_CONTENT
}

async fn spawn_backend() -> (Url, Shared) {
    let state = Shared::default();
    let app = Router::new()
        .route("/api/chat", post(chat))
        .route("/api/settings", post(save_settings).get(get_settings))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{addr}")).unwrap(), state)
}

#[tokio::test]
async fn send_message_returns_backend_reply() {
    let (url, state) = spawn_backend().await;
    let client = AtlasClient::new(url);

    let reply = client.send_message("Hi").await.unwrap();

    assert_eq!(reply, "echo: Hi");
    assert_eq!(state.chat_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn error_status_carries_backend_detail() {
    let (url, state) = spawn_backend().await;
    state.fail_chat.store(true, Ordering::SeqCst);
    let client = AtlasClient::new(url);

    let error = client.send_message("Hi").await.unwrap_err();

    match &error {
        ApiError::Status { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "model offline");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(error.is_transient());
}

#[tokio::test]
async fn settings_round_trip() {
    let (url, state) = spawn_backend().await;
    let client = AtlasClient::new(url);

    assert_eq!(client.fetch_settings().await.unwrap(), Settings::default());

    let updated = Settings {
        max_tokens: 1000,
        model_temperature: 0.2,
        ..Settings::default()
    };
    client.save_settings(&updated).await.unwrap();

    assert_eq!(state.settings_posts.load(Ordering::SeqCst), 1);
    assert_eq!(client.fetch_settings().await.unwrap(), updated);
}

#[tokio::test]
async fn invalid_settings_never_reach_the_backend() {
    let (url, state) = spawn_backend().await;
    let client = AtlasClient::new(url);
    let settings = Settings {
        max_tokens: 50,
        ..Settings::default()
    };

    let error = client.save_settings(&settings).await.unwrap_err();

    assert!(error.is_validation());
    assert_eq!(error.to_string(), "Max tokens must be between 100 and 4000");
    assert_eq!(state.settings_posts.load(Ordering::SeqCst), 0);
    assert_eq!(*state.settings.lock().unwrap(), Settings::default());
}

#[tokio::test]
async fn driver_threads_backend_replies() {
    let (url, _state) = spawn_backend().await;
    let (mut driver, mut events) =
        ResponseDriver::new(ChatSession::new(), Arc::new(AtlasClient::new(url)));

    let pending = driver.submit("ping", None).await.unwrap();
    let Some(SessionEvent::Replied { message, .. }) = events.recv().await else {
        panic!("expected a reply");
    };

    assert_eq!(message.text(), "echo: ping");
    assert_eq!(message.sender(), Sender::Agent);
    assert_eq!(message.parent_id(), Some(pending.message_id));
    driver.shutdown().await;
}

#[tokio::test]
async fn driver_turns_backend_failure_into_error_message() {
    let (url, state) = spawn_backend().await;
    state.fail_chat.store(true, Ordering::SeqCst);
    let (mut driver, mut events) =
        ResponseDriver::new(ChatSession::new(), Arc::new(AtlasClient::new(url)));
    let session = driver.session();

    driver.submit("ping", None).await.unwrap();
    let Some(SessionEvent::Replied { message, .. }) = events.recv().await else {
        panic!("expected an error reply");
    };

    assert_eq!(message.kind(), MessageKind::Error);
    assert_eq!(message.text(), ERROR_REPLY_TEXT);
    driver.wait_idle().await;
    assert_eq!(session.lock().await.store().len(), 2);
}

/// Address that refuses connections: bound once, then released.
async fn closed_port() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}")).unwrap()
}

#[tokio::test]
async fn slow_backend_times_out_as_transient_error() {
    let (url, state) = spawn_backend().await;
    state.stall_chat.store(true, Ordering::SeqCst);
    let client = AtlasClient::with_timeout(url, SHORT_TIMEOUT).unwrap();

    let error = client.send_message("Hi").await.unwrap_err();

    let ApiError::Request(inner) = &error else {
        panic!("expected a transport error, got {error:?}");
    };
    assert!(inner.is_timeout());
    assert!(error.is_transient());
}

#[tokio::test]
async fn driver_turns_timeout_into_error_reply_under_the_user_message() {
    let (url, state) = spawn_backend().await;
    state.stall_chat.store(true, Ordering::SeqCst);
    let client = AtlasClient::with_timeout(url, SHORT_TIMEOUT).unwrap();
    let mut session = ChatSession::new();
    let thread = session.submit("first", None).unwrap();
    session.complete(&thread, Ok("answer".to_string()));
    let (mut driver, mut events) = ResponseDriver::new(session, Arc::new(client));

    let pending = driver.submit("follow-up", Some(thread.message_id)).await.unwrap();
    let Some(SessionEvent::Replied { request_id, message }) = events.recv().await else {
        panic!("expected an error reply");
    };

    assert_eq!(request_id, pending.request_id);
    assert_eq!(message.kind(), MessageKind::Error);
    assert_eq!(message.text(), ERROR_REPLY_TEXT);
    assert_eq!(message.parent_id(), Some(thread.message_id));

    driver.wait_idle().await;
    let shared = driver.session();
    let session = shared.lock().await;
    assert!(!session.is_awaiting_reply());
    let replies: Vec<&str> = session.store().roots()[0]
        .replies()
        .iter()
        .map(|reply| reply.text())
        .collect();
    assert_eq!(replies, ["answer", "follow-up", ERROR_REPLY_TEXT]);
}

#[tokio::test]
async fn driver_turns_refused_connection_into_error_reply() {
    let client = AtlasClient::with_timeout(closed_port().await, SHORT_TIMEOUT).unwrap();
    let (mut driver, mut events) = ResponseDriver::new(ChatSession::new(), Arc::new(client));

    let pending = driver.submit("anyone there?", None).await.unwrap();
    let Some(SessionEvent::Replied { message, .. }) = events.recv().await else {
        panic!("expected an error reply");
    };

    assert!(message.is_error());
    assert_eq!(message.sender(), Sender::Agent);
    assert_eq!(message.parent_id(), Some(pending.message_id));
    driver.shutdown().await;
}
