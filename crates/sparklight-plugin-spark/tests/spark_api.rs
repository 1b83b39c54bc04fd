use std::net::SocketAddr;
use std::sync::{
    Arc,
    Mutex,
};
use std::time::Duration;

use axum::http::{
    HeaderMap,
    Method,
    StatusCode,
    Uri,
};
use axum::extract::State;
use axum::Router;
use sparklight_plugin_api::{
    AccessToken,
    BuildOutcome,
    BuildResult,
    DeviceId,
    NotificationResult,
    Notifier,
    ValidationResult,
};
use sparklight_plugin_spark::{
    SparkOptions,
    SparkPlugin,
};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: Method,
    path: String,
    authorization: Option<String>,
    accept: Option<String>,
    content_type: Option<String>,
    body: String,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    delay: Duration,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn record(
    State(state): State<StubState>, method: Method, uri: Uri, headers: HeaderMap, body: String,
) -> StatusCode {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        authorization: header("authorization"),
        accept: header("accept"),
        content_type: header("content-type"),
        body,
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    state.status
}

async fn spawn_stub(status: StatusCode, delay: Duration) -> (String, Arc<Mutex<Vec<RecordedRequest>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        status,
        delay,
        requests: Arc::clone(&requests),
    };
    let app = Router::new().fallback(record).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1"), requests)
}

async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn plugin_for(base_url: &str) -> SparkPlugin {
    SparkPlugin::new(SparkOptions {
        api_base_url: base_url.to_string(),
        ..SparkOptions::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_notify_sends_single_form_post() {
    let (base_url, requests) = spawn_stub(StatusCode::OK, Duration::ZERO).await;
    let plugin = plugin_for(&base_url);

    let result = plugin
        .notify(
            &BuildOutcome::new("blue").unwrap(),
            &DeviceId::new("abc123").unwrap(),
            &AccessToken::new("tok1"),
        )
        .await;

    assert_eq!(result, NotificationResult::Status(200));
    assert!(result.is_success());

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/v1/devices/abc123/notify");
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok1"));
    assert_eq!(request.accept.as_deref(), Some("*/*"));
    assert_eq!(
        request.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(request.body, "args=blue");
}

#[tokio::test]
async fn test_notify_maps_build_result_to_color() {
    let (base_url, requests) = spawn_stub(StatusCode::OK, Duration::ZERO).await;
    let plugin = plugin_for(&base_url);
    let device = DeviceId::new("abc123").unwrap();
    let token = AccessToken::new("tok1");

    plugin
        .notify(&BuildResult::Failure.into(), &device, &token)
        .await;
    plugin
        .notify(&BuildResult::Unstable.into(), &device, &token)
        .await;

    let bodies: Vec<String> = requests
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.body.clone())
        .collect();
    assert_eq!(bodies, vec!["args=red", "args=yellow"]);
}

#[tokio::test]
async fn test_notify_reports_non_ok_status() {
    let (base_url, _requests) = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR, Duration::ZERO).await;
    let plugin = plugin_for(&base_url);

    let result = plugin
        .notify(
            &BuildOutcome::new("red").unwrap(),
            &DeviceId::new("abc123").unwrap(),
            &AccessToken::new("tok1"),
        )
        .await;

    assert_eq!(result, NotificationResult::Status(500));
    assert!(!result.is_success());
    assert_eq!(result.to_string(), "500");
}

#[tokio::test]
async fn test_notify_with_empty_token_still_sends_request() {
    let (base_url, requests) = spawn_stub(StatusCode::UNAUTHORIZED, Duration::ZERO).await;
    let plugin = plugin_for(&base_url);

    let result = plugin
        .notify(
            &BuildOutcome::new("blue").unwrap(),
            &DeviceId::new("abc123").unwrap(),
            &AccessToken::empty(),
        )
        .await;

    assert_eq!(result.code(), 401);
    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].authorization.as_deref().map(str::trim_end),
        Some("Bearer")
    );
}

#[tokio::test]
async fn test_notify_connection_refused_returns_sentinel() {
    let addr = closed_port().await;
    let plugin = plugin_for(&format!("http://{addr}/v1"));

    let result = plugin
        .notify(
            &BuildOutcome::new("blue").unwrap(),
            &DeviceId::new("abc123").unwrap(),
            &AccessToken::new("tok1"),
        )
        .await;

    assert_eq!(result, NotificationResult::TransportFailure);
    assert_eq!(result.code(), -1);
}

#[tokio::test]
async fn test_notify_times_out() {
    let (base_url, _requests) = spawn_stub(StatusCode::OK, Duration::from_secs(5)).await;
    let plugin = SparkPlugin::new(SparkOptions {
        api_base_url: base_url,
        timeout: Duration::from_millis(200),
        ..SparkOptions::default()
    })
    .unwrap();

    let result = plugin
        .notify(
            &BuildOutcome::new("blue").unwrap(),
            &DeviceId::new("abc123").unwrap(),
            &AccessToken::new("tok1"),
        )
        .await;

    assert_eq!(result, NotificationResult::TransportFailure);
}

#[tokio::test]
async fn test_notify_twice_sends_two_identical_requests() {
    let (base_url, requests) = spawn_stub(StatusCode::OK, Duration::ZERO).await;
    let plugin = plugin_for(&base_url);
    let outcome = BuildOutcome::new("blue").unwrap();
    let device = DeviceId::new("abc123").unwrap();
    let token = AccessToken::new("tok1");

    let first = plugin.notify(&outcome, &device, &token).await;
    let second = plugin.notify(&outcome, &device, &token).await;
    assert_eq!(first, second);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, requests[1].path);
    assert_eq!(requests[0].body, requests[1].body);
    assert_eq!(requests[0].authorization, requests[1].authorization);
}

#[tokio::test]
async fn test_connection_ok() {
    let (base_url, requests) = spawn_stub(StatusCode::OK, Duration::ZERO).await;
    let plugin = plugin_for(&base_url);

    let result = plugin.test_connection(&AccessToken::new("candidate")).await;
    assert_eq!(result, ValidationResult::Ok);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/v1/devices/");
    assert_eq!(request.authorization.as_deref(), Some("Bearer candidate"));
    assert_eq!(request.accept.as_deref(), Some("*/*"));
    assert_eq!(
        request.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert!(request.body.is_empty());
}

#[tokio::test]
async fn test_connection_warning_on_forbidden() {
    let (base_url, _requests) = spawn_stub(StatusCode::FORBIDDEN, Duration::ZERO).await;
    let plugin = plugin_for(&base_url);

    let result = plugin.test_connection(&AccessToken::new("tok1")).await;
    assert_eq!(
        result,
        ValidationResult::Warning("Return code: 403 (Token: tok1)".to_string())
    );
}

#[tokio::test]
async fn test_connection_error_on_network_failure() {
    let addr = closed_port().await;
    let plugin = plugin_for(&format!("http://{addr}/v1"));

    let result = plugin.test_connection(&AccessToken::new("tok1")).await;
    match result {
        ValidationResult::Error(message) => {
            assert!(message.starts_with("Error occurred: "), "{message}");
            assert!(message.ends_with("(Token: tok1)"), "{message}");

            let cause = message
                .trim_start_matches("Error occurred: ")
                .trim_end_matches("(Token: tok1)")
                .trim();
            assert!(!cause.is_empty(), "{message}");
            assert!(cause.to_lowercase().contains("connect"), "{message}");
        }
        other => panic!("expected error, got {other:?}"),
    }
}
