//! Integration tests for the Veritag API client pipeline.

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use veritag_core::{
    AuthBackend, AuthError, Credentials, KvStore, LoginGrant, MemoryStore, Role, SessionStore,
    StorageError, UserInfo, WILDCARD_PERMISSION,
};
use veritag_http::{messages, ApiClient, ClientError, Notifier, ReloadBoundary, Severity};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_TOKEN: &str = "platform-test-token";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("veritag=debug")
        .try_init();
}

fn platform_user() -> UserInfo {
    UserInfo {
        id: 1,
        username: "admin".to_string(),
        display_name: "Platform Administrator".to_string(),
        role: Role::Platform,
        merchant_id: None,
        permissions: [WILDCARD_PERMISSION.to_string()].into_iter().collect(),
    }
}

/// Always grants the same token, so tests can assert exact header values.
struct FixedBackend;

#[async_trait]
impl AuthBackend for FixedBackend {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<LoginGrant, AuthError> {
        Ok(LoginGrant {
            token: TEST_TOKEN.to_string(),
            user: platform_user(),
        })
    }
}

/// Delegates to a `MemoryStore` while counting removal batches, so tests can
/// observe how many times the session was invalidated.
struct CountingStore {
    inner: MemoryStore,
    removals: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            removals: AtomicUsize::new(0),
        }
    }

    fn removal_count(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KvStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set_many(&self, entries: &[(&'static str, String)]) -> Result<(), StorageError> {
        self.inner.set_many(entries).await
    }

    async fn remove_many(&self, keys: &[&'static str]) -> Result<(), StorageError> {
        self.removals.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_many(keys).await
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
    }
}

#[derive(Default)]
struct RecordingReload {
    redirects: AtomicUsize,
}

impl RecordingReload {
    fn redirect_count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl ReloadBoundary for RecordingReload {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    server: MockServer,
    client: ApiClient,
    session: Arc<SessionStore>,
    storage: Arc<CountingStore>,
    notifier: Arc<RecordingNotifier>,
    reload: Arc<RecordingReload>,
}

impl Harness {
    async fn new() -> Self {
        init_tracing();
        let server = MockServer::start().await;
        let storage = Arc::new(CountingStore::new());
        let session = Arc::new(SessionStore::new(storage.clone(), Arc::new(FixedBackend)));
        let notifier = Arc::new(RecordingNotifier::default());
        let reload = Arc::new(RecordingReload::default());

        let client = ApiClient::builder()
            .base_url(server.uri())
            .session(session.clone())
            .notifier(notifier.clone())
            .reload_boundary(reload.clone())
            .build()
            .unwrap();

        Self {
            server,
            client,
            session,
            storage,
            notifier,
            reload,
        }
    }

    async fn logged_in() -> Self {
        let harness = Self::new().await;
        harness
            .session
            .login(Credentials::new("admin", "admin123"))
            .await
            .unwrap();
        harness
    }
}

fn envelope(code: i64, data: Value, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": code,
        "data": data,
        "message": message,
    }))
}

#[tokio::test]
async fn builder_requires_base_url_session_and_reload_boundary() {
    let missing_base = ApiClient::builder().build();
    assert!(matches!(missing_base, Err(ClientError::Config(_))));

    let storage = Arc::new(MemoryStore::new());
    let session = Arc::new(SessionStore::new(storage, Arc::new(FixedBackend)));

    let missing_session = ApiClient::builder().base_url("http://localhost").build();
    assert!(matches!(missing_session, Err(ClientError::Config(_))));

    let missing_reload = ApiClient::builder()
        .base_url("http://localhost")
        .session(session)
        .build();
    assert!(matches!(missing_reload, Err(ClientError::Config(_))));
}

#[tokio::test]
async fn the_builder_normalizes_the_base_url_and_defaults_the_notifier() {
    let storage = Arc::new(MemoryStore::new());
    let session = Arc::new(SessionStore::new(storage, Arc::new(FixedBackend)));

    let client = ApiClient::builder()
        .base_url("http://localhost:8080/")
        .session(session)
        .reload_boundary(Arc::new(RecordingReload::default()))
        .build()
        .unwrap();

    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[tokio::test]
async fn authenticated_requests_carry_the_bearer_token() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/platform/rules"))
        .respond_with(envelope(0, json!({}), ""))
        .mount(&harness.server)
        .await;

    harness.client.get_rules().await.unwrap();

    let requests = harness.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let authorization = requests[0]
        .headers
        .get("authorization")
        .expect("authorization header must be present");
    assert_eq!(
        authorization.to_str().unwrap(),
        format!("Bearer {TEST_TOKEN}")
    );
}

#[tokio::test]
async fn unauthenticated_requests_pass_through_without_a_header() {
    let harness = Harness::new().await;

    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(envelope(0, json!({"valid": true}), ""))
        .mount(&harness.server)
        .await;

    harness.client.verify_code("VT-0001").await.unwrap();

    let requests = harness.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn successful_envelope_unwraps_to_the_inner_data() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/platform/rules"))
        .respond_with(envelope(0, json!({"id": 7}), ""))
        .mount(&harness.server)
        .await;

    let data: Value = harness.client.get_rules().await.unwrap();

    assert_eq!(data, json!({"id": 7}));
    assert!(harness.notifier.messages().is_empty());
}

#[tokio::test]
async fn business_failure_notifies_once_with_the_envelope_message() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/merchant/statistics"))
        .respond_with(envelope(5, Value::Null, "quota exceeded"))
        .mount(&harness.server)
        .await;

    let result = harness.client.merchant_statistics().await;

    assert!(matches!(
        result,
        Err(ClientError::Application { code: 5, .. })
    ));
    assert_eq!(
        harness.notifier.messages(),
        vec![("quota exceeded".to_string(), Severity::Error)]
    );
    // Business failures never touch the session.
    assert!(harness.session.is_authenticated());
}

#[tokio::test]
async fn business_failure_without_a_message_uses_the_generic_fallback() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/platform/statistics"))
        .respond_with(envelope(3, Value::Null, ""))
        .mount(&harness.server)
        .await;

    let result = harness.client.platform_statistics().await;

    assert!(matches!(result, Err(ClientError::Application { .. })));
    assert_eq!(
        harness.notifier.messages(),
        vec![(messages::REQUEST_FAILED.to_string(), Severity::Error)]
    );
}

#[tokio::test]
async fn status_401_invalidates_the_session_and_forces_one_redirect() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/platform/rules"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&harness.server)
        .await;

    let result = harness.client.get_rules().await;

    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert_eq!(
        harness.notifier.messages(),
        vec![(messages::SESSION_EXPIRED.to_string(), Severity::Error)]
    );
    assert!(!harness.session.is_authenticated());
    assert_eq!(harness.storage.removal_count(), 1);
    assert_eq!(harness.reload.redirect_count(), 1);
}

#[tokio::test]
async fn concurrent_401s_invalidate_and_redirect_at_most_once() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/platform/rules"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&harness.server)
        .await;

    let results = join_all([
        harness.client.get_rules(),
        harness.client.get_rules(),
        harness.client.get_rules(),
    ])
    .await;

    for result in results {
        assert!(matches!(result, Err(ClientError::Unauthorized)));
    }

    // One notification per failed call, but the escalation happened once.
    assert_eq!(harness.notifier.messages().len(), 3);
    assert_eq!(harness.storage.removal_count(), 1);
    assert_eq!(harness.reload.redirect_count(), 1);
    assert!(!harness.session.is_authenticated());
}

#[tokio::test]
async fn the_expiry_latch_rearms_after_the_next_login() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/platform/rules"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&harness.server)
        .await;

    let _ = harness.client.get_rules().await;
    assert_eq!(harness.reload.redirect_count(), 1);

    harness
        .session
        .login(Credentials::new("admin", "admin123"))
        .await
        .unwrap();

    let _ = harness.client.get_rules().await;
    assert_eq!(harness.reload.redirect_count(), 2);
}

#[tokio::test]
async fn status_403_notifies_without_touching_the_session() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/platform/rules"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&harness.server)
        .await;

    let result = harness.client.get_rules().await;

    assert!(matches!(result, Err(ClientError::Forbidden)));
    assert_eq!(
        harness.notifier.messages(),
        vec![(messages::FORBIDDEN.to_string(), Severity::Error)]
    );
    assert!(harness.session.is_authenticated());
    assert_eq!(harness.reload.redirect_count(), 0);
}

#[tokio::test]
async fn status_500_notifies_the_generic_server_error() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/merchant/statistics"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&harness.server)
        .await;

    let result = harness.client.merchant_statistics().await;

    assert!(matches!(result, Err(ClientError::ServerError)));
    assert_eq!(
        harness.notifier.messages(),
        vec![(messages::SERVER_ERROR.to_string(), Severity::Error)]
    );
}

#[tokio::test]
async fn other_statuses_surface_the_body_message_when_present() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/platform/rules"))
        .respond_with(ResponseTemplate::new(418).set_body_json(json!({
            "code": 1,
            "data": null,
            "message": "teapot says no",
        })))
        .mount(&harness.server)
        .await;

    let result = harness.client.get_rules().await;

    match result {
        Err(ClientError::Other { status, message }) => {
            assert_eq!(status, 418);
            assert_eq!(message, "teapot says no");
        }
        other => panic!("expected Other, got {other:?}"),
    }
    assert_eq!(
        harness.notifier.messages(),
        vec![("teapot says no".to_string(), Severity::Error)]
    );
}

#[tokio::test]
async fn other_statuses_fall_back_to_the_generic_message() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/platform/rules"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&harness.server)
        .await;

    let result = harness.client.get_rules().await;

    assert!(matches!(
        result,
        Err(ClientError::Other { status: 404, .. })
    ));
    assert_eq!(
        harness.notifier.messages(),
        vec![(messages::REQUEST_FAILED.to_string(), Severity::Error)]
    );
}

#[tokio::test]
async fn unreachable_server_classifies_as_a_network_failure() {
    init_tracing();
    let storage = Arc::new(CountingStore::new());
    let session = Arc::new(SessionStore::new(storage, Arc::new(FixedBackend)));
    let notifier = Arc::new(RecordingNotifier::default());
    let reload = Arc::new(RecordingReload::default());

    // Nothing listens on this port.
    let client = ApiClient::builder()
        .base_url("http://127.0.0.1:9")
        .session(session)
        .notifier(notifier.clone())
        .reload_boundary(reload)
        .build()
        .unwrap();

    let result = client.get_rules().await;

    assert!(matches!(result, Err(ClientError::Network(_))));
    assert_eq!(
        notifier.messages(),
        vec![(messages::NETWORK_ERROR.to_string(), Severity::Error)]
    );
}

#[tokio::test]
async fn malformed_envelope_on_success_status_is_a_decode_failure() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/platform/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&harness.server)
        .await;

    let result = harness.client.get_rules().await;

    assert!(matches!(result, Err(ClientError::Decode(_))));
    assert_eq!(
        harness.notifier.messages(),
        vec![(messages::REQUEST_FAILED.to_string(), Severity::Error)]
    );
}

#[tokio::test]
async fn query_parameters_reach_the_wire() {
    let harness = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/platform/merchants"))
        .and(wiremock::matchers::query_param("page", "1"))
        .respond_with(envelope(0, json!([]), ""))
        .mount(&harness.server)
        .await;

    let data: Value = harness
        .client
        .list_merchants(&json!({"page": 1, "size": 10}))
        .await
        .unwrap();
    assert_eq!(data, json!([]));
}
