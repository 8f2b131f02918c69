//! Marketplace B client: create then publish, each call retried.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::{InventoryDraft, RemoteCallResult};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::retry::{self, RetryObserver, RetryPolicy, TracingObserver};

const ACTION_CREATE: &str = "inventory creation";
const ACTION_PUBLISH: &str = "inventory publishing";

/// A single failed call against a Marketplace B endpoint.
///
/// Every variant is retryable; the retry executor turns the last one
/// into the operation's `Failure` outcome.
#[derive(Debug, Error)]
pub enum MarketplaceBCallError {
    /// The endpoint answered with a non-success status.
    #[error("Marketplace B {action} failed: {message}")]
    Rejected {
        /// Which operation was refused.
        action: &'static str,
        /// The server's error message, or the raw body.
        message: String,
    },

    /// The request never completed.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A success response carried a body that is not a JSON object.
    #[error("Marketplace B returned an unreadable body: {0}")]
    UnreadableBody(#[from] serde_json::Error),
}

/// Client-side view of Marketplace B.
///
/// The signatures are infallible: the retry budget absorbs every
/// per-call error into the final `Failure` outcome.
#[async_trait]
pub trait MarketplaceB: Send + Sync {
    /// Creates an inventory record for the draft.
    async fn create_inventory(&self, draft: &InventoryDraft) -> RemoteCallResult;

    /// Publishes a previously created inventory record.
    async fn publish_inventory(&self, inventory_id: &str) -> RemoteCallResult;
}

/// HTTP client for Marketplace B.
///
/// Each operation wraps its whole HTTP interaction, body parsing
/// included, in the retry policy.
#[derive(Clone)]
pub struct MarketplaceBClient {
    http: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
    observer: Arc<dyn RetryObserver>,
}

impl MarketplaceBClient {
    /// Creates a client with the default retry policy and tracing observer.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_policy(base_url, RetryPolicy::default())
    }

    /// Creates a client with a specific retry policy.
    pub fn with_policy(base_url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self::with_observer(base_url, policy, Arc::new(TracingObserver))
    }

    /// Creates a client with a specific retry policy and observer.
    pub fn with_observer(
        base_url: impl Into<String>,
        policy: RetryPolicy,
        observer: Arc<dyn RetryObserver>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            policy,
            observer,
        }
    }

    fn inventory_url(&self) -> String {
        format!("{}/inventory", self.base_url)
    }

    fn publish_url(&self, inventory_id: &str) -> String {
        format!("{}/inventory/{}/publish", self.base_url, inventory_id)
    }

    async fn attempt_create(
        &self,
        draft: &InventoryDraft,
    ) -> Result<Map<String, Value>, MarketplaceBCallError> {
        let response = self
            .http
            .post(self.inventory_url())
            .json(draft)
            .send()
            .await?;
        Self::read_payload(response, ACTION_CREATE).await
    }

    async fn attempt_publish(
        &self,
        inventory_id: &str,
    ) -> Result<Map<String, Value>, MarketplaceBCallError> {
        let response = self.http.post(self.publish_url(inventory_id)).send().await?;
        Self::read_payload(response, ACTION_PUBLISH).await
    }

    async fn read_payload(
        response: reqwest::Response,
        action: &'static str,
    ) -> Result<Map<String, Value>, MarketplaceBCallError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(MarketplaceBCallError::Rejected {
                action,
                message: error_reason(&body),
            })
        }
    }
}

#[async_trait]
impl MarketplaceB for MarketplaceBClient {
    async fn create_inventory(&self, draft: &InventoryDraft) -> RemoteCallResult {
        let outcome = retry::execute(self.policy, self.observer.as_ref(), || {
            self.attempt_create(draft)
        })
        .await;

        match outcome {
            Ok(payload) => RemoteCallResult::success(payload),
            Err(e) => RemoteCallResult::failure(e.last_error),
        }
    }

    async fn publish_inventory(&self, inventory_id: &str) -> RemoteCallResult {
        let outcome = retry::execute(self.policy, self.observer.as_ref(), || {
            self.attempt_publish(inventory_id)
        })
        .await;

        match outcome {
            Ok(payload) => RemoteCallResult::success(payload),
            Err(e) => RemoteCallResult::failure(e.last_error),
        }
    }
}

/// Pulls the server's message out of an error body, falling back to the
/// raw body when it is not the expected JSON shape.
fn error_reason(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, Default)]
struct InMemoryMarketplaceBState {
    create_script: VecDeque<RemoteCallResult>,
    publish_script: VecDeque<RemoteCallResult>,
    drafts: Vec<InventoryDraft>,
    published: Vec<String>,
    next_id: u32,
}

/// In-memory Marketplace B for testing.
///
/// Outcomes can be scripted per operation; with empty scripts every
/// create yields a fresh inventory id and every publish succeeds.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketplaceB {
    state: Arc<RwLock<InMemoryMarketplaceBState>>,
}

impl InMemoryMarketplaceB {
    /// Creates a new in-memory marketplace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome of the next create call.
    pub fn enqueue_create(&self, outcome: RemoteCallResult) {
        self.state.write().unwrap().create_script.push_back(outcome);
    }

    /// Queues the outcome of the next publish call.
    pub fn enqueue_publish(&self, outcome: RemoteCallResult) {
        self.state.write().unwrap().publish_script.push_back(outcome);
    }

    /// Returns the number of create calls made.
    pub fn create_count(&self) -> usize {
        self.state.read().unwrap().drafts.len()
    }

    /// Returns the number of publish calls made.
    pub fn publish_count(&self) -> usize {
        self.state.read().unwrap().published.len()
    }

    /// Returns the most recently created draft.
    pub fn last_draft(&self) -> Option<InventoryDraft> {
        self.state.read().unwrap().drafts.last().cloned()
    }

    /// Returns the most recently published inventory id.
    pub fn last_published_id(&self) -> Option<String> {
        self.state.read().unwrap().published.last().cloned()
    }
}

#[async_trait]
impl MarketplaceB for InMemoryMarketplaceB {
    async fn create_inventory(&self, draft: &InventoryDraft) -> RemoteCallResult {
        let mut state = self.state.write().unwrap();
        state.drafts.push(draft.clone());

        if let Some(outcome) = state.create_script.pop_front() {
            return outcome;
        }

        state.next_id += 1;
        let mut payload = Map::new();
        payload.insert(
            "inventory_id".to_string(),
            Value::String(format!("INV-{:04}", state.next_id)),
        );
        payload.insert("status".to_string(), Value::String("created".to_string()));
        RemoteCallResult::success(payload)
    }

    async fn publish_inventory(&self, inventory_id: &str) -> RemoteCallResult {
        let mut state = self.state.write().unwrap();
        state.published.push(inventory_id.to_string());

        if let Some(outcome) = state.publish_script.pop_front() {
            return outcome;
        }

        let mut payload = Map::new();
        payload.insert(
            "listing_id".to_string(),
            Value::String(format!("LST-{:04}", state.published.len())),
        );
        payload.insert("status".to_string(), Value::String("published".to_string()));
        RemoteCallResult::success(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use domain::{Price, ProductRequest};
    use mockito::Matcher;
    use serde_json::json;

    fn draft() -> InventoryDraft {
        let product = ProductRequest::new("Test Product", Price::from_cents(1999), "SKU123");
        InventoryDraft::from(&product)
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::ZERO)
    }

    /// Serves the scripted responses in order, then repeats the last one.
    /// Returns the base URL and a counter of requests served.
    async fn spawn_scripted_server(
        script: Vec<(u16, &'static str)>,
    ) -> (String, Arc<AtomicUsize>) {
        use axum::Router;
        use axum::http::{StatusCode, header};
        use axum::routing::any;
        use std::sync::Mutex;

        let calls = Arc::new(AtomicUsize::new(0));
        let script = Arc::new(Mutex::new(VecDeque::from(script)));

        let handler_calls = calls.clone();
        let app = Router::new().fallback(any(move || {
            let script = script.clone();
            let calls = handler_calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                let (status, body) = {
                    let mut script = script.lock().unwrap();
                    if script.len() > 1 {
                        script.pop_front().unwrap()
                    } else {
                        script.front().copied().unwrap_or((200, "{}"))
                    }
                };
                (
                    StatusCode::from_u16(status).unwrap(),
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
            }
        }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), calls)
    }

    #[tokio::test]
    async fn test_create_inventory_posts_draft_and_returns_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/inventory")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "title": "Test Product",
                "price_cents": 1999,
                "seller_sku": "SKU123",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"inventory_id":"67890","status":"created"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = MarketplaceBClient::with_policy(server.url(), fast_policy(3));
        let result = client.create_inventory(&draft()).await;

        mock.assert_async().await;
        assert!(result.is_success());
        assert_eq!(
            result.payload().unwrap().get("inventory_id").unwrap(),
            "67890"
        );
    }

    #[tokio::test]
    async fn test_create_inventory_exhausts_retries_on_persistent_rejection() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/inventory")
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Name is required"}"#)
            .expect(4)
            .create_async()
            .await;

        let client = MarketplaceBClient::with_policy(server.url(), fast_policy(3));
        let result = client.create_inventory(&draft()).await;

        // max_retries + 1 attempts in total
        mock.assert_async().await;
        assert_eq!(
            result,
            RemoteCallResult::failure("Marketplace B inventory creation failed: Name is required")
        );
    }

    #[tokio::test]
    async fn test_create_inventory_recovers_after_server_errors() {
        let (base_url, calls) = spawn_scripted_server(vec![
            (500, r#"{"error":"Internal server error"}"#),
            (500, r#"{"error":"Internal server error"}"#),
            (200, r#"{"inventory_id":"67890","status":"created"}"#),
        ])
        .await;

        let client = MarketplaceBClient::with_policy(base_url, fast_policy(3));
        let result = client.create_inventory(&draft()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(result.is_success());
        assert_eq!(
            result.payload().unwrap().get("inventory_id").unwrap(),
            "67890"
        );
    }

    #[tokio::test]
    async fn test_publish_inventory_hits_publish_path() {
        let mut server = mockito::Server::new_async().await;
        // Publish is a bare POST: no payload, no content-type
        let mock = server
            .mock("POST", "/inventory/67890/publish")
            .match_body(Matcher::Exact(String::new()))
            .match_header("content-type", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"listing_id":"L123","status":"published"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = MarketplaceBClient::with_policy(server.url(), fast_policy(3));
        let result = client.publish_inventory("67890").await;

        mock.assert_async().await;
        assert!(result.is_success());
        assert_eq!(result.payload().unwrap().get("listing_id").unwrap(), "L123");
    }

    #[tokio::test]
    async fn test_publish_inventory_recovers_after_one_error() {
        let (base_url, calls) = spawn_scripted_server(vec![
            (500, r#"{"error":"Internal server error"}"#),
            (200, r#"{"listing_id":"L123","status":"published"}"#),
        ])
        .await;

        let client = MarketplaceBClient::with_policy(base_url, fast_policy(3));
        let result = client.publish_inventory("67890").await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_publish_inventory_exhaustion_failure_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/inventory/67890/publish")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Internal server error"}"#)
            .expect(4)
            .create_async()
            .await;

        let client = MarketplaceBClient::with_policy(server.url(), fast_policy(3));
        let result = client.publish_inventory("67890").await;

        mock.assert_async().await;
        assert_eq!(
            result,
            RemoteCallResult::failure(
                "Marketplace B inventory publishing failed: Internal server error"
            )
        );
    }

    #[tokio::test]
    async fn test_transport_errors_absorbed_into_failure() {
        // Nothing listens on port 1
        let client = MarketplaceBClient::with_policy("http://127.0.0.1:1", fast_policy(1));
        let result = client.create_inventory(&draft()).await;

        assert!(result.is_failure());
    }

    #[tokio::test]
    async fn test_unreadable_success_body_retried_then_absorbed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/inventory")
            .with_status(200)
            .with_body("not json")
            .expect(2)
            .create_async()
            .await;

        let client = MarketplaceBClient::with_policy(server.url(), fast_policy(1));
        let result = client.create_inventory(&draft()).await;

        mock.assert_async().await;
        assert!(result.is_failure());
        assert!(
            result
                .failure_reason()
                .unwrap()
                .starts_with("Marketplace B returned an unreadable body")
        );
    }

    #[tokio::test]
    async fn test_in_memory_defaults_and_scripts() {
        let marketplace = InMemoryMarketplaceB::new();

        let first = marketplace.create_inventory(&draft()).await;
        assert_eq!(
            first.payload().unwrap().get("inventory_id").unwrap(),
            "INV-0001"
        );

        marketplace.enqueue_create(RemoteCallResult::failure(
            "Marketplace B inventory creation failed: Name is required",
        ));
        let second = marketplace.create_inventory(&draft()).await;
        assert!(second.is_failure());

        let published = marketplace.publish_inventory("INV-0001").await;
        assert_eq!(published.payload().unwrap().get("status").unwrap(), "published");

        assert_eq!(marketplace.create_count(), 2);
        assert_eq!(marketplace.publish_count(), 1);
        assert_eq!(marketplace.last_draft().unwrap().title, "Test Product");
        assert_eq!(marketplace.last_published_id().unwrap(), "INV-0001");
    }
}
