//! Marketplace A client: one POST, no retry.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::{ProductRequest, RemoteCallResult};
use serde_json::{Map, Value};

use crate::error::{Result, SyncError};

/// Client-side view of Marketplace A.
///
/// A product is posted exactly once. Rejections and connection refusal
/// come back as `Failure` outcomes; any other transport fault is returned
/// as an error and escapes the sync flow untouched.
#[async_trait]
pub trait MarketplaceA: Send + Sync {
    /// Submits the product and returns the normalized outcome.
    async fn post_product(&self, product: &ProductRequest) -> Result<RemoteCallResult>;
}

/// HTTP client for Marketplace A.
#[derive(Debug, Clone)]
pub struct MarketplaceAClient {
    http: reqwest::Client,
    base_url: String,
}

impl MarketplaceAClient {
    /// Creates a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn products_url(&self) -> String {
        format!("{}/api/products", self.base_url)
    }
}

#[async_trait]
impl MarketplaceA for MarketplaceAClient {
    async fn post_product(&self, product: &ProductRequest) -> Result<RemoteCallResult> {
        let response = match self
            .http
            .post(self.products_url())
            .json(product)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_connect() => {
                tracing::error!("Connection refused to Marketplace A");
                return Ok(RemoteCallResult::failure("Connection refused to Marketplace A"));
            }
            Err(e) => return Err(SyncError::MarketplaceATransport(e.to_string())),
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SyncError::MarketplaceATransport(e.to_string()))?;

        if status.is_success() {
            let payload: Map<String, Value> = serde_json::from_str(&body)
                .map_err(|e| SyncError::MarketplaceATransport(e.to_string()))?;
            Ok(RemoteCallResult::success(payload))
        } else {
            tracing::error!("Error syncing to Marketplace A: {} - {}", status.as_u16(), body);
            Ok(RemoteCallResult::failure(error_reason(&body)))
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
struct InMemoryMarketplaceAState {
    script: VecDeque<Result<RemoteCallResult>>,
    posts: Vec<ProductRequest>,
    next_id: u32,
}

/// In-memory Marketplace A for testing.
///
/// Outcomes can be scripted per call; with an empty script every post
/// succeeds with a generated id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketplaceA {
    state: Arc<RwLock<InMemoryMarketplaceAState>>,
}

impl InMemoryMarketplaceA {
    /// Creates a new in-memory marketplace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome of the next post.
    pub fn enqueue_response(&self, outcome: Result<RemoteCallResult>) {
        self.state.write().unwrap().script.push_back(outcome);
    }

    /// Returns the number of products posted.
    pub fn post_count(&self) -> usize {
        self.state.read().unwrap().posts.len()
    }

    /// Returns the most recently posted product.
    pub fn last_product(&self) -> Option<ProductRequest> {
        self.state.read().unwrap().posts.last().cloned()
    }
}

#[async_trait]
impl MarketplaceA for InMemoryMarketplaceA {
    async fn post_product(&self, product: &ProductRequest) -> Result<RemoteCallResult> {
        let mut state = self.state.write().unwrap();
        state.posts.push(product.clone());

        if let Some(outcome) = state.script.pop_front() {
            return outcome;
        }

        state.next_id += 1;
        let mut payload = Map::new();
        payload.insert("id".to_string(), Value::String(format!("A-{:04}", state.next_id)));
        payload.insert("status".to_string(), Value::String("success".to_string()));
        Ok(RemoteCallResult::success(payload))
    }
}
