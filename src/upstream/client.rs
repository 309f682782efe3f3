use super::types::{
    CommentPromptParams, CreatePromptParams, Envelope, LikeAction, LikePromptParams,
    LikeRequest, PromptDetailParams, SearchPromptsParams, SearchQuery,
};
use crate::config::UpstreamConfig;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

/// Sub-path of the single RPC-style endpoint every tool call goes through.
const RPC_PATH: &str = "/sse";
const HEALTH_PATH: &str = "/api/health";
/// The health check uses its own deadline, independent of the call timeout.
const HEALTH_TIMEOUT: Duration = Duration::from_millis(5000);
const USER_AGENT: &str = "promot-share-mcp-client/1.0.0";
const USER_TOKEN_HEADER: &str = "X-User-Token";

/// Operations offered by the Prompt Share API, one per exposed tool.
#[async_trait]
pub trait PromptApi: Send + Sync {
    async fn search_prompts(&self, params: SearchPromptsParams) -> Result<Value>;

    async fn get_prompt_detail(&self, id: &str) -> Result<Value>;

    async fn create_prompt(&self, params: CreatePromptParams) -> Result<Value>;

    async fn like_prompt(&self, params: LikePromptParams) -> Result<Value>;

    async fn comment_prompt(&self, params: CommentPromptParams) -> Result<Value>;

    async fn list_categories(&self) -> Result<Value>;

    async fn get_user_favorites(&self) -> Result<Value>;

    /// Returns true only when the service answers with a success status.
    /// Never fails.
    async fn health_check(&self) -> bool;
}

/// Authenticated, time-bounded HTTP client for the Prompt Share API
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    user_token: Option<String>,
    timeout: Duration,
    span: Span,
}

impl UpstreamClient {
    /// Build a client from its configuration.
    ///
    /// Fails with [`BridgeError::Configuration`] when the API key is blank;
    /// nothing touches the network here.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(BridgeError::Configuration(
                "API key is required".to_string(),
            ));
        }
        if config.timeout_ms == 0 {
            return Err(BridgeError::Configuration(
                "Request timeout must be positive".to_string(),
            ));
        }

        let base_url = config
            .base_url
            .strip_suffix('/')
            .unwrap_or(&config.base_url)
            .to_string();

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                BridgeError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        let span = info_span!("upstream", base_url = %base_url);
        info!(parent: &span, "API client initialized: {}", base_url);

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            user_token: config.user_token.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            span,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn user_token(&self) -> Option<&str> {
        self.user_token
            .as_deref()
            .filter(|token| !token.is_empty() && *token != self.api_key)
    }

    async fn call(&self, envelope: Envelope) -> Result<Value> {
        self.request(RPC_PATH, Method::POST, Some(&envelope))
            .instrument(self.span.clone())
            .await
    }

    /// Shared request primitive: one attempt, bounded by the configured timeout.
    async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<&Envelope>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("API request: {} {}", method, url);
        if let Some(body) = body {
            debug!(
                body = %serde_json::to_string(body).unwrap_or_default(),
                "API request body"
            );
        }

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key);
        if let Some(token) = self.user_token() {
            request = request.header(USER_TOKEN_HEADER, token);
        }
        if method == Method::POST {
            if let Some(body) = body {
                request = request.json(body);
            }
        }

        let outcome = with_deadline(self.timeout, |cancel| exchange(request, cancel)).await;

        match &outcome {
            Ok(value) => debug!(response = %value, "API response OK"),
            Err(BridgeError::Timeout) => error!("API request timed out: {}", url),
            Err(BridgeError::Connectivity) => error!("Unable to connect to server: {}", url),
            Err(BridgeError::UpstreamCall { status, message }) => {
                error!("API request failed: {} {}", status, message)
            }
            Err(e) => error!("API request error: {}: {}", url, e),
        }

        outcome
    }
}

/// Run `call` with a token that is cancelled once `timeout` elapses.
///
/// The timer lives inside the returned future, so dropping the call mid-flight
/// drops the timer with it.
async fn with_deadline<T, F, Fut>(timeout: Duration, call: F) -> Result<T>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let cancel = CancellationToken::new();
    let call = call(cancel.clone());
    tokio::pin!(call);

    tokio::select! {
        result = &mut call => result,
        _ = tokio::time::sleep(timeout) => {
            cancel.cancel();
            call.await
        }
    }
}

/// Send the request and read the body as JSON, giving up with
/// [`BridgeError::Timeout`] as soon as `cancel` fires.
async fn exchange(request: RequestBuilder, cancel: CancellationToken) -> Result<Value> {
    cancel
        .run_until_cancelled(send(request))
        .await
        .unwrap_or(Err(BridgeError::Timeout))
}

async fn send(request: RequestBuilder) -> Result<Value> {
    let response = request.send().await.map_err(classify)?;
    let status = response.status();
    let bytes = response.bytes().await.map_err(classify)?;

    if !status.is_success() {
        let message = serde_json::from_slice::<Value>(&bytes)
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown status")
                    .to_string()
            });
        return Err(BridgeError::UpstreamCall {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(&bytes)?)
}

fn classify(err: reqwest::Error) -> BridgeError {
    if err.is_timeout() {
        BridgeError::Timeout
    } else if err.is_connect() {
        BridgeError::Connectivity
    } else {
        BridgeError::Http(err)
    }
}

#[async_trait]
impl PromptApi for UpstreamClient {
    async fn search_prompts(&self, params: SearchPromptsParams) -> Result<Value> {
        let query = SearchQuery::from(params);
        info!(parent: &self.span, "Searching prompts: \"{}\"", query.query);
        self.call(Envelope::new("search_prompts", &query)?).await
    }

    async fn get_prompt_detail(&self, id: &str) -> Result<Value> {
        info!(parent: &self.span, "Fetching prompt detail: {}", id);
        let params = PromptDetailParams { id: id.to_string() };
        self.call(Envelope::new("get_prompt_detail", &params)?).await
    }

    async fn create_prompt(&self, params: CreatePromptParams) -> Result<Value> {
        info!(parent: &self.span, "Creating prompt: \"{}\"", params.title);
        self.call(Envelope::new("create_prompt", &params)?).await
    }

    async fn like_prompt(&self, params: LikePromptParams) -> Result<Value> {
        let request = LikeRequest::from(params);
        match request.action {
            LikeAction::Like => info!(parent: &self.span, "Liking prompt: {}", request.prompt_id),
            LikeAction::Unlike => {
                info!(parent: &self.span, "Unliking prompt: {}", request.prompt_id)
            }
        }
        self.call(Envelope::new("like_prompt", &request)?).await
    }

    async fn comment_prompt(&self, params: CommentPromptParams) -> Result<Value> {
        info!(parent: &self.span, "Commenting on prompt: {}", params.prompt_id);
        self.call(Envelope::new("comment_prompt", &params)?).await
    }

    async fn list_categories(&self) -> Result<Value> {
        info!(parent: &self.span, "Listing categories");
        self.call(Envelope::new("list_categories", &json!({}))?)
            .await
    }

    async fn get_user_favorites(&self) -> Result<Value> {
        info!(parent: &self.span, "Fetching user favorites");
        self.call(Envelope::new("get_user_favorites", &json!({}))?)
            .await
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        info!(parent: &self.span, "Running health check: {}", url);

        match self.http.get(&url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(response) => {
                let healthy = response.status().is_success();
                info!(
                    parent: &self.span,
                    "Server health: {}",
                    if healthy { "healthy" } else { "unhealthy" }
                );
                healthy
            }
            Err(e) => {
                warn!(parent: &self.span, "Health check failed: {}", e);
                false
            }
        }
    }
}
