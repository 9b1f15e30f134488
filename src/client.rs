use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{Conversation, ConversationCreateParams, MessageCreateParams, MessageReply};

/// Where the conversation backend listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
/// Per-request timeout unless told otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const CONVERSATION_ENDPOINT: &str = "conversation";
const MESSAGE_ENDPOINT: &str = "message";

/// The two calls a chat client makes against its conversation backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Starts a conversation, returning the identifier for subsequent messages.
    async fn create_conversation(&self, params: ConversationCreateParams) -> Result<Conversation>;

    /// Sends one message within an established conversation.
    async fn send_message(&self, params: MessageCreateParams) -> Result<MessageReply>;
}

/// HTTP/JSON client for the conversation backend.
#[derive(Debug, Clone)]
pub struct ChatBackend {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl ChatBackend {
    /// Create a client for the backend at `base_url` with the default timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(Some(base_url.to_string()), None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .default_headers(default_headers())
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The base URL both endpoints resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, name: &str) -> Result<Url> {
        self.base_url.join(name).map_err(Error::from)
    }

    async fn post_json<B, R>(&self, name: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(name)?;
        let start = Instant::now();
        CLIENT_REQUESTS.click();

        let result = self.execute(url.clone(), body).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        match &result {
            Ok(_) => tracing::debug!(%url, "request complete"),
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                tracing::warn!(%url, error = %err, "request failed");
            }
        }
        result
    }

    async fn execute<B, R>(&self, url: Url, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        tracing::debug!(status = response.status().as_u16(), "response received");
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<R>().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(
                    format!("Timed out reading response: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else {
                Error::serialization(
                    format!("Failed to parse response: {}", e),
                    Some(Box::new(e)),
                )
            }
        })
    }

    /// Turn a non-success response into an API error carrying its body.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        match response.text().await {
            Ok(body) => Error::api(status_code, body.trim()),
            Err(e) => Error::http_client(
                format!("Failed to read error response: {}", e),
                Some(Box::new(e)),
            ),
        }
    }
}

#[async_trait::async_trait]
impl Backend for ChatBackend {
    async fn create_conversation(&self, params: ConversationCreateParams) -> Result<Conversation> {
        self.post_json(CONVERSATION_ENDPOINT, &params).await
    }

    async fn send_message(&self, params: MessageCreateParams) -> Result<MessageReply> {
        self.post_json(MESSAGE_ENDPOINT, &params).await
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Parses a base URL and makes sure relative endpoints land beneath it.
///
/// Without a trailing slash `Url::join` would replace the last path segment,
/// so `http://host/chat` must become `http://host/chat/`.
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(Error::validation(
            format!("{raw} cannot be used as a base URL"),
            Some("base_url".to_string()),
        ));
    }
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::validation(
            format!("unsupported scheme {}", url.scheme()),
            Some("base_url".to_string()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
