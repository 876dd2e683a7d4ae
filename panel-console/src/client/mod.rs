use crate::config::ApiConfig;
use crate::list::params::{normalize_params, ParamsError};
use crate::list::{PageRequest, PageResult};
use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

// Reexport modules
pub mod announcement;
pub mod redemption;
pub mod subscribe;
pub mod system;
pub mod user;

/// Envelope codes the backend uses for a successful call
const SUCCESS_CODES: [i64; 2] = [0, 200];

/// HTTP client for the panel backend.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct ConsoleClient {
    http: Client,
    base_url: String,
}

impl ConsoleClient {
    /// Build a client from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.url)?;

        let mut headers = HeaderMap::new();
        if !config.token.is_empty() {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", config.token))?,
            );
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .default_headers(headers)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()?;

        let prefix = config.prefix.trim_matches('/');
        let mut base_url = base.as_str().trim_end_matches('/').to_string();
        if !prefix.is_empty() {
            base_url.push('/');
            base_url.push_str(prefix);
        }

        Ok(Self { http, base_url })
    }

    /// Absolute URL of an endpoint
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        format!("{}/{}", self.base_url, endpoint)
    }

    /// GET a paginated list endpoint with normalized filter parameters
    pub(crate) async fn get_page<P, F>(
        &self,
        endpoint: &str,
        page: PageRequest,
        filters: &F,
    ) -> Result<Option<P>, ClientError>
    where
        P: DeserializeOwned,
        F: Serialize,
    {
        let params = normalize_params(page, filters)?;
        let request = self
            .http
            .get(self.endpoint_url(endpoint))
            .query(&params);
        Ok(self.execute::<P>(request, endpoint).await?.data)
    }

    /// GET an endpoint without parameters
    pub(crate) async fn get<R: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<ApiEnvelope<R>, ClientError> {
        let request = self.http.get(self.endpoint_url(endpoint));
        self.execute(request, endpoint).await
    }

    /// Send a JSON body with the given method
    pub(crate) async fn send_json<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<ApiEnvelope<R>, ClientError> {
        let request = self
            .http
            .request(method, self.endpoint_url(endpoint))
            .json(body);
        self.execute(request, endpoint).await
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<ApiEnvelope<R>, ClientError> {
        debug!("Sending request to {}", endpoint);
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            // Business errors carry a message even on non-2xx responses
            let envelope = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&body).ok();
            let code = envelope.as_ref().and_then(|e| e.code);
            let message = envelope.and_then(ApiEnvelope::into_message);
            error!("Request to {} failed with status {}", endpoint, status);
            return Err(match message {
                Some(message) => ClientError::Business {
                    status,
                    code,
                    message,
                },
                None => ClientError::InvalidStatus(status),
            });
        }

        if body.is_empty() {
            return Ok(ApiEnvelope::default());
        }

        let envelope: ApiEnvelope<R> = serde_json::from_slice(&body)?;
        if let Some(code) = envelope.code {
            if !SUCCESS_CODES.contains(&code) {
                let message = envelope
                    .into_message()
                    .unwrap_or_else(|| format!("request failed with code {}", code));
                error!("Request to {} rejected: {} ({})", endpoint, message, code);
                return Err(ClientError::Business {
                    status,
                    code: Some(code),
                    message,
                });
            }
        }
        Ok(envelope)
    }
}

/// Standard backend response wrapper: `{ code, msg, data }`.
/// Some endpoints name the message `message`; either spelling is accepted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ApiEnvelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Default for ApiEnvelope<T> {
    fn default() -> Self {
        Self {
            code: None,
            msg: None,
            message: None,
            data: None,
        }
    }
}

impl<T> ApiEnvelope<T> {
    /// First non-blank message, `msg` before `message`
    pub fn into_message(self) -> Option<String> {
        self.msg
            .into_iter()
            .chain(self.message)
            .find(|m| !m.trim().is_empty())
    }
}

/// Payload shape shared by the admin list endpoints: `{ list, total }`
#[derive(Debug, Deserialize, Clone)]
pub struct ListPayload<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

impl<T> From<Option<ListPayload<T>>> for PageResult<T> {
    fn from(payload: Option<ListPayload<T>>) -> Self {
        match payload {
            Some(payload) => PageResult::new(payload.list, payload.total),
            None => PageResult::empty(),
        }
    }
}

/// Errors that can occur when talking to the backend
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Failed to build request: {0}")]
    BuildError(#[from] InvalidHeaderValue),
    #[error("Failed to send request: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Request failed with status: {0}")]
    InvalidStatus(StatusCode),
    #[error("{message}")]
    Business {
        status: StatusCode,
        code: Option<i64>,
        message: String,
    },
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid list parameters: {0}")]
    Params(#[from] ParamsError),
}

impl ClientError {
    /// Message suitable for a transient notification
    pub fn message(&self) -> String {
        match self {
            ClientError::Business { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the error came from the network layer rather than the backend
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::RequestError(_))
    }
}
