//! Thin client for the recipe API.
//!
//! Every endpoint answers with an envelope:
//! `{"success": true, "data": ...}` or `{"success": false, "error": {"message"?, "data"?}}`.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{Config, ensure_trailing_slash};
use crate::error::{ApiError, ApiErrorBody};

mod transport;

pub use transport::{ApiRequest, HttpTransport, RawResponse, Transport, TransportError};

/// A parsed envelope. The server answered; it may still have refused.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success { data: T, message: Option<String> },
    Failure(ApiErrorBody),
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    pub fn into_result(self, endpoint: &str) -> Result<T, ApiError> {
        match self {
            Envelope::Success { data, .. } => Ok(data),
            Envelope::Failure(error) => Err(ApiError::Api {
                endpoint: endpoint.to_owned(),
                error,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: Url, transport: impl Transport + 'static) -> Self {
        Self::with_transport(base_url, Arc::new(transport))
    }

    pub fn with_transport(mut base_url: Url, transport: Arc<dyn Transport>) -> Self {
        ensure_trailing_slash(&mut base_url);
        Self {
            base_url,
            transport,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let base_url = config.server_address()?;
        Ok(Self::new(base_url, HttpTransport::new()))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `endpoint` under the base URL. A leading `/` is ignored so
    /// `/weekly` and `weekly` land on the same path.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, ApiError> {
        let relative = endpoint.strip_prefix('/').unwrap_or(endpoint);
        self.base_url
            .join(relative)
            .map_err(|source| ApiError::InvalidEndpoint {
                endpoint: endpoint.to_owned(),
                source,
            })
    }

    /// Sends a request and parses the envelope without judging it.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<String>,
    ) -> Result<Envelope<T>, ApiError> {
        self.send(method, endpoint, body, None).await
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::GET, endpoint, None)
            .await?
            .into_result(endpoint)
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(endpoint, body)?;
        self.request(Method::POST, endpoint, Some(body))
            .await?
            .into_result(endpoint)
    }

    /// `post` with an `Authorization: Bearer` header.
    pub async fn post_authorized<T, B>(
        &self,
        endpoint: &str,
        body: &B,
        token: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(endpoint, body)?;
        self.send(Method::POST, endpoint, Some(body), Some(token.to_owned()))
            .await?
            .into_result(endpoint)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<String>,
        bearer_token: Option<String>,
    ) -> Result<Envelope<T>, ApiError> {
        let url = self.endpoint_url(endpoint)?;
        if body.is_some() && (method == Method::GET || method == Method::HEAD) {
            return Err(ApiError::BodyNotAllowed { method });
        }

        tracing::debug!(%method, %url, "api request");
        let response = self
            .transport
            .send(ApiRequest {
                method,
                url,
                body,
                bearer_token,
            })
            .await
            .map_err(|err| {
                tracing::warn!(endpoint, error = %err, "api request failed");
                ApiError::Transport {
                    message: err.message,
                }
            })?;
        tracing::debug!(endpoint, status = response.status, "api response");

        parse_envelope(endpoint, response.body)
    }
}

fn encode_body<B: Serialize + ?Sized>(endpoint: &str, body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|source| ApiError::Serialize {
        endpoint: endpoint.to_owned(),
        source,
    })
}

fn parse_envelope<T: DeserializeOwned>(
    endpoint: &str,
    raw: String,
) -> Result<Envelope<T>, ApiError> {
    let envelope: RawEnvelope = match serde_json::from_str(&raw) {
        Ok(envelope) => envelope,
        Err(source) => {
            return Err(ApiError::InvalidResponse {
                endpoint: endpoint.to_owned(),
                raw,
                source,
            });
        }
    };

    if !envelope.success {
        let error = envelope.error.unwrap_or_default();
        tracing::debug!(endpoint, message = ?error.message, "api returned failure");
        return Ok(Envelope::Failure(error));
    }

    let data = envelope.data.unwrap_or(serde_json::Value::Null);
    match T::deserialize(data) {
        Ok(data) => Ok(Envelope::Success {
            data,
            message: envelope.message,
        }),
        Err(source) => Err(ApiError::InvalidResponse {
            endpoint: endpoint.to_owned(),
            raw,
            source,
        }),
    }
}
