//! Outbound POST requests with a deadline, user agent and optional bearer token.

use bytes::Bytes;
use reqwest::{Client, Proxy, StatusCode, header};
use serde::Serialize;
use thiserror::Error;
use tokio::time::{Instant, timeout_at};
use tracing::debug;

/// User agent sent when the configuration does not provide one.
pub const DEFAULT_USER_AGENT: &str = concat!("ytapi/", env!("CARGO_PKG_VERSION"));

/// Error type for gateway requests.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The HTTP client could not be built (bad proxy URL, TLS backend failure).
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The deadline passed before the response body was read.
    #[error("request to {url} timed out")]
    TimedOut { url: String },

    /// Connection, TLS or body transfer failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
}

impl GatewayError {
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// A request body together with its content type.
#[derive(Debug, Clone)]
pub enum Body {
    /// `application/json`
    Json(Vec<u8>),
    /// `application/x-www-form-urlencoded`
    Form(String),
}

impl Body {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_vec(value).map(Self::Json)
    }

    pub fn form<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        Self::Form(encoded)
    }

    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Form(_) => "application/x-www-form-urlencoded",
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Json(data) => data,
            Self::Form(data) => data.into_bytes(),
        }
    }
}

/// Shared HTTP gateway. Cloning is cheap: the connection pool is shared.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
}

impl Gateway {
    /// Builds a gateway with a fixed user agent and an optional proxy.
    ///
    /// Without an explicit proxy, reqwest honours the `HTTP(S)_PROXY` environment variables.
    pub fn new(user_agent: &str, proxy_url: Option<&str>) -> Result<Self, GatewayError> {
        let mut builder = Client::builder().user_agent(user_agent);

        if let Some(proxy_url) = proxy_url {
            builder = builder.proxy(Proxy::all(proxy_url).map_err(GatewayError::Client)?);
        }

        let client = builder.build().map_err(GatewayError::Client)?;
        Ok(Self { client })
    }

    /// Sends a POST request and returns the raw response body.
    ///
    /// The whole exchange (connect, send, read body) must finish before `deadline`.
    pub async fn post(
        &self,
        url: &str,
        body: Body,
        bearer: Option<&str>,
        deadline: Instant,
    ) -> Result<Bytes, GatewayError> {
        let start = Instant::now();
        debug!(method = "POST", url, "request start");

        let mut request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, body.content_type())
            .body(body.into_bytes());

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let data = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, data))
        };

        let result = timeout_at(deadline, exchange).await;
        debug!(
            method = "POST",
            url,
            elapsed_ms = start.elapsed().as_millis(),
            "request done"
        );

        let (status, data) = result
            .map_err(|_| GatewayError::TimedOut {
                url: url.to_string(),
            })?
            .map_err(|source| GatewayError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                url: url.to_string(),
                status,
                body: String::from_utf8_lossy(&data).into_owned(),
            });
        }

        Ok(data)
    }
}
