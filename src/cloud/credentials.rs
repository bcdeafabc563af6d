//! Service account credentials and the IAM token lifecycle.
//!
//! [`CredentialStore::ensure_token`] is the single entry point. It returns
//! the in-memory token when one is valid, then tries the durable cache, and
//! only then signs a fresh JWT assertion and exchanges it for a new token.
//! The whole sequence runs under one async mutex, so concurrent callers wait
//! for the exchange in flight instead of starting their own.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::gateway::{Body, Gateway, GatewayError};
use super::token_cache::{CacheError, CachedToken};

/// Lifetime of a signed assertion and the fallback lifetime of an issued token.
const TOKEN_TTL_SECONDS: i64 = 3600;

/// Error type for credential operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The private key file could not be read.
    #[error("failed to read private key {}: {source}", .path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The private key file is not a valid PEM-encoded RSA key.
    #[error("failed to parse private key {}: {source}", .path.display())]
    KeyParse {
        path: PathBuf,
        #[source]
        source: jsonwebtoken::errors::Error,
    },

    /// The assertion could not be signed with the loaded key.
    #[error("failed to sign token assertion: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The token endpoint rejected the assertion or could not be reached.
    #[error("token exchange failed: {0}")]
    Exchange(#[source] GatewayError),

    /// The exchange request body could not be encoded.
    #[error("failed to encode token request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The token endpoint answered with an unexpected body.
    #[error("failed to decode token response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The durable cache exists but is unusable.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl CredentialError {
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Exchange(e) if e.is_timeout())
    }
}

/// Static service account identity used to sign assertions.
#[derive(Debug, Clone)]
pub struct Account {
    pub service_account_id: String,
    pub key_id: String,
    pub key_file: PathBuf,
}

#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
}

impl Account {
    fn load_key(&self) -> Result<EncodingKey, CredentialError> {
        let pem = std::fs::read(&self.key_file).map_err(|source| CredentialError::KeyRead {
            path: self.key_file.clone(),
            source,
        })?;

        EncodingKey::from_rsa_pem(&pem).map_err(|source| CredentialError::KeyParse {
            path: self.key_file.clone(),
            source,
        })
    }

    /// Signs a single-use PS256 assertion valid for one hour from `issued_at`.
    pub fn sign_assertion(
        &self,
        audience: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, CredentialError> {
        let key = self.load_key()?;

        let mut header = Header::new(Algorithm::PS256);
        header.kid = Some(self.key_id.clone());

        let claims = Claims {
            iss: self.service_account_id.clone(),
            aud: audience.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(TOKEN_TTL_SECONDS)).timestamp(),
        };

        jsonwebtoken::encode(&header, &claims, &key).map_err(CredentialError::Signing)
    }
}

#[derive(Serialize)]
struct ExchangeRequest<'a> {
    jwt: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeResponse {
    iam_token: String,
    #[serde(default)]
    expires_at: Option<String>,
}

impl ExchangeResponse {
    fn into_cached(self, issued_at: DateTime<Utc>) -> CachedToken {
        let expires_at = self
            .expires_at
            .as_deref()
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map_or_else(
                || issued_at + Duration::seconds(TOKEN_TTL_SECONDS),
                |value| value.with_timezone(&Utc),
            );

        CachedToken::new(self.iam_token, expires_at)
    }
}

/// Where the durable token cache lives and whether it may be read this run.
#[derive(Debug, Clone)]
struct CachePolicy {
    path: PathBuf,
    read: bool,
}

/// Owner of the IAM token for one process run.
#[derive(Debug)]
pub struct CredentialStore {
    account: Account,
    token_url: String,
    gateway: Gateway,
    cache: Option<CachePolicy>,
    token: Mutex<Option<CachedToken>>,
}

impl CredentialStore {
    pub fn new(account: Account, gateway: Gateway, token_url: impl Into<String>) -> Self {
        Self {
            account,
            token_url: token_url.into(),
            gateway,
            cache: None,
            token: Mutex::new(None),
        }
    }

    /// Enables the durable cache. With `read_existing` false the file is only
    /// written after a fresh exchange, never consulted.
    #[must_use]
    pub fn with_cache(mut self, path: impl Into<PathBuf>, read_existing: bool) -> Self {
        self.cache = Some(CachePolicy {
            path: path.into(),
            read: read_existing,
        });
        self
    }

    /// Seeds the in-memory token.
    #[must_use]
    pub fn with_token(self, token: CachedToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
            ..self
        }
    }

    /// Returns a valid access token, issuing a new one only when needed.
    pub async fn ensure_token(&self, deadline: Instant) -> Result<String, CredentialError> {
        let mut current = self.token.lock().await;
        let now = Utc::now();

        if let Some(token) = current.as_ref().filter(|t| t.is_valid_at(now)) {
            return Ok(token.token.clone());
        }

        if let Some(cache) = self.cache.as_ref().filter(|c| c.read)
            && let Some(cached) = read_cache(cache.path.clone(), now).await?
        {
            debug!(path = %cache.path.display(), expires_at = %cached.expires_at, "using cached token");
            let value = cached.token.clone();
            *current = Some(cached);
            return Ok(value);
        }

        let issued = self.exchange(now, deadline).await?;

        if let Some(cache) = &self.cache
            && let Err(e) = write_cache(cache.path.clone(), issued.clone()).await
        {
            warn!("can't save token cache: {e}");
        }

        let value = issued.token.clone();
        *current = Some(issued);
        Ok(value)
    }

    async fn exchange(
        &self,
        issued_at: DateTime<Utc>,
        deadline: Instant,
    ) -> Result<CachedToken, CredentialError> {
        let jwt = self.account.sign_assertion(&self.token_url, issued_at)?;
        let body = Body::json(&ExchangeRequest { jwt: &jwt }).map_err(CredentialError::Encode)?;

        let data = self
            .gateway
            .post(&self.token_url, body, None, deadline)
            .await
            .map_err(CredentialError::Exchange)?;

        let response: ExchangeResponse =
            serde_json::from_slice(&data).map_err(CredentialError::Decode)?;
        let token = response.into_cached(issued_at);

        debug!(expires_at = %token.expires_at, "issued new IAM token");
        Ok(token)
    }
}

// Cache file IO runs on the blocking pool while the token mutex is held.
async fn read_cache(
    path: PathBuf,
    now: DateTime<Utc>,
) -> Result<Option<CachedToken>, CacheError> {
    let target = path.clone();
    tokio::task::spawn_blocking(move || CachedToken::read(&target, now))
        .await
        .map_err(|e| CacheError::Read {
            path,
            source: io::Error::other(e),
        })?
}

async fn write_cache(path: PathBuf, token: CachedToken) -> Result<(), CacheError> {
    let target = path.clone();
    tokio::task::spawn_blocking(move || token.write(&target))
        .await
        .map_err(|e| CacheError::Write {
            path,
            source: io::Error::other(e),
        })?
}
