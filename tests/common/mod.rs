//! Helpers shared by the integration tests: a context wired to a mock server.
#![allow(dead_code, clippy::unwrap_used)]

use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ytapi_cli::cloud::{Account, CachedToken, CredentialStore, Gateway};
use ytapi_cli::context::{ApiContext, Endpoints};

pub const TOKEN: &str = "t1.test-iam-token";
pub const FOLDER_ID: &str = "b1g-test-folder";
pub const DICTIONARY_KEY: &str = "dict.1.1.test";

pub fn key_file() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/test_key.pem")
}

pub fn account() -> Account {
    Account {
        service_account_id: "aje-service-account".to_string(),
        key_id: "aje-key-id".to_string(),
        key_file: key_file(),
    }
}

pub fn deadline(after: Duration) -> Instant {
    Instant::now() + after
}

fn build(
    server: &MockServer,
    cache: Option<(&Path, bool)>,
    token: Option<CachedToken>,
) -> ApiContext {
    let gateway = Gateway::new("ytapi-test", None).unwrap();
    let endpoints = Endpoints::with_base(&server.uri());

    let mut credentials = CredentialStore::new(account(), gateway.clone(), endpoints.token.clone());
    if let Some((cache_path, read)) = cache {
        credentials = credentials.with_cache(cache_path, read);
    }
    if let Some(token) = token {
        credentials = credentials.with_token(token);
    }

    ApiContext {
        gateway,
        credentials,
        endpoints,
        folder_id: FOLDER_ID.to_string(),
        dictionary_key: DICTIONARY_KEY.to_string(),
    }
}

/// Context without a durable token cache.
pub fn context(server: &MockServer) -> ApiContext {
    build(server, None, None)
}

/// Context with a token cache file; `read` false mimics `--reset-cache`.
pub fn context_with_cache(server: &MockServer, cache_path: &Path, read: bool) -> ApiContext {
    build(server, Some((cache_path, read)), None)
}

/// Context whose credential store already holds `token` in memory.
pub fn context_with_token(
    server: &MockServer,
    cache_path: &Path,
    token: CachedToken,
) -> ApiContext {
    build(server, Some((cache_path, true)), Some(token))
}

/// Token endpoint answering [`TOKEN`], expected to be hit `times` times.
pub async fn mount_token(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/iam/v1/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "iamToken": TOKEN,
            "expiresAt": "2099-01-01T00:00:00Z"
        })))
        .expect(times)
        .mount(server)
        .await;
}
