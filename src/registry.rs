//! Language capability registries of the dictionary and translation services.

use std::fmt;

use thiserror::Error;
use tokio::time::Instant;

use crate::cloud::{CredentialError, GatewayError};
use crate::context::ApiContext;
use crate::{dictionary, translation};

/// Error type for language list loading.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to get IAM token for language list: {0}")]
    Token(#[from] CredentialError),

    #[error("failed to encode {kind} languages request: {source}")]
    Encode {
        kind: RegistryKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to fetch {kind} languages: {source}")]
    Fetch {
        kind: RegistryKind,
        #[source]
        source: GatewayError,
    },

    #[error("failed to decode {kind} languages: {source}")]
    Decode {
        kind: RegistryKind,
        #[source]
        source: serde_json::Error,
    },
}

impl RegistryError {
    pub const fn is_timeout(&self) -> bool {
        match self {
            Self::Token(e) => e.is_timeout(),
            Self::Fetch { source, .. } => source.is_timeout(),
            Self::Encode { .. } | Self::Decode { .. } => false,
        }
    }
}

/// Which service a language set describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Dictionary,
    Translation,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dictionary => f.write_str("dictionary"),
            Self::Translation => f.write_str("translation"),
        }
    }
}

/// Languages or directions a remote service supports.
pub trait LanguageSet: Send + Sync {
    /// Whether translating from `from` to `to` is supported.
    fn supports(&self, from: &str, to: &str) -> bool;

    /// Comma-separated list of every known entry.
    fn list(&self) -> String;

    /// Human-readable summary.
    fn describe(&self) -> String;
}

/// Fetches the language set of one service.
pub async fn load(
    kind: RegistryKind,
    ctx: &ApiContext,
    deadline: Instant,
) -> Result<Box<dyn LanguageSet>, RegistryError> {
    match kind {
        RegistryKind::Dictionary => {
            let languages = dictionary::DictionaryLanguages::load(ctx, deadline).await?;
            Ok(Box::new(languages))
        }
        RegistryKind::Translation => {
            let languages = translation::TranslationLanguages::load(ctx, deadline).await?;
            Ok(Box::new(languages))
        }
    }
}
