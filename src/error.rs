//! Top-level error type of a translation run.

use thiserror::Error;

use crate::cloud::{CredentialError, GatewayError};
use crate::direction::DirectionError;
use crate::registry::RegistryError;

/// Error type encompassing every failure of a translation run.
#[derive(Debug, Error)]
pub enum Error {
    /// The IAM token could not be obtained.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// A language list could not be loaded.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The translation direction is malformed or unsupported.
    #[error(transparent)]
    Direction(#[from] DirectionError),

    /// A remote operation failed.
    #[error("{operation} request failed: {source}")]
    Request {
        operation: &'static str,
        #[source]
        source: GatewayError,
    },

    /// A request body could not be serialized.
    #[error("failed to encode {operation} request: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A remote operation answered with an unexpected body.
    #[error("failed to decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The run deadline passed while requests were still in flight.
    #[error("timed out waiting for {pending} request(s)")]
    TimedOut { pending: usize },

    /// A concurrent task ended without reporting a result.
    #[error("{0} task stopped without a result")]
    TaskLost(String),

    /// Several concurrent operations failed; every message is kept.
    #[error("{}", join_messages(.0))]
    Joined(Vec<Error>),
}

impl Error {
    pub(crate) fn request(operation: &'static str) -> impl Fn(GatewayError) -> Self {
        move |source| Self::Request { operation, source }
    }

    pub(crate) fn encode(operation: &'static str) -> impl Fn(serde_json::Error) -> Self {
        move |source| Self::Encode { operation, source }
    }

    pub(crate) fn decode(operation: &'static str) -> impl Fn(serde_json::Error) -> Self {
        move |source| Self::Decode { operation, source }
    }

    /// Whether this error, or any error joined into it, is a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::TimedOut { .. } => true,
            Self::Request { source, .. } => source.is_timeout(),
            Self::Credential(e) => e.is_timeout(),
            Self::Registry(e) => e.is_timeout(),
            Self::Joined(errors) => errors.iter().any(Self::is_timeout),
            Self::Direction(_) | Self::Encode { .. } | Self::Decode { .. } | Self::TaskLost(_) => {
                false
            }
        }
    }

    /// Combines collected errors: none, the single error verbatim, or a joined error.
    pub fn join(mut errors: Vec<Self>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Joined(errors)),
        }
    }
}

fn join_messages(errors: &[Error]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
