//! Durable IAM token cache.
//!
//! The cache is a small JSON file holding the last issued token and its
//! expiry. A missing file is simply "no cache"; a file that exists but cannot
//! be read or parsed is reported, never silently ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fs::atomic_write;

/// Error type for token cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read token cache {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("token cache {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write token cache {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An access token with the instant it stops being valid.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// A token is usable strictly before its expiry instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && now < self.expires_at
    }

    /// Reads a cached token, returning `None` when the file is absent or the
    /// token has expired at `now`.
    pub fn read(path: &Path, now: DateTime<Utc>) -> Result<Option<Self>, CacheError> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let cached: Self =
            serde_json::from_slice(&data).map_err(|source| CacheError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(cached.is_valid_at(now).then_some(cached))
    }

    /// Writes the token atomically with owner-only permissions.
    pub fn write(&self, path: &Path) -> Result<(), CacheError> {
        let write_err = |source| CacheError::Write {
            path: path.to_path_buf(),
            source,
        };

        let contents = serde_json::to_string_pretty(self)
            .map_err(io::Error::other)
            .map_err(write_err)?;
        atomic_write(path, &contents).map_err(write_err)
    }
}

// The token itself never goes to logs.
impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
