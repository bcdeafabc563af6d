mod credentials;
mod gateway;
mod token_cache;

pub use credentials::{Account, CredentialError, CredentialStore};
pub use gateway::{Body, DEFAULT_USER_AGENT, Gateway, GatewayError};
pub use token_cache::{CacheError, CachedToken};
