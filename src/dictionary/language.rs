//! Dictionary translation directions.
//!
//! API reference: <https://yandex.com/dev/dictionary/doc/dg/reference/getLangs.html>

use tokio::time::Instant;

use crate::cloud::Body;
use crate::context::ApiContext;
use crate::registry::{LanguageSet, RegistryError, RegistryKind};

/// Sorted list of supported directions such as `"en-ru"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryLanguages {
    directions: Vec<String>,
}

impl DictionaryLanguages {
    pub fn new(directions: impl IntoIterator<Item = String>) -> Self {
        let mut directions: Vec<String> = directions
            .into_iter()
            .map(|d| d.to_lowercase())
            .collect();
        directions.sort_unstable();
        Self { directions }
    }

    pub async fn load(ctx: &ApiContext, deadline: Instant) -> Result<Self, RegistryError> {
        let body = Body::form([("key", ctx.dictionary_key.as_str())]);

        let data = ctx
            .gateway
            .post(&ctx.endpoints.dictionary_languages, body, None, deadline)
            .await
            .map_err(|source| RegistryError::Fetch {
                kind: RegistryKind::Dictionary,
                source,
            })?;

        let directions: Vec<String> =
            serde_json::from_slice(&data).map_err(|source| RegistryError::Decode {
                kind: RegistryKind::Dictionary,
                source,
            })?;

        Ok(Self::new(directions))
    }
}

impl LanguageSet for DictionaryLanguages {
    fn supports(&self, from: &str, to: &str) -> bool {
        let direction = format!("{from}-{to}").to_lowercase();
        self.directions.binary_search(&direction).is_ok()
    }

    fn list(&self) -> String {
        self.directions.join(", ")
    }

    fn describe(&self) -> String {
        format!("Length={}\n{}", self.directions.len(), self.list())
    }
}
