//! Service endpoints and the shared API context.

use serde::Deserialize;

use crate::cloud::{CredentialStore, Gateway};

/// URLs of every remote operation. Each one can be overridden in the
/// `[endpoints]` table of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub token: String,
    pub spelling: String,
    pub translate: String,
    pub detect: String,
    pub translation_languages: String,
    pub dictionary: String,
    pub dictionary_languages: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token: "https://iam.api.cloud.yandex.net/iam/v1/tokens".to_string(),
            spelling: "https://speller.yandex.net/services/spellservice.json/checkText"
                .to_string(),
            translate: "https://translate.api.cloud.yandex.net/translate/v2/translate"
                .to_string(),
            detect: "https://translate.api.cloud.yandex.net/translate/v2/detect".to_string(),
            translation_languages: "https://translate.api.cloud.yandex.net/translate/v2/languages"
                .to_string(),
            dictionary: "https://dictionary.yandex.net/api/v1/dicservice.json/lookup".to_string(),
            dictionary_languages: "https://dictionary.yandex.net/api/v1/dicservice.json/getLangs"
                .to_string(),
        }
    }
}

impl Endpoints {
    /// Points every endpoint at one base URL, keeping the default paths.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            token: format!("{base}/iam/v1/tokens"),
            spelling: format!("{base}/services/spellservice.json/checkText"),
            translate: format!("{base}/translate/v2/translate"),
            detect: format!("{base}/translate/v2/detect"),
            translation_languages: format!("{base}/translate/v2/languages"),
            dictionary: format!("{base}/api/v1/dicservice.json/lookup"),
            dictionary_languages: format!("{base}/api/v1/dicservice.json/getLangs"),
        }
    }
}

/// Everything a remote operation needs, created once per run and shared
/// with concurrent tasks behind an `Arc`.
#[derive(Debug)]
pub struct ApiContext {
    pub gateway: Gateway,
    pub credentials: CredentialStore,
    pub endpoints: Endpoints,
    /// Cloud folder the translation requests are billed to.
    pub folder_id: String,
    /// API key of the dictionary service.
    pub dictionary_key: String,
}
