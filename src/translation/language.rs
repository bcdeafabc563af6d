//! Languages supported by the translation service.
//!
//! API reference: <https://cloud.yandex.com/en/docs/translate/api-ref/Translation/listLanguages>

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tokio::time::Instant;

use crate::cloud::Body;
use crate::context::ApiContext;
use crate::registry::{LanguageSet, RegistryError, RegistryKind};

/// Number of columns in [`TranslationLanguages::describe`].
const COLUMNS: usize = 3;
/// Width of one column in [`TranslationLanguages::describe`].
const COLUMN_WIDTH: usize = 25;

/// Language code with its English name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Language {
    pub code: String,
    #[serde(default)]
    pub name: String,
}

impl Language {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.name)
    }
}

#[derive(Serialize)]
struct LanguagesRequest<'a> {
    folder_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct LanguagesResponse {
    #[serde(default)]
    languages: Vec<Language>,
}

/// Languages sorted by code, plus a case-insensitive code index.
#[derive(Debug, Clone, Default)]
pub struct TranslationLanguages {
    languages: Vec<Language>,
    codes: HashSet<String>,
}

impl TranslationLanguages {
    pub fn new(mut languages: Vec<Language>) -> Self {
        languages.sort_by(|a, b| a.code.cmp(&b.code));
        let codes = languages.iter().map(|l| l.code.to_lowercase()).collect();
        Self { languages, codes }
    }

    /// Loads the language list; requires an IAM token.
    pub async fn load(ctx: &ApiContext, deadline: Instant) -> Result<Self, RegistryError> {
        let token = ctx.credentials.ensure_token(deadline).await?;
        let body = Body::json(&LanguagesRequest {
            folder_id: &ctx.folder_id,
        })
        .map_err(|source| RegistryError::Encode {
            kind: RegistryKind::Translation,
            source,
        })?;

        let data = ctx
            .gateway
            .post(
                &ctx.endpoints.translation_languages,
                body,
                Some(&token),
                deadline,
            )
            .await
            .map_err(|source| RegistryError::Fetch {
                kind: RegistryKind::Translation,
                source,
            })?;

        let response: LanguagesResponse =
            serde_json::from_slice(&data).map_err(|source| RegistryError::Decode {
                kind: RegistryKind::Translation,
                source,
            })?;

        Ok(Self::new(response.languages))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(&code.to_lowercase())
    }
}

impl LanguageSet for TranslationLanguages {
    fn supports(&self, from: &str, to: &str) -> bool {
        self.contains(from) && self.contains(to)
    }

    fn list(&self) -> String {
        self.languages
            .iter()
            .map(|l| l.code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Lays the languages out column-major in three padded columns.
    fn describe(&self) -> String {
        let count = self.languages.len();
        let rows = count.div_ceil(COLUMNS);

        (0..rows)
            .map(|row| {
                (0..COLUMNS)
                    .map(|column| row + column * rows)
                    .take_while(|&index| index < count)
                    .map(|index| {
                        let cell = self.languages[index].to_string();
                        format!("{cell:<COLUMN_WIDTH$}")
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
