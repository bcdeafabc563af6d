//! Spelling check.
//!
//! API reference: <https://yandex.ru/dev/speller/doc/ru/reference/checkText>

use serde::Deserialize;
use tokio::time::Instant;

use crate::cloud::Body;
use crate::context::ApiContext;
use crate::error::Error;
use crate::outcome::Outcome;

/// Languages the speller supports; known without a remote call.
pub const SPELLING_LANGUAGES: &[&str] = &["en", "ru", "uk"];

/// Speller option flags: ignore digits, ignore URLs, find repeated words.
const OPTIONS: &str = "518";

pub fn is_supported(language: &str) -> bool {
    SPELLING_LANGUAGES.contains(&language)
}

/// One reported spelling error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub word: String,
    /// Suggested replacements.
    #[serde(default, rename = "s")]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub pos: u32,
    #[serde(default)]
    pub row: u32,
    #[serde(default)]
    pub col: u32,
    #[serde(default)]
    pub len: u32,
}

impl Item {
    fn is_present(&self) -> bool {
        !self.word.is_empty() || !self.suggestions.is_empty()
    }

    fn render(&self) -> String {
        format!("{} -> [{}]", self.word, self.suggestions.join(" "))
    }
}

/// Spelling check result: empty when no errors were found.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Response {
    pub items: Vec<Item>,
}

impl Outcome for Response {
    fn render(&self) -> String {
        if self.items.is_empty() {
            return String::new();
        }

        let items: Vec<String> = self
            .items
            .iter()
            .filter(|item| item.is_present())
            .map(Item::render)
            .collect();

        format!("Spelling: \n\t{}", items.join("\n\t"))
    }

    fn is_present(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Checks the spelling of `text` written in `language`.
pub async fn check(
    ctx: &ApiContext,
    language: &str,
    text: &str,
    deadline: Instant,
) -> Result<Response, Error> {
    let body = Body::form([
        ("lang", language),
        ("text", text),
        ("format", "plain"),
        ("options", OPTIONS),
    ]);

    let data = ctx
        .gateway
        .post(&ctx.endpoints.spelling, body, None, deadline)
        .await
        .map_err(Error::request("spelling"))?;

    serde_json::from_slice(&data).map_err(Error::decode("spelling"))
}
