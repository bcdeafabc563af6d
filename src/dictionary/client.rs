use serde::Deserialize;
use tokio::time::Instant;

use crate::cloud::Body;
use crate::context::ApiContext;
use crate::error::Error;
use crate::outcome::Outcome;

/// A word with its part of speech, as used by synonyms, meanings and examples.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Word {
    pub text: String,
    pub pos: String,
    #[serde(rename = "gen")]
    pub gender: String,
    pub fr: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Example {
    pub text: String,
    pub tr: Vec<Word>,
}

/// One translation of an article with its synonyms, meanings and examples.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Translation {
    pub text: String,
    pub pos: String,
    #[serde(rename = "gen")]
    pub gender: String,
    pub fr: u32,
    pub syn: Vec<Word>,
    pub mean: Vec<Word>,
    pub ex: Vec<Example>,
}

impl Translation {
    fn render(&self) -> String {
        let mut line = format!("\t{} ({})", self.text, self.pos);

        if !self.syn.is_empty() {
            let syn: Vec<String> = self
                .syn
                .iter()
                .map(|s| format!("{} ({})", s.text, s.pos))
                .collect();
            line.push_str(&format!("\n\tsyn: {}", syn.join(", ")));
        }

        if !self.mean.is_empty() {
            let mean: Vec<&str> = self.mean.iter().map(|m| m.text.as_str()).collect();
            line.push_str(&format!("\n\tmean: {}", mean.join(", ")));
        }

        if !self.ex.is_empty() {
            let ex: Vec<String> = self
                .ex
                .iter()
                .map(|e| {
                    let tr: Vec<&str> = e.tr.iter().map(|t| t.text.as_str()).collect();
                    format!("{}: {}", e.text, tr.join(", "))
                })
                .collect();
            line.push_str(&format!("\n\texamples: \n\t\t{}", ex.join("\n\t\t")));
        }

        line
    }
}

/// Dictionary article for one part of speech.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Article {
    pub text: String,
    pub pos: String,
    /// Transcription.
    pub ts: String,
    pub tr: Vec<Translation>,
}

impl Article {
    fn render(&self) -> String {
        let header = if self.ts.is_empty() {
            format!("{}({})", self.text, self.pos)
        } else {
            format!("{} [{}] ({})", self.text, self.ts, self.pos)
        };

        let lines: Vec<String> = self.tr.iter().map(Translation::render).collect();
        format!("{header}\n{}", lines.join("\n"))
    }
}

/// Dictionary lookup result.
///
/// API reference: <https://yandex.com/dev/dictionary/doc/dg/reference/lookup.html>
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Response {
    pub def: Vec<Article>,
}

impl Outcome for Response {
    fn render(&self) -> String {
        let articles: Vec<String> = self.def.iter().map(Article::render).collect();
        articles.join("\n")
    }

    fn is_present(&self) -> bool {
        !self.def.is_empty()
    }
}

/// Looks up a single word in the dictionary.
pub async fn lookup(
    ctx: &ApiContext,
    from: &str,
    to: &str,
    text: &str,
    deadline: Instant,
) -> Result<Response, Error> {
    let direction = format!("{from}-{to}");
    let body = Body::form([
        ("lang", direction.as_str()),
        ("text", text),
        ("key", ctx.dictionary_key.as_str()),
    ]);

    let data = ctx
        .gateway
        .post(&ctx.endpoints.dictionary, body, None, deadline)
        .await
        .map_err(Error::request("dictionary"))?;

    serde_json::from_slice(&data).map_err(Error::decode("dictionary"))
}
