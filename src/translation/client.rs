use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::cloud::Body;
use crate::context::ApiContext;
use crate::error::Error;
use crate::outcome::Outcome;

#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

// Borrowed view so the request is serialized without cloning the text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateBody<'a> {
    #[serde(rename = "folder_id")]
    folder_id: &'a str,
    texts: [&'a str; 1],
    source_language_code: &'a str,
    target_language_code: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatedText {
    pub text: String,
    pub detected_language_code: String,
}

/// Machine translation result.
///
/// API reference: <https://cloud.yandex.com/en/docs/translate/api-ref/Translation/translate>
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Response {
    pub translations: Vec<TranslatedText>,
}

impl Outcome for Response {
    fn render(&self) -> String {
        self.translations
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn is_present(&self) -> bool {
        !self.render().is_empty()
    }
}

/// Translates a text; requires an IAM token.
pub async fn translate(
    ctx: &ApiContext,
    request: &TranslationRequest,
    deadline: Instant,
) -> Result<Response, Error> {
    let token = ctx.credentials.ensure_token(deadline).await?;

    let body = Body::json(&TranslateBody {
        folder_id: &ctx.folder_id,
        texts: [&request.text],
        source_language_code: &request.source_language,
        target_language_code: &request.target_language,
    })
    .map_err(Error::encode("translation"))?;

    let data = ctx
        .gateway
        .post(&ctx.endpoints.translate, body, Some(&token), deadline)
        .await
        .map_err(Error::request("translation"))?;

    serde_json::from_slice(&data).map_err(Error::decode("translation"))
}
