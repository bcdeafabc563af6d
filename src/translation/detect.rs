use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use crate::cloud::Body;
use crate::context::ApiContext;
use crate::error::Error;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectBody<'a> {
    #[serde(rename = "folder_id")]
    folder_id: &'a str,
    text: &'a str,
    language_code_hints: [&'a str; 0],
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DetectResponse {
    language_code: String,
}

/// Asks the translation service which language `text` is written in.
///
/// Returns an empty string when the service could not tell.
///
/// API reference: <https://cloud.yandex.com/en/docs/translate/api-ref/Translation/detectLanguage>
pub async fn detect_language(
    ctx: &ApiContext,
    text: &str,
    deadline: Instant,
) -> Result<String, Error> {
    let token = ctx.credentials.ensure_token(deadline).await?;

    let body = Body::json(&DetectBody {
        folder_id: &ctx.folder_id,
        text,
        language_code_hints: [],
    })
    .map_err(Error::encode("language detection"))?;

    let data = ctx
        .gateway
        .post(&ctx.endpoints.detect, body, Some(&token), deadline)
        .await
        .map_err(Error::request("language detection"))?;

    let response: DetectResponse =
        serde_json::from_slice(&data).map_err(Error::decode("language detection"))?;

    debug!(language = %response.language_code, "detected language");
    Ok(response.language_code)
}
