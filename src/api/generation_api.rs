use crate::error::{DeskError, IsRetryable};
use crate::types::gemini::{GeminiResponse, GenerateContentRequest};
use backon::{ExponentialBuilder, Retryable};
use std::time::Duration;
use tracing::warn;
use url::Url;

pub struct GenerationApi;

impl GenerationApi {
    /// `{base}/v1beta/models/{model}:generateContent`
    pub fn generate_url(base: &Url, model: &str) -> Result<Url, DeskError> {
        let path = format!("v1beta/models/{model}:generateContent");
        Ok(base.join(&path)?)
    }

    pub async fn try_generate(
        client: reqwest::Client,
        url: &Url,
        api_key: impl AsRef<str>,
        retry_policy: ExponentialBuilder,
        body: &GenerateContentRequest,
    ) -> Result<GeminiResponse, DeskError> {
        (|| async {
            let resp = client
                .post(url.clone())
                .header("x-goog-api-key", api_key.as_ref())
                .json(body)
                .send()
                .await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(DeskError::UpstreamStatus(status));
            }
            Ok(resp.json::<GeminiResponse>().await?)
        })
        .retry(retry_policy)
        .when(|e: &DeskError| e.is_retryable())
        .notify(|err, dur: Duration| {
            warn!(error = %err, delay = ?dur, "generateContent retrying");
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_url_keeps_model_suffix() {
        let base = Url::parse("https://generativelanguage.googleapis.com/").unwrap();
        let url = GenerationApi::generate_url(&base, "gemini-2.5-flash").unwrap();
        assert_eq!(url.host_str(), Some("generativelanguage.googleapis.com"));
        assert_eq!(
            url.path(),
            "/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
