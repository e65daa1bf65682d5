use crate::api::generation_api::GenerationApi;
use crate::config::Config;
use crate::error::DeskError;
use crate::types::gemini::{GeminiResponse, GenerateContentRequest};
use async_trait::async_trait;
use backon::ExponentialBuilder;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const TITLE_PROMPT: &str = "Suggest one short, concrete to-do item for an airline \
operations desk. Reply with the title only, no quotes, at most eight words.";

/// Headroom over the eight-word answer.
const TITLE_MAX_OUTPUT_TOKENS: u32 = 256;

const GENERATIONS_PER_MINUTE: NonZeroU32 = NonZeroU32::new(30).unwrap();

/// Source of todo titles.
#[async_trait]
pub trait TitleGenerator: Send + Sync {
    /// Raw text; callers decide what counts as empty.
    async fn generate_title(&self) -> Result<String, DeskError>;
}

fn default_retry_policy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(1))
        .with_max_delay(Duration::from_secs(3))
        .with_max_times(3)
        .with_jitter()
}

/// Build the outbound HTTP client shared by generator calls.
pub fn build_http_client(cfg: &Config) -> Result<reqwest::Client, DeskError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("airdesk/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30));
    if let Some(proxy_url) = cfg.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }
    Ok(builder.build()?)
}

/// Titles from a Gemini-compatible generateContent endpoint.
pub struct GeminiTitleGenerator {
    client: reqwest::Client,
    url: Url,
    api_key: Option<String>,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl GeminiTitleGenerator {
    pub fn new(client: reqwest::Client, cfg: &Config) -> Result<Self, DeskError> {
        let url = GenerationApi::generate_url(&cfg.generation_url, &cfg.generation_model)?;
        info!(
            url = %url,
            configured = cfg.generation_api_key.is_some(),
            "title generator ready"
        );
        let quota = Quota::per_minute(GENERATIONS_PER_MINUTE);
        Ok(Self {
            client,
            url,
            api_key: cfg.generation_api_key.clone(),
            limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }
}

#[async_trait]
impl TitleGenerator for GeminiTitleGenerator {
    async fn generate_title(&self) -> Result<String, DeskError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(DeskError::Generation(
                "text generation is not configured (GENERATION_API_KEY unset)".to_string(),
            ));
        };

        self.limiter.until_ready().await;

        let body = GenerateContentRequest::prompt(TITLE_PROMPT, TITLE_MAX_OUTPUT_TOKENS);
        let resp = GenerationApi::try_generate(
            self.client.clone(),
            &self.url,
            api_key,
            default_retry_policy(),
            &body,
        )
        .await?;
        debug!(model_version = %resp.modelVersion, "generateContent answered");

        title_text(&resp)
    }
}

/// Candidate text, or a `Generation` error naming why there is none.
fn title_text(resp: &GeminiResponse) -> Result<String, DeskError> {
    match resp.first_text() {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(DeskError::Generation(resp.missing_text_reason())),
    }
}
