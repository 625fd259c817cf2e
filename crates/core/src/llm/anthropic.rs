use crate::config::Settings;
use crate::domain::headline::Headline;
use crate::domain::insight::Insight;
use crate::llm::error::ModelDiagnosticsError;
use crate::llm::{json, InsightAnalyzer, MAX_INSIGHTS};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 1500;
const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build anthropic http client")?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_anthropic_api_key()?.to_string();
        let base_url =
            std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_tokens = std::env::var("ANTHROPIC_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);
        let temperature = std::env::var("ANTHROPIC_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse::<f32>().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);

        let timeout_secs = std::env::var("ANTHROPIC_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build anthropic http client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model,
            max_tokens,
            temperature,
        })
    }

    async fn create_message(
        &self,
        req: CreateMessageRequest,
    ) -> anyhow::Result<CreateMessageResponse> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .post(url)
            .headers(headers)
            .json(&req)
            .send()
            .await
            .context("anthropic request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read anthropic response body")?;
        if !status.is_success() {
            return Err(ModelDiagnosticsError {
                stage: "http",
                detail: format!("status={status}"),
                raw_output: Some(text),
            }
            .into());
        }

        serde_json::from_str::<CreateMessageResponse>(&text)
            .with_context(|| format!("failed to parse anthropic response JSON: {text}"))
    }

    fn user_prompt(headlines: &[Headline]) -> anyhow::Result<String> {
        let headlines_json = serde_json::to_string_pretty(headlines)
            .context("failed to serialize headlines for the prompt")?;

        let item_schema = [
            "{",
            "  \"headline\": \"Exact headline title\",",
            "  \"article_url\": \"Full URL\",",
            "  \"stocks\": [\"AAPL\", \"MSFT\"],",
            "  \"recommendation\": \"Buy/Sell/Hold [TICKER]\",",
            "  \"rationale\": \"1-2 sentences explaining why.\",",
            "  \"summary\": \"2-3 sentence neutral summary of the article.\"",
            "}",
        ]
        .join("\n");

        Ok(format!(
            "You are a financial analyst AI. Analyze the following recent business/finance \
             headlines for potential trade ideas on US publicly traded stocks or index funds \
             (e.g. AAPL, SPY). Focus only on actionable opportunities and ignore neutral or \
             irrelevant news.\n\n\
             Input: {headlines_json}\n\n\
             Output ONLY a valid JSON array (max {MAX_INSIGHTS} items) of insights. Each item:\n\
             {item_schema}\n\n\
             Use standard tickers. Filter to high-potential opportunities only. Be realistic, \
             not speculative. JSON only, no extra text."
        ))
    }

    fn response_text(res: &CreateMessageResponse) -> anyhow::Result<String> {
        for block in &res.content {
            if let ContentBlock::Text { text } = block {
                return Ok(text.trim().to_string());
            }
        }
        anyhow::bail!("anthropic response contained no text content block")
    }
}

#[async_trait::async_trait]
impl InsightAnalyzer for AnthropicClient {
    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    async fn analyze_headlines(&self, headlines: &[Headline]) -> anyhow::Result<Vec<Insight>> {
        let req = CreateMessageRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: Self::user_prompt(headlines)?,
            }],
        };

        let res = self.create_message(req).await?;

        if matches!(res.stop_reason.as_deref(), Some("max_tokens")) {
            tracing::warn!(
                max_tokens = self.max_tokens,
                "anthropic stop_reason=max_tokens; output may be truncated"
            );
        }

        let text = Self::response_text(&res)?;
        json::parse_insights(&text)
    }
}

#[derive(Debug, Clone, Serialize)]
struct CreateMessageRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CreateMessageResponse {
    content: Vec<ContentBlock>,

    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::sample::sample_headlines;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn user_prompt_embeds_headlines_and_bounds() {
        let prompt = AnthropicClient::user_prompt(&sample_headlines()).unwrap();
        assert!(prompt.contains("Apple Reports Record Q4 Earnings, Stock Surges"));
        assert!(prompt.contains("https://example.com/fed-rates"));
        assert!(prompt.contains("max 5 items"));
        assert!(prompt.contains("JSON only"));
    }

    #[test]
    fn response_text_reads_first_text_block() {
        let res: CreateMessageResponse = serde_json::from_value(json!({
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "  [1]  "},
                {"type": "text", "text": "ignored"}
            ],
            "stop_reason": "end_turn"
        }))
        .unwrap();

        assert_eq!(AnthropicClient::response_text(&res).unwrap(), "[1]");
    }

    #[test]
    fn response_without_text_block_is_an_error() {
        let res: CreateMessageResponse =
            serde_json::from_value(json!({"content": [{"type": "thinking", "thinking": "x"}]}))
                .unwrap();
        assert!(AnthropicClient::response_text(&res).is_err());
    }

    #[tokio::test]
    async fn analyze_headlines_parses_a_fenced_reply() {
        let reply = json!([{
            "headline": "Apple Reports Record Q4 Earnings, Stock Surges",
            "article_url": "https://example.com/apple-earnings",
            "stocks": ["AAPL"],
            "recommendation": "Buy AAPL",
            "rationale": "Earnings beat suggests upside.",
            "summary": "Apple beat expectations across segments."
        }]);

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/messages")
                    .header("x-api-key", "test-key")
                    .header("anthropic-version", ANTHROPIC_VERSION);
                then.status(200).json_body(json!({
                    "content": [
                        {"type": "text", "text": format!("```json\n{reply}\n```")}
                    ],
                    "stop_reason": "end_turn"
                }));
            })
            .await;

        let client = AnthropicClient::new("test-key", server.base_url()).unwrap();
        let insights = client
            .analyze_headlines(&sample_headlines())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].stocks, vec!["AAPL"]);
        assert_eq!(insights[0].recommendation, "Buy AAPL");
    }

    #[tokio::test]
    async fn analyze_headlines_surfaces_http_failures_with_diagnostics() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/messages");
                then.status(529).body("overloaded");
            })
            .await;

        let client = AnthropicClient::new("test-key", server.base_url()).unwrap();
        let err = client
            .analyze_headlines(&sample_headlines())
            .await
            .unwrap_err();

        let diag = err
            .downcast_ref::<ModelDiagnosticsError>()
            .expect("expected a ModelDiagnosticsError");
        assert_eq!(diag.stage, "http");
        assert_eq!(diag.raw_output.as_deref(), Some("overloaded"));
    }

    #[tokio::test]
    async fn analyze_headlines_fails_on_unparseable_reply() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/messages");
                then.status(200).json_body(json!({
                    "content": [{"type": "text", "text": "Sorry, I cannot help with that."}],
                    "stop_reason": "end_turn"
                }));
            })
            .await;

        let client = AnthropicClient::new("test-key", server.base_url()).unwrap();
        let err = client
            .analyze_headlines(&sample_headlines())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
