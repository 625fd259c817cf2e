use crate::config::Settings;
use crate::domain::headline::Headline;
use crate::news::types::{Article, ArticlesResponse};
use crate::news::{HeadlineSource, MAX_HEADLINES};
use anyhow::{Context, Result};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://newsapi.org";
const EVERYTHING_PATH: &str = "/v2/everything";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const QUERY: &str = "business OR finance OR stocks";
const SORT_BY: &str = "publishedAt";
const LANGUAGE: &str = "en";

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build news api http client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_news_api_key()?;
        let base_url =
            std::env::var("NEWS_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = std::env::var("NEWS_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(api_key, base_url, Duration::from_secs(timeout_secs))
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), EVERYTHING_PATH)
    }
}

#[async_trait::async_trait]
impl HeadlineSource for NewsApiClient {
    fn source_name(&self) -> &'static str {
        "newsapi"
    }

    async fn fetch_headlines(&self) -> Result<Vec<Headline>> {
        let page_size = MAX_HEADLINES.to_string();
        let res = self
            .http
            .get(self.url())
            .query(&[
                ("q", QUERY),
                ("sortBy", SORT_BY),
                ("pageSize", page_size.as_str()),
                ("language", LANGUAGE),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("news api request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read news api response body")?;
        if !status.is_success() {
            anyhow::bail!("news api HTTP {status}: {text}");
        }

        let parsed = serde_json::from_str::<ArticlesResponse>(&text)
            .with_context(|| format!("news api response is not valid JSON: {text}"))?;

        let headlines = headlines_from_articles(parsed.articles);
        tracing::debug!(count = headlines.len(), "fetched headlines");
        Ok(headlines)
    }
}

/// Keep the first `MAX_HEADLINES` articles that carry both a title and a url,
/// preserving order. Articles missing either field are skipped, not errors.
pub fn headlines_from_articles(articles: Vec<Article>) -> Vec<Headline> {
    articles
        .into_iter()
        .take(MAX_HEADLINES)
        .filter_map(|article| {
            let title = article.title.filter(|t| !t.is_empty())?;
            let url = article.url.filter(|u| !u.is_empty())?;
            Some(Headline {
                title,
                description: article.description.unwrap_or_default(),
                url,
            })
        })
        .collect()
}
