use crate::config::{Mode, Settings};
use crate::domain::headline::Headline;
use anyhow::Result;
use std::sync::Arc;

pub mod newsapi;
pub mod sample;
pub mod types;

/// Upper bound on headlines fetched per request.
pub const MAX_HEADLINES: usize = 15;

#[async_trait::async_trait]
pub trait HeadlineSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_headlines(&self) -> Result<Vec<Headline>>;
}

/// Resolve the headline source once at startup: the real NewsAPI client when
/// a key is configured, the fixed offline sample otherwise.
pub fn source_from_settings(settings: &Settings) -> Result<Arc<dyn HeadlineSource>> {
    match settings.news_mode() {
        Mode::Live => Ok(Arc::new(newsapi::NewsApiClient::from_settings(settings)?)),
        Mode::Sample => Ok(Arc::new(sample::SampleHeadlineSource)),
    }
}
