use crate::config::{Mode, Settings};
use crate::domain::headline::Headline;
use crate::domain::insight::Insight;
use anyhow::Result;
use std::sync::Arc;

pub mod anthropic;
pub mod error;
pub mod json;
pub mod sample;

/// Upper bound on insights returned per analysis.
pub const MAX_INSIGHTS: usize = 5;

#[async_trait::async_trait]
pub trait InsightAnalyzer: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn analyze_headlines(&self, headlines: &[Headline]) -> Result<Vec<Insight>>;
}

/// Resolve the analyzer once at startup: the real Anthropic client when a key
/// is configured, the fixed offline sample otherwise.
pub fn analyzer_from_settings(settings: &Settings) -> Result<Arc<dyn InsightAnalyzer>> {
    match settings.model_mode() {
        Mode::Live => Ok(Arc::new(anthropic::AnthropicClient::from_settings(
            settings,
        )?)),
        Mode::Sample => Ok(Arc::new(sample::SampleAnalyzer)),
    }
}
