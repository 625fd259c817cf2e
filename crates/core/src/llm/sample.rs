use crate::domain::headline::Headline;
use crate::domain::insight::Insight;
use crate::llm::InsightAnalyzer;
use anyhow::Result;

/// Offline stand-in for the model, used when no key is configured. Always
/// returns the same single insight regardless of input.
#[derive(Debug, Clone, Copy)]
pub struct SampleAnalyzer;

pub fn sample_insights() -> Vec<Insight> {
    vec![Insight {
        headline: "Apple Reports Record Q4 Earnings, Stock Surges".to_string(),
        article_url: "https://example.com/apple-earnings".to_string(),
        stocks: vec!["AAPL".to_string()],
        recommendation: "Buy AAPL".to_string(),
        rationale: "Strong earnings beat suggests continued growth momentum and potential upside."
            .to_string(),
        summary: "Apple Inc. announced record-breaking quarterly earnings, beating analyst \
                  expectations by 15%. The company's iPhone sales and services revenue both \
                  exceeded forecasts."
            .to_string(),
    }]
}

#[async_trait::async_trait]
impl InsightAnalyzer for SampleAnalyzer {
    fn provider_name(&self) -> &'static str {
        "sample"
    }

    async fn analyze_headlines(&self, _headlines: &[Headline]) -> Result<Vec<Insight>> {
        Ok(sample_insights())
    }
}
