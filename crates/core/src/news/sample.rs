use crate::domain::headline::Headline;
use crate::news::HeadlineSource;
use anyhow::Result;

/// Offline stand-in for NewsAPI, used when no key is configured. Always
/// returns the same two headlines so demos and tests are deterministic.
#[derive(Debug, Clone, Copy)]
pub struct SampleHeadlineSource;

pub fn sample_headlines() -> Vec<Headline> {
    vec![
        Headline {
            title: "Apple Reports Record Q4 Earnings, Stock Surges".to_string(),
            description: "Apple Inc. announced record-breaking quarterly earnings, beating analyst expectations by 15%.".to_string(),
            url: "https://example.com/apple-earnings".to_string(),
        },
        Headline {
            title: "Federal Reserve Hints at Rate Cuts in 2024".to_string(),
            description: "The Fed signals potential interest rate reductions, sparking market optimism.".to_string(),
            url: "https://example.com/fed-rates".to_string(),
        },
    ]
}

#[async_trait::async_trait]
impl HeadlineSource for SampleHeadlineSource {
    fn source_name(&self) -> &'static str {
        "sample"
    }

    async fn fetch_headlines(&self) -> Result<Vec<Headline>> {
        Ok(sample_headlines())
    }
}
