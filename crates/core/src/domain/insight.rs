use serde::{Deserialize, Serialize};

/// One trade idea derived from a single headline. Fields the model omits
/// deserialize to their empty defaults; consumers must tolerate that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub article_url: String,
    #[serde(default)]
    pub stocks: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub summary: String,
}
