use serde::Deserialize;

/// NewsAPI `/v2/everything` response body, reduced to the fields we read.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticlesResponse {
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// A single article as NewsAPI reports it. Any field may be null or absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}
