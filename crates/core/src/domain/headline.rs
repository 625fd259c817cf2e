use serde::{Deserialize, Serialize};

/// A normalized news item. Only articles with both a title and a url become
/// headlines; the description may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
}
