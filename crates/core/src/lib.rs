pub mod domain;
pub mod llm;
pub mod news;

pub mod config {
    use anyhow::Context;

    /// How a component talks to its upstream: for real, or with the fixed
    /// offline sample data.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Mode {
        Live,
        Sample,
    }

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub anthropic_api_key: Option<String>,
        pub news_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
                news_api_key: non_empty_var("NEWS_API_KEY"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn require_anthropic_api_key(&self) -> anyhow::Result<&str> {
            self.anthropic_api_key
                .as_deref()
                .context("ANTHROPIC_API_KEY is required")
        }

        pub fn require_news_api_key(&self) -> anyhow::Result<&str> {
            self.news_api_key
                .as_deref()
                .context("NEWS_API_KEY is required")
        }

        pub fn news_mode(&self) -> Mode {
            match self.news_api_key {
                Some(_) => Mode::Live,
                None => Mode::Sample,
            }
        }

        pub fn model_mode(&self) -> Mode {
            match self.anthropic_api_key {
                Some(_) => Mode::Live,
                None => Mode::Sample,
            }
        }
    }

    // An empty or blank credential counts as unset.
    fn non_empty_var(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn missing_keys_resolve_to_sample_mode() {
            let settings = Settings::default();
            assert_eq!(settings.news_mode(), Mode::Sample);
            assert_eq!(settings.model_mode(), Mode::Sample);
            assert!(settings.require_news_api_key().is_err());
        }

        #[test]
        fn present_keys_resolve_to_live_mode() {
            let settings = Settings {
                anthropic_api_key: Some("sk-test".to_string()),
                news_api_key: Some("news-test".to_string()),
                sentry_dsn: None,
            };
            assert_eq!(settings.news_mode(), Mode::Live);
            assert_eq!(settings.model_mode(), Mode::Live);
            assert_eq!(settings.require_news_api_key().unwrap(), "news-test");
            assert_eq!(settings.require_anthropic_api_key().unwrap(), "sk-test");
        }
    }
}
