//! Category suggestions backed by the configured chat model.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use catat_finance::{CategorySuggester, CategorySuggestionRequest, build_prompt};
use tracing::debug;

use crate::llm::{self, ChatTurn, LlmConfig, Provider};

pub struct LlmSuggester {
    config: LlmConfig,
}

impl LlmSuggester {
    pub fn new(config: LlmConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CategorySuggester for LlmSuggester {
    async fn suggest(&self, request: &CategorySuggestionRequest) -> Result<String> {
        let prompt = build_prompt(request);
        debug!(model = %self.config.model, description = %request.description, "requesting category suggestion");
        let reply = llm::chat_complete(&self.config, &prompt.system, &[ChatTurn::user(prompt.user)]).await?;
        debug!(%reply, "category suggestion reply");
        Ok(reply)
    }
}

/// Stands in when suggestions are on but no key resolves, so every consult
/// fails with a hint and the user sees a warning instead of silence.
pub struct MissingKeySuggester {
    provider: Provider,
}

impl MissingKeySuggester {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl CategorySuggester for MissingKeySuggester {
    async fn suggest(&self, _request: &CategorySuggestionRequest) -> Result<String> {
        Err(anyhow!(
            "no API key configured; run `{}`",
            self.provider.auth_command()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catat_core::{Category, KnownCategory, Language};
    use catat_finance::{CancelToken, Notice, ParseOptions, parse_and_categorize};

    #[tokio::test]
    async fn test_missing_key_falls_back_with_notice() {
        let opts = ParseOptions::new(Language::Indonesian);
        let suggester = MissingKeySuggester::new(Provider::OpenAI);
        let out = parse_and_categorize(
            "Langganan Netflix 150rb",
            &opts,
            Some(&suggester),
            &CancelToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(out.parsed.category, Category::Known(KnownCategory::Other));
        assert_eq!(out.notices.len(), 1);
        let Notice::SuggestionFailed { reason } = &out.notices[0];
        assert!(reason.contains("paste-openai-api-key"), "{reason}");
    }
}
