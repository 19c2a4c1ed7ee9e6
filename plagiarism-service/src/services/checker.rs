//! Runs one plagiarism check: prompt, completion call, parse, fallback.

use crate::models::{CheckOutcome, ResultSource};
use crate::services::fallback::fallback_result;
use crate::services::providers::{CompletionProvider, CompletionRequest, ProviderError};
use crate::services::reply_parser::{parse_reply, ParseError};
use std::sync::Arc;
use thiserror::Error;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that checks for plagiarism. \
Provide a similarity percentage and highlight potentially plagiarized sections.";

/// User message sent to the completion service for `payload`.
pub fn build_prompt(payload: &str) -> String {
    format!("Check for similarities in the following text: \"{}\"", payload)
}

#[derive(Debug, Error)]
pub enum CheckFailure {
    #[error("completion provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("could not parse completion reply: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Clone)]
pub struct PlagiarismChecker {
    provider: Arc<dyn CompletionProvider>,
    max_tokens: u32,
}

impl PlagiarismChecker {
    pub fn new(provider: Arc<dyn CompletionProvider>, max_tokens: u32) -> Self {
        Self {
            provider,
            max_tokens,
        }
    }

    /// Check `payload`. Quota exhaustion upstream is answered with a fallback
    /// result; any other failure is returned.
    pub async fn check(&self, payload: &str) -> Result<CheckOutcome, CheckFailure> {
        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: build_prompt(payload),
            max_tokens: self.max_tokens,
        };

        match self.provider.complete(&request).await {
            Ok(reply) => {
                let result = parse_reply(&reply).map_err(|e| {
                    tracing::warn!(
                        model = %self.provider.model(),
                        reply_len = reply.len(),
                        error = %e,
                        "Completion reply did not match expected format"
                    );
                    e
                })?;

                Ok(CheckOutcome {
                    result,
                    source: ResultSource::Live,
                })
            }
            Err(ProviderError::QuotaExhausted) => {
                tracing::warn!(
                    model = %self.provider.model(),
                    "Completion quota exhausted, using fallback result"
                );
                let result = fallback_result(payload, &mut rand::thread_rng());
                Ok(CheckOutcome {
                    result,
                    source: ResultSource::Fallback,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlaggedSection;
    use crate::services::providers::mock::MockCompletionProvider;

    fn checker(provider: MockCompletionProvider) -> (PlagiarismChecker, Arc<MockCompletionProvider>) {
        let provider = Arc::new(provider);
        (PlagiarismChecker::new(provider.clone(), 500), provider)
    }

    #[tokio::test]
    async fn live_reply_is_parsed() {
        let (checker, provider) =
            checker(MockCompletionProvider::replying("Similarity: 42%\n- \"copied sentence\" - 80"));

        let outcome = checker.check("some essay").await.unwrap();

        assert_eq!(outcome.source, ResultSource::Live);
        assert_eq!(outcome.result.similarity, 42);
        assert_eq!(
            outcome.result.flagged_sections,
            vec![FlaggedSection {
                text: "copied sentence".into(),
                similarity: 80
            }]
        );
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn prompt_embeds_payload_and_budget() {
        let (checker, provider) = checker(MockCompletionProvider::replying("0%"));

        checker.check("exact text: \"quoted\"").await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system, SYSTEM_PROMPT);
        assert_eq!(
            requests[0].user,
            "Check for similarities in the following text: \"exact text: \"quoted\"\""
        );
        assert_eq!(requests[0].max_tokens, 500);
    }

    #[tokio::test]
    async fn quota_exhaustion_falls_back() {
        let (checker, _) = checker(MockCompletionProvider::failing(ProviderError::QuotaExhausted));
        let text = "y".repeat(120);

        let outcome = checker.check(&text).await.unwrap();

        assert_eq!(outcome.source, ResultSource::Fallback);
        assert!(outcome.result.similarity <= 100);
        assert_eq!(outcome.result.flagged_sections.len(), 2);
        assert_eq!(outcome.result.flagged_sections[0].text, "y".repeat(50));
        assert_eq!(outcome.result.flagged_sections[1].text, "y".repeat(50));
    }

    #[tokio::test]
    async fn other_provider_errors_are_returned() {
        let (checker, _) = checker(MockCompletionProvider::failing(ProviderError::ApiError {
            status: 401,
            code: Some("invalid_api_key".into()),
            message: "bad key".into(),
        }));

        let err = checker.check("text").await.unwrap_err();
        assert!(matches!(err, CheckFailure::Provider(ProviderError::ApiError { status: 401, .. })));
    }

    #[tokio::test]
    async fn unparseable_reply_is_a_failure() {
        let (checker, _) = checker(MockCompletionProvider::replying("No idea."));

        let err = checker.check("text").await.unwrap_err();
        assert!(matches!(err, CheckFailure::Parse(ParseError::MissingSimilarity)));
    }
}
