//! AI question answering.
//!
//! The provider is reached through [`AiProvider`]; [`ask_ai`] wraps any
//! provider so that a failure degrades to [`bfhl::AI_FALLBACK`] instead of
//! failing the request.

pub mod groq;

use async_trait::async_trait;
use bfhl::{FailurePolicy, AI_FALLBACK};
use serde_json::Value;

pub use groq::GroqClient;

/// Instruction sent ahead of every question.
pub const SYSTEM_INSTRUCTION: &str =
    "You must respond with only a single word. No punctuation, no explanation, just one word.";

/// Characters removed from the provider's answer.
const STRIPPED_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Errors from a single AI call.
#[derive(thiserror::Error, Debug)]
pub enum AiError {
    #[error("AI provider is not configured")]
    NotConfigured,

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// Something that can answer a question with one word.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Ask one question. One attempt, no retries.
    async fn ask(&self, question: &str) -> Result<String, AiError>;
}

/// Ask `provider`, answering [`AI_FALLBACK`] on any failure.
pub async fn ask_ai(provider: &dyn AiProvider, question: &str) -> String {
    let result = provider.ask(question).await.map(Value::String);
    match FailurePolicy::Fallback(AI_FALLBACK).resolve(result) {
        Ok(Value::String(answer)) => answer,
        _ => AI_FALLBACK.to_string(),
    }
}

/// Reduce a reply to its first word, without punctuation.
pub fn single_word(reply: &str) -> String {
    reply
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect()
}

/// Provider used when no API key is configured.
pub struct UnconfiguredProvider;

#[async_trait]
impl AiProvider for UnconfiguredProvider {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn ask(&self, _question: &str) -> Result<String, AiError> {
        Err(AiError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    #[async_trait]
    impl AiProvider for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn ask(&self, _question: &str) -> Result<String, AiError> {
            Ok(single_word(self.0))
        }
    }

    #[test]
    fn test_single_word() {
        assert_eq!(single_word("Paris."), "Paris");
        assert_eq!(single_word("  Paris is the capital"), "Paris");
        assert_eq!(single_word("Yes!\n"), "Yes");
        assert_eq!(single_word("U.S.A."), "USA");
        assert_eq!(single_word("Hmm;:?"), "Hmm");
        assert_eq!(single_word(""), "");
        assert_eq!(single_word("   "), "");
    }

    #[tokio::test]
    async fn test_ask_ai_passes_answer_through() {
        assert_eq!(ask_ai(&Fixed("Mars, obviously"), "q").await, "Mars");
    }

    #[tokio::test]
    async fn test_ask_ai_falls_back() {
        assert_eq!(ask_ai(&UnconfiguredProvider, "q").await, "Unavailable");
    }
}
