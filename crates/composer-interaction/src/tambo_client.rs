//! TamboClient - mock implementation of the Tambo AI SDK.
//!
//! Every response is picked at random from a fixed pool and has nothing to do
//! with the prompt. Latency is simulated with a configurable delay, and
//! streaming replays the chosen response one word at a time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use composer_core::ai_client::{AiClient, SdkResponse, StreamCallback, TokenUsage};
use composer_core::config::SdkSettings;
use composer_core::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::RwLock;

const CANNED_RESPONSES: [&str; 5] = [
    "I've analyzed your request and generated a responsive React component with TypeScript types and Tailwind styling.",
    "Here is a component structure that separates presentation from state, with hooks handling the data flow.",
    "The component has been optimized: memoized callbacks, stable list keys and fewer re-renders.",
    "I recommend splitting this into smaller components and lifting shared state into a custom hook.",
    "The code looks solid. Consider adding accessibility attributes and unit tests for the main interactions.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One entry of the client's transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    fn new(role: TurnRole, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }
}

pub struct TamboClient {
    model: String,
    response_delay: Duration,
    stream_interval: Duration,
    rng: Mutex<StdRng>,
    transcript: RwLock<Vec<ChatTurn>>,
}

impl TamboClient {
    pub fn new(settings: &SdkSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            model: settings.model.clone(),
            response_delay: settings.response_delay(),
            stream_interval: settings.stream_interval(),
            rng: Mutex::new(rng),
            transcript: RwLock::new(Vec::new()),
        }
    }

    /// The pool responses are drawn from.
    pub fn canned_responses() -> &'static [&'static str] {
        &CANNED_RESPONSES
    }

    pub async fn generate_code(&self, prompt: &str) -> Result<SdkResponse> {
        self.send_message(&format!("Generate code: {}", prompt), None)
            .await
    }

    pub async fn analyze_code(&self, code: &str) -> Result<SdkResponse> {
        self.send_message(&format!("Analyze this code: {}", code), None)
            .await
    }

    pub async fn optimize_code(&self, code: &str) -> Result<SdkResponse> {
        self.send_message(&format!("Optimize this code: {}", code), None)
            .await
    }

    pub async fn generate_documentation(&self, code: &str) -> Result<SdkResponse> {
        self.send_message(&format!("Generate documentation for: {}", code), None)
            .await
    }

    /// Transcript in send order, user and assistant turns interleaved.
    pub async fn history(&self) -> Vec<ChatTurn> {
        self.transcript.read().await.clone()
    }

    pub async fn clear_history(&self) {
        self.transcript.write().await.clear();
    }

    fn pick_response(&self) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        CANNED_RESPONSES[rng.gen_range(0..CANNED_RESPONSES.len())]
    }
}

impl Default for TamboClient {
    fn default() -> Self {
        Self::new(&SdkSettings::default())
    }
}

#[async_trait]
impl AiClient for TamboClient {
    async fn send_message(
        &self,
        content: &str,
        on_chunk: Option<StreamCallback<'_>>,
    ) -> Result<SdkResponse> {
        self.transcript
            .write()
            .await
            .push(ChatTurn::new(TurnRole::User, content));
        tracing::debug!(target: "composer::sdk", model = %self.model, prompt_len = content.len(), "Message sent");

        tokio::time::sleep(self.response_delay).await;
        let response = self.pick_response();

        if let Some(on_chunk) = on_chunk {
            let words: Vec<&str> = response.split_whitespace().collect();
            let last = words.len().saturating_sub(1);
            for (i, word) in words.iter().enumerate() {
                if i == last {
                    on_chunk(word);
                } else {
                    on_chunk(&format!("{} ", word));
                }
                tokio::time::sleep(self.stream_interval).await;
            }
        }

        self.transcript
            .write()
            .await
            .push(ChatTurn::new(TurnRole::Assistant, response));

        let prompt_tokens = word_count(content);
        let completion_tokens = word_count(response);
        Ok(SdkResponse {
            content: response.to_string(),
            usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            model: self.model.clone(),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn word_count(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(seed: Option<u64>) -> TamboClient {
        TamboClient::new(&SdkSettings {
            response_delay_ms: 0,
            stream_interval_ms: 0,
            seed,
            ..SdkSettings::default()
        })
    }

    #[tokio::test]
    async fn test_response_comes_from_pool() {
        let client = instant(None);
        let response = client.send_message("hello", None).await.unwrap();
        assert!(CANNED_RESPONSES.contains(&response.content.as_str()));
        assert_eq!(response.model, "tambo-mock-1");
        assert_eq!(response.usage.prompt_tokens, 1);
        assert_eq!(
            response.usage.total_tokens,
            response.usage.prompt_tokens + response.usage.completion_tokens
        );
    }

    #[tokio::test]
    async fn test_same_seed_same_sequence() {
        let a = instant(Some(42));
        let b = instant(Some(42));
        for _ in 0..5 {
            let left = a.send_message("x", None).await.unwrap().content;
            let right = b.send_message("y", None).await.unwrap().content;
            assert_eq!(left, right);
        }
    }

    #[tokio::test]
    async fn test_wrappers_prefix_prompt() {
        let client = instant(Some(1));
        client.optimize_code("const a = 1;").await.unwrap();
        let history = client.history().await;
        assert_eq!(history[0].content, "Optimize this code: const a = 1;");
        assert_eq!(history[1].role, TurnRole::Assistant);

        client.clear_history().await;
        assert!(client.history().await.is_empty());
    }
}
