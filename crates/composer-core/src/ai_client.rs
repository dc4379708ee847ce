//! AI client seam.
//!
//! The composer talks to its language model through [`AiClient`]. The only
//! implementation shipped is the mock Tambo SDK, which never touches the
//! network.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Callback invoked once per streamed chunk.
pub type StreamCallback<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// Token accounting reported with every response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A completed model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub model: String,
}

#[async_trait::async_trait]
pub trait AiClient: Send + Sync {
    /// Sends a prompt and waits for the full response.
    ///
    /// When `on_chunk` is given, the response is also delivered
    /// incrementally before this future resolves.
    async fn send_message(
        &self,
        content: &str,
        on_chunk: Option<StreamCallback<'_>>,
    ) -> Result<SdkResponse>;

    /// Model identifier reported in responses.
    fn model(&self) -> &str;
}
