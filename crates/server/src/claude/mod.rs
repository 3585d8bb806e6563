//! Anthropic Messages API integration.
//!
//! The model is an external collaborator: it receives the conversation plus
//! the tool registry schema and emits narration text and/or tool-call
//! requests. Everything else - executing tools, reassembling results,
//! streaming to the storefront client - happens in [`crate::services`].
//!
//! The [`ChatModel`] trait is the seam between the orchestrator and the
//! provider, so tests can drive the full tool-use loop with a scripted model.

mod client;
mod error;
mod types;

use async_trait::async_trait;
use futures::stream::BoxStream;

pub use client::ClaudeClient;
pub use error::{ApiErrorResponse, ClaudeError};
pub use types::{
    ChatRequest, ChatResponse, ContentBlock, ContentBlockDelta, ContentBlockStart, Message,
    MessageContent, MessageDelta, StopReason, StreamEvent, StreamMessage, Tool, Usage,
};

/// A conversational model that can answer with text and tool-call requests.
///
/// Implemented by [`ClaudeClient`] for production and by scripted fakes in
/// tests. Both entry points take the full conversation; the provider holds no
/// state between calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Request a complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out, or the provider
    /// answers with an error response.
    async fn chat(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatResponse, ClaudeError>;

    /// Request a streaming response as a sequence of provider events.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial request fails; mid-stream failures
    /// surface as error items on the stream.
    async fn chat_stream(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Option<Vec<Tool>>,
    ) -> Result<BoxStream<'static, Result<StreamEvent, ClaudeError>>, ClaudeError>;
}
