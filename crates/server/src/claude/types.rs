//! Wire types for the Anthropic Messages API.
//!
//! These match the Messages API format for tool use, both the request body
//! and the SSE event stream.

use serde::{Deserialize, Serialize};

/// A message in a conversation with the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// "user" or "assistant".
    pub role: String,
    /// The content of the message.
    pub content: MessageContent,
}

impl Message {
    /// A plain-text user message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// A plain-text assistant message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }
}

/// Content of a message - either plain text or a list of content blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content.
    Text(String),
    /// Multiple content blocks (used for tool use and tool results).
    Blocks(Vec<ContentBlock>),
}

/// A content block within a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Narration text.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
    },
    /// Tool-call request from the model.
    #[serde(rename = "tool_use")]
    ToolUse {
        /// Unique id for this tool use, echoed back in the result.
        id: String,
        /// Name of the tool to invoke.
        name: String,
        /// Input arguments for the tool.
        input: serde_json::Value,
    },
    /// Result of a tool invocation, sent back to the model.
    #[serde(rename = "tool_result")]
    ToolResult {
        /// Id of the tool use this responds to.
        tool_use_id: String,
        /// Serialized result content.
        content: String,
        /// Whether the tool execution failed.
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

/// A tool definition exposed to the model.
///
/// The `{name, description, input_schema}` triple is part of the agent's
/// capability surface: renaming a tool or changing its parameter shape is a
/// breaking change for the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name.
    pub name: String,
    /// What the tool does, written for the model.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: serde_json::Value,
}

/// Request body for the Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model id.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Conversation messages.
    pub messages: Vec<Message>,
    /// System prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Available tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    /// Whether to stream the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Response from the Messages API (non-streaming).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Unique response id.
    pub id: String,
    /// Model that generated the response.
    pub model: String,
    /// Reason the response stopped.
    pub stop_reason: Option<StopReason>,
    /// Response content blocks.
    pub content: Vec<ContentBlock>,
    /// Token usage.
    pub usage: Usage,
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response.
    EndTurn,
    /// Max tokens reached.
    MaxTokens,
    /// Stop sequence encountered.
    StopSequence,
    /// Tool use requested.
    ToolUse,
}

/// Token usage information.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    /// Number of input tokens.
    pub input_tokens: u32,
    /// Number of output tokens.
    pub output_tokens: u32,
}

// =============================================================================
// Streaming Types
// =============================================================================

/// Server-Sent Event types from the streaming Messages API.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    /// Start of a message.
    #[serde(rename = "message_start")]
    MessageStart {
        /// The initial message object.
        message: StreamMessage,
    },
    /// Start of a content block.
    #[serde(rename = "content_block_start")]
    ContentBlockStart {
        /// Index of the content block.
        index: usize,
        /// The content block.
        content_block: ContentBlockStart,
    },
    /// Delta update for a content block.
    #[serde(rename = "content_block_delta")]
    ContentBlockDelta {
        /// Index of the content block.
        index: usize,
        /// The delta update.
        delta: ContentBlockDelta,
    },
    /// End of a content block.
    #[serde(rename = "content_block_stop")]
    ContentBlockStop {
        /// Index of the content block.
        index: usize,
    },
    /// Delta update for the message.
    #[serde(rename = "message_delta")]
    MessageDelta {
        /// The delta update.
        delta: MessageDelta,
        /// Updated usage information.
        usage: Usage,
    },
    /// End of the message.
    #[serde(rename = "message_stop")]
    MessageStop,
    /// Keep-alive.
    #[serde(rename = "ping")]
    Ping,
    /// Error event.
    #[serde(rename = "error")]
    Error {
        /// Error details.
        error: StreamError,
    },
}

/// Initial message in a stream.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamMessage {
    /// Message id.
    pub id: String,
    /// Model used.
    pub model: String,
    /// Initial usage.
    pub usage: Usage,
}

/// Start of a content block in a stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlockStart {
    /// Text block start.
    #[serde(rename = "text")]
    Text {
        /// Initial text (usually empty).
        text: String,
    },
    /// Tool use block start.
    #[serde(rename = "tool_use")]
    ToolUse {
        /// Tool use id.
        id: String,
        /// Tool name.
        name: String,
        /// Initial input (usually an empty object).
        input: serde_json::Value,
    },
}

/// Delta update for a content block.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlockDelta {
    /// Text delta.
    #[serde(rename = "text_delta")]
    TextDelta {
        /// Text to append.
        text: String,
    },
    /// Input JSON delta for a tool-use block.
    #[serde(rename = "input_json_delta")]
    InputJsonDelta {
        /// Partial JSON to append.
        partial_json: String,
    },
}

/// Delta update for the message.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageDelta {
    /// Updated stop reason.
    pub stop_reason: Option<StopReason>,
}

/// Error in a stream.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamError {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    pub message: String,
}
