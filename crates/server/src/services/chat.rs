//! Conversation orchestration for the shopping agent.
//!
//! Drives one request/response cycle: validate the incoming history, call
//! the model with the tool registry, execute requested tool calls against
//! the request's catalog and cart snapshots, feed results back, and repeat
//! until the model finishes narrating or the iteration bound is hit. The
//! streaming path emits the same sequence as framed events.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_stream::stream;
use futures::StreamExt;
use futures::stream::BoxStream;
use leekspin_core::{CartSnapshot, Catalog};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::agent::{ToolContext, ToolKind, agent_tools, execute_tool};
use crate::claude::{
    ChatModel, ClaudeError, ContentBlock, ContentBlockDelta, ContentBlockStart, Message,
    MessageContent, StopReason, StreamEvent, Tool,
};
use crate::state::AppState;

/// Maximum number of tool use iterations to prevent infinite loops.
pub const MAX_TOOL_ITERATIONS: usize = 10;

/// System prompt for the shopping assistant.
const SYSTEM_PROMPT: &str = "\
You are Leeki, the shopping assistant for Leekspin Market, an online store \
for leeks and leek-themed merchandise. You are enthusiastic about leeks and \
the leek spin meme, but always helpful and concise.

Use the available tools to answer questions about products, stock, prices, \
and the customer's cart. Prefer tool results over guessing; if a tool returns \
no matches, say so honestly. When the customer wants to go somewhere in the \
store, use navigate_to_page. When they provide checkout details, use \
fill_checkout_form; never invent payment details and never claim to have \
processed a payment.";

/// Errors that can occur while orchestrating a chat turn.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The model call failed.
    #[error("model error: {0}")]
    Model(#[from] ClaudeError),

    /// The request carried no messages.
    #[error("message history is empty")]
    EmptyHistory,

    /// A history message had a role other than user or assistant.
    #[error("invalid message role: {0}")]
    InvalidRole(String),

    /// Tool use looped past the iteration bound.
    #[error("too many tool iterations")]
    TooManyToolIterations,
}

impl ChatError {
    /// Whether a caller-side retry could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Model(e) => e.is_retryable(),
            Self::EmptyHistory | Self::InvalidRole(_) | Self::TooManyToolIterations => false,
        }
    }
}

/// Incoming chat request body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurnRequest {
    /// Full conversation history, re-sent by the client each turn.
    pub messages: Vec<IncomingMessage>,
}

/// One message of client-supplied history.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    /// "user" or "assistant".
    pub role: String,
    /// Plain text content.
    pub content: String,
}

/// A framed segment of the agent's response, streamed to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatStreamEvent {
    /// A chunk of assistant narration.
    TextDelta {
        /// The text chunk.
        text: String,
    },
    /// The model requested a tool call.
    ToolCall {
        /// Tool name.
        #[serde(rename = "toolName")]
        tool_name: String,
        /// Validated-or-not raw input.
        input: serde_json::Value,
    },
    /// A tool call finished.
    ToolResult {
        /// Tool name.
        #[serde(rename = "toolName")]
        tool_name: String,
        /// Structured output, or an error object.
        output: serde_json::Value,
        /// Whether execution failed.
        #[serde(rename = "isError")]
        is_error: bool,
    },
    /// The turn failed; this is always the final frame when present.
    Error {
        /// Human-readable description.
        message: String,
        /// Whether a retry could succeed.
        retryable: bool,
    },
    /// End of the response.
    Done,
}

/// Orchestrates chat turns against the model and the tool registry.
#[derive(Clone)]
pub struct ChatService {
    model: Arc<dyn ChatModel>,
    catalog: Catalog,
}

impl ChatService {
    /// Create a chat service from application state.
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            model: state.model(),
            catalog: state.catalog().clone(),
        }
    }

    /// Run one complete turn without streaming.
    ///
    /// Returns the ordered sequence of segments the turn produced, ending
    /// with [`ChatStreamEvent::Done`]. Used by callers that want the whole
    /// response at once; the SSE route uses [`Self::stream_turn`].
    ///
    /// # Errors
    ///
    /// Returns an error on invalid history, model failure, or when the
    /// tool loop exceeds [`MAX_TOOL_ITERATIONS`].
    #[instrument(skip(self, request, cart), fields(history_len = request.messages.len()))]
    pub async fn run_turn(
        &self,
        request: ChatTurnRequest,
        cart: CartSnapshot,
    ) -> Result<Vec<ChatStreamEvent>, ChatError> {
        let mut messages = convert_history(&request)?;
        let tools = agent_tools();

        let mut events = Vec::new();
        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > MAX_TOOL_ITERATIONS {
                warn!("Too many tool iterations, stopping");
                return Err(ChatError::TooManyToolIterations);
            }

            let response = self
                .model
                .chat(
                    messages.clone(),
                    Some(SYSTEM_PROMPT.to_string()),
                    Some(tools.clone()),
                )
                .await?;

            info!(
                stop_reason = ?response.stop_reason,
                content_blocks = response.content.len(),
                "Model response received"
            );

            let mut has_tool_use = false;
            let mut tool_results: Vec<ContentBlock> = Vec::new();

            for block in &response.content {
                match block {
                    ContentBlock::Text { text } => {
                        events.push(ChatStreamEvent::TextDelta { text: text.clone() });
                    }
                    ContentBlock::ToolUse { id, name, input } => {
                        has_tool_use = true;
                        events.push(ChatStreamEvent::ToolCall {
                            tool_name: name.clone(),
                            input: input.clone(),
                        });

                        let (output, is_error) = self.execute_call(name, input, &cart);
                        let content = output.to_string();
                        events.push(ChatStreamEvent::ToolResult {
                            tool_name: name.clone(),
                            output,
                            is_error,
                        });

                        tool_results.push(ContentBlock::ToolResult {
                            tool_use_id: id.clone(),
                            content,
                            is_error: Some(is_error),
                        });
                    }
                    ContentBlock::ToolResult { .. } => {
                        // Never present in model responses.
                    }
                }
            }

            if has_tool_use && response.stop_reason == Some(StopReason::ToolUse) {
                messages.push(Message {
                    role: "assistant".to_string(),
                    content: MessageContent::Blocks(response.content.clone()),
                });
                messages.push(Message {
                    role: "user".to_string(),
                    content: MessageContent::Blocks(tool_results),
                });
                continue;
            }

            break;
        }

        events.push(ChatStreamEvent::Done);
        Ok(events)
    }

    /// Run one turn as a stream of framed events.
    ///
    /// Failures after streaming has begun are emitted as a final
    /// [`ChatStreamEvent::Error`] frame so the transport ends cleanly.
    /// Dropping the stream aborts the turn; nothing is flushed to a
    /// closed transport.
    #[must_use]
    pub fn stream_turn(
        self,
        request: ChatTurnRequest,
        cart: CartSnapshot,
    ) -> BoxStream<'static, ChatStreamEvent> {
        let events = stream! {
            let mut messages = match convert_history(&request) {
                Ok(messages) => messages,
                Err(e) => {
                    yield ChatStreamEvent::Error {
                        message: e.to_string(),
                        retryable: e.is_retryable(),
                    };
                    return;
                }
            };
            let tools = agent_tools();
            let mut iterations = 0;

            loop {
                iterations += 1;
                if iterations > MAX_TOOL_ITERATIONS {
                    warn!("Too many tool iterations, stopping");
                    yield ChatStreamEvent::Error {
                        message: ChatError::TooManyToolIterations.to_string(),
                        retryable: false,
                    };
                    return;
                }

                match self.stream_round(&mut messages, &tools, &cart).await {
                    Ok(RoundOutcome { events: round_events, continue_loop }) => {
                        for event in round_events {
                            yield event;
                        }
                        if !continue_loop {
                            yield ChatStreamEvent::Done;
                            return;
                        }
                    }
                    Err(e) => {
                        let retryable = e.is_retryable();
                        yield ChatStreamEvent::Error {
                            message: e.to_string(),
                            retryable,
                        };
                        return;
                    }
                }
            }
        };
        events.boxed()
    }

    /// Run one MODEL_CALL round over the streaming API.
    ///
    /// Assembles content blocks from the event stream, executes tool calls
    /// as their blocks complete, and appends the assistant message and tool
    /// results to `messages` when another round is needed.
    async fn stream_round(
        &self,
        messages: &mut Vec<Message>,
        tools: &[Tool],
        cart: &CartSnapshot,
    ) -> Result<RoundOutcome, ChatError> {
        let mut stream = self
            .model
            .chat_stream(
                messages.clone(),
                Some(SYSTEM_PROMPT.to_string()),
                Some(tools.to_vec()),
            )
            .await?;

        let mut events = Vec::new();
        let mut assembler = BlockAssembler::default();
        let mut tool_results: Vec<ContentBlock> = Vec::new();
        let mut stop_reason = None;

        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::ContentBlockStart {
                    index,
                    content_block,
                } => assembler.start(index, content_block),
                StreamEvent::ContentBlockDelta { index, delta } => match delta {
                    ContentBlockDelta::TextDelta { text } => {
                        assembler.append_text(index, &text);
                        events.push(ChatStreamEvent::TextDelta { text });
                    }
                    ContentBlockDelta::InputJsonDelta { partial_json } => {
                        assembler.append_json(index, &partial_json);
                    }
                },
                StreamEvent::ContentBlockStop { index } => {
                    if let Some(block) = assembler.finish(index)? {
                        if let ContentBlock::ToolUse { id, name, input } = &block {
                            events.push(ChatStreamEvent::ToolCall {
                                tool_name: name.clone(),
                                input: input.clone(),
                            });

                            let (output, is_error) = self.execute_call(name, input, cart);
                            let content = output.to_string();
                            events.push(ChatStreamEvent::ToolResult {
                                tool_name: name.clone(),
                                output,
                                is_error,
                            });

                            tool_results.push(ContentBlock::ToolResult {
                                tool_use_id: id.clone(),
                                content,
                                is_error: Some(is_error),
                            });
                        }
                        assembler.complete(block);
                    }
                }
                StreamEvent::MessageDelta { delta, .. } => {
                    stop_reason = delta.stop_reason;
                }
                StreamEvent::MessageStop => break,
                StreamEvent::Error { error } => {
                    return Err(ChatError::Model(ClaudeError::Api {
                        error_type: error.error_type,
                        message: error.message,
                    }));
                }
                StreamEvent::MessageStart { .. } | StreamEvent::Ping => {}
            }
        }

        let assistant_blocks = assembler.into_blocks();
        let continue_loop = stop_reason == Some(StopReason::ToolUse) && !tool_results.is_empty();

        if continue_loop {
            messages.push(Message {
                role: "assistant".to_string(),
                content: MessageContent::Blocks(assistant_blocks),
            });
            messages.push(Message {
                role: "user".to_string(),
                content: MessageContent::Blocks(tool_results),
            });
        }

        Ok(RoundOutcome {
            events,
            continue_loop,
        })
    }

    /// Execute one tool call, mapping every failure into an error-flagged
    /// result so the model can narrate a graceful response.
    fn execute_call(
        &self,
        name: &str,
        input: &serde_json::Value,
        cart: &CartSnapshot,
    ) -> (serde_json::Value, bool) {
        let Some(kind) = ToolKind::from_name(name) else {
            return (
                serde_json::json!({ "error": format!("Unknown tool: {name}") }),
                true,
            );
        };

        let ctx = ToolContext {
            catalog: &self.catalog,
            cart,
        };
        match execute_tool(kind, input, &ctx) {
            Ok(output) => match serde_json::to_value(&output) {
                Ok(value) => (value, false),
                Err(e) => (
                    serde_json::json!({ "error": format!("Failed to encode result: {e}") }),
                    true,
                ),
            },
            Err(e) => (serde_json::json!({ "error": e.to_string() }), true),
        }
    }
}

/// Result of one streaming MODEL_CALL round.
struct RoundOutcome {
    events: Vec<ChatStreamEvent>,
    continue_loop: bool,
}

/// Assembles complete content blocks from streamed deltas.
#[derive(Default)]
struct BlockAssembler {
    open: BTreeMap<usize, OpenBlock>,
    completed: Vec<ContentBlock>,
}

enum OpenBlock {
    Text(String),
    ToolUse {
        id: String,
        name: String,
        json: String,
    },
}

impl BlockAssembler {
    fn start(&mut self, index: usize, block: ContentBlockStart) {
        let open = match block {
            ContentBlockStart::Text { text } => OpenBlock::Text(text),
            ContentBlockStart::ToolUse { id, name, .. } => OpenBlock::ToolUse {
                id,
                name,
                json: String::new(),
            },
        };
        self.open.insert(index, open);
    }

    fn append_text(&mut self, index: usize, text: &str) {
        if let Some(OpenBlock::Text(buffer)) = self.open.get_mut(&index) {
            buffer.push_str(text);
        }
    }

    fn append_json(&mut self, index: usize, partial: &str) {
        if let Some(OpenBlock::ToolUse { json, .. }) = self.open.get_mut(&index) {
            json.push_str(partial);
        }
    }

    /// Close a block and return it fully assembled.
    fn finish(&mut self, index: usize) -> Result<Option<ContentBlock>, ChatError> {
        let Some(open) = self.open.remove(&index) else {
            return Ok(None);
        };
        let block = match open {
            OpenBlock::Text(text) => ContentBlock::Text { text },
            OpenBlock::ToolUse { id, name, json } => {
                let input = if json.trim().is_empty() {
                    serde_json::Value::Object(serde_json::Map::new())
                } else {
                    serde_json::from_str(&json).map_err(|e| {
                        ChatError::Model(ClaudeError::Parse(format!(
                            "Invalid tool input JSON: {e}"
                        )))
                    })?
                };
                ContentBlock::ToolUse { id, name, input }
            }
        };
        Ok(Some(block))
    }

    fn complete(&mut self, block: ContentBlock) {
        self.completed.push(block);
    }

    fn into_blocks(self) -> Vec<ContentBlock> {
        self.completed
    }
}

/// Validate and convert client history into model messages.
fn convert_history(request: &ChatTurnRequest) -> Result<Vec<Message>, ChatError> {
    if request.messages.is_empty() {
        return Err(ChatError::EmptyHistory);
    }

    request
        .messages
        .iter()
        .map(|msg| match msg.role.as_str() {
            "user" => Ok(Message::user(msg.content.clone())),
            "assistant" => Ok(Message::assistant(msg.content.clone())),
            other => Err(ChatError::InvalidRole(other.to_string())),
        })
        .collect()
}
