//! Integration tests for Leekspin Market.
//!
//! The tests in `tests/` drive the full conversation loop (history
//! validation, model call, tool execution, result feedback, streaming)
//! against a scripted model, so they run without network access or an
//! API key.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p leekspin-integration-tests
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use leekspin_core::Catalog;
use leekspin_server::claude::{
    ChatModel, ChatResponse, ClaudeError, ContentBlock, ContentBlockDelta, ContentBlockStart,
    Message, MessageDelta, StopReason, StreamEvent, StreamMessage, Tool, Usage,
};
use leekspin_server::config::{ClaudeConfig, ServerConfig};
use leekspin_server::state::AppState;
use secrecy::SecretString;

/// A [`ChatModel`] that replays a fixed script of responses.
///
/// Each model call consumes the next scripted response; a looping script
/// replays its last response forever. Every call's message history is
/// recorded so tests can assert what the orchestrator fed back.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<ChatResponse>>,
    looping: Option<ChatResponse>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedModel {
    /// A model that answers with the given responses in order, then fails.
    #[must_use]
    pub fn new(responses: Vec<ChatResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            looping: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// A model that answers every call with the same response.
    #[must_use]
    pub fn looping(response: ChatResponse) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            looping: Some(response),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Histories received so far, one entry per model call.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn next_response(&self, messages: Vec<Message>) -> Result<ChatResponse, ClaudeError> {
        self.calls.lock().expect("calls lock").push(messages);
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .or_else(|| self.looping.clone())
            .ok_or_else(|| ClaudeError::Api {
                error_type: "invalid_request_error".to_string(),
                message: "scripted model exhausted".to_string(),
            })
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(
        &self,
        messages: Vec<Message>,
        _system: Option<String>,
        _tools: Option<Vec<Tool>>,
    ) -> Result<ChatResponse, ClaudeError> {
        self.next_response(messages)
    }

    async fn chat_stream(
        &self,
        messages: Vec<Message>,
        _system: Option<String>,
        _tools: Option<Vec<Tool>>,
    ) -> Result<BoxStream<'static, Result<StreamEvent, ClaudeError>>, ClaudeError> {
        let response = self.next_response(messages)?;
        Ok(stream::iter(stream_script(&response)).map(Ok).boxed())
    }
}

/// Expand a complete response into the event sequence the streaming API
/// would emit for it.
#[must_use]
pub fn stream_script(response: &ChatResponse) -> Vec<StreamEvent> {
    let mut events = vec![StreamEvent::MessageStart {
        message: StreamMessage {
            id: response.id.clone(),
            model: response.model.clone(),
            usage: usage(),
        },
    }];

    for (index, block) in response.content.iter().enumerate() {
        match block {
            ContentBlock::Text { text } => {
                events.push(StreamEvent::ContentBlockStart {
                    index,
                    content_block: ContentBlockStart::Text {
                        text: String::new(),
                    },
                });
                events.push(StreamEvent::ContentBlockDelta {
                    index,
                    delta: ContentBlockDelta::TextDelta { text: text.clone() },
                });
            }
            ContentBlock::ToolUse { id, name, input } => {
                events.push(StreamEvent::ContentBlockStart {
                    index,
                    content_block: ContentBlockStart::ToolUse {
                        id: id.clone(),
                        name: name.clone(),
                        input: serde_json::json!({}),
                    },
                });
                events.push(StreamEvent::ContentBlockDelta {
                    index,
                    delta: ContentBlockDelta::InputJsonDelta {
                        partial_json: input.to_string(),
                    },
                });
            }
            ContentBlock::ToolResult { .. } => {}
        }
        events.push(StreamEvent::ContentBlockStop { index });
    }

    events.push(StreamEvent::MessageDelta {
        delta: MessageDelta {
            stop_reason: response.stop_reason,
        },
        usage: usage(),
    });
    events.push(StreamEvent::MessageStop);
    events
}

/// A text-only response ending the turn.
#[must_use]
pub fn text_response(text: &str) -> ChatResponse {
    response(
        vec![ContentBlock::Text {
            text: text.to_string(),
        }],
        Some(StopReason::EndTurn),
    )
}

/// A response requesting a single tool call.
#[must_use]
pub fn tool_call_response(name: &str, input: serde_json::Value) -> ChatResponse {
    response(
        vec![ContentBlock::ToolUse {
            id: format!("toolu_{name}"),
            name: name.to_string(),
            input,
        }],
        Some(StopReason::ToolUse),
    )
}

fn response(content: Vec<ContentBlock>, stop_reason: Option<StopReason>) -> ChatResponse {
    ChatResponse {
        id: "msg_scripted".to_string(),
        model: "scripted".to_string(),
        stop_reason,
        content,
        usage: usage(),
    }
}

const fn usage() -> Usage {
    Usage {
        input_tokens: 0,
        output_tokens: 0,
    }
}

/// Application state wired to a scripted model and the seed catalog.
#[must_use]
pub fn test_state(model: Arc<dyn ChatModel>) -> AppState {
    AppState::with_model(test_config(), Catalog::seed(), model)
}

/// A configuration that never touches the environment.
#[must_use]
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        claude: ClaudeConfig {
            api_key: SecretString::from("sk-ant-test"),
            model: "scripted".to_string(),
            max_tokens: 2048,
            request_timeout_secs: 60,
        },
        sentry_dsn: None,
        sentry_environment: "test".to_string(),
    }
}
