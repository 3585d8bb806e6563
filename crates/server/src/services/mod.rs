//! Business logic services.

pub mod chat;

pub use chat::{
    ChatError, ChatService, ChatStreamEvent, ChatTurnRequest, IncomingMessage, MAX_TOOL_ITERATIONS,
};
