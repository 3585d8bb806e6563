//! End-to-end conversation loop tests with a scripted model.

use futures::StreamExt;
use leekspin_core::CartSnapshot;
use leekspin_integration_tests::{
    ScriptedModel, test_state, text_response, tool_call_response,
};
use leekspin_server::claude::{ContentBlock, Message, MessageContent};
use leekspin_server::services::{
    ChatError, ChatService, ChatStreamEvent, ChatTurnRequest, IncomingMessage,
    MAX_TOOL_ITERATIONS,
};

fn user_request(content: &str) -> ChatTurnRequest {
    ChatTurnRequest {
        messages: vec![IncomingMessage {
            role: "user".to_string(),
            content: content.to_string(),
        }],
    }
}

#[tokio::test]
async fn test_text_only_turn() {
    let model = ScriptedModel::new(vec![text_response("Welcome to Leekspin Market!")]);
    let service = ChatService::new(&test_state(model));

    let events = service
        .run_turn(user_request("hi"), CartSnapshot::empty())
        .await
        .expect("turn succeeds");

    assert_eq!(events.len(), 2);
    let ChatStreamEvent::TextDelta { text } = &events[0] else {
        panic!("expected text delta, got {:?}", events[0]);
    };
    assert_eq!(text, "Welcome to Leekspin Market!");
    assert!(matches!(events[1], ChatStreamEvent::Done));
}

#[tokio::test]
async fn test_tool_round_executes_and_feeds_results_back() {
    let model = ScriptedModel::new(vec![
        tool_call_response("get_featured_products", serde_json::json!({})),
        text_response("Here are our featured leeks."),
    ]);
    let service = ChatService::new(&test_state(model.clone()));

    let events = service
        .run_turn(user_request("what's featured?"), CartSnapshot::empty())
        .await
        .expect("turn succeeds");

    let tool_result = events
        .iter()
        .find_map(|e| match e {
            ChatStreamEvent::ToolResult {
                tool_name,
                output,
                is_error,
            } => Some((tool_name, output, is_error)),
            _ => None,
        })
        .expect("a tool result frame");
    assert_eq!(tool_result.0, "get_featured_products");
    assert!(!tool_result.2);

    // Narrated count matches the array that was returned
    let products = tool_result.1["products"].as_array().expect("products array");
    assert_eq!(tool_result.1["count"], products.len());
    assert_eq!(
        tool_result.1["message"],
        format!("Found {} featured products", products.len())
    );

    assert!(matches!(events.last(), Some(ChatStreamEvent::Done)));

    // The second model call carries the tool result as a user message
    let calls = model.calls();
    assert_eq!(calls.len(), 2);
    let last_message: &Message = calls[1].last().expect("second call has messages");
    assert_eq!(last_message.role, "user");
    let MessageContent::Blocks(blocks) = &last_message.content else {
        panic!("expected block content");
    };
    assert!(
        blocks
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolResult { .. }))
    );
}

#[tokio::test]
async fn test_streaming_turn_emits_framed_events() {
    let model = ScriptedModel::new(vec![
        tool_call_response("search_products", serde_json::json!({"query": "leek"})),
        text_response("Plenty of leeks in stock."),
    ]);
    let service = ChatService::new(&test_state(model));

    let events: Vec<ChatStreamEvent> = service
        .stream_turn(user_request("find leeks"), CartSnapshot::empty())
        .collect()
        .await;

    let tool_call = events
        .iter()
        .find_map(|e| match e {
            ChatStreamEvent::ToolCall { tool_name, input } => Some((tool_name, input)),
            _ => None,
        })
        .expect("a tool call frame");
    assert_eq!(tool_call.0, "search_products");
    assert_eq!(tool_call.1["query"], "leek");

    assert!(
        events
            .iter()
            .any(|e| matches!(e, ChatStreamEvent::TextDelta { text } if text.contains("Plenty")))
    );
    assert!(matches!(events.last(), Some(ChatStreamEvent::Done)));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, ChatStreamEvent::Error { .. }))
    );
}

#[tokio::test]
async fn test_streaming_empty_history_is_an_error_frame() {
    let model = ScriptedModel::new(vec![]);
    let service = ChatService::new(&test_state(model));

    let events: Vec<ChatStreamEvent> = service
        .stream_turn(
            ChatTurnRequest { messages: vec![] },
            CartSnapshot::empty(),
        )
        .collect()
        .await;

    assert_eq!(events.len(), 1);
    let ChatStreamEvent::Error { message, retryable } = &events[0] else {
        panic!("expected error frame, got {:?}", events[0]);
    };
    assert!(message.contains("empty"));
    assert!(!retryable);
}

#[tokio::test]
async fn test_tool_loop_is_bounded() {
    let model = ScriptedModel::looping(tool_call_response(
        "get_featured_products",
        serde_json::json!({}),
    ));
    let service = ChatService::new(&test_state(model.clone()));

    let result = service
        .run_turn(user_request("loop forever"), CartSnapshot::empty())
        .await;

    assert!(matches!(result, Err(ChatError::TooManyToolIterations)));
    assert_eq!(model.calls().len(), MAX_TOOL_ITERATIONS);
}

#[tokio::test]
async fn test_streaming_tool_loop_ends_with_error_frame() {
    let model = ScriptedModel::looping(tool_call_response(
        "get_featured_products",
        serde_json::json!({}),
    ));
    let service = ChatService::new(&test_state(model));

    let events: Vec<ChatStreamEvent> = service
        .stream_turn(user_request("loop forever"), CartSnapshot::empty())
        .collect()
        .await;

    let Some(ChatStreamEvent::Error { message, retryable }) = events.last() else {
        panic!("expected a final error frame");
    };
    assert!(message.contains("too many tool iterations"));
    assert!(!retryable);
    assert!(!events.iter().any(|e| matches!(e, ChatStreamEvent::Done)));
}

#[tokio::test]
async fn test_unknown_tool_is_reported_not_fatal() {
    let model = ScriptedModel::new(vec![
        tool_call_response("order_pizza", serde_json::json!({})),
        text_response("I can only help with leeks."),
    ]);
    let service = ChatService::new(&test_state(model));

    let events = service
        .run_turn(user_request("order me a pizza"), CartSnapshot::empty())
        .await
        .expect("turn still completes");

    let (output, is_error) = events
        .iter()
        .find_map(|e| match e {
            ChatStreamEvent::ToolResult {
                output, is_error, ..
            } => Some((output, is_error)),
            _ => None,
        })
        .expect("a tool result frame");
    assert!(is_error);
    assert!(
        output["error"]
            .as_str()
            .expect("error string")
            .contains("Unknown tool")
    );
    assert!(matches!(events.last(), Some(ChatStreamEvent::Done)));
}

#[tokio::test]
async fn test_invalid_arguments_surface_as_tool_error() {
    let model = ScriptedModel::new(vec![
        tool_call_response("get_product_details", serde_json::json!({"productId": "nope"})),
        text_response("Sorry, I mistyped that."),
    ]);
    let service = ChatService::new(&test_state(model));

    let events = service
        .run_turn(user_request("details please"), CartSnapshot::empty())
        .await
        .expect("turn still completes");

    let is_error = events
        .iter()
        .find_map(|e| match e {
            ChatStreamEvent::ToolResult { is_error, .. } => Some(*is_error),
            _ => None,
        })
        .expect("a tool result frame");
    assert!(is_error);
}
