//! Cart snapshot flow: cookie token in, tool output out.

use leekspin_core::{CartLine, CartSnapshot, ProductId};
use leekspin_integration_tests::{ScriptedModel, test_state, text_response, tool_call_response};
use leekspin_server::services::{ChatService, ChatStreamEvent, ChatTurnRequest, IncomingMessage};
use rust_decimal_macros::dec;

fn cart_request() -> ChatTurnRequest {
    ChatTurnRequest {
        messages: vec![IncomingMessage {
            role: "user".to_string(),
            content: "what's in my cart?".to_string(),
        }],
    }
}

fn cart_script() -> Vec<leekspin_server::claude::ChatResponse> {
    vec![
        tool_call_response("list_cart_items", serde_json::json!({})),
        text_response("Here's your cart."),
    ]
}

fn line(id: i64, name: &str, price: rust_decimal::Decimal, quantity: u32) -> CartLine {
    CartLine {
        id: ProductId::new(id),
        name: name.to_string(),
        price,
        image: "/images/leek.jpg".to_string(),
        quantity,
    }
}

fn tool_output(events: &[ChatStreamEvent]) -> serde_json::Value {
    events
        .iter()
        .find_map(|e| match e {
            ChatStreamEvent::ToolResult { output, .. } => Some(output.clone()),
            _ => None,
        })
        .expect("a tool result frame")
}

#[tokio::test]
async fn test_cart_token_round_trip_through_tool() {
    let token = CartSnapshot::encode_lines(&[line(1, "Fresh Leek", dec!(10), 2)]);
    let cart = CartSnapshot::decode(Some(&token));

    let service = ChatService::new(&test_state(ScriptedModel::new(cart_script())));
    let events = service
        .run_turn(cart_request(), cart)
        .await
        .expect("turn succeeds");

    let output = tool_output(&events);
    assert_eq!(output["count"], 1);
    assert_eq!(output["total"], "20");
    assert_eq!(output["items"][0]["name"], "Fresh Leek");
    assert_eq!(output["items"][0]["quantity"], 2);
    assert_eq!(output["message"], "Your cart has 1 item (2 units) totaling $20");
}

#[tokio::test]
async fn test_unreadable_token_degrades_to_empty_cart() {
    let cart = CartSnapshot::decode(Some("%zz-not-json"));
    assert!(!cart.is_readable());

    let service = ChatService::new(&test_state(ScriptedModel::new(cart_script())));
    let events = service
        .run_turn(cart_request(), cart)
        .await
        .expect("turn succeeds");

    let output = tool_output(&events);
    assert_eq!(output["count"], 0);
    assert_eq!(
        output["message"],
        "Unable to read your cart right now"
    );
}

#[tokio::test]
async fn test_concurrent_turns_keep_carts_isolated() {
    let cart_a = CartSnapshot::decode(Some(&CartSnapshot::encode_lines(&[line(
        1,
        "Fresh Leek",
        dec!(10),
        2,
    )])));
    let cart_b = CartSnapshot::decode(Some(&CartSnapshot::encode_lines(&[
        line(2, "Leek Plush", dec!(25), 1),
        line(3, "Leek Mug", dec!(15), 3),
    ])));

    let service_a = ChatService::new(&test_state(ScriptedModel::new(cart_script())));
    let service_b = ChatService::new(&test_state(ScriptedModel::new(cart_script())));

    let (events_a, events_b) = tokio::join!(
        service_a.run_turn(cart_request(), cart_a),
        service_b.run_turn(cart_request(), cart_b),
    );

    let output_a = tool_output(&events_a.expect("turn a succeeds"));
    let output_b = tool_output(&events_b.expect("turn b succeeds"));

    assert_eq!(output_a["count"], 1);
    assert_eq!(output_a["total"], "20");
    assert_eq!(output_b["count"], 2);
    assert_eq!(output_b["total"], "70");
}
