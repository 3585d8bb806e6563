//! Wire-level contract of the tool registry as the rendering layer sees it.

use std::collections::BTreeSet;

use leekspin_core::CartSnapshot;
use leekspin_integration_tests::{ScriptedModel, test_state, text_response, tool_call_response};
use leekspin_server::agent::agent_tools;
use leekspin_server::services::{ChatService, ChatStreamEvent, ChatTurnRequest, IncomingMessage};

const TOOL_NAMES: [&str; 12] = [
    "list_products",
    "search_products",
    "get_product_details",
    "filter_by_category",
    "get_products_in_price_range",
    "get_featured_products",
    "check_availability",
    "get_product_categories",
    "get_recommendations",
    "list_cart_items",
    "navigate_to_page",
    "fill_checkout_form",
];

#[test]
fn test_registry_exposes_exactly_the_twelve_tools() {
    let tools = agent_tools();
    let names: BTreeSet<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, TOOL_NAMES.iter().copied().collect::<BTreeSet<_>>());
    assert_eq!(tools.len(), 12);
}

#[test]
fn test_every_tool_has_an_object_schema_and_description() {
    for tool in agent_tools() {
        assert_eq!(
            tool.input_schema["type"], "object",
            "{} schema is not an object",
            tool.name
        );
        assert!(
            !tool.description.is_empty(),
            "{} has no description",
            tool.name
        );
    }
}

async fn run_single_tool(name: &str, input: serde_json::Value) -> serde_json::Value {
    let model = ScriptedModel::new(vec![
        tool_call_response(name, input),
        text_response("Done."),
    ]);
    let service = ChatService::new(&test_state(model));
    let events = service
        .run_turn(
            ChatTurnRequest {
                messages: vec![IncomingMessage {
                    role: "user".to_string(),
                    content: "go".to_string(),
                }],
            },
            CartSnapshot::empty(),
        )
        .await
        .expect("turn succeeds");

    events
        .iter()
        .find_map(|e| match e {
            ChatStreamEvent::ToolResult { output, .. } => Some(output.clone()),
            _ => None,
        })
        .expect("a tool result frame")
}

#[tokio::test]
async fn test_navigation_output_shape() {
    let output = run_single_tool("navigate_to_page", serde_json::json!({"page": "Store"})).await;
    assert_eq!(output["success"], true);
    assert_eq!(output["route"], "/shop");
    assert_eq!(output["pageName"], "shop");
    assert!(output.get("isCheckout").is_none());
}

#[tokio::test]
async fn test_checkout_navigation_is_always_blocked() {
    for page in ["checkout", "pay", "payment"] {
        let output = run_single_tool("navigate_to_page", serde_json::json!({"page": page})).await;
        assert_eq!(output["success"], false, "{page} was not blocked");
        assert_eq!(output["isCheckout"], true);
        assert_eq!(output["route"], "/cart");
        assert!(output["suggestedAction"].is_string());
    }
}

#[tokio::test]
async fn test_unknown_page_lists_valid_names() {
    let output = run_single_tool("navigate_to_page", serde_json::json!({"page": "warehouse"})).await;
    assert_eq!(output["success"], false);
    let message = output["message"].as_str().expect("message string");
    for name in ["home", "shop", "about", "contact", "account", "cart"] {
        assert!(message.contains(name), "message missing {name}");
    }
}

#[tokio::test]
async fn test_checkout_form_masks_payment_details() {
    let input = serde_json::json!({
        "firstName": "Loituma",
        "lastName": "Polka",
        "email": "loituma@example.com",
        "address": "1 Leek Lane",
        "city": "Savonlinna",
        "zip": "57100",
        "cardNumber": "4242 4242 4242 4242",
        "expiry": "12/30",
        "cvv": "123",
    });
    let output = run_single_tool("fill_checkout_form", input).await;

    assert_eq!(output["success"], true);
    assert_eq!(
        output["message"],
        "Checkout form filled for Loituma Polka"
    );
    assert_eq!(
        output["formData"]["payment"]["cardNumber"],
        "**** **** **** 4242"
    );
    assert_eq!(output["formData"]["payment"]["cvv"], "***");
    assert_eq!(
        output["formData"]["rawPayment"]["cardNumber"],
        "4242 4242 4242 4242"
    );
    assert_eq!(output["formData"]["shipping"]["email"], "loituma@example.com");
}

#[tokio::test]
async fn test_availability_for_missing_product_is_not_an_error() {
    let output = run_single_tool("check_availability", serde_json::json!({"productId": 99999})).await;
    assert_eq!(output["productId"], 99999);
    assert_eq!(output["inStock"], false);
    assert_eq!(output["productName"], "Product not found");
    assert_eq!(output["availability"], "Out of Stock");
}

#[tokio::test]
async fn test_categories_are_sorted_and_counted() {
    let output = run_single_tool("get_product_categories", serde_json::json!({})).await;
    let categories: Vec<&str> = output["categories"]
        .as_array()
        .expect("categories array")
        .iter()
        .filter_map(serde_json::Value::as_str)
        .collect();
    assert!(!categories.is_empty());
    let mut sorted = categories.clone();
    sorted.sort_unstable();
    assert_eq!(categories, sorted);
    assert_eq!(output["count"], categories.len());
}
