//! The `navigate_to_page` tool: free-text page names to a fixed route table.

use serde::Serialize;

/// The fixed route table. Checkout is deliberately absent: it is only
/// reachable through the cart review step.
const ROUTES: &[(&str, &str)] = &[
    ("home", "/"),
    ("shop", "/shop"),
    ("about", "/about"),
    ("contact", "/contact"),
    ("account", "/account"),
    ("cart", "/cart"),
];

/// Result of a navigation request.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationOutput {
    /// Whether a navigable route was produced.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Route to navigate to, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Canonical page name for the route.
    #[serde(rename = "pageName", skip_serializing_if = "Option::is_none")]
    pub page_name: Option<String>,
    /// Set when the customer asked for checkout directly.
    #[serde(rename = "isCheckout", skip_serializing_if = "Option::is_none")]
    pub is_checkout: Option<bool>,
    /// What the customer should do instead, for blocked requests.
    #[serde(rename = "suggestedAction", skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Resolve a free-text page name to a route.
///
/// Matching is case-insensitive and trims whitespace, with a few common
/// synonyms. Asking for checkout never succeeds: the result redirects to
/// the cart so the customer reviews their order first. Unknown names fail
/// with the valid names enumerated.
#[must_use]
pub fn navigate_to_page(page: &str) -> NavigationOutput {
    let normalized = page.trim().to_lowercase();
    let canonical = canonical_page(&normalized);

    if canonical == "checkout" {
        return NavigationOutput {
            success: false,
            message: "Let's review your cart before heading to checkout".to_string(),
            route: Some("/cart".to_string()),
            page_name: None,
            is_checkout: Some(true),
            suggested_action: Some(
                "Review the items in your cart, then proceed to checkout from there".to_string(),
            ),
        };
    }

    if let Some((name, route)) = ROUTES.iter().find(|(name, _)| *name == canonical) {
        return NavigationOutput {
            success: true,
            message: format!("Navigating to the {name} page"),
            route: Some((*route).to_string()),
            page_name: Some((*name).to_string()),
            is_checkout: None,
            suggested_action: None,
        };
    }

    let valid: Vec<&str> = ROUTES.iter().map(|(name, _)| *name).collect();
    NavigationOutput {
        success: false,
        message: format!(
            "Unknown page \"{page}\". Valid pages are: {}",
            valid.join(", ")
        ),
        route: None,
        page_name: None,
        is_checkout: None,
        suggested_action: None,
    }
}

/// Collapse synonyms onto canonical page names.
fn canonical_page(normalized: &str) -> &str {
    match normalized {
        "store" | "browse" | "products" => "shop",
        "main" | "landing" => "home",
        "basket" | "bag" => "cart",
        "pay" | "payment" => "checkout",
        "profile" | "login" => "account",
        other => other,
    }
}
