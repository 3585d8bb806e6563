//! The fixed tool registry exposed to the model.
//!
//! Tool names and parameter shapes are part of the agent's capability
//! surface and are consumed by the rendering layer as well as the model;
//! renaming a tool or changing its schema is a breaking change.

use serde_json::json;

use crate::claude::Tool;

/// Every tool the agent can invoke, as a closed set.
///
/// Dispatch happens on this enum, not on raw name strings, so an unknown
/// name is rejected once at the registry boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// List products with optional filtering.
    ListProducts,
    /// Substring search over name, description, and tags.
    SearchProducts,
    /// Look up one product by id.
    GetProductDetails,
    /// All products in one category.
    FilterByCategory,
    /// Products within an inclusive price range.
    GetProductsInPriceRange,
    /// All featured products.
    GetFeaturedProducts,
    /// Stock check for one product.
    CheckAvailability,
    /// Distinct catalog categories.
    GetProductCategories,
    /// Product recommendations.
    GetRecommendations,
    /// Read the request's cart snapshot.
    ListCartItems,
    /// Map a page name to a client-side route.
    NavigateToPage,
    /// Shape checkout form data with masked payment fields.
    FillCheckoutForm,
}

impl ToolKind {
    /// All tools, in the order they are presented to the model.
    pub const ALL: [Self; 12] = [
        Self::ListProducts,
        Self::SearchProducts,
        Self::GetProductDetails,
        Self::FilterByCategory,
        Self::GetProductsInPriceRange,
        Self::GetFeaturedProducts,
        Self::CheckAvailability,
        Self::GetProductCategories,
        Self::GetRecommendations,
        Self::ListCartItems,
        Self::NavigateToPage,
        Self::FillCheckoutForm,
    ];

    /// The wire name of this tool.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ListProducts => "list_products",
            Self::SearchProducts => "search_products",
            Self::GetProductDetails => "get_product_details",
            Self::FilterByCategory => "filter_by_category",
            Self::GetProductsInPriceRange => "get_products_in_price_range",
            Self::GetFeaturedProducts => "get_featured_products",
            Self::CheckAvailability => "check_availability",
            Self::GetProductCategories => "get_product_categories",
            Self::GetRecommendations => "get_recommendations",
            Self::ListCartItems => "list_cart_items",
            Self::NavigateToPage => "navigate_to_page",
            Self::FillCheckoutForm => "fill_checkout_form",
        }
    }

    /// Resolve a wire name to a tool.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// The tool definition sent to the model.
    #[must_use]
    pub fn definition(self) -> Tool {
        match self {
            Self::ListProducts => list_products_tool(),
            Self::SearchProducts => search_products_tool(),
            Self::GetProductDetails => get_product_details_tool(),
            Self::FilterByCategory => filter_by_category_tool(),
            Self::GetProductsInPriceRange => get_products_in_price_range_tool(),
            Self::GetFeaturedProducts => get_featured_products_tool(),
            Self::CheckAvailability => check_availability_tool(),
            Self::GetProductCategories => get_product_categories_tool(),
            Self::GetRecommendations => get_recommendations_tool(),
            Self::ListCartItems => list_cart_items_tool(),
            Self::NavigateToPage => navigate_to_page_tool(),
            Self::FillCheckoutForm => fill_checkout_form_tool(),
        }
    }
}

/// All tool definitions, in presentation order.
#[must_use]
pub fn agent_tools() -> Vec<Tool> {
    ToolKind::ALL.into_iter().map(ToolKind::definition).collect()
}

// =============================================================================
// Catalog Query Tools
// =============================================================================

fn list_products_tool() -> Tool {
    Tool {
        name: "list_products".to_string(),
        description: "Get all products with optional filtering by category, price range, \
            stock status, featured status, or search term"
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Filter by product category"
                },
                "minPrice": {
                    "type": "number",
                    "description": "Minimum price filter"
                },
                "maxPrice": {
                    "type": "number",
                    "description": "Maximum price filter"
                },
                "inStock": {
                    "type": "boolean",
                    "description": "Filter by stock availability"
                },
                "featured": {
                    "type": "boolean",
                    "description": "Filter by featured status"
                },
                "search": {
                    "type": "string",
                    "description": "Search term for products"
                }
            }
        }),
    }
}

fn search_products_tool() -> Tool {
    Tool {
        name: "search_products".to_string(),
        description: "Search products by name, description, or tags".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query term"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results to return (default 10)"
                },
                "category": {
                    "type": "string",
                    "description": "Limit search to specific category"
                }
            },
            "required": ["query"]
        }),
    }
}

fn get_product_details_tool() -> Tool {
    Tool {
        name: "get_product_details".to_string(),
        description: "Get detailed information about a specific product by its ID".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "productId": {
                    "type": "integer",
                    "description": "The ID of the product to retrieve"
                }
            },
            "required": ["productId"]
        }),
    }
}

fn filter_by_category_tool() -> Tool {
    Tool {
        name: "filter_by_category".to_string(),
        description: "Get all products in a specific category".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Product category to filter by"
                }
            },
            "required": ["category"]
        }),
    }
}

fn get_products_in_price_range_tool() -> Tool {
    Tool {
        name: "get_products_in_price_range".to_string(),
        description: "Get products within a specific price range".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "minPrice": {
                    "type": "number",
                    "description": "Minimum price"
                },
                "maxPrice": {
                    "type": "number",
                    "description": "Maximum price"
                }
            },
            "required": ["minPrice", "maxPrice"]
        }),
    }
}

fn get_featured_products_tool() -> Tool {
    Tool {
        name: "get_featured_products".to_string(),
        description: "Get all featured products".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

fn check_availability_tool() -> Tool {
    Tool {
        name: "check_availability".to_string(),
        description: "Check if a product is currently in stock".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "productId": {
                    "type": "integer",
                    "description": "The ID of the product to check"
                }
            },
            "required": ["productId"]
        }),
    }
}

fn get_product_categories_tool() -> Tool {
    Tool {
        name: "get_product_categories".to_string(),
        description: "Get all available product categories".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

fn get_recommendations_tool() -> Tool {
    Tool {
        name: "get_recommendations".to_string(),
        description: "Get product recommendations based on a product, category, or price range"
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "productId": {
                    "type": "integer",
                    "description": "Base product ID for similar recommendations"
                },
                "category": {
                    "type": "string",
                    "description": "Category for recommendations"
                },
                "minPrice": {
                    "type": "number",
                    "description": "Minimum price for recommendations"
                },
                "maxPrice": {
                    "type": "number",
                    "description": "Maximum price for recommendations"
                },
                "limit": {
                    "type": "integer",
                    "description": "Number of recommendations to return (default 5)"
                }
            }
        }),
    }
}

// =============================================================================
// Cart, Navigation, and Checkout Tools
// =============================================================================

fn list_cart_items_tool() -> Tool {
    Tool {
        name: "list_cart_items".to_string(),
        description: "List the items currently in the customer's shopping cart, with \
            quantities and the cart total"
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

fn navigate_to_page_tool() -> Tool {
    Tool {
        name: "navigate_to_page".to_string(),
        description: "Navigate the customer to a page of the store. Valid pages: home, shop, \
            about, contact, account, cart. Requests for the checkout page are redirected to \
            the cart for review first."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "page": {
                    "type": "string",
                    "description": "Name of the page to navigate to (e.g. 'shop', 'cart')"
                }
            },
            "required": ["page"]
        }),
    }
}

fn fill_checkout_form_tool() -> Tool {
    Tool {
        name: "fill_checkout_form".to_string(),
        description: "Pre-fill the checkout form with shipping and payment details the \
            customer has provided. Does not submit the form or process payment."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "firstName": { "type": "string", "description": "First name" },
                "lastName": { "type": "string", "description": "Last name" },
                "email": { "type": "string", "description": "Email address" },
                "address": { "type": "string", "description": "Street address" },
                "city": { "type": "string", "description": "City" },
                "zip": { "type": "string", "description": "ZIP or postal code" },
                "cardNumber": { "type": "string", "description": "Card number" },
                "expiry": { "type": "string", "description": "Card expiry (MM/YY)" },
                "cvv": { "type": "string", "description": "Card CVV" }
            },
            "required": [
                "firstName", "lastName", "email", "address", "city", "zip",
                "cardNumber", "expiry", "cvv"
            ]
        }),
    }
}
