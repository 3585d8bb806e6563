//! The shopping agent's tool surface.
//!
//! A fixed catalog of named tools the model may invoke: catalog queries,
//! cart inspection, client-side navigation, and checkout form pre-fill.
//! Each tool carries a JSON schema the model sees, a typed parameter
//! struct arguments are validated against, and a structured output shape
//! the rendering layer consumes.

mod checkout;
mod executor;
mod navigation;
mod output;
mod registry;

pub use checkout::{CheckoutFormOutput, CheckoutFormParams, fill_checkout_form};
pub use executor::{ToolContext, ToolError, execute_tool};
pub use navigation::{NavigationOutput, navigate_to_page};
pub use output::ToolOutput;
pub use registry::{ToolKind, agent_tools};
