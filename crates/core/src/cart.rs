//! Request-scoped cart snapshot decoding.
//!
//! The client owns the cart; the agent only reads a snapshot transported as a
//! URL-encoded JSON array in the `cart_items` cookie. Decoding is strictly
//! per-request: a snapshot must never be cached or shared across requests,
//! and nothing in this module writes cart state back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::ProductId;

/// One line of a client cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product id of the line.
    pub id: ProductId,
    /// Product name as the client last saw it.
    pub name: String,
    /// Unit price as the client last saw it.
    pub price: Decimal,
    /// Display asset reference.
    pub image: String,
    /// Number of units. Lines with zero quantity are dropped during decode.
    pub quantity: u32,
}

/// A decoded, read-only materialization of the client's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    lines: Vec<CartLine>,
    total: Decimal,
    readable: bool,
}

impl CartSnapshot {
    /// An empty cart from a readable (absent or empty) source.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total: Decimal::ZERO,
            readable: true,
        }
    }

    /// An empty cart standing in for a token that could not be decoded.
    ///
    /// Malformed tokens degrade to empty-cart semantics instead of failing
    /// the conversation, but callers can render a distinct message.
    #[must_use]
    pub const fn unreadable() -> Self {
        Self {
            lines: Vec::new(),
            total: Decimal::ZERO,
            readable: false,
        }
    }

    /// Decode a cart token: a URL-encoded JSON array of [`CartLine`].
    ///
    /// Absent or empty input yields an empty cart. Malformed encoding or JSON
    /// yields [`CartSnapshot::unreadable`] - never an error. Lines whose
    /// quantity is zero are treated as removed.
    #[must_use]
    pub fn decode(token: Option<&str>) -> Self {
        let Some(token) = token else {
            return Self::empty();
        };
        if token.trim().is_empty() {
            return Self::empty();
        }

        let Ok(decoded) = urlencoding::decode(token) else {
            return Self::unreadable();
        };
        let Ok(lines) = serde_json::from_str::<Vec<CartLine>>(&decoded) else {
            return Self::unreadable();
        };

        Self::from_lines(lines)
    }

    /// Build a snapshot from already-decoded lines, dropping removed lines
    /// and computing the total.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let lines: Vec<CartLine> = lines.into_iter().filter(|l| l.quantity > 0).collect();
        let total = lines
            .iter()
            .map(|l| l.price * Decimal::from(l.quantity))
            .sum();
        Self {
            lines,
            total,
            readable: true,
        }
    }

    /// Encode lines as a cart token (URL-encoded JSON array).
    ///
    /// The server never sets this cookie; encoding exists for tests and
    /// tooling that simulate a client.
    #[must_use]
    pub fn encode_lines(lines: &[CartLine]) -> String {
        let json = serde_json::to_string(lines).unwrap_or_else(|_| "[]".to_string());
        urlencoding::encode(&json).into_owned()
    }

    /// The cart lines, in client order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of `price x quantity` over all lines.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Whether the source token decoded cleanly.
    ///
    /// `false` means the token was present but malformed; the snapshot is
    /// empty either way.
    #[must_use]
    pub const fn is_readable(&self) -> bool {
        self.readable
    }

    /// Human-readable summary used as the tool result message.
    #[must_use]
    pub fn message(&self) -> String {
        if !self.readable {
            return "Unable to read your cart right now".to_string();
        }
        if self.lines.is_empty() {
            return "Your cart is empty".to_string();
        }
        let units: u64 = self.lines.iter().map(|l| u64::from(l.quantity)).sum();
        format!(
            "Your cart has {} item{} ({} unit{}) totaling ${}",
            self.count(),
            if self.count() == 1 { "" } else { "s" },
            units,
            if units == 1 { "" } else { "s" },
            self.total
        )
    }
}
