//! The `fill_checkout_form` tool: pure data shaping, no payment processing.
//!
//! Returns three parallel shapes: shipping details, payment details with
//! the card number and CVV masked for display, and the raw payment values
//! for downstream form population. Nothing here performs network calls or
//! mutates checkout state.

use serde::{Deserialize, Serialize};

const MASK_CHAR: char = '*';
const VISIBLE_CARD_DIGITS: usize = 4;

/// Arguments for `fill_checkout_form`. All fields are required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CheckoutFormParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

/// Result of `fill_checkout_form`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutFormOutput {
    /// Always true; validation failures are rejected before execution.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// The shaped form data.
    #[serde(rename = "formData")]
    pub form_data: FormData,
}

/// Shipping, display-safe payment, and raw payment sections.
#[derive(Debug, Clone, Serialize)]
pub struct FormData {
    /// Shipping details, passed through unchanged.
    pub shipping: ShippingDetails,
    /// Payment details with card number and CVV masked.
    pub payment: PaymentDetails,
    /// Unmasked payment values for form population.
    #[serde(rename = "rawPayment")]
    pub raw_payment: PaymentDetails,
}

/// Shipping address fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip: String,
}

/// Payment fields, masked or raw depending on the section.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

/// Shape checkout form data from validated arguments.
#[must_use]
pub fn fill_checkout_form(params: CheckoutFormParams) -> CheckoutFormOutput {
    let masked = PaymentDetails {
        card_number: mask_card_number(&params.card_number),
        expiry: params.expiry.clone(),
        cvv: mask_cvv(&params.cvv),
    };
    let raw = PaymentDetails {
        card_number: params.card_number,
        expiry: params.expiry,
        cvv: params.cvv,
    };

    CheckoutFormOutput {
        success: true,
        message: format!(
            "Checkout form filled for {} {}",
            params.first_name, params.last_name
        ),
        form_data: FormData {
            shipping: ShippingDetails {
                first_name: params.first_name,
                last_name: params.last_name,
                email: params.email,
                address: params.address,
                city: params.city,
                zip: params.zip,
            },
            payment: masked,
            raw_payment: raw,
        },
    }
}

/// Mask every digit except the last four, keeping separators in place.
fn mask_card_number(card_number: &str) -> String {
    let digit_count = card_number.chars().filter(char::is_ascii_digit).count();
    let masked_digits = digit_count.saturating_sub(VISIBLE_CARD_DIGITS);

    let mut seen = 0;
    card_number
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen <= masked_digits { MASK_CHAR } else { c }
            } else {
                c
            }
        })
        .collect()
}

/// Mask every character of the CVV.
fn mask_cvv(cvv: &str) -> String {
    MASK_CHAR.to_string().repeat(cvv.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CheckoutFormParams {
        CheckoutFormParams {
            first_name: "Loituma".to_string(),
            last_name: "Polka".to_string(),
            email: "loituma@example.com".to_string(),
            address: "1 Ievan St".to_string(),
            city: "Helsinki".to_string(),
            zip: "00100".to_string(),
            card_number: "4242 4242 4242 4242".to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_mask_card_number_keeps_last_four_digits() {
        assert_eq!(mask_card_number("4242424242424242"), "************4242");
        assert_eq!(mask_card_number("4242 4242 4242 4242"), "**** **** **** 4242");
    }

    #[test]
    fn test_mask_card_number_short_input() {
        assert_eq!(mask_card_number("4242"), "4242");
        assert_eq!(mask_card_number("42"), "42");
        assert_eq!(mask_card_number(""), "");
    }

    #[test]
    fn test_mask_cvv_replaces_every_character() {
        assert_eq!(mask_cvv("123"), "***");
        assert_eq!(mask_cvv("1234"), "****");
        assert_eq!(mask_cvv(""), "");
    }

    #[test]
    fn test_fill_shapes_all_three_sections() {
        let output = fill_checkout_form(params());
        assert!(output.success);
        assert_eq!(output.form_data.shipping.first_name, "Loituma");
        assert_eq!(
            output.form_data.payment.card_number,
            "**** **** **** 4242"
        );
        assert_eq!(output.form_data.payment.cvv, "***");
        assert_eq!(
            output.form_data.raw_payment.card_number,
            "4242 4242 4242 4242"
        );
        assert_eq!(output.form_data.raw_payment.cvv, "123");
    }

    #[test]
    fn test_serialized_field_names() {
        let output = fill_checkout_form(params());
        let json = serde_json::to_value(&output).expect("serialize");
        assert_eq!(json["formData"]["shipping"]["firstName"], "Loituma");
        assert_eq!(json["formData"]["payment"]["cardNumber"], "**** **** **** 4242");
        assert_eq!(json["formData"]["rawPayment"]["cvv"], "123");
    }
}
