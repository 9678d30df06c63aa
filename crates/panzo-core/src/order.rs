//! # Order Export
//!
//! Turns the cart into the WhatsApp message the restaurant receives.
//!
//! ```text
//! Hola, te encargo el siguiente pedido:
//!
//! 2x Milanesa - Pan Árabe
//! 1x Coca-Cola 500ml
//!
//! Gracias.
//! ```
//!
//! Prices are left out on purpose: the restaurant confirms the amount when it
//! answers.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;
use crate::types::{CartLine, UNIT_VARIANT};
use crate::validation::{validate_whatsapp_number, ValidationResult};

/// Base of every order link.
const WHATSAPP_BASE_URL: &str = "https://wa.me/";

/// Message framing and destination for exported orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Destination number, international format, digits only.
    #[serde(default = "default_whatsapp_number")]
    pub whatsapp_number: String,

    /// First line of the message.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Last line of the message.
    #[serde(default = "default_closing")]
    pub closing: String,

    /// Variant label that is not worth repeating in the message.
    #[serde(default = "default_unit_label")]
    pub unit_label: String,
}

fn default_whatsapp_number() -> String {
    "5493442678312".to_string()
}

fn default_greeting() -> String {
    "Hola, te encargo el siguiente pedido:".to_string()
}

fn default_closing() -> String {
    "Gracias.".to_string()
}

fn default_unit_label() -> String {
    UNIT_VARIANT.to_string()
}

impl Default for OrderConfig {
    fn default() -> Self {
        OrderConfig {
            whatsapp_number: default_whatsapp_number(),
            greeting: default_greeting(),
            closing: default_closing(),
            unit_label: default_unit_label(),
        }
    }
}

impl OrderConfig {
    /// Validates the destination number.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_whatsapp_number(&self.whatsapp_number)
    }
}

/// Formats one cart line: `"<quantity>x <name>[ - <variant>]"`.
pub fn format_line(line: &CartLine, config: &OrderConfig) -> String {
    if line.variant_type == config.unit_label {
        format!("{}x {}", line.quantity, line.product_name)
    } else {
        format!(
            "{}x {} - {}",
            line.quantity, line.product_name, line.variant_type
        )
    }
}

/// Builds the order message, or `None` when there is nothing to order.
pub fn compose_message(lines: &[CartLine], config: &OrderConfig) -> Option<String> {
    if lines.is_empty() {
        return None;
    }

    let mut message = format!("{}\n\n", config.greeting);
    for line in lines {
        message.push_str(&format_line(line, config));
        message.push('\n');
    }
    message.push('\n');
    message.push_str(&config.closing);

    Some(message)
}

/// Builds the `wa.me` link that opens a chat with the order prefilled.
///
/// ## Errors
/// Returns a [`ValidationError`] when the configured number is not usable.
/// An empty cart yields `Ok(None)`.
pub fn whatsapp_url(lines: &[CartLine], config: &OrderConfig) -> Result<Option<Url>, ValidationError> {
    config.validate()?;

    let Some(message) = compose_message(lines, config) else {
        return Ok(None);
    };

    let base = format!("{}{}", WHATSAPP_BASE_URL, config.whatsapp_number);
    let mut url = Url::parse(&base).map_err(|e| ValidationError::InvalidFormat {
        field: "whatsapp url".to_string(),
        reason: e.to_string(),
    })?;

    // Spaces as `%20`, never the form-encoded `+`.
    url.set_query(Some(&format!("text={}", urlencoding::encode(&message))));

    Ok(Some(url))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn line(name: &str, variant: &str, quantity: i64) -> CartLine {
        CartLine {
            key: crate::cart::line_key(1, variant),
            product_id: 1,
            product_name: name.to_string(),
            product_image: None,
            variant_type: variant.to_string(),
            price: Money::from_units(500),
            quantity,
            condiment_qty: 0,
        }
    }

    #[test]
    fn test_format_line() {
        let config = OrderConfig::default();
        assert_eq!(
            format_line(&line("Milanesa", "Pan Árabe", 2), &config),
            "2x Milanesa - Pan Árabe"
        );
        assert_eq!(
            format_line(&line("Coca-Cola 500ml", "Unidad", 1), &config),
            "1x Coca-Cola 500ml"
        );
    }

    #[test]
    fn test_compose_message() {
        let lines = vec![
            line("Milanesa", "Pan Árabe", 2),
            line("Coca-Cola 500ml", "Unidad", 1),
        ];

        let message = compose_message(&lines, &OrderConfig::default()).unwrap();
        assert_eq!(
            message,
            "Hola, te encargo el siguiente pedido:\n\n\
             2x Milanesa - Pan Árabe\n\
             1x Coca-Cola 500ml\n\
             \n\
             Gracias."
        );
    }

    #[test]
    fn test_compose_message_empty_cart() {
        assert!(compose_message(&[], &OrderConfig::default()).is_none());
    }

    #[test]
    fn test_whatsapp_url() {
        let lines = vec![line("Milanesa", "Pan Árabe", 2)];
        let url = whatsapp_url(&lines, &OrderConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/5493442678312");

        let (name, text) = url.query_pairs().next().unwrap();
        assert_eq!(name, "text");
        assert_eq!(
            text,
            compose_message(&lines, &OrderConfig::default()).unwrap()
        );
    }

    #[test]
    fn test_whatsapp_url_percent_encodes_spaces() {
        let lines = vec![line("Milanesa", "Pan Árabe", 1)];
        let url = whatsapp_url(&lines, &OrderConfig::default())
            .unwrap()
            .unwrap();

        let query = url.query().unwrap();
        assert!(query.starts_with("text=Hola%2C%20te%20encargo%20el%20siguiente%20pedido%3A%0A%0A"));
        assert!(query.contains("1x%20Milanesa%20-%20Pan%20%C3%81rabe"));
        assert!(query.ends_with("%0A%0AGracias."));
        assert!(!query.contains('+'));
    }

    #[test]
    fn test_whatsapp_url_escapes_query_delimiters() {
        let lines = vec![line("Papas & Cheddar", "Unidad", 1)];
        let url = whatsapp_url(&lines, &OrderConfig::default())
            .unwrap()
            .unwrap();

        assert!(url.query().unwrap().contains("Papas%20%26%20Cheddar"));
        assert_eq!(url.query_pairs().count(), 1);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_whatsapp_url_empty_and_invalid() {
        assert!(whatsapp_url(&[], &OrderConfig::default()).unwrap().is_none());

        let config = OrderConfig {
            whatsapp_number: "+54 9".to_string(),
            ..OrderConfig::default()
        };
        assert!(whatsapp_url(&[line("Milanesa", "Pan Árabe", 1)], &config).is_err());
    }
}
