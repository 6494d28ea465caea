use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    pub order_id: i64,
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    pub order_id: i64,
    pub product_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
}

/// Display-only subtotal for a line: `quantity * price`, rounded to cents.
///
/// The server computes the authoritative value. `None` when the product
/// does not fit in a `Decimal`.
pub fn preview_subtotal(quantity: i32, price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity)
        .checked_mul(price)
        .map(|subtotal| subtotal.round_dp(2))
}

impl OrderItemRequest {
    /// Build a request whose `subtotal` is the local preview, if it fits.
    pub fn with_preview_subtotal(
        order_id: i64,
        product_id: i64,
        quantity: i32,
        price: Decimal,
    ) -> Option<Self> {
        Some(Self {
            quantity,
            price,
            subtotal: preview_subtotal(quantity, price)?,
            order_id,
            product_id,
            product_name: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_multiplies_and_rounds_to_cents() {
        assert_eq!(preview_subtotal(3, Decimal::new(1999, 2)), Some(Decimal::new(5997, 2)));
        assert_eq!(preview_subtotal(3, Decimal::new(3333, 3)), Some(Decimal::new(1000, 2)));
        assert_eq!(preview_subtotal(0, Decimal::new(500, 2)), Some(Decimal::ZERO));
    }

    #[test]
    fn preview_overflow_is_none() {
        assert_eq!(preview_subtotal(2, Decimal::MAX), None);
        assert_eq!(preview_subtotal(-2, Decimal::MAX), None);
        assert_eq!(preview_subtotal(1, Decimal::MAX), Some(Decimal::MAX));
        assert!(OrderItemRequest::with_preview_subtotal(1, 1, 2, Decimal::MAX).is_none());
    }

    #[test]
    fn request_with_preview_fills_subtotal() {
        let req = OrderItemRequest::with_preview_subtotal(7, 9, 2, Decimal::new(1050, 2)).unwrap();
        assert_eq!(req.subtotal, Decimal::new(2100, 2));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["orderId"], 7);
        assert_eq!(json["subtotal"], 21.0);
        assert!(json.get("productName").is_none());
    }
}
