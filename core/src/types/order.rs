use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub total_amount: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    pub currency: String,
    pub pay_method: String,
    pub payment_status: String,
    #[serde(default)]
    pub order_date: Option<NaiveDateTime>,
    pub user_id: i64,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub order_items_id: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    pub total_amount: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    pub currency: String,
    pub pay_method: String,
    pub payment_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDateTime>,
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}
