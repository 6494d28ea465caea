use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    #[serde(default)]
    pub published_date: Option<NaiveDateTime>,
    pub is_available: bool,
    pub store_id: i64,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub order_items_id: Vec<i64>,
    #[serde(default)]
    pub reviews_id: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<NaiveDateTime>,
    pub is_available: bool,
    pub store_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
}
