use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub is_active: bool,
    #[serde(default)]
    pub created_date: Option<NaiveDateTime>,
    pub user_id: i64,
    #[serde(default)]
    pub product_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub is_active: bool,
    pub user_id: i64,
}
