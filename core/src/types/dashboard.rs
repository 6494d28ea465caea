use serde::{Deserialize, Serialize};

/// Totals shown on the home screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_stores: i64,
    #[serde(default)]
    pub products_per_store: Vec<StoreProductCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreProductCount {
    pub store_name: String,
    pub product_count: i64,
}
