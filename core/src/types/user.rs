use serde::{Deserialize, Serialize};

/// A marketplace user as returned by `/users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub stores_id: Vec<i64>,
    #[serde(default)]
    pub orders_id: Vec<i64>,
    #[serde(default)]
    pub reviews_id: Vec<i64>,
}

/// Payload for creating or replacing a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub first_name: String,
    pub last_name: String,
    /// Eight digits; kept as a string to preserve leading zeros.
    pub phone: String,
    pub address: String,
    pub email: String,
    pub role: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
