//! Wire DTOs for the marketplace API.
//!
//! # Design
//! Records mirror the server's response shapes and request payloads mirror
//! what the server accepts. They are defined independently from the
//! mock-server crate; integration tests catch schema drift.
//!
//! Earlier client snapshots disagreed on some fields (for example `Order`
//! with and without `subtotal`/`totalAmount`), so server-derived and
//! denormalized fields are optional or defaulted on records.

pub mod auth;
pub mod dashboard;
pub mod order;
pub mod order_item;
pub mod product;
pub mod review;
pub mod store;
pub mod user;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};
pub use dashboard::{DashboardStats, StoreProductCount};
pub use order::{Order, OrderRequest};
pub use order_item::{preview_subtotal, OrderItem, OrderItemRequest};
pub use product::{Product, ProductRequest};
pub use review::{Review, ReviewRequest};
pub use store::{Store, StoreRequest};
pub use user::{User, UserRequest};
