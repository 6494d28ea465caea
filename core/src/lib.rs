//! Client core for the marketplace admin API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The browser tool, the mobile
//! app (through `marketplace-ffi`) and the CLI all execute the round-trip
//! themselves and share everything else: the credential cache, the
//! authorization hook, per-entity CRUD clients and envelope handling.
//!
//! # Design
//! - `SessionStore` is the credential cache. It is constructed explicitly and
//!   injected into `MarketplaceClient`; there is no global session.
//! - `MarketplaceClient` is the request dispatcher: base URL selection plus
//!   the hook that attaches `authorization: Bearer <token>`.
//! - `ResourceClient<R>` exposes list/get/create/update/delete per entity,
//!   split into `build_*` and `parse_*`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod resource;
pub mod session;
pub mod types;

pub use client::MarketplaceClient;
pub use config::{ClientConfig, Platform};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resource::{Operation, Resource, ResourceClient, ResourceKind};
pub use session::{FileStorage, MemoryStorage, Session, SessionStore, Storage, StorageError};
pub use types::*;
