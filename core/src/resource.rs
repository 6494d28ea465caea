//! Resource clients: list/get/create/update/delete for each entity.
//!
//! Each entity is a zero-sized marker implementing `Resource`, which names its
//! REST path and its record and request types. `ResourceClient<R>` turns those
//! into requests through the dispatcher, so every resource gets the same
//! authorization and envelope handling.
//!
//! `ResourceKind` and `Operation` select a resource at runtime for hosts that
//! only speak JSON (the C ABI, the CLI).

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::{parse_json, parse_message, MarketplaceClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Order, OrderItem, OrderItemRequest, OrderRequest, Product, ProductRequest, Review,
    ReviewRequest, Store, StoreRequest, User, UserRequest,
};

pub trait Resource {
    const KIND: ResourceKind;
    type Record: Serialize + DeserializeOwned;
    type Request: Serialize + DeserializeOwned;
}

macro_rules! resources {
    ($($marker:ident => $kind:ident, $record:ty, $request:ty;)*) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $marker;

            impl Resource for $marker {
                const KIND: ResourceKind = ResourceKind::$kind;
                type Record = $record;
                type Request = $request;
            }
        )*
    };
}

resources! {
    Users => Users, User, UserRequest;
    Orders => Orders, Order, OrderRequest;
    OrderItems => OrderItems, OrderItem, OrderItemRequest;
    Products => Products, Product, ProductRequest;
    Stores => Stores, Store, StoreRequest;
    Reviews => Reviews, Review, ReviewRequest;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Users,
    Orders,
    OrderItems,
    Products,
    Stores,
    Reviews,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Users,
        ResourceKind::Orders,
        ResourceKind::OrderItems,
        ResourceKind::Products,
        ResourceKind::Stores,
        ResourceKind::Reviews,
    ];

    /// REST collection path, relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Users => "/users",
            ResourceKind::Orders => "/orders",
            ResourceKind::OrderItems => "/orderItems",
            ResourceKind::Products => "/products",
            ResourceKind::Stores => "/stores",
            ResourceKind::Reviews => "/reviews",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::Orders => "orders",
            ResourceKind::OrderItems => "order-items",
            ResourceKind::Products => "products",
            ResourceKind::Stores => "stores",
            ResourceKind::Reviews => "reviews",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    /// Accepts the CLI name (`order-items`) and the path segment (`orderItems`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim_start_matches('/');
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted || &kind.path()[1..] == wanted)
            .ok_or_else(|| format!("unknown resource: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn method(self) -> HttpMethod {
        match self {
            Operation::List | Operation::Get => HttpMethod::Get,
            Operation::Create => HttpMethod::Post,
            Operation::Update => HttpMethod::Put,
            Operation::Delete => HttpMethod::Delete,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn needs_id(self) -> bool {
        matches!(self, Operation::Get | Operation::Update | Operation::Delete)
    }

    fn needs_body(self) -> bool {
        matches!(self, Operation::Create | Operation::Update)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CRUD client for one resource, borrowed from a `MarketplaceClient`.
pub struct ResourceClient<'a, R> {
    client: &'a MarketplaceClient,
    _resource: PhantomData<R>,
}

impl<'a, R: Resource> ResourceClient<'a, R> {
    pub(crate) fn new(client: &'a MarketplaceClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn item_path(id: i64) -> String {
        format!("{}/{id}", R::KIND.path())
    }

    pub fn build_list(&self) -> HttpRequest {
        self.client.request(HttpMethod::Get, R::KIND.path(), None)
    }

    pub fn build_get(&self, id: i64) -> HttpRequest {
        self.client.request(HttpMethod::Get, &Self::item_path(id), None)
    }

    pub fn build_create(&self, input: &R::Request) -> Result<HttpRequest, ApiError> {
        self.client.json_request(HttpMethod::Post, R::KIND.path(), input)
    }

    pub fn build_update(&self, id: i64, input: &R::Request) -> Result<HttpRequest, ApiError> {
        self.client.json_request(HttpMethod::Put, &Self::item_path(id), input)
    }

    pub fn build_delete(&self, id: i64) -> HttpRequest {
        self.client.request(HttpMethod::Delete, &Self::item_path(id), None)
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<R::Record>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<R::Record, ApiError> {
        parse_json(response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<R::Record, ApiError> {
        parse_json(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<R::Record, ApiError> {
        parse_json(response)
    }

    /// Returns the server's confirmation message, possibly empty.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<String, ApiError> {
        parse_message(response)
    }

    /// Build `operation` from a JSON body, validating it against
    /// `R::Request` first.
    pub fn build(
        &self,
        operation: Operation,
        id: Option<i64>,
        body: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let id = match (operation.needs_id(), id) {
            (true, None) => return Err(ApiError::MissingId(operation.as_str())),
            (_, id) => id.unwrap_or_default(),
        };
        let input = if operation.needs_body() {
            let raw = body.ok_or(ApiError::MissingBody(operation.as_str()))?;
            Some(serde_json::from_str::<R::Request>(raw).map_err(|e| {
                ApiError::SerializationError(format!("invalid {} payload: {e}", R::KIND))
            })?)
        } else {
            None
        };

        match (operation, input) {
            (Operation::List, _) => Ok(self.build_list()),
            (Operation::Get, _) => Ok(self.build_get(id)),
            (Operation::Delete, _) => Ok(self.build_delete(id)),
            (Operation::Create, Some(input)) => self.build_create(&input),
            (Operation::Update, Some(input)) => self.build_update(id, &input),
            (op, None) => Err(ApiError::MissingBody(op.as_str())),
        }
    }

    /// Parse the response of `operation` into normalized JSON: typed records
    /// re-encoded, or the delete message as a JSON string.
    pub fn parse(&self, operation: Operation, response: HttpResponse) -> Result<Value, ApiError> {
        let value = match operation {
            Operation::List => to_value(self.parse_list(response)?)?,
            Operation::Get | Operation::Create | Operation::Update => {
                to_value(self.parse_get(response)?)?
            }
            Operation::Delete => Value::String(self.parse_delete(response)?),
        };
        Ok(value)
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

impl MarketplaceClient {
    /// Runtime-selected variant of `ResourceClient::build`.
    pub fn build_dynamic(
        &self,
        kind: ResourceKind,
        operation: Operation,
        id: Option<i64>,
        body: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        match kind {
            ResourceKind::Users => self.users().build(operation, id, body),
            ResourceKind::Orders => self.orders().build(operation, id, body),
            ResourceKind::OrderItems => self.order_items().build(operation, id, body),
            ResourceKind::Products => self.products().build(operation, id, body),
            ResourceKind::Stores => self.stores().build(operation, id, body),
            ResourceKind::Reviews => self.reviews().build(operation, id, body),
        }
    }

    /// Runtime-selected variant of `ResourceClient::parse`.
    pub fn parse_dynamic(
        &self,
        kind: ResourceKind,
        operation: Operation,
        response: HttpResponse,
    ) -> Result<Value, ApiError> {
        match kind {
            ResourceKind::Users => self.users().parse(operation, response),
            ResourceKind::Orders => self.orders().parse(operation, response),
            ResourceKind::OrderItems => self.order_items().parse(operation, response),
            ResourceKind::Products => self.products().parse(operation, response),
            ResourceKind::Stores => self.stores().parse(operation, response),
            ResourceKind::Reviews => self.reviews().parse(operation, response),
        }
    }
}
