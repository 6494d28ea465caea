//! In-memory stand-in for the marketplace REST backend.
//!
//! Everything lives under `/api`. The six resource collections share one
//! generic JSON table implementation; each collection only declares its
//! required fields and the server-derived fields it fills in. Responses use
//! the `{ success, message, data, timestamp }` envelope, except delete (plain
//! text, or an envelope for stores) and the login/stats endpoints (bare).
//!
//! Every route except login and register requires a bearer token this server
//! issued.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;

pub const ADMIN_EMAIL: &str = "admin@marketplace.test";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Server-filled field of a collection.
#[derive(Clone, Copy)]
enum Derived {
    /// Empty id list, e.g. `orderItemsId`.
    IdList(&'static str),
    /// Set to now on create, kept on update.
    CreatedAt(&'static str),
    /// Set to now on create and on every update.
    TouchedAt(&'static str),
}

pub struct Collection {
    pub path: &'static str,
    label: &'static str,
    required: &'static [&'static str],
    derived: &'static [Derived],
    delete_envelope: bool,
}

pub static COLLECTIONS: [Collection; 6] = [
    Collection {
        path: "/users",
        label: "User",
        required: &["firstName", "lastName", "phone", "address", "email", "role"],
        derived: &[
            Derived::IdList("storesId"),
            Derived::IdList("ordersId"),
            Derived::IdList("reviewsId"),
        ],
        delete_envelope: false,
    },
    Collection {
        path: "/orders",
        label: "Order",
        required: &["subtotal", "totalAmount", "tax", "currency", "payMethod", "paymentStatus", "userId"],
        derived: &[Derived::IdList("orderItemsId"), Derived::CreatedAt("orderDate")],
        delete_envelope: false,
    },
    Collection {
        path: "/orderItems",
        label: "OrderItem",
        required: &["quantity", "price", "subtotal", "orderId", "productId"],
        derived: &[],
        delete_envelope: false,
    },
    Collection {
        path: "/products",
        label: "Product",
        required: &["name", "description", "price", "stock", "isAvailable", "storeId"],
        derived: &[
            Derived::IdList("orderItemsId"),
            Derived::IdList("reviewsId"),
            Derived::CreatedAt("publishedDate"),
        ],
        delete_envelope: false,
    },
    Collection {
        path: "/stores",
        label: "Store",
        required: &["name", "description", "category", "isActive", "userId"],
        derived: &[Derived::IdList("productIds"), Derived::CreatedAt("createdDate")],
        delete_envelope: true,
    },
    Collection {
        path: "/reviews",
        label: "Review",
        required: &["rating", "comment", "productId", "userId"],
        derived: &[Derived::CreatedAt("createdDate"), Derived::TouchedAt("updatedDate")],
        delete_envelope: false,
    },
];

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, Value>,
    next_id: i64,
}

#[derive(Clone, Debug)]
struct Account {
    id: i64,
    firstname: String,
    lastname: String,
    email: String,
    password: String,
    role: String,
}

/// In-memory state for one server run.
///
/// Issued access tokens stay valid until the process exits; there is no
/// expiry or revocation, so `tokens` grows with every login.
#[derive(Default)]
struct Db {
    tables: HashMap<&'static str, Table>,
    accounts: Vec<Account>,
    tokens: HashMap<String, i64>,
    issued: u64,
}

#[derive(Clone)]
pub struct AppState {
    db: Arc<RwLock<Db>>,
}

impl AppState {
    fn seeded() -> Self {
        let db = Db {
            accounts: vec![Account {
                id: 1,
                firstname: "Admin".to_string(),
                lastname: "Marketplace".to_string(),
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
                role: "ADMIN".to_string(),
            }],
            ..Db::default()
        };
        Self {
            db: Arc::new(RwLock::new(db)),
        }
    }
}

#[derive(Serialize)]
struct Envelope {
    success: bool,
    message: String,
    data: Value,
    timestamp: NaiveDateTime,
}

fn envelope(message: impl Into<String>, data: Value) -> Json<Envelope> {
    Json(Envelope {
        success: true,
        message: message.into(),
        data,
        timestamp: Local::now().naive_local(),
    })
}

/// An error reply in envelope form.
struct Failure(StatusCode, String);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = Envelope {
            success: false,
            message: self.1,
            data: Value::Null,
            timestamp: Local::now().naive_local(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn not_found(collection: &Collection, id: i64) -> Failure {
    Failure(
        StatusCode::NOT_FOUND,
        format!("{} not found with id: {id}", collection.label),
    )
}

pub fn app() -> Router {
    let state = AppState::seeded();

    let mut protected = Router::new()
        .route("/auth/me", get(me))
        .route("/dashboard/stats", get(dashboard_stats));
    for collection in COLLECTIONS.iter() {
        protected = protected
            .route(
                collection.path,
                get(move |State(state): State<AppState>| list(state, collection)).post(
                    move |State(state): State<AppState>, Json(body): Json<Value>| {
                        create(state, collection, body)
                    },
                ),
            )
            .route(
                &format!("{}/{{id}}", collection.path),
                get(move |State(state): State<AppState>, Path(id): Path<i64>| {
                    get_one(state, collection, id)
                })
                .put(
                    move |State(state): State<AppState>,
                          Path(id): Path<i64>,
                          Json(body): Json<Value>| {
                        update(state, collection, id, body)
                    },
                )
                .delete(move |State(state): State<AppState>, Path(id): Path<i64>| {
                    delete_one(state, collection, id)
                }),
            );
    }
    let protected =
        protected.route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let public = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register));

    Router::new()
        .nest("/api", protected.merge(public))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock marketplace API listening");
    }
    axum::serve(listener, app()).await
}

// --- auth ---

#[derive(Clone, Copy)]
struct AccountId(i64);

async fn require_bearer(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    let account = match token {
        Some(token) => state.db.read().await.tokens.get(&token).copied(),
        None => None,
    };
    match account {
        Some(id) => {
            request.extensions_mut().insert(AccountId(id));
            next.run(request).await
        }
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

fn encode_segment(value: &Value) -> String {
    URL_SAFE_NO_PAD.encode(value.to_string())
}

fn issue_token(db: &mut Db, account: &Account, kind: &str) -> String {
    db.issued += 1;
    let header = encode_segment(&json!({"alg": "HS256", "typ": "JWT"}));
    let claims = encode_segment(&json!({"sub": account.email, "kind": kind, "n": db.issued}));
    let signature = URL_SAFE_NO_PAD.encode(format!("mock-signature-{}", db.issued));
    format!("{header}.{claims}.{signature}")
}

fn auth_response(db: &mut Db, account: &Account) -> Value {
    let token = issue_token(db, account, "access");
    let refresh = issue_token(db, account, "refresh");
    db.tokens.insert(token.clone(), account.id);
    json!({
        "token": token,
        "refreshToken": refresh,
        "authuserId": account.id,
        "email": account.email,
        "firstname": account.firstname,
        "lastname": account.lastname,
        "role": account.role,
    })
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(state): State<AppState>, Json(input): Json<LoginBody>) -> Response {
    let mut db = state.db.write().await;
    let account = db
        .accounts
        .iter()
        .find(|a| a.email == input.email && a.password == input.password)
        .cloned();
    match account {
        Some(account) => Json(auth_response(&mut db, &account)).into_response(),
        None => (StatusCode::UNAUTHORIZED, "Bad credentials").into_response(),
    }
}

#[derive(Deserialize)]
struct RegisterBody {
    firstname: String,
    lastname: String,
    email: String,
    password: String,
}

async fn register(State(state): State<AppState>, Json(input): Json<RegisterBody>) -> Response {
    let mut db = state.db.write().await;
    if input.email.trim().is_empty() || input.password.is_empty() {
        return Failure(StatusCode::BAD_REQUEST, "Email and password are required".to_string())
            .into_response();
    }
    if db.accounts.iter().any(|a| a.email == input.email) {
        return Failure(StatusCode::BAD_REQUEST, "Email already registered".to_string())
            .into_response();
    }
    let account = Account {
        id: db.accounts.len() as i64 + 1,
        firstname: input.firstname,
        lastname: input.lastname,
        email: input.email,
        password: input.password,
        role: "USER".to_string(),
    };
    db.accounts.push(account.clone());
    Json(auth_response(&mut db, &account)).into_response()
}

async fn me(State(state): State<AppState>, Extension(AccountId(id)): Extension<AccountId>) -> Response {
    let db = state.db.read().await;
    match db.accounts.iter().find(|a| a.id == id) {
        Some(a) => Json(json!({
            "id": a.id,
            "firstname": a.firstname,
            "lastname": a.lastname,
            "email": a.email,
            "role": a.role,
            "password": null,
        }))
        .into_response(),
        None => (StatusCode::NOT_FOUND, "User not found").into_response(),
    }
}

// --- dashboard ---

async fn dashboard_stats(State(state): State<AppState>) -> Json<Value> {
    let db = state.db.read().await;
    let products = db.tables.get("/products");
    let stores = db.tables.get("/stores");

    let mut per_store: BTreeMap<i64, i64> = BTreeMap::new();
    for product in products.iter().flat_map(|t| t.rows.values()) {
        if let Some(store_id) = product.get("storeId").and_then(Value::as_i64) {
            *per_store.entry(store_id).or_default() += 1;
        }
    }
    let products_per_store: Vec<Value> = per_store
        .into_iter()
        .map(|(store_id, count)| {
            let name = stores
                .and_then(|t| t.rows.get(&store_id))
                .and_then(|s| s.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Store {store_id}"));
            json!({"storeName": name, "productCount": count})
        })
        .collect();

    Json(json!({
        "totalProducts": products.map_or(0, |t| t.rows.len()),
        "totalStores": stores.map_or(0, |t| t.rows.len()),
        "productsPerStore": products_per_store,
    }))
}

// --- collections ---

fn now_value() -> Value {
    json!(Local::now().naive_local())
}

fn validate(collection: &Collection, body: &Value) -> Result<Map<String, Value>, Failure> {
    let Value::Object(fields) = body else {
        return Err(Failure(StatusCode::BAD_REQUEST, "Expected a JSON object".to_string()));
    };
    if let Some(missing) = collection
        .required
        .iter()
        .find(|name| fields.get(**name).is_none_or(Value::is_null))
    {
        return Err(Failure(
            StatusCode::BAD_REQUEST,
            format!("{missing} cannot be null"),
        ));
    }
    Ok(fields.clone())
}

async fn list(state: AppState, collection: &'static Collection) -> Json<Envelope> {
    let db = state.db.read().await;
    let rows: Vec<Value> = db
        .tables
        .get(collection.path)
        .map(|t| t.rows.values().cloned().collect())
        .unwrap_or_default();
    envelope(format!("{} list retrieved", collection.label), Value::Array(rows))
}

async fn get_one(
    state: AppState,
    collection: &'static Collection,
    id: i64,
) -> Result<Json<Envelope>, Failure> {
    let db = state.db.read().await;
    db.tables
        .get(collection.path)
        .and_then(|t| t.rows.get(&id))
        .cloned()
        .map(|row| envelope(format!("{} found", collection.label), row))
        .ok_or_else(|| not_found(collection, id))
}

async fn create(
    state: AppState,
    collection: &'static Collection,
    body: Value,
) -> Result<Json<Envelope>, Failure> {
    let mut fields = validate(collection, &body)?;
    let mut db = state.db.write().await;
    let table = db.tables.entry(collection.path).or_default();
    table.next_id += 1;
    let id = table.next_id;

    fields.insert("id".to_string(), json!(id));
    for derived in collection.derived {
        match *derived {
            Derived::IdList(name) => {
                fields.insert(name.to_string(), json!([]));
            }
            Derived::CreatedAt(name) => {
                if fields.get(name).is_none_or(Value::is_null) {
                    fields.insert(name.to_string(), now_value());
                }
            }
            Derived::TouchedAt(name) => {
                fields.insert(name.to_string(), now_value());
            }
        }
    }
    let row = Value::Object(fields);
    table.rows.insert(id, row.clone());
    Ok(envelope(format!("{} created", collection.label), row))
}

async fn update(
    state: AppState,
    collection: &'static Collection,
    id: i64,
    body: Value,
) -> Result<Json<Envelope>, Failure> {
    let fields = validate(collection, &body)?;
    let mut db = state.db.write().await;
    let row = db
        .tables
        .get_mut(collection.path)
        .and_then(|t| t.rows.get_mut(&id))
        .ok_or_else(|| not_found(collection, id))?;
    let Value::Object(existing) = &mut *row else {
        return Err(not_found(collection, id));
    };

    let server_owned = |name: &str| {
        name == "id"
            || collection.derived.iter().any(|d| {
                matches!(*d, Derived::IdList(n) | Derived::CreatedAt(n) | Derived::TouchedAt(n) if n == name)
            })
    };
    for (name, value) in fields {
        if !server_owned(&name) {
            existing.insert(name, value);
        }
    }
    for derived in collection.derived {
        if let Derived::TouchedAt(name) = *derived {
            existing.insert(name.to_string(), now_value());
        }
    }
    Ok(envelope(format!("{} updated", collection.label), row.clone()))
}

async fn delete_one(
    state: AppState,
    collection: &'static Collection,
    id: i64,
) -> Result<Response, Failure> {
    let mut db = state.db.write().await;
    db.tables
        .get_mut(collection.path)
        .and_then(|t| t.rows.remove(&id))
        .ok_or_else(|| not_found(collection, id))?;
    let message = format!("{} deleted successfully.", collection.label);
    if collection.delete_envelope {
        Ok(envelope(message, Value::Null).into_response())
    } else {
        Ok(message.into_response())
    }
}
