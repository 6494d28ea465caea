//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every core client
//! operation over real HTTP using ureq. The executor copies the headers the
//! dispatcher produced, so authorization is exercised for real: the mock
//! rejects any protected call that arrives without a token it issued.

use std::net::SocketAddr;
use std::sync::Arc;

use marketplace_core::{
    preview_subtotal, ApiError, HttpMethod, HttpRequest, HttpResponse, LoginRequest,
    MarketplaceClient, MemoryStorage, Operation, OrderItemRequest, OrderRequest, ProductRequest,
    ResourceKind, ReviewRequest, SessionStore, StoreRequest, UserRequest,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match req.method {
        HttpMethod::Get => with_headers(agent.get(&req.path), &req.headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(&req.path), &req.headers).call(),
        HttpMethod::Post => {
            let builder = with_headers(agent.post(&req.path), &req.headers);
            match req.body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
        HttpMethod::Put => {
            let builder = with_headers(agent.put(&req.path), &req.headers);
            match req.body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    HttpResponse::new(status, body)
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn spawn_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr, session: Arc<SessionStore>) -> MarketplaceClient {
    MarketplaceClient::new(&format!("http://{addr}/api"), session)
}

fn admin_login(client: &MarketplaceClient) {
    let req = client
        .build_login(&LoginRequest {
            email: mock_server::ADMIN_EMAIL.to_string(),
            password: mock_server::ADMIN_PASSWORD.to_string(),
        })
        .unwrap();
    assert!(req.header("authorization").is_none());
    client.complete_login(execute(req)).unwrap();
}

#[test]
fn admin_session_lifecycle() {
    let addr = spawn_server();
    let client = client_for(addr, Arc::new(SessionStore::in_memory()));

    // Step 1: protected calls fail before login.
    let err = client.users().parse_list(execute(client.users().build_list())).unwrap_err();
    assert_eq!(err.status(), Some(401));

    // Step 2: login caches token and profile.
    admin_login(&client);
    let session = client.session().snapshot();
    assert!(session.is_authenticated());
    let user = session.user.unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.email, mock_server::ADMIN_EMAIL);

    let me = client.parse_me(execute(client.build_me())).unwrap();
    assert_eq!(me.role.as_deref(), Some("ADMIN"));

    // Step 3: a store, then a product in it.
    let stores = client.stores();
    let store = stores
        .parse_create(execute(
            stores
                .build_create(&StoreRequest {
                    name: "Tech Hub".to_string(),
                    description: "Gadgets".to_string(),
                    category: "Electronics".to_string(),
                    is_active: true,
                    user_id: user.id,
                })
                .unwrap(),
        ))
        .unwrap();
    assert!(store.product_ids.is_empty());
    assert!(store.created_date.is_some());

    let products = client.products();
    let product = products
        .parse_create(execute(
            products
                .build_create(&ProductRequest {
                    name: "Mouse".to_string(),
                    description: "Wireless".to_string(),
                    price: Decimal::new(1999, 2),
                    stock: 10,
                    published_date: None,
                    is_available: true,
                    store_id: store.id,
                    store_name: None,
                })
                .unwrap(),
        ))
        .unwrap();
    assert_eq!(product.price, Decimal::new(1999, 2));
    assert!(product.published_date.is_some());

    // Step 4: a customer, an order and a line item.
    let users = client.users();
    let customer = users
        .parse_create(execute(
            users
                .build_create(&UserRequest {
                    first_name: "Ana".to_string(),
                    last_name: "Rojas".to_string(),
                    phone: "+59170000000".to_string(),
                    address: "Av. Siempre Viva 123".to_string(),
                    email: "ana@example.com".to_string(),
                    role: "USER".to_string(),
                })
                .unwrap(),
        ))
        .unwrap();
    assert!(customer.orders_id.is_empty());

    let orders = client.orders();
    let order = orders
        .parse_create(execute(
            orders
                .build_create(&OrderRequest {
                    subtotal: Decimal::new(3998, 2),
                    total_amount: 46,
                    tax: Decimal::new(600, 2),
                    currency: "BOB".to_string(),
                    pay_method: "CARD".to_string(),
                    payment_status: "PENDING".to_string(),
                    order_date: None,
                    user_id: customer.id,
                    user_name: None,
                })
                .unwrap(),
        ))
        .unwrap();
    assert_eq!(order.subtotal, Some(Decimal::new(3998, 2)));
    assert!(order.order_date.is_some());

    let items = client.order_items();
    let item_input =
        OrderItemRequest::with_preview_subtotal(order.id, product.id, 2, product.price).unwrap();
    assert_eq!(Some(item_input.subtotal), preview_subtotal(2, product.price));
    let item = items
        .parse_create(execute(items.build_create(&item_input).unwrap()))
        .unwrap();
    assert_eq!(item.subtotal, Decimal::new(3998, 2));

    // Step 5: a review, then edit it.
    let reviews = client.reviews();
    let mut review_input = ReviewRequest {
        rating: 4,
        comment: "Good".to_string(),
        product_id: product.id,
        user_id: customer.id,
    };
    let review = reviews
        .parse_create(execute(reviews.build_create(&review_input).unwrap()))
        .unwrap();
    review_input.rating = 5;
    let edited = reviews
        .parse_update(execute(reviews.build_update(review.id, &review_input).unwrap()))
        .unwrap();
    assert_eq!(edited.rating, 5);
    assert_eq!(edited.created_date, review.created_date);

    // Step 6: dashboard.
    let stats = client
        .parse_dashboard_stats(execute(client.build_dashboard_stats()))
        .unwrap();
    assert_eq!(stats.total_products, 1);
    assert_eq!(stats.total_stores, 1);
    assert_eq!(stats.products_per_store[0].store_name, "Tech Hub");
    assert_eq!(stats.products_per_store[0].product_count, 1);

    // Step 7: delete messages, plain text and envelope.
    let message = reviews
        .parse_delete(execute(reviews.build_delete(review.id)))
        .unwrap();
    assert_eq!(message, "Review deleted successfully.");
    let message = stores.parse_delete(execute(stores.build_delete(store.id))).unwrap();
    assert_eq!(message, "Store deleted successfully.");

    let err = reviews.parse_get(execute(reviews.build_get(review.id))).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 8: logout drops the header and the server refuses.
    client.logout().unwrap();
    let req = client.orders().build_list();
    assert!(req.header("authorization").is_none());
    let err = client.orders().parse_list(execute(req)).unwrap_err();
    assert_eq!(err.status(), Some(401));
}

/// A valid create body per resource, plus one field to change on update.
fn sample(kind: ResourceKind) -> (Value, &'static str, Value) {
    match kind {
        ResourceKind::Users => (
            json!({"firstName": "Luis", "lastName": "Vaca", "phone": "70000001",
                   "address": "Calle 1", "email": "luis@example.com", "role": "USER"}),
            "address",
            json!("Calle 2"),
        ),
        ResourceKind::Orders => (
            json!({"subtotal": 10.0, "totalAmount": 12, "tax": 1.5, "currency": "BOB",
                   "payMethod": "CASH", "paymentStatus": "PENDING", "userId": 1}),
            "paymentStatus",
            json!("PAID"),
        ),
        ResourceKind::OrderItems => (
            json!({"quantity": 1, "price": 5.0, "subtotal": 5.0, "orderId": 1, "productId": 1}),
            "quantity",
            json!(3),
        ),
        ResourceKind::Products => (
            json!({"name": "Cable", "description": "USB-C", "price": 4.5, "stock": 3,
                   "isAvailable": true, "storeId": 1}),
            "stock",
            json!(9),
        ),
        ResourceKind::Stores => (
            json!({"name": "Corner", "description": "Misc", "category": "General",
                   "isActive": true, "userId": 1}),
            "isActive",
            json!(false),
        ),
        ResourceKind::Reviews => (
            json!({"rating": 3, "comment": "Fine", "productId": 1, "userId": 1}),
            "comment",
            json!("Better than expected"),
        ),
    }
}

#[test]
fn every_resource_supports_full_crud() {
    let addr = spawn_server();
    let client = client_for(addr, Arc::new(SessionStore::in_memory()));
    admin_login(&client);

    for kind in ResourceKind::ALL {
        let call = |operation: Operation, id: Option<i64>, body: Option<&Value>| {
            let body = body.map(Value::to_string);
            let req = client
                .build_dynamic(kind, operation, id, body.as_deref())
                .unwrap();
            client.parse_dynamic(kind, operation, execute(req))
        };
        let (mut body, field, changed) = sample(kind);

        let created = call(Operation::Create, None, Some(&body)).unwrap();
        let id = created["id"].as_i64().unwrap();

        let fetched = call(Operation::Get, Some(id), None).unwrap();
        assert_eq!(fetched["id"], id, "{kind}");

        let listed = call(Operation::List, None, None).unwrap();
        assert!(
            listed.as_array().unwrap().iter().any(|row| row["id"] == id),
            "{kind} list misses {id}"
        );

        body[field] = changed.clone();
        let updated = call(Operation::Update, Some(id), Some(&body)).unwrap();
        assert_eq!(updated["id"], id, "{kind}");
        assert_eq!(updated[field], changed, "{kind}");

        let message = call(Operation::Delete, Some(id), None).unwrap();
        assert!(
            message.as_str().unwrap().ends_with("deleted successfully."),
            "{kind}: {message}"
        );

        let err = call(Operation::Get, Some(id), None).unwrap_err();
        assert!(matches!(err, ApiError::NotFound), "{kind}: {err:?}");
    }
}

#[test]
fn session_restores_from_shared_storage() {
    let addr = spawn_server();
    let storage = MemoryStorage::new();

    let first = client_for(addr, Arc::new(SessionStore::new(storage.clone())));
    admin_login(&first);

    let restored = Arc::new(SessionStore::new(storage));
    let session = restored.load_session();
    assert!(session.is_authenticated());
    assert_eq!(session.user.map(|u| u.id), Some(1));

    let second = client_for(addr, restored);
    let users = second.users().parse_list(execute(second.users().build_list()));
    assert!(users.unwrap().is_empty());
}

#[test]
fn malformed_token_is_never_sent() {
    let addr = spawn_server();
    let client = client_for(addr, Arc::new(SessionStore::in_memory()));
    client.session().set_token(Some("not-a-jwt")).unwrap();

    let req = client.stores().build_list();
    assert!(req.header("authorization").is_none());
    let err = client.stores().parse_list(execute(req)).unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[test]
fn bad_credentials_leave_session_empty() {
    let addr = spawn_server();
    let client = client_for(addr, Arc::new(SessionStore::in_memory()));
    let req = client
        .build_login(&LoginRequest {
            email: mock_server::ADMIN_EMAIL.to_string(),
            password: "wrong".to_string(),
        })
        .unwrap();
    let err = client.complete_login(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 401, .. }));
    assert!(!client.session().snapshot().is_authenticated());
}

#[test]
fn server_errors_map_to_api_errors() {
    let addr = spawn_server();
    let client = client_for(addr, Arc::new(SessionStore::in_memory()));
    admin_login(&client);

    let req = client
        .build_dynamic(
            ResourceKind::Stores,
            Operation::Get,
            Some(42),
            None,
        )
        .unwrap();
    let err = client
        .parse_dynamic(
            ResourceKind::Stores,
            Operation::Get,
            execute(req),
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    let req = client.request(HttpMethod::Post, "/reviews", Some(r#"{"rating":3}"#.to_string()));
    let err = client.reviews().parse_create(execute(req)).unwrap_err();
    match err {
        ApiError::HttpError { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("comment cannot be null"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
