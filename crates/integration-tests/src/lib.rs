//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! No network access is needed. [`MockStore`] serves the store API on a
//! random local port with the same envelope, messages and server-side cart
//! the hosted API has, and records every request it receives.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use shopfront::RestClient;
use shopfront::config::ApiConfig;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Tenant path segment the mock answers under.
pub const TENANT: &str = "shopfront-test";

/// Fixed order timestamp (2024-05-01T00:00:00Z).
pub const ORDER_CREATED_AT: i64 = 1_714_521_600;

/// A request as the mock saw it, with `path` relative to the tenant root.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// `"GET /cart"` style summary.
    #[must_use]
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// A product the mock sells.
#[derive(Debug, Clone)]
pub struct MockProduct {
    pub id: String,
    pub title: String,
    pub price: i64,
}

impl MockProduct {
    #[must_use]
    pub fn new(id: &str, title: &str, price: i64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            price,
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "category": "甜甜圈",
            "origin_price": self.price + 20,
            "price": self.price,
            "unit": "個",
            "description": format!("{} description", self.title),
            "content": "",
            "is_enabled": 1,
            "imageUrl": format!("https://images.example.com/{}.jpg", self.id),
            "imagesUrl": [],
            "num": 1
        })
    }
}

#[derive(Debug)]
struct CartLine {
    id: String,
    product_id: String,
    qty: u32,
}

#[derive(Debug, Default)]
struct MockData {
    products: Vec<MockProduct>,
    cart: Vec<CartLine>,
    next_line: u32,
    orders: u32,
    requests: Vec<RecordedRequest>,
    failures: HashMap<String, (StatusCode, String)>,
}

impl MockData {
    fn product(&self, id: &str) -> Option<&MockProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    fn cart_json(&self) -> Value {
        let mut total = 0_i64;
        let carts: Vec<Value> = self
            .cart
            .iter()
            .filter_map(|line| {
                let product = self.product(&line.product_id)?;
                let subtotal = product.price * i64::from(line.qty);
                total += subtotal;
                Some(json!({
                    "id": line.id,
                    "product_id": line.product_id,
                    "qty": line.qty,
                    "product": product.to_json(),
                    "total": subtotal,
                    "final_total": subtotal
                }))
            })
            .collect();
        json!({ "carts": carts, "total": total, "final_total": total })
    }

    fn cart_total(&self) -> i64 {
        self.cart
            .iter()
            .filter_map(|line| {
                self.product(&line.product_id)
                    .map(|p| p.price * i64::from(line.qty))
            })
            .sum()
    }
}

type Shared = Arc<Mutex<MockData>>;

fn lock(shared: &Shared) -> std::sync::MutexGuard<'_, MockData> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An in-process store API.
pub struct MockStore {
    addr: SocketAddr,
    data: Shared,
    handle: JoinHandle<()>,
}

impl MockStore {
    /// Start a mock selling `products` with an empty cart.
    pub async fn start(products: Vec<MockProduct>) -> Self {
        let data: Shared = Arc::new(Mutex::new(MockData {
            products,
            ..MockData::default()
        }));

        let api = Router::new()
            .route("/products", get(list_products))
            .route("/product/{id}", get(show_product))
            .route("/cart", get(show_cart).post(add_line))
            .route("/cart/{id}", put(update_line).delete(remove_line))
            .route("/carts", delete(clear_lines))
            .route("/order", post(create_order))
            .with_state(Arc::clone(&data));
        let app = Router::new().nest(&format!("/v2/api/{TENANT}"), api);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock store");
        let addr = listener.local_addr().expect("mock store address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock store");
        });

        Self { addr, data, handle }
    }

    /// Start with the default two-product catalog (`p1`, `p2`).
    pub async fn with_catalog() -> Self {
        Self::start(vec![
            MockProduct::new("p1", "草莓莓果夾心圈", 150),
            MockProduct::new("p2", "可可杏仁脆片", 120),
        ])
        .await
    }

    /// Base URL to configure the client with.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/v2", self.addr)).expect("mock base url")
    }

    /// API config pointing at this mock.
    #[must_use]
    pub fn config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url(), TENANT).expect("mock api config")
    }

    /// A REST client pointing at this mock.
    #[must_use]
    pub fn client(&self) -> RestClient {
        RestClient::new(&self.config()).expect("mock rest client")
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.data).requests.clone()
    }

    /// Request summaries received so far, then forget them.
    pub fn take_lines(&self) -> Vec<String> {
        let mut data = lock(&self.data);
        let lines = data.requests.iter().map(RecordedRequest::line).collect();
        data.requests.clear();
        lines
    }

    /// The cart body `GET /cart` would return right now.
    #[must_use]
    pub fn cart_json(&self) -> Value {
        lock(&self.data).cart_json()
    }

    /// Seed a cart line directly, returning its id.
    pub fn seed_line(&self, product_id: &str, qty: u32) -> String {
        let mut data = lock(&self.data);
        data.next_line += 1;
        let id = format!("-cart{}", data.next_line);
        data.cart.push(CartLine {
            id: id.clone(),
            product_id: product_id.to_string(),
            qty,
        });
        id
    }

    /// Answer the next `"METHOD /path"` request with a failure.
    pub fn fail_next(&self, line: &str, status: StatusCode, message: &str) {
        lock(&self.data)
            .failures
            .insert(line.to_string(), (status, message.to_string()));
    }
}

impl Drop for MockStore {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn ok(message: &str, mut extra: Value) -> Response {
    if let Value::Object(map) = &mut extra {
        map.insert("success".into(), Value::Bool(true));
        map.insert("message".into(), Value::String(message.into()));
    }
    Json(extra).into_response()
}

fn rejected(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

/// Record the request and return an injected failure, if any.
fn record(data: &mut MockData, method: Method, path: String, body: Option<Value>) -> Option<Response> {
    let request = RecordedRequest { method, path, body };
    let line = request.line();
    data.requests.push(request);
    data.failures
        .remove(&line)
        .map(|(status, message)| rejected(status, &message))
}

fn line_input(body: &Value) -> Option<(String, u32)> {
    let data = body.get("data")?;
    let product_id = data.get("product_id")?.as_str()?.to_string();
    let qty = u32::try_from(data.get("qty")?.as_u64()?).ok()?;
    Some((product_id, qty))
}

async fn list_products(State(shared): State<Shared>) -> Response {
    let mut data = lock(&shared);
    if let Some(failure) = record(&mut data, Method::GET, "/products".into(), None) {
        return failure;
    }
    let products: Vec<Value> = data.products.iter().map(MockProduct::to_json).collect();
    ok("", json!({ "products": products }))
}

async fn show_product(State(shared): State<Shared>, Path(id): Path<String>) -> Response {
    let mut data = lock(&shared);
    if let Some(failure) = record(&mut data, Method::GET, format!("/product/{id}"), None) {
        return failure;
    }
    match data.product(&id) {
        Some(product) => ok("", json!({ "product": product.to_json() })),
        None => rejected(StatusCode::NOT_FOUND, "找不到產品"),
    }
}

async fn show_cart(State(shared): State<Shared>) -> Response {
    let mut data = lock(&shared);
    if let Some(failure) = record(&mut data, Method::GET, "/cart".into(), None) {
        return failure;
    }
    ok("", json!({ "data": data.cart_json() }))
}

async fn add_line(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut data = lock(&shared);
    if let Some(failure) = record(&mut data, Method::POST, "/cart".into(), Some(body.clone())) {
        return failure;
    }
    let Some((product_id, qty)) = line_input(&body) else {
        return rejected(StatusCode::BAD_REQUEST, "資料格式錯誤");
    };
    if data.product(&product_id).is_none() {
        return rejected(StatusCode::BAD_REQUEST, "找不到產品");
    }

    if let Some(line) = data.cart.iter_mut().find(|l| l.product_id == product_id) {
        line.qty += qty;
    } else {
        data.next_line += 1;
        let id = format!("-cart{}", data.next_line);
        data.cart.push(CartLine { id, product_id, qty });
    }
    ok("已加入購物車", json!({ "data": data.cart_json() }))
}

async fn update_line(
    State(shared): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = lock(&shared);
    if let Some(failure) = record(&mut data, Method::PUT, format!("/cart/{id}"), Some(body.clone())) {
        return failure;
    }
    let Some((product_id, qty)) = line_input(&body) else {
        return rejected(StatusCode::BAD_REQUEST, "資料格式錯誤");
    };
    match data.cart.iter_mut().find(|l| l.id == id) {
        Some(line) => {
            line.product_id = product_id;
            line.qty = qty;
            ok("已更新購物車", json!({}))
        }
        None => rejected(StatusCode::BAD_REQUEST, "找不到購物車資料"),
    }
}

async fn remove_line(State(shared): State<Shared>, Path(id): Path<String>) -> Response {
    let mut data = lock(&shared);
    if let Some(failure) = record(&mut data, Method::DELETE, format!("/cart/{id}"), None) {
        return failure;
    }
    let before = data.cart.len();
    data.cart.retain(|l| l.id != id);
    if data.cart.len() == before {
        return rejected(StatusCode::BAD_REQUEST, "找不到購物車資料");
    }
    ok("已刪除", json!({}))
}

async fn clear_lines(State(shared): State<Shared>) -> Response {
    let mut data = lock(&shared);
    if let Some(failure) = record(&mut data, Method::DELETE, "/carts".into(), None) {
        return failure;
    }
    data.cart.clear();
    ok("已清空購物車", json!({}))
}

async fn create_order(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut data = lock(&shared);
    if let Some(failure) = record(&mut data, Method::POST, "/order".into(), Some(body.clone())) {
        return failure;
    }
    let has_user = body
        .pointer("/data/user/email")
        .and_then(Value::as_str)
        .is_some_and(|email| !email.is_empty());
    if !has_user {
        return rejected(StatusCode::BAD_REQUEST, "Email 欄位為必填");
    }
    if data.cart.is_empty() {
        return rejected(StatusCode::BAD_REQUEST, "購物車內無資料");
    }

    let total = data.cart_total();
    data.orders += 1;
    let order_id = format!("-order{}", data.orders);
    data.cart.clear();
    ok(
        "已建立訂單",
        json!({ "orderId": order_id, "total": total, "create_at": ORDER_CREATED_AT }),
    )
}
