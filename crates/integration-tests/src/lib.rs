//! Integration test support for the RocketShoes cart.
//!
//! [`MockCatalog`] serves the product and stock endpoints from an in-process
//! `axum` server on an ephemeral port, so the real `CatalogClient` can be
//! driven end to end without a network dependency.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Product payload as the catalog API returns it.
#[must_use]
pub fn shoe(id: i64, title: &str, price: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "image": format!("https://rocketseat-cdn.test/modulo-redux/tenis{id}.jpg"),
    })
}

#[derive(Clone, Default)]
struct MockState {
    stock: Arc<Mutex<HashMap<i64, i64>>>,
    products: Arc<Mutex<HashMap<i64, Value>>>,
    unavailable: Arc<AtomicBool>,
    stock_requests: Arc<AtomicUsize>,
    product_requests: Arc<AtomicUsize>,
    last_authorization: Arc<Mutex<Option<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockState {
    fn record(&self, headers: &HeaderMap) {
        *lock(&self.last_authorization) = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
    }
}

/// In-process catalog API.
///
/// The server task is aborted when the mock is dropped.
pub struct MockCatalog {
    addr: SocketAddr,
    state: MockState,
    server: JoinHandle<()>,
}

impl MockCatalog {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = MockState::default();
        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// Base URL to point a `CatalogConfig` at.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Serve `{ "amount": amount }` for `id`.
    pub fn set_stock(&self, id: i64, amount: i64) {
        lock(&self.state.stock).insert(id, amount);
    }

    /// Serve `product` under its `id` attribute.
    pub fn put_product(&self, product: Value) {
        if let Some(id) = product.get("id").and_then(Value::as_i64) {
            lock(&self.state.products).insert(id, product);
        }
    }

    /// When set, every endpoint answers 503.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.unavailable.store(unavailable, Ordering::SeqCst);
    }

    #[must_use]
    pub fn stock_requests(&self) -> usize {
        self.state.stock_requests.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.state.product_requests.load(Ordering::SeqCst)
    }

    /// `Authorization` header of the most recent request.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        lock(&self.state.last_authorization).clone()
    }
}

impl Drop for MockCatalog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn stock(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    state.stock_requests.fetch_add(1, Ordering::SeqCst);
    state.record(&headers);

    if state.unavailable.load(Ordering::SeqCst) {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let amount = lock(&state.stock).get(&id).copied();
    match amount {
        Some(amount) => axum::Json(json!({ "amount": amount })).into_response(),
        None => (StatusCode::NOT_FOUND, axum::Json(json!({}))).into_response(),
    }
}

async fn product(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    state.product_requests.fetch_add(1, Ordering::SeqCst);
    state.record(&headers);

    if state.unavailable.load(Ordering::SeqCst) {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let product = lock(&state.products).get(&id).cloned();
    match product {
        Some(product) => axum::Json(product).into_response(),
        None => (StatusCode::NOT_FOUND, axum::Json(json!({}))).into_response(),
    }
}
