//! Hosted e-commerce REST API.
//!
//! # Endpoints
//!
//! All paths are relative to `{base}/api/{tenant}`:
//!
//! | method | path            | payload      |
//! |--------|-----------------|--------------|
//! | GET    | `/products`     | `products`   |
//! | GET    | `/product/{id}` | `product`    |
//! | GET    | `/cart`         | `data`       |
//! | POST   | `/cart`         | `data`       |
//! | PUT    | `/cart/{id}`    | `data`       |
//! | DELETE | `/cart/{id}`    |              |
//! | DELETE | `/carts`        |              |
//! | POST   | `/order`        | `orderId`    |
//!
//! Mutating calls wrap their body in a `{"data": ...}` envelope. Every
//! response carries a `success` flag and usually a `message`.
//!
//! The [`StoreApi`] trait is the seam between the action layer and HTTP;
//! [`RestClient`] is the production implementation.

mod client;
pub mod types;

use std::future::Future;

pub use client::RestClient;
pub use types::*;

use shopfront_core::{CartItemId, OrderForm, ProductId};
use thiserror::Error;

/// A request to the hosted API failed.
///
/// There is one failure kind from the user's point of view: something went
/// wrong and here is the message to show. The variants only record where.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status or `success: false`.
    #[error("{message}")]
    Rejected {
        /// HTTP status, when the rejection was a non-2xx response.
        status: Option<u16>,
        /// Server-provided message.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The text to surface to the user.
    ///
    /// Server messages are passed through verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Operations offered by the hosted API.
///
/// Implementations must be cheap to share across concurrent actions.
pub trait StoreApi: Send + Sync {
    /// `GET /products`
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// `GET /product/{id}`
    fn product(&self, id: &ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send;

    /// `GET /cart`
    fn cart(&self) -> impl Future<Output = Result<Cart, ApiError>> + Send;

    /// `POST /cart`
    fn add_to_cart(
        &self,
        line: &CartLineInput,
    ) -> impl Future<Output = Result<Notice, ApiError>> + Send;

    /// `PUT /cart/{id}`
    fn update_cart_item(
        &self,
        id: &CartItemId,
        line: &CartLineInput,
    ) -> impl Future<Output = Result<Notice, ApiError>> + Send;

    /// `DELETE /cart/{id}`
    fn remove_cart_item(
        &self,
        id: &CartItemId,
    ) -> impl Future<Output = Result<Notice, ApiError>> + Send;

    /// `DELETE /carts`
    fn clear_cart(&self) -> impl Future<Output = Result<Notice, ApiError>> + Send;

    /// `POST /order`
    fn create_order(
        &self,
        form: &OrderForm,
    ) -> impl Future<Output = Result<OrderReceipt, ApiError>> + Send;
}
