//! `reqwest` implementation of [`StoreApi`].

use std::sync::Arc;

use chrono::DateTime;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use shopfront_core::{CartItemId, OrderForm, ProductId};
use tracing::{debug, instrument, warn};

use super::types::{
    Cart, CartLineInput, CartPayload, Envelope, Notice, OrderPayload, OrderReceipt, Product,
    ProductPayload, ProductsPayload, ServerMessage, StatusBody,
};
use super::{ApiError, StoreApi};
use crate::config::ApiConfig;

/// Longest body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 500;

/// Client for the hosted store API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    client: reqwest::Client,
    api_root: String,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("api_root", &self.inner.api_root)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a new client for the configured tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            inner: Arc::new(RestClientInner {
                client,
                api_root: config.api_root(),
            }),
        }
    }

    /// The underlying HTTP client, for loading startup assets.
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Root of the tenant's endpoints.
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.inner.api_root
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .client
            .request(method, format!("{}{path}", self.inner.api_root))
    }

    fn request_with<T: Serialize>(&self, method: Method, path: &str, data: T) -> RequestBuilder {
        self.request(method, path).json(&Envelope { data })
    }

    /// Send a request and decode a successful body.
    ///
    /// Non-2xx statuses and `success: false` bodies become
    /// [`ApiError::Rejected`] carrying the server's message.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<(T, Option<String>), ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let (success, message) = serde_json::from_str::<StatusBody>(&body)
            .map_or((None, None), |b| (b.success, b.message.map(ServerMessage::into_text)));

        if !status.is_success() {
            warn!(
                status = %status,
                body = %excerpt(&body),
                "Store API returned non-success status"
            );
            return Err(ApiError::Rejected {
                status: Some(status.as_u16()),
                message: message.unwrap_or_else(|| format!("HTTP {status}")),
            });
        }

        if success == Some(false) {
            warn!(body = %excerpt(&body), "Store API reported failure");
            return Err(ApiError::Rejected {
                status: None,
                message: message.unwrap_or_else(|| "Request failed".to_string()),
            });
        }

        let payload = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %excerpt(&body), "Failed to parse store API response");
            ApiError::Parse(e)
        })?;

        debug!(status = %status, "Store API request succeeded");
        Ok((payload, message))
    }

    /// Send a mutation whose only useful output is its message.
    async fn send_notice(&self, request: RequestBuilder) -> Result<Notice, ApiError> {
        let (IgnoredAny, message) = self.send::<IgnoredAny>(request).await?;
        Ok(Notice::new(message.unwrap_or_default()))
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}

fn encode(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

impl StoreApi for RestClient {
    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let (payload, _) = self
            .send::<ProductsPayload>(self.request(Method::GET, "/products"))
            .await?;
        debug!(count = payload.products.len(), "Fetched products");
        Ok(payload.products)
    }

    #[instrument(skip(self, id), fields(product_id = %id))]
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let path = format!("/product/{}", encode(id.as_str()));
        let (payload, _) = self
            .send::<ProductPayload>(self.request(Method::GET, &path))
            .await?;
        Ok(payload.product)
    }

    #[instrument(skip(self))]
    async fn cart(&self) -> Result<Cart, ApiError> {
        let (payload, _) = self
            .send::<CartPayload>(self.request(Method::GET, "/cart"))
            .await?;
        debug!(lines = payload.data.carts.len(), "Fetched cart");
        Ok(payload.data)
    }

    #[instrument(skip(self, line), fields(product_id = %line.product_id, qty = line.qty))]
    async fn add_to_cart(&self, line: &CartLineInput) -> Result<Notice, ApiError> {
        self.send_notice(self.request_with(Method::POST, "/cart", line))
            .await
    }

    #[instrument(skip(self, id, line), fields(item_id = %id, product_id = %line.product_id, qty = line.qty))]
    async fn update_cart_item(
        &self,
        id: &CartItemId,
        line: &CartLineInput,
    ) -> Result<Notice, ApiError> {
        let path = format!("/cart/{}", encode(id.as_str()));
        self.send_notice(self.request_with(Method::PUT, &path, line))
            .await
    }

    #[instrument(skip(self, id), fields(item_id = %id))]
    async fn remove_cart_item(&self, id: &CartItemId) -> Result<Notice, ApiError> {
        let path = format!("/cart/{}", encode(id.as_str()));
        self.send_notice(self.request(Method::DELETE, &path)).await
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self) -> Result<Notice, ApiError> {
        self.send_notice(self.request(Method::DELETE, "/carts"))
            .await
    }

    #[instrument(skip(self, form))]
    async fn create_order(&self, form: &OrderForm) -> Result<OrderReceipt, ApiError> {
        let (payload, message) = self
            .send::<OrderPayload>(self.request_with(Method::POST, "/order", form))
            .await?;
        debug!(order_id = %payload.order_id, "Order created");
        Ok(OrderReceipt {
            order_id: payload.order_id,
            total: payload.total,
            created_at: DateTime::from_timestamp(payload.create_at, 0),
            message: message.unwrap_or_default(),
        })
    }
}
