//! Domain and wire types for the hosted API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use shopfront_core::{CartItemId, OrderId, Price, ProductId};

// =============================================================================
// Products
// =============================================================================

/// A catalog product. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Display name.
    pub title: String,
    #[serde(default)]
    pub category: String,
    /// List price before discount.
    #[serde(default)]
    pub origin_price: Option<Price>,
    /// Selling price.
    pub price: Price,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    /// The API sends `1`/`0`; booleans are accepted too.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_enabled: bool,
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default, rename = "imagesUrl")]
    pub images_url: Vec<String>,
    /// Any further attributes the store defines.
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}

// =============================================================================
// Cart
// =============================================================================

/// One line of the server-side cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Cart item id (not the product id).
    pub id: CartItemId,
    pub product_id: ProductId,
    pub qty: u32,
    /// Product snapshot embedded by the server.
    #[serde(default)]
    pub product: Option<Product>,
    /// Server-computed subtotal.
    #[serde(default)]
    pub total: Decimal,
    /// Subtotal after coupons.
    #[serde(default)]
    pub final_total: Decimal,
}

/// The cart, exactly as the server last reported it.
///
/// Never edited locally; replaced wholesale by each `GET /cart`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub carts: Vec<CartItem>,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub final_total: Decimal,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }

    /// Look up a line by cart item id.
    #[must_use]
    pub fn item(&self, id: &CartItemId) -> Option<&CartItem> {
        self.carts.iter().find(|item| &item.id == id)
    }
}

/// Body of `POST /cart` and `PUT /cart/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineInput {
    pub product_id: ProductId,
    pub qty: u32,
}

// =============================================================================
// Orders and messages
// =============================================================================

/// A server message to show the user after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub total: Price,
    /// Absent when the server timestamp is out of range.
    pub created_at: Option<DateTime<Utc>>,
    pub message: String,
}

// =============================================================================
// Wire format
// =============================================================================

/// `{"data": ...}` request envelope.
#[derive(Debug, Serialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// A `message` field: a string, or a list of strings for multi-field errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ServerMessage {
    Text(String),
    List(Vec<String>),
}

impl ServerMessage {
    pub(crate) fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::List(lines) => lines.join("; "),
        }
    }
}

/// Fields every response shares.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<ServerMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsPayload {
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductPayload {
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartPayload {
    pub data: Cart,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderPayload {
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
    #[serde(default)]
    pub total: Price,
    #[serde(default)]
    pub create_at: i64,
}
