//! CLI subcommands.
//!
//! Each command builds on a [`Context`]: the configured storefront with an
//! empty state, the same as a fresh page load.

pub mod cart;
pub mod catalog;
pub mod order;

use shopfront::config::{ConfigError, ShopfrontConfig};
use shopfront::{ApiError, RestClient, StoreError, StoreState, Storefront};
use thiserror::Error;

use crate::render;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be created.
    #[error("Client error: {0}")]
    Client(#[from] ApiError),

    /// A storefront action failed.
    #[error("{}", .0.user_message())]
    Store(#[from] StoreError),

    /// The named cart item is not in the cart.
    #[error("No cart item with id {0}")]
    UnknownCartItem(String),

    /// The order form had invalid fields; they were already printed.
    #[error("Order not placed: {0} invalid field(s)")]
    InvalidOrder(usize),
}

/// Everything a command needs.
pub struct Context {
    pub config: ShopfrontConfig,
    pub store: Storefront<RestClient>,
}

impl Context {
    /// Build the storefront from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the client cannot be
    /// built.
    pub fn from_env() -> Result<Self, CommandError> {
        let config = ShopfrontConfig::from_env()?;
        let client = RestClient::new(&config.api)?;
        tracing::debug!(api_root = %client.api_root(), "Storefront client ready");

        Ok(Self {
            store: Storefront::new(client, StoreState::default()),
            config,
        })
    }
}

/// Print the cart the last refresh returned, flagging it if a later
/// refresh failed.
pub fn print_cart(ctx: &Context) {
    let (cart, cart_error) = ctx
        .store
        .state()
        .read(|data| (data.cart.clone(), data.cart_error.clone()));
    render::cart(&cart);
    if let Some(message) = cart_error {
        render::stale_cart(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_order_error_does_not_repeat_field_messages() {
        let err = CommandError::InvalidOrder(2);
        assert_eq!(err.to_string(), "Order not placed: 2 invalid field(s)");
    }

    #[test]
    fn test_store_error_shows_server_message() {
        let err = CommandError::from(StoreError::Api(ApiError::Rejected {
            status: Some(400),
            message: "購物車內無資料".to_string(),
        }));
        assert_eq!(err.to_string(), "購物車內無資料");
    }
}
