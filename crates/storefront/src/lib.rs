//! Shopfront storefront library.
//!
//! A client for a hosted e-commerce REST API: product listing, product
//! detail, cart and order submission.
//!
//! # Architecture
//!
//! - [`api`] - `StoreApi` trait and its `reqwest` implementation
//! - [`state`] - injectable state container (`StoreState`)
//! - [`actions`] - one async method per user action (`Storefront`)
//! - [`form`] - order form with validate-on-input
//! - [`modal`] - product detail modal control
//! - [`locale`] - loading the validation message catalog
//! - [`config`] - environment configuration
//!
//! The server owns the cart. Every cart mutation is followed by a fresh
//! `GET /cart`; the client never computes cart contents itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront::{RestClient, ShopfrontConfig, StoreState, Storefront};
//!
//! let config = ShopfrontConfig::from_env()?;
//! let store = Storefront::new(RestClient::new(&config.api)?, StoreState::default());
//!
//! store.load().await?;
//! let notice = store.add_to_cart(&"-L9tH8jxVb2Ka_DYPwng".into(), None).await?;
//! println!("{}", notice.message);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod actions;
pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod locale;
pub mod modal;
pub mod state;

pub use actions::Storefront;
pub use api::{ApiError, RestClient, StoreApi};
pub use config::ShopfrontConfig;
pub use error::StoreError;
pub use state::StoreState;
