//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod order;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use order::{OrderField, OrderForm, OrderUser, ValidationErrors, validate_order};
pub use price::Price;
