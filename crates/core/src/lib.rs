//! Shopfront Core - Shared types library.
//!
//! This crate provides the types used across all Shopfront components:
//! - `shopfront` - API client, state container and action handlers
//! - `shopfront-cli` - Command-line storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Locale catalogs are parsed from strings here; fetching them is
//! the storefront crate's job.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails and the order form
//! - [`validation`] - Field rules and localized validation messages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{LocaleCatalog, Rule};
