//! Errors returned by storefront actions.
//!
//! Every action returns `Result<T, StoreError>`. Nothing is shown to the
//! user from inside the library; the front end renders
//! [`StoreError::user_message`].

use shopfront_core::ValidationErrors;
use thiserror::Error;

use crate::api::ApiError;

/// Action-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The API request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The order form is invalid; no request was sent.
    #[error("Order form is invalid: {0}")]
    Validation(#[from] ValidationErrors),
}

impl StoreError {
    /// The text to surface to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Validation(errors) => errors.to_string(),
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
