//! Product detail modal control.
//!
//! The modal only knows whether it is open. Its content is whatever product
//! is currently selected in the store state.

use crate::api::Product;

/// Open/closed state of the product detail modal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductModal {
    open: bool,
}

impl ProductModal {
    /// Show the modal.
    pub const fn open(&mut self) {
        self.open = true;
    }

    /// Hide the modal.
    pub const fn close(&mut self) {
        self.open = false;
    }

    /// Whether the modal is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// The product to render, if the modal is open and one is selected.
    #[must_use]
    pub const fn showing<'a>(&self, selected: Option<&'a Product>) -> Option<&'a Product> {
        if self.open { selected } else { None }
    }
}
