//! Application state shared across action handlers.
//!
//! [`StoreState`] is the single owner of everything the UI renders. It is
//! handed to [`Storefront`](crate::actions::Storefront) at construction and
//! can be cloned freely; clones observe the same data.
//!
//! The lock is held only for the duration of a closure and never across an
//! `.await`, so a poisoned lock can only mean a panic inside one of those
//! closures; the data is still used in that case.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::{Cart, Product};
use crate::form::OrderFormState;
use crate::modal::ProductModal;

/// Everything the storefront UI renders.
#[derive(Debug, Clone, Default)]
pub struct StoreData {
    /// Product listing.
    pub products: Vec<Product>,
    /// Product selected for the detail modal.
    pub product: Option<Product>,
    /// Last cart snapshot returned by the server.
    pub cart: Cart,
    /// Order form being edited.
    pub form: OrderFormState,
    /// Product detail modal.
    pub modal: ProductModal,
    /// Message of the last failed cart refresh, until one succeeds.
    ///
    /// Set when the server accepted a change but the cart could not be
    /// fetched afterwards; `cart` is then older than the server's cart.
    pub cart_error: Option<String>,
    loading: LoadingSet,
}

impl StoreData {
    /// Whether a request for `id` is in flight.
    #[must_use]
    pub fn is_loading(&self, id: &str) -> bool {
        self.loading.contains(id)
    }

    /// Ids with a request in flight, sorted.
    #[must_use]
    pub fn loading_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.loading.0.keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// Multiset of in-flight request ids.
///
/// A repeated click issues a second request for the same id; the id stays
/// loading until both have finished.
#[derive(Debug, Clone, Default)]
struct LoadingSet(HashMap<String, usize>);

impl LoadingSet {
    fn insert(&mut self, id: &str) {
        *self.0.entry(id.to_string()).or_insert(0) += 1;
    }

    fn remove(&mut self, id: &str) {
        if let Some(count) = self.0.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                self.0.remove(id);
            }
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }
}

/// Injectable, cheaply cloneable handle to [`StoreData`].
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    inner: Arc<Mutex<StoreData>>,
}

impl StoreState {
    /// Create state around initial data.
    #[must_use]
    pub fn new(data: StoreData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(data)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read from the state.
    pub fn read<R>(&self, f: impl FnOnce(&StoreData) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate the state.
    pub fn update<R>(&self, f: impl FnOnce(&mut StoreData) -> R) -> R {
        f(&mut self.lock())
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StoreData {
        self.lock().clone()
    }

    /// Current cart snapshot.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.read(|data| data.cart.clone())
    }

    /// Whether a request for `id` is in flight.
    #[must_use]
    pub fn is_loading(&self, id: &str) -> bool {
        self.read(|data| data.is_loading(id))
    }

    /// Mark `id` as loading until the returned guard is dropped.
    ///
    /// Dropping covers success, failure and cancellation alike.
    #[must_use = "the id stops loading as soon as the guard is dropped"]
    pub fn begin_loading(&self, id: &str) -> LoadingGuard {
        self.update(|data| data.loading.insert(id));
        LoadingGuard {
            state: self.clone(),
            id: id.to_string(),
        }
    }
}

/// Clears a loading id on drop.
#[derive(Debug)]
pub struct LoadingGuard {
    state: StoreState,
    id: String,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.update(|data| data.loading.remove(&self.id));
    }
}
