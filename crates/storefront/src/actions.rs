//! User-facing storefront actions.
//!
//! Each action follows the same shape: mark the affected id as loading,
//! issue one request, apply the response to the state, and clear the
//! loading mark on every exit path.
//!
//! Cart mutations never edit the local cart. After the server accepts a
//! mutation the whole cart is fetched again and the snapshot replaced, so
//! the cart on screen is always something the server actually returned.

use std::sync::Arc;

use shopfront_core::{CartItemId, LocaleCatalog, OrderField, ProductId};
use tracing::{debug, info, instrument, warn};

use crate::api::{Cart, CartLineInput, Notice, OrderReceipt, Product, StoreApi};
use crate::error::Result;
use crate::state::StoreState;

/// Quantity used when add-to-cart is given none.
pub const DEFAULT_QTY: u32 = 1;

/// Loading id tracked while the whole cart is being cleared.
pub const CLEAR_CART_ID: &str = "carts";

/// Loading id tracked while an order is being submitted.
pub const ORDER_ID: &str = "order";

/// The storefront: an API plus the state it drives.
#[derive(Debug, Clone)]
pub struct Storefront<A> {
    api: A,
    state: StoreState,
}

impl<A: StoreApi> Storefront<A> {
    /// Wire an API implementation to a state container.
    pub const fn new(api: A, state: StoreState) -> Self {
        Self { api, state }
    }

    /// The state this storefront drives.
    #[must_use]
    pub const fn state(&self) -> &StoreState {
        &self.state
    }

    /// The API implementation.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Use `catalog` for order form messages.
    pub fn set_catalog(&self, catalog: LocaleCatalog) {
        let catalog = Arc::new(catalog);
        self.state.update(|data| data.form.set_catalog(catalog));
    }

    /// Initial page load: product list and cart, fetched together.
    ///
    /// # Errors
    ///
    /// Returns the first failure; the other request still completes and
    /// applies its result.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<()> {
        let (products, cart) = tokio::join!(self.list_products(), self.refresh_cart());
        products?;
        cart?;
        Ok(())
    }

    /// Fetch all products and replace the listing.
    ///
    /// # Errors
    ///
    /// Returns the API error; the listing is left as it was.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let products = self.api.products().await?;
        info!(count = products.len(), "Product list loaded");
        self.state
            .update(|data| data.products.clone_from(&products));
        Ok(products)
    }

    /// Fetch one product, select it and open the detail modal.
    ///
    /// # Errors
    ///
    /// Returns the API error; the selection and modal are left untouched.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub async fn view_product(&self, id: &ProductId) -> Result<Product> {
        let product = {
            let _loading = self.state.begin_loading(id.as_str());
            self.api.product(id).await?
        };

        self.state.update(|data| {
            data.product = Some(product.clone());
            data.modal.open();
        });
        Ok(product)
    }

    /// Close the product detail modal.
    pub fn close_product(&self) {
        self.state.update(|data| data.modal.close());
    }

    /// Add a product to the cart; `qty` defaults to [`DEFAULT_QTY`].
    ///
    /// Closes the detail modal before posting.
    ///
    /// # Errors
    ///
    /// Returns the API error of the add. Once the server accepts it the
    /// notice is returned even if the follow-up cart refresh fails.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: &ProductId, qty: Option<u32>) -> Result<Notice> {
        let line = CartLineInput {
            product_id: product_id.clone(),
            qty: qty.unwrap_or(DEFAULT_QTY),
        };
        self.close_product();

        let notice = {
            let _loading = self.state.begin_loading(product_id.as_str());
            self.api.add_to_cart(&line).await?
        };
        self.refresh_after_mutation().await;
        Ok(notice)
    }

    /// Change the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns the API error of the update. Once the server accepts it the
    /// notice is returned even if the follow-up cart refresh fails.
    #[instrument(
        skip(self, item_id, product_id),
        fields(item_id = %item_id, product_id = %product_id)
    )]
    pub async fn update_cart_item(
        &self,
        item_id: &CartItemId,
        product_id: &ProductId,
        qty: u32,
    ) -> Result<Notice> {
        let line = CartLineInput {
            product_id: product_id.clone(),
            qty,
        };

        let notice = {
            let _loading = self.state.begin_loading(item_id.as_str());
            self.api.update_cart_item(item_id, &line).await?
        };
        self.refresh_after_mutation().await;
        Ok(notice)
    }

    /// Remove one cart line.
    ///
    /// # Errors
    ///
    /// Returns the API error of the removal. Once the server accepts it the
    /// notice is returned even if the follow-up cart refresh fails.
    #[instrument(skip(self, item_id), fields(item_id = %item_id))]
    pub async fn remove_cart_item(&self, item_id: &CartItemId) -> Result<Notice> {
        let notice = {
            let _loading = self.state.begin_loading(item_id.as_str());
            self.api.remove_cart_item(item_id).await?
        };
        self.refresh_after_mutation().await;
        Ok(notice)
    }

    /// Remove every cart line.
    ///
    /// # Errors
    ///
    /// Returns the API error of the clear. Once the server accepts it the
    /// notice is returned even if the follow-up cart refresh fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<Notice> {
        let notice = {
            let _loading = self.state.begin_loading(CLEAR_CART_ID);
            self.api.clear_cart().await?
        };
        self.refresh_after_mutation().await;
        Ok(notice)
    }

    /// Fetch the cart and replace the local snapshot.
    ///
    /// # Errors
    ///
    /// Returns the API error; the previous snapshot is kept and the message
    /// recorded as the cart error.
    #[instrument(skip(self))]
    pub async fn refresh_cart(&self) -> Result<Cart> {
        let cart = match self.api.cart().await {
            Ok(cart) => cart,
            Err(e) => {
                self.state
                    .update(|data| data.cart_error = Some(e.user_message()));
                return Err(e.into());
            }
        };
        debug!(lines = cart.carts.len(), total = %cart.final_total, "Cart refreshed");
        self.state.update(|data| {
            data.cart.clone_from(&cart);
            data.cart_error = None;
        });
        Ok(cart)
    }

    /// Re-fetch the cart after the server accepted a mutation.
    ///
    /// The mutation already happened, so a failed fetch does not turn it
    /// into an error; it is left in [`StoreData::cart_error`] instead.
    ///
    /// [`StoreData::cart_error`]: crate::state::StoreData::cart_error
    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.refresh_cart().await {
            warn!(error = %e, "Cart refresh after accepted change failed");
        }
    }

    /// Record a form edit; the field is validated immediately.
    pub fn input(&self, field: OrderField, value: impl Into<String>) {
        self.state.update(|data| data.form.input(field, value));
    }

    /// Validate the order form and, if valid, submit it.
    ///
    /// On success the form is reset and the cart refreshed (the server
    /// empties the cart when an order is placed). On failure the form keeps
    /// its values.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`](crate::error::StoreError::Validation)
    /// without sending anything if a field is invalid, otherwise the API
    /// error of the order. A placed order always yields its receipt, even
    /// when the follow-up cart refresh fails.
    #[instrument(skip(self))]
    pub async fn submit_order(&self) -> Result<OrderReceipt> {
        let form = self.state.update(|data| {
            data.form
                .validate_all()
                .map(|()| data.form.values().clone())
        });
        let form = form.inspect_err(|errors| {
            warn!(invalid = %errors, "Order form rejected before submission");
        })?;

        let receipt = {
            let _loading = self.state.begin_loading(ORDER_ID);
            self.api.create_order(&form).await?
        };
        info!(order_id = %receipt.order_id, "Order placed");

        self.state.update(|data| data.form.reset());
        self.refresh_after_mutation().await;
        Ok(receipt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use rust_decimal::Decimal;
    use shopfront_core::{OrderForm, OrderId, Price};

    use super::*;
    use crate::api::{ApiError, CartItem};
    use crate::error::StoreError;

    /// In-memory API double recording every call.
    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<String>>,
        products: Vec<Product>,
        cart: Mutex<Cart>,
        fail: Mutex<Option<&'static str>>,
        observed: StoreState,
        loading_seen: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn record(&self, call: &str) -> std::result::Result<(), ApiError> {
            self.calls.lock().unwrap().push(call.to_string());
            self.loading_seen
                .lock()
                .unwrap()
                .extend(self.observed.snapshot().loading_ids());
            if self.fail.lock().unwrap().is_some_and(|f| call.starts_with(f)) {
                return Err(ApiError::Rejected {
                    status: Some(400),
                    message: format!("{call} failed"),
                });
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn fail_on(&self, prefix: &'static str) {
            *self.fail.lock().unwrap() = Some(prefix);
        }
    }

    impl StoreApi for FakeApi {
        async fn products(&self) -> std::result::Result<Vec<Product>, ApiError> {
            self.record("GET /products")?;
            Ok(self.products.clone())
        }

        async fn product(&self, id: &ProductId) -> std::result::Result<Product, ApiError> {
            self.record(&format!("GET /product/{id}"))?;
            self.products
                .iter()
                .find(|p| &p.id == id)
                .cloned()
                .ok_or_else(|| ApiError::Rejected {
                    status: Some(404),
                    message: "找不到產品".to_string(),
                })
        }

        async fn cart(&self) -> std::result::Result<Cart, ApiError> {
            self.record("GET /cart")?;
            Ok(self.cart.lock().unwrap().clone())
        }

        async fn add_to_cart(&self, line: &CartLineInput) -> std::result::Result<Notice, ApiError> {
            self.record(&format!("POST /cart {} {}", line.product_id, line.qty))?;
            let mut cart = self.cart.lock().unwrap();
            cart.carts.push(CartItem {
                id: CartItemId::new(format!("item-{}", line.product_id)),
                product_id: line.product_id.clone(),
                qty: line.qty,
                product: None,
                total: Decimal::new(100, 0) * Decimal::from(line.qty),
                final_total: Decimal::new(100, 0) * Decimal::from(line.qty),
            });
            cart.total = cart.carts.iter().map(|i| i.total).sum();
            cart.final_total = cart.total;
            Ok(Notice::new("已加入購物車"))
        }

        async fn update_cart_item(
            &self,
            id: &CartItemId,
            line: &CartLineInput,
        ) -> std::result::Result<Notice, ApiError> {
            self.record(&format!("PUT /cart/{id} {}", line.qty))?;
            if let Some(item) = self.cart.lock().unwrap().carts.iter_mut().find(|i| &i.id == id) {
                item.qty = line.qty;
            }
            Ok(Notice::new("已更新購物車"))
        }

        async fn remove_cart_item(&self, id: &CartItemId) -> std::result::Result<Notice, ApiError> {
            self.record(&format!("DELETE /cart/{id}"))?;
            self.cart.lock().unwrap().carts.retain(|i| &i.id != id);
            Ok(Notice::new("已刪除"))
        }

        async fn clear_cart(&self) -> std::result::Result<Notice, ApiError> {
            self.record("DELETE /carts")?;
            *self.cart.lock().unwrap() = Cart::default();
            Ok(Notice::new("已全部刪除"))
        }

        async fn create_order(&self, form: &OrderForm) -> std::result::Result<OrderReceipt, ApiError> {
            self.record(&format!("POST /order {}", form.user.name))?;
            *self.cart.lock().unwrap() = Cart::default();
            Ok(OrderReceipt {
                order_id: OrderId::new("order-1"),
                total: Price::default(),
                created_at: None,
                message: "已建立訂單".to_string(),
            })
        }
    }

    fn product(id: &str) -> Product {
        serde_json::from_value(serde_json::json!({"id": id, "title": id, "price": 100})).unwrap()
    }

    fn storefront() -> Storefront<FakeApi> {
        let state = StoreState::default();
        let api = FakeApi {
            products: vec![product("p1"), product("p2")],
            observed: state.clone(),
            ..FakeApi::default()
        };
        Storefront::new(api, state)
    }

    fn fill_form(store: &Storefront<FakeApi>) {
        store.input(OrderField::Name, "王小明");
        store.input(OrderField::Email, "ming@example.com");
        store.input(OrderField::Tel, "0912345678");
        store.input(OrderField::Address, "台北市");
        store.input(OrderField::Message, "請盡快出貨");
    }

    #[tokio::test]
    async fn test_load_fetches_products_and_cart() {
        let store = storefront();
        store.load().await.unwrap();

        let calls = store.api().calls();
        assert!(calls.contains(&"GET /products".to_string()));
        assert!(calls.contains(&"GET /cart".to_string()));
        assert_eq!(store.state().read(|d| d.products.len()), 2);
    }

    #[tokio::test]
    async fn test_add_to_cart_defaults_qty_and_refreshes_once() {
        let store = storefront();
        let notice = store.add_to_cart(&ProductId::new("p1"), None).await.unwrap();

        assert_eq!(notice.message, "已加入購物車");
        assert_eq!(store.api().calls(), vec!["POST /cart p1 1", "GET /cart"]);
        assert_eq!(store.state().cart(), store.api().cart.lock().unwrap().clone());
        assert!(!store.state().is_loading("p1"));
    }

    #[tokio::test]
    async fn test_loading_is_set_during_request_and_cleared_before_refresh() {
        let store = storefront();
        store.add_to_cart(&ProductId::new("p1"), Some(2)).await.unwrap();

        // seen at POST time only; GET /cart runs after the guard is dropped
        assert_eq!(*store.api().loading_seen.lock().unwrap(), vec!["p1".to_string()]);
    }

    #[tokio::test]
    async fn test_add_to_cart_closes_modal() {
        let store = storefront();
        store.view_product(&ProductId::new("p1")).await.unwrap();
        assert!(store.state().read(|d| d.modal.is_open()));

        store.add_to_cart(&ProductId::new("p1"), Some(3)).await.unwrap();
        assert!(!store.state().read(|d| d.modal.is_open()));
    }

    #[tokio::test]
    async fn test_failed_add_clears_loading_and_skips_refresh() {
        let store = storefront();
        store.api().fail_on("POST /cart");

        let err = store.add_to_cart(&ProductId::new("p1"), None).await.unwrap_err();
        assert_eq!(err.user_message(), "POST /cart p1 1 failed");
        assert!(!store.state().is_loading("p1"));
        assert_eq!(store.api().calls(), vec!["POST /cart p1 1"]);
    }

    #[tokio::test]
    async fn test_view_product_opens_modal() {
        let store = storefront();
        let product = store.view_product(&ProductId::new("p2")).await.unwrap();

        let data = store.state().snapshot();
        assert_eq!(data.product.as_ref(), Some(&product));
        assert_eq!(data.modal.showing(data.product.as_ref()), Some(&product));
        assert!(!data.is_loading("p2"));
    }

    #[tokio::test]
    async fn test_failed_view_product_leaves_modal_closed() {
        let store = storefront();
        store.view_product(&ProductId::new("p1")).await.unwrap();
        store.close_product();

        let err = store.view_product(&ProductId::new("missing")).await.unwrap_err();
        assert_eq!(err.user_message(), "找不到產品");

        let data = store.state().snapshot();
        assert!(!data.modal.is_open());
        assert!(!data.is_loading("missing"));
        assert_eq!(data.product.map(|p| p.id), Some(ProductId::new("p1")));
    }

    #[tokio::test]
    async fn test_update_and_remove_replace_cart_from_server() {
        let store = storefront();
        store.add_to_cart(&ProductId::new("p1"), None).await.unwrap();
        let item = CartItemId::new("item-p1");

        store.update_cart_item(&item, &ProductId::new("p1"), 4).await.unwrap();
        assert_eq!(store.state().cart().item(&item).map(|i| i.qty), Some(4));

        store.remove_cart_item(&item).await.unwrap();
        assert!(store.state().cart().is_empty());
        assert!(!store.state().is_loading(item.as_str()));
    }

    #[tokio::test]
    async fn test_failed_update_clears_loading() {
        let store = storefront();
        store.api().fail_on("PUT");
        let item = CartItemId::new("item-p1");

        assert!(store.update_cart_item(&item, &ProductId::new("p1"), 2).await.is_err());
        assert!(!store.state().is_loading(item.as_str()));
    }

    #[tokio::test]
    async fn test_clear_cart() {
        let store = storefront();
        store.add_to_cart(&ProductId::new("p1"), None).await.unwrap();
        store.add_to_cart(&ProductId::new("p2"), None).await.unwrap();

        store.clear_cart().await.unwrap();
        assert!(store.state().cart().is_empty());
        assert_eq!(store.api().calls().last().map(String::as_str), Some("GET /cart"));
        assert!(store.api().loading_seen.lock().unwrap().contains(&CLEAR_CART_ID.to_string()));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_cart() {
        let store = storefront();
        store.add_to_cart(&ProductId::new("p1"), None).await.unwrap();
        let before = store.state().cart();

        store.api().fail_on("GET /cart");
        assert!(store.refresh_cart().await.is_err());
        assert_eq!(store.state().cart(), before);
        assert_eq!(
            store.state().read(|d| d.cart_error.clone()).as_deref(),
            Some("GET /cart failed")
        );
    }

    #[tokio::test]
    async fn test_accepted_add_returns_notice_when_refresh_fails() {
        let store = storefront();
        store.api().fail_on("GET /cart");

        let notice = store.add_to_cart(&ProductId::new("p1"), None).await.unwrap();
        assert_eq!(notice.message, "已加入購物車");
        assert_eq!(store.api().calls(), vec!["POST /cart p1 1", "GET /cart"]);
        assert!(store.state().cart().is_empty());
        assert!(store.state().read(|d| d.cart_error.is_some()));
        assert!(!store.state().is_loading("p1"));

        *store.api().fail.lock().unwrap() = None;
        store.refresh_cart().await.unwrap();
        assert_eq!(store.state().cart().carts.len(), 1);
        assert!(store.state().read(|d| d.cart_error.is_none()));
    }

    #[tokio::test]
    async fn test_placed_order_returns_receipt_when_refresh_fails() {
        let store = storefront();
        store.add_to_cart(&ProductId::new("p1"), None).await.unwrap();
        fill_form(&store);
        store.api().fail_on("GET /cart");

        let receipt = store.submit_order().await.unwrap();
        assert_eq!(receipt.order_id, OrderId::new("order-1"));
        assert_eq!(receipt.message, "已建立訂單");

        let data = store.state().snapshot();
        assert_eq!(data.form.values(), &OrderForm::default());
        assert_eq!(data.cart_error.as_deref(), Some("GET /cart failed"));
        assert!(!data.is_loading(ORDER_ID));
        assert_eq!(
            store.api().calls()[2..],
            ["POST /order 王小明".to_string(), "GET /cart".to_string()]
        );
    }

    #[tokio::test]
    async fn test_invalid_order_sends_nothing() {
        let store = storefront();
        store.input(OrderField::Name, "王小明");

        let err = store.submit_order().await.unwrap_err();
        let StoreError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.get(OrderField::Email).is_some());
        assert!(store.api().calls().is_empty());
        assert_eq!(store.state().read(|d| d.form.values().user.name.clone()), "王小明");
    }

    #[tokio::test]
    async fn test_order_success_resets_form_and_refreshes_cart() {
        let store = storefront();
        store.add_to_cart(&ProductId::new("p1"), None).await.unwrap();
        fill_form(&store);

        let receipt = store.submit_order().await.unwrap();
        assert_eq!(receipt.order_id, OrderId::new("order-1"));

        let data = store.state().snapshot();
        assert_eq!(data.form.values(), &OrderForm::default());
        assert!(data.cart.is_empty());
        assert_eq!(
            store.api().calls()[2..],
            ["POST /order 王小明".to_string(), "GET /cart".to_string()]
        );
    }

    #[tokio::test]
    async fn test_order_failure_keeps_form() {
        let store = storefront();
        fill_form(&store);
        store.api().fail_on("POST /order");

        assert!(store.submit_order().await.is_err());
        let data = store.state().snapshot();
        assert_eq!(data.form.values().user.tel, "0912345678");
        assert!(!data.is_loading(ORDER_ID));
    }
}
