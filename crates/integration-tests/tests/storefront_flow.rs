//! End-to-end storefront flows against the mock store API.
//!
//! Each test starts its own [`MockStore`], drives a `Storefront` backed by
//! the real `RestClient`, and checks both the wire traffic and the state.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use chrono::DateTime;
use serde_json::json;
use shopfront::api::Cart;
use shopfront::{ApiError, RestClient, StoreError, StoreState, Storefront};
use shopfront_core::{CartItemId, OrderField, OrderId, ProductId};
use shopfront_integration_tests::{MockProduct, MockStore, ORDER_CREATED_AT};

fn storefront(mock: &MockStore) -> Storefront<RestClient> {
    Storefront::new(mock.client(), StoreState::default())
}

fn server_cart(mock: &MockStore) -> Cart {
    serde_json::from_value(mock.cart_json()).unwrap()
}

fn fill_valid_form(store: &Storefront<RestClient>) {
    store.input(OrderField::Name, "王小明");
    store.input(OrderField::Email, "ming@example.com");
    store.input(OrderField::Tel, "0912345678");
    store.input(OrderField::Address, "台北市信義區");
    store.input(OrderField::Message, "請於週末送達");
}

#[tokio::test]
async fn test_load_fetches_products_and_cart() {
    let mock = MockStore::with_catalog().await;
    mock.seed_line("p2", 1);
    let store = storefront(&mock);

    store.load().await.unwrap();

    let data = store.state().snapshot();
    assert_eq!(data.products.len(), 2);
    assert_eq!(data.products[0].title, "草莓莓果夾心圈");
    assert_eq!(data.cart, server_cart(&mock));

    let mut lines = mock.take_lines();
    lines.sort();
    assert_eq!(lines, vec!["GET /cart", "GET /products"]);
}

#[tokio::test]
async fn test_add_to_cart_posts_envelope_then_refetches_cart() {
    let mock = MockStore::start(vec![MockProduct::new("42", "檸檬糖霜甜甜圈", 90)]).await;
    let store = storefront(&mock);

    let notice = store.add_to_cart(&ProductId::new("42"), None).await.unwrap();
    assert_eq!(notice.message, "已加入購物車");

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path, "/cart");
    assert_eq!(
        requests[0].body,
        Some(json!({ "data": { "product_id": "42", "qty": 1 } }))
    );
    assert_eq!(requests[1].line(), "GET /cart");

    let cart = store.state().cart();
    assert_eq!(cart, server_cart(&mock));
    assert_eq!(cart.carts.len(), 1);
    assert_eq!(cart.carts[0].qty, 1);
    assert!(!store.state().is_loading("42"));
}

#[tokio::test]
async fn test_add_to_cart_closes_product_modal() {
    let mock = MockStore::with_catalog().await;
    let store = storefront(&mock);

    store.view_product(&ProductId::new("p1")).await.unwrap();
    assert!(store.state().read(|data| data.modal.is_open()));

    store.add_to_cart(&ProductId::new("p1"), Some(2)).await.unwrap();

    assert!(!store.state().read(|data| data.modal.is_open()));
    assert_eq!(store.state().cart().carts[0].qty, 2);
}

#[tokio::test]
async fn test_view_product_selects_and_opens_modal() {
    let mock = MockStore::with_catalog().await;
    let store = storefront(&mock);

    let product = store.view_product(&ProductId::new("p2")).await.unwrap();

    assert_eq!(product.title, "可可杏仁脆片");
    assert!(product.is_enabled);
    assert_eq!(product.attributes.get("num"), Some(&json!(1)));

    let data = store.state().snapshot();
    assert_eq!(data.modal.showing(data.product.as_ref()), Some(&product));
    assert_eq!(mock.take_lines(), vec!["GET /product/p2"]);
}

#[tokio::test]
async fn test_unknown_product_clears_loading_and_passes_message() {
    let mock = MockStore::with_catalog().await;
    let store = storefront(&mock);

    let err = store
        .view_product(&ProductId::new("missing"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::Api(ApiError::Rejected {
            status: Some(404),
            ..
        })
    ));
    assert_eq!(err.user_message(), "找不到產品");
    assert!(!store.state().is_loading("missing"));
    assert!(store.state().read(|data| data.product.is_none() && !data.modal.is_open()));
}

#[tokio::test]
async fn test_update_cart_item_sends_product_and_qty() {
    let mock = MockStore::with_catalog().await;
    let item_id = mock.seed_line("p1", 1);
    let store = storefront(&mock);

    let notice = store
        .update_cart_item(&CartItemId::new(item_id.as_str()), &ProductId::new("p1"), 3)
        .await
        .unwrap();
    assert_eq!(notice.message, "已更新購物車");

    let requests = mock.requests();
    assert_eq!(requests[0].line(), format!("PUT /cart/{item_id}"));
    assert_eq!(
        requests[0].body,
        Some(json!({ "data": { "product_id": "p1", "qty": 3 } }))
    );
    assert_eq!(requests[1].line(), "GET /cart");
    assert_eq!(requests.len(), 2);

    let cart = store.state().cart();
    assert_eq!(cart, server_cart(&mock));
    assert_eq!(cart.carts[0].qty, 3);
    assert_eq!(cart.final_total.to_string(), "450");
}

#[tokio::test]
async fn test_remove_and_clear_refetch_cart() {
    let mock = MockStore::with_catalog().await;
    let first = mock.seed_line("p1", 1);
    mock.seed_line("p2", 2);
    let store = storefront(&mock);

    store
        .remove_cart_item(&CartItemId::new(first.as_str()))
        .await
        .unwrap();
    assert_eq!(store.state().cart().carts.len(), 1);

    let notice = store.clear_cart().await.unwrap();
    assert_eq!(notice.message, "已清空購物車");
    assert!(store.state().cart().is_empty());

    assert_eq!(
        mock.take_lines(),
        vec![
            format!("DELETE /cart/{first}"),
            "GET /cart".to_string(),
            "DELETE /carts".to_string(),
            "GET /cart".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_rejected_mutation_skips_refresh() {
    let mock = MockStore::with_catalog().await;
    let store = storefront(&mock);
    mock.fail_next("POST /cart", StatusCode::OK, "加入購物車失敗");

    let err = store
        .add_to_cart(&ProductId::new("p1"), None)
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "加入購物車失敗");
    assert!(!store.state().is_loading("p1"));
    assert_eq!(mock.take_lines(), vec!["POST /cart"]);
    assert!(store.state().cart().is_empty());
}

#[tokio::test]
async fn test_invalid_order_sends_nothing() {
    let mock = MockStore::with_catalog().await;
    let store = storefront(&mock);
    fill_valid_form(&store);
    store.input(OrderField::Email, "not-an-email");
    store.input(OrderField::Tel, "123");

    let err = store.submit_order().await.unwrap_err();

    let StoreError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert!(errors.get(OrderField::Email).is_some());
    assert!(errors.get(OrderField::Tel).is_some());
    assert!(errors.get(OrderField::Name).is_none());
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_order_resets_form_and_refreshes_cart() {
    let mock = MockStore::with_catalog().await;
    mock.seed_line("p1", 2);
    let store = storefront(&mock);
    store.refresh_cart().await.unwrap();
    mock.take_lines();
    fill_valid_form(&store);

    let receipt = store.submit_order().await.unwrap();

    assert_eq!(receipt.order_id, OrderId::new("-order1"));
    assert_eq!(receipt.total.to_string(), "NT$300");
    assert_eq!(receipt.message, "已建立訂單");
    assert_eq!(receipt.created_at, DateTime::from_timestamp(ORDER_CREATED_AT, 0));

    let requests = mock.requests();
    assert_eq!(requests[0].line(), "POST /order");
    assert_eq!(
        requests[0].body,
        Some(json!({
            "data": {
                "user": {
                    "name": "王小明",
                    "email": "ming@example.com",
                    "tel": "0912345678",
                    "address": "台北市信義區"
                },
                "message": "請於週末送達"
            }
        }))
    );
    assert_eq!(requests[1].line(), "GET /cart");

    let data = store.state().snapshot();
    assert!(data.cart.is_empty());
    assert_eq!(data.form.values(), &shopfront_core::OrderForm::default());
    assert!(!data.form.has_errors());
    assert!(!data.is_loading("order"));
}

#[tokio::test]
async fn test_order_on_empty_cart_keeps_form() {
    let mock = MockStore::with_catalog().await;
    let store = storefront(&mock);
    fill_valid_form(&store);

    let err = store.submit_order().await.unwrap_err();

    assert_eq!(err.user_message(), "購物車內無資料");
    assert_eq!(mock.take_lines(), vec!["POST /order"]);
    let form = store.state().read(|data| data.form.values().clone());
    assert_eq!(form.user.email, "ming@example.com");
    assert!(!store.state().is_loading("order"));
}

#[tokio::test]
async fn test_placed_order_survives_failed_cart_refresh() {
    let mock = MockStore::with_catalog().await;
    mock.seed_line("p1", 1);
    let store = storefront(&mock);
    fill_valid_form(&store);
    mock.fail_next("GET /cart", StatusCode::INTERNAL_SERVER_ERROR, "伺服器忙碌中");

    let receipt = store.submit_order().await.unwrap();

    assert_eq!(receipt.message, "已建立訂單");
    assert_eq!(mock.take_lines(), vec!["POST /order", "GET /cart"]);
    assert!(server_cart(&mock).is_empty());

    let data = store.state().snapshot();
    assert_eq!(data.cart_error.as_deref(), Some("伺服器忙碌中"));
    assert_eq!(data.form.values(), &shopfront_core::OrderForm::default());

    store.refresh_cart().await.unwrap();
    assert!(store.state().read(|data| data.cart_error.is_none()));
}
