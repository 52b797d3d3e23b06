//! Cart commands.
//!
//! Every mutation prints the server's message followed by the cart the
//! server returned afterwards.

use shopfront_core::{CartItemId, ProductId};

use super::{CommandError, Context, print_cart};
use crate::render;

/// Show the cart.
pub async fn show(ctx: &Context) -> Result<(), CommandError> {
    let cart = ctx.store.refresh_cart().await?;
    render::cart(&cart);
    Ok(())
}

/// Add a product; quantity defaults to one.
pub async fn add(ctx: &Context, product_id: &str, qty: Option<u32>) -> Result<(), CommandError> {
    let notice = ctx.store.add_to_cart(&ProductId::new(product_id), qty).await?;
    render::notice(&notice);
    print_cart(ctx);
    Ok(())
}

/// Change a line's quantity.
///
/// The update body needs the line's product id, so the cart is fetched
/// first to look it up.
pub async fn update(ctx: &Context, item_id: &str, qty: u32) -> Result<(), CommandError> {
    let item_id = CartItemId::new(item_id);
    let cart = ctx.store.refresh_cart().await?;
    let product_id = cart
        .item(&item_id)
        .map(|item| item.product_id.clone())
        .ok_or_else(|| CommandError::UnknownCartItem(item_id.to_string()))?;

    let notice = ctx.store.update_cart_item(&item_id, &product_id, qty).await?;
    render::notice(&notice);
    print_cart(ctx);
    Ok(())
}

/// Remove one line.
pub async fn remove(ctx: &Context, item_id: &str) -> Result<(), CommandError> {
    let notice = ctx.store.remove_cart_item(&CartItemId::new(item_id)).await?;
    render::notice(&notice);
    print_cart(ctx);
    Ok(())
}

/// Remove every line.
pub async fn clear(ctx: &Context) -> Result<(), CommandError> {
    let notice = ctx.store.clear_cart().await?;
    render::notice(&notice);
    print_cart(ctx);
    Ok(())
}
