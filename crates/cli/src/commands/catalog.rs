//! Product browsing commands.

use shopfront_core::ProductId;

use super::{CommandError, Context};
use crate::render;

/// List all products.
pub async fn list(ctx: &Context) -> Result<(), CommandError> {
    let products = ctx.store.list_products().await?;
    render::products(&products);
    Ok(())
}

/// Show one product, as the detail modal would.
pub async fn show(ctx: &Context, id: &str) -> Result<(), CommandError> {
    ctx.store.view_product(&ProductId::new(id)).await?;

    let data = ctx.store.state().snapshot();
    if let Some(product) = data.modal.showing(data.product.as_ref()) {
        render::product(product);
    }
    Ok(())
}
