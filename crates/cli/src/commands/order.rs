//! Order placement.

use shopfront::StoreError;
use shopfront::locale::load_catalog;
use shopfront_core::OrderField;
use tracing::warn;

use super::{CommandError, Context, print_cart};
use crate::render;

/// Contact details from the command line.
pub struct OrderDetails {
    pub name: String,
    pub email: String,
    pub tel: String,
    pub address: String,
    pub message: String,
}

/// Validate the details and place the order.
///
/// A catalog that fails to load is not fatal: messages fall back to English.
pub async fn place(ctx: &Context, details: OrderDetails) -> Result<(), CommandError> {
    match load_catalog(&ctx.config.locale_source, ctx.store.api().http()).await {
        Ok(catalog) => ctx.store.set_catalog(catalog),
        Err(e) => warn!(error = %e, "Using built-in validation messages"),
    }

    // One input per field, as a form would see them
    ctx.store.input(OrderField::Name, details.name);
    ctx.store.input(OrderField::Email, details.email);
    ctx.store.input(OrderField::Tel, details.tel);
    ctx.store.input(OrderField::Address, details.address);
    ctx.store.input(OrderField::Message, details.message);

    match ctx.store.submit_order().await {
        Ok(receipt) => {
            render::receipt(&receipt);
            print_cart(ctx);
            Ok(())
        }
        Err(StoreError::Validation(errors)) => {
            let catalog = ctx.store.state().read(|data| data.form.catalog().clone());
            render::validation_errors(&errors, &catalog);
            Err(CommandError::InvalidOrder(errors.iter().count()))
        }
        Err(e) => Err(e.into()),
    }
}
