//! Terminal output.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use shopfront::api::{Cart, Notice, OrderReceipt, Product};
use shopfront_core::{LocaleCatalog, Price, ValidationErrors};

use crate::commands::CommandError;

/// One line per product: id, category, price, title.
pub fn products(products: &[Product]) {
    if products.is_empty() {
        println!("No products.");
        return;
    }
    for product in products {
        println!(
            "{:<24} {:<12} {:>12}  {}",
            product.id.as_str(),
            product.category,
            product.price.to_string(),
            product.title
        );
    }
}

/// Product detail, as the modal shows it.
pub fn product(product: &Product) {
    println!("{}", product.title);
    println!("  id:       {}", product.id);
    println!("  category: {}", product.category);
    match &product.origin_price {
        Some(origin) if origin != &product.price => {
            println!("  price:    {} (was {origin})", product.price);
        }
        _ => println!("  price:    {} / {}", product.price, product.unit),
    }
    if let Some(image) = &product.image_url {
        println!("  image:    {image}");
    }
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    if !product.content.is_empty() {
        println!();
        println!("{}", product.content);
    }
}

/// Cart lines and the server's total.
pub fn cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty.");
        return;
    }
    for item in &cart.carts {
        let title = item.product.as_ref().map_or("?", |p| p.title.as_str());
        println!(
            "{:<24} {:<28} x{:<3} {:>12}",
            item.id.as_str(),
            title,
            item.qty,
            Price::new(item.final_total).to_string()
        );
    }
    println!("{:>70}", format!("Total: {}", Price::new(cart.final_total)));
}

/// Warn that the cart shown may be older than the server's.
pub fn stale_cart(message: &str) {
    eprintln!("Warning: cart may be out of date ({message})");
}

/// Print a server message.
pub fn notice(notice: &Notice) {
    println!("{}", notice.message);
}

/// Order confirmation.
pub fn receipt(receipt: &OrderReceipt) {
    println!("{}", receipt.message);
    println!("  order:  {}", receipt.order_id);
    println!("  total:  {}", receipt.total);
    if let Some(created_at) = receipt.created_at {
        println!("  placed: {}", created_at.format("%Y-%m-%d %H:%M UTC"));
    }
}

/// One line per invalid field, using the catalog's field names.
pub fn validation_errors(errors: &ValidationErrors, catalog: &LocaleCatalog) {
    for (field, message) in errors.iter() {
        eprintln!("  {}: {message}", catalog.field_name(field.key()));
    }
}

/// Final error line before exiting.
pub fn failure(error: &CommandError) {
    eprintln!("Error: {error}");
}
