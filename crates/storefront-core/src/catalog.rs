//! # Product Catalog
//!
//! Read-only product set, built once at startup and shared behind an `Arc`.
//!
//! The catalog also performs the join from stored cart lines to display
//! rows, so every store backend renders the cart the same way.

use std::collections::HashMap;

use tracing::warn;

use crate::money::Money;
use crate::types::{CartItem, CartLine, Product};

/// Immutable set of products, in seed order.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl ProductCatalog {
    /// The storefront's seed products.
    pub fn seeded() -> Self {
        let products = vec![
            seed("1", "Wireless Headphones", 9999, "/images/headphones.jpg", "High-quality wireless headphones"),
            seed("2", "Smartphone", 69999, "/images/phone.jpg", "Latest smartphone model"),
            seed("3", "Laptop", 129999, "/images/laptop.jpg", "Powerful gaming laptop"),
            seed("4", "Smart Watch", 24999, "/images/watch.jpg", "Feature-rich smartwatch"),
            seed("5", "Tablet", 44999, "/images/tablet.jpg", "10-inch tablet"),
        ];

        let index = products
            .iter()
            .enumerate()
            .map(|(position, product)| (product.id.clone(), position))
            .collect();

        ProductCatalog { products, index }
    }

    /// All products, in seed order.
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Looks up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index.get(id).and_then(|&position| self.products.get(position))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Joins cart lines with their products, keeping line order.
    ///
    /// Lines whose product is not in the catalog are skipped and logged;
    /// the services never create such lines.
    pub fn snapshot(&self, lines: &[CartLine]) -> Vec<CartItem> {
        lines
            .iter()
            .filter_map(|line| match self.get(&line.product_id) {
                Some(product) => Some(CartItem::from_line(line, product)),
                None => {
                    warn!(
                        cart_item_id = %line.cart_item_id,
                        product_id = %line.product_id,
                        "Cart line references unknown product, skipping"
                    );
                    None
                }
            })
            .collect()
    }
}

fn seed(id: &str, name: &str, price_cents: i64, image: &str, description: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price: Money::from_cents(price_cents),
        image: image.to_string(),
        description: description.to_string(),
    }
}
