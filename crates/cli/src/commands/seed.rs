//! Seed the product catalog.
//!
//! Products come from a JSON file or, when none is given, a small built-in
//! sample catalog. The whole file is parsed and validated before anything is
//! written.
//!
//! ```json
//! [
//!   { "name": "Canvas Tote", "category": "Bags", "price": "24.00", "image": "tote.jpg" }
//! ]
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use estore_core::Price;
use estore_storefront::db::ProductRepository;

use super::connect;

/// One product to insert.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    pub category: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
}

/// Errors in a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("could not read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid seed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("product #{index}: {reason}")]
    Invalid { index: usize, reason: &'static str },
}

/// Insert products from `file`, or the sample catalog.
///
/// # Errors
///
/// Returns an error if the file is unreadable or invalid, or an insert fails.
pub async fn products(file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let products = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading products from file");
            parse_products(&tokio::fs::read_to_string(path).await.map_err(SeedError::from)?)?
        }
        None => sample_catalog(),
    };

    let pool = connect().await?;
    let repo = ProductRepository::new(&pool);

    for product in &products {
        let id = repo
            .create(&product.name, &product.category, product.price, &product.image)
            .await?;
        info!(%id, name = %product.name, price = %product.price, "Inserted product");
    }

    info!(count = products.len(), "Seeding complete!");
    Ok(())
}

/// Parse and validate a JSON array of products.
///
/// # Errors
///
/// Returns `SeedError::Parse` for malformed JSON and `SeedError::Invalid`
/// for an empty name or category, or a negative price.
pub fn parse_products(json: &str) -> Result<Vec<SeedProduct>, SeedError> {
    let products: Vec<SeedProduct> = serde_json::from_str(json)?;

    for (index, product) in products.iter().enumerate() {
        if product.name.trim().is_empty() {
            return Err(SeedError::Invalid {
                index,
                reason: "name is empty",
            });
        }
        if product.category.trim().is_empty() {
            return Err(SeedError::Invalid {
                index,
                reason: "category is empty",
            });
        }
        if product.price < Price::zero() {
            return Err(SeedError::Invalid {
                index,
                reason: "price is negative",
            });
        }
    }

    Ok(products)
}

fn sample_catalog() -> Vec<SeedProduct> {
    [
        ("Classic Tee", "Apparel", Decimal::new(1500, 2), "classic-tee.jpg"),
        ("Zip Hoodie", "Apparel", Decimal::new(4200, 2), "zip-hoodie.jpg"),
        ("Enamel Mug", "Home", Decimal::new(800, 2), "enamel-mug.jpg"),
        ("Canvas Tote", "Bags", Decimal::new(2400, 2), "canvas-tote.jpg"),
        ("Sticker Pack", "Accessories", Decimal::new(499, 2), "sticker-pack.jpg"),
    ]
    .into_iter()
    .map(|(name, category, price, image)| SeedProduct {
        name: name.to_owned(),
        category: category.to_owned(),
        price: Price::new(price),
        image: image.to_owned(),
    })
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_products() {
        let products = parse_products(
            r#"[
                {"name": "Tee", "category": "Apparel", "price": "15.00", "image": "tee.jpg"},
                {"name": "Mug", "category": "Home", "price": "8.5"}
            ]"#,
        )
        .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[1].price, Price::new(Decimal::new(85, 1)));
        assert_eq!(products[1].image, "");
    }

    #[test]
    fn test_parse_products_rejects_negative_price() {
        let err = parse_products(r#"[{"name": "Tee", "category": "Apparel", "price": "-1"}]"#)
            .unwrap_err();
        assert!(matches!(err, SeedError::Invalid { index: 0, .. }));
    }

    #[test]
    fn test_parse_products_rejects_blank_name() {
        let err = parse_products(
            r#"[
                {"name": "Tee", "category": "Apparel", "price": "1"},
                {"name": "  ", "category": "Apparel", "price": "1"}
            ]"#,
        )
        .unwrap_err();
        assert!(matches!(err, SeedError::Invalid { index: 1, .. }));
    }

    #[test]
    fn test_parse_products_rejects_malformed_json() {
        assert!(matches!(parse_products("{"), Err(SeedError::Parse(_))));
    }

    #[test]
    fn test_sample_catalog_is_valid() {
        let catalog = sample_catalog();
        assert!(!catalog.is_empty());
        assert!(catalog.iter().all(|p| p.price >= Price::zero()));
    }
}
