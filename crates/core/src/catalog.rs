//! The product catalog.
//!
//! The catalog is a fixed list of products built once at process start and
//! shared read-only afterwards. Construction validates the static data so a
//! bad seed (duplicate ids, missing hero) fails fast instead of surfacing as
//! a runtime lookup miss.

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{Category, Price, Product, ProductId, ProductSpecs};

/// Id of the product promoted at the top of the home page.
pub const DEFAULT_HERO_PRODUCT_ID: &str = "titan-gaming-laptop";

/// Errors raised by catalog construction and lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No product has the requested id.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// The configured hero id is not in the catalog.
    #[error("hero product {0} is not in the catalog")]
    MissingHeroProduct(String),

    /// Two products share an id.
    #[error("duplicate product id: {0}")]
    DuplicateProductId(String),

    /// A product has a zero price.
    #[error("product {0} must have a positive price")]
    InvalidPrice(String),

    /// A product's original price is below its current price.
    #[error("product {id} has original price {original} below price {price}")]
    InvalidOriginalPrice {
        id: String,
        price: Price,
        original: Price,
    },
}

impl CatalogError {
    /// Whether this error is a static configuration mistake rather than a
    /// lookup miss.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::ProductNotFound(_))
    }
}

/// Immutable, validated product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    hero_index: usize,
}

impl Catalog {
    /// Build a catalog from a product list and the hero product id.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if ids are duplicated, a price is zero,
    /// an original price is below the price, or the hero id is absent.
    pub fn new(products: Vec<Product>, hero_id: &str) -> Result<Self, CatalogError> {
        validate_products(&products)?;

        let hero_index = products
            .iter()
            .position(|p| p.id.as_str() == hero_id)
            .ok_or_else(|| CatalogError::MissingHeroProduct(hero_id.to_string()))?;

        Ok(Self {
            products,
            hero_index,
        })
    }

    /// Build the seeded Delta Gear catalog with the default hero.
    ///
    /// # Errors
    ///
    /// Only fails if the seed data itself is inconsistent.
    pub fn seeded() -> Result<Self, CatalogError> {
        Self::new(seed_products(), DEFAULT_HERO_PRODUCT_ID)
    }

    /// Build the seeded catalog with a different hero id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingHeroProduct`] if `hero_id` is unknown.
    pub fn seeded_with_hero(hero_id: &str) -> Result<Self, CatalogError> {
        Self::new(seed_products(), hero_id)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn list_products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if no product has this id.
    pub fn get_product(&self, id: &str) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|p| p.id.as_str() == id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))
    }

    /// The product promoted at the top of the home page.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // hero_index is validated in `new`; products never change
    pub fn hero_product(&self) -> &Product {
        &self.products[self.hero_index]
    }

    /// Featured products other than the hero, in catalog order.
    #[must_use]
    pub fn featured_products(&self) -> Vec<&Product> {
        let hero_id = &self.hero_product().id;
        self.products
            .iter()
            .filter(|p| p.featured && &p.id != hero_id)
            .collect()
    }

    /// Other products in the same category, in catalog order.
    #[must_use]
    pub fn related_products(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.id != product.id && p.category == product.category)
            .take(limit)
            .collect()
    }
}

/// Check the per-product invariants of a catalog seed.
fn validate_products(products: &[Product]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(product.id.as_str()) {
            return Err(CatalogError::DuplicateProductId(product.id.to_string()));
        }
        if product.price == Price::ZERO {
            return Err(CatalogError::InvalidPrice(product.id.to_string()));
        }
        if let Some(original) = product.original_price.filter(|o| *o < product.price) {
            return Err(CatalogError::InvalidOriginalPrice {
                id: product.id.to_string(),
                price: product.price,
                original,
            });
        }
    }
    Ok(())
}

/// The four products sold by the store.
#[must_use]
pub fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("titan-gaming-laptop"),
            name: "Titan Gaming Laptop".to_string(),
            tagline: "Desktop Power, Mobile Freedom".to_string(),
            price: Price::new(6999),
            original_price: Some(Price::new(7499)),
            image: "/generated/titan-gaming-laptop-hero.png".to_string(),
            category: Category::Laptop,
            featured: true,
            specs: ProductSpecs {
                processor: "Intel i9-13900HX".to_string(),
                memory: "32GB DDR5".to_string(),
                storage: "2TB NVMe SSD".to_string(),
                display: "15.6\" 240Hz QHD".to_string(),
                graphics: Some("RTX 4090 Desktop GPU".to_string()),
                battery: None,
                camera: None,
                cooling: Some("Vapor Chamber + Liquid Metal".to_string()),
            },
        },
        Product {
            id: ProductId::new("vortex-pro-phone"),
            name: "Vortex Pro Gaming Phone".to_string(),
            tagline: "Mobile Gaming Perfection".to_string(),
            price: Price::new(2499),
            original_price: None,
            image: "/generated/vortex-pro-phone.png".to_string(),
            category: Category::Phone,
            featured: true,
            specs: ProductSpecs {
                processor: "Snapdragon 8 Gen 3".to_string(),
                memory: "16GB LPDDR5X".to_string(),
                storage: "512GB UFS 4.0".to_string(),
                display: "6.8\" 144Hz AMOLED".to_string(),
                graphics: None,
                battery: Some("6000mAh + 120W Charging".to_string()),
                camera: Some("200MP Triple Camera".to_string()),
                cooling: None,
            },
        },
        Product {
            id: ProductId::new("apex-ultra-phone"),
            name: "Apex Ultra Gaming Phone".to_string(),
            tagline: "The Ultimate Gaming Experience".to_string(),
            price: Price::new(3299),
            original_price: None,
            image: "/generated/apex-ultra-phone.png".to_string(),
            category: Category::Phone,
            featured: true,
            specs: ProductSpecs {
                processor: "MediaTek Dimensity 9300".to_string(),
                memory: "18GB LPDDR5X".to_string(),
                storage: "1TB UFS 4.0".to_string(),
                display: "6.9\" 165Hz AMOLED".to_string(),
                graphics: None,
                battery: Some("6500mAh + 150W Charging".to_string()),
                camera: Some("108MP Quad Camera".to_string()),
                cooling: None,
            },
        },
        Product {
            id: ProductId::new("storm-workstation-laptop"),
            name: "Storm Workstation Laptop".to_string(),
            tagline: "Professional Gaming Powerhouse".to_string(),
            price: Price::new(4999),
            original_price: None,
            image: "/generated/storm-workstation-laptop.png".to_string(),
            category: Category::Laptop,
            featured: true,
            specs: ProductSpecs {
                processor: "AMD Ryzen 9 7945HX".to_string(),
                memory: "64GB DDR5".to_string(),
                storage: "4TB NVMe SSD".to_string(),
                display: "17.3\" 4K OLED".to_string(),
                graphics: Some("RTX 4080 Desktop GPU".to_string()),
                battery: None,
                camera: None,
                cooling: Some("Dual-Fan Thermal Management".to_string()),
            },
        },
    ]
}
