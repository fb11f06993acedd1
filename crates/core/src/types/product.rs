//! Product model.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Phone,
    Laptop,
}

impl Category {
    /// Wire name, as used in `?category=` query parameters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Laptop => "laptop",
        }
    }

    /// Short display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Phone => "Phone",
            Self::Laptop => "Laptop",
        }
    }

    /// Badge text shown on listing cards.
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Phone => "GAMING PHONE",
            Self::Laptop => "GAMING LAPTOP",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Technical specifications.
///
/// The first four attributes are present on every product; the rest depend
/// on the category (phones list camera and battery, laptops graphics and
/// cooling).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpecs {
    pub processor: String,
    pub memory: String,
    pub storage: String,
    pub display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooling: Option<String>,
}

impl ProductSpecs {
    /// Present attributes as `(label, value)` pairs in display order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut entries = vec![
            ("Processor", self.processor.as_str()),
            ("Memory", self.memory.as_str()),
            ("Storage", self.storage.as_str()),
            ("Display", self.display.as_str()),
        ];
        let optional = [
            ("Graphics", &self.graphics),
            ("Battery", &self.battery),
            ("Camera", &self.camera),
            ("Cooling", &self.cooling),
        ];
        entries.extend(
            optional
                .into_iter()
                .filter_map(|(label, value)| value.as_deref().map(|v| (label, v))),
        );
        entries
    }
}

/// A catalog product.
///
/// Products are seeded at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub tagline: String,
    pub price: Price,
    /// Pre-discount price; never below `price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Opaque reference to a display asset.
    pub image: String,
    pub category: Category,
    pub featured: bool,
    pub specs: ProductSpecs,
}

impl Product {
    /// Whether the product is discounted from its original price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }

    /// Amount saved against the original price, if discounted.
    #[must_use]
    pub fn savings(&self) -> Option<Price> {
        self.original_price
            .filter(|original| *original > self.price)
            .map(|original| original.saturating_sub(self.price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> ProductSpecs {
        ProductSpecs {
            processor: "Snapdragon 8 Gen 3".to_string(),
            memory: "16GB".to_string(),
            storage: "512GB".to_string(),
            display: "6.8\"".to_string(),
            graphics: None,
            battery: Some("6000mAh".to_string()),
            camera: Some("200MP".to_string()),
            cooling: None,
        }
    }

    fn product(price: u32, original: Option<u32>) -> Product {
        Product {
            id: ProductId::new("test-phone"),
            name: "Test Phone".to_string(),
            tagline: "Testing".to_string(),
            price: Price::new(price),
            original_price: original.map(Price::new),
            image: "/test.png".to_string(),
            category: Category::Phone,
            featured: false,
            specs: specs(),
        }
    }

    #[test]
    fn test_spec_entries_skip_missing_optionals() {
        let labels: Vec<_> = specs().entries().into_iter().map(|(l, _)| l).collect();
        assert_eq!(
            labels,
            ["Processor", "Memory", "Storage", "Display", "Battery", "Camera"]
        );
    }

    #[test]
    fn test_on_sale_and_savings() {
        let discounted = product(6999, Some(7499));
        assert!(discounted.is_on_sale());
        assert_eq!(discounted.savings(), Some(Price::new(500)));

        let full_price = product(2499, None);
        assert!(!full_price.is_on_sale());
        assert_eq!(full_price.savings(), None);

        let same = product(2499, Some(2499));
        assert!(!same.is_on_sale());
        assert_eq!(same.savings(), None);
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(Category::Phone.as_str(), "phone");
        assert_eq!(Category::Laptop.to_string(), "laptop");
        assert_eq!(Category::Laptop.badge(), "GAMING LAPTOP");
    }
}
