//! Category filtering and sorting for product listings.
//!
//! [`filter_and_sort`] is a pure function over a product slice. It never
//! reorders equal elements: every sort is stable, so ties keep catalog order.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Category, Product};

/// Error parsing a listing filter from a query parameter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown category filter: {0}")]
pub struct FilterParseError(pub String);

/// Category restriction for a listing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Phone,
    Laptop,
}

impl CategoryFilter {
    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Phone => "phone",
            Self::Laptop => "laptop",
        }
    }

    /// The single category this filter keeps, or `None` for all.
    #[must_use]
    pub const fn category(self) -> Option<Category> {
        match self {
            Self::All => None,
            Self::Phone => Some(Category::Phone),
            Self::Laptop => Some(Category::Laptop),
        }
    }

    /// Listing page heading.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::All => "All Products",
            Self::Phone => "Gaming Phones",
            Self::Laptop => "Gaming Laptops",
        }
    }

    /// Whether a product passes this filter.
    #[must_use]
    pub fn matches(self, product: &Product) -> bool {
        self.category()
            .is_none_or(|category| product.category == category)
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        match category {
            Category::Phone => Self::Phone,
            Category::Laptop => Self::Laptop,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "phone" => Ok(Self::Phone),
            "laptop" => Ok(Self::Laptop),
            other => Err(FilterParseError(other.to_string())),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Featured products first.
    #[default]
    Featured,
    /// Display name, ascending and case-insensitive.
    Name,
    /// Price, ascending.
    PriceLow,
    /// Price, descending.
    PriceHigh,
}

impl SortKey {
    /// Every sort order, in selector order.
    pub const ALL: [Self; 4] = [Self::Featured, Self::Name, Self::PriceLow, Self::PriceHigh];

    /// Parse from URL parameter value.
    ///
    /// Unknown values fall back to the default featured ordering.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "name" => Self::Name,
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            _ => Self::Featured,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Name => "name",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
        }
    }

    /// Option label for the sort selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::Name => "Name",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter a product list by category and order it by `sort`.
///
/// An empty result is valid; callers render an empty state.
#[must_use]
pub fn filter_and_sort(
    products: &[Product],
    category: CategoryFilter,
    sort: SortKey,
) -> Vec<&Product> {
    let mut view: Vec<&Product> = products.iter().filter(|p| category.matches(p)).collect();

    // `sort_by` is stable
    match sort {
        SortKey::Featured => view.sort_by_key(|p| !p.featured),
        SortKey::Name => view.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::PriceLow => view.sort_by_key(|p| p.price),
        SortKey::PriceHigh => view.sort_by(|a, b| b.price.cmp(&a.price)),
    }

    view
}

/// Case-insensitive name order. Names differing only in case fall back to
/// byte order so the result stays total.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::seed_products;
    use crate::types::Price;

    fn ids(view: &[&Product]) -> Vec<String> {
        view.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_phone_price_low() {
        let products = seed_products();
        let view = filter_and_sort(&products, CategoryFilter::Phone, SortKey::PriceLow);
        assert_eq!(ids(&view), ["vortex-pro-phone", "apex-ultra-phone"]);
        assert_eq!(view[0].price, Price::new(2499));
        assert_eq!(view[1].price, Price::new(3299));
    }

    #[test]
    fn test_all_price_high() {
        let products = seed_products();
        let view = filter_and_sort(&products, CategoryFilter::All, SortKey::PriceHigh);
        assert_eq!(
            ids(&view),
            [
                "titan-gaming-laptop",
                "storm-workstation-laptop",
                "apex-ultra-phone",
                "vortex-pro-phone"
            ]
        );
    }

    #[test]
    fn test_all_by_name() {
        let products = seed_products();
        let view = filter_and_sort(&products, CategoryFilter::All, SortKey::Name);
        let names: Vec<_> = view.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Apex Ultra Gaming Phone",
                "Storm Workstation Laptop",
                "Titan Gaming Laptop",
                "Vortex Pro Gaming Phone"
            ]
        );
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let mut products = seed_products();
        products[0].name = "storm".to_string();
        products[1].name = "Apex".to_string();
        products[2].name = "apex".to_string();
        products[3].name = "Titan".to_string();
        let view = filter_and_sort(&products, CategoryFilter::All, SortKey::Name);
        let names: Vec<_> = view.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Apex", "apex", "storm", "Titan"]);
    }

    #[test]
    fn test_featured_first_keeps_catalog_order() {
        let mut products = seed_products();
        products[0].featured = false;
        products[2].featured = false;
        let view = filter_and_sort(&products, CategoryFilter::All, SortKey::Featured);
        assert_eq!(
            ids(&view),
            [
                "vortex-pro-phone",
                "storm-workstation-laptop",
                "titan-gaming-laptop",
                "apex-ultra-phone"
            ]
        );
    }

    #[test]
    fn test_price_ties_keep_catalog_order() {
        let mut products = seed_products();
        for product in &mut products {
            product.price = Price::new(1000);
        }
        let low = filter_and_sort(&products, CategoryFilter::All, SortKey::PriceLow);
        let high = filter_and_sort(&products, CategoryFilter::All, SortKey::PriceHigh);
        let catalog_order: Vec<_> = products.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids(&low), catalog_order);
        assert_eq!(ids(&high), catalog_order);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let products: Vec<Product> = seed_products()
            .into_iter()
            .filter(|p| p.category == Category::Laptop)
            .collect();
        let view = filter_and_sort(&products, CategoryFilter::Phone, SortKey::Featured);
        assert!(view.is_empty());
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "laptop".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Laptop
        );
        assert_eq!(
            "tablet".parse::<CategoryFilter>().unwrap_err(),
            FilterParseError("tablet".to_string())
        );
    }

    #[test]
    fn test_sort_key_parse_falls_back_to_featured() {
        assert_eq!(SortKey::parse("price-high"), SortKey::PriceHigh);
        assert_eq!(SortKey::parse("bogus"), SortKey::Featured);
        assert_eq!(SortKey::PriceLow.as_str(), "price-low");
    }

    #[test]
    fn test_sort_options_round_trip_through_parse() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(key.as_str()), key);
            assert!(!key.label().is_empty());
        }
        assert_eq!(SortKey::PriceHigh.label(), "Price: High to Low");
    }

    #[test]
    fn test_category_filter_from_product_category() {
        assert_eq!(CategoryFilter::from(Category::Phone), CategoryFilter::Phone);
        assert_eq!(
            CategoryFilter::from(Category::Laptop).heading(),
            "Gaming Laptops"
        );
    }

    #[test]
    fn test_headings() {
        assert_eq!(CategoryFilter::All.heading(), "All Products");
        assert_eq!(CategoryFilter::Phone.heading(), "Gaming Phones");
    }
}
