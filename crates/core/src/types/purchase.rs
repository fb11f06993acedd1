//! One-click purchase types.
//!
//! There is no payment processing behind these types: a purchase is a
//! validated shipping form followed by a simulated confirmation.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::price::Price;
use super::product::Product;

/// Country preselected on the shipping form.
pub const DEFAULT_COUNTRY: &str = "United States";

/// Shipping information collected by the purchase dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurchaseForm {
    pub email: String,
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for PurchaseForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            full_name: String::new(),
            address: String::new(),
            city: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl PurchaseForm {
    /// Required fields that are blank after trimming, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|field| self.value(*field).trim().is_empty())
            .collect()
    }

    /// Whether every required field is filled in.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    fn value(&self, field: RequiredField) -> &str {
        match field {
            RequiredField::Email => &self.email,
            RequiredField::FullName => &self.full_name,
            RequiredField::Address => &self.address,
            RequiredField::City => &self.city,
            RequiredField::ZipCode => &self.zip_code,
        }
    }
}

/// Shipping form fields that must be present before submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredField {
    Email,
    FullName,
    Address,
    City,
    ZipCode,
}

impl RequiredField {
    /// All required fields in form order.
    pub const ALL: [Self; 5] = [
        Self::Email,
        Self::FullName,
        Self::Address,
        Self::City,
        Self::ZipCode,
    ];

    /// Human-readable field label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "Email Address",
            Self::FullName => "Full Name",
            Self::Address => "Address",
            Self::City => "City",
            Self::ZipCode => "ZIP Code",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of a purchase dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    #[default]
    Idle,
    Processing,
    Completed,
}

/// Price breakdown shown beneath the shipping form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Shipping is free and no tax is charged, so the total is the price.
    #[must_use]
    pub const fn for_product(product: &Product) -> Self {
        Self {
            subtotal: product.price,
            shipping: Price::ZERO,
            tax: Price::ZERO,
            total: product.price,
        }
    }
}

/// Success notification raised when a simulated purchase completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseNotification {
    pub title: String,
    pub description: String,
    pub product_name: String,
}

impl PurchaseNotification {
    /// Build the confirmation for a purchased product.
    #[must_use]
    pub fn for_product(product: &Product) -> Self {
        Self {
            title: "Purchase Successful! 🎉".to_string(),
            description: format!(
                "Your {} will be shipped within 24 hours. Check your email for tracking information.",
                product.name
            ),
            product_name: product.name.clone(),
        }
    }
}
