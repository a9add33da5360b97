//! Listings and categories.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Money;
use crate::error::{DomainError, DomainResult};

/// Physical condition of a second-hand item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    /// Unused.
    New,
    /// Used, no visible wear.
    LikeNew,
    /// Normal wear.
    #[default]
    Good,
    /// Noticeable wear.
    Fair,
    /// Heavy wear or defects.
    Poor,
}

impl Condition {
    /// Returns all conditions, best first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::New, Self::LikeNew, Self::Good, Self::Fair, Self::Poor]
    }

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::LikeNew => "like-new",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }

    /// Human label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::LikeNew => "Like New",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Condition {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownCondition(s.to_string()))
    }
}

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Identifier.
    pub id: i64,
    /// Unique name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Listing as shown in search results, cart lines and "my listings".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Asking price.
    pub price: Money,
    /// Category name.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Item condition.
    #[serde(default)]
    pub condition: Condition,
    /// Seller username.
    #[serde(default)]
    pub seller_name: Option<String>,
    /// False once sold.
    #[serde(default = "default_true")]
    pub is_available: bool,
    /// Absolute URL of the primary image.
    #[serde(default)]
    pub primary_image: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Image attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Identifier.
    pub id: i64,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Alternative text.
    #[serde(default)]
    pub alt_text: String,
    /// Whether this is the listing's cover image.
    #[serde(default)]
    pub is_primary: bool,
}

/// Full listing as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Asking price.
    pub price: Money,
    /// Units available.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Category id.
    pub category: i64,
    /// Category name.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Item condition.
    #[serde(default)]
    pub condition: Condition,
    /// Optional item details.
    #[serde(flatten)]
    pub details: ProductDetails,
    /// Seller id.
    #[serde(default)]
    pub seller: Option<i64>,
    /// Seller username.
    #[serde(default)]
    pub seller_name: Option<String>,
    /// False once sold.
    #[serde(default = "default_true")]
    pub is_available: bool,
    /// Attached images.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The cover image, or the first image if none is marked primary.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.first())
    }
}

/// Descriptive fields shared by listings and drafts.
///
/// Dimensions are centimetres, weight is kilograms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    /// Brand.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub brand: String,
    /// Model.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    /// Year of manufacture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_of_manufacture: Option<u16>,
    /// Main material.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub material: String,
    /// Colour.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
    /// Length, as the decimal string the backend stores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    /// Width, as the decimal string the backend stores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Height, as the decimal string the backend stores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// Weight, as the decimal string the backend stores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    /// Ships in original packaging.
    #[serde(default)]
    pub original_packaging: bool,
    /// Manual included.
    #[serde(default)]
    pub manual_included: bool,
    /// Notes on working condition.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub working_condition_description: String,
}

/// New listing posted by the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDraft {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Asking price.
    pub price: Money,
    /// Units for sale.
    pub quantity: u32,
    /// Category id.
    pub category: i64,
    /// Item condition.
    pub condition: Condition,
    /// Optional item details.
    #[serde(flatten)]
    pub details: ProductDetails,
}

impl ProductDraft {
    /// Creates a draft with one unit in good condition.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        category: i64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            price,
            quantity: 1,
            category,
            condition: Condition::default(),
            details: ProductDetails::default(),
        }
    }
}

/// Filters for the product search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Full-text search over title and description.
    pub search: Option<String>,
    /// Category id.
    pub category: Option<i64>,
    /// Condition.
    pub condition: Option<Condition>,
}

impl ProductQuery {
    /// Query-string pairs for the set filters, in a stable order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category".to_string(), category.to_string()));
        }
        if let Some(condition) = self.condition {
            pairs.push(("condition".to_string(), condition.as_str().to_string()));
        }
        pairs
    }
}

const fn default_true() -> bool {
    true
}

const fn default_quantity() -> u32 {
    1
}
