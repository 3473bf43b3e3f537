use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::currency::Currency;

/// Category of handmade product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Handicraft,
    Jewelry,
    Textile,
    HomeDecor,
    Art,
    Food,
    Other,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Handicraft,
            Category::Jewelry,
            Category::Textile,
            Category::HomeDecor,
            Category::Art,
            Category::Food,
            Category::Other,
        ]
    }

    /// Human-readable label, also the text that search matches against.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Handicraft => "Handicraft",
            Category::Jewelry => "Jewelry",
            Category::Textile => "Textile",
            Category::HomeDecor => "Home Decor",
            Category::Art => "Art",
            Category::Food => "Food",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "handicraft" | "handicrafts" => Ok(Category::Handicraft),
            "jewelry" | "jewellery" => Ok(Category::Jewelry),
            "textile" | "textiles" => Ok(Category::Textile),
            "homedecor" => Ok(Category::HomeDecor),
            "art" => Ok(Category::Art),
            "food" => Ok(Category::Food),
            "other" => Ok(Category::Other),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Ranking score in `0..=100`. Out-of-range values cannot be constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Popularity(u8);

impl Popularity {
    pub const MAX: u8 = 100;

    pub fn new(score: u8) -> Option<Self> {
        (score <= Self::MAX).then_some(Self(score))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Popularity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let score = u8::deserialize(deserializer)?;
        Popularity::new(score).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "popularity must be within 0..={}, got {score}",
                Popularity::MAX
            ))
        })
    }
}

/// Raw form input for a new listing, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDraft {
    pub name: String,
    pub category: Category,
    pub price: u64,
    /// Features or keywords fed to the description generator.
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_reference: Option<String>,
    #[serde(default)]
    pub generate_description: bool,
    #[serde(default)]
    pub generate_image: bool,
}

/// A single marketplace entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub name: String,
    pub category: Category,
    /// Price in whole currency units.
    pub price: u64,
    pub description: String,
    pub image_reference: String,
    pub popularity: Popularity,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// One-line summary, e.g. `Bamboo Basket (Handicraft) ₹120`.
    pub fn summary(&self, currency: Currency) -> String {
        format!(
            "{} ({}) {}",
            self.name,
            self.category,
            currency.price_label(self.price)
        )
    }
}
