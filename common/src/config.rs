use serde::{Deserialize, Serialize};

/// Lowest accepted price when nothing else is configured.
pub const DEFAULT_PRICE_FLOOR: u64 = 50;

/// Prices must be positive, so no floor below this is honoured.
pub const MIN_PRICE_FLOOR: u64 = 1;

/// Image reference used when none was supplied or generated.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://placehold.co/512x512?text=Handmade";

/// Catalog-wide settings shared by staging, finalization and insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub price_floor: u64,
    pub placeholder_image: String,
}

impl CatalogConfig {
    pub fn with_price_floor(mut self, price_floor: u64) -> Self {
        self.price_floor = price_floor;
        self
    }

    /// The floor actually enforced: the configured one, raised to
    /// [`MIN_PRICE_FLOOR`] if lower.
    pub fn effective_price_floor(&self) -> u64 {
        self.price_floor.max(MIN_PRICE_FLOOR)
    }

    pub fn with_placeholder_image(mut self, placeholder_image: impl Into<String>) -> Self {
        self.placeholder_image = placeholder_image.into();
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            price_floor: DEFAULT_PRICE_FLOOR,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}
