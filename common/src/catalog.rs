use std::ops::Deref;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, ValidationError};
use crate::listing::Listing;

/// Check the fields every listing must satisfy before it enters a catalog.
pub fn validate_fields(name: &str, price: u64, price_floor: u64) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if price < price_floor {
        return Err(ValidationError::PriceBelowFloor {
            price,
            floor: price_floor,
        });
    }
    Ok(())
}

/// Owned, read-only copy of a catalog at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogSnapshot(Vec<Listing>);

impl CatalogSnapshot {
    pub fn into_vec(self) -> Vec<Listing> {
        self.0
    }
}

impl Deref for CatalogSnapshot {
    type Target = [Listing];

    fn deref(&self) -> &[Listing] {
        &self.0
    }
}

/// Insertion-ordered listings for one session.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    listings: Vec<Listing>,
    price_floor: u64,
}

impl CatalogStore {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            listings: Vec::new(),
            price_floor: config.effective_price_floor(),
        }
    }

    /// Append a listing. Rejected listings leave the store untouched.
    ///
    /// Listings with identical names are kept as independent entries.
    pub fn add(&mut self, listing: Listing) -> Result<(), CatalogError> {
        validate_fields(&listing.name, listing.price, self.price_floor)?;
        debug!(
            name = %listing.name,
            category = %listing.category,
            popularity = listing.popularity.value(),
            "listing added"
        );
        self.listings.push(listing);
        Ok(())
    }

    pub fn all(&self) -> CatalogSnapshot {
        CatalogSnapshot(self.listings.clone())
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn price_floor(&self) -> u64 {
        self.price_floor
    }
}

/// Owner of at most one catalog. Moves from uninitialized to active once.
#[derive(Debug, Clone, Default)]
pub struct Session {
    catalog: Option<CatalogStore>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the catalog on first call. Later calls return the existing
    /// catalog untouched, whatever config they pass.
    pub fn initialize(&mut self, config: &CatalogConfig) -> &mut CatalogStore {
        self.catalog
            .get_or_insert_with(|| CatalogStore::new(config))
    }

    pub fn is_active(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn catalog(&self) -> Option<&CatalogStore> {
        self.catalog.as_ref()
    }
}
