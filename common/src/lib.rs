//! Catalog core for the handmade bazaar: listings, per-session catalog
//! stores, search and trending views, and the two-phase listing pipeline.

pub mod catalog;
pub mod config;
pub mod currency;
pub mod error;
pub mod generation;
pub mod listing;
pub mod pipeline;
pub mod popularity;
pub mod query;

pub use catalog::{CatalogSnapshot, CatalogStore, Session};
pub use config::CatalogConfig;
pub use currency::Currency;
pub use error::{CatalogError, GenerationError, ValidationError};
pub use listing::{Category, Listing, ListingDraft, Popularity};
