//! Derived views over a catalog snapshot. Nothing here mutates the catalog.

use crate::error::CatalogError;
use crate::listing::Listing;

/// Number of listings shown in the trending view.
pub const DEFAULT_TRENDING_LIMIT: i64 = 5;

/// Case-insensitive substring match on name or category label.
///
/// A blank query returns the whole snapshot in its original order.
pub fn search(snapshot: &[Listing], query: &str) -> Vec<Listing> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return snapshot.to_vec();
    }
    snapshot
        .iter()
        .filter(|listing| {
            listing.name.to_lowercase().contains(&needle)
                || listing.category.label().to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// The `limit` most popular listings, highest first.
///
/// Equal scores keep their insertion order.
pub fn trending(snapshot: &[Listing], limit: i64) -> Result<Vec<Listing>, CatalogError> {
    if limit <= 0 {
        return Err(CatalogError::InvalidArgument { limit });
    }
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);

    let mut ranked = snapshot.to_vec();
    // `sort_by` is stable
    ranked.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    ranked.truncate(limit);
    Ok(ranked)
}
