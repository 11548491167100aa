use std::collections::HashSet;

use tracing::warn;

use crate::api::{Listing, Marker};
use crate::store::SeenStore;

/// Result of scanning one feed snapshot against the seen set.
#[derive(Debug, Default)]
pub struct Detection {
    /// Listings not yet notified on, in feed order.
    pub new: Vec<Listing>,
    /// Markers dropped because they carried no token.
    pub skipped: usize,
}

/// Retain every listing whose id is absent from the seen set. Tokenless
/// markers are skipped with a warning: without an id they cannot be
/// deduplicated, so they are never notified or persisted. Duplicate tokens
/// within one snapshot collapse to the first occurrence.
pub fn detect(markers: &[Marker], seen: &SeenStore) -> Detection {
    let mut detection = Detection::default();
    let mut batch: HashSet<String> = HashSet::new();

    for marker in markers {
        let listing = match Listing::from_marker(marker) {
            Some(listing) => listing,
            None => {
                warn!("skipping feed marker without a token, cannot deduplicate");
                detection.skipped += 1;
                continue;
            }
        };

        if seen.contains(&listing.id) || !batch.insert(listing.id.clone()) {
            continue;
        }

        detection.new.push(listing);
    }

    detection
}

/// First-run seeding: mark every currently advertised listing as seen
/// without reporting anything new, so pre-existing inventory does not
/// trigger a flood of alerts. Returns how many ids were added.
pub fn bootstrap(markers: &[Marker], seen: &mut SeenStore) -> usize {
    let mut added = 0;
    for marker in markers {
        if let Some(token) = &marker.token {
            if seen.insert(token.clone()) {
                added += 1;
            }
        }
    }
    added
}
