// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Nearest-shelter resolution for a free-text address.

use hinanjo_domain::{Coordinates, NearestShelter, Shelter, nearest_shelter};
use tracing::debug;

use crate::geocoding::Geocoder;

/// The outcome of resolving an address to its closest shelter.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedShelter {
    pub shelter: Shelter,
    pub distance_km: f64,
    /// Where the address geocoded to.
    pub origin: Coordinates,
}

/// Geocodes `address` and returns the closest of `candidates`.
///
/// Returns `None` when the address is blank, cannot be geocoded, or there are
/// no candidates. Equal distances resolve to the earlier candidate. Has no
/// side effects beyond the geocoder call.
pub async fn resolve_nearest(
    geocoder: &dyn Geocoder,
    address: &str,
    candidates: &[Shelter],
) -> Option<ResolvedShelter> {
    let address: &str = address.trim();
    if address.is_empty() || candidates.is_empty() {
        return None;
    }

    let origin: Coordinates = geocoder.geocode(address).await?;
    let nearest: NearestShelter<'_> = nearest_shelter(origin, candidates)?;

    debug!(
        shelter = %nearest.shelter.name,
        distance_km = nearest.distance_km,
        "Resolved nearest shelter"
    );

    Some(ResolvedShelter {
        shelter: nearest.shelter.clone(),
        distance_km: nearest.distance_km,
        origin,
    })
}
