// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Geodesic distance and nearest-shelter search.

use geo::{Distance, Geodesic, Point};

use crate::types::{Coordinates, Shelter};

/// The closest shelter found by [`nearest_shelter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestShelter<'a> {
    pub shelter: &'a Shelter,
    pub distance_km: f64,
}

/// Ellipsoidal (WGS-84) distance between two positions, in kilometres.
#[must_use]
pub fn geodesic_distance_km(from: Coordinates, to: Coordinates) -> f64 {
    // geo points are (x = longitude, y = latitude)
    let origin: Point<f64> = Point::new(from.longitude(), from.latitude());
    let destination: Point<f64> = Point::new(to.longitude(), to.latitude());
    Geodesic::distance(origin, destination) / 1000.0
}

/// Finds the shelter closest to `origin`.
///
/// Performs a linear scan. On equal distances the shelter seen first wins.
/// Returns `None` for an empty candidate list.
#[must_use]
pub fn nearest_shelter(origin: Coordinates, candidates: &[Shelter]) -> Option<NearestShelter<'_>> {
    let mut best: Option<NearestShelter<'_>> = None;

    for shelter in candidates {
        let distance_km: f64 = geodesic_distance_km(origin, shelter.location);
        let closer: bool = best.is_none_or(|current| distance_km < current.distance_km);
        if closer {
            best = Some(NearestShelter {
                shelter,
                distance_km,
            });
        }
    }

    best
}
