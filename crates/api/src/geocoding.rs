// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Address geocoding.
//!
//! A geocoder turns a free-text address into coordinates. Every failure mode
//! (network error, timeout, rate limit, empty result, malformed response) is
//! reported as `None`: the address is simply not resolvable on this attempt.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::BoxFuture;
use hinanjo_domain::Coordinates;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Default public Nominatim endpoint.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Resolves addresses to coordinates.
pub trait Geocoder: Send + Sync {
    /// Geocodes `address`, returning `None` when it cannot be resolved.
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Option<Coordinates>>;
}

/// Internal failure reasons. Never escape the geocoder; they are logged and
/// collapsed to `None`.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid geocoder base URL: {0}")]
    BaseUrl(String),

    #[error("geocoder returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("geocoder returned an unparsable coordinate: {0}")]
    BadCoordinate(String),
}

/// Geocoder backed by a Nominatim-compatible search API.
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    /// Builds a geocoder for `base_url`.
    ///
    /// Nominatim's usage policy requires an identifying user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client: reqwest::Client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn search(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url: reqwest::Url = reqwest::Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[("q", address), ("format", "jsonv2"), ("limit", "1")],
        )
        .map_err(|e| GeocodeError::BaseUrl(e.to_string()))?;

        let response: reqwest::Response = self.client.get(url).send().await?;
        let status: reqwest::StatusCode = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status));
        }

        let hits: Vec<SearchHit> = response.json().await?;
        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };

        let latitude: f64 = hit
            .lat
            .parse()
            .map_err(|_| GeocodeError::BadCoordinate(hit.lat.clone()))?;
        let longitude: f64 = hit
            .lon
            .parse()
            .map_err(|_| GeocodeError::BadCoordinate(hit.lon.clone()))?;

        Ok(Coordinates::new(latitude, longitude).ok())
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Option<Coordinates>> {
        Box::pin(async move {
            match self.search(address).await {
                Ok(found) => {
                    debug!(resolved = found.is_some(), "Geocoded address");
                    found
                }
                Err(e) => {
                    warn!("Geocoding failed, treating address as unresolvable: {e}");
                    None
                }
            }
        })
    }
}

/// Geocoder that never resolves anything. Used when geocoding is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeocoder;

impl Geocoder for DisabledGeocoder {
    fn geocode<'a>(&'a self, _address: &'a str) -> BoxFuture<'a, Option<Coordinates>> {
        Box::pin(async { None })
    }
}

/// Geocoder answering from a fixed table of addresses.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    known: HashMap<String, Coordinates>,
}

impl StaticGeocoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an address to the table.
    #[must_use]
    pub fn with(mut self, address: &str, location: Coordinates) -> Self {
        self.known.insert(address.to_string(), location);
        self
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Option<Coordinates>> {
        let found: Option<Coordinates> = self.known.get(address.trim()).copied();
        Box::pin(async move { found })
    }
}
