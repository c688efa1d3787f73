//! City-to-timezone lookup — composes the two resolution stages.
//!
//! Flow: place name → Geocoder → coordinate → ZoneFinder → parsed Tz.
//! One external call per stage, no retries, failures are not cached.

use super::types::{Geocoder, LookupError, ZoneFinder};
use chrono_tz::Tz;

/// Two-stage lookup over a pair of injected capabilities.
pub struct CityZoneLookup<G, Z> {
    geocoder: G,
    zones: Z,
}

impl<G: Geocoder, Z: ZoneFinder> CityZoneLookup<G, Z> {
    pub fn new(geocoder: G, zones: Z) -> Self {
        Self { geocoder, zones }
    }

    /// Resolve a non-empty place name to its civil timezone.
    pub fn zone_for(&self, city: &str) -> Result<Tz, LookupError> {
        let point = self
            .geocoder
            .locate(city)?
            .ok_or_else(|| LookupError::CityNotFound(city.to_string()))?;

        let id = self
            .zones
            .zone_at(point)?
            .ok_or_else(|| LookupError::TimezoneNotFound(city.to_string()))?;

        // An identifier the zone database does not know is as useless as none.
        id.parse()
            .map_err(|_| LookupError::TimezoneNotFound(city.to_string()))
    }
}
