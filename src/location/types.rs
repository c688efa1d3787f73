//! Core types and capability traits for the location subsystem.

use std::fmt;

/// A geographic point produced by a geocoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        assert!((-90.0..=90.0).contains(&lat), "Latitude must be between -90 and 90");
        assert!((-180.0..=180.0).contains(&lon), "Longitude must be between -180 and 180");
        Self { lat, lon }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Maps a free-text place name to a coordinate. `Ok(None)` means the name
/// matched nothing; transport problems are reported separately.
pub trait Geocoder: Send + Sync {
    fn locate(&self, query: &str) -> Result<Option<Coordinate>, ProviderError>;
}

/// Maps a coordinate to an IANA timezone identifier (e.g. "Europe/London").
/// `Ok(None)` means no zone could be determined for the point.
pub trait ZoneFinder: Send + Sync {
    fn zone_at(&self, point: Coordinate) -> Result<Option<String>, ProviderError>;
}

/// Failure of a single provider call.
#[derive(Debug)]
pub enum ProviderError {
    Network(String),
    InvalidResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid API response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Failure of the two-stage city-to-timezone lookup.
#[derive(Debug)]
pub enum LookupError {
    /// The place name did not resolve to any coordinate.
    CityNotFound(String),
    /// The coordinate did not resolve to a usable timezone.
    TimezoneNotFound(String),
    /// A provider call itself failed (network, malformed payload).
    Provider(ProviderError),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CityNotFound(name) => write!(f, "City not found: {}", name),
            Self::TimezoneNotFound(name) => write!(f, "Timezone not found for: {}", name),
            Self::Provider(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProviderError> for LookupError {
    fn from(e: ProviderError) -> Self {
        Self::Provider(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_display() {
        let p = Coordinate::new(51.5074, -0.1278);
        assert_eq!(format!("{}", p), "51.5074, -0.1278");
    }

    #[test]
    #[should_panic(expected = "Latitude")]
    fn test_coordinate_rejects_bad_latitude() {
        Coordinate::new(91.0, 0.0);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LookupError::CityNotFound("Nowhereville123".into()).to_string(),
            "City not found: Nowhereville123",
        );
        assert_eq!(
            LookupError::TimezoneNotFound("Atlantis".into()).to_string(),
            "Timezone not found for: Atlantis",
        );
    }
}
