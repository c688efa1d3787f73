//! Location subsystem: name-to-coordinate and coordinate-to-timezone
//! capabilities, plus the two-stage lookup that chains them.

pub mod lookup;
pub mod providers;
pub mod types;

pub use lookup::CityZoneLookup;
pub use providers::{NominatimGeocoder, StaticGeocoder, StaticZones, TimeApiZones};
pub use types::{Coordinate, Geocoder, LookupError, ProviderError, ZoneFinder};
