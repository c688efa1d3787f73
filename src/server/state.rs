use crate::clock::SystemClock;
use crate::convert::Converter;
use crate::location::{NominatimGeocoder, TimeApiZones};

/// The engine wired to the live providers and the real clock.
pub type LiveConverter = Converter<NominatimGeocoder, TimeApiZones, SystemClock>;

pub struct AppState {
    pub converter: LiveConverter,
}
