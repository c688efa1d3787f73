//! The conversion engine — primary public API.
//!
//! Interprets a partially-specified request (optional source city, optional
//! time string) into one unambiguous source instant, then re-expresses that
//! instant under the destination city's zone rules.

use crate::clock::Clock;
use crate::location::{CityZoneLookup, Geocoder, LookupError, ZoneFinder};
use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Accepted calendar date-time layouts, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Conversion failures. Everything a request can do wrong ends up here and
/// is turned into a status code only at the outermost boundary.
#[derive(Debug)]
pub enum ConvertError {
    EmptyDestination,
    Lookup(LookupError),
    TimeParse { input: String, reason: String },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDestination => write!(f, "Destination city cannot be empty"),
            Self::Lookup(e) => write!(f, "{}", e),
            Self::TimeParse { input, reason } => {
                write!(f, "Invalid date-time '{}': {}", input, reason)
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lookup(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LookupError> for ConvertError {
    fn from(e: LookupError) -> Self {
        Self::Lookup(e)
    }
}

/// The engine, generic over its three injected capabilities.
pub struct Converter<G, Z, C> {
    lookup: CityZoneLookup<G, Z>,
    clock: C,
}

impl<G: Geocoder, Z: ZoneFinder, C: Clock> Converter<G, Z, C> {
    pub fn new(geocoder: G, zones: Z, clock: C) -> Self {
        Self {
            lookup: CityZoneLookup::new(geocoder, zones),
            clock,
        }
    }

    /// Convert `time_spec` (or "now") from `source_city` (or the host's own
    /// zone) into `dest_city` local time, formatted `YYYY-MM-DD HH:MM`.
    pub fn convert(
        &self,
        source_city: &str,
        dest_city: &str,
        time_spec: &str,
    ) -> Result<String, ConvertError> {
        let source_city = source_city.trim();
        let dest_city = dest_city.trim();
        let time_spec = time_spec.trim();

        if dest_city.is_empty() {
            return Err(ConvertError::EmptyDestination);
        }

        // Needed in every branch, resolve before anything else.
        let dest_zone = self.lookup.zone_for(dest_city)?;

        let instant: DateTime<Utc> = if source_city.is_empty() {
            if time_spec.is_empty() {
                // "what time is it there, right now"
                self.clock.now()
            } else {
                // No source city: the given time is the caller's local time.
                let local = parse_datetime(time_spec)?;
                attach_zone(local, self.clock.local_zone(), time_spec)?.with_timezone(&Utc)
            }
        } else {
            let source_zone = self.lookup.zone_for(source_city)?;

            // "HH:MM" shorthand: prefix the host machine's current date.
            let expanded = if time_spec.len() == 5 {
                let today = self
                    .clock
                    .now()
                    .with_timezone(&self.clock.local_zone())
                    .date_naive();
                format!("{} {}", today.format("%Y-%m-%d"), time_spec)
            } else {
                time_spec.to_string()
            };

            if expanded.is_empty() {
                self.clock.now()
            } else {
                attach_zone(parse_datetime(&expanded)?, source_zone, &expanded)?
                    .with_timezone(&Utc)
            }
        };

        Ok(instant.with_timezone(&dest_zone).format(OUTPUT_FORMAT).to_string())
    }
}

fn parse_datetime(input: &str) -> Result<NaiveDateTime, ConvertError> {
    for layout in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, layout) {
            return Ok(dt);
        }
    }
    Err(ConvertError::TimeParse {
        input: input.to_string(),
        reason: "expected 'YYYY-MM-DD HH:MM'".into(),
    })
}

/// Bind a naive local time to a zone. A time repeated by a DST fall-back
/// takes the earlier mapping; a time skipped by a spring-forward gap has no
/// instant to name and is rejected.
fn attach_zone(local: NaiveDateTime, zone: Tz, input: &str) -> Result<DateTime<Tz>, ConvertError> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier),
        LocalResult::None => Err(ConvertError::TimeParse {
            input: input.to_string(),
            reason: format!("time does not exist in {}", zone),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::location::{StaticGeocoder, StaticZones};
    use chrono::TimeZone;

    fn offline_converter(zone: Tz) -> Converter<StaticGeocoder, StaticZones, FixedClock> {
        // 2024-06-01 11:00 UTC — 13:00 in Stockholm, 20:00 in Tokyo.
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap();
        Converter::new(StaticGeocoder, StaticZones, FixedClock::new(instant, zone))
    }

    #[test]
    fn test_empty_destination_rejected() {
        let c = offline_converter(Tz::Europe__Stockholm);
        let err = c.convert("London", "", "").unwrap_err();
        assert!(matches!(err, ConvertError::EmptyDestination));
        assert_eq!(err.to_string(), "Destination city cannot be empty");
    }

    #[test]
    fn test_whitespace_destination_rejected() {
        let c = offline_converter(Tz::Europe__Stockholm);
        assert!(matches!(
            c.convert("", "   ", "2024-06-01 12:00"),
            Err(ConvertError::EmptyDestination),
        ));
    }

    #[test]
    fn test_explicit_datetime_london_to_tokyo() {
        // 12:00 BST = 11:00 UTC = 20:00 JST
        let c = offline_converter(Tz::Europe__Stockholm);
        let result = c.convert("London", "Tokyo", "2024-06-01 12:00").unwrap();
        assert_eq!(result, "2024-06-01 20:00");
    }

    #[test]
    fn test_winter_datetime_uses_standard_offset() {
        // January: CET (+1), not CEST
        let c = offline_converter(Tz::Europe__Stockholm);
        let result = c.convert("Stockholm", "Tokyo", "2024-01-15 10:00").unwrap();
        assert_eq!(result, "2024-01-15 18:00");
    }

    #[test]
    fn test_no_source_no_time_is_now_in_destination() {
        let c = offline_converter(Tz::Europe__Stockholm);
        let result = c.convert("", "Tokyo", "").unwrap();
        assert_eq!(result, "2024-06-01 20:00");
    }

    #[test]
    fn test_no_source_time_is_host_local() {
        // Host zone Stockholm: 2024-01-15 10:00 CET = 09:00 UTC = 18:00 JST
        let c = offline_converter(Tz::Europe__Stockholm);
        let result = c.convert("", "Tokyo", "2024-01-15 10:00").unwrap();
        assert_eq!(result, "2024-01-15 18:00");
    }

    #[test]
    fn test_source_given_empty_time_is_now() {
        let c = offline_converter(Tz::Europe__Stockholm);
        let result = c.convert("London", "Tokyo", "").unwrap();
        assert_eq!(result, "2024-06-01 20:00");
    }

    #[test]
    fn test_clock_time_shorthand_uses_host_date() {
        // 22:00 UTC: still 2024-06-01 in London, already 2024-06-02 on an
        // Auckland host. The shorthand takes the host's date.
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 22, 0, 0).unwrap();
        let c = Converter::new(
            StaticGeocoder,
            StaticZones,
            FixedClock::new(instant, Tz::Pacific__Auckland),
        );
        let result = c.convert("London", "Tokyo", "10:00").unwrap();
        assert_eq!(result, "2024-06-02 18:00");
    }

    #[test]
    fn test_clock_time_shorthand_same_day() {
        let c = offline_converter(Tz::Europe__Stockholm);
        let result = c.convert("London", "Tokyo", "12:00").unwrap();
        assert_eq!(result, "2024-06-01 20:00");
    }

    #[test]
    fn test_bare_clock_time_without_source_fails() {
        // The shorthand only applies when a source city names the zone.
        let c = offline_converter(Tz::Europe__Stockholm);
        assert!(matches!(
            c.convert("", "Tokyo", "12:00"),
            Err(ConvertError::TimeParse { .. }),
        ));
    }

    #[test]
    fn test_garbage_time_fails() {
        let c = offline_converter(Tz::Europe__Stockholm);
        assert!(matches!(
            c.convert("London", "Tokyo", "not a time"),
            Err(ConvertError::TimeParse { .. }),
        ));
    }

    #[test]
    fn test_unknown_source_city() {
        let c = offline_converter(Tz::Europe__Stockholm);
        let err = c.convert("Nowhereville123", "Tokyo", "").unwrap_err();
        assert_eq!(err.to_string(), "City not found: Nowhereville123");
    }

    #[test]
    fn test_unknown_destination_city() {
        let c = offline_converter(Tz::Europe__Stockholm);
        assert!(matches!(
            c.convert("", "Nowhereville123", ""),
            Err(ConvertError::Lookup(LookupError::CityNotFound(_))),
        ));
    }

    #[test]
    fn test_round_trip_preserves_local_time() {
        let c = offline_converter(Tz::Europe__Stockholm);
        let there = c.convert("London", "Tokyo", "2024-06-01 12:00").unwrap();
        assert_eq!(there, "2024-06-01 20:00");
        let back = c.convert("Tokyo", "London", &there).unwrap();
        assert_eq!(back, "2024-06-01 12:00");
    }

    #[test]
    fn test_inputs_are_trimmed() {
        let c = offline_converter(Tz::Europe__Stockholm);
        let result = c.convert("  London ", " Tokyo  ", "  2024-06-01 12:00 ").unwrap();
        assert_eq!(result, "2024-06-01 20:00");
    }

    #[test]
    fn test_seconds_and_t_separator_accepted() {
        let c = offline_converter(Tz::Europe__Stockholm);
        assert_eq!(
            c.convert("London", "Tokyo", "2024-06-01 12:00:45").unwrap(),
            "2024-06-01 20:00",
        );
        assert_eq!(
            c.convert("London", "Tokyo", "2024-06-01T12:00").unwrap(),
            "2024-06-01 20:00",
        );
    }

    #[test]
    fn test_spring_forward_gap_rejected() {
        // Stockholm skips 02:00-03:00 on 2024-03-31.
        let c = offline_converter(Tz::Europe__Stockholm);
        assert!(matches!(
            c.convert("Stockholm", "London", "2024-03-31 02:30"),
            Err(ConvertError::TimeParse { .. }),
        ));
    }

    #[test]
    fn test_fall_back_repeat_takes_earlier_mapping() {
        // Stockholm repeats 02:00-03:00 on 2024-10-27; the first pass is
        // still CEST (+2), so 02:30 = 00:30 UTC = 01:30 BST in London.
        let c = offline_converter(Tz::Europe__Stockholm);
        let result = c.convert("Stockholm", "London", "2024-10-27 02:30").unwrap();
        assert_eq!(result, "2024-10-27 01:30");
    }
}
