//! Location providers: Nominatim geocoding, timeapi.io zone lookup, and the
//! built-in offline dataset.

use super::types::{Coordinate, Geocoder, ProviderError, ZoneFinder};
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

// ─── Built-in dataset ───────────────────────────────────────────

struct BuiltinCity {
    names: &'static [&'static str], // canonical + aliases
    lat: f64,
    lon: f64,
    tz: &'static str,
}

const BUILTIN_CITIES: &[BuiltinCity] = &[
    BuiltinCity {
        names: &["london"],
        lat: 51.5074, lon: -0.1278, tz: "Europe/London",
    },
    BuiltinCity {
        names: &["new york", "newyork", "nyc"],
        lat: 40.7128, lon: -74.0060, tz: "America/New_York",
    },
    BuiltinCity {
        names: &["los angeles", "la"],
        lat: 34.0522, lon: -118.2437, tz: "America/Los_Angeles",
    },
    BuiltinCity {
        names: &["chicago"],
        lat: 41.8781, lon: -87.6298, tz: "America/Chicago",
    },
    BuiltinCity {
        names: &["mexico city", "ciudad de mexico"],
        lat: 19.4326, lon: -99.1332, tz: "America/Mexico_City",
    },
    BuiltinCity {
        names: &["sao paulo", "são paulo"],
        lat: -23.5505, lon: -46.6333, tz: "America/Sao_Paulo",
    },
    BuiltinCity {
        names: &["reykjavik", "reykjavík"],
        lat: 64.1466, lon: -21.9426, tz: "Atlantic/Reykjavik",
    },
    BuiltinCity {
        names: &["paris"],
        lat: 48.8566, lon: 2.3522, tz: "Europe/Paris",
    },
    BuiltinCity {
        names: &["berlin"],
        lat: 52.5200, lon: 13.4050, tz: "Europe/Berlin",
    },
    BuiltinCity {
        names: &["stockholm", "stokholm"],
        lat: 59.3293, lon: 18.0686, tz: "Europe/Stockholm",
    },
    BuiltinCity {
        names: &["istanbul"],
        lat: 41.0082, lon: 28.9784, tz: "Europe/Istanbul",
    },
    BuiltinCity {
        names: &["moscow", "moskva"],
        lat: 55.7558, lon: 37.6173, tz: "Europe/Moscow",
    },
    BuiltinCity {
        names: &["cairo"],
        lat: 30.0444, lon: 31.2357, tz: "Africa/Cairo",
    },
    BuiltinCity {
        names: &["dubai"],
        lat: 25.2048, lon: 55.2708, tz: "Asia/Dubai",
    },
    BuiltinCity {
        names: &["mumbai", "bombay"],
        lat: 19.0760, lon: 72.8777, tz: "Asia/Kolkata",
    },
    BuiltinCity {
        names: &["delhi", "new delhi"],
        lat: 28.6139, lon: 77.2090, tz: "Asia/Kolkata",
    },
    BuiltinCity {
        names: &["singapore"],
        lat: 1.3521, lon: 103.8198, tz: "Asia/Singapore",
    },
    BuiltinCity {
        names: &["shanghai"],
        lat: 31.2304, lon: 121.4737, tz: "Asia/Shanghai",
    },
    BuiltinCity {
        names: &["tokyo"],
        lat: 35.6762, lon: 139.6503, tz: "Asia/Tokyo",
    },
    BuiltinCity {
        names: &["sydney"],
        lat: -33.8688, lon: 151.2093, tz: "Australia/Sydney",
    },
    BuiltinCity {
        names: &["auckland"],
        lat: -36.8509, lon: 174.7645, tz: "Pacific/Auckland",
    },
    BuiltinCity {
        names: &["honolulu"],
        lat: 21.3069, lon: -157.8583, tz: "Pacific/Honolulu",
    },
];

/// Compute edit distance between two strings (Levenshtein).
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// Match a query against the built-in dataset: exact name, then substring,
/// then fuzzy (edit distance <= 2).
fn builtin_match(query: &str) -> Option<&'static BuiltinCity> {
    let q = query.to_lowercase();

    for city in BUILTIN_CITIES {
        if city.names.iter().any(|name| *name == q) {
            return Some(city);
        }
    }

    for city in BUILTIN_CITIES {
        if city.names.iter().any(|name| name.contains(&q) || q.contains(name)) {
            return Some(city);
        }
    }

    let mut best: Option<(&BuiltinCity, usize)> = None;
    for city in BUILTIN_CITIES {
        for name in city.names {
            let dist = edit_distance(&q, name);
            if dist <= 2 && (best.is_none() || dist < best.unwrap().1) {
                best = Some((city, dist));
            }
        }
    }
    best.map(|(city, _)| city)
}

// ─── Nominatim geocoder ─────────────────────────────────────────

#[derive(Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
}

/// Geocoder backed by OpenStreetMap Nominatim, single best match per query.
pub struct NominatimGeocoder {
    user_agent: String,
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self {
            user_agent: "Meridian/0.3 (city-time-conversion)".into(),
        }
    }
}

impl Geocoder for NominatimGeocoder {
    fn locate(&self, query: &str) -> Result<Option<Coordinate>, ProviderError> {
        let url = format!(
            "https://nominatim.openstreetmap.org/search?q={}&format=json&limit=1",
            urlencod(query),
        );

        let response = ureq::get(&url)
            .set("User-Agent", &self.user_agent)
            .timeout(REQUEST_TIMEOUT)
            .call()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let top = match results.first() {
            Some(r) => r,
            None => return Ok(None),
        };

        let lat: f64 = top.lat.parse()
            .map_err(|_| ProviderError::InvalidResponse(format!("bad latitude '{}'", top.lat)))?;
        let lon: f64 = top.lon.parse()
            .map_err(|_| ProviderError::InvalidResponse(format!("bad longitude '{}'", top.lon)))?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ProviderError::InvalidResponse(format!(
                "coordinates out of range: {}, {}", lat, lon,
            )));
        }

        Ok(Some(Coordinate { lat, lon }))
    }
}

// ─── timeapi.io zone finder ─────────────────────────────────────

/// Zone finder backed by the timeapi.io coordinate endpoint (free, no key).
pub struct TimeApiZones {
    user_agent: String,
}

impl Default for TimeApiZones {
    fn default() -> Self {
        Self {
            user_agent: "Meridian/0.3".into(),
        }
    }
}

impl ZoneFinder for TimeApiZones {
    fn zone_at(&self, point: Coordinate) -> Result<Option<String>, ProviderError> {
        let url = format!(
            "https://www.timeapi.io/api/timezone/coordinate?latitude={}&longitude={}",
            point.lat, point.lon,
        );

        let response = ureq::get(&url)
            .set("User-Agent", &self.user_agent)
            .timeout(REQUEST_TIMEOUT)
            .call()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let val: serde_json::Value = response
            .into_json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(val.get("timeZone").and_then(|v| v.as_str()).map(|s| s.to_string()))
    }
}

// ─── Offline providers ──────────────────────────────────────────

/// Offline geocoder over the built-in dataset.
pub struct StaticGeocoder;

impl Geocoder for StaticGeocoder {
    fn locate(&self, query: &str) -> Result<Option<Coordinate>, ProviderError> {
        Ok(builtin_match(query).map(|city| Coordinate { lat: city.lat, lon: city.lon }))
    }
}

/// A dataset city within this many degrees on both axes counts as "here".
const NEAR_DEGREES: f64 = 3.0;

/// Offline zone finder: nearest built-in city, then longitude-band estimate.
pub struct StaticZones;

impl ZoneFinder for StaticZones {
    fn zone_at(&self, point: Coordinate) -> Result<Option<String>, ProviderError> {
        let nearest = BUILTIN_CITIES
            .iter()
            .filter(|c| (c.lat - point.lat).abs() <= NEAR_DEGREES && (c.lon - point.lon).abs() <= NEAR_DEGREES)
            .min_by(|a, b| {
                let da = (a.lat - point.lat).powi(2) + (a.lon - point.lon).powi(2);
                let db = (b.lat - point.lat).powi(2) + (b.lon - point.lon).powi(2);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            });

        if let Some(city) = nearest {
            return Ok(Some(city.tz.to_string()));
        }

        Ok(Some(zone_from_longitude(point.lon)))
    }
}

/// Rough longitude-band estimate, mapped to a representative IANA zone.
fn zone_from_longitude(lon: f64) -> String {
    let offset_hours = (lon / 15.0).round() as i32;
    match offset_hours {
        -12..=-10 => "Pacific/Honolulu".into(),
        -9 => "America/Anchorage".into(),
        -8 => "America/Los_Angeles".into(),
        -7 => "America/Denver".into(),
        -6 => "America/Chicago".into(),
        -5 => "America/New_York".into(),
        -4 => "America/Halifax".into(),
        -3 => "America/Sao_Paulo".into(),
        -2..=-1 => "Atlantic/Azores".into(),
        0 => "Europe/London".into(),
        1 => "Europe/Paris".into(),
        2 => "Europe/Helsinki".into(),
        3 => "Europe/Moscow".into(),
        4 => "Asia/Dubai".into(),
        5 => "Asia/Karachi".into(),
        6 => "Asia/Dhaka".into(),
        7 => "Asia/Bangkok".into(),
        8 => "Asia/Shanghai".into(),
        9 => "Asia/Tokyo".into(),
        10 => "Australia/Sydney".into(),
        11 => "Pacific/Noumea".into(),
        12 => "Pacific/Auckland".into(),
        _ => "UTC".into(),
    }
}

// ─── URL encoding (minimal, no extra dep) ───────────────────────

fn urlencod(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ' ' => "%20".to_string(),
            '&' => "%26".to_string(),
            '=' => "%3D".to_string(),
            '+' => "%2B".to_string(),
            ',' => "%2C".to_string(),
            _ if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '~' => {
                c.to_string()
            }
            _ => format!("%{:02X}", c as u32),
        })
        .collect()
}
