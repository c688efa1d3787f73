//! Meridian — convert a moment in one city's local time to another's.
//!
//! The pipeline: a free-text city name is geocoded to coordinates, the
//! coordinates are mapped to an IANA timezone, and the requested instant is
//! re-expressed under the destination zone's rules. Exposed as a one-shot
//! CLI and a small HTTP API.

pub mod clock;
pub mod convert;
pub mod location;
pub mod server;
