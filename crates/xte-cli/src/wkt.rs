//! Minimal WKT extraction for the route geometry the sessions export uses.
//!
//! WKT stores coordinates lon-first; [`Coordinate`] is lat/lon.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use xte_core::Coordinate;

static LINESTRING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)LINESTRING\s*\((.+)\)").expect("valid regex"));

#[derive(Debug, Error, PartialEq)]
pub enum WktError {
    #[error("invalid LINESTRING WKT: {0}")]
    InvalidLineString(String),
}

/// Parse `LINESTRING(lon lat, lon lat, ...)` into an ordered vertex list.
pub fn parse_linestring(wkt: &str) -> Result<Vec<Coordinate>, WktError> {
    let caps = LINESTRING_RE
        .captures(wkt)
        .ok_or_else(|| WktError::InvalidLineString(wkt.to_string()))?;

    caps[1]
        .split(',')
        .map(|pair| {
            let mut parts = pair.split_whitespace();
            let lon = parts.next().and_then(|s| s.parse::<f64>().ok());
            let lat = parts.next().and_then(|s| s.parse::<f64>().ok());
            match (lon, lat) {
                (Some(lon), Some(lat)) => Ok(Coordinate::new(lat, lon)),
                _ => Err(WktError::InvalidLineString(wkt.to_string())),
            }
        })
        .collect()
}
