//! Core data models for cross-track evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether the coordinate lies in the valid lat/lon range.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// An assigned navigational route: an ordered polyline of vertices.
///
/// A route needs at least 2 vertices to be evaluable; shorter routes
/// contribute nothing to the session's candidate set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub session_id: i64,
    pub vertices: Vec<Coordinate>,
    /// Route-specific cross-track tolerance in nautical miles.
    #[serde(default)]
    pub max_xte_nm: Option<f64>,
}

/// Per-session alert thresholds in nautical miles. At most one per session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionThreshold {
    pub session_id: i64,
    #[serde(default)]
    pub high_nm: Option<f64>,
    #[serde(default)]
    pub critical_nm: Option<f64>,
}

/// One ownship fix to validate against its session's routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnshipFix {
    pub id: String,
    pub session_id: i64,
    pub position: Coordinate,
    /// Carried through to the result; not used by the geometry.
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Alert classification for a single evaluated fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// No route tolerance and no session thresholds to compare against.
    NoThresholds,
    /// Within tolerance.
    None,
    /// Route tolerance exceeded but below any session level.
    Exceeded,
    High,
    Critical,
}

impl AlertLevel {
    /// Severity ordering: none < exceeded < high < critical.
    ///
    /// `NoThresholds` ranks with `None`; it means nothing fired, not that
    /// nothing could have.
    pub fn severity(&self) -> u8 {
        match self {
            AlertLevel::NoThresholds | AlertLevel::None => 0,
            AlertLevel::Exceeded => 1,
            AlertLevel::High => 2,
            AlertLevel::Critical => 3,
        }
    }

    pub fn is_alerting(&self) -> bool {
        self.severity() > 0
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AlertLevel::NoThresholds => "no_thresholds",
            AlertLevel::None => "none",
            AlertLevel::Exceeded => "exceeded",
            AlertLevel::High => "high",
            AlertLevel::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// Result of evaluating one fix against its session's routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub fix: OwnshipFix,
    /// Nearest route, when one was found.
    pub route_id: Option<String>,
    /// Minimum distance in nautical miles, rounded to 4 decimals.
    pub distance_nm: f64,
    /// Reported threshold: route tolerance, else session high, else critical.
    pub threshold_nm: Option<f64>,
    pub alert: AlertLevel,
    /// Session-level value that decided the alert, when one did.
    pub session_level_match: Option<f64>,
}
