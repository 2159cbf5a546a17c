//! Cross-track deviation evaluation for navigational sessions.
//!
//! Evaluates ownship fixes against their session's assigned routes using
//! spherical cross-track geometry, then classifies each fix against route
//! and session tolerances.

pub mod alert;
pub mod evaluator;
pub mod models;
pub mod spatial;

pub use alert::{classify, resolve_reported_threshold};
pub use evaluator::{
    nearest_route, EvaluateError, Evaluator, NearestRoute, Outcome, PointReport, SessionIndex,
};
pub use models::{
    AlertLevel, Coordinate, Evaluation, OwnshipFix, Route, SessionThreshold,
};
pub use spatial::{
    clamp_unit, haversine_distance, initial_bearing, meters_to_nm, segment_distance_m,
    EARTH_RADIUS_M, NM_IN_METERS,
};
