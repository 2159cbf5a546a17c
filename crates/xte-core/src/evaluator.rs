//! Batch evaluation of ownship fixes against session routes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alert::{classify, resolve_reported_threshold};
use crate::models::{Coordinate, Evaluation, OwnshipFix, Route, SessionThreshold};
use crate::spatial::{haversine_distance, meters_to_nm, segment_distance_m};

/// Per-point evaluation failure. Never aborts the batch.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluateError {
    /// The fix's session has no evaluable routes.
    #[error("no routes for session {session_id}")]
    NoRoutes { session_id: i64 },
    /// The fix's coordinate is outside the valid lat/lon range.
    #[error("invalid coordinate lat={lat} lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Nearest route found for a fix, before classification.
#[derive(Debug, Clone)]
pub struct NearestRoute<'a> {
    pub route: &'a Route,
    /// Index of the winning segment's start vertex within the route.
    pub segment: usize,
    pub meters: f64,
    pub nm: f64,
}

/// Session-keyed lookup tables, built once per evaluation run.
#[derive(Debug, Default)]
pub struct SessionIndex {
    routes: HashMap<i64, Vec<Route>>,
    thresholds: HashMap<i64, SessionThreshold>,
}

impl SessionIndex {
    /// Group flat input lists by session id, preserving input order within
    /// each session. A later duplicate threshold for a session is ignored.
    pub fn new(routes: Vec<Route>, thresholds: Vec<SessionThreshold>) -> Self {
        let mut by_session: HashMap<i64, Vec<Route>> = HashMap::new();
        for route in routes {
            by_session.entry(route.session_id).or_default().push(route);
        }

        let mut threshold_map: HashMap<i64, SessionThreshold> = HashMap::new();
        for st in thresholds {
            if threshold_map.contains_key(&st.session_id) {
                tracing::warn!(
                    session_id = st.session_id,
                    "duplicate session threshold ignored"
                );
                continue;
            }
            threshold_map.insert(st.session_id, st);
        }

        Self {
            routes: by_session,
            thresholds: threshold_map,
        }
    }

    pub fn routes_for(&self, session_id: i64) -> &[Route] {
        self.routes
            .get(&session_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn threshold_for(&self, session_id: i64) -> Option<&SessionThreshold> {
        self.thresholds.get(&session_id)
    }
}

/// Find the minimum-distance route and segment for a point.
///
/// Strict `<` keeps the first route/segment encountered on ties. Zero-length
/// segments are skipped; routes with fewer than two vertices contribute
/// nothing. Errors only when no segment at all was evaluable.
pub fn nearest_route<'a>(
    position: Coordinate,
    session_id: i64,
    routes: &'a [Route],
) -> Result<NearestRoute<'a>, EvaluateError> {
    let mut best: Option<NearestRoute<'a>> = None;

    for route in routes {
        for (i, pair) in route.vertices.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            if haversine_distance(a, b) == 0.0 {
                tracing::debug!(route_id = %route.id, segment = i, "skipping zero-length segment");
                continue;
            }
            let meters = segment_distance_m(position, a, b);
            let closer = best.as_ref().map(|nr| meters < nr.meters).unwrap_or(true);
            if closer {
                best = Some(NearestRoute {
                    route,
                    segment: i,
                    meters,
                    nm: meters_to_nm(meters),
                });
            }
        }
    }

    best.ok_or(EvaluateError::NoRoutes { session_id })
}

/// Outcome for one input fix, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointReport {
    pub fix_id: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Ok(Evaluation),
    Err { error: EvaluateError },
}

/// Synchronous evaluator over an immutable session snapshot.
pub struct Evaluator {
    index: SessionIndex,
}

impl Evaluator {
    pub fn new(index: SessionIndex) -> Self {
        Self { index }
    }

    /// Evaluate a single fix. Pure with respect to the snapshot.
    pub fn evaluate(&self, fix: &OwnshipFix) -> Result<Evaluation, EvaluateError> {
        if !fix.position.is_valid() {
            return Err(EvaluateError::InvalidCoordinate {
                lat: fix.position.lat,
                lon: fix.position.lon,
            });
        }

        let routes = self.index.routes_for(fix.session_id);
        let nearest = nearest_route(fix.position, fix.session_id, routes)?;

        let session_threshold = self.index.threshold_for(fix.session_id);
        let reported = resolve_reported_threshold(nearest.route.max_xte_nm, session_threshold);
        let (alert, session_level_match) = classify(
            nearest.nm,
            nearest.route.max_xte_nm,
            session_threshold,
            reported,
        );

        Ok(Evaluation {
            fix: fix.clone(),
            route_id: Some(nearest.route.id.clone()),
            distance_nm: round4(nearest.nm),
            threshold_nm: reported,
            alert,
            session_level_match,
        })
    }

    /// Evaluate a batch, producing one report per fix in input order.
    /// Per-point errors are recorded, never propagated.
    pub fn evaluate_batch(&self, fixes: &[OwnshipFix]) -> Vec<PointReport> {
        fixes
            .iter()
            .map(|fix| {
                let outcome = match self.evaluate(fix) {
                    Ok(eval) => Outcome::Ok(eval),
                    Err(error) => {
                        tracing::debug!(fix_id = %fix.id, %error, "fix not evaluable");
                        Outcome::Err { error }
                    }
                };
                PointReport {
                    fix_id: fix.id.clone(),
                    outcome,
                }
            })
            .collect()
    }
}

/// Round only for the reported distance field; comparisons upstream use the
/// unrounded value.
fn round4(nm: f64) -> f64 {
    (nm * 10_000.0).round() / 10_000.0
}
