//! Threshold resolution and alert classification.
//!
//! Pure decision logic, kept apart from the geometry so the precedence
//! order (route tolerance → session critical → session high → exceeded
//! fallback → no thresholds) is auditable on its own.

use crate::models::{AlertLevel, SessionThreshold};

/// Threshold value reported alongside a result, for display and audit.
///
/// Prefers the route-specific tolerance, then the session's high value,
/// then its critical value. Independent of which branch decides the alert.
pub fn resolve_reported_threshold(
    route_tolerance_nm: Option<f64>,
    session: Option<&SessionThreshold>,
) -> Option<f64> {
    if route_tolerance_nm.is_some() {
        return route_tolerance_nm;
    }
    session.and_then(|st| st.high_nm.or(st.critical_nm))
}

/// Classify one fix's minimum distance against the applicable thresholds.
///
/// Returns the alert level and, when a session-level value decided it, that
/// value. `reported_nm` is the output of [`resolve_reported_threshold`] for
/// the same inputs.
///
/// When a session threshold record exists but the route carries no tolerance,
/// the route-tolerance comparison defaults to an infinite upper bound and the
/// session levels never fire. That matches the historical behavior; it is
/// flagged as a candidate policy bug in DESIGN.md.
pub fn classify(
    distance_nm: f64,
    route_tolerance_nm: Option<f64>,
    session: Option<&SessionThreshold>,
    reported_nm: Option<f64>,
) -> (AlertLevel, Option<f64>) {
    // Guard against negative-zero artifacts from the signed cross-track.
    let distance_nm = distance_nm.max(0.0);

    if let Some(st) = session {
        if distance_nm <= route_tolerance_nm.unwrap_or(f64::INFINITY) {
            return (AlertLevel::None, None);
        }
        if let Some(critical) = st.critical_nm {
            if distance_nm >= critical {
                return (AlertLevel::Critical, Some(critical));
            }
        }
        if let Some(high) = st.high_nm {
            if distance_nm >= high {
                return (AlertLevel::High, Some(high));
            }
        }
        // Route tolerance exceeded but below every session level.
        return (AlertLevel::Exceeded, reported_nm);
    }

    if let Some(threshold) = reported_nm {
        let level = if distance_nm > threshold {
            AlertLevel::Exceeded
        } else {
            AlertLevel::None
        };
        return (level, None);
    }

    (AlertLevel::NoThresholds, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(high: Option<f64>, critical: Option<f64>) -> SessionThreshold {
        SessionThreshold {
            session_id: 1,
            high_nm: high,
            critical_nm: critical,
        }
    }

    #[test]
    fn reported_threshold_prefers_route_tolerance() {
        let st = session(Some(1.0), Some(5.0));
        assert_eq!(
            resolve_reported_threshold(Some(0.5), Some(&st)),
            Some(0.5)
        );
        assert_eq!(resolve_reported_threshold(None, Some(&st)), Some(1.0));
        let critical_only = session(None, Some(5.0));
        assert_eq!(
            resolve_reported_threshold(None, Some(&critical_only)),
            Some(5.0)
        );
        assert_eq!(resolve_reported_threshold(None, None), None);
    }

    #[test]
    fn within_route_tolerance_is_none() {
        let st = session(Some(1.0), Some(5.0));
        let (alert, level) = classify(0.4, Some(0.5), Some(&st), Some(0.5));
        assert_eq!(alert, AlertLevel::None);
        assert_eq!(level, None);
    }

    #[test]
    fn session_high_fires_between_levels() {
        // Distance 2.0 nm: past the 0.5 route tolerance, past high=1.0,
        // below critical=5.0.
        let st = session(Some(1.0), Some(5.0));
        let (alert, level) = classify(2.0, Some(0.5), Some(&st), Some(0.5));
        assert_eq!(alert, AlertLevel::High);
        assert_eq!(level, Some(1.0));
    }

    #[test]
    fn session_critical_outranks_high() {
        let st = session(Some(1.0), Some(5.0));
        let (alert, level) = classify(6.0, Some(0.5), Some(&st), Some(0.5));
        assert_eq!(alert, AlertLevel::Critical);
        assert_eq!(level, Some(5.0));
    }

    #[test]
    fn exceeded_when_below_all_session_levels() {
        let st = session(Some(3.0), Some(5.0));
        let (alert, level) = classify(1.0, Some(0.5), Some(&st), Some(0.5));
        assert_eq!(alert, AlertLevel::Exceeded);
        assert_eq!(level, Some(0.5));
    }

    #[test]
    fn missing_route_tolerance_defaults_to_infinite_bound() {
        // Historical behavior: no route tolerance means the session branch
        // can never get past the `<= infinity` gate.
        let st = session(Some(1.0), Some(5.0));
        let (alert, level) = classify(10.0, None, Some(&st), Some(1.0));
        assert_eq!(alert, AlertLevel::None);
        assert_eq!(level, None);
    }

    #[test]
    fn route_tolerance_alone_compares_directly() {
        let (alert, _) = classify(2.0, Some(0.5), None, Some(0.5));
        assert_eq!(alert, AlertLevel::Exceeded);
        let (alert, _) = classify(0.5, Some(0.5), None, Some(0.5));
        assert_eq!(alert, AlertLevel::None);
    }

    #[test]
    fn nothing_to_compare_is_no_thresholds() {
        let (alert, level) = classify(2.0, None, None, None);
        assert_eq!(alert, AlertLevel::NoThresholds);
        assert_eq!(level, None);
    }

    #[test]
    fn negative_distance_clamps_to_zero() {
        let st = session(Some(1.0), None);
        let (alert, _) = classify(-0.0001, Some(0.5), Some(&st), Some(0.5));
        assert_eq!(alert, AlertLevel::None);
    }

    #[test]
    fn raising_route_tolerance_never_raises_severity() {
        let st = session(Some(1.0), Some(5.0));
        let distance = 2.0;
        let tolerances = [0.1, 0.5, 1.0, 1.9, 2.0, 2.5, 10.0];
        let mut last = u8::MAX;
        for tol in tolerances {
            let reported = resolve_reported_threshold(Some(tol), Some(&st));
            let (alert, _) = classify(distance, Some(tol), Some(&st), reported);
            assert!(
                alert.severity() <= last,
                "severity rose when tolerance grew to {tol}"
            );
            last = alert.severity();
        }
    }
}
