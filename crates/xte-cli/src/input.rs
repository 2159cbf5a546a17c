//! Loading of the sessions JSON export.
//!
//! The file is an array of session responses; each element may carry a
//! `data` object with per-session arrays. Arrays are concatenated across
//! elements, then converted into core model types.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use xte_core::{Coordinate, OwnshipFix, Route, SessionThreshold};

use crate::wkt::parse_linestring;

#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(default)]
    data: Option<SessionData>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionData {
    #[serde(default)]
    session_routes: Vec<RouteRow>,
    #[serde(default)]
    alert_thresholds: Vec<ThresholdRow>,
    #[serde(default)]
    session_ownship: Vec<OwnshipRow>,
}

#[derive(Debug, Deserialize)]
struct RouteRow {
    id: i64,
    session_id: i64,
    route_line: String,
    #[serde(default)]
    max_xte_threshold_nm: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ThresholdRow {
    session_id: i64,
    #[serde(default)]
    xte_high_nm: Option<f64>,
    #[serde(default)]
    xte_critical_nm: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwnshipRow {
    id: i64,
    session_id: i64,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    recorded_at: Option<DateTime<Utc>>,
}

/// Session data converted into core model types.
#[derive(Debug, Default)]
pub struct SessionsFile {
    pub routes: Vec<Route>,
    pub thresholds: Vec<SessionThreshold>,
    pub ownship: Vec<OwnshipFix>,
}

/// Load and combine a sessions export. Null response elements and elements
/// without `data` are skipped; routes whose WKT fails to parse are dropped
/// with a warning; a malformed file is a hard error.
pub fn load_sessions(path: &Path) -> Result<SessionsFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading sessions file {}", path.display()))?;
    let responses: Vec<Option<SessionResponse>> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing sessions file {}", path.display()))?;

    let mut out = SessionsFile::default();

    for response in responses.into_iter().flatten() {
        let Some(data) = response.data else {
            continue;
        };

        for row in data.session_routes {
            let vertices = match parse_linestring(&row.route_line) {
                Ok(vertices) => vertices,
                Err(err) => {
                    tracing::warn!(route_id = row.id, %err, "dropping route with bad geometry");
                    continue;
                }
            };
            out.routes.push(Route {
                id: row.id.to_string(),
                session_id: row.session_id,
                vertices,
                max_xte_nm: row.max_xte_threshold_nm,
            });
        }

        for row in data.alert_thresholds {
            out.thresholds.push(SessionThreshold {
                session_id: row.session_id,
                high_nm: row.xte_high_nm,
                critical_nm: row.xte_critical_nm,
            });
        }

        for row in data.session_ownship {
            out.ownship.push(OwnshipFix {
                id: format!("own-{}", row.id),
                session_id: row.session_id,
                position: Coordinate::new(row.latitude, row.longitude),
                recorded_at: row.recorded_at,
            });
        }
    }

    Ok(out)
}

/// Take the first `limit` ownship rows. Exports with no ownship rows at all
/// fall back to the full synthetic sample set, uncapped.
pub fn select_fixes(mut ownship: Vec<OwnshipFix>, limit: usize) -> Vec<OwnshipFix> {
    if ownship.is_empty() {
        tracing::warn!("no ownship rows in export, using synthetic sample fixes");
        return synthetic_fixes();
    }
    ownship.truncate(limit);
    ownship
}

/// Fallback fixes for exports that carry no ownship rows.
fn synthetic_fixes() -> Vec<OwnshipFix> {
    vec![
        OwnshipFix {
            id: "own-1".to_string(),
            session_id: 1,
            position: Coordinate::new(27.7172, 85.324),
            recorded_at: None,
        },
        OwnshipFix {
            id: "own-2".to_string(),
            session_id: 1,
            position: Coordinate::new(12.95, 135.5),
            recorded_at: None,
        },
        OwnshipFix {
            id: "own-3".to_string(),
            session_id: 2,
            position: Coordinate::new(43.5, 6.0),
            recorded_at: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("xte-sessions-{name}-{}.json", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn fix(id: &str, session_id: i64) -> OwnshipFix {
        OwnshipFix {
            id: id.to_string(),
            session_id,
            position: Coordinate::new(0.0, 0.0),
            recorded_at: None,
        }
    }

    #[test]
    fn combines_arrays_and_drops_bad_geometry() {
        let path = write_temp(
            "combine",
            r#"[
                {"data": {
                    "session_routes": [
                        {"id": 1, "session_id": 1, "route_line": "LINESTRING(0 0, 1 0)", "max_xte_threshold_nm": 0.5},
                        {"id": 2, "session_id": 1, "route_line": "LINESTRING(garbage)"}
                    ],
                    "alert_thresholds": [{"session_id": 1, "xte_high_nm": 1.0, "xte_critical_nm": 5.0}],
                    "session_ownship": [{"id": 9, "session_id": 1, "latitude": 0.1, "longitude": 0.5}]
                }},
                {},
                {"data": {"session_ownship": [{"id": 10, "session_id": 2, "latitude": 43.5, "longitude": 6.0}]}}
            ]"#,
        );

        let sessions = load_sessions(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(sessions.routes.len(), 1);
        assert_eq!(sessions.routes[0].id, "1");
        assert_eq!(sessions.routes[0].max_xte_nm, Some(0.5));
        assert_eq!(sessions.routes[0].vertices.len(), 2);
        assert_eq!(sessions.thresholds.len(), 1);
        assert_eq!(sessions.ownship.len(), 2);
        assert_eq!(sessions.ownship[0].id, "own-9");
        assert_eq!(sessions.ownship[1].session_id, 2);
    }

    #[test]
    fn null_elements_are_skipped() {
        let path = write_temp(
            "null-element",
            r#"[
                null,
                {"data": {"session_ownship": [{"id": 9, "session_id": 1, "latitude": 0.1, "longitude": 0.5}]}},
                null
            ]"#,
        );

        let sessions = load_sessions(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(sessions.ownship.len(), 1);
        assert_eq!(sessions.ownship[0].id, "own-9");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_sessions(Path::new("/nonexistent/sessions.json")).is_err());
    }

    #[test]
    fn select_fixes_caps_file_rows() {
        let rows = vec![fix("own-1", 1), fix("own-2", 1), fix("own-3", 2)];
        let selected = select_fixes(rows, 2);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].id, "own-1");
        assert_eq!(selected[1].id, "own-2");
    }

    #[test]
    fn select_fixes_falls_back_to_full_synthetic_set() {
        // The cap applies to file rows only; the built-in samples are
        // always emitted whole.
        let selected = select_fixes(vec![], 1);
        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].id, "own-1");
        assert_eq!(selected[2].session_id, 2);
    }
}
