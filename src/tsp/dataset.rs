//! Point-set provider: generation, CSV/JSON import and normalization.
//!
//! Everything here produces points in the unit square; the engine never
//! sees raw coordinates.

use rand::Rng;
use rand_distr::StandardNormal;

use super::point::Point;
use crate::error::{Error, Result};

/// Smallest point set that forms a meaningful tour.
pub const MIN_POINT_COUNT: usize = 3;

const CLUSTER_COUNT: usize = 3;

/// Spatial layout for generated point sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PointLayout {
    /// Uniform over `[0.05, 0.95]²`.
    Random,
    /// Gaussian blobs around three random centres.
    #[default]
    Clustered,
}

/// An imported coordinate pair in arbitrary units.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawPoint {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<String>,
    pub x: f64,
    pub y: f64,
}

impl RawPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { id: None, x, y }
    }
}

/// Generates `count` points with ids `c1..cN`.
pub fn generate_points<R: Rng>(count: usize, layout: PointLayout, rng: &mut R) -> Vec<Point> {
    match layout {
        PointLayout::Random => (0..count)
            .map(|i| {
                let x = rng.random_range(0.05..0.95);
                let y = rng.random_range(0.05..0.95);
                Point::new(format!("c{}", i + 1), x, y)
            })
            .collect(),
        PointLayout::Clustered => {
            let centers: Vec<(f64, f64)> = (0..CLUSTER_COUNT)
                .map(|_| (rng.random_range(0.15..0.85), rng.random_range(0.15..0.85)))
                .collect();
            (0..count)
                .map(|i| {
                    let (cx, cy) = centers[i % CLUSTER_COUNT];
                    let spread = rng.random_range(0.08..0.13);
                    let dx: f64 = rng.sample(StandardNormal);
                    let dy: f64 = rng.sample(StandardNormal);
                    let x = (cx + dx * spread).clamp(0.04, 0.96);
                    let y = (cy + dy * spread).clamp(0.04, 0.96);
                    Point::new(format!("c{}", i + 1), x, y)
                })
                .collect()
        }
    }
}

/// Rescales raw coordinates into the drawable band `[0.06, 0.94]²`.
///
/// A degenerate axis (all points sharing one coordinate) is treated as
/// having unit range so it maps to the lower edge instead of dividing by
/// zero.
pub fn normalize_points(raw: &[RawPoint]) -> Vec<Point> {
    if raw.is_empty() {
        return Vec::new();
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in raw {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    let range_x = if max_x - min_x == 0.0 { 1.0 } else { max_x - min_x };
    let range_y = if max_y - min_y == 0.0 { 1.0 } else { max_y - min_y };

    raw.iter()
        .enumerate()
        .map(|(i, p)| {
            let x = 0.06 + (p.x - min_x) / range_x * 0.88;
            let y = 0.06 + (p.y - min_y) / range_y * 0.88;
            let id = p.id.clone().unwrap_or_else(|| format!("c{}", i + 1));
            Point::new(id, x.clamp(0.04, 0.96), y.clamp(0.04, 0.96))
        })
        .collect()
}

/// Parses `x,y` rows (`,`, `;` or tab separated) and normalizes them.
///
/// Rows whose first two fields are not finite numbers are skipped, which
/// also drops header lines.
///
/// # Errors
/// Returns [`Error::Parse`] when fewer than [`MIN_POINT_COUNT`] rows
/// survive.
pub fn parse_csv(text: &str) -> Result<Vec<Point>> {
    let raw: Vec<RawPoint> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let mut fields = line.split([',', ';', '\t']).map(str::trim);
            let x = fields.next()?.parse::<f64>().ok()?;
            let y = fields.next()?.parse::<f64>().ok()?;
            (x.is_finite() && y.is_finite()).then(|| RawPoint::new(x, y))
        })
        .collect();

    if raw.len() < MIN_POINT_COUNT {
        return Err(Error::parse(format!(
            "expected at least {MIN_POINT_COUNT} coordinate rows, found {}",
            raw.len()
        )));
    }
    Ok(normalize_points(&raw))
}

/// Parses a JSON array of `[x, y]` pairs and/or `{id?, x, y}` objects and
/// normalizes it.
///
/// Entries of any other shape, or whose coordinates are not finite
/// numbers, are skipped. Pairs may carry extra trailing values.
///
/// # Errors
/// Returns [`Error::Parse`] for malformed JSON, a top-level value that is
/// not an array, or fewer than [`MIN_POINT_COUNT`] usable entries.
#[cfg(feature = "serde")]
pub fn parse_json(text: &str) -> Result<Vec<Point>> {
    use serde_json::Value;

    let value: Value =
        serde_json::from_str(text).map_err(|e| Error::parse(format!("invalid JSON: {e}")))?;
    let Value::Array(entries) = value else {
        return Err(Error::parse("expected a JSON array of points"));
    };

    let raw: Vec<RawPoint> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Array(xy) if xy.len() >= 2 => {
                Some(RawPoint::new(xy[0].as_f64()?, xy[1].as_f64()?))
            }
            Value::Object(_) => serde_json::from_value::<RawPoint>(entry).ok(),
            _ => None,
        })
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();

    if raw.len() < MIN_POINT_COUNT {
        return Err(Error::parse(format!(
            "expected at least {MIN_POINT_COUNT} points, found {}",
            raw.len()
        )));
    }
    Ok(normalize_points(&raw))
}

/// Checks that a point set can be handed to the engine.
pub fn validate_point_set(points: &[Point]) -> Result<()> {
    if points.len() < MIN_POINT_COUNT {
        return Err(Error::invalid_input(format!(
            "need at least {MIN_POINT_COUNT} points, got {}",
            points.len()
        )));
    }
    if let Some(bad) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(Error::invalid_input(format!(
            "point {} has non-finite coordinates",
            bad.id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_random_in_band() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = generate_points(200, PointLayout::Random, &mut rng);
        assert_eq!(points.len(), 200);
        assert_eq!(points[0].id, "c1");
        assert_eq!(points[199].id, "c200");
        for p in &points {
            assert!((0.05..0.95).contains(&p.x) && (0.05..0.95).contains(&p.y));
        }
    }

    #[test]
    fn test_generate_clustered_clamped() {
        let mut rng = StdRng::seed_from_u64(2);
        let points = generate_points(300, PointLayout::Clustered, &mut rng);
        assert_eq!(points.len(), 300);
        for p in &points {
            assert!((0.04..=0.96).contains(&p.x) && (0.04..=0.96).contains(&p.y));
        }
    }

    #[test]
    fn test_normalize_extremes() {
        let raw = vec![
            RawPoint::new(-10.0, 5.0),
            RawPoint::new(30.0, 5.0),
            RawPoint {
                id: Some("hq".into()),
                x: 10.0,
                y: 5.0,
            },
        ];
        let points = normalize_points(&raw);
        assert!((points[0].x - 0.06).abs() < 1e-12);
        assert!((points[1].x - 0.94).abs() < 1e-12);
        assert!((points[2].x - 0.5).abs() < 1e-12);
        // Flat y axis collapses onto the lower edge.
        assert!(points.iter().all(|p| (p.y - 0.06).abs() < 1e-12));
        assert_eq!(points[0].id, "c1");
        assert_eq!(points[2].id, "hq");
    }

    #[test]
    fn test_parse_csv_mixed_separators() {
        let text = "x,y\n0,0\n10;0\n10\t10\n\nbad,row\n0 , 10\n";
        let points = parse_csv(text).expect("four valid rows");
        assert_eq!(points.len(), 4);
        assert!((points[2].x - 0.94).abs() < 1e-12);
        assert!((points[2].y - 0.94).abs() < 1e-12);
    }

    #[test]
    fn test_parse_csv_too_few_rows() {
        assert!(matches!(parse_csv("1,2\n3,4\n"), Err(Error::Parse(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parse_json_pairs() {
        let points = parse_json("[[0, 0], [10, 0], [10, 10], [0, 10, 99]]").expect("four pairs");
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].id, "c1");
        assert!((points[2].x - 0.94).abs() < 1e-12);
        assert!((points[2].y - 0.94).abs() < 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parse_json_objects_keep_ids() {
        let text = r#"[{"id": "depot", "x": 0, "y": 0}, {"x": 4, "y": 0}, {"id": "far", "x": 4, "y": 2}]"#;
        let points = parse_json(text).expect("three objects");
        assert_eq!(points[0].id, "depot");
        assert_eq!(points[1].id, "c2");
        assert_eq!(points[2].id, "far");
        assert!((points[2].y - 0.94).abs() < 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parse_json_skips_unusable_entries() {
        let text = r#"[
            [0, 0],
            {"id": "b", "x": 1, "y": 1},
            [2],
            ["p", 1, 2],
            {"x": "3", "y": 3},
            {"y": 4},
            null,
            7,
            [2, 0]
        ]"#;
        let points = parse_json(text).expect("three usable entries");
        let ids: Vec<&str> = points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "b", "c3"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parse_json_rejects_bad_input() {
        assert!(matches!(parse_json("[[0, 0], [1, 1]]"), Err(Error::Parse(_))));
        assert!(matches!(parse_json(r#"{"x": 1, "y": 2}"#), Err(Error::Parse(_))));
        assert!(matches!(parse_json("[[0, 0],"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_validate_point_set() {
        let mut points = vec![
            Point::new("a", 0.1, 0.1),
            Point::new("b", 0.2, 0.2),
        ];
        assert!(validate_point_set(&points).is_err());
        points.push(Point::new("c", 0.3, 0.3));
        assert!(validate_point_set(&points).is_ok());
        points.push(Point::new("d", f64::NAN, 0.3));
        assert!(validate_point_set(&points).is_err());
    }
}
