//! # Surface Matcher
//!
//! Reconciles road-surface classifications between two independently
//! maintained geospatial datasets: a road-network graph (ways with names,
//! route refs, and coordinate sequences) and a collection of shape records
//! carrying authoritative surface codes.
//!
//! The two datasets spell the same road differently — abbreviations,
//! directional prefixes, route-number formats — so the core problem is fuzzy
//! identity resolution rather than geometry intersection:
//!
//! - [`names::name_variants`] expands a way's name into the set of plausible
//!   alternate spellings used by the surface dataset.
//! - [`match_way`] scans the shape records for name matches, ranks them by
//!   bounding-box proximity, and classifies the result as matched, mixed
//!   (conflicting surfaces among near-tied candidates), or not found.
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel batch matching with rayon
//! - **`serde`** - Serde derives on the data model and match results
//!
//! ## Quick Start
//!
//! ```rust
//! use surface_matcher::{
//!     GeoPoint, MatchConfig, MatchOutcome, PlanarBounds, ShapeRecord, Way, match_way,
//! };
//!
//! let way = Way::new(
//!     101,
//!     "Maple Street",
//!     vec![GeoPoint::new(44.00, -72.61), GeoPoint::new(44.01, -72.60)],
//! );
//!
//! let shapes = vec![ShapeRecord {
//!     route_name: String::new(),
//!     road_name: "MAPLE ST".to_string(),
//!     surface_code: 1,
//!     bounds: PlanarBounds {
//!         min_x: -72.61,
//!         min_y: 44.00,
//!         max_x: -72.60,
//!         max_y: 44.01,
//!     },
//! }];
//!
//! // Projection is supplied by the caller; identity works for the example.
//! let result = match_way(&way, &shapes, |lat, lon| (lon, lat), &MatchConfig::default())
//!     .expect("way has enough points");
//!
//! assert_eq!(result.outcome(), MatchOutcome::Matched);
//! assert_eq!(result.surface_code, Some(1));
//! ```

use thiserror::Error;

pub mod names;
pub use names::{name_variants, RegionalRules};

pub mod matcher;
pub use matcher::{
    match_way, match_ways, CandidateReport, MatchOutcome, MatchTally, SurfaceMatch,
};

#[cfg(feature = "parallel")]
pub use matcher::match_ways_parallel;

// ============================================================================
// Errors
// ============================================================================

/// Errors produced while matching a way against the surface dataset.
///
/// The matcher is a pure decision function over already-validated in-memory
/// records, so the taxonomy is deliberately small: a failure means the input
/// shape was invalid, never a transient condition. The caller decides whether
/// to skip the way or abort the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// A way needs at least two reference points to have a bounding box.
    #[error("way {id} has {points} reference point(s); at least 2 are required")]
    InvalidWay { id: i64, points: usize },
}

pub type Result<T> = std::result::Result<T, MatchError>;

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use surface_matcher::GeoPoint;
/// let point = GeoPoint::new(44.2601, -72.5754); // Montpelier
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new geographic point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Geographic bounding box of a way's reference points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Create bounds from geographic points. Returns `None` for an empty slice.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lon = f64::MAX;
        let mut max_lon = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lon = min_lon.min(p.longitude);
            max_lon = max_lon.max(p.longitude);
        }

        Some(Self { min_lat, max_lat, min_lon, max_lon })
    }

    /// Project the two corners into planar coordinates.
    ///
    /// `project` maps `(latitude, longitude)` to planar `(x, y)` and is
    /// assumed monotonic over the box, so projecting the corners is enough.
    pub fn project<P>(&self, project: P) -> PlanarBounds
    where
        P: Fn(f64, f64) -> (f64, f64),
    {
        let (min_x, min_y) = project(self.min_lat, self.min_lon);
        let (max_x, max_y) = project(self.max_lat, self.max_lon);
        PlanarBounds { min_x, min_y, max_x, max_y }
    }
}

/// Bounding box in planar coordinates (the shape dataset's native units).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanarBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl PlanarBounds {
    /// Sum of absolute per-edge differences between two boxes.
    ///
    /// This is the matcher's sole distance metric. It is intentionally not
    /// normalized for box size, matching the source datasets' convention.
    pub fn difference(&self, other: &PlanarBounds) -> f64 {
        (self.min_x - other.min_x).abs()
            + (self.min_y - other.min_y).abs()
            + (self.max_x - other.max_x).abs()
            + (self.max_y - other.max_y).abs()
    }
}

/// A road segment from the network dataset.
///
/// `ref_codes` is the raw semicolon-delimited route-ref list ("US 7;VT 9");
/// the tiger fields are the alternate official name components some ways
/// carry. All three are optional and treated as empty when absent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Way {
    pub id: i64,
    pub name: String,
    pub ref_codes: Option<String>,
    pub tiger_name_base: Option<String>,
    pub tiger_name_type: Option<String>,
    /// Ordered reference points, at least 2 for a valid way.
    pub points: Vec<GeoPoint>,
}

impl Way {
    /// Create a way with no ref codes or tiger name.
    pub fn new(id: i64, name: &str, points: Vec<GeoPoint>) -> Self {
        Self {
            id,
            name: name.to_string(),
            ref_codes: None,
            tiger_name_base: None,
            tiger_name_type: None,
            points,
        }
    }

    /// The tiger base/type pair, if a base is present. A missing type is
    /// treated as empty rather than as an error.
    pub fn tiger_name(&self) -> Option<(&str, &str)> {
        let base = self.tiger_name_base.as_deref()?;
        Some((base, self.tiger_name_type.as_deref().unwrap_or("")))
    }
}

/// An authoritative record from the surface dataset.
///
/// Bounds are precomputed by the data source, already in planar units.
/// Records are immutable for the lifetime of a run and may be shared across
/// concurrent matcher invocations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeRecord {
    pub route_name: String,
    pub road_name: String,
    /// Surface classification 0-9; see [`surface_description`]. Values
    /// outside that range pass through the matcher unvalidated.
    pub surface_code: u8,
    pub bounds: PlanarBounds,
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the candidate matcher and the name generator.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Candidates with a bbox difference at or above this are discarded as
    /// geographically implausible despite the name match.
    /// Default: 10000.0 planar units
    pub bbox_gate: f64,

    /// Best candidates below this difference are trusted; at or above it the
    /// match is reported without a surface. Also caps the conflict cutoff.
    /// Default: 8000.0 planar units
    pub confidence_threshold: f64,

    /// Candidates within this multiple of the best difference take part in
    /// the conflict check; anything further out is ignored.
    /// Default: 2.0
    pub conflict_ratio: f64,

    /// Region-specific route shorthand used by the name generator.
    pub rules: RegionalRules,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            bbox_gate: 10000.0,
            confidence_threshold: 8000.0,
            conflict_ratio: 2.0,
            rules: RegionalRules::default(),
        }
    }
}

// ============================================================================
// Surface Codes
// ============================================================================

/// Human-readable label for a surface code.
///
/// Codes 0, 4, 7 and 8 are undefined in the source data; unknown values
/// outside 0-9 are labelled the same way.
pub fn surface_description(code: u8) -> &'static str {
    match code {
        1 => "Hard surface (pavement)",
        2 => "Gravel",
        3 => "Soil or graded and drained earth",
        5 => "Unimproved/Primitive",
        6 => "Impassable or untravelled",
        9 => "Unknown surface type",
        _ => "undefined",
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(44.26, -72.57).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_bounds_from_points() {
        let points = vec![
            GeoPoint::new(44.01, -72.60),
            GeoPoint::new(44.00, -72.62),
            GeoPoint::new(44.03, -72.61),
        ];
        let bounds = Bounds::from_points(&points).unwrap();
        assert_eq!(bounds.min_lat, 44.00);
        assert_eq!(bounds.max_lat, 44.03);
        assert_eq!(bounds.min_lon, -72.62);
        assert_eq!(bounds.max_lon, -72.60);
    }

    #[test]
    fn test_bounds_from_empty_slice() {
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_bounds_projection() {
        let bounds = Bounds { min_lat: 44.0, max_lat: 44.5, min_lon: -72.6, max_lon: -72.1 };
        // Scale degrees by 10 to fake a planar grid
        let planar = bounds.project(|lat, lon| (lon * 10.0, lat * 10.0));
        assert_eq!(planar.min_x, -726.0);
        assert_eq!(planar.min_y, 440.0);
        assert_eq!(planar.max_x, -721.0);
        assert_eq!(planar.max_y, 445.0);
    }

    #[test]
    fn test_planar_difference() {
        let a = PlanarBounds { min_x: 0.0, min_y: 0.0, max_x: 10.0, max_y: 10.0 };
        let b = PlanarBounds { min_x: 1.0, min_y: -2.0, max_x: 13.0, max_y: 10.0 };
        assert_eq!(a.difference(&b), 6.0);
        assert_eq!(b.difference(&a), 6.0);
        assert_eq!(a.difference(&a), 0.0);
    }

    #[test]
    fn test_surface_descriptions() {
        assert_eq!(surface_description(1), "Hard surface (pavement)");
        assert_eq!(surface_description(2), "Gravel");
        assert_eq!(surface_description(0), "undefined");
        assert_eq!(surface_description(7), "undefined");
        // Out-of-range codes are not an error
        assert_eq!(surface_description(42), "undefined");
    }

    #[test]
    fn test_tiger_name_pair() {
        let mut way = Way::new(1, "Stage Rd", vec![]);
        assert_eq!(way.tiger_name(), None);
        way.tiger_name_base = Some("Stage".to_string());
        assert_eq!(way.tiger_name(), Some(("Stage", "")));
        way.tiger_name_type = Some("Rd".to_string());
        assert_eq!(way.tiger_name(), Some(("Stage", "Rd")));
    }
}
