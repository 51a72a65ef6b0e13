//! Candidate matching and surface classification.
//!
//! For each way, the matcher expands the way's name into its variant set,
//! scans every shape record for an exact name or route match, ranks the
//! survivors by bounding-box proximity, and classifies the outcome:
//!
//! 1. A shape record is a candidate iff its road name or route name is in
//!    the way's variant set.
//! 2. Candidates whose bbox difference reaches the gate (10000 planar units)
//!    are discarded as geographically implausible despite the name match.
//! 3. The best remaining candidate is trusted when its difference is below
//!    the confidence threshold (8000).
//! 4. Any candidate within `min(2 × best, 8000)` carrying a different
//!    surface downgrades the result to a mixed match; candidates outside
//!    that cutoff never affect the decision.
//!
//! The scan is a deliberate O(W × S) pass with no spatial index: datasets
//! are batch-sized (thousands, not millions) and a full scan is simpler and
//! sufficiently fast. The shape-record list is read-only and can be shared
//! across concurrent invocations, which is what the `parallel` batch driver
//! does.

use log::{debug, info};

use crate::names::name_variants;
use crate::{Bounds, MatchConfig, MatchError, Result, ShapeRecord, Way};

// ============================================================================
// Results
// ============================================================================

/// One candidate considered for a way, in ranked order. Kept for
/// diagnostics and downstream report rendering regardless of whether the
/// candidate affected the decision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateReport {
    pub route_name: String,
    pub road_name: String,
    pub surface_code: u8,
    pub bbox_difference: f64,
}

/// The surface-match verdict for a single way.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceMatch {
    pub way_id: i64,
    /// The resolved surface, absent when no candidate was trusted.
    pub surface_code: Option<u8>,
    /// `None` when no candidate passed the gate at all; `Some(false)` when
    /// candidates exist but disagree or the best one is too far away.
    pub confident: Option<bool>,
    /// Every gate-surviving candidate, best first.
    pub candidates: Vec<CandidateReport>,
}

impl SurfaceMatch {
    /// Three-way classification of the verdict.
    pub fn outcome(&self) -> MatchOutcome {
        match self.confident {
            None => MatchOutcome::NotFound,
            Some(true) => MatchOutcome::Matched,
            Some(false) => MatchOutcome::Mixed,
        }
    }
}

/// Mutually exclusive and exhaustive match outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchOutcome {
    /// A trusted candidate resolved the surface.
    Matched,
    /// Candidates exist but the evidence conflicts or is too distant.
    Mixed,
    /// No candidate passed the bbox gate.
    NotFound,
}

/// Per-batch outcome counters: reset at batch start, incremented per way,
/// read at batch end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchTally {
    pub matched: u64,
    pub mixed: u64,
    pub not_found: u64,
}

impl MatchTally {
    pub fn record(&mut self, outcome: MatchOutcome) {
        match outcome {
            MatchOutcome::Matched => self.matched += 1,
            MatchOutcome::Mixed => self.mixed += 1,
            MatchOutcome::NotFound => self.not_found += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.matched + self.mixed + self.not_found
    }
}

// ============================================================================
// Matching
// ============================================================================

/// Match a single way against the surface dataset.
///
/// The way's bounding box is recomputed fresh from its reference points on
/// every call, then projected to planar coordinates with the supplied
/// `project(latitude, longitude) -> (x, y)` function.
///
/// Returns [`MatchError::InvalidWay`] when the way has fewer than two
/// reference points.
///
/// # Example
/// ```
/// use surface_matcher::{GeoPoint, MatchConfig, Way, match_way};
///
/// let way = Way::new(7, "Lost Road", vec![GeoPoint::new(44.0, -72.6), GeoPoint::new(44.1, -72.7)]);
/// let result = match_way(&way, &[], |lat, lon| (lon, lat), &MatchConfig::default()).unwrap();
/// assert_eq!(result.surface_code, None);
/// assert_eq!(result.confident, None);
/// ```
pub fn match_way<P>(
    way: &Way,
    shapes: &[ShapeRecord],
    project: P,
    config: &MatchConfig,
) -> Result<SurfaceMatch>
where
    P: Fn(f64, f64) -> (f64, f64),
{
    if way.points.len() < 2 {
        return Err(MatchError::InvalidWay { id: way.id, points: way.points.len() });
    }

    let variants = name_variants(
        &way.name,
        way.ref_codes.as_deref(),
        way.tiger_name(),
        &config.rules,
    );

    let bounds = Bounds::from_points(&way.points)
        .ok_or(MatchError::InvalidWay { id: way.id, points: way.points.len() })?;
    let planar = bounds.project(&project);

    let mut candidates: Vec<(f64, &ShapeRecord)> = Vec::new();
    for shape in shapes {
        if !variants.contains(&shape.road_name) && !variants.contains(&shape.route_name) {
            continue;
        }
        let difference = planar.difference(&shape.bounds);
        if difference < config.bbox_gate {
            candidates.push((difference, shape));
        }
    }

    if candidates.is_empty() {
        debug!("way {} ({}): no surface candidates", way.id, way.name);
        return Ok(SurfaceMatch {
            way_id: way.id,
            surface_code: None,
            confident: None,
            candidates: Vec::new(),
        });
    }

    // Stable sort keeps original scan order among exact ties
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (best_difference, best) = candidates[0];
    let (surface_code, mut confident) = if best_difference < config.confidence_threshold {
        (Some(best.surface_code), true)
    } else {
        (None, false)
    };

    // A near-tied candidate with a different surface makes the pick
    // unreliable; anything beyond the cutoff is ignored regardless of its
    // surface value.
    let cutoff = (config.conflict_ratio * best_difference).min(config.confidence_threshold);
    for (difference, shape) in &candidates {
        if *difference < cutoff && Some(shape.surface_code) != surface_code {
            confident = false;
        }
    }

    let report = candidates
        .iter()
        .map(|(difference, shape)| CandidateReport {
            route_name: shape.route_name.clone(),
            road_name: shape.road_name.clone(),
            surface_code: shape.surface_code,
            bbox_difference: *difference,
        })
        .collect();

    debug!(
        "way {} ({}): {} candidate(s), best difference {:.1}, confident {}",
        way.id,
        way.name,
        candidates.len(),
        best_difference,
        confident
    );

    Ok(SurfaceMatch { way_id: way.id, surface_code, confident: Some(confident), candidates: report })
}

/// Match a batch of ways sequentially, tallying outcomes.
///
/// The first invalid way aborts the batch; callers that prefer to skip
/// invalid ways can drive [`match_way`] themselves.
pub fn match_ways<P>(
    ways: &[Way],
    shapes: &[ShapeRecord],
    project: P,
    config: &MatchConfig,
) -> Result<(Vec<SurfaceMatch>, MatchTally)>
where
    P: Fn(f64, f64) -> (f64, f64),
{
    info!("matching {} ways against {} shape records", ways.len(), shapes.len());

    let mut results = Vec::with_capacity(ways.len());
    let mut tally = MatchTally::default();
    for way in ways {
        let result = match_way(way, shapes, &project, config)?;
        tally.record(result.outcome());
        results.push(result);
    }

    info!(
        "surface matching finished: {} matched, {} mixed, {} not found",
        tally.matched, tally.mixed, tally.not_found
    );
    Ok((results, tally))
}

/// Match a batch of ways in parallel with rayon.
///
/// Ways have no ordering dependency and the shape list is read-only, so the
/// scan parallelizes per way; results come back in input order.
#[cfg(feature = "parallel")]
pub fn match_ways_parallel<P>(
    ways: &[Way],
    shapes: &[ShapeRecord],
    project: P,
    config: &MatchConfig,
) -> Result<(Vec<SurfaceMatch>, MatchTally)>
where
    P: Fn(f64, f64) -> (f64, f64) + Sync,
{
    use rayon::prelude::*;

    info!(
        "matching {} ways against {} shape records (parallel)",
        ways.len(),
        shapes.len()
    );

    let results: Result<Vec<SurfaceMatch>> = ways
        .par_iter()
        .map(|way| match_way(way, shapes, &project, config))
        .collect();
    let results = results?;

    let mut tally = MatchTally::default();
    for result in &results {
        tally.record(result.outcome());
    }

    info!(
        "surface matching finished: {} matched, {} mixed, {} not found",
        tally.matched, tally.mixed, tally.not_found
    );
    Ok((results, tally))
}

// ============================================================================
// Tests
// ============================================================================
