//! Name-variant expansion for road names.
//!
//! The road-network and surface datasets spell the same road differently:
//! "North Main Street" in one is "N MAIN ST" in the other, "State Route 9"
//! appears as "VT-9", and so on. This module generates the set of plausible
//! alternate spellings for a way name so the matcher can compare them against
//! shape-record names by exact equality.
//!
//! ## Rule structure
//!
//! Each rewrite rule is applied independently to the normalized (uppercase,
//! whitespace-collapsed) name — rules do not chain onto each other's outputs.
//! The one exception: every rule's product is re-submitted to the suffix
//! abbreviation step, because directional and prefix changes combine with
//! suffix abbreviations ("North Main Street" → "N MAIN STREET" → "N MAIN ST").
//!
//! All products accumulate into one flat set; nothing is ever removed.

use std::collections::HashSet;

// =============================================================================
// Rewrite Tables
// =============================================================================

/// Street-type suffix abbreviations, applied when a name ends with the full
/// suffix word. A suffix may map to several abbreviations seen in the surface
/// dataset, and TPKE maps back the other way.
const SUFFIX_ABBREVIATIONS: &[(&str, &[&str])] = &[
    (" ROAD", &[" RD"]),
    (" PARK", &[" PK"]),
    (" PLACE", &[" PL"]),
    (" CIRCLE", &[" CIR", " CR", " CL"]),
    (" TURNPIKE", &[" TPKE", " TRNPK"]),
    (" TPKE", &[" TURNPIKE", " TRNPK"]),
    (" COURT", &[" CT"]),
    (" DRIVE", &[" DR"]),
    (" LANE", &[" LN"]),
    (" STREET", &[" ST"]),
    (" LANDING", &[" LNDG"]),
    (" WAY", &[" WY"]),
    (" AVE", &[" AV"]),
    (" AVENUE", &[" AVE", " AV"]),
];

/// Leading words the surface dataset abbreviates to a single letter (plus
/// SAINT, which it writes as ST).
const LEADING_WORD_ABBREVIATIONS: &[(&str, &str)] = &[
    ("SAINT ", "ST "),
    ("SOUTH ", "S "),
    ("NORTH ", "N "),
    ("EAST ", "E "),
    ("WEST ", "W "),
];

/// Single-letter directional tokens that float between leading and trailing
/// position ("N MAIN ST" vs "MAIN ST N").
const DIRECTIONALS: &[&str] = &["N", "S", "E", "W"];

// =============================================================================
// Regional Rules
// =============================================================================

/// Region-specific route shorthand.
///
/// State-route and town-highway abbreviations are conventions of one
/// jurisdiction's surface dataset, not universal rules, so they are kept
/// configurable. The default models Vermont.
#[derive(Debug, Clone)]
pub struct RegionalRules {
    /// Replacements for a leading "STATE ROUTE ". The Vermont dataset writes
    /// both "VT 9" and "VT-9" for "State Route 9".
    pub state_route_prefixes: Vec<String>,
    /// Prefix replacing "TOWN HWY " / "TOWN HIGHWAY " before a number, so
    /// "Town Highway 12" becomes "TH-12".
    pub town_highway_prefix: String,
}

impl Default for RegionalRules {
    fn default() -> Self {
        Self {
            state_route_prefixes: vec!["VT ".to_string(), "VT-".to_string()],
            town_highway_prefix: "TH-".to_string(),
        }
    }
}

// =============================================================================
// Variant Generation
// =============================================================================

/// Generate the set of plausible surface-dataset spellings for a way name.
///
/// `ref_codes` is the raw semicolon-delimited route-ref list; `tiger_name`
/// the optional base/type pair. Both contribute variants of their own.
/// The normalized original name is always a member of the returned set, and
/// repeated invocation on the same input yields the same set.
///
/// # Example
/// ```
/// use surface_matcher::{name_variants, RegionalRules};
///
/// let variants = name_variants("North Main Street", None, None, &RegionalRules::default());
/// assert!(variants.contains("NORTH MAIN STREET"));
/// assert!(variants.contains("N MAIN ST"));
/// ```
pub fn name_variants(
    name: &str,
    ref_codes: Option<&str>,
    tiger_name: Option<(&str, &str)>,
    rules: &RegionalRules,
) -> HashSet<String> {
    let mut variants = HashSet::new();
    let name = normalize(name);

    add_suffix_variants(&mut variants, &name);

    // "Xxxx Highway (US 7)" -- also try with the parenthetical stripped
    if let Some(stripped) = strip_parenthetical(&name) {
        add_suffix_variants(&mut variants, stripped);
    }

    if let Some(base) = name.strip_suffix(" DEAD END") {
        add_suffix_variants(&mut variants, base);
    }

    // Hill roads are sometimes missing 'RD' in the network dataset
    if name.ends_with(" HILL") {
        add_suffix_variants(&mut variants, &format!("{name} RD"));
    }

    if let Some(base) = name.strip_prefix("PVT ") {
        add_suffix_variants(&mut variants, base);
    }

    for (word, abbrev) in LEADING_WORD_ABBREVIATIONS {
        if let Some(rest) = name.strip_prefix(word) {
            add_suffix_variants(&mut variants, &format!("{abbrev}{rest}"));
        }
    }

    for swapped in swap_directional(&name) {
        add_suffix_variants(&mut variants, &swapped);
    }

    if name.contains("MTN ") {
        add_suffix_variants(&mut variants, &name.replace("MTN ", "MOUNTAIN "));
    }
    if name.contains("MOUNTAIN ") {
        add_suffix_variants(&mut variants, &name.replace("MOUNTAIN ", "MTN "));
    }

    if let Some(rest) = town_highway_rest(&name) {
        add_suffix_variants(&mut variants, &format!("{}{rest}", rules.town_highway_prefix));
    }

    if let Some(rest) = name.strip_prefix("STATE ROUTE ") {
        for prefix in &rules.state_route_prefixes {
            variants.insert(format!("{prefix}{rest}"));
        }
    }

    if let Some(refs) = ref_codes {
        for part in refs.split(';') {
            let code = part.trim().to_uppercase();
            if code.is_empty() {
                continue;
            }
            variants.insert(code.replace(' ', "-"));
            variants.insert(code);
        }
    }

    if let Some((base, kind)) = tiger_name {
        let combined = normalize(&format!("{base} {kind}"));
        if !combined.is_empty() {
            variants.insert(combined);
        }
    }

    variants
}

/// Add `name` plus its suffix-abbreviated forms to the set.
///
/// This is the step every other rule's product is re-submitted to; it must
/// not recurse into the other rules.
fn add_suffix_variants(variants: &mut HashSet<String>, name: &str) {
    let name = name.trim();
    if name.is_empty() {
        return;
    }
    variants.insert(name.to_string());

    for (suffix, abbreviations) in SUFFIX_ABBREVIATIONS {
        if let Some(base) = name.strip_suffix(suffix) {
            for abbreviation in *abbreviations {
                variants.insert(format!("{base}{abbreviation}"));
            }
        }
    }

    // TER/TERR differ without a word boundary in the source data, so this
    // one is a plain trailing-substring rewrite rather than a suffix word
    if let Some(base) = name.strip_suffix("TER") {
        variants.insert(format!("{base}TERR"));
    }

    if let Some(base) = name.strip_suffix(" PVT") {
        variants.insert(base.to_string());
    }
    if let Some(base) = name.strip_suffix(" DEAD END") {
        variants.insert(base.to_string());
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Uppercase and collapse all whitespace runs to single spaces.
fn normalize(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}

/// Strip a trailing parenthetical like " (US 7)", if present.
fn strip_parenthetical(name: &str) -> Option<&str> {
    if !name.ends_with(')') {
        return None;
    }
    name.rfind(" (").map(|idx| &name[..idx])
}

/// Move a single leading directional letter to trailing position, or a
/// trailing one to leading position. Each side is handled independently, so
/// a name carrying both produces both swaps.
fn swap_directional(name: &str) -> Vec<String> {
    let mut swapped = Vec::new();
    for d in DIRECTIONALS {
        if let Some(rest) = name.strip_prefix(&format!("{d} ")) {
            swapped.push(format!("{rest} {d}"));
        }
        if let Some(rest) = name.strip_suffix(&format!(" {d}")) {
            swapped.push(format!("{d} {rest}"));
        }
    }
    swapped
}

/// The remainder after a "TOWN HWY "/"TOWN HIGHWAY " prefix, when it is
/// followed by a highway number.
fn town_highway_rest(name: &str) -> Option<&str> {
    let rest = name
        .strip_prefix("TOWN HWY ")
        .or_else(|| name.strip_prefix("TOWN HIGHWAY "))?;
    rest.starts_with(|c: char| c.is_ascii_digit()).then_some(rest)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn variants(name: &str) -> HashSet<String> {
        name_variants(name, None, None, &RegionalRules::default())
    }

    #[test]
    fn test_original_name_is_always_present() {
        assert!(variants("Maple Street").contains("MAPLE STREET"));
        assert!(variants("  Maple   Street ").contains("MAPLE STREET"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = name_variants("North Elm Road", Some("US 7"), None, &RegionalRules::default());
        let b = name_variants("North Elm Road", Some("US 7"), None, &RegionalRules::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_suffix_abbreviations() {
        assert!(variants("Church Street").contains("CHURCH ST"));
        assert!(variants("Quarry Road").contains("QUARRY RD"));
        assert!(variants("Birch Lane").contains("BIRCH LN"));
        assert!(variants("Ferry Landing").contains("FERRY LNDG"));

        let circle = variants("Sunset Circle");
        assert!(circle.contains("SUNSET CIR"));
        assert!(circle.contains("SUNSET CR"));
        assert!(circle.contains("SUNSET CL"));

        let avenue = variants("Grand Avenue");
        assert!(avenue.contains("GRAND AVE"));
        assert!(avenue.contains("GRAND AV"));
    }

    #[test]
    fn test_turnpike_is_bidirectional() {
        let full = variants("River Turnpike");
        assert!(full.contains("RIVER TPKE"));
        assert!(full.contains("RIVER TRNPK"));

        let abbreviated = variants("River Tpke");
        assert!(abbreviated.contains("RIVER TURNPIKE"));
        assert!(abbreviated.contains("RIVER TRNPK"));
    }

    #[test]
    fn test_trailing_ter_rewrite() {
        // Plain substring rewrite, no word boundary
        assert!(variants("Pleasant Ter").contains("PLEASANT TERR"));
    }

    #[test]
    fn test_directional_prefix_compounds_with_suffix() {
        let v = variants("North Main Street");
        assert!(v.contains("NORTH MAIN STREET"));
        assert!(v.contains("NORTH MAIN ST"));
        assert!(v.contains("N MAIN STREET"));
        assert!(v.contains("N MAIN ST"));
    }

    #[test]
    fn test_directional_swap_is_symmetric() {
        assert!(variants("N Main St").contains("MAIN ST N"));
        assert!(variants("Main St N").contains("N MAIN ST"));
        // Exactly one transformation per side: no doubled directionals
        assert!(!variants("N Main St").contains("N MAIN ST N"));
    }

    #[test]
    fn test_parenthetical_is_stripped() {
        let v = variants("Ethan Allen Highway (US 7)");
        assert!(v.contains("ETHAN ALLEN HIGHWAY (US 7)"));
        assert!(v.contains("ETHAN ALLEN HIGHWAY"));
    }

    #[test]
    fn test_dead_end_suffix() {
        let v = variants("Quarry Road Dead End");
        assert!(v.contains("QUARRY ROAD"));
        // Stripped base is re-run through the suffix step
        assert!(v.contains("QUARRY RD"));
    }

    #[test]
    fn test_hill_roads_gain_rd() {
        let v = variants("Prospect Hill");
        assert!(v.contains("PROSPECT HILL"));
        assert!(v.contains("PROSPECT HILL RD"));
    }

    #[test]
    fn test_leading_pvt_is_stripped() {
        let v = variants("PVT Old Mill Road");
        assert!(v.contains("OLD MILL ROAD"));
        assert!(v.contains("OLD MILL RD"));
    }

    #[test]
    fn test_saint_abbreviation() {
        let v = variants("Saint Paul Street");
        assert!(v.contains("ST PAUL STREET"));
        assert!(v.contains("ST PAUL ST"));
    }

    #[test]
    fn test_mountain_substitution_both_ways() {
        let v = variants("Mtn View Road");
        assert!(v.contains("MOUNTAIN VIEW ROAD"));
        assert!(v.contains("MOUNTAIN VIEW RD"));

        let v = variants("Green Mountain Turnpike");
        assert!(v.contains("GREEN MTN TURNPIKE"));
        assert!(v.contains("GREEN MTN TPKE"));
    }

    #[test]
    fn test_town_highway_shorthand() {
        assert!(variants("Town Highway 12").contains("TH-12"));
        assert!(variants("Town Hwy 3").contains("TH-3"));
        // No number, no shorthand
        assert!(!variants("Town Highway Garage").contains("TH-GARAGE"));
    }

    #[test]
    fn test_state_route_shorthand() {
        let v = variants("State Route 9");
        assert!(v.contains("VT 9"));
        assert!(v.contains("VT-9"));
    }

    #[test]
    fn test_regional_rules_are_configurable() {
        let rules = RegionalRules {
            state_route_prefixes: vec!["NH ".to_string(), "NH-".to_string()],
            town_highway_prefix: "T-".to_string(),
        };
        let v = name_variants("State Route 101", None, None, &rules);
        assert!(v.contains("NH 101"));
        assert!(v.contains("NH-101"));
        assert!(!v.contains("VT 101"));
        assert!(name_variants("Town Hwy 4", None, None, &rules).contains("T-4"));
    }

    #[test]
    fn test_ref_codes_split_and_hyphenated() {
        let v = name_variants("Main Street", Some("US 7;VT 9"), None, &RegionalRules::default());
        assert!(v.contains("US 7"));
        assert!(v.contains("US-7"));
        assert!(v.contains("VT 9"));
        assert!(v.contains("VT-9"));
    }

    #[test]
    fn test_empty_ref_parts_are_ignored() {
        let v = name_variants("Main Street", Some(";;US 2;"), None, &RegionalRules::default());
        assert!(v.contains("US 2"));
        assert!(!v.contains(""));
    }

    #[test]
    fn test_tiger_name_variant() {
        let v = name_variants("Main St", None, Some(("Stage", "Rd")), &RegionalRules::default());
        assert!(v.contains("STAGE RD"));
        // Missing type is treated as empty, not an error
        let v = name_variants("Main St", None, Some(("Stage", "")), &RegionalRules::default());
        assert!(v.contains("STAGE"));
    }
}
