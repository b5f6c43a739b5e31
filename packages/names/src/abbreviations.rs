//! Street type and directional abbreviation tables.
//!
//! Keys are upper-case abbreviations as they appear in the authoritative
//! address data; values are the title-cased display form.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Street type abbreviations.
static STREET_TYPES: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("ALY", "Alley"),
        ("AVE", "Avenue"),
        ("BAY", "Bay"),
        ("BLVD", "Boulevard"),
        ("CIR", "Circle"),
        ("COR", "Corner"),
        ("CRES", "Crescent"),
        ("CRK", "Creek"),
        ("CT", "Court"),
        ("CTR", "Center"),
        ("CV", "Cove"),
        ("CYN", "Canyon"),
        ("DR", "Drive"),
        ("EST", "Estate"),
        ("ESTS", "Estates"),
        ("EXPY", "Expressway"),
        ("FLT", "Flat"),
        ("FRK", "Fork"),
        ("FWY", "Freeway"),
        ("GLN", "Glen"),
        ("GRV", "Grove"),
        ("GTWY", "Gateway"),
        ("HL", "Hill"),
        ("HOLW", "Hollow"),
        ("HTS", "Heights"),
        ("HWY", "Highway"),
        ("JCT", "Junction"),
        ("LN", "Lane"),
        ("LNDG", "Landing"),
        ("LOOP", "Loop"),
        ("MDW", "Meadow"),
        ("MDWS", "Meadows"),
        ("MNR", "Manor"),
        ("PARK", "Park"),
        ("PASS", "Pass"),
        ("PATH", "Path"),
        ("PKWY", "Parkway"),
        ("PL", "Place"),
        ("PLZ", "Plaza"),
        ("PT", "Point"),
        ("RD", "Road"),
        ("RDG", "Ridge"),
        ("RNCH", "Ranch"),
        ("ROW", "Row"),
        ("RTE", "Route"),
        ("RUN", "Run"),
        ("SPUR", "Spur"),
        ("SQ", "Square"),
        ("ST", "Street"),
        ("TER", "Terrace"),
        ("TRCE", "Trace"),
        ("TRL", "Trail"),
        ("VIS", "Vista"),
        ("VLG", "Village"),
        ("VW", "View"),
        ("WAY", "Way"),
        ("XING", "Crossing"),
    ])
});

/// Single-letter compass directions.
static DIRECTIONALS: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("N", "North"),
        ("S", "South"),
        ("E", "East"),
        ("W", "West"),
    ])
});

/// Looks up an upper-case token in the directional and street type
/// tables, in that order.
#[must_use]
pub fn lookup(token: &str) -> Option<&'static str> {
    DIRECTIONALS
        .get(token)
        .or_else(|| STREET_TYPES.get(token))
        .copied()
}
