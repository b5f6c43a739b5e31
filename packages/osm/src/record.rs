//! Decoder-independent crowd-sourced records.

use std::collections::BTreeMap;

/// Tag holding the primary street name.
pub const NAME: &str = "name";
/// Alternate name, possibly a `;`-separated list.
pub const ALT_NAME: &str = "alt_name";
/// Historical name, possibly a `;`-separated list.
pub const OLD_NAME: &str = "old_name";
/// Official name, possibly a `;`-separated list.
pub const OFFICIAL_NAME: &str = "official_name";
/// A name the street is explicitly *not* called.
pub const NOT_NAME: &str = "not:name";

/// Every tag the index builder reads.
pub const NAME_TAGS: &[&str] = &[NAME, ALT_NAME, OLD_NAME, OFFICIAL_NAME, NOT_NAME];

/// Geometry class of a source element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// A single node.
    Point,
    /// A way.
    Line,
}

/// One element from the crowd-sourced source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Point or line.
    pub kind: FeatureKind,
    /// Element id.
    pub id: i64,
    /// Centroid latitude.
    pub lat: f64,
    /// Centroid longitude.
    pub lng: f64,
    /// Free-text tags.
    pub tags: BTreeMap<String, String>,
}

impl RawRecord {
    /// Value of a tag, treating an empty value as absent.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tag_values_are_absent() {
        let record = RawRecord {
            kind: FeatureKind::Line,
            id: 1,
            lat: 0.0,
            lng: 0.0,
            tags: BTreeMap::from([
                (NAME.to_string(), String::new()),
                (ALT_NAME.to_string(), "Old Coach Road".to_string()),
            ]),
        };
        assert_eq!(record.tag(NAME), None);
        assert_eq!(record.tag(ALT_NAME), Some("Old Coach Road"));
        assert_eq!(record.tag(OLD_NAME), None);
    }
}
