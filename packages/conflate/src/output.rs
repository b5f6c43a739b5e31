//! `GeoJSON` rendering of conflation results.

use chrono::{DateTime, SecondsFormat, Utc};
use geojson::{Feature, FeatureCollection, JsonObject, feature::Id};
use missing_streets_street_models::MissingStreet;

/// Key of the generation timestamp on the top-level collection.
pub const LAST_UPDATED: &str = "lastUpdated";

/// The complete result of one conflation run.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingStreetCollection {
    /// Unmatched authoritative streets.
    pub features: Vec<MissingStreet>,
    /// When the run finished.
    pub last_updated: DateTime<Utc>,
}

impl MissingStreetCollection {
    /// Wraps the matcher output, stamping it with the current time.
    #[must_use]
    pub fn new(features: Vec<MissingStreet>) -> Self {
        Self {
            features,
            last_updated: Utc::now(),
        }
    }

    /// Renders the collection as a `GeoJSON` `FeatureCollection` with a
    /// top-level `lastUpdated` member.
    #[must_use]
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut foreign_members = JsonObject::new();
        foreign_members.insert(
            LAST_UPDATED.to_string(),
            self.last_updated
                .to_rfc3339_opts(SecondsFormat::Millis, true)
                .into(),
        );

        FeatureCollection {
            bbox: None,
            features: self.features.iter().map(to_feature).collect(),
            foreign_members: Some(foreign_members),
        }
    }
}

fn to_feature(street: &MissingStreet) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("roadId".to_string(), street.road_id.into());
    properties.insert("name".to_string(), street.name.clone().into());

    Feature {
        bbox: Some(street.bbox.to_vec()),
        geometry: Some(street.geometry.clone()),
        id: Some(Id::String(street.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}
