//! Loads the authoritative `GeoJSON` document.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geojson::{FeatureCollection, GeoJson};

use crate::AuthoritativeError;

/// Reads a `GeoJSON` `FeatureCollection` from disk.
///
/// The authoritative network is small enough to hold in memory, so the
/// whole document is parsed up front.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, not valid JSON,
/// or not a `FeatureCollection`.
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection, AuthoritativeError> {
    if !path.exists() {
        return Err(AuthoritativeError::FileNotFound(path.display().to_string()));
    }

    log::info!("Reading authoritative GeoJSON: {}", path.display());

    let reader = BufReader::new(File::open(path)?);
    let geojson: GeoJson = serde_json::from_reader(reader)?;

    match geojson {
        GeoJson::FeatureCollection(collection) => {
            log::info!("Read {} authoritative features", collection.features.len());
            Ok(collection)
        }
        GeoJson::Feature(_) => Err(AuthoritativeError::NotFeatureCollection {
            path: path.display().to_string(),
            found: "Feature",
        }),
        GeoJson::Geometry(_) => Err(AuthoritativeError::NotFeatureCollection {
            path: path.display().to_string(),
            found: "Geometry",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "missing_streets_reader_{}_{name}",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_feature_collection() {
        let path = temp_file(
            "ok.geojson",
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"OBJECTID":1,"FULLNAME":"MAIN ST"},
                 "geometry":{"type":"LineString","coordinates":[[-111.0,40.0],[-111.0,40.001]]}}
            ]}"#,
        );
        let collection = read_feature_collection(&path).unwrap();
        assert_eq!(collection.features.len(), 1);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_bare_geometry() {
        let path = temp_file(
            "geometry.geojson",
            r#"{"type":"LineString","coordinates":[[-111.0,40.0],[-111.0,40.001]]}"#,
        );
        let result = read_feature_collection(&path);
        assert!(matches!(
            result,
            Err(AuthoritativeError::NotFeatureCollection { found: "Geometry", .. })
        ));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn invalid_json_is_fatal() {
        let path = temp_file("broken.geojson", r#"{"type":"FeatureCollection","#);
        assert!(matches!(
            read_feature_collection(&path),
            Err(AuthoritativeError::Json(_))
        ));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            read_feature_collection(Path::new("/nonexistent/ugrc.geojson")),
            Err(AuthoritativeError::FileNotFound(_))
        ));
    }
}
