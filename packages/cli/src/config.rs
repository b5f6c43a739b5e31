//! Configuration loading.

use std::path::{Path, PathBuf};

use clap::Args;
use missing_streets_street_models::{ConflationConfig, PathsConfig};

use crate::CliError;

/// The settings used when no `--config` file is given.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../conflation.toml");

/// Loads the configuration from `path`, or the built-in defaults.
///
/// Keys missing from the file keep their default values.
///
/// # Errors
///
/// Returns [`CliError::Config`] if the file cannot be read or is not valid
/// TOML for [`ConflationConfig`].
pub fn load(path: Option<&Path>) -> Result<ConflationConfig, CliError> {
    let Some(path) = path else {
        return parse(DEFAULT_CONFIG_TOML, "<built-in>");
    };

    log::info!("Loading config from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Config {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    parse(&contents, &path.display().to_string())
}

fn parse(contents: &str, label: &str) -> Result<ConflationConfig, CliError> {
    toml::from_str(contents).map_err(|e| CliError::Config {
        path: label.to_string(),
        message: e.to_string(),
    })
}

/// Command-line overrides for [`PathsConfig`].
#[derive(Debug, Clone, Default, Args)]
pub struct PathOverrides {
    /// Directory all other paths are resolved against
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// OpenStreetMap PBF extract (with locations on ways)
    #[arg(long, global = true)]
    pub osm_pbf: Option<PathBuf>,
    /// Persisted OSM index
    #[arg(long, global = true)]
    pub osm_index: Option<PathBuf>,
    /// Authoritative `GeoJSON` feature collection
    #[arg(long, global = true)]
    pub authoritative: Option<PathBuf>,
    /// Persisted authoritative index
    #[arg(long, global = true)]
    pub authoritative_index: Option<PathBuf>,
    /// Where to write the missing streets
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,
}

impl PathOverrides {
    /// Replaces every configured path that was given on the command line.
    pub fn apply(&self, paths: &mut PathsConfig) {
        let overrides = [
            (&self.data_dir, &mut paths.data_dir),
            (&self.osm_pbf, &mut paths.osm_pbf),
            (&self.osm_index, &mut paths.osm_index),
            (&self.authoritative, &mut paths.authoritative_geojson),
            (&self.authoritative_index, &mut paths.authoritative_index),
            (&self.output, &mut paths.output),
        ];

        for (value, target) in overrides {
            if let Some(value) = value {
                *target = value.display().to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use missing_streets_street_models::SectorPairing;

    use super::*;

    #[test]
    fn built_in_config_matches_defaults() {
        assert_eq!(load(None).unwrap(), ConflationConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse(
            "[sectors]\npairing = \"multiplicative\"\n\n[tolerance]\nfloor_meters = 500.0\n",
            "test",
        )
        .unwrap();

        assert_eq!(config.sectors.pairing, SectorPairing::Multiplicative);
        assert!((config.sectors.scale - 0.7).abs() < f64::EPSILON);
        assert!((config.tolerance.floor_meters - 500.0).abs() < f64::EPSILON);
        assert!((config.tolerance.length_multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn invalid_toml_is_reported() {
        let result = parse("[sectors]\nscale = \"wide\"\n", "bad.toml");
        assert!(matches!(result, Err(CliError::Config { path, .. }) if path == "bad.toml"));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = load(Some(Path::new("/nonexistent/conflation.toml")));
        assert!(matches!(result, Err(CliError::Config { .. })));
    }

    #[test]
    fn overrides_replace_only_given_paths() {
        let mut paths = PathsConfig::default();
        PathOverrides {
            data_dir: Some(PathBuf::from("/srv/streets")),
            output: Some(PathBuf::from("public/conflationResult.geo.json")),
            ..PathOverrides::default()
        }
        .apply(&mut paths);

        assert_eq!(paths.data_dir, "/srv/streets");
        assert_eq!(paths.output, "public/conflationResult.geo.json");
        assert_eq!(paths.osm_pbf, "osm.pbf");
    }
}
