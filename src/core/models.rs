//! Configuration models for skychart
//!
//! A chart is described by a JSON file with three sections (`box`, `stars`,
//! `constellations`). Every section has defaults, so `{}` is a valid config.
//! [`ChartConfig::validate`] must pass before any random stream is seeded.

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::celestial::AlgorithmKind;
use crate::core::error::{ChartError, Result, ResultExt};
use crate::core::sky::ColorMode;

/// Inclusive integer range, written as `[min, max]` in JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CountRange(pub usize, pub usize);

impl CountRange {
    pub fn min(&self) -> usize {
        self.0
    }

    pub fn max(&self) -> usize {
        self.1
    }

    fn check(&self, name: &str) -> Result<()> {
        if self.0 > self.1 {
            return Err(ChartError::configuration(format!(
                "{} must be [min, max] with min <= max, got [{}, {}]",
                name, self.0, self.1
            )));
        }
        Ok(())
    }
}

/// Inclusive float range, written as `[a, b]` in JSON (sorted on load)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SizeRange(pub f64, pub f64);

impl SizeRange {
    pub fn min(&self) -> f64 {
        self.0.min(self.1)
    }

    pub fn max(&self) -> f64 {
        self.0.max(self.1)
    }

    fn sorted(self) -> Self {
        SizeRange(self.min(), self.max())
    }
}

/// Geometry of the home tile
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BoxConfig {
    /// Tile width
    pub width: u32,
    /// Tile height
    pub height: u32,
    /// Tile the chart into a 3x3 wraparound neighborhood
    pub replicate: bool,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            replicate: true,
        }
    }
}

/// Star-field generation parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StarConfig {
    /// Number of master stars in the home tile
    pub count: usize,
    /// Smallest and largest star size
    pub size_range: SizeRange,
    /// Exponent applied to the size draw (>= 1.0 skews towards small stars)
    pub size_distribution_power: f64,
    /// Number of uniform draws multiplied into one size draw (>= 1)
    pub size_random_count: u32,
    /// `#RRGGBB`, `#RRGGBBAA` or `random_color_index`
    pub color: String,
    /// Seed for geometry, size and color
    pub random_seed: Option<u64>,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 400,
            size_range: SizeRange(0.5, 6.0),
            size_distribution_power: 1.5,
            size_random_count: 2,
            color: "#FFFFFF".to_string(),
            random_seed: None,
        }
    }
}

/// Constellation construction parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConstellationConfig {
    /// Build constellations at all
    pub enabled: bool,
    /// How many constellations to plan
    pub count_range: CountRange,
    /// Target star count for each planned constellation
    pub star_count_range: CountRange,
    /// One of `basic`, `median_neighbors`, `star_neighbors`, `delaunay`
    pub algorithm: String,
    /// Seed for construction randomness
    pub random_seed: Option<u64>,
    /// Seed for name drawing
    pub name_random_seed: Option<u64>,
    /// Newline-delimited name list; the built-in list is used when absent
    pub name_source: Option<PathBuf>,
}

impl Default for ConstellationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count_range: CountRange(6, 10),
            star_count_range: CountRange(3, 7),
            algorithm: "delaunay".to_string(),
            random_seed: None,
            name_random_seed: None,
            name_source: None,
        }
    }
}

impl ConstellationConfig {
    /// Resolve the configured algorithm identifier
    pub fn algorithm(&self) -> Result<AlgorithmKind> {
        self.algorithm.parse()
    }
}

/// Complete chart configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    #[serde(rename = "box")]
    pub box_size: BoxConfig,
    pub stars: StarConfig,
    pub constellations: ConstellationConfig,
}

impl ChartConfig {
    /// Parse a configuration from JSON text.
    ///
    /// Relative `name_source` paths are kept as written; [`ChartConfig::load`]
    /// resolves them against the config file's directory.
    ///
    /// Well-formed JSON with a value of the wrong shape (a one-element range,
    /// a negative count) is a configuration error; unreadable JSON is not.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: ChartConfig = serde_json::from_str(json).map_err(|e| match e.classify() {
            Category::Data => ChartError::configuration(e.to_string()),
            _ => ChartError::from(e),
        })?;
        config.stars.size_range = config.stars.size_range.sorted();
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Reading chart parameters from {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(ChartError::from)
            .context(format!("reading {}", path.display()))?;
        let mut config = Self::from_json(&content).context(format!("parsing {}", path.display()))?;

        if let Some(source) = config.constellations.name_source.take() {
            let resolved = if source.is_relative() {
                path.parent().unwrap_or(Path::new(".")).join(source)
            } else {
                source
            };
            config.constellations.name_source = Some(resolved);
        }
        Ok(config)
    }

    /// Check every parameter. Nothing random has happened yet when this fails.
    pub fn validate(&self) -> Result<()> {
        if self.box_size.width == 0 || self.box_size.height == 0 {
            return Err(ChartError::configuration(format!(
                "box size must be positive, got {}x{}",
                self.box_size.width, self.box_size.height
            )));
        }

        let stars = &self.stars;
        if stars.count == 0 {
            return Err(ChartError::configuration("stars.count must be >= 1"));
        }
        if !(stars.size_range.0.is_finite() && stars.size_range.1.is_finite())
            || stars.size_range.min() < 0.0
        {
            return Err(ChartError::configuration(
                "stars.size_range must hold two finite, non-negative sizes",
            ));
        }
        if !(stars.size_distribution_power >= 1.0) {
            return Err(ChartError::configuration(format!(
                "stars.size_distribution_power must be >= 1.0, not {}",
                stars.size_distribution_power
            )));
        }
        if stars.size_random_count < 1 {
            return Err(ChartError::configuration("stars.size_random_count must be >= 1"));
        }
        ColorMode::parse(&stars.color)?;

        let constellations = &self.constellations;
        if constellations.enabled {
            constellations.algorithm()?;
            constellations.count_range.check("constellations.count_range")?;
            constellations
                .star_count_range
                .check("constellations.star_count_range")?;
            if constellations.count_range.min() < 1 {
                return Err(ChartError::configuration(
                    "constellations.count_range must start at 1 or more",
                ));
            }
            // A one-star target can only ever produce a singleton.
            if constellations.star_count_range.min() < 2 {
                return Err(ChartError::configuration(
                    "constellations.star_count_range must start at 2 or more",
                ));
            }
        }
        Ok(())
    }

    /// This configuration with every seed pinned to `seeds`, so the run it
    /// describes can be repeated exactly.
    pub fn with_seeds(&self, seeds: Seeds) -> Self {
        let mut config = self.clone();
        config.stars.random_seed = Some(seeds.star);
        config.constellations.random_seed = Some(seeds.constellation);
        config.constellations.name_random_seed = Some(seeds.name);
        config
    }

    /// Pretty JSON, loadable with [`ChartConfig::from_json`]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// Seeds
// =============================================================================

/// The three independent seeds of one generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seeds {
    /// Star-field geometry, size and color
    pub star: u64,
    /// Constellation construction
    pub constellation: u64,
    /// Name drawing
    pub name: u64,
}

impl Seeds {
    pub fn new(star: u64, constellation: u64, name: u64) -> Self {
        Self {
            star,
            constellation,
            name,
        }
    }

    /// Fill in absent seeds with fresh random ones, logging each so the run
    /// can be reproduced.
    pub fn resolve(config: &ChartConfig) -> Self {
        Self {
            star: resolve_seed("stars.random_seed", config.stars.random_seed),
            constellation: resolve_seed(
                "constellations.random_seed",
                config.constellations.random_seed,
            ),
            name: resolve_seed(
                "constellations.name_random_seed",
                config.constellations.name_random_seed,
            ),
        }
    }
}

fn resolve_seed(name: &str, seed: Option<u64>) -> u64 {
    match seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u32>() as u64;
            info!("Setting {} = {}", name, seed);
            seed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = ChartConfig::from_json("{}").unwrap();
        assert_eq!(config.box_size.width, 1000);
        assert!(config.box_size.replicate);
        assert_eq!(config.constellations.algorithm, "delaunay");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let json = r#"{
            "box": { "width": 800, "replicate": false },
            "constellations": { "algorithm": "basic", "count_range": [3, 3] }
        }"#;
        let config = ChartConfig::from_json(json).unwrap();
        assert_eq!(config.box_size.width, 800);
        assert_eq!(config.box_size.height, 1000);
        assert!(!config.box_size.replicate);
        assert_eq!(config.constellations.count_range, CountRange(3, 3));
        assert_eq!(config.constellations.algorithm().unwrap(), AlgorithmKind::Basic);
    }

    #[test]
    fn test_size_range_sorted_on_load() {
        let config = ChartConfig::from_json(r#"{ "stars": { "size_range": [5.0, 1.0] } }"#).unwrap();
        assert_eq!(config.stars.size_range, SizeRange(1.0, 5.0));
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let mut config = ChartConfig::default();
        config.constellations.algorithm = "spiral".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ChartError::Configuration { .. }));
        assert!(err.to_string().contains("spiral"));
    }

    #[test]
    fn test_inverted_ranges_rejected() {
        let mut config = ChartConfig::default();
        config.constellations.count_range = CountRange(5, 2);
        assert!(matches!(
            config.validate(),
            Err(ChartError::Configuration { .. })
        ));

        let mut config = ChartConfig::default();
        config.constellations.star_count_range = CountRange(8, 4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_single_star_target_rejected() {
        let mut config = ChartConfig::default();
        config.constellations.star_count_range = CountRange(1, 4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_constellations_skip_checks() {
        let mut config = ChartConfig::default();
        config.constellations.enabled = false;
        config.constellations.algorithm = "whatever".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_star_parameters_checked() {
        let mut config = ChartConfig::default();
        config.stars.size_distribution_power = 0.5;
        assert!(config.validate().is_err());

        let mut config = ChartConfig::default();
        config.stars.color = "#GG0000".to_string();
        assert!(config.validate().is_err());

        let mut config = ChartConfig::default();
        config.box_size.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_range_is_configuration_error() {
        let err = ChartConfig::from_json(r#"{ "constellations": { "count_range": [1] } }"#)
            .unwrap_err();
        assert!(matches!(err, ChartError::Configuration { .. }));

        let err = ChartConfig::from_json(r#"{ "constellations": { "star_count_range": [-3, 4] } }"#)
            .unwrap_err();
        assert!(matches!(err, ChartError::Configuration { .. }));
    }

    #[test]
    fn test_unreadable_json_is_json_error() {
        let err = ChartConfig::from_json(r#"{ "box": "#).unwrap_err();
        assert!(matches!(err, ChartError::Json(_)));
    }

    #[test]
    fn test_seeds_keep_explicit_values() {
        let mut config = ChartConfig::default();
        config.stars.random_seed = Some(1);
        config.constellations.random_seed = Some(2);
        config.constellations.name_random_seed = Some(3);
        assert_eq!(Seeds::resolve(&config), Seeds::new(1, 2, 3));
    }

    #[test]
    fn test_load_resolves_name_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        std::fs::write(
            &path,
            r#"{ "constellations": { "name_source": "names.txt" } }"#,
        )
        .unwrap();
        let config = ChartConfig::load(&path).unwrap();
        assert_eq!(
            config.constellations.name_source,
            Some(dir.path().join("names.txt"))
        );
    }

    #[test]
    fn test_exported_parameters_reload() {
        let config = ChartConfig::default().with_seeds(Seeds::new(7, 8, 9));
        let reloaded = ChartConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(Seeds::resolve(&reloaded), Seeds::new(7, 8, 9));
        assert_eq!(reloaded.constellations.count_range, config.constellations.count_range);
    }
}
