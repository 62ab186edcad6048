//! skychart - Procedural star charts with invented constellations
//!
//! This library generates a random star field, groups its brightest stars
//! into constellations with one of four interchangeable algorithms, and
//! names them. It is designed to be consumed by:
//! - The CLI binary (src/bin/skychart.rs)
//! - Renderers that read the JSON chart output
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs** (this file): Pure logic, no CLI concerns
//! - **bin/skychart.rs**: Thin wrapper that calls the library
//!
//! # Example
//!
//! ```no_run
//! use skychart::{ChartConfig, ChartEngine, Seeds};
//!
//! let engine = ChartEngine::new(ChartConfig::default())?;
//! let chart = engine.generate_with_seeds(Seeds::new(1, 2, 3))?;
//! for constellation in chart.originals() {
//!     println!("{} has {} stars", constellation.name, constellation.len());
//! }
//! # Ok::<(), skychart::ChartError>(())
//! ```

pub mod core;

pub use crate::core::{
    build_constellations, generate_field, AlgorithmKind, CandidatePool, ChartConfig, ChartEngine,
    ChartError, ChartFormat, ChartRecord, Constellation, ConstellationNamer, ConstellationPlan,
    CountRange, GenerationContext, Result, Seeds, Segment, SkyChart, SkyField, StarId,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the version of the skychart library
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), VERSION);
        assert!(!VERSION.is_empty());
    }
}
