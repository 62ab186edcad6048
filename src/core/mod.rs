//! Core module for the skychart engine
//!
//! This module provides the foundational types for chart generation.
//! It follows a modular architecture for testability and extensibility.
//!
//! # Architecture
//!
//! - `models`: Configuration model (ChartConfig and its sections) and seeds
//! - `error`: Error types using thiserror
//! - `sky`: Star/quadrant arena and star-field generation
//! - `celestial`: Distance queries, construction algorithms, replication, naming
//! - `engine`: Main ChartEngine orchestration
//! - `serialization`: Output format serializers

pub mod models;
pub mod error;
pub mod sky;
pub mod celestial;
pub mod engine;
pub mod serialization;

// Re-export commonly used types
pub use models::{BoxConfig, ChartConfig, ConstellationConfig, CountRange, Seeds, SizeRange, StarConfig};
pub use error::{ChartError, Result, ResultExt};
pub use sky::{generate_field, Point, Rgba, SkyField, Star, StarColor, StarId};
pub use celestial::{
    replicate, AlgorithmKind, CandidatePool, Constellation, ConstellationAlgorithm,
    ConstellationNamer, ConstellationPlan, ConstructionGraph, Segment,
};
pub use engine::{build_constellations, ChartEngine, GenerationContext, SkyChart};
pub use serialization::{get_serializer, ChartFormat, ChartRecord, ChartSerializer};
