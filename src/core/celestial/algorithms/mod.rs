//! Constellation construction algorithms
//!
//! Four interchangeable strategies turn a [`CandidatePool`] into constellations:
//!
//! | Identifier         | Strategy                                           |
//! |--------------------|----------------------------------------------------|
//! | `basic`            | chain growth from the most recently added star     |
//! | `median_neighbors` | centroid growth plus centroid-radius annexation    |
//! | `star_neighbors`   | centroid growth plus per-member annexation         |
//! | `delaunay`         | triangulation graph growth with graph finalization |
//!
//! The identifier is resolved once, during configuration validation, into an
//! [`AlgorithmKind`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::constellation::Constellation;
use super::plan::{CandidatePool, ConstellationPlan};
use crate::core::engine::GenerationContext;
use crate::core::error::{ChartError, Result};
use crate::core::sky::SkyField;

pub mod chain;
pub mod delaunay;
pub mod median_neighbors;
pub mod star_neighbors;

mod common;

pub use chain::ChainGrowth;
pub use delaunay::{ConstructionGraph, DelaunayGrowth};
pub use median_neighbors::MedianNeighbors;
pub use star_neighbors::StarNeighbors;

/// A constellation construction strategy
pub trait ConstellationAlgorithm {
    /// Build constellations from `pool`, claiming stars in `field`.
    ///
    /// Returned constellations have members and segments; ids and names are
    /// filled in by the caller.
    fn build(
        &self,
        field: &mut SkyField,
        pool: &CandidatePool,
        plan: &ConstellationPlan,
        ctx: &mut GenerationContext,
    ) -> Result<Vec<Constellation>>;
}

/// The closed set of construction strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    Basic,
    MedianNeighbors,
    StarNeighbors,
    Delaunay,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 4] = [
        AlgorithmKind::Basic,
        AlgorithmKind::MedianNeighbors,
        AlgorithmKind::StarNeighbors,
        AlgorithmKind::Delaunay,
    ];

    /// Configuration identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmKind::Basic => "basic",
            AlgorithmKind::MedianNeighbors => "median_neighbors",
            AlgorithmKind::StarNeighbors => "star_neighbors",
            AlgorithmKind::Delaunay => "delaunay",
        }
    }

    /// Run this strategy
    pub fn build(
        &self,
        field: &mut SkyField,
        pool: &CandidatePool,
        plan: &ConstellationPlan,
        ctx: &mut GenerationContext,
    ) -> Result<Vec<Constellation>> {
        match self {
            AlgorithmKind::Basic => ChainGrowth.build(field, pool, plan, ctx),
            AlgorithmKind::MedianNeighbors => MedianNeighbors.build(field, pool, plan, ctx),
            AlgorithmKind::StarNeighbors => StarNeighbors.build(field, pool, plan, ctx),
            AlgorithmKind::Delaunay => DelaunayGrowth.build(field, pool, plan, ctx),
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        AlgorithmKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = AlgorithmKind::ALL.iter().map(|k| k.as_str()).collect();
                ChartError::configuration(format!(
                    "unknown constellation algorithm '{}', expected one of {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}
