//! Celestial Module - Constellation Construction
//!
//! This module turns a star field into named constellations.
//!
//! # Architecture
//!
//! ```text
//! SkyField → CandidatePool → ConstellationAlgorithm → replicate → ConstellationNamer
//!    ↓             ↓                   ↓                   ↓               ↓
//!  Stars     largest masters     claimed groups     quadrant copies     names
//! ```
//!
//! # Claim Model
//!
//! - **Taken**: a logical star (master plus replicas) belongs to at most one
//!   constellation; claiming any instance claims the whole peer group.
//! - **Assigned**: the exact instance that joined records its constellation
//!   index.
//! - **Copies**: replicated constellations reuse replica instances of their
//!   parent's members and never claim anything.

pub mod algorithms;
pub mod constellation;
pub mod namer;
pub mod plan;
pub mod query;
pub mod replication;

pub use algorithms::{
    AlgorithmKind, ChainGrowth, ConstellationAlgorithm, ConstructionGraph, DelaunayGrowth,
    MedianNeighbors, StarNeighbors,
};
pub use constellation::{Constellation, Segment};
pub use namer::ConstellationNamer;
pub use plan::{CandidatePool, ConstellationPlan};
pub use query::{distance_buckets, pick_random_unclaimed_star, DistanceBuckets, Reference};
pub use replication::replicate;
