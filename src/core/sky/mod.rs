//! Sky Module - Star/Quadrant Model
//!
//! Master stars, their replicas in neighboring tiles, and the tiles
//! themselves.
//!
//! # Architecture
//!
//! ```text
//! starfield::generate_field → SkyField ─┬─ Star (arena, by StarId)
//!                                       ├─ Quadrant (3x3 or 1x1 grid)
//!                                       └─ peer groups (master → replicas)
//! ```

pub mod field;
pub mod quadrant;
pub mod star;
pub mod starfield;

pub use field::SkyField;
pub use quadrant::{Quadrant, QuadrantId, HOME_TILE, NEIGHBOR_TILES};
pub use star::{ColorMode, Point, Rgba, Star, StarColor, StarId, StarKind};
pub use starfield::generate_field;
