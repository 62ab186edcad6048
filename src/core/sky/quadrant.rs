//! Quadrant tiles
//!
//! A quadrant is an integer-addressed tile with the same dimensions as the
//! home tile. Its origin is `(x * width, y * height)`.

use serde::{Deserialize, Serialize};

use super::star::{Point, StarId};

/// Index of a quadrant inside one [`super::SkyField`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuadrantId(pub usize);

/// Grid coordinate and label of the home tile when the chart wraps around
pub const HOME_TILE: (&str, i32, i32) = ("C", 1, 1);

/// The eight neighbors of [`HOME_TILE`], in creation order
pub const NEIGHBOR_TILES: [(&str, i32, i32); 8] = [
    ("E", 2, 1),
    ("SE", 2, 0),
    ("S", 1, 0),
    ("SW", 0, 0),
    ("W", 0, 1),
    ("NW", 0, 2),
    ("N", 1, 2),
    ("NE", 2, 2),
];

/// One tile of the chart grid
#[derive(Debug, Clone)]
pub struct Quadrant {
    pub id: QuadrantId,
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub origin: Point,
    pub(crate) stars: Vec<StarId>,
}

impl Quadrant {
    pub(crate) fn new(id: QuadrantId, label: impl Into<String>, x: i32, y: i32, tile: (f64, f64)) -> Self {
        Self {
            id,
            label: label.into(),
            x,
            y,
            origin: Point::new(x as f64 * tile.0, y as f64 * tile.1),
            stars: Vec::new(),
        }
    }

    /// Stars placed in this tile, in creation order
    pub fn stars(&self) -> &[StarId] {
        &self.stars
    }

    /// Translate a base offset into global coordinates
    pub fn adjust(&self, base: &Point) -> Point {
        base.offset(&self.origin)
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Quadrant {} at {:.0},{:.0} (with {} stars)",
            self.label,
            self.origin.w,
            self.origin.h,
            self.stars.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_from_grid_coordinate() {
        let q = Quadrant::new(QuadrantId(0), "NE", 2, 2, (100.0, 50.0));
        assert_eq!(q.origin, Point::new(200.0, 100.0));
        assert_eq!(q.adjust(&Point::new(1.0, 2.0)), Point::new(201.0, 102.0));
    }

    #[test]
    fn test_neighbor_tiles_surround_home() {
        let (_, hx, hy) = HOME_TILE;
        for (_, x, y) in NEIGHBOR_TILES {
            assert!((x - hx).abs() <= 1 && (y - hy).abs() <= 1);
            assert!((x, y) != (hx, hy));
        }
        let mut coords: Vec<_> = NEIGHBOR_TILES.iter().map(|(_, x, y)| (*x, *y)).collect();
        coords.sort();
        coords.dedup();
        assert_eq!(coords.len(), 8);
    }
}
