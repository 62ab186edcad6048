//! Constellations and their drawn segments

use serde::{Deserialize, Serialize};

use crate::core::sky::{Point, Rgba, SkyField, StarId};

/// One drawn polyline (or polygon, when closed) through member stars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub stars: Vec<StarId>,
    pub is_closed: bool,
}

/// A named group of claimed stars
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Constellation {
    /// `"<n>"` for originals, `"<parent>.<k>"` for copies
    pub id: String,
    pub name: String,
    /// Members in drawing order
    pub stars: Vec<StarId>,
    pub segments: Vec<Segment>,
    pub custom_color: Option<Rgba>,
    /// Set on copies placed in a neighboring quadrant
    pub parent_id: Option<String>,
}

impl Constellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn contains(&self, star: StarId) -> bool {
        self.stars.contains(&star)
    }

    /// Whether this is a copy of another constellation
    pub fn is_copy(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Add a segment between existing members
    pub fn draw_segment(&mut self, stars: Vec<StarId>, is_closed: bool) {
        debug_assert!(
            stars.iter().all(|s| self.contains(*s)),
            "segment references a star outside constellation {}",
            self.id
        );
        self.segments.push(Segment { stars, is_closed });
    }

    /// Replace the segments with one open polyline through all members
    pub fn draw_polyline(&mut self) {
        self.segments.clear();
        if self.stars.len() >= 2 {
            let stars = self.stars.clone();
            self.draw_segment(stars, false);
        }
    }

    /// Mean member position
    pub fn centroid(&self, field: &SkyField) -> Option<Point> {
        Point::centroid(self.stars.iter().map(|&s| field.position(s)))
    }

    /// Mean member distance to the centroid (0 for an empty constellation)
    pub fn mean_distance_to_centroid(&self, field: &SkyField) -> f64 {
        let Some(center) = self.centroid(field) else {
            return 0.0;
        };
        let total: f64 = self
            .stars
            .iter()
            .map(|&s| field.position(s).distance(&center))
            .sum();
        total / self.stars.len() as f64
    }

    /// Order members by polar angle around the centroid, ascending
    pub fn sort_by_angle(&mut self, field: &SkyField) {
        let Some(center) = self.centroid(field) else {
            return;
        };
        self.stars.sort_by(|&a, &b| {
            let angle_a = field.position(a).angle_around(&center);
            let angle_b = field.position(b).angle_around(&center);
            angle_a.total_cmp(&angle_b)
        });
    }

    /// Whether every segment references members only
    pub fn segments_reference_members(&self) -> bool {
        self.segments
            .iter()
            .all(|seg| seg.stars.iter().all(|s| self.contains(*s)))
    }
}
