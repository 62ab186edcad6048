//! The star arena
//!
//! `SkyField` owns every star and quadrant of one generation run. Stars are
//! addressed by [`StarId`]; a peer-group table maps each master to the list
//! `[master, replica, replica, ...]`, which is the unit of claim exclusivity.

use std::collections::HashMap;

use super::quadrant::{Quadrant, QuadrantId, HOME_TILE, NEIGHBOR_TILES};
use super::star::{Point, Star, StarColor, StarId, StarKind};

/// All stars and quadrants of one chart
#[derive(Debug, Clone)]
pub struct SkyField {
    tile: (f64, f64),
    stars: Vec<Star>,
    quadrants: Vec<Quadrant>,
    peer_groups: HashMap<StarId, Vec<StarId>>,
    home: QuadrantId,
}

impl SkyField {
    /// Create a field with only its home quadrant.
    ///
    /// When `wraparound` is set the home tile sits in the middle of a 3x3
    /// grid, otherwise it is the single tile at (0, 0).
    pub fn new(width: f64, height: f64, wraparound: bool) -> Self {
        let (label, x, y) = if wraparound { HOME_TILE } else { ("C", 0, 0) };
        let home = Quadrant::new(QuadrantId(0), label, x, y, (width, height));
        Self {
            tile: (width, height),
            stars: Vec::new(),
            quadrants: vec![home],
            peer_groups: HashMap::new(),
            home: QuadrantId(0),
        }
    }

    pub fn tile_size(&self) -> (f64, f64) {
        self.tile
    }

    pub fn home(&self) -> QuadrantId {
        self.home
    }

    /// Add a quadrant at grid coordinate (x, y)
    pub fn add_quadrant(&mut self, label: &str, x: i32, y: i32) -> QuadrantId {
        let id = QuadrantId(self.quadrants.len());
        self.quadrants.push(Quadrant::new(id, label, x, y, self.tile));
        id
    }

    /// Create the eight neighbor quadrants and one replica of every master in
    /// each of them.
    pub fn tile_neighbors(&mut self) {
        let masters: Vec<StarId> = self.masters().collect();
        for (label, x, y) in NEIGHBOR_TILES {
            let quadrant = self.add_quadrant(label, x, y);
            for &master in &masters {
                self.create_child(master, quadrant);
            }
        }
    }

    /// Create a master star at `base`, relative to `quadrant`'s origin
    pub fn create_master(
        &mut self,
        base: Point,
        size: f64,
        color: StarColor,
        quadrant: QuadrantId,
    ) -> StarId {
        let id = StarId(self.stars.len());
        let position = self.quadrants[quadrant.0].adjust(&base);
        self.stars.push(Star {
            id,
            position,
            size,
            color,
            quadrant,
            kind: StarKind::Master { base },
            taken: false,
            constellation: None,
        });
        self.quadrants[quadrant.0].stars.push(id);
        self.peer_groups.insert(id, vec![id]);
        id
    }

    /// Create a replica of `master` in `quadrant`.
    ///
    /// # Panics
    ///
    /// Panics if `master` is itself a replica.
    pub fn create_child(&mut self, master: StarId, quadrant: QuadrantId) -> StarId {
        let parent = &self.stars[master.0];
        let base = match parent.kind {
            StarKind::Master { base } => base,
            StarKind::Replica { .. } => panic!("star {} is not a master", master),
        };
        let (size, color) = (parent.size, parent.color);

        let id = StarId(self.stars.len());
        let position = self.quadrants[quadrant.0].adjust(&base);
        self.stars.push(Star {
            id,
            position,
            size,
            color,
            quadrant,
            kind: StarKind::Replica { master },
            taken: false,
            constellation: None,
        });
        self.quadrants[quadrant.0].stars.push(id);
        self.peer_groups.entry(master).or_default().push(id);
        id
    }

    /// Recolor a master and every replica it already has
    pub fn set_master_color(&mut self, master: StarId, color: StarColor) {
        let group = self.peer_groups.get(&master).cloned().unwrap_or_default();
        for id in group {
            self.stars[id.0].color = color;
        }
    }

    pub fn star(&self, id: StarId) -> &Star {
        &self.stars[id.0]
    }

    pub fn position(&self, id: StarId) -> Point {
        self.stars[id.0].position
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn quadrant(&self, id: QuadrantId) -> &Quadrant {
        &self.quadrants[id.0]
    }

    pub fn quadrants(&self) -> &[Quadrant] {
        &self.quadrants
    }

    /// Ids of all master stars, in creation order
    pub fn masters(&self) -> impl Iterator<Item = StarId> + '_ {
        self.stars.iter().filter(|s| s.is_master()).map(|s| s.id)
    }

    pub fn master_count(&self) -> usize {
        self.peer_groups.len()
    }

    /// The master plus every replica of the logical star `id` belongs to
    pub fn peers(&self, id: StarId) -> &[StarId] {
        let master = self.stars[id.0].master_id();
        &self.peer_groups[&master]
    }

    pub fn is_taken(&self, id: StarId) -> bool {
        self.stars[id.0].taken
    }

    /// Claim the whole peer group of `id`
    pub fn take(&mut self, id: StarId) {
        self.set_taken(id, true);
    }

    /// Release the whole peer group of `id`
    pub fn untake(&mut self, id: StarId) {
        self.set_taken(id, false);
    }

    fn set_taken(&mut self, id: StarId, taken: bool) {
        let master = self.stars[id.0].master_id();
        for peer in &self.peer_groups[&master] {
            self.stars[peer.0].taken = taken;
        }
    }

    /// Record that this exact star instance joined constellation `index`
    pub fn assign(&mut self, id: StarId, index: usize) {
        self.stars[id.0].constellation = Some(index);
    }

    pub fn unassign(&mut self, id: StarId) {
        self.stars[id.0].constellation = None;
    }

    /// `a`'s quadrant coordinate minus `b`'s
    pub fn relative_quadrant(&self, a: StarId, b: StarId) -> (i32, i32) {
        let qa = &self.quadrants[self.stars[a.0].quadrant.0];
        let qb = &self.quadrants[self.stars[b.0].quadrant.0];
        (qa.x - qb.x, qa.y - qb.y)
    }

    /// Clear every claim and assignment
    pub fn reset_claims(&mut self) {
        for star in &mut self.stars {
            star.taken = false;
            star.constellation = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sky::Rgba;

    fn white() -> StarColor {
        StarColor::Rgba(Rgba::parse("#FFFFFF").unwrap())
    }

    fn tiled_field() -> (SkyField, StarId, StarId) {
        let mut field = SkyField::new(100.0, 100.0, true);
        let home = field.home();
        let a = field.create_master(Point::new(10.0, 20.0), 2.0, white(), home);
        let b = field.create_master(Point::new(90.0, 50.0), 1.0, white(), home);
        field.tile_neighbors();
        (field, a, b)
    }

    #[test]
    fn test_master_position_includes_home_origin() {
        let (field, a, _) = tiled_field();
        assert_eq!(field.position(a), Point::new(110.0, 120.0));
        assert!(field.star(a).is_master());
    }

    #[test]
    fn test_tiling_creates_nine_quadrants_and_replicas() {
        let (field, a, b) = tiled_field();
        assert_eq!(field.quadrants().len(), 9);
        assert_eq!(field.stars().len(), 18);
        assert_eq!(field.master_count(), 2);
        assert_eq!(field.peers(a).len(), 9);
        assert_eq!(field.peers(b).len(), 9);
        assert_eq!(field.peers(a)[0], a);
    }

    #[test]
    fn test_replica_shares_master_attributes() {
        let (field, a, _) = tiled_field();
        let replica = field.peers(a)[1];
        let star = field.star(replica);
        assert!(!star.is_master());
        assert_eq!(star.master_id(), a);
        assert_eq!(star.size, 2.0);
        // first neighbor is E at (2, 1)
        assert_eq!(star.position, Point::new(210.0, 120.0));
        assert_eq!(field.peers(replica), field.peers(a));
    }

    #[test]
    fn test_take_flips_whole_peer_group() {
        let (mut field, a, b) = tiled_field();
        let replica = field.peers(a)[4];
        field.take(replica);
        assert!(field.peers(a).iter().all(|&p| field.is_taken(p)));
        assert!(field.peers(b).iter().all(|&p| !field.is_taken(p)));

        field.untake(a);
        assert!(field.peers(a).iter().all(|&p| !field.is_taken(p)));
    }

    #[test]
    fn test_relative_quadrant() {
        let (field, a, _) = tiled_field();
        let east = field.peers(a)[1];
        let south_west = field.peers(a)[4];
        assert_eq!(field.relative_quadrant(east, a), (1, 0));
        assert_eq!(field.relative_quadrant(a, south_west), (1, 1));
        assert_eq!(field.relative_quadrant(a, a), (0, 0));
    }

    #[test]
    fn test_single_tile_field() {
        let mut field = SkyField::new(100.0, 100.0, false);
        let a = field.create_master(Point::new(5.0, 5.0), 1.0, white(), field.home());
        assert_eq!(field.position(a), Point::new(5.0, 5.0));
        assert_eq!(field.peers(a), &[a]);
    }

    #[test]
    #[should_panic(expected = "not a master")]
    fn test_child_of_replica_panics() {
        let (mut field, a, _) = tiled_field();
        let replica = field.peers(a)[1];
        let home = field.home();
        field.create_child(replica, home);
    }

    #[test]
    fn test_reset_claims() {
        let (mut field, a, _) = tiled_field();
        field.take(a);
        field.assign(a, 3);
        field.reset_claims();
        assert!(!field.is_taken(a));
        assert_eq!(field.star(a).constellation(), None);
    }
}
