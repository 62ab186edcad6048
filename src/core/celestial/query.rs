//! Neighbor/distance queries
//!
//! Every construction algorithm ranks candidate stars by distance from a star
//! or from a constellation's centroid. Stars at exactly the same distance stay
//! grouped in one bucket so callers can break ties at random.
//!
//! An empty result is a normal geometry state ("nothing left to connect
//! to"), never an error.

use std::collections::BTreeMap;

use rand::Rng;
use rand_chacha::ChaChaRng;
use tracing::{debug, warn};

use crate::core::sky::{Point, SkyField, StarId};

/// What distances are measured from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reference {
    /// A star; the star itself is never a candidate
    Star(StarId),
    /// A free point, typically a constellation centroid
    Point(Point),
}

/// Candidate stars grouped by exact distance, nearest first
#[derive(Debug, Clone, Default)]
pub struct DistanceBuckets {
    // Keyed by the IEEE-754 bits of the distance: for non-negative finite
    // floats the bit pattern orders the same way as the value.
    buckets: BTreeMap<u64, Vec<StarId>>,
}

impl DistanceBuckets {
    /// Measure every candidate, skipping the reference star and, when
    /// `skip_taken` is set, every claimed star.
    pub fn measure(
        field: &SkyField,
        reference: Reference,
        candidates: &[StarId],
        skip_taken: bool,
    ) -> Self {
        let (origin, exclude) = match reference {
            Reference::Star(id) => (field.position(id), Some(id)),
            Reference::Point(point) => (point, None),
        };

        let mut buckets: BTreeMap<u64, Vec<StarId>> = BTreeMap::new();
        for &id in candidates {
            if Some(id) == exclude || (skip_taken && field.is_taken(id)) {
                continue;
            }
            let d = origin.distance(&field.position(id));
            buckets.entry(d.to_bits()).or_default().push(id);
        }
        Self { buckets }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of distinct distances
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stars across all buckets
    pub fn star_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// The closest distance and every star at it
    pub fn nearest(&self) -> Option<(f64, &[StarId])> {
        self.buckets
            .iter()
            .next()
            .map(|(bits, stars)| (f64::from_bits(*bits), stars.as_slice()))
    }

    /// All buckets, nearest first
    pub fn iter(&self) -> impl Iterator<Item = (f64, &[StarId])> + '_ {
        self.buckets
            .iter()
            .map(|(bits, stars)| (f64::from_bits(*bits), stars.as_slice()))
    }

    /// Buckets whose distance is at most `limit`
    pub fn within(&self, limit: f64) -> impl Iterator<Item = (f64, &[StarId])> + '_ {
        self.iter().take_while(move |(d, _)| *d <= limit)
    }
}

/// Rank `candidates` by distance from `reference`
pub fn distance_buckets(
    field: &SkyField,
    reference: Reference,
    candidates: &[StarId],
    skip_taken: bool,
) -> DistanceBuckets {
    let buckets = DistanceBuckets::measure(field, reference, candidates, skip_taken);
    debug!(
        "Measured {} of {} candidates from {:?}",
        buckets.star_count(),
        candidates.len(),
        reference
    );
    buckets
}

/// Uniformly pick an unclaimed star from `pool` (masters only if asked).
///
/// Returns `None` once the pool is exhausted; growth loops use that to stop.
/// The star is not claimed.
pub fn pick_random_unclaimed_star(
    field: &SkyField,
    pool: &[StarId],
    master_only: bool,
    rng: &mut ChaChaRng,
) -> Option<StarId> {
    let available: Vec<StarId> = pool
        .iter()
        .copied()
        .filter(|&id| !field.is_taken(id) && (!master_only || field.star(id).is_master()))
        .collect();
    if available.is_empty() {
        warn!("Ran out of stars to choose from");
        return None;
    }
    Some(available[rng.random_range(0..available.len())])
}

/// Uniform tie-break among equally distant stars.
///
/// # Panics
///
/// Panics if `stars` is empty.
pub fn choose(stars: &[StarId], rng: &mut ChaChaRng) -> StarId {
    stars[rng.random_range(0..stars.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sky::StarColor;
    use rand::SeedableRng;

    fn line_field() -> (SkyField, Vec<StarId>) {
        // 0 at origin, 1 and 2 both at distance 5, 3 at distance 10
        let mut field = SkyField::new(100.0, 100.0, false);
        let home = field.home();
        let ids = [(0.0, 0.0), (3.0, 4.0), (4.0, 3.0), (10.0, 0.0)]
            .iter()
            .map(|&(w, h)| field.create_master(Point::new(w, h), 1.0, StarColor::ColorIndex(0.0), home))
            .collect();
        (field, ids)
    }

    #[test]
    fn test_ties_grouped_and_reference_excluded() {
        let (field, ids) = line_field();
        let buckets = distance_buckets(&field, Reference::Star(ids[0]), &ids, false);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.star_count(), 3);
        let (d, nearest) = buckets.nearest().unwrap();
        assert_eq!(d, 5.0);
        assert_eq!(nearest, &[ids[1], ids[2]]);
    }

    #[test]
    fn test_skip_taken() {
        let (mut field, ids) = line_field();
        field.take(ids[1]);
        field.take(ids[2]);
        let buckets = distance_buckets(&field, Reference::Star(ids[0]), &ids, true);
        assert_eq!(buckets.nearest().unwrap(), (10.0, &[ids[3]][..]));

        let all = distance_buckets(&field, Reference::Star(ids[0]), &ids, false);
        assert_eq!(all.star_count(), 3);
    }

    #[test]
    fn test_point_reference_keeps_every_star() {
        let (field, ids) = line_field();
        let buckets = distance_buckets(&field, Reference::Point(Point::new(0.0, 0.0)), &ids, false);
        assert_eq!(buckets.star_count(), 4);
        assert_eq!(buckets.nearest().unwrap().0, 0.0);
    }

    #[test]
    fn test_empty_candidates_give_empty_buckets() {
        let (field, ids) = line_field();
        let buckets = distance_buckets(&field, Reference::Star(ids[0]), &[], true);
        assert!(buckets.is_empty());
        assert!(buckets.nearest().is_none());
    }

    #[test]
    fn test_within_limit() {
        let (field, ids) = line_field();
        let buckets = distance_buckets(&field, Reference::Star(ids[0]), &ids, false);
        let close: Vec<_> = buckets.within(7.0).flat_map(|(_, s)| s.to_vec()).collect();
        assert_eq!(close, vec![ids[1], ids[2]]);
        assert_eq!(buckets.within(10.0).count(), 2);
    }

    #[test]
    fn test_pick_random_unclaimed_star() {
        let (mut field, ids) = line_field();
        let mut rng = ChaChaRng::seed_from_u64(5);
        for &id in &ids[..3] {
            field.take(id);
        }
        assert_eq!(pick_random_unclaimed_star(&field, &ids, true, &mut rng), Some(ids[3]));
        field.take(ids[3]);
        assert_eq!(pick_random_unclaimed_star(&field, &ids, false, &mut rng), None);
    }

    #[test]
    fn test_pick_master_only() {
        let mut field = SkyField::new(10.0, 10.0, true);
        let home = field.home();
        let a = field.create_master(Point::new(1.0, 1.0), 1.0, StarColor::ColorIndex(0.0), home);
        field.tile_neighbors();
        let pool = field.peers(a).to_vec();
        let mut rng = ChaChaRng::seed_from_u64(11);
        for _ in 0..10 {
            assert_eq!(pick_random_unclaimed_star(&field, &pool, true, &mut rng), Some(a));
        }
    }
}
