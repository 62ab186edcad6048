//! Constellation plan and candidate pool
//!
//! The plan fixes how many constellations to build and how many stars each
//! one aims for. The sum of those targets decides how many of the largest
//! master stars take part; smaller stars never seed or join a constellation.

use rand::Rng;
use rand_chacha::ChaChaRng;
use tracing::debug;

use crate::core::models::CountRange;
use crate::core::sky::{SkyField, StarId};

/// Per-constellation target star counts, drawn once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstellationPlan {
    pub targets: Vec<usize>,
    pub star_count_range: CountRange,
}

impl ConstellationPlan {
    /// Draw the constellation count, then one target per constellation
    pub fn draw(count_range: CountRange, star_count_range: CountRange, rng: &mut ChaChaRng) -> Self {
        let count = rng.random_range(count_range.min()..=count_range.max());
        debug!("Constellation count: {}", count);
        let targets = (0..count)
            .map(|_| rng.random_range(star_count_range.min()..=star_count_range.max()))
            .collect();
        Self {
            targets,
            star_count_range,
        }
    }

    /// A plan with fixed targets
    pub fn fixed(targets: Vec<usize>) -> Self {
        let min = targets.iter().copied().min().unwrap_or(0);
        let max = targets.iter().copied().max().unwrap_or(0);
        Self {
            targets,
            star_count_range: CountRange(min, max),
        }
    }

    /// Sum of all targets
    pub fn total(&self) -> usize {
        self.targets.iter().sum()
    }

    /// Target of the `index`-th constellation; past the end of the plan a
    /// fresh target is drawn from the star-count range.
    pub fn target(&self, index: usize, rng: &mut ChaChaRng) -> usize {
        match self.targets.get(index) {
            Some(&target) => target,
            None => rng.random_range(self.star_count_range.min()..=self.star_count_range.max()),
        }
    }
}

/// The stars an algorithm may use: the largest masters plus all their replicas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    masters: Vec<StarId>,
    stars: Vec<StarId>,
}

impl CandidatePool {
    /// Select the `total` largest masters.
    ///
    /// Masters are stably sorted by ascending size and the last `total` are
    /// kept; `stars` lists each of them followed by its replicas, in that
    /// order.
    pub fn select(field: &SkyField, total: usize) -> Self {
        let mut masters: Vec<StarId> = field.masters().collect();
        masters.sort_by(|&a, &b| field.star(a).size.total_cmp(&field.star(b).size));
        let skip = masters.len().saturating_sub(total);
        let masters: Vec<StarId> = masters.split_off(skip);

        let stars = masters
            .iter()
            .flat_map(|&m| field.peers(m).iter().copied())
            .collect();
        Self { masters, stars }
    }

    pub fn masters(&self) -> &[StarId] {
        &self.masters
    }

    /// Masters and replicas
    pub fn stars(&self) -> &[StarId] {
        &self.stars
    }

    /// Candidates not claimed yet
    pub fn unclaimed(&self, field: &SkyField) -> Vec<StarId> {
        self.stars
            .iter()
            .copied()
            .filter(|&id| !field.is_taken(id))
            .collect()
    }

    /// Masters not claimed yet
    pub fn unclaimed_masters(&self, field: &SkyField) -> Vec<StarId> {
        self.masters
            .iter()
            .copied()
            .filter(|&id| !field.is_taken(id))
            .collect()
    }

    /// Candidates already added to some constellation
    pub fn assigned(&self, field: &SkyField) -> Vec<StarId> {
        self.stars
            .iter()
            .copied()
            .filter(|&id| field.is_taken(id) && field.star(id).constellation().is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sky::{Point, StarColor};
    use rand::SeedableRng;

    #[test]
    fn test_plan_respects_ranges() {
        let mut rng = ChaChaRng::seed_from_u64(1);
        for _ in 0..50 {
            let plan = ConstellationPlan::draw(CountRange(2, 4), CountRange(3, 6), &mut rng);
            assert!((2..=4).contains(&plan.targets.len()));
            assert!(plan.targets.iter().all(|t| (3..=6).contains(t)));
        }
    }

    #[test]
    fn test_plan_fixed_range() {
        let mut rng = ChaChaRng::seed_from_u64(42);
        let plan = ConstellationPlan::draw(CountRange(3, 3), CountRange(4, 4), &mut rng);
        assert_eq!(plan.targets, vec![4, 4, 4]);
        assert_eq!(plan.total(), 12);
        assert_eq!(plan.target(1, &mut rng), 4);
        assert_eq!(plan.target(9, &mut rng), 4);
    }

    #[test]
    fn test_pool_keeps_largest_masters_with_replicas() {
        let mut field = SkyField::new(100.0, 100.0, true);
        let home = field.home();
        let sizes = [3.0, 1.0, 5.0, 2.0, 4.0];
        let ids: Vec<StarId> = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                field.create_master(Point::new(i as f64, 0.0), size, StarColor::ColorIndex(0.0), home)
            })
            .collect();
        field.tile_neighbors();

        let pool = CandidatePool::select(&field, 3);
        assert_eq!(pool.masters(), &[ids[0], ids[4], ids[2]]);
        assert_eq!(pool.stars().len(), 27);
        assert_eq!(&pool.stars()[..9], field.peers(ids[0]));
    }

    #[test]
    fn test_pool_larger_than_field() {
        let mut field = SkyField::new(100.0, 100.0, false);
        let home = field.home();
        field.create_master(Point::new(1.0, 1.0), 1.0, StarColor::ColorIndex(0.0), home);
        let pool = CandidatePool::select(&field, 10);
        assert_eq!(pool.masters().len(), 1);
    }

    #[test]
    fn test_unclaimed_and_assigned() {
        let mut field = SkyField::new(100.0, 100.0, true);
        let home = field.home();
        let a = field.create_master(Point::new(1.0, 1.0), 2.0, StarColor::ColorIndex(0.0), home);
        let b = field.create_master(Point::new(9.0, 9.0), 1.0, StarColor::ColorIndex(0.0), home);
        field.tile_neighbors();
        let pool = CandidatePool::select(&field, 2);

        let replica = field.peers(a)[2];
        field.take(replica);
        field.assign(replica, 0);
        assert_eq!(pool.unclaimed(&field).len(), 9);
        assert_eq!(pool.unclaimed_masters(&field), vec![b]);
        assert_eq!(pool.assigned(&field), vec![replica]);
    }
}
