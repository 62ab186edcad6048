//! Per-member annexation (`star_neighbors`)
//!
//! Seeding and growth match [`MedianNeighbors`](super::MedianNeighbors).
//! Annexation then walks the member list as a work-list: every member,
//! including the ones annexed during the walk, pulls in unclaimed candidates
//! closer than the mean centroid distance divided by `ANNEX_DIVISOR`.
//!
//! When only a single unclaimed master is left it is attached to the
//! nearest finished constellation and construction stops.

use tracing::{debug, info, warn};

use super::common::{annex, dissolve_singletons, merge_into_nearest, sort_and_draw};
use super::ConstellationAlgorithm;
use crate::core::celestial::constellation::Constellation;
use crate::core::celestial::plan::{CandidatePool, ConstellationPlan};
use crate::core::celestial::query::{choose, distance_buckets, pick_random_unclaimed_star, Reference};
use crate::core::engine::GenerationContext;
use crate::core::error::Result;
use crate::core::sky::{SkyField, StarId};

/// Per-member annexation radius is the mean centroid distance over this
pub const ANNEX_DIVISOR: f64 = 1.5;

/// Centroid growth with per-member annexation
#[derive(Debug, Clone, Copy, Default)]
pub struct StarNeighbors;

impl ConstellationAlgorithm for StarNeighbors {
    fn build(
        &self,
        field: &mut SkyField,
        pool: &CandidatePool,
        plan: &ConstellationPlan,
        ctx: &mut GenerationContext,
    ) -> Result<Vec<Constellation>> {
        let rng = &mut ctx.constellation_rng;
        let mut constellations: Vec<Constellation> = Vec::with_capacity(plan.targets.len());

        for (n, &target) in plan.targets.iter().enumerate() {
            let remaining = pool.unclaimed_masters(field);
            match remaining.as_slice() {
                [] => break,
                [lone] => {
                    if constellations.is_empty() {
                        warn!("Only {} is left and no constellation exists", field.star(*lone));
                    } else {
                        merge_into_nearest(field, &mut constellations, *lone, pool.stars())?;
                    }
                    break;
                }
                _ => {}
            }

            info!("Creating constellation {}", n);
            let Some(seed) = pick_random_unclaimed_star(field, pool.stars(), true, rng) else {
                break;
            };
            debug!("base star: {}", field.star(seed));

            let index = constellations.len();
            let mut constellation = Constellation::new();
            annex(field, &mut constellation, index, seed);

            while constellation.len() < target {
                let Some(center) = constellation.centroid(field) else {
                    break;
                };
                let buckets = distance_buckets(field, Reference::Point(center), pool.stars(), true);
                let Some((_, nearest)) = buckets.nearest() else {
                    break;
                };
                let star = choose(nearest, rng);
                annex(field, &mut constellation, index, star);
                debug!("star {}: {}", constellation.len() - 1, field.star(star));
            }

            annex_around_members(field, pool, &mut constellation, index);
            constellations.push(constellation);
        }

        dissolve_singletons(field, &mut constellations, pool.stars())?;
        sort_and_draw(field, &mut constellations);
        Ok(constellations)
    }
}

fn annex_around_members(
    field: &mut SkyField,
    pool: &CandidatePool,
    constellation: &mut Constellation,
    index: usize,
) {
    let limit = constellation.mean_distance_to_centroid(field) / ANNEX_DIVISOR;

    // the member list grows while it is scanned
    let mut cursor = 0;
    while cursor < constellation.len() {
        let member = constellation.stars[cursor];
        let buckets = distance_buckets(field, Reference::Star(member), pool.stars(), true);
        let nearby: Vec<StarId> = buckets
            .within(limit)
            .flat_map(|(_, stars)| stars.iter().copied())
            .collect();
        for star in nearby {
            if field.is_taken(star) {
                continue;
            }
            annex(field, constellation, index, star);
            debug!("{} annexed {}", field.star(member), field.star(star));
        }
        cursor += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Seeds;
    use crate::core::sky::{Point, StarColor};
    use std::collections::HashSet;

    fn field_from(points: &[(f64, f64)]) -> SkyField {
        let mut field = SkyField::new(1000.0, 1000.0, false);
        let home = field.home();
        for &(w, h) in points {
            field.create_master(Point::new(w, h), 1.0, StarColor::ColorIndex(0.0), home);
        }
        field
    }

    #[test]
    fn test_last_master_joins_nearest_and_stops() {
        let mut field = field_from(&[(100.0, 100.0), (110.0, 100.0), (500.0, 500.0)]);
        let plan = ConstellationPlan::fixed(vec![2, 2]);
        let pool = CandidatePool::select(&field, 3);

        for seed in 0..8 {
            field.reset_claims();
            let mut ctx = GenerationContext::new(Seeds::new(0, seed, 0));
            let constellations = StarNeighbors.build(&mut field, &pool, &plan, &mut ctx).unwrap();
            assert_eq!(constellations.len(), 1, "seed {}", seed);
            assert_eq!(constellations[0].len(), 3);
        }
    }

    #[test]
    fn test_work_list_reaches_chained_stars() {
        // radius is 15 / 1.5 = 10; the star at 46 is only reachable from 38
        let mut field = field_from(&[(0.0, 0.0), (30.0, 0.0), (38.0, 0.0), (46.0, 0.0), (100.0, 0.0)]);
        let pool = CandidatePool::select(&field, 5);
        let ids: Vec<StarId> = (0..5).map(StarId).collect();

        let mut constellation = Constellation::new();
        annex(&mut field, &mut constellation, 0, ids[0]);
        annex(&mut field, &mut constellation, 0, ids[1]);
        annex_around_members(&mut field, &pool, &mut constellation, 0);

        assert_eq!(constellation.stars, ids[..4].to_vec());
        assert!(!field.is_taken(ids[4]));
        assert_eq!(field.star(ids[3]).constellation(), Some(0));
    }

    #[test]
    fn test_memberships_are_disjoint() {
        let points: Vec<(f64, f64)> = (0..30)
            .map(|i| ((i % 6) as f64 * 150.0 + 20.0, (i / 6) as f64 * 170.0 + (i % 4) as f64 * 9.0))
            .collect();
        let mut field = field_from(&points);
        let plan = ConstellationPlan::fixed(vec![4, 3, 5, 3]);
        let pool = CandidatePool::select(&field, plan.total());
        let mut ctx = GenerationContext::new(Seeds::new(0, 21, 0));

        let constellations = StarNeighbors.build(&mut field, &pool, &plan, &mut ctx).unwrap();
        let mut seen = HashSet::new();
        for c in &constellations {
            assert!(c.len() >= 2);
            for &s in &c.stars {
                assert!(seen.insert(s));
                assert!(pool.stars().contains(&s));
            }
        }
    }
}
