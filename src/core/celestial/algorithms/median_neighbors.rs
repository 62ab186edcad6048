//! Centroid annexation (`median_neighbors`)
//!
//! Growth measures from the constellation's running centroid. Once the
//! target is reached (or nothing is left), every unclaimed candidate within
//! `ANNEX_FACTOR` times the mean member-to-centroid distance is annexed.
//! Members are finally ordered by polar angle around the centroid.

use tracing::{debug, info};

use super::common::{annex, dissolve_singletons, sort_and_draw};
use super::ConstellationAlgorithm;
use crate::core::celestial::constellation::Constellation;
use crate::core::celestial::plan::{CandidatePool, ConstellationPlan};
use crate::core::celestial::query::{choose, distance_buckets, pick_random_unclaimed_star, Reference};
use crate::core::engine::GenerationContext;
use crate::core::error::Result;
use crate::core::sky::{SkyField, StarId};

/// Annexation radius, as a multiple of the mean distance to the centroid
pub const ANNEX_FACTOR: f64 = 2.2;

/// Centroid-based growth and annexation
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianNeighbors;

impl ConstellationAlgorithm for MedianNeighbors {
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

            annex_around_centroid(field, pool, &mut constellation, index);
            constellations.push(constellation);
        }

        dissolve_singletons(field, &mut constellations, pool.stars())?;
        sort_and_draw(field, &mut constellations);
        Ok(constellations)
    }
}

fn annex_around_centroid(
    field: &mut SkyField,
    pool: &CandidatePool,
    constellation: &mut Constellation,
    index: usize,
) {
    let Some(center) = constellation.centroid(field) else {
        return;
    };
    let limit = constellation.mean_distance_to_centroid(field) * ANNEX_FACTOR;

    let buckets = distance_buckets(field, Reference::Point(center), pool.stars(), true);
    let nearby: Vec<StarId> = buckets
        .within(limit)
        .flat_map(|(_, stars)| stars.iter().copied())
        .collect();
    for star in nearby {
        // an earlier annex may have claimed this star through a peer
        if field.is_taken(star) {
            continue;
        }
        annex(field, constellation, index, star);
        debug!("annexed {}", field.star(star));
    }
}
