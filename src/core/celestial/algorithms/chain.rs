//! Chain growth (`basic`)
//!
//! Each constellation starts at a random unclaimed master and repeatedly
//! claims the star nearest to the one added last. Running out of candidates
//! mid-constellation means the pool was sized wrong and is fatal.

use tracing::{debug, info};

use super::common::annex;
use super::ConstellationAlgorithm;
use crate::core::celestial::constellation::Constellation;
use crate::core::celestial::plan::{CandidatePool, ConstellationPlan};
use crate::core::celestial::query::{choose, distance_buckets, pick_random_unclaimed_star, Reference};
use crate::core::engine::GenerationContext;
use crate::core::error::{ChartError, Result};
use crate::core::sky::SkyField;

/// Nearest-chain growth
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainGrowth;

impl ConstellationAlgorithm for ChainGrowth {
    fn build(
        &self,
        field: &mut SkyField,
        pool: &CandidatePool,
        plan: &ConstellationPlan,
        ctx: &mut GenerationContext,
    ) -> Result<Vec<Constellation>> {
        let rng = &mut ctx.constellation_rng;
        let mut constellations = Vec::with_capacity(plan.targets.len());

        for (n, &target) in plan.targets.iter().enumerate() {
            info!("Doing constellation {} with {} stars", n, target);
            let Some(seed) = pick_random_unclaimed_star(field, pool.stars(), true, rng) else {
                break;
            };
            debug!("base star: {}", field.star(seed));

            let index = constellations.len();
            let mut constellation = Constellation::new();
            annex(field, &mut constellation, index, seed);

            let mut last = seed;
            while constellation.len() < target {
                let buckets = distance_buckets(field, Reference::Star(last), pool.stars(), true);
                let (_, nearest) = buckets.nearest().ok_or_else(|| {
                    ChartError::exhausted(
                        "candidate stars",
                        format!(
                            "constellation {} reached {} of {} stars",
                            n,
                            constellation.len(),
                            target
                        ),
                    )
                })?;
                let star = choose(nearest, rng);
                annex(field, &mut constellation, index, star);
                debug!("star {}: {}", constellation.len() - 1, field.star(star));
                last = star;
            }

            constellation.draw_polyline();
            constellations.push(constellation);
        }

        Ok(constellations)
    }
}
