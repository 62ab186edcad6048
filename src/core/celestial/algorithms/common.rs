//! Helpers shared by the construction algorithms

use tracing::{info, warn};

use crate::core::celestial::constellation::Constellation;
use crate::core::celestial::query::{DistanceBuckets, Reference};
use crate::core::error::{ChartError, Result};
use crate::core::sky::{SkyField, StarId};

/// Claim `star` and append it to the constellation at `index`
pub(crate) fn annex(field: &mut SkyField, constellation: &mut Constellation, index: usize, star: StarId) {
    field.take(star);
    field.assign(star, index);
    constellation.stars.push(star);
}

/// Where a lone star should go
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Assignment {
    /// The peer instance to add
    pub star: StarId,
    pub constellation: usize,
    pub distance: f64,
}

/// Find the (peer, constellation) pair with the smallest distance from a peer
/// of `group` to an already-assigned star.
///
/// `candidates` lists, per peer, the stars it may attach to; only those
/// already added to a constellation count.
pub(crate) fn nearest_assignment<F>(field: &SkyField, group: &[StarId], mut candidates: F) -> Option<Assignment>
where
    F: FnMut(StarId) -> Vec<StarId>,
{
    let mut best: Option<Assignment> = None;
    for &peer in group {
        let assigned: Vec<StarId> = candidates(peer)
            .into_iter()
            .filter(|&s| field.is_taken(s) && field.star(s).constellation().is_some())
            .collect();
        let buckets = DistanceBuckets::measure(field, Reference::Star(peer), &assigned, false);
        let Some((distance, stars)) = buckets.nearest() else {
            continue;
        };
        let Some(constellation) = field.star(stars[0]).constellation() else {
            continue;
        };
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(Assignment {
                star: peer,
                constellation,
                distance,
            });
        }
    }
    best
}

/// Attach the logical star `lone` to the nearest constellation, measured from
/// any of its peers to any assigned star of the pool.
pub(crate) fn merge_into_nearest(
    field: &mut SkyField,
    constellations: &mut [Constellation],
    lone: StarId,
    pool_stars: &[StarId],
) -> Result<()> {
    let group = field.peers(lone).to_vec();
    let assigned: Vec<StarId> = pool_stars
        .iter()
        .copied()
        .filter(|&s| field.is_taken(s) && field.star(s).constellation().is_some())
        .collect();
    let assignment = nearest_assignment(field, &group, |_| assigned.clone()).ok_or_else(|| {
        ChartError::graph_invariant(format!(
            "lone star {} has no constellation to join",
            lone
        ))
    })?;

    info!(
        "Assigning lone star {} to constellation #{} (d = {:.1})",
        assignment.star, assignment.constellation, assignment.distance
    );
    let index = assignment.constellation;
    annex(field, &mut constellations[index], index, assignment.star);
    Ok(())
}

/// Dissolve every single-star constellation into its nearest neighbor, then
/// drop the emptied entries and renumber the star back-references.
pub(crate) fn dissolve_singletons(
    field: &mut SkyField,
    constellations: &mut Vec<Constellation>,
    pool_stars: &[StarId],
) -> Result<()> {
    for index in 0..constellations.len() {
        if constellations[index].len() != 1 {
            continue;
        }
        let star = constellations[index].stars[0];
        warn!("Constellation #{} only holds {}", index, field.star(star));
        constellations[index].stars.clear();
        field.untake(star);
        field.unassign(star);
        merge_into_nearest(field, constellations, star, pool_stars)?;
    }

    constellations.retain(|c| !c.is_empty());
    for (index, constellation) in constellations.iter().enumerate() {
        for &star in &constellation.stars {
            field.assign(star, index);
        }
    }
    Ok(())
}

/// Final ordering shared by the centroid-based variants
pub(crate) fn sort_and_draw(field: &SkyField, constellations: &mut [Constellation]) {
    for constellation in constellations {
        constellation.sort_by_angle(field);
        constellation.draw_polyline();
    }
}
