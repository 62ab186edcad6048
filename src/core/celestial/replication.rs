//! Quadrant replication
//!
//! A constellation that reaches into a neighboring quadrant is only half
//! visible on a wrapped chart. For every quadrant offset its members actually
//! use, a copy is made that is shifted back by that offset, so the part that
//! sticks out on one side also shows up on the opposite side.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::constellation::{Constellation, Segment};
use crate::core::error::{ChartError, Result};
use crate::core::sky::{SkyField, StarId};

/// Copies of every constellation for the quadrant offsets its members use.
///
/// Copies are named `"<id>.<k>"` with `k` counting from 1 and carry the
/// parent's id in `parent_id`.
pub fn replicate(field: &SkyField, constellations: &[Constellation]) -> Result<Vec<Constellation>> {
    let mut copies = Vec::new();
    for constellation in constellations {
        copies.extend(replicate_one(field, constellation)?);
    }
    debug!(
        "Replicated {} constellations into {} copies",
        constellations.len(),
        copies.len()
    );
    Ok(copies)
}

fn replicate_one(field: &SkyField, constellation: &Constellation) -> Result<Vec<Constellation>> {
    let reference = constellation
        .stars
        .iter()
        .copied()
        .find(|&s| field.star(s).is_master())
        .ok_or_else(|| {
            ChartError::graph_invariant(format!(
                "constellation {} has no master member",
                constellation.id
            ))
        })?;

    let mut offsets: Vec<(i32, i32)> = Vec::new();
    for &star in &constellation.stars {
        let offset = field.relative_quadrant(reference, star);
        if offset != (0, 0) && !offsets.contains(&offset) {
            offsets.push(offset);
        }
    }

    let mut copies = Vec::with_capacity(offsets.len());
    for offset in offsets {
        let Some(translation) = translate(field, constellation, offset) else {
            warn!(
                "Constellation {} has no complete copy at offset {:?}",
                constellation.id, offset
            );
            continue;
        };

        let stars = constellation.stars.iter().map(|s| translation[s]).collect();
        let segments = constellation
            .segments
            .iter()
            .map(|segment| {
                let stars = segment
                    .stars
                    .iter()
                    .map(|s| {
                        translation.get(s).copied().ok_or_else(|| {
                            ChartError::graph_invariant(format!(
                                "segment of constellation {} references non-member {}",
                                constellation.id, s
                            ))
                        })
                    })
                    .collect::<Result<Vec<StarId>>>()?;
                Ok(Segment {
                    stars,
                    is_closed: segment.is_closed,
                })
            })
            .collect::<Result<Vec<Segment>>>()?;

        copies.push(Constellation {
            id: format!("{}.{}", constellation.id, copies.len() + 1),
            name: constellation.name.clone(),
            stars,
            segments,
            custom_color: constellation.custom_color,
            parent_id: Some(constellation.id.clone()),
        });
    }
    Ok(copies)
}

/// Map each member to the peer `offset` quadrants away, if every member has one
fn translate(
    field: &SkyField,
    constellation: &Constellation,
    offset: (i32, i32),
) -> Option<HashMap<StarId, StarId>> {
    constellation
        .stars
        .iter()
        .map(|&star| {
            field
                .peers(star)
                .iter()
                .copied()
                .find(|&peer| field.relative_quadrant(peer, star) == offset)
                .map(|peer| (star, peer))
        })
        .collect()
}
