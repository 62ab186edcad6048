//! Delaunay graph growth (`delaunay`)
//!
//! A single triangulation over every candidate (masters and replicas, so the
//! tile borders have real geometry) defines which pairs of stars may be
//! joined. Constellations grow along those "valid" edges:
//!
//! ```text
//!   seed master ──> nearest unclaimed valid neighbor of any member ──> ...
//!        │                                                            │
//!        │ collapsed to one star                      target reached  │
//!        v                                                            v
//!   lone star: attach to nearest                    radius takeover of
//!   assigned valid neighbor                         close valid neighbors
//! ```
//!
//! Finally each constellation's drawn edges are chosen from the valid edges
//! between its members: every member gets two edges where it can, busy hubs
//! are trimmed and disconnected parts are bridged.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::f64::consts::PI;

use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;
use rand::Rng;
use rand_chacha::ChaChaRng;
use spade::{DelaunayTriangulation, HasPosition, Point2, Triangulation};
use tracing::{debug, info, warn};

use super::common::{annex, nearest_assignment};
use super::ConstellationAlgorithm;
use crate::core::celestial::constellation::Constellation;
use crate::core::celestial::plan::{CandidatePool, ConstellationPlan};
use crate::core::celestial::query::{choose, pick_random_unclaimed_star, DistanceBuckets, Reference};
use crate::core::engine::GenerationContext;
use crate::core::error::{ChartError, Result};
use crate::core::sky::{SkyField, StarId};

/// Lower bound of the random takeover factor
const TAKEOVER_MIN: f64 = 0.2;
/// Upper bound (exclusive) of the random takeover factor
const TAKEOVER_MAX: f64 = 0.4;

/// Preferred number of drawn edges per member
const TARGET_DEGREE: usize = 2;

// =============================================================================
// Construction graph
// =============================================================================

struct StarVertex {
    id: StarId,
    position: Point2<f64>,
}

impl HasPosition for StarVertex {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Valid adjacencies between candidate stars, from a Delaunay triangulation
#[derive(Debug, Clone)]
pub struct ConstructionGraph {
    valid: UnGraphMap<StarId, ()>,
}

impl ConstructionGraph {
    /// Triangulate the positions of `stars`
    pub fn triangulate(field: &SkyField, stars: &[StarId]) -> Result<Self> {
        let mut triangulation: DelaunayTriangulation<StarVertex> = DelaunayTriangulation::new();
        let mut valid = UnGraphMap::with_capacity(stars.len(), stars.len() * 3);

        for &id in stars {
            let p = field.position(id);
            triangulation
                .insert(StarVertex {
                    id,
                    position: Point2::new(p.w, p.h),
                })
                .map_err(|e| {
                    ChartError::graph_invariant(format!("cannot triangulate star {}: {:?}", id, e))
                })?;
            valid.add_node(id);
        }

        for edge in triangulation.undirected_edges() {
            let [a, b] = edge.vertices();
            valid.add_edge(a.data().id, b.data().id, ());
        }

        debug!(
            "Triangulated {} stars into {} valid edges",
            valid.node_count(),
            valid.edge_count()
        );
        Ok(Self { valid })
    }

    /// Stars sharing a valid edge with `id`
    pub fn neighbors(&self, id: StarId) -> impl Iterator<Item = StarId> + '_ {
        self.valid.neighbors(id)
    }

    pub fn is_valid(&self, a: StarId, b: StarId) -> bool {
        self.valid.contains_edge(a, b)
    }

    pub fn node_count(&self) -> usize {
        self.valid.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.valid.edge_count()
    }
}

// =============================================================================
// Growth
// =============================================================================

/// Growth along triangulation edges
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunayGrowth;

impl ConstellationAlgorithm for DelaunayGrowth {
    fn build(
        &self,
        field: &mut SkyField,
        pool: &CandidatePool,
        plan: &ConstellationPlan,
        ctx: &mut GenerationContext,
    ) -> Result<Vec<Constellation>> {
        let rng = &mut ctx.constellation_rng;
        let graph = ConstructionGraph::triangulate(field, pool.stars())?;
        let radius = takeover_radius(field, pool, rng);
        info!("Takeover radius: {:.1}", radius);

        let mut constellations = grow(field, &graph, pool, plan, radius, rng)?;
        for constellation in &mut constellations {
            finalize(field, &graph, constellation);
        }
        Ok(constellations)
    }
}

/// Grow constellations along `graph` until every candidate master is claimed
/// or stranded.
///
/// A star is stranded when it has to be attached before any constellation
/// exists; it stays unclaimed and construction carries on without it.
fn grow(
    field: &mut SkyField,
    graph: &ConstructionGraph,
    pool: &CandidatePool,
    plan: &ConstellationPlan,
    radius: f64,
    rng: &mut ChaChaRng,
) -> Result<Vec<Constellation>> {
    let mut constellations: Vec<Constellation> = Vec::new();
    let mut stranded: HashSet<StarId> = HashSet::new();
    let mut pending: Option<StarId> = None;
    let mut attempts = 0;

    loop {
        let open: Vec<StarId> = pool
            .unclaimed_masters(field)
            .into_iter()
            .filter(|s| !stranded.contains(s))
            .collect();
        let lone = match pending.take() {
            Some(star) => Some(star),
            None => match open.as_slice() {
                [] => break,
                [lone] => Some(*lone),
                _ => None,
            },
        };
        if let Some(lone) = lone {
            if constellations.is_empty() {
                warn!("{} has no constellation to join yet, leaving it out", field.star(lone));
                stranded.insert(lone);
            } else {
                attach_lone_star(field, graph, &mut constellations, lone)?;
            }
            continue;
        }

        let Some(seed) = pick_random_unclaimed_star(field, &open, true, rng) else {
            break;
        };
        let target = plan.target(attempts, rng);
        attempts += 1;
        info!("Growing constellation {} to {} stars from {}", constellations.len(), target, field.star(seed));

        field.take(seed);
        let mut members = vec![seed];
        while members.len() < target {
            let Some(star) = nearest_valid_neighbor(field, graph, &members, rng) else {
                break;
            };
            field.take(star);
            members.push(star);
            debug!("star {}: {}", members.len() - 1, field.star(star));
        }

        if members.len() == 1 {
            debug!("{} has no free neighbor, deferring it", field.star(seed));
            field.untake(seed);
            pending = Some(seed);
            continue;
        }

        take_over(field, graph, &mut members, radius);

        let index = constellations.len();
        for &star in &members {
            field.assign(star, index);
        }
        constellations.push(Constellation {
            stars: members,
            ..Constellation::default()
        });
    }

    Ok(constellations)
}

/// `2 * sqrt(area / (masters * pi)) * U(0.2, 0.4)`, drawn once per run
fn takeover_radius(field: &SkyField, pool: &CandidatePool, rng: &mut ChaChaRng) -> f64 {
    let (width, height) = field.tile_size();
    let masters = pool.masters().len().max(1) as f64;
    2.0 * (width * height / (masters * PI)).sqrt() * rng.random_range(TAKEOVER_MIN..TAKEOVER_MAX)
}

/// The unclaimed valid neighbor closest to the member it neighbors; ties are
/// broken at random.
fn nearest_valid_neighbor(
    field: &SkyField,
    graph: &ConstructionGraph,
    members: &[StarId],
    rng: &mut ChaChaRng,
) -> Option<StarId> {
    let mut best: Option<f64> = None;
    let mut tied: Vec<StarId> = Vec::new();

    for &member in members {
        let neighbors: Vec<StarId> = graph.neighbors(member).collect();
        let buckets = DistanceBuckets::measure(field, Reference::Star(member), &neighbors, true);
        let Some((distance, stars)) = buckets.nearest() else {
            continue;
        };
        match best {
            Some(b) if distance > b => {}
            Some(b) if distance == b => {
                for &star in stars {
                    if !tied.contains(&star) {
                        tied.push(star);
                    }
                }
            }
            _ => {
                best = Some(distance);
                tied = stars.to_vec();
            }
        }
    }

    if tied.is_empty() {
        None
    } else {
        Some(choose(&tied, rng))
    }
}

/// Claim every unclaimed valid neighbor within `radius` of a member until a
/// full scan finds nothing new.
fn take_over(field: &mut SkyField, graph: &ConstructionGraph, members: &mut Vec<StarId>, radius: f64) {
    loop {
        let mut found = Vec::new();
        for &member in members.iter() {
            let origin = field.position(member);
            for neighbor in graph.neighbors(member) {
                if field.is_taken(neighbor) || origin.distance(&field.position(neighbor)) > radius {
                    continue;
                }
                field.take(neighbor);
                found.push(neighbor);
            }
        }
        if found.is_empty() {
            break;
        }
        debug!("Took over {} stars", found.len());
        members.extend(found);
    }
}

/// Attach a lone star (any of its peers) to the constellation holding its
/// nearest assigned valid neighbor.
///
/// A lone star without any assigned valid neighbor means the graph and the
/// claims disagree, which is a [`ChartError::GraphInvariant`].
fn attach_lone_star(
    field: &mut SkyField,
    graph: &ConstructionGraph,
    constellations: &mut [Constellation],
    lone: StarId,
) -> Result<()> {
    let group = field.peers(lone).to_vec();
    let assignment = nearest_assignment(field, &group, |peer| graph.neighbors(peer).collect())
        .ok_or_else(|| {
            ChartError::graph_invariant(format!(
                "lone star {} has no assigned valid neighbor",
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

// =============================================================================
// Finalization
// =============================================================================

fn degree(graph: &UnGraphMap<StarId, ()>, star: StarId) -> usize {
    graph.neighbors(star).count()
}

/// Choose the drawn edges of one constellation and store them as two-star
/// segments.
fn finalize(field: &SkyField, graph: &ConstructionGraph, constellation: &mut Constellation) {
    let members = constellation.stars.clone();
    let member_set: HashSet<StarId> = members.iter().copied().collect();
    let mut connected: UnGraphMap<StarId, ()> = UnGraphMap::with_capacity(members.len(), members.len() * 2);
    for &star in &members {
        connected.add_node(star);
    }

    // Minimum degree
    for &star in &members {
        if degree(&connected, star) >= TARGET_DEGREE {
            continue;
        }
        let mut candidates: Vec<StarId> = graph
            .neighbors(star)
            .filter(|n| member_set.contains(n) && !connected.contains_edge(star, *n))
            .collect();
        candidates.sort_by_key(|&n| (degree(&connected, n), n));
        for candidate in candidates {
            if degree(&connected, star) >= TARGET_DEGREE {
                break;
            }
            connected.add_edge(star, candidate, ());
        }
    }

    trim_degrees(&mut connected, &members);

    // Connectivity repair
    if let Some(&start) = members.first() {
        loop {
            let mut reached = HashSet::new();
            let mut bfs = Bfs::new(&connected, start);
            while let Some(node) = bfs.next(&connected) {
                reached.insert(node);
            }
            if reached.len() == members.len() {
                break;
            }

            let (inside, outside): (Vec<StarId>, Vec<StarId>) =
                members.iter().copied().partition(|s| reached.contains(s));
            let bridge = shortest_bridge(field, &inside, &outside, |a, b| graph.is_valid(a, b))
                .or_else(|| shortest_bridge(field, &inside, &outside, |_, _| true));
            let Some((a, b)) = bridge else {
                break;
            };
            debug!("Bridging {} and {}", a, b);
            connected.add_edge(a, b, ());
        }
    }

    constellation.segments.clear();
    let edges: Vec<(StarId, StarId)> = connected.all_edges().map(|(a, b, _)| (a, b)).collect();
    for (a, b) in edges {
        constellation.draw_segment(vec![a, b], false);
    }
}

/// Drop edges of members above the target degree, busiest neighbor first.
/// An edge only goes when its other end also stays above the target.
fn trim_degrees(connected: &mut UnGraphMap<StarId, ()>, members: &[StarId]) {
    for &star in members {
        if degree(connected, star) <= TARGET_DEGREE {
            continue;
        }
        let mut neighbors: Vec<StarId> = connected.neighbors(star).collect();
        neighbors.sort_by_key(|&n| (Reverse(degree(connected, n)), n));
        for neighbor in neighbors {
            if degree(connected, star) <= TARGET_DEGREE {
                break;
            }
            if degree(connected, neighbor) > TARGET_DEGREE {
                connected.remove_edge(star, neighbor);
            }
        }
    }
}

/// Closest (inside, outside) pair accepted by `allowed`
fn shortest_bridge<F>(field: &SkyField, inside: &[StarId], outside: &[StarId], allowed: F) -> Option<(StarId, StarId)>
where
    F: Fn(StarId, StarId) -> bool,
{
    let mut best: Option<(f64, StarId, StarId)> = None;
    for &a in inside {
        for &b in outside {
            if !allowed(a, b) {
                continue;
            }
            let d = field.position(a).distance(&field.position(b));
            if best.map_or(true, |(bd, _, _)| d < bd) {
                best = Some((d, a, b));
            }
        }
    }
    best.map(|(_, a, b)| (a, b))
}
