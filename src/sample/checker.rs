//! The geometric plausibility oracle
//!
//! A strand graph is plausible when its region graph can be embedded in
//! 3-space: every ds region at exactly its helical length, every ss region
//! within its contour length, and every nicked junction within the allowed
//! bend. The check is rejection sampling: placements are built greedily
//! along a spanning tree of the region graph; edges that would close a cycle
//! are deferred and verified against the finished sample.

use super::constants::{
    DS_LENGTH, NICKEDANGLE_UPPER_BOUND, NICKED_FLAG, SAMPLING_TRIALS, SS_LENGTH,
};
use super::distributions::{Distributions, PlacementInfo};
use super::vec3::Vec3;
use crate::graph::StrandGraph;
use crate::region::{region_graph_from_strand_graph, JunctionId, RegionGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Outcome details of a plausibility query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingInfo {
    /// Number of coordinate samples rejected before success (or until the
    /// trial budget ran out)
    pub unsuccessful_trials: u32,
}

/// One placed junction: its coordinates plus how it was reached
#[derive(Debug, Clone)]
struct Placement {
    coord: Vec3,
    prev: Option<PlacementInfo>,
}

/// Monte-Carlo constraint checker over region graphs
#[derive(Debug)]
pub struct ConstraintChecker {
    rng: StdRng,
    distributions: Distributions,
}

impl Default for ConstraintChecker {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ConstraintChecker {
    /// Create a checker, optionally seeded for deterministic runs
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: rng_from(seed), distributions: Distributions::default() }
    }

    /// Create a checker with custom samplers
    pub fn with_distributions(seed: Option<u64>, distributions: Distributions) -> Self {
        Self { rng: rng_from(seed), distributions }
    }

    /// Reset the RNG; pass `None` for an entropy seed
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.rng = rng_from(seed);
    }

    /// Whether `sg` admits a 3-D embedding, found within the trial budget.
    ///
    /// Disconnected graphs are implausible by definition; the enumerator
    /// always hands over single components.
    pub fn is_plausible(&mut self, sg: &StrandGraph) -> (bool, SamplingInfo) {
        if !sg.is_connected() {
            return (false, SamplingInfo { unsuccessful_trials: 0 });
        }
        let rg = region_graph_from_strand_graph(sg);
        for trial in 0..SAMPLING_TRIALS {
            let sample = self.sample_coordinates(&rg);
            if self.check_constraints(&rg, &sample) {
                trace!(unsuccessful_trials = trial, "structure satisfiable");
                return (true, SamplingInfo { unsuccessful_trials: trial });
            }
        }
        debug!(trials = SAMPLING_TRIALS, species = %sg, "structure not satisfiable");
        (false, SamplingInfo { unsuccessful_trials: SAMPLING_TRIALS })
    }

    /// Assign 3-D coordinates to every junction of the region graph.
    ///
    /// Starting at a random maximum-degree junction at the origin, pending
    /// regions are consumed in random order, helices before single strands.
    /// A popped region whose endpoints are both placed closes a cycle and
    /// imposes no placement; it is checked later as a constraint.
    fn sample_coordinates(&mut self, rg: &RegionGraph) -> BTreeMap<JunctionId, Placement> {
        let Self { rng, distributions } = self;

        let max_degree = rg.find_max_degree_junctions();
        let start = max_degree[rng.gen_range(0..max_degree.len())];

        let mut ds_pending: Vec<usize> = Vec::new();
        let mut ss_pending: Vec<usize> = Vec::new();
        let mut unprocessed: Vec<usize> = Vec::new();
        for (idx, region) in rg.regions().iter().enumerate() {
            if region.is_incident_to(start) {
                if region.double_stranded {
                    ds_pending.push(idx);
                } else {
                    ss_pending.push(idx);
                }
            } else {
                unprocessed.push(idx);
            }
        }

        let mut placed: BTreeMap<JunctionId, Placement> = BTreeMap::new();
        placed.insert(start, Placement { coord: Vec3::zero(), prev: None });

        while !ds_pending.is_empty() || !ss_pending.is_empty() {
            let pending =
                if ds_pending.is_empty() { &mut ss_pending } else { &mut ds_pending };
            let idx = pending.swap_remove(rng.gen_range(0..pending.len()));
            let region = &rg.regions()[idx];

            let (from, to) = if placed.contains_key(&region.v1) {
                (region.v1, region.v2)
            } else {
                (region.v2, region.v1)
            };
            if placed.contains_key(&to) {
                // Cycle-closing region: becomes a distance constraint
                continue;
            }

            let origin = placed[&from].clone();
            let (unit_vec, length, sampled_angle) =
                distributions.sample_point(origin.prev.as_ref(), region.domain(), rng);
            let coord = origin.coord + unit_vec * length;
            placed.insert(
                to,
                Placement {
                    coord,
                    prev: Some(PlacementInfo {
                        unit_vec,
                        region: region.domain(),
                        sampled_angle,
                        prev_label: from,
                    }),
                },
            );

            // Promote newly reachable regions into the pending lists
            let mut still_unreachable = Vec::with_capacity(unprocessed.len());
            for &other in &unprocessed {
                let r = &rg.regions()[other];
                if placed.contains_key(&r.v1) || placed.contains_key(&r.v2) {
                    if r.double_stranded {
                        ds_pending.push(other);
                    } else {
                        ss_pending.push(other);
                    }
                } else {
                    still_unreachable.push(other);
                }
            }
            unprocessed = still_unreachable;
        }
        debug_assert!(unprocessed.is_empty(), "region graph of a connected species");

        placed
    }

    /// Whether a coordinate sample satisfies every distance and angle
    /// constraint simultaneously
    fn check_constraints(&self, rg: &RegionGraph, placed: &BTreeMap<JunctionId, Placement>) -> bool {
        self.check_distance_constraints(rg, placed) && self.check_angle_constraints(rg, placed)
    }

    /// Distance constraints over all regions, including cycle-closing ones:
    /// ds regions pin their endpoints at exactly the helical length, ss
    /// regions bound them by the contour length.
    fn check_distance_constraints(
        &self,
        rg: &RegionGraph,
        placed: &BTreeMap<JunctionId, Placement>,
    ) -> bool {
        for region in rg.regions() {
            let d = placed[&region.v1].coord.distance(placed[&region.v2].coord);
            if region.double_stranded {
                let l = f64::from(region.nt_length) * DS_LENGTH;
                if !approx_eq(d, l) {
                    return false;
                }
            } else {
                let l = f64::from(region.nt_length) * SS_LENGTH;
                if d > l && !approx_eq(d, l) {
                    return false;
                }
            }
        }
        true
    }

    /// Every nicked-junction bend must stay within the allowed upper bound
    fn check_angle_constraints(
        &self,
        rg: &RegionGraph,
        placed: &BTreeMap<JunctionId, Placement>,
    ) -> bool {
        if !NICKED_FLAG {
            return true;
        }
        let coords: BTreeMap<JunctionId, Vec3> =
            placed.iter().map(|(&j, p)| (j, p.coord)).collect();
        rg.compute_nicked_angles(&coords)
            .iter()
            .all(|&(_, angle)| angle <= NICKEDANGLE_UPPER_BOUND)
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Relative floating-point comparison (tolerance 1e-9)
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}
