//! The region graph data model
//!
//! Vertices are *junctions* (nicks, branch points, free ends); edges are
//! *regions*: maximal runs of contiguous single- or double-stranded sites of
//! known total nucleotide length. Parallel edges and self-loops are allowed.

use crate::graph::Site;
use crate::sample::Vec3;
use std::collections::BTreeMap;

/// A junction vertex in the region graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JunctionId(pub usize);

impl std::fmt::Display for JunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "j{}", self.0)
    }
}

/// The physical character of one contiguous region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionDomain {
    /// Paired (helical) vs unpaired
    pub double_stranded: bool,
    /// Total nucleotide length of the run
    pub nt_length: u32,
}

/// A region edge between two junctions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// The two junction endpoints (equal for self-loops)
    pub v1: JunctionId,
    pub v2: JunctionId,
    /// Paired (helical) vs unpaired
    pub double_stranded: bool,
    /// Total nucleotide length of the run
    pub nt_length: u32,
    /// The strand-graph sites the region was collapsed from
    pub sites: Vec<Site>,
}

impl Region {
    /// The physical character of this region
    pub fn domain(&self) -> RegionDomain {
        RegionDomain { double_stranded: self.double_stranded, nt_length: self.nt_length }
    }

    /// Whether `junction` is an endpoint
    pub fn is_incident_to(&self, junction: JunctionId) -> bool {
        self.v1 == junction || self.v2 == junction
    }

    /// The endpoint opposite `junction` (for self-loops, `junction` itself)
    pub fn other_end(&self, junction: JunctionId) -> JunctionId {
        if self.v1 == junction {
            self.v2
        } else {
            self.v1
        }
    }
}

/// Two double-stranded regions abutting across a nick
///
/// The pair meets at `junction` along one continuous strand; the
/// complementary strand is interrupted there. The angle between the two
/// helices is constrained during plausibility checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NickedPair {
    pub junction: JunctionId,
    /// Indices into the region list: the helix entered and the helix left
    pub first: usize,
    pub second: usize,
}

/// A region graph derived from a strand graph
#[derive(Debug, Clone)]
pub struct RegionGraph {
    junction_count: usize,
    regions: Vec<Region>,
    nicked: Vec<NickedPair>,
}

impl RegionGraph {
    pub(crate) fn new(junction_count: usize, regions: Vec<Region>, nicked: Vec<NickedPair>) -> Self {
        Self { junction_count, regions, nicked }
    }

    /// Number of junction vertices
    pub fn junction_count(&self) -> usize {
        self.junction_count
    }

    /// All region edges
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// All nicked junction pairs
    pub fn nicked_pairs(&self) -> &[NickedPair] {
        &self.nicked
    }

    /// Number of regions incident to a junction (self-loops counted once)
    pub fn degree(&self, junction: JunctionId) -> usize {
        self.regions.iter().filter(|r| r.is_incident_to(junction)).count()
    }

    /// All junctions tied for the maximum incidence count
    pub fn find_max_degree_junctions(&self) -> Vec<JunctionId> {
        let degrees: Vec<usize> =
            (0..self.junction_count).map(|j| self.degree(JunctionId(j))).collect();
        let max = degrees.iter().copied().max().unwrap_or(0);
        degrees
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == max)
            .map(|(j, _)| JunctionId(j))
            .collect()
    }

    /// For each nicked junction pair, the 3-D angle between the two incident
    /// helices: the deviation from coaxial alignment, in degrees
    /// (0 = perfectly stacked).
    pub fn compute_nicked_angles(
        &self,
        coords: &BTreeMap<JunctionId, Vec3>,
    ) -> Vec<(JunctionId, f64)> {
        let mut out = Vec::with_capacity(self.nicked.len());
        for pair in &self.nicked {
            let center = coords[&pair.junction];
            let entry_far = coords[&self.regions[pair.first].other_end(pair.junction)];
            let exit_far = coords[&self.regions[pair.second].other_end(pair.junction)];
            let incoming = (center - entry_far).normalized();
            let outgoing = (exit_far - center).normalized();
            let angle = match (incoming, outgoing) {
                (Some(u), Some(v)) => u.dot(v).clamp(-1.0, 1.0).acos().to_degrees(),
                // Degenerate (zero-length) helix placement; no bend measurable
                _ => 0.0,
            };
            out.push((pair.junction, angle));
        }
        out
    }
}
