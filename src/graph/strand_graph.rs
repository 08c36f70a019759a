//! The strand graph: a colored multigraph over strand instances
//!
//! Vertices are strand instances; each vertex exposes one site per domain.
//! Three edge sets are tracked: *admissible* edges (site pairs that could
//! hybridize), the *toehold* subset of those, and the *current* edges (bonds
//! actually present). Strand graphs are value types: transitions build a new
//! graph rather than mutating in place.

use super::domain::{Domain, DomainLengths};
use super::strand::{Process, Strand};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors raised while building or rewriting strand graphs
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Process is not well formed (every bond label must occur exactly twice, on complementary domains): {0}")]
    MalformedProcess(String),

    #[error("No declared nucleotide length for domain '{0}'")]
    MissingDomainLength(String),

    #[error("Edge {0} is not admissible")]
    EdgeNotAdmissible(Bond),

    #[error("Edge {0} has an endpoint that is already bound")]
    SiteOccupied(Bond),

    #[error("Edge {0} is not a current edge")]
    EdgeNotCurrent(Bond),

    #[error("Tried to create a species from a non-connected strand graph: {0}")]
    NotConnected(String),
}

/// A binding site: one domain position on one strand vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Site {
    /// Vertex (strand instance) index
    pub vertex: usize,
    /// Domain position along the strand, 5' to 3'
    pub position: usize,
}

impl Site {
    /// Shorthand constructor
    pub fn new(vertex: usize, position: usize) -> Self {
        Self { vertex, position }
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}.{}", self.vertex, self.position)
    }
}

/// An undirected edge between two sites, stored with its endpoints ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bond {
    s1: Site,
    s2: Site,
}

impl Bond {
    /// Create an edge; endpoint order is normalized
    pub fn new(a: Site, b: Site) -> Self {
        if a <= b {
            Self { s1: a, s2: b }
        } else {
            Self { s1: b, s2: a }
        }
    }

    /// The two endpoints, in normalized order
    pub fn sites(&self) -> (Site, Site) {
        (self.s1, self.s2)
    }

    /// Both orientations of the edge
    pub fn both_ways_round(&self) -> [(Site, Site); 2] {
        [(self.s1, self.s2), (self.s2, self.s1)]
    }

    /// Whether `site` is an endpoint
    pub fn contains(&self, site: Site) -> bool {
        self.s1 == site || self.s2 == site
    }

    /// The endpoint opposite `site`, if `site` is an endpoint
    pub fn other_end(&self, site: Site) -> Option<Site> {
        if self.s1 == site {
            Some(self.s2)
        } else if self.s2 == site {
            Some(self.s1)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Bond {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.s1, self.s2)
    }
}

/// A colored multigraph of strand instances with admissible, toehold and
/// current edge sets
#[derive(Debug, Clone)]
pub struct StrandGraph {
    /// The distinct strand types present, sorted: the vertex "colors"
    strand_types: Vec<Strand>,
    /// Per-vertex index into `strand_types`
    vertex_colors: Vec<usize>,
    admissible_edges: BTreeSet<Bond>,
    toehold_edges: BTreeSet<Bond>,
    current_edges: BTreeSet<Bond>,
    lengths: DomainLengths,
}

impl StrandGraph {
    /// Build a strand graph from a well-formed process and its length table
    pub fn from_process(process: &Process, lengths: &DomainLengths) -> Result<Self, GraphError> {
        if !process.well_formed() {
            return Err(GraphError::MalformedProcess(process.compact_string(false)));
        }
        for strand in process.strands() {
            for domain in strand.domains() {
                if lengths.length_of(domain.name()).is_none() {
                    return Err(GraphError::MissingDomainLength(domain.name().to_string()));
                }
            }
        }

        let types: Vec<Strand> = process.strands().iter().map(Strand::strand_type).collect();
        let mut strand_types = types.clone();
        strand_types.sort();
        strand_types.dedup();
        let index: BTreeMap<&Strand, usize> =
            strand_types.iter().enumerate().map(|(i, t)| (t, i)).collect();
        let vertex_colors: Vec<usize> = types.iter().map(|t| index[t]).collect();

        let mut by_label: BTreeMap<&str, Vec<Site>> = BTreeMap::new();
        for (v, strand) in process.strands().iter().enumerate() {
            for (i, domain) in strand.domains().iter().enumerate() {
                if let Some(label) = domain.bond() {
                    by_label.entry(label).or_default().push(Site::new(v, i));
                }
            }
        }
        let current_edges: BTreeSet<Bond> =
            by_label.values().map(|sites| Bond::new(sites[0], sites[1])).collect();

        let (admissible_edges, toehold_edges) =
            compute_edge_sets(&strand_types, &vertex_colors);
        debug_assert!(current_edges.is_subset(&admissible_edges));

        Ok(Self {
            strand_types,
            vertex_colors,
            admissible_edges,
            toehold_edges,
            current_edges,
            lengths: lengths.clone(),
        })
    }

    /// Number of strand vertices
    pub fn num_vertices(&self) -> usize {
        self.vertex_colors.len()
    }

    /// The strand type at a vertex
    pub fn strand_at(&self, vertex: usize) -> &Strand {
        &self.strand_types[self.vertex_colors[vertex]]
    }

    /// The distinct strand types (vertex colors), sorted
    pub fn strand_types(&self) -> &[Strand] {
        &self.strand_types
    }

    /// Per-vertex color indices into `strand_types`
    pub fn vertex_colors(&self) -> &[usize] {
        &self.vertex_colors
    }

    /// The base domain at a site (bond labels stripped)
    pub fn domain_at(&self, site: Site) -> &Domain {
        &self.strand_at(site.vertex).domains()[site.position]
    }

    /// The domain length table this graph was built against
    pub fn lengths(&self) -> &DomainLengths {
        &self.lengths
    }

    /// Nucleotide length of the domain at a site
    pub fn nt_length_at(&self, site: Site) -> u32 {
        self.lengths.length_of(self.domain_at(site).name()).unwrap_or(0)
    }

    /// All sites of the graph, in vertex then position order
    pub fn sites(&self) -> Vec<Site> {
        let mut out = Vec::new();
        for v in 0..self.num_vertices() {
            for i in 0..self.strand_at(v).len() {
                out.push(Site::new(v, i));
            }
        }
        out
    }

    /// The admissible edge set
    pub fn admissible_edges(&self) -> &BTreeSet<Bond> {
        &self.admissible_edges
    }

    /// The toehold subset of the admissible edges
    pub fn toehold_edges(&self) -> &BTreeSet<Bond> {
        &self.toehold_edges
    }

    /// The currently bound edges
    pub fn current_edges(&self) -> &BTreeSet<Bond> {
        &self.current_edges
    }

    /// Admissible edges that are not currently bound
    pub fn possible_new_edges(&self) -> Vec<Bond> {
        self.admissible_edges.difference(&self.current_edges).copied().collect()
    }

    /// Sites incident to a current edge
    pub fn currently_bound_sites(&self) -> BTreeSet<Site> {
        let mut out = BTreeSet::new();
        for e in &self.current_edges {
            let (a, b) = e.sites();
            out.insert(a);
            out.insert(b);
        }
        out
    }

    /// Sites not incident to any current edge
    pub fn currently_unbound_sites(&self) -> Vec<Site> {
        let bound = self.currently_bound_sites();
        self.sites().into_iter().filter(|s| !bound.contains(s)).collect()
    }

    /// The other end of the current edge at `site`, if bound
    pub fn binding_partner(&self, site: Site) -> Option<Site> {
        self.current_edges.iter().find_map(|e| e.other_end(site))
    }

    /// All bound sites on the same vertex as `site` (including `site` itself
    /// when bound)
    pub fn bound_sites_on_same_vertex_as(&self, site: Site) -> Vec<Site> {
        self.currently_bound_sites()
            .into_iter()
            .filter(|s| s.vertex == site.vertex)
            .collect()
    }

    /// The next site toward the 3' end of the same strand
    pub fn three_prime_adjacent_site(&self, site: Site) -> Option<Site> {
        if site.position + 1 < self.strand_at(site.vertex).len() {
            Some(Site::new(site.vertex, site.position + 1))
        } else {
            None
        }
    }

    /// The previous site toward the 5' end of the same strand
    pub fn five_prime_adjacent_site(&self, site: Site) -> Option<Site> {
        if site.position > 0 {
            Some(Site::new(site.vertex, site.position - 1))
        } else {
            None
        }
    }

    /// A new graph with `bond` added to the current edges
    pub fn add_edge(&self, bond: &Bond) -> Result<StrandGraph, GraphError> {
        if !self.admissible_edges.contains(bond) {
            return Err(GraphError::EdgeNotAdmissible(*bond));
        }
        let (a, b) = bond.sites();
        if self.binding_partner(a).is_some() || self.binding_partner(b).is_some() {
            return Err(GraphError::SiteOccupied(*bond));
        }
        let mut next = self.clone();
        next.current_edges.insert(*bond);
        Ok(next)
    }

    /// A new graph with `bond` removed from the current edges
    pub fn remove_edge(&self, bond: &Bond) -> Result<StrandGraph, GraphError> {
        if !self.current_edges.contains(bond) {
            return Err(GraphError::EdgeNotCurrent(*bond));
        }
        let mut next = self.clone();
        next.current_edges.remove(bond);
        Ok(next)
    }

    /// Whether some other current edge has an endpoint strand-adjacent to an
    /// endpoint of `bond`
    pub fn has_adjacent(&self, bond: &Bond) -> bool {
        let (b1, b2) = bond.sites();
        self.current_edges.iter().filter(|e| *e != bond).any(|e| {
            let (a1, a2) = e.sites();
            [a1, a2].into_iter().any(|s| {
                [b1, b2].into_iter().any(|b| {
                    s.vertex == b.vertex
                        && (s.position + 1 == b.position || b.position + 1 == s.position)
                })
            })
        })
    }

    /// Per-vertex connected component indices, numbered in order of the
    /// smallest vertex in each component
    pub fn component_ids(&self) -> Vec<usize> {
        let n = self.num_vertices();
        let mut ids = vec![usize::MAX; n];
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for e in &self.current_edges {
            let (a, b) = e.sites();
            if a.vertex != b.vertex {
                adjacency[a.vertex].push(b.vertex);
                adjacency[b.vertex].push(a.vertex);
            }
        }
        let mut next_id = 0;
        for start in 0..n {
            if ids[start] != usize::MAX {
                continue;
            }
            let mut queue = VecDeque::from([start]);
            ids[start] = next_id;
            while let Some(v) = queue.pop_front() {
                for &w in &adjacency[v] {
                    if ids[w] == usize::MAX {
                        ids[w] = next_id;
                        queue.push_back(w);
                    }
                }
            }
            next_id += 1;
        }
        ids
    }

    /// Whether all vertices lie in a single connected component
    pub fn is_connected(&self) -> bool {
        self.component_ids().iter().all(|&id| id == 0)
    }

    /// Whether two sites currently lie in the same connected component
    pub fn same_species(&self, s1: Site, s2: Site) -> bool {
        let ids = self.component_ids();
        ids[s1.vertex] == ids[s2.vertex]
    }

    /// Split into connected components, each a standalone strand graph
    pub fn connected_components(&self) -> Result<Vec<StrandGraph>, GraphError> {
        let ids = self.component_ids();
        let count = ids.iter().copied().max().map(|m| m + 1).unwrap_or(0);
        let mut components = Vec::with_capacity(count);
        for comp in 0..count {
            let vertices: Vec<usize> =
                (0..self.num_vertices()).filter(|&v| ids[v] == comp).collect();
            let local: BTreeMap<usize, usize> =
                vertices.iter().enumerate().map(|(i, &v)| (v, i)).collect();
            let mut strands: Vec<Strand> =
                vertices.iter().map(|&v| self.strand_at(v).clone()).collect();
            for (n, e) in self
                .current_edges
                .iter()
                .filter(|e| ids[e.sites().0.vertex] == comp)
                .enumerate()
            {
                let label = format!("i{}", n);
                for site in [e.sites().0, e.sites().1] {
                    let v = local[&site.vertex];
                    let domain = strands[v].domains()[site.position].with_bond(label.clone());
                    strands[v] = strands[v].with_domain(site.position, domain);
                }
            }
            components.push(StrandGraph::from_process(&Process::new(strands), &self.lengths)?);
        }
        Ok(components)
    }

    /// Render back to process notation, with fresh bond labels `i0, i1, ...`
    pub fn to_process(&self) -> Process {
        self.to_process_labeled("i")
    }

    fn to_process_labeled(&self, prefix: &str) -> Process {
        let mut strands: Vec<Strand> =
            (0..self.num_vertices()).map(|v| self.strand_at(v).clone()).collect();
        for (n, e) in self.current_edges.iter().enumerate() {
            let label = format!("{}{}", prefix, n);
            for site in [e.sites().0, e.sites().1] {
                let domain = strands[site.vertex].domains()[site.position].with_bond(label.clone());
                strands[site.vertex] = strands[site.vertex].with_domain(site.position, domain);
            }
        }
        Process::new(strands)
    }

    /// Parallel composition: the disjoint union of two strand graphs, with
    /// admissible edges recomputed over the union
    pub fn compose(&self, other: &StrandGraph) -> Result<StrandGraph, GraphError> {
        let left = self.to_process_labeled("a");
        let right = other.to_process_labeled("b");
        let strands: Vec<Strand> =
            left.strands().iter().chain(right.strands().iter()).cloned().collect();
        let mut lengths = self.lengths.clone();
        for (name, decl) in other.lengths.decls() {
            lengths.declare(name, decl.length, decl.is_toehold);
        }
        StrandGraph::from_process(&Process::new(strands), &lengths)
    }
}

impl std::fmt::Display for StrandGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_process().compact_string(false))
    }
}

impl PartialEq for StrandGraph {
    fn eq(&self, other: &Self) -> bool {
        self.strand_types == other.strand_types
            && self.vertex_colors == other.vertex_colors
            && self.current_edges == other.current_edges
    }
}

impl Eq for StrandGraph {}

impl PartialOrd for StrandGraph {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StrandGraph {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.strand_types, &self.vertex_colors, &self.current_edges).cmp(&(
            &other.strand_types,
            &other.vertex_colors,
            &other.current_edges,
        ))
    }
}

impl Hash for StrandGraph {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.strand_types.hash(state);
        self.vertex_colors.hash(state);
        self.current_edges.hash(state);
    }
}

/// Admissible and toehold edge sets over a colored vertex list
fn compute_edge_sets(
    strand_types: &[Strand],
    vertex_colors: &[usize],
) -> (BTreeSet<Bond>, BTreeSet<Bond>) {
    let mut sites: Vec<(Site, &Domain)> = Vec::new();
    for (v, &color) in vertex_colors.iter().enumerate() {
        for (i, domain) in strand_types[color].domains().iter().enumerate() {
            sites.push((Site::new(v, i), domain));
        }
    }
    let mut admissible = BTreeSet::new();
    let mut toehold = BTreeSet::new();
    for (i, (si, di)) in sites.iter().enumerate() {
        for (sj, dj) in sites.iter().skip(i + 1) {
            if di.is_complementary_to(dj) {
                let bond = Bond::new(*si, *sj);
                admissible.insert(bond);
                if di.is_toehold() && dj.is_toehold() {
                    toehold.insert(bond);
                }
            }
        }
    }
    (admissible, toehold)
}
