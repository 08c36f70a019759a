//! Region graph construction from a strand graph
//!
//! The walk collapses runs of adjacent paired/unpaired sites into regions.
//! Junction identity comes from gluing strand boundaries across bonds: when
//! sites (v, i) and (w, j) are paired, the boundary 5' of (v, i) coincides
//! in space with the boundary 3' of (w, j), and vice versa. Region endpoints
//! are the equivalence classes of boundaries under that gluing.

use super::region_graph::{JunctionId, NickedPair, Region, RegionGraph};
use crate::graph::{Site, StrandGraph};
use std::collections::{BTreeSet, HashMap};

/// Derive the region graph of a strand graph
pub fn region_graph_from_strand_graph(sg: &StrandGraph) -> RegionGraph {
    // Boundary b of vertex v sits 5' of site (v, b); boundary len(v) is the
    // 3' end of the strand.
    let mut offsets = Vec::with_capacity(sg.num_vertices());
    let mut total = 0;
    for v in 0..sg.num_vertices() {
        offsets.push(total);
        total += sg.strand_at(v).len() + 1;
    }
    let boundary = |site_vertex: usize, b: usize| offsets[site_vertex] + b;

    let mut glue = UnionFind::new(total);
    let mut partner: HashMap<Site, Site> = HashMap::new();
    for e in sg.current_edges() {
        let (a, b) = e.sites();
        partner.insert(a, b);
        partner.insert(b, a);
        glue.union(boundary(a.vertex, a.position), boundary(b.vertex, b.position + 1));
        glue.union(boundary(a.vertex, a.position + 1), boundary(b.vertex, b.position));
    }

    // Collect maximal runs per strand: (vertex, start, end, paired)
    let mut raw_regions: Vec<(usize, usize, usize, bool)> = Vec::new();
    for v in 0..sg.num_vertices() {
        let len = sg.strand_at(v).len();
        let mut i = 0;
        while i < len {
            let start = i;
            let paired = partner.contains_key(&Site::new(v, i));
            while i + 1 < len && continues_run(&partner, v, i, paired) {
                i += 1;
            }
            raw_regions.push((v, start, i, paired));
            i += 1;
        }
    }

    // Materialize regions, deduplicating each helix (seen from both strands)
    // by its bond set. Track which region each paired site belongs to for
    // nick detection.
    let mut seen_helices: BTreeSet<BTreeSet<(Site, Site)>> = BTreeSet::new();
    let mut region_of_site: HashMap<Site, usize> = HashMap::new();
    let mut built: Vec<(usize, usize, bool, u32, Vec<Site>)> = Vec::new();
    for &(v, start, end, paired) in &raw_regions {
        let run_sites: Vec<Site> = (start..=end).map(|i| Site::new(v, i)).collect();
        let nt: u32 = run_sites.iter().map(|&s| sg.nt_length_at(s)).sum();
        if paired {
            let bonds: BTreeSet<(Site, Site)> = run_sites
                .iter()
                .map(|&s| {
                    let p = partner[&s];
                    if s <= p {
                        (s, p)
                    } else {
                        (p, s)
                    }
                })
                .collect();
            if !seen_helices.insert(bonds) {
                continue;
            }
            let mut sites = run_sites.clone();
            sites.extend(run_sites.iter().map(|s| partner[s]));
            let idx = built.len();
            for &s in &sites {
                region_of_site.insert(s, idx);
            }
            built.push((boundary(v, start), boundary(v, end + 1), true, nt, sites));
        } else {
            let idx = built.len();
            for &s in &run_sites {
                region_of_site.insert(s, idx);
            }
            built.push((boundary(v, start), boundary(v, end + 1), false, nt, run_sites));
        }
    }

    // Dense junction ids over the boundary classes that appear as endpoints
    let mut roots: Vec<usize> = built
        .iter()
        .flat_map(|&(b1, b2, _, _, _)| [glue.find(b1), glue.find(b2)])
        .collect();
    roots.sort_unstable();
    roots.dedup();
    let junction_of = |root: usize| JunctionId(roots.binary_search(&root).unwrap_or(0));

    let regions: Vec<Region> = built
        .into_iter()
        .map(|(b1, b2, double_stranded, nt_length, sites)| Region {
            v1: junction_of(glue.find(b1)),
            v2: junction_of(glue.find(b2)),
            double_stranded,
            nt_length,
            sites,
        })
        .collect();

    // Nicked junctions: consecutive paired sites on one strand that fall in
    // different helix regions. The strand runs through; its complement is
    // interrupted, so the two helices share an axis across a nick.
    let mut nicked = Vec::new();
    for v in 0..sg.num_vertices() {
        for i in 0..sg.strand_at(v).len().saturating_sub(1) {
            let here = Site::new(v, i);
            let next = Site::new(v, i + 1);
            if !partner.contains_key(&here) || !partner.contains_key(&next) {
                continue;
            }
            let (first, second) = (region_of_site[&here], region_of_site[&next]);
            if first != second {
                nicked.push(NickedPair {
                    junction: junction_of(glue.find(boundary(v, i + 1))),
                    first,
                    second,
                });
            }
        }
    }

    RegionGraph::new(roots.len(), regions, nicked)
}

/// Whether the run at (v, i) extends to site i+1: same strandedness, and for
/// helices the partner must continue antiparallel on the same strand.
fn continues_run(partner: &HashMap<Site, Site>, v: usize, i: usize, paired: bool) -> bool {
    let next = Site::new(v, i + 1);
    match (paired, partner.get(&Site::new(v, i)), partner.get(&next)) {
        (false, _, None) => true,
        (true, Some(p), Some(q)) => {
            q.vertex == p.vertex && p.position > 0 && q.position == p.position - 1
        }
        _ => false,
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DomainLengths;
    use crate::parse::{parse_domain_lengths, parse_process};

    fn lengths(text: &str) -> DomainLengths {
        parse_domain_lengths(text).unwrap()
    }

    fn graph(text: &str, lengths: &DomainLengths) -> StrandGraph {
        StrandGraph::from_process(&parse_process(text).unwrap(), lengths).unwrap()
    }

    #[test]
    fn lone_strand_is_one_ss_region() {
        let l = lengths("longDomain x length 20");
        let rg = region_graph_from_strand_graph(&graph("<x>", &l));
        assert_eq!(rg.regions().len(), 1);
        assert_eq!(rg.junction_count(), 2);
        let r = &rg.regions()[0];
        assert!(!r.double_stranded);
        assert_eq!(r.nt_length, 20);
        assert!(rg.nicked_pairs().is_empty());
    }

    #[test]
    fn contiguous_duplex_collapses_to_one_region() {
        // Both strands continue across the domain boundary, so x and y merge
        // into a single 40 nt helix with no internal junction.
        let l = lengths("longDomain x length 20 longDomain y length 20");
        let rg = region_graph_from_strand_graph(&graph("( <x!i1 y!i2> | <y*!i2 x*!i1> )", &l));
        assert_eq!(rg.regions().len(), 1);
        let r = &rg.regions()[0];
        assert!(r.double_stranded);
        assert_eq!(r.nt_length, 40);
        assert!(rg.nicked_pairs().is_empty());
    }

    #[test]
    fn nick_between_abutting_helices_is_detected() {
        // <x y> hybridized by two separate single-domain strands: the top
        // strand runs through, the bottom is nicked between the helices.
        let l = lengths("longDomain x length 20 longDomain y length 20");
        let rg = region_graph_from_strand_graph(&graph("( <x!i1 y!i2> | <x*!i1> | <y*!i2> )", &l));
        let ds: Vec<_> = rg.regions().iter().filter(|r| r.double_stranded).collect();
        assert_eq!(ds.len(), 2);
        assert_eq!(rg.nicked_pairs().len(), 1);
        let nick = rg.nicked_pairs()[0];
        assert_ne!(nick.first, nick.second);
        // Both regions at the nick are incident to the nick junction
        assert!(rg.regions()[nick.first].is_incident_to(nick.junction));
        assert!(rg.regions()[nick.second].is_incident_to(nick.junction));
    }

    #[test]
    fn toehold_gate_has_nick_and_dangle() {
        let l = lengths("toeholdDomain t length 5 longDomain x length 20");
        let sg = graph("( <t^!i2 x> | <x!i1> | <x*!i1 t^*!i2> )", &l);
        let rg = region_graph_from_strand_graph(&sg);
        // Regions: t helix (5 nt ds), x helix (20 nt ds), x dangle (20 nt ss)
        assert_eq!(rg.regions().len(), 3);
        assert_eq!(rg.nicked_pairs().len(), 1);
        let ss: Vec<_> = rg.regions().iter().filter(|r| !r.double_stranded).collect();
        assert_eq!(ss.len(), 1);
        assert_eq!(ss[0].nt_length, 20);
    }

    #[test]
    fn hairpin_loop_is_a_self_loop_region() {
        let l = lengths(
            "longDomain x length 20 toeholdDomain spcr1 length 6 \
             toeholdDomain spcr2 length 6 longDomain y length 20",
        );
        let rg = region_graph_from_strand_graph(&graph("<x!i1 spcr1^ y* spcr2^ x*!i1>", &l));
        // Stem helix plus one 32 nt unpaired loop closing on the stem-top
        assert_eq!(rg.regions().len(), 2);
        let loop_region = rg.regions().iter().find(|r| !r.double_stranded).unwrap();
        assert_eq!(loop_region.nt_length, 32);
        assert_eq!(loop_region.v1, loop_region.v2);
        let stem = rg.regions().iter().find(|r| r.double_stranded).unwrap();
        assert_eq!(stem.nt_length, 20);
    }

    #[test]
    fn max_degree_junction_is_the_branch_point() {
        let l = lengths(
            "longDomain x length 20 toeholdDomain spcr1 length 6 \
             toeholdDomain spcr2 length 6 longDomain y length 20",
        );
        let sg = graph("( <x!i1 spcr1^ y*!i2 spcr2^ x*!i1> | <y!i2> )", &l);
        let rg = region_graph_from_strand_graph(&sg);
        // Stem-top sees the stem helix and both spacer regions
        let max = rg.find_max_degree_junctions();
        assert_eq!(max.len(), 1);
        assert_eq!(rg.degree(max[0]), 3);
    }

    #[test]
    fn four_way_junction_meets_at_one_vertex() {
        let l = lengths(
            "longDomain A length 20 longDomain B length 20 longDomain E length 20 \
             longDomain F length 20 longDomain G length 20 longDomain H length 20",
        );
        let sg = graph(
            "( <E!i5 A!i1 B!i2 F!i7> | <F*!i7 B*!i2 A*!i3 G*!i6> \
             | <G!i6 A!i3 B!i4 H!i8> | <H*!i8 B*!i4 A*!i1 E*!i5> )",
            &l,
        );
        let rg = region_graph_from_strand_graph(&sg);
        // Four 40 nt arms radiating from a single central junction
        assert_eq!(rg.regions().len(), 4);
        assert!(rg.regions().iter().all(|r| r.double_stranded && r.nt_length == 40));
        let max = rg.find_max_degree_junctions();
        assert_eq!(max.len(), 1);
        assert_eq!(rg.degree(max[0]), 4);
        // Each of the four strands crosses the center, giving four nicks
        assert_eq!(rg.nicked_pairs().len(), 4);
    }
}
