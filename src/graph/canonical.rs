//! Canonical labeling for strand graphs
//!
//! Two strand graphs are isomorphic iff their canonical forms are equal.
//! The labeling is found by iterative partition refinement on vertex
//! signatures, followed by an exhaustive search over the remaining
//! within-cell orderings for the lexicographically minimal current-edge
//! encoding. Refinement cells never mix strand types, so the canonical
//! vertex order always lists colors nondecreasing.

use super::strand::{Process, Strand};
use super::strand_graph::{Bond, GraphError, Site, StrandGraph};
use std::collections::BTreeMap;

/// Rebuild `sg` under its canonical vertex labeling
pub(crate) fn canonical_form(sg: &StrandGraph) -> Result<StrandGraph, GraphError> {
    let order = canonical_order(sg);
    let new_index: BTreeMap<usize, usize> =
        order.iter().enumerate().map(|(new, &old)| (old, new)).collect();

    let mut strands: Vec<Strand> =
        order.iter().map(|&old| sg.strand_at(old).clone()).collect();
    let remapped = remap_edges(sg.current_edges().iter(), &new_index);
    for (n, e) in remapped.iter().enumerate() {
        let label = format!("i{}", n);
        for site in [e.sites().0, e.sites().1] {
            let domain = strands[site.vertex].domains()[site.position].with_bond(label.clone());
            strands[site.vertex] = strands[site.vertex].with_domain(site.position, domain);
        }
    }
    StrandGraph::from_process(&Process::new(strands), sg.lengths())
}

/// The canonical vertex order: `order[new_index] = old_vertex`
fn canonical_order(sg: &StrandGraph) -> Vec<usize> {
    let cells = refine(sg);
    let mut best: Option<(Vec<Bond>, Vec<usize>)> = None;
    let mut order = Vec::with_capacity(sg.num_vertices());
    search(sg, &cells, 0, &mut vec![false; sg.num_vertices()], &mut order, &mut best);
    match best {
        Some((_, order)) => order,
        // Zero-vertex graphs have a single (empty) labeling
        None => Vec::new(),
    }
}

/// Iterative refinement: partition vertices into cells by color, then split
/// repeatedly on current-edge signatures until the partition is stable.
/// Returns cells in canonical order; all vertices in a cell share a color.
fn refine(sg: &StrandGraph) -> Vec<Vec<usize>> {
    let n = sg.num_vertices();
    let mut cell_of: Vec<usize> = sg.vertex_colors().to_vec();
    loop {
        // Signature: for each incident current edge, the local position and
        // the partner's cell and position, marking self-edges.
        let signature = |v: usize| -> Vec<(usize, usize, usize, bool)> {
            let mut sig = Vec::new();
            for e in sg.current_edges() {
                for (a, b) in e.both_ways_round() {
                    if a.vertex == v {
                        sig.push((a.position, cell_of[b.vertex], b.position, a.vertex == b.vertex));
                    }
                }
            }
            sig.sort();
            sig
        };
        let keys: Vec<(usize, Vec<(usize, usize, usize, bool)>)> =
            (0..n).map(|v| (cell_of[v], signature(v))).collect();
        let mut distinct: Vec<&(usize, Vec<(usize, usize, usize, bool)>)> = keys.iter().collect();
        distinct.sort();
        distinct.dedup();
        let new_cell_of: Vec<usize> = (0..n)
            .map(|v| {
                distinct
                    .binary_search(&&keys[v])
                    .unwrap_or(usize::MAX)
            })
            .collect();
        if new_cell_of == cell_of {
            break;
        }
        cell_of = new_cell_of;
    }

    let cell_count = cell_of.iter().copied().max().map(|m| m + 1).unwrap_or(0);
    let mut cells: Vec<Vec<usize>> = vec![Vec::new(); cell_count];
    for (v, &c) in cell_of.iter().enumerate() {
        cells[c].push(v);
    }
    cells
}

/// Exhaustive search over within-cell orderings for the minimal edge encoding
fn search(
    sg: &StrandGraph,
    cells: &[Vec<usize>],
    cell_idx: usize,
    used: &mut Vec<bool>,
    order: &mut Vec<usize>,
    best: &mut Option<(Vec<Bond>, Vec<usize>)>,
) {
    if cell_idx == cells.len() {
        let new_index: BTreeMap<usize, usize> =
            order.iter().enumerate().map(|(new, &old)| (old, new)).collect();
        let key = remap_edges(sg.current_edges().iter(), &new_index);
        match best {
            Some((best_key, _)) if *best_key <= key => {}
            _ => *best = Some((key, order.clone())),
        }
        return;
    }
    let cell = &cells[cell_idx];
    let placed_from_cell = order.len() - cells[..cell_idx].iter().map(Vec::len).sum::<usize>();
    if placed_from_cell == cell.len() {
        search(sg, cells, cell_idx + 1, used, order, best);
        return;
    }
    for &v in cell {
        if used[v] {
            continue;
        }
        used[v] = true;
        order.push(v);
        search(sg, cells, cell_idx, used, order, best);
        order.pop();
        used[v] = false;
    }
}

fn remap_edges<'a>(
    edges: impl Iterator<Item = &'a Bond>,
    new_index: &BTreeMap<usize, usize>,
) -> Vec<Bond> {
    let mut out: Vec<Bond> = edges
        .map(|e| {
            let (a, b) = e.sites();
            Bond::new(
                Site::new(new_index[&a.vertex], a.position),
                Site::new(new_index[&b.vertex], b.position),
            )
        })
        .collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DomainLengths;
    use crate::parse::{parse_domain_lengths, parse_process};

    fn graph(text: &str, lengths: &DomainLengths) -> StrandGraph {
        StrandGraph::from_process(&parse_process(text).unwrap(), lengths).unwrap()
    }

    fn lengths(text: &str) -> DomainLengths {
        parse_domain_lengths(text).unwrap()
    }

    #[test]
    fn relabeled_bonds_canonicalize_identically() {
        let l = lengths("toeholdDomain t length 5 longDomain x length 20");
        let a = graph("( <t^!p x!q> | <x*!q t^*!p> )", &l);
        let b = graph("( <t^!u1 x!u2> | <x*!u2 t^*!u1> )", &l);
        assert_eq!(canonical_form(&a).unwrap(), canonical_form(&b).unwrap());
    }

    #[test]
    fn strand_order_does_not_affect_canonical_form() {
        let l = lengths("toeholdDomain t length 5 longDomain x length 20");
        let a = graph("( <t^ x> | <x!i1> | <x*!i1 t^*> )", &l);
        let b = graph("( <x*!j t^*> | <t^ x> | <x!j> )", &l);
        assert_eq!(canonical_form(&a).unwrap(), canonical_form(&b).unwrap());
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let l = lengths("longDomain A length 20 longDomain B length 20");
        let g = graph("( <A!i1> | <A B!i2> | <B*!i2 A*!i1> )", &l);
        let once = canonical_form(&g).unwrap();
        let twice = canonical_form(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn distinguishes_nonisomorphic_bonding_patterns() {
        let l = lengths("longDomain A length 20 longDomain B length 20");
        // Same strand multiset, different hybridization structure
        let a = graph("( <A!i1 B> | <B*!i2 A*!i1> | <A B!i2> )", &l);
        let b = graph("( <A!i1 B!i2> | <B*!i2 A*!i1> | <A B> )", &l);
        assert_ne!(canonical_form(&a).unwrap(), canonical_form(&b).unwrap());
    }

    #[test]
    fn symmetric_ring_has_a_stable_canonical_form() {
        let l = lengths("longDomain A length 20 longDomain B length 20");
        let a = graph(
            "( <A!i1 B!i2> | <B*!i2 A*!i3> | <A!i3 B!i4> | <B*!i4 A*!i1> )",
            &l,
        );
        // The same ring entered rotated by one strand pair
        let b = graph(
            "( <A!i3 B!i4> | <B*!i4 A*!i1> | <A!i1 B!i2> | <B*!i2 A*!i3> )",
            &l,
        );
        assert_eq!(canonical_form(&a).unwrap(), canonical_form(&b).unwrap());
    }
}
