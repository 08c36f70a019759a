//! Species: connected strand graphs in canonical form

use super::canonical::canonical_form;
use super::domain::DomainLengths;
use super::strand::Process;
use super::strand_graph::{GraphError, StrandGraph};

/// A connected strand graph held in canonical form
///
/// Species are the unit of CRN membership: two species are equal iff their
/// canonical forms are equal, so equality and hashing see through bond
/// relabelings and strand reorderings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Species {
    graph: StrandGraph,
}

impl Species {
    /// Canonicalize a connected strand graph into a species.
    ///
    /// Fails if the graph is not connected; callers must split into
    /// components first.
    pub fn from_strand_graph(sg: &StrandGraph) -> Result<Species, GraphError> {
        if !sg.is_connected() {
            return Err(GraphError::NotConnected(sg.to_string()));
        }
        Ok(Species { graph: canonical_form(sg)? })
    }

    /// The underlying canonical strand graph
    pub fn graph(&self) -> &StrandGraph {
        &self.graph
    }

    /// Number of strands in the complex
    pub fn num_strands(&self) -> usize {
        self.graph.num_vertices()
    }

    /// Render as a process term with fresh bond labels
    pub fn to_process(&self) -> Process {
        self.graph.to_process()
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_process().compact_string(false))
    }
}

/// Split a process into its connected species
pub fn species_list_from_process(
    process: &Process,
    lengths: &DomainLengths,
) -> Result<Vec<Species>, GraphError> {
    let sg = StrandGraph::from_process(process, lengths)?;
    sg.connected_components()?
        .iter()
        .map(Species::from_strand_graph)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_domain_lengths, parse_process};

    #[test]
    fn species_equality_ignores_bond_labels() {
        let lengths = parse_domain_lengths("longDomain x length 20").unwrap();
        let a = parse_process("( <x!p> | <x*!p> )").unwrap();
        let b = parse_process("( <x*!q7> | <x!q7> )").unwrap();
        let sa = species_list_from_process(&a, &lengths).unwrap();
        let sb = species_list_from_process(&b, &lengths).unwrap();
        assert_eq!(sa.len(), 1);
        assert_eq!(sa, sb);
    }

    #[test]
    fn disconnected_graph_is_rejected() {
        let lengths = parse_domain_lengths("longDomain x length 20").unwrap();
        let p = parse_process("( <x> | <x*> )").unwrap();
        let sg = StrandGraph::from_process(&p, &lengths).unwrap();
        assert!(matches!(
            Species::from_strand_graph(&sg),
            Err(GraphError::NotConnected(_))
        ));
    }

    #[test]
    fn process_splits_into_connected_species() {
        let lengths =
            parse_domain_lengths("toeholdDomain t length 5 longDomain x length 20").unwrap();
        let p = parse_process("( <t^ x> | <x!i1> | <x*!i1 t^*> )").unwrap();
        let species = species_list_from_process(&p, &lengths).unwrap();
        assert_eq!(species.len(), 2);
        let sizes: Vec<usize> = species.iter().map(Species::num_strands).collect();
        assert!(sizes.contains(&1));
        assert!(sizes.contains(&2));
    }
}
