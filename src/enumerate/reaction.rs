//! Reaction records and reversible-pair merging

use super::transition::TransitionKind;
use crate::graph::{Bond, Species};

/// Provenance of a reaction: which transition produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionMetadata {
    pub kind: TransitionKind,
    pub edges_added: Vec<Bond>,
    pub edges_removed: Vec<Bond>,
}

/// A (possibly reversible) reaction over species multisets
///
/// Reactant and product lists are kept sorted so they compare as multisets.
/// Equality ignores metadata.
#[derive(Debug, Clone)]
pub struct Reaction {
    reactants: Vec<Species>,
    fwd_rate: f64,
    products: Vec<Species>,
    bwd_rate: Option<f64>,
    metadata: Option<ReactionMetadata>,
}

impl Reaction {
    /// Create an irreversible reaction
    pub fn new(
        mut reactants: Vec<Species>,
        fwd_rate: f64,
        mut products: Vec<Species>,
        metadata: Option<ReactionMetadata>,
    ) -> Self {
        reactants.sort();
        products.sort();
        Self { reactants, fwd_rate, products, bwd_rate: None, metadata }
    }

    /// The reactant multiset, sorted
    pub fn reactants(&self) -> &[Species] {
        &self.reactants
    }

    /// The product multiset, sorted
    pub fn products(&self) -> &[Species] {
        &self.products
    }

    /// Forward rate constant
    pub fn fwd_rate(&self) -> f64 {
        self.fwd_rate
    }

    /// Backward rate constant, present after a reversible merge
    pub fn bwd_rate(&self) -> Option<f64> {
        self.bwd_rate
    }

    /// Whether this record covers both directions
    pub fn is_reversible(&self) -> bool {
        self.bwd_rate.is_some()
    }

    /// Transition provenance, if recorded
    pub fn metadata(&self) -> Option<&ReactionMetadata> {
        self.metadata.as_ref()
    }

    /// Every species appearing on either side
    pub fn species_involved(&self) -> impl Iterator<Item = &Species> {
        self.reactants.iter().chain(self.products.iter())
    }

    /// Structural sanity: nonempty sides and positive rates
    pub fn is_valid(&self) -> bool {
        !self.reactants.is_empty()
            && !self.products.is_empty()
            && self.fwd_rate > 0.0
            && self.bwd_rate.map(|r| r > 0.0).unwrap_or(true)
    }

    /// Try to absorb `other` into this record: duplicates collapse, and an
    /// irreversible reverse of an irreversible record merges into one
    /// bidirectional record. Returns the combined reaction, or `None` when
    /// the two are unrelated.
    pub fn try_combine(&self, other: &Reaction) -> Option<Reaction> {
        let same_direction = self.reactants == other.reactants
            && self.products == other.products
            && self.fwd_rate == other.fwd_rate;
        if same_direction && (other.bwd_rate.is_none() || other.bwd_rate == self.bwd_rate) {
            return Some(self.clone());
        }
        let reverse_direction =
            self.reactants == other.products && self.products == other.reactants;
        if reverse_direction && other.bwd_rate.is_none() {
            return match self.bwd_rate {
                None => Some(Reaction { bwd_rate: Some(other.fwd_rate), ..self.clone() }),
                Some(bwd) if bwd == other.fwd_rate => Some(self.clone()),
                Some(_) => None,
            };
        }
        None
    }
}

impl PartialEq for Reaction {
    fn eq(&self, other: &Self) -> bool {
        self.reactants == other.reactants
            && self.products == other.products
            && self.fwd_rate == other.fwd_rate
            && self.bwd_rate == other.bwd_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{species_list_from_process, DomainLengths};
    use crate::parse::{parse_domain_lengths, parse_process};

    fn species(text: &str, lengths: &DomainLengths) -> Vec<Species> {
        species_list_from_process(&parse_process(text).unwrap(), lengths).unwrap()
    }

    fn setup() -> (Vec<Species>, Vec<Species>) {
        let l = parse_domain_lengths("toeholdDomain t length 5").unwrap();
        let singles = species("( <t^> | <t^*> )", &l);
        let duplex = species("( <t^!i1> | <t^*!i1> )", &l);
        (singles, duplex)
    }

    #[test]
    fn equality_ignores_metadata_and_reactant_order() {
        let (singles, duplex) = setup();
        let mut reversed = singles.clone();
        reversed.reverse();
        let a = Reaction::new(singles, 0.003, duplex.clone(), None);
        let b = Reaction::new(
            reversed,
            0.003,
            duplex,
            Some(ReactionMetadata {
                kind: TransitionKind::Binding,
                edges_added: Vec::new(),
                edges_removed: Vec::new(),
            }),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn reverse_pair_merges_into_reversible_record() {
        let (singles, duplex) = setup();
        let fwd = Reaction::new(singles.clone(), 0.003, duplex.clone(), None);
        let bwd = Reaction::new(duplex, 0.1, singles, None);
        let merged = fwd.try_combine(&bwd).unwrap();
        assert!(merged.is_reversible());
        assert_eq!(merged.fwd_rate(), 0.003);
        assert_eq!(merged.bwd_rate(), Some(0.1));
        // Absorbing the reverse again changes nothing
        assert_eq!(merged.try_combine(&bwd).unwrap(), merged);
    }

    #[test]
    fn unrelated_reactions_do_not_combine() {
        let (singles, duplex) = setup();
        let fwd = Reaction::new(singles.clone(), 0.003, duplex.clone(), None);
        let other = Reaction::new(duplex, 0.2, singles, None);
        // Same shape as the reverse but a different rate was already merged
        let merged = fwd.try_combine(&other).unwrap();
        assert_eq!(merged.bwd_rate(), Some(0.2));
        let conflicting = Reaction::new(merged.products().to_vec(), 0.9, merged.reactants().to_vec(), None);
        assert!(merged.try_combine(&conflicting).is_none());
    }
}
