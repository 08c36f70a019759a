//! The geometric reaction enumerator
//!
//! Transition discovery (binding, toehold unbinding, three- and four-way
//! branch migration) plus a fixed-point closure over species and species
//! pairs. Every candidate product complex is vetted by the plausibility
//! oracle; verdicts are cached per canonical species.

use super::crn::Crn;
use super::reaction::{Reaction, ReactionMetadata};
use super::settings::{EnumerationMode, EnumeratorSettings};
use super::transition::{Transition, TransitionKind};
use super::EnumerateError;
use crate::graph::{species_list_from_process, Bond, DomainLengths, Process, Species, StrandGraph};
use crate::parse::{parse_domain_lengths, parse_process};
use crate::sample::{ConstraintChecker, SamplingInfo};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info, trace};

/// Enumerates the CRN reachable from a set of initial species
pub struct GeometricEnumerator {
    settings: EnumeratorSettings,
    checker: ConstraintChecker,
    plausible: HashMap<Species, SamplingInfo>,
    implausible: HashMap<Species, SamplingInfo>,
}

impl std::fmt::Debug for GeometricEnumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometricEnumerator")
            .field("settings", &self.settings)
            .field("plausible", &self.plausible.len())
            .field("implausible", &self.implausible.len())
            .finish()
    }
}

impl GeometricEnumerator {
    /// Create an enumerator; fails on invalid settings
    pub fn new(
        settings: EnumeratorSettings,
        checker: ConstraintChecker,
    ) -> Result<Self, EnumerateError> {
        settings.validate()?;
        Ok(Self {
            settings,
            checker,
            plausible: HashMap::new(),
            implausible: HashMap::new(),
        })
    }

    /// The active settings
    pub fn settings(&self) -> &EnumeratorSettings {
        &self.settings
    }

    /// Reset the oracle's RNG and drop both verdict caches (cached verdicts
    /// are only stable for a fixed seed)
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.checker.reseed(seed);
        self.plausible.clear();
        self.implausible.clear();
    }

    /// Whether every connected component of `sg` passes the plausibility
    /// oracle, consulting and populating the verdict caches
    fn check_plausibility(&mut self, sg: &StrandGraph) -> Result<bool, EnumerateError> {
        for component in sg.connected_components()? {
            let species = Species::from_strand_graph(&component)?;
            if self.plausible.contains_key(&species) {
                continue;
            }
            if self.implausible.contains_key(&species) {
                trace!(%species, "cached implausible");
                return Ok(false);
            }
            let (ok, sampling) = self.checker.is_plausible(species.graph());
            if ok {
                self.plausible.insert(species, sampling);
            } else {
                debug!(%species, trials = sampling.unsuccessful_trials, "implausible component");
                self.implausible.insert(species, sampling);
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Binding transitions: each admissible, unoccupied edge whose addition
    /// yields a plausible complex
    fn binding_transitions(
        &mut self,
        sg: &StrandGraph,
    ) -> Result<Vec<(Transition, StrandGraph)>, EnumerateError> {
        let bound = sg.currently_bound_sites();
        let mut out = Vec::new();
        for edge in sg.possible_new_edges() {
            let (s1, s2) = edge.sites();
            if bound.contains(&s1) || bound.contains(&s2) {
                continue;
            }
            let successor = sg.add_edge(&edge)?;
            if self.check_plausibility(&successor)? {
                trace!(%edge, "binding admitted");
                out.push((Transition::Binding { added: edge }, successor));
            }
        }
        Ok(out)
    }

    /// Unbinding transitions: a current toehold edge may dissociate when its
    /// removal separates the complex. The plausibility oracle is bypassed:
    /// removing an edge only removes constraints, so a plausible predecessor
    /// keeps a satisfying embedding.
    fn unbinding_transitions(
        &self,
        sg: &StrandGraph,
    ) -> Result<Vec<(Transition, StrandGraph)>, EnumerateError> {
        let mut out = Vec::new();
        for &edge in sg.current_edges() {
            if !sg.toehold_edges().contains(&edge) {
                continue;
            }
            let successor = sg.remove_edge(&edge)?;
            if !successor.is_connected() {
                trace!(%edge, "unbinding admitted");
                out.push((Transition::Unbinding { removed: edge }, successor));
            }
        }
        Ok(out)
    }

    /// Three-way branch migration: an unbound site in the same component
    /// invades a current edge, re-pairing its far endpoint
    fn three_way_transitions(
        &mut self,
        sg: &StrandGraph,
    ) -> Result<Vec<(Transition, StrandGraph)>, EnumerateError> {
        let possible: HashSet<Bond> = sg.possible_new_edges().into_iter().collect();
        let unbound = sg.currently_unbound_sites();
        let mut out = Vec::new();
        for &removed in sg.current_edges() {
            for (_, s2) in removed.both_ways_round() {
                for &invader in &unbound {
                    let added = Bond::new(invader, s2);
                    if !possible.contains(&added) || !sg.same_species(invader, s2) {
                        continue;
                    }
                    let successor = sg.remove_edge(&removed)?.add_edge(&added)?;
                    if self.check_plausibility(&successor)? {
                        trace!(%removed, %added, "three-way migration admitted");
                        out.push((
                            Transition::ThreeWayMigration { added, removed },
                            successor,
                        ));
                    }
                }
            }
        }
        Ok(out)
    }

    /// Four-way branch migration over the canonical Holliday pattern reached
    /// by strand adjacency from each current edge
    fn four_way_transitions(
        &mut self,
        sg: &StrandGraph,
    ) -> Result<Vec<(Transition, StrandGraph)>, EnumerateError> {
        let possible: HashSet<Bond> = sg.possible_new_edges().into_iter().collect();
        let mut out: Vec<(Transition, StrandGraph)> = Vec::new();
        for &edge in sg.current_edges() {
            for (s1, s2) in edge.both_ways_round() {
                let pattern = (|| {
                    let s1p = sg.three_prime_adjacent_site(s1)?;
                    let s2p = sg.five_prime_adjacent_site(s2)?;
                    let s3 = sg.binding_partner(s1p)?;
                    let s3p = sg.three_prime_adjacent_site(s3)?;
                    let s4 = sg.binding_partner(s3p)?;
                    let s4p = sg.three_prime_adjacent_site(s4)?;
                    if sg.binding_partner(s4p)? != s2p {
                        return None;
                    }
                    Some((s1p, s2p, s3, s4p))
                })();
                let Some((s1p, s2p, s3, s4p)) = pattern else {
                    continue;
                };
                let first_added = Bond::new(s1p, s2p);
                let second_added = Bond::new(s3, s4p);
                if !possible.contains(&first_added) || !possible.contains(&second_added) {
                    continue;
                }
                let first_removed = Bond::new(s1p, s3);
                let second_removed = Bond::new(s2p, s4p);
                let transition = Transition::FourWayMigration {
                    added: [first_added, second_added],
                    removed: [first_removed, second_removed],
                };
                // The mirrored orientation finds the same exchange
                if out
                    .iter()
                    .any(|(t, _)| t.all_edges_involved() == transition.all_edges_involved())
                {
                    continue;
                }
                let successor = sg
                    .remove_edge(&first_removed)?
                    .remove_edge(&second_removed)?
                    .add_edge(&first_added)?
                    .add_edge(&second_added)?;
                if self.check_plausibility(&successor)? {
                    trace!(%first_removed, %second_removed, "four-way migration admitted");
                    out.push((transition, successor));
                }
            }
        }
        Ok(out)
    }

    /// All unimolecular transitions of one species
    fn unimolecular_transitions(
        &mut self,
        sg: &StrandGraph,
    ) -> Result<Vec<(Transition, StrandGraph)>, EnumerateError> {
        let mut all = self.binding_transitions(sg)?;
        all.extend(self.unbinding_transitions(sg)?);
        all.extend(self.three_way_transitions(sg)?);
        all.extend(self.four_way_transitions(sg)?);
        Ok(all)
    }

    fn reactions_from_transitions(
        &mut self,
        reactants: Vec<Species>,
        transitions: Vec<(Transition, StrandGraph)>,
    ) -> Result<Vec<Reaction>, EnumerateError> {
        let mut reactions: Vec<Reaction> = Vec::new();
        for (transition, successor) in transitions {
            let products = successor
                .connected_components()?
                .iter()
                .map(Species::from_strand_graph)
                .collect::<Result<Vec<_>, _>>()?;
            let rate = match transition.kind() {
                TransitionKind::Binding => self.settings.rates.bind,
                TransitionKind::Unbinding => self.settings.rates.unbind,
                TransitionKind::ThreeWayMigration | TransitionKind::FourWayMigration => {
                    self.settings.rates.displace
                }
            };
            let metadata = ReactionMetadata {
                kind: transition.kind(),
                edges_added: transition.edges_added(),
                edges_removed: transition.edges_removed(),
            };
            let reaction = Reaction::new(reactants.clone(), rate, products, Some(metadata));
            if !reactions.contains(&reaction) {
                reactions.push(reaction);
            }
        }
        Ok(reactions)
    }

    /// All unimolecular reactions starting from one species
    fn unimolecular_reactions(&mut self, x: &Species) -> Result<Vec<Reaction>, EnumerateError> {
        let transitions = self.unimolecular_transitions(x.graph())?;
        self.reactions_from_transitions(vec![x.clone()], transitions)
    }

    /// All binding reactions between a pair of species
    fn bimolecular_reactions(
        &mut self,
        x: &Species,
        y: &Species,
    ) -> Result<Vec<Reaction>, EnumerateError> {
        let composed = x.graph().compose(y.graph())?;
        let transitions = self.binding_transitions(&composed)?;
        self.reactions_from_transitions(vec![x.clone(), y.clone()], transitions)
    }

    /// Fixed-point closure from a list of distinct initial species
    pub fn enumerate(&mut self, species_list: Vec<Species>) -> Result<Crn, EnumerateError> {
        self.settings.validate()?;
        for (i, s) in species_list.iter().enumerate() {
            if species_list.iter().skip(i + 1).any(|t| t == s) {
                return Err(EnumerateError::DuplicateInputSpecies(s.to_string()));
            }
        }
        self.plausible.clear();
        self.implausible.clear();

        let mut all_reactions: Vec<Reaction> = Vec::new();
        let mut processed: Vec<Species> = Vec::new();
        let mut pairs_processed: HashSet<(Species, Species)> = HashSet::new();
        let mut worklist: VecDeque<Species> = species_list.into();
        let mut iteration = 0_usize;

        while let Some(x) = worklist.pop_front() {
            iteration += 1;
            if !self.check_plausibility(x.graph())? {
                debug!(species = %x, "dropping implausible species");
                continue;
            }
            if x.num_strands() > self.settings.max_complex_size {
                return Err(EnumerateError::ComplexSizeExceeded {
                    max: self.settings.max_complex_size,
                    species: x.to_string(),
                });
            }
            trace!(iteration, species = %x, "processing species");

            let mut new_reactions = match self.settings.enumeration_mode {
                EnumerationMode::Detailed => self.unimolecular_reactions(&x)?,
            };
            for i in 0..processed.len() {
                let y = processed[i].clone();
                let pair = if x <= y { (x.clone(), y.clone()) } else { (y.clone(), x.clone()) };
                if pairs_processed.contains(&pair) {
                    continue;
                }
                new_reactions.extend(self.bimolecular_reactions(&x, &y)?);
                pairs_processed.insert(pair);
            }

            let mut discovered: Vec<Species> = Vec::new();
            for r in new_reactions {
                debug_assert!(!all_reactions.contains(&r));
                discovered.extend(r.species_involved().cloned());
                all_reactions.push(r);
            }

            // Add x before enqueuing so self-products do not re-enter the
            // worklist
            processed.push(x);
            for s in discovered {
                if !processed.contains(&s) && !worklist.contains(&s) {
                    worklist.push_back(s);
                }
            }
        }

        info!(
            species = processed.len(),
            reactions = all_reactions.len(),
            settings = %self.settings.name,
            "enumeration complete"
        );
        Ok(Crn::new(processed, all_reactions))
    }

    /// Enumerate from a process term, rejecting zero-nucleotide-loop inputs
    pub fn enumerate_process(
        &mut self,
        process: &Process,
        lengths: &DomainLengths,
    ) -> Result<Crn, EnumerateError> {
        if let Some((first, second)) = process.find_zero_nucleotide_loop() {
            return Err(EnumerateError::ZeroNucleotideLoop {
                first: first.to_string(),
                second: second.to_string(),
            });
        }
        let species = species_list_from_process(process, lengths)?;
        self.enumerate(species)
    }

    /// Enumerate directly from input text
    pub fn enumerate_input(
        &mut self,
        process_text: &str,
        lengths_text: &str,
    ) -> Result<Crn, EnumerateError> {
        let process = parse_process(process_text)?;
        let lengths = parse_domain_lengths(lengths_text)?;
        self.enumerate_process(&process, &lengths)
    }
}
