//! The chemical reaction network produced by enumeration

use super::reaction::Reaction;
use crate::graph::Species;
use serde::Serialize;

/// A CRN: an ordered species set with stable synthetic names plus a
/// compressed reaction list
#[derive(Debug, Clone)]
pub struct Crn {
    species: Vec<Species>,
    reactions: Vec<Reaction>,
}

impl Crn {
    /// Assemble a CRN, compressing duplicate and reversible reactions
    pub fn new(species: Vec<Species>, reactions: Vec<Reaction>) -> Self {
        let mut crn = Self { species, reactions };
        crn.compress();
        debug_assert!(crn.is_valid());
        crn
    }

    /// The species set, in enumeration order
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// The compressed reaction list
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// The synthetic name `sp_i` of a species
    pub fn species_name(&self, species: &Species) -> Option<String> {
        self.species.iter().position(|s| s == species).map(|i| format!("sp_{}", i))
    }

    /// Merge identical records and reversible pairs. Idempotent.
    pub fn compress(&mut self) {
        let mut compressed: Vec<Reaction> = Vec::with_capacity(self.reactions.len());
        for r in &self.reactions {
            let mut combined = false;
            for existing in compressed.iter_mut() {
                if let Some(merged) = existing.try_combine(r) {
                    *existing = merged;
                    combined = true;
                }
            }
            if !combined {
                compressed.push(r.clone());
            }
        }
        self.reactions = compressed;
    }

    /// Structural invariants: distinct species, no duplicate reactions, every
    /// referenced species present in the species set
    pub fn is_valid(&self) -> bool {
        for (i, s) in self.species.iter().enumerate() {
            if self.species.iter().skip(i + 1).any(|t| t == s) {
                return false;
            }
        }
        for (i, r) in self.reactions.iter().enumerate() {
            if !r.is_valid() {
                return false;
            }
            if self.reactions.iter().skip(i + 1).any(|q| q == r) {
                return false;
            }
            if r.species_involved().any(|s| !self.species.contains(s)) {
                return false;
            }
        }
        true
    }

    fn format_side(&self, side: &[Species]) -> String {
        side.iter()
            .map(|s| self.species_name(s).unwrap_or_else(|| "?".to_string()))
            .collect::<Vec<_>>()
            .join(" + ")
    }

    fn format_reaction(&self, r: &Reaction) -> String {
        let arrow = match r.bwd_rate() {
            None => format!(" ->{{{}}} ", r.fwd_rate()),
            Some(bwd) => format!(" {{{}}}<->{{{}}} ", bwd, r.fwd_rate()),
        };
        format!("{}{}{}", self.format_side(r.reactants()), arrow, self.format_side(r.products()))
    }

    /// Serializable summary for machine consumption
    pub fn summary(&self) -> CrnSummary {
        CrnSummary {
            species: self
                .species
                .iter()
                .enumerate()
                .map(|(i, s)| SpeciesSummary {
                    name: format!("sp_{}", i),
                    process: s.to_string(),
                })
                .collect(),
            reactions: self
                .reactions
                .iter()
                .map(|r| ReactionSummary {
                    reactants: r
                        .reactants()
                        .iter()
                        .map(|s| self.species_name(s).unwrap_or_else(|| "?".to_string()))
                        .collect(),
                    products: r
                        .products()
                        .iter()
                        .map(|s| self.species_name(s).unwrap_or_else(|| "?".to_string()))
                        .collect(),
                    fwd_rate: r.fwd_rate(),
                    bwd_rate: r.bwd_rate(),
                    kind: r.metadata().map(|m| m.kind.to_string()),
                })
                .collect(),
        }
    }
}

impl std::fmt::Display for Crn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SPECIES:")?;
        writeln!(f, "--------")?;
        writeln!(f)?;
        for (i, s) in self.species.iter().enumerate() {
            writeln!(f, "sp_{} = {}", i, s)?;
        }
        writeln!(f)?;
        writeln!(f, "REACTIONS:")?;
        writeln!(f, "----------")?;
        writeln!(f)?;
        for r in &self.reactions {
            writeln!(f, "{}", self.format_reaction(r))?;
        }
        Ok(())
    }
}

/// JSON-friendly view of a CRN
#[derive(Debug, Clone, Serialize)]
pub struct CrnSummary {
    pub species: Vec<SpeciesSummary>,
    pub reactions: Vec<ReactionSummary>,
}

/// One species table row
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesSummary {
    pub name: String,
    pub process: String,
}

/// One reaction row, species referenced by name
#[derive(Debug, Clone, Serialize)]
pub struct ReactionSummary {
    pub reactants: Vec<String>,
    pub products: Vec<String>,
    pub fwd_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bwd_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{species_list_from_process, DomainLengths};
    use crate::parse::{parse_domain_lengths, parse_process};

    fn species(text: &str, lengths: &DomainLengths) -> Vec<Species> {
        species_list_from_process(&parse_process(text).unwrap(), lengths).unwrap()
    }

    fn toehold_crn() -> Crn {
        let l = parse_domain_lengths("toeholdDomain t length 5").unwrap();
        let singles = species("( <t^> | <t^*> )", &l);
        let duplex = species("( <t^!i1> | <t^*!i1> )", &l);
        let fwd = Reaction::new(singles.clone(), 0.003, duplex.clone(), None);
        let bwd = Reaction::new(duplex.clone(), 0.1, singles.clone(), None);
        let mut all = singles;
        all.extend(duplex);
        Crn::new(all, vec![fwd, bwd])
    }

    #[test]
    fn reversible_pair_is_compressed() {
        let crn = toehold_crn();
        assert_eq!(crn.reactions().len(), 1);
        assert!(crn.reactions()[0].is_reversible());
        assert!(crn.is_valid());
    }

    #[test]
    fn compress_is_idempotent() {
        let mut crn = toehold_crn();
        let before = crn.reactions().to_vec();
        crn.compress();
        assert_eq!(crn.reactions(), &before[..]);
    }

    #[test]
    fn species_names_are_positional() {
        let crn = toehold_crn();
        let names: Vec<_> =
            crn.species().iter().filter_map(|s| crn.species_name(s)).collect();
        assert_eq!(names, vec!["sp_0", "sp_1", "sp_2"]);
    }

    #[test]
    fn display_renders_species_table_and_arrows() {
        let crn = toehold_crn();
        let text = crn.to_string();
        assert!(text.contains("SPECIES:"));
        assert!(text.contains("REACTIONS:"));
        assert!(text.contains("sp_0 = "));
        assert!(text.contains("{0.1}<->{0.003}"));
    }

    #[test]
    fn summary_serializes_to_json() {
        let crn = toehold_crn();
        let json = serde_json::to_value(crn.summary()).unwrap();
        assert_eq!(json["species"].as_array().unwrap().len(), 3);
        assert_eq!(json["reactions"][0]["fwd_rate"], 0.003);
    }
}
