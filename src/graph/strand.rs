//! Strands and processes: the algebraic input terms

use super::domain::Domain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ordered, non-empty sequence of domains, written 5' to 3'
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Strand {
    domains: Vec<Domain>,
}

impl Strand {
    /// Create a strand from its domain sequence
    pub fn new(domains: Vec<Domain>) -> Self {
        debug_assert!(!domains.is_empty(), "strands are non-empty");
        Self { domains }
    }

    /// The domain sequence
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Number of domains
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Always false for a constructed strand; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// The strand type: the same sequence with all bond labels stripped.
    /// Strands of equal type are interchangeable vertices in a strand graph.
    pub fn strand_type(&self) -> Strand {
        Strand::new(self.domains.iter().map(Domain::strip_bond).collect())
    }

    /// A copy with the domain at `idx` replaced
    pub fn with_domain(&self, idx: usize, domain: Domain) -> Strand {
        let mut domains = self.domains.clone();
        domains[idx] = domain;
        Strand::new(domains)
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<")?;
        for (idx, d) in self.domains.iter().enumerate() {
            if idx != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, ">")
    }
}

/// An unordered parallel composition of strands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    strands: Vec<Strand>,
}

impl Process {
    /// Create a process from its strands
    pub fn new(strands: Vec<Strand>) -> Self {
        Self { strands }
    }

    /// The strands of the process
    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    /// Render in surface notation: `( <...> | <...> )`, with strands
    /// separated by newlines or spaces.
    pub fn compact_string(&self, use_newlines: bool) -> String {
        let mut output = String::new();
        let last = self.strands.len().saturating_sub(1);
        for (idx, s) in self.strands.iter().enumerate() {
            if idx == 0 {
                output.push_str("( ");
            } else {
                output.push_str("| ");
            }
            output.push_str(&s.to_string());
            if idx == last {
                output.push_str(" )");
            } else if use_newlines {
                output.push('\n');
            } else {
                output.push(' ');
            }
        }
        output
    }

    /// Whether every bond label occurs exactly twice, on complementary domains
    pub fn well_formed(&self) -> bool {
        let mut bonds: BTreeMap<&str, Vec<&Domain>> = BTreeMap::new();
        for s in &self.strands {
            for d in s.domains() {
                if let Some(label) = d.bond() {
                    bonds.entry(label).or_default().push(d);
                }
            }
        }
        bonds.values().all(|ds| ds.len() == 2 && ds[0].well_formed_bond_to(ds[1]))
    }

    /// Find a zero-nucleotide loop: two strand-adjacent complementary domains,
    /// which would hybridize with no intervening nucleotides. Such inputs are
    /// rejected before enumeration. Returns the first offending pair.
    pub fn find_zero_nucleotide_loop(&self) -> Option<(Domain, Domain)> {
        for s in &self.strands {
            for pair in s.domains().windows(2) {
                if pair[0].is_complementary_to(&pair[1]) {
                    return Some((pair[0].strip_bond(), pair[1].strip_bond()));
                }
            }
        }
        None
    }
}

impl std::fmt::Display for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.compact_string(true))
    }
}
