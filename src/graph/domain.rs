//! Domain identities and the out-of-band nucleotide length table

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named DNA domain occurrence
///
/// Identity is `(name, is_toehold, is_complement, bond)`. The bond label is
/// absent for unhybridized domains; in a well-formed process every bond label
/// occurs exactly twice, on complementary domains.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Domain {
    name: String,
    is_toehold: bool,
    is_complement: bool,
    bond: Option<String>,
}

impl Domain {
    /// Create a domain occurrence
    pub fn new(
        name: impl Into<String>,
        is_toehold: bool,
        is_complement: bool,
        bond: Option<String>,
    ) -> Self {
        Self { name: name.into(), is_toehold, is_complement, bond }
    }

    /// The domain name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is a (short) toehold domain
    pub fn is_toehold(&self) -> bool {
        self.is_toehold
    }

    /// Whether this is the Watson-Crick complement (`*`) of the named domain
    pub fn is_complement(&self) -> bool {
        self.is_complement
    }

    /// The bond label, if this occurrence is currently hybridized
    pub fn bond(&self) -> Option<&str> {
        self.bond.as_deref()
    }

    /// The same domain with any bond label removed
    pub fn strip_bond(&self) -> Domain {
        Domain { bond: None, ..self.clone() }
    }

    /// The same domain carrying the given bond label
    pub fn with_bond(&self, label: impl Into<String>) -> Domain {
        Domain { bond: Some(label.into()), ..self.clone() }
    }

    /// Whether `self` and `other` could hybridize: same name, opposite
    /// complementation. Bond labels are ignored.
    pub fn is_complementary_to(&self, other: &Domain) -> bool {
        self.name == other.name && self.is_complement != other.is_complement
    }

    /// Whether a shared bond label between `self` and `other` is well formed
    pub fn well_formed_bond_to(&self, other: &Domain) -> bool {
        self.is_complementary_to(other) && self.bond.is_some() && self.bond == other.bond
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_toehold {
            write!(f, "^")?;
        }
        if self.is_complement {
            write!(f, "*")?;
        }
        if let Some(ref bond) = self.bond {
            write!(f, "!{}", bond)?;
        }
        Ok(())
    }
}

/// A single domain length declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainDecl {
    /// Nucleotide count
    pub length: u32,
    /// Declared as `toeholdDomain` (vs `longDomain`)
    pub is_toehold: bool,
}

/// The name → nucleotide-length table declared alongside a process
///
/// Every domain appearing in any strand must have a declared length before a
/// strand graph can be built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainLengths {
    entries: BTreeMap<String, DomainDecl>,
}

impl DomainLengths {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a domain's length and toehold marker
    pub fn declare(&mut self, name: impl Into<String>, length: u32, is_toehold: bool) {
        self.entries.insert(name.into(), DomainDecl { length, is_toehold });
    }

    /// Nucleotide length of a named domain, if declared
    pub fn length_of(&self, name: &str) -> Option<u32> {
        self.entries.get(name).map(|d| d.length)
    }

    /// Whether the named domain was declared as a toehold
    pub fn is_toehold(&self, name: &str) -> bool {
        self.entries.get(name).map(|d| d.is_toehold).unwrap_or(false)
    }

    /// All declared names, in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All declarations, in name order
    pub fn decls(&self) -> impl Iterator<Item = (&str, DomainDecl)> {
        self.entries.iter().map(|(name, decl)| (name.as_str(), *decl))
    }
}
