//! Reaction enumeration: transitions, reactions, CRNs and the closure loop

mod crn;
mod enumerator;
mod reaction;
mod settings;
mod transition;

pub use crn::{Crn, CrnSummary, ReactionSummary, SpeciesSummary};
pub use enumerator::GeometricEnumerator;
pub use reaction::{Reaction, ReactionMetadata};
pub use settings::{EnumerationMode, EnumeratorSettings, RateSet, ThreeWayMode, UnbindingMode};
pub use transition::{Transition, TransitionKind};

use crate::graph::GraphError;
use crate::parse::ParseError;
use thiserror::Error;

/// Fatal errors aborting an enumeration run
#[derive(Debug, Error)]
pub enum EnumerateError {
    #[error("Invalid enumerator settings: {0}")]
    InvalidSettings(String),

    #[error("Maximum complex size {max} exceeded by species {species}; check for possible polymers")]
    ComplexSizeExceeded { max: usize, species: String },

    #[error("Zero-nucleotide loop possible between adjacent domains {first} {second}")]
    ZeroNucleotideLoop { first: String, second: String },

    #[error("Input species must be distinct; {0} occurs more than once")]
    DuplicateInputSpecies(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
