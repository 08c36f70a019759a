//! Duplex: Geometric Reaction Enumerator for DNA Strand Displacement
//!
//! Enumerates the chemical reaction network induced by a set of DNA
//! strand-displacement species, admitting only product complexes that are
//! geometrically plausible: embeddable in 3-space under strand-length and
//! nicked-junction-angle constraints.
//!
//! # Core Concepts
//!
//! - **Strand graphs**: colored multigraphs of strand instances with
//!   admissible, toehold and current bond edges
//! - **Species**: connected strand graphs held in canonical form
//! - **Region graphs**: junctions connected by contiguous ss/ds regions of
//!   known nucleotide length
//! - **Plausibility**: Monte-Carlo rejection sampling of 3-D coordinates
//!   against distance and nicked-angle constraints
//!
//! # Example
//!
//! ```
//! use duplex::{ConstraintChecker, EnumeratorSettings, GeometricEnumerator};
//!
//! let checker = ConstraintChecker::new(Some(7));
//! let mut enumerator =
//!     GeometricEnumerator::new(EnumeratorSettings::new("adjacent_detailed"), checker).unwrap();
//! let crn = enumerator
//!     .enumerate_input("( <t^> | <t^*> )", "toeholdDomain t length 5")
//!     .unwrap();
//! assert_eq!(crn.species().len(), 3);
//! ```

pub mod enumerate;
pub mod graph;
pub mod parse;
pub mod region;
pub mod sample;

pub use enumerate::{
    Crn, CrnSummary, EnumerateError, EnumerationMode, EnumeratorSettings, GeometricEnumerator,
    RateSet, Reaction, ReactionMetadata, ThreeWayMode, Transition, TransitionKind, UnbindingMode,
};
pub use graph::{
    species_list_from_process, Bond, Domain, DomainLengths, GraphError, Process, Site, Species,
    Strand, StrandGraph,
};
pub use parse::{parse_domain_lengths, parse_process, ParseError};
pub use region::{region_graph_from_strand_graph, JunctionId, Region, RegionDomain, RegionGraph};
pub use sample::{ConstraintChecker, Distributions, SamplingInfo, Vec3};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
