//! Strand graph data model and canonicalization

mod canonical;
mod domain;
mod species;
mod strand;
mod strand_graph;


pub use domain::{Domain, DomainDecl, DomainLengths};
pub use species::{species_list_from_process, Species};
pub use strand::{Process, Strand};
pub use strand_graph::{Bond, GraphError, Site, StrandGraph};
