//! Physical constants for geometric sampling
//!
//! Lengths are in nm per nucleotide; persistence lengths in nm.

/// Rise per base pair of B-form dsDNA (nm/nt)
pub const DS_LENGTH: f64 = 0.34;

/// Contour length per nucleotide of ssDNA (nm/nt)
pub const SS_LENGTH: f64 = 0.68;

/// Persistence length of dsDNA (nm)
pub const DSDNA_PERSISTENCE_LENGTH: f64 = 39.0;

/// Persistence length of ssDNA (nm)
pub const SSDNA_PERSISTENCE_LENGTH: f64 = 2.0;

/// Length of three helical turns of dsDNA (nm)
pub const HELIX_THREETURNS_LENGTH: f64 = 10.88;

/// Conversion factor from probability to nM
pub const PROB_TO_NM: f64 = 1_660_577_881.0;

/// Maximum coordinate-sampling attempts per plausibility query
pub const SAMPLING_TRIALS: u32 = 1000;

/// Largest allowed deviation from coaxial alignment at a nicked junction
/// (degrees)
pub const NICKEDANGLE_UPPER_BOUND: f64 = 120.0;

/// Whether nicked-angle constraints are enforced
pub const NICKED_FLAG: bool = true;
