//! Geometric sampling: constants, distributions and the plausibility oracle

mod checker;
pub mod constants;
mod distributions;
mod vec3;

pub use checker::{ConstraintChecker, SamplingInfo};
pub use distributions::{
    AngleModel, Distributions, LengthModel, MaxLength, PlacementInfo, UniformHemisphere,
    UniformSphere, WormLikeChain,
};
pub use vec3::Vec3;
