//! Length and angle samplers as pluggable strategy objects
//!
//! The constraint checker is configured with a bundle of five samplers:
//! ss-region length, ds-region length, tether angle (first placement from a
//! junction with no history), ss angle, and the ds-ds junction angle used
//! when a helix continues from a previous helix placement.

use super::constants::{DS_LENGTH, SSDNA_PERSISTENCE_LENGTH, SS_LENGTH};
use super::vec3::Vec3;
use crate::region::{JunctionId, RegionDomain};
use rand::{Rng, RngCore};
use rand_distr::UnitSphere;

/// What was recorded when the previous region was placed
#[derive(Debug, Clone)]
pub struct PlacementInfo {
    /// Direction the previous region was laid along
    pub unit_vec: Vec3,
    /// Character of the previous region
    pub region: RegionDomain,
    /// Angle (radians) the previous direction made with its own predecessor
    pub sampled_angle: f64,
    /// The junction the previous region was extended from
    pub prev_label: JunctionId,
}

/// Samples an end-to-end length for a region of known nucleotide count
pub trait LengthModel {
    fn sample_length(&self, nt: u32, rng: &mut dyn RngCore) -> f64;
}

/// Samples a direction unit vector, optionally conditioned on the previous
/// placement
pub trait AngleModel {
    fn sample_direction(&self, prev: Option<&PlacementInfo>, rng: &mut dyn RngCore) -> Vec3;
}

/// Worm-like chain end-to-end distance, truncated to [0, contour length].
///
/// Radial density of the interpolation formula (Thirumalai & Ha):
/// `f(x) ∝ x² (1 − x²)^(−9/2) exp(−(3t/4)/(1 − x²))` with `x = r/L` and
/// `t = L/λ`. Sampled by rejection against the grid-located mode.
#[derive(Debug, Clone)]
pub struct WormLikeChain {
    pub persistence_length: f64,
    pub rise_per_nt: f64,
}

impl Default for WormLikeChain {
    fn default() -> Self {
        Self { persistence_length: SSDNA_PERSISTENCE_LENGTH, rise_per_nt: SS_LENGTH }
    }
}

impl WormLikeChain {
    fn density(&self, x: f64, t: f64) -> f64 {
        let u = 1.0 - x * x;
        if u <= 0.0 {
            return 0.0;
        }
        x * x * u.powf(-4.5) * (-(0.75 * t) / u).exp()
    }
}

impl LengthModel for WormLikeChain {
    fn sample_length(&self, nt: u32, rng: &mut dyn RngCore) -> f64 {
        let contour = f64::from(nt) * self.rise_per_nt;
        if contour <= 0.0 {
            return 0.0;
        }
        let t = contour / self.persistence_length;

        const GRID: usize = 256;
        let mut max_density = 0.0_f64;
        for i in 1..GRID {
            let x = i as f64 / GRID as f64;
            max_density = max_density.max(self.density(x, t));
        }
        // Headroom for the true mode falling between grid points
        let ceiling = max_density * 1.05;

        loop {
            let x: f64 = rng.gen();
            let y: f64 = rng.gen::<f64>() * ceiling;
            if y <= self.density(x, t) {
                return x * contour;
            }
        }
    }
}

/// Deterministic fully-extended length: `nt * rise`. Models rigid dsDNA at
/// this level of abstraction.
#[derive(Debug, Clone)]
pub struct MaxLength {
    pub rise_per_nt: f64,
}

impl Default for MaxLength {
    fn default() -> Self {
        Self { rise_per_nt: DS_LENGTH }
    }
}

impl LengthModel for MaxLength {
    fn sample_length(&self, nt: u32, _rng: &mut dyn RngCore) -> f64 {
        f64::from(nt) * self.rise_per_nt
    }
}

/// Isotropic directions on the full unit sphere
#[derive(Debug, Clone, Default)]
pub struct UniformSphere;

impl AngleModel for UniformSphere {
    fn sample_direction(&self, _prev: Option<&PlacementInfo>, rng: &mut dyn RngCore) -> Vec3 {
        let [x, y, z]: [f64; 3] = rng.sample(UnitSphere);
        Vec3::new(x, y, z)
    }
}

/// Isotropic directions restricted to the upper hemisphere (z ≥ 0); used for
/// tethered structures
#[derive(Debug, Clone, Default)]
pub struct UniformHemisphere;

impl AngleModel for UniformHemisphere {
    fn sample_direction(&self, _prev: Option<&PlacementInfo>, rng: &mut dyn RngCore) -> Vec3 {
        let [x, y, z]: [f64; 3] = rng.sample(UnitSphere);
        Vec3::new(x, y, z.abs())
    }
}

/// The sampler bundle used by the constraint checker
pub struct Distributions {
    pub ss_length: Box<dyn LengthModel>,
    pub ds_length: Box<dyn LengthModel>,
    pub tether_angle: Box<dyn AngleModel>,
    pub ss_angle: Box<dyn AngleModel>,
    pub dsds_angle: Box<dyn AngleModel>,
}

impl Default for Distributions {
    fn default() -> Self {
        Self {
            ss_length: Box::new(WormLikeChain::default()),
            ds_length: Box::new(MaxLength::default()),
            tether_angle: Box::new(UniformSphere),
            ss_angle: Box::new(UniformSphere),
            dsds_angle: Box::new(UniformSphere),
        }
    }
}

impl std::fmt::Debug for Distributions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Distributions").finish_non_exhaustive()
    }
}

impl Distributions {
    /// Sample the placement of one region extending from a junction.
    ///
    /// Returns the direction unit vector, the region's end-to-end length, and
    /// the angle (radians) the new direction makes with the previous one.
    pub fn sample_point(
        &self,
        prev: Option<&PlacementInfo>,
        region: RegionDomain,
        rng: &mut dyn RngCore,
    ) -> (Vec3, f64, f64) {
        let length = if region.double_stranded {
            self.ds_length.sample_length(region.nt_length, rng)
        } else {
            self.ss_length.sample_length(region.nt_length, rng)
        };
        let direction = match prev {
            None => self.tether_angle.sample_direction(None, rng),
            Some(info) if region.double_stranded && info.region.double_stranded => {
                self.dsds_angle.sample_direction(Some(info), rng)
            }
            Some(info) => self.ss_angle.sample_direction(Some(info), rng),
        };
        let angle = prev
            .map(|info| info.unit_vec.dot(direction).clamp(-1.0, 1.0).acos())
            .unwrap_or(0.0);
        (direction, length, angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn wlc_lengths_stay_within_contour() {
        let wlc = WormLikeChain::default();
        let mut rng = StdRng::seed_from_u64(11);
        for nt in [1, 6, 20, 40] {
            let contour = f64::from(nt) * SS_LENGTH;
            for _ in 0..200 {
                let r = wlc.sample_length(nt, &mut rng);
                assert!(r >= 0.0 && r <= contour, "r = {r} out of [0, {contour}]");
            }
        }
    }

    #[test]
    fn wlc_short_chains_are_nearly_extended() {
        // A 1 nt chain is much shorter than its persistence length, so the
        // end-to-end distance should hug the contour length.
        let wlc = WormLikeChain::default();
        let mut rng = StdRng::seed_from_u64(12);
        let contour = SS_LENGTH;
        let mean: f64 =
            (0..500).map(|_| wlc.sample_length(1, &mut rng)).sum::<f64>() / 500.0;
        assert!(mean > 0.8 * contour, "mean = {mean}");
    }

    #[test]
    fn max_length_is_deterministic() {
        let ds = MaxLength::default();
        let mut rng = StdRng::seed_from_u64(13);
        assert_eq!(ds.sample_length(20, &mut rng), 20.0 * DS_LENGTH);
        assert_eq!(ds.sample_length(20, &mut rng), 20.0 * DS_LENGTH);
    }

    #[test]
    fn sphere_directions_are_unit_vectors() {
        let sphere = UniformSphere;
        let mut rng = StdRng::seed_from_u64(14);
        for _ in 0..100 {
            let u = sphere.sample_direction(None, &mut rng);
            assert!((u.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn hemisphere_directions_point_up() {
        let hemisphere = UniformHemisphere;
        let mut rng = StdRng::seed_from_u64(15);
        for _ in 0..100 {
            let u = hemisphere.sample_direction(None, &mut rng);
            assert!(u.z >= 0.0);
            assert!((u.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn sample_point_uses_rigid_length_for_helices() {
        let dist = Distributions::default();
        let mut rng = StdRng::seed_from_u64(16);
        let region = RegionDomain { double_stranded: true, nt_length: 20 };
        let (u, len, angle) = dist.sample_point(None, region, &mut rng);
        assert!((len - 6.8).abs() < 1e-12);
        assert!((u.norm() - 1.0).abs() < 1e-9);
        assert_eq!(angle, 0.0);
    }
}
