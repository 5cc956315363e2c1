use std::collections::HashMap;

use rand::Rng;
use rand_distr::StandardNormal;
use thiserror::Error;

/// A required nuisance parameter was absent from the sampler-supplied map.
///
/// Missing keys abort the evaluation; substituting a default here would
/// silently corrupt the inference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing required nuisance parameter `{name}`")]
pub struct MissingParameterError {
    pub name: &'static str,
}

/// Hyper-parameters of the internal mass-sheet-transform multiplier
/// distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensDistribution {
    /// Mean of the internal MST multiplier distribution.
    pub lambda_mst: f64,
    /// Gaussian sigma of the `lambda_mst` distribution.
    pub lambda_mst_sigma: f64,
    /// Slope of the MST multiplier with the half-light to Einstein radius
    /// ratio.
    pub alpha_lambda: f64,
}

impl LensDistribution {
    /// Mean MST multiplier for a lens with half-light to Einstein radius
    /// ratio `r_ratio`.
    pub fn mean(&self, r_ratio: f64) -> f64 {
        self.lambda_mst + self.alpha_lambda * (r_ratio - 1.)
    }

    /// One Monte-Carlo draw of the MST multiplier.
    pub fn draw<R: Rng + ?Sized>(&self, r_ratio: f64, rng: &mut R) -> f64 {
        self.mean(r_ratio) + self.lambda_mst_sigma * rng.sample::<f64, _>(StandardNormal)
    }
}

/// Hyper-parameters of the stellar anisotropy distribution
/// (Osipkov-Merritt parametrisation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicDistribution {
    /// Mean anisotropy parameter.
    pub a_ani: f64,
    /// Scatter of the anisotropy parameter relative to its mean: the
    /// Gaussian sigma of the distribution is `a_ani_sigma * a_ani`.
    pub a_ani_sigma: f64,
}

impl KinematicDistribution {
    /// One Monte-Carlo draw of the anisotropy parameter.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.a_ani + self.a_ani_sigma * self.a_ani * rng.sample::<f64, _>(StandardNormal)
    }
}

/// The five sampled nuisance parameters, partitioned into the two groups
/// the hierarchical engine consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NuisanceParameters {
    pub lens: LensDistribution,
    pub kinematics: KinematicDistribution,
}

impl NuisanceParameters {
    /// Keys every evaluation must supply.
    pub const REQUIRED: [&'static str; 5] = [
        "lambda_mst",
        "lambda_mst_sigma",
        "alpha_lambda",
        "a_ani",
        "a_ani_sigma",
    ];

    /// Partition a flat sampler-supplied map into the lens-distribution and
    /// kinematic groups. Every key in [`REQUIRED`](Self::REQUIRED) must be
    /// present.
    pub fn from_map(values: &HashMap<String, f64>) -> Result<Self, MissingParameterError> {
        let get = |name: &'static str| {
            values
                .get(name)
                .copied()
                .ok_or(MissingParameterError { name })
        };
        Ok(Self {
            lens: LensDistribution {
                lambda_mst: get("lambda_mst")?,
                lambda_mst_sigma: get("lambda_mst_sigma")?,
                alpha_lambda: get("alpha_lambda")?,
            },
            kinematics: KinematicDistribution {
                a_ani: get("a_ani")?,
                a_ani_sigma: get("a_ani_sigma")?,
            },
        })
    }
}
