//! The evaluation protocol: one cosmology snapshot and one nuisance
//! parameter map in, one scalar log-likelihood out.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::trace;

use crate::{
    catalog::LensCatalog,
    cosmology::{Cosmology, DistanceError},
    params::{KinematicDistribution, LensDistribution, MissingParameterError, NuisanceParameters},
};

/// Which cosmology snapshot form the likelihood consumes, declared once per
/// process so the host framework knows what to compute for each point in
/// parameter space.
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    /// The host supplies a full results handle from the theory code,
    /// wrapped in [`ResultsCosmology`](crate::ResultsCosmology).
    CosmologyResults,
    /// The host supplies angular diameter distances evaluated on exactly
    /// this redshift grid, plus the curvature density and Hubble parameter,
    /// wrapped in [`TabulatedCosmology`](crate::TabulatedCosmology).
    DistanceGrid { redshifts: Vec<f64> },
}

/// The hierarchical per-lens likelihood engine.
///
/// Implementations own the marginalisation mathematics: for each record
/// they draw `num_distribution_draws` realisations of the MST multiplier
/// and anisotropy parameter from the supplied distributions and aggregate
/// the per-lens log-likelihoods over the catalog.
///
/// Numerically degenerate parameter combinations must come back as
/// `Ok(f64::NEG_INFINITY)` so the sampler can reject the point; `Err` is
/// reserved for failed distance queries.
pub trait LensModel<C> {
    fn log_likelihood<D, R>(
        &self,
        rng: &mut R,
        cosmo: &D,
        lens: &LensDistribution,
        kinematics: &KinematicDistribution,
        catalog: &LensCatalog<C>,
    ) -> Result<f64, DistanceError>
    where
        D: Cosmology + ?Sized,
        R: Rng + ?Sized;
}

/// Everything that can fail during one likelihood evaluation.
#[derive(Error, Debug)]
pub enum LikelihoodError {
    #[error(transparent)]
    MissingParameter(#[from] MissingParameterError),
    #[error(transparent)]
    Distance(#[from] DistanceError),
}

/// Aggregate log-likelihood of a lens catalog under a hierarchical model.
///
/// Owns the catalog (assembled once at initialization), the engine and the
/// declared snapshot [`Requirement`]. Evaluation is stateless: nothing is
/// cached between calls, and the per-evaluation draw sequence restarts from
/// a fixed seed so identical inputs give bit-identical results.
pub struct LensSampleLikelihood<C, M> {
    catalog: LensCatalog<C>,
    model: M,
    requirement: Requirement,
    seed: u64,
}

impl<C, M: LensModel<C>> LensSampleLikelihood<C, M> {
    pub fn new(catalog: LensCatalog<C>, model: M, requirement: Requirement) -> Self {
        Self {
            catalog,
            model,
            requirement,
            seed: 0,
        }
    }

    /// Use a different seed for the per-evaluation draw sequence.
    ///
    /// The same sequence is reused on every evaluation, which keeps the
    /// marginalised likelihood surface smooth in the sampled parameters.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The snapshot form this likelihood consumes.
    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    pub fn catalog(&self) -> &LensCatalog<C> {
        &self.catalog
    }

    /// Parameter names the sampler must supply on every evaluation.
    pub fn required_parameters(&self) -> &'static [&'static str] {
        &NuisanceParameters::REQUIRED
    }

    /// Aggregate log-likelihood for one sampler-supplied parameter map and
    /// one cosmology snapshot.
    pub fn log_likelihood<D>(
        &self,
        values: &HashMap<String, f64>,
        cosmo: &D,
    ) -> Result<f64, LikelihoodError>
    where
        D: Cosmology + ?Sized,
    {
        let params = NuisanceParameters::from_map(values)?;
        self.evaluate(&params, cosmo)
    }

    /// Typed-parameter variant of [`log_likelihood`](Self::log_likelihood).
    pub fn evaluate<D>(
        &self,
        params: &NuisanceParameters,
        cosmo: &D,
    ) -> Result<f64, LikelihoodError>
    where
        D: Cosmology + ?Sized,
    {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let logl = self.model.log_likelihood(
            &mut rng,
            cosmo,
            &params.lens,
            &params.kinematics,
            &self.catalog,
        )?;
        trace!(logl, "evaluated lens sample log-likelihood");
        Ok(logl)
    }
}
