//! Hierarchical strong-lensing likelihood for cosmological parameter
//! samplers.
//!
//! The crate plugs a precomputed lens-sample likelihood (time-delay and
//! velocity-dispersion lenses) into a sampler's evaluation loop:
//!
//! - A [`LensCatalog`] is assembled once at initialization from named
//!   subsamples, stamping every record with the shared Monte-Carlo draw
//!   count used to marginalise the hyper-parameter distributions.
//! - On each evaluation the host supplies a cosmology snapshot in one of
//!   two declared forms ([`Requirement`]): a full theory-code results
//!   handle behind [`ResultsCosmology`], or a discrete distance table plus
//!   curvature behind [`TabulatedCosmology`]. Both answer the two distance
//!   queries of the [`Cosmology`] trait in plain Mpc floats.
//! - [`LensSampleLikelihood`] partitions the five sampled nuisance
//!   parameters (mass-sheet-transform multiplier distribution and stellar
//!   anisotropy distribution) and hands them, the snapshot and the catalog
//!   to the hierarchical engine behind the [`LensModel`] trait, returning
//!   one scalar log-likelihood per call.
//!
//! Evaluation is synchronous and stateless per call; the per-evaluation
//! draw sequence restarts from a fixed seed, so identical inputs produce
//! bit-identical results.

pub(crate) mod catalog;
pub(crate) mod cosmology;
pub(crate) mod likelihood;
pub(crate) mod math;
pub(crate) mod params;

pub use catalog::{
    CatalogError, LensCatalog, LensRecord, SubsampleSource, DEFAULT_NUM_DISTRIBUTION_DRAWS,
};
pub use cosmology::{
    BackgroundResults, Cosmology, DistanceError, ResultsCosmology, TabulatedCosmology, C_KM_S,
};
pub use likelihood::{LensModel, LensSampleLikelihood, LikelihoodError, Requirement};
pub use params::{
    KinematicDistribution, LensDistribution, MissingParameterError, NuisanceParameters,
};
