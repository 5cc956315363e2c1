//! Distance queries against one point in cosmological parameter space.
//!
//! A snapshot of the distance-redshift relation reaches the likelihood in
//! one of two forms: a full results handle from the theory code, or a
//! discrete angular-diameter-distance table plus curvature density and
//! Hubble parameter. Both sit behind the [`Cosmology`] trait so the lens
//! model never knows which backend produced them.

use itertools::{izip, Itertools};
use thiserror::Error;
use tracing::trace;

use crate::math::interp_clamped;

/// Speed of light in km/s. Hubble parameters are km/s/Mpc throughout, so
/// `C_KM_S / h0` is the Hubble distance in Mpc.
pub const C_KM_S: f64 = 299_792.458;

#[derive(Error, Debug)]
pub enum DistanceError {
    /// The underlying theory backend failed to answer a distance query.
    #[error("distance provider failed")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("non-finite angular diameter distance at z = {z}")]
    NonFinite { z: f64 },
    #[error("redshift pair out of order: z1 = {z1} exceeds z2 = {z2}")]
    OutOfOrder { z1: f64, z2: f64 },
    #[error("invalid distance table: {0}")]
    InvalidTable(&'static str),
}

/// Angular diameter distances implied by one point in cosmological
/// parameter space.
///
/// Both operations return plain floats in Mpc; unit-bearing backend output
/// must be stripped before it gets here. The pair passed to
/// [`angular_diameter_distance_between`](Cosmology::angular_diameter_distance_between)
/// must satisfy `z1 <= z2` (deflector in front of source).
pub trait Cosmology {
    /// Angular diameter distance from the observer to `z`, in Mpc.
    fn angular_diameter_distance(&self, z: f64) -> Result<f64, DistanceError>;

    /// Angular diameter distance between `z1` and `z2` along the line of
    /// sight, in Mpc, accounting for spatial curvature.
    fn angular_diameter_distance_between(&self, z1: f64, z2: f64) -> Result<f64, DistanceError>;
}

/// Native distance queries of a theory backend's results object.
///
/// Implementations translate whatever the backend hands out (unit-bearing
/// quantities, arrays, interpolators) into plain Mpc floats.
/// [`ResultsCosmology`] adds finiteness and ordering checks on top.
pub trait BackgroundResults {
    type Err: std::error::Error + Send + Sync + 'static;

    fn angular_diameter_distance(&self, z: f64) -> Result<f64, Self::Err>;
    fn angular_diameter_distance_between(&self, z1: f64, z2: f64) -> Result<f64, Self::Err>;
}

/// [`Cosmology`] backed by a full results handle from the theory code.
#[derive(Debug, Clone)]
pub struct ResultsCosmology<T> {
    results: T,
}

impl<T: BackgroundResults> ResultsCosmology<T> {
    pub fn new(results: T) -> Self {
        Self { results }
    }
}

impl<T: BackgroundResults> Cosmology for ResultsCosmology<T> {
    fn angular_diameter_distance(&self, z: f64) -> Result<f64, DistanceError> {
        let dist = self
            .results
            .angular_diameter_distance(z)
            .map_err(|err| DistanceError::Provider(Box::new(err)))?;
        if !dist.is_finite() {
            return Err(DistanceError::NonFinite { z });
        }
        Ok(dist)
    }

    fn angular_diameter_distance_between(&self, z1: f64, z2: f64) -> Result<f64, DistanceError> {
        if z1 > z2 {
            return Err(DistanceError::OutOfOrder { z1, z2 });
        }
        let dist = self
            .results
            .angular_diameter_distance_between(z1, z2)
            .map_err(|err| DistanceError::Provider(Box::new(err)))?;
        if !dist.is_finite() {
            return Err(DistanceError::NonFinite { z: z2 });
        }
        Ok(dist)
    }
}

/// [`Cosmology`] backed by a discrete distance table.
///
/// Single-redshift queries interpolate piecewise-linearly on the stored
/// grid; outside the grid bounds the boundary value is used unchanged
/// (flat extrapolation). Two-redshift queries combine the tabulated
/// distances with the curvature parameter `K = Ω_k c² / H0²`.
#[derive(Debug, Clone)]
pub struct TabulatedCosmology {
    redshifts: Vec<f64>,
    distances: Vec<f64>,
    omega_k: f64,
    h0: f64,
}

impl TabulatedCosmology {
    /// Validate and store a distance table.
    ///
    /// `redshifts` must be strictly ascending, non-negative and finite,
    /// `distances` must match it in length, `h0` is in km/s/Mpc.
    pub fn new(
        redshifts: Vec<f64>,
        distances: Vec<f64>,
        omega_k: f64,
        h0: f64,
    ) -> Result<Self, DistanceError> {
        if redshifts.len() < 2 {
            return Err(DistanceError::InvalidTable(
                "redshift grid needs at least two points",
            ));
        }
        if redshifts.len() != distances.len() {
            return Err(DistanceError::InvalidTable(
                "redshift and distance grids differ in length",
            ));
        }
        if izip!(&redshifts, &distances).any(|(z, d)| !z.is_finite() || !d.is_finite()) {
            return Err(DistanceError::InvalidTable("non-finite table entry"));
        }
        if redshifts[0] < 0. {
            return Err(DistanceError::InvalidTable("negative redshift in grid"));
        }
        if redshifts.iter().tuple_windows().any(|(a, b)| b <= a) {
            return Err(DistanceError::InvalidTable(
                "redshift grid must be strictly ascending",
            ));
        }
        if !h0.is_finite() || h0 <= 0. {
            return Err(DistanceError::InvalidTable(
                "Hubble parameter must be positive",
            ));
        }
        if !omega_k.is_finite() {
            return Err(DistanceError::InvalidTable(
                "curvature density must be finite",
            ));
        }
        Ok(Self {
            redshifts,
            distances,
            omega_k,
            h0,
        })
    }

    /// Curvature parameter `K = Ω_k c² / H0²`, in Mpc².
    pub fn curvature_k(&self) -> f64 {
        self.omega_k * (C_KM_S / self.h0).powi(2)
    }

    fn distance_at(&self, z: f64) -> f64 {
        let last = self.redshifts.len() - 1;
        if z < self.redshifts[0] || z > self.redshifts[last] {
            trace!(z, "redshift outside distance grid, clamping to boundary");
        }
        interp_clamped(&self.redshifts, &self.distances, z)
    }
}

impl Cosmology for TabulatedCosmology {
    fn angular_diameter_distance(&self, z: f64) -> Result<f64, DistanceError> {
        if !z.is_finite() {
            return Err(DistanceError::NonFinite { z });
        }
        Ok(self.distance_at(z))
    }

    fn angular_diameter_distance_between(&self, z1: f64, z2: f64) -> Result<f64, DistanceError> {
        if z1 > z2 {
            return Err(DistanceError::OutOfOrder { z1, z2 });
        }
        let dm1 = (1. + z1) * self.angular_diameter_distance(z1)?;
        let dm2 = (1. + z2) * self.angular_diameter_distance(z2)?;
        // Hogg (1999) eq. 19 in terms of K = Ω_k c²/H0² and D_H = c/H0:
        // D_M12 = D_M2 √(1 + K D_M1²/D_H⁴) − D_M1 √(1 + K D_M2²/D_H⁴),
        // D_A(z1, z2) = D_M12 / (1 + z2). K = 0 collapses to flat space.
        let dh2 = (C_KM_S / self.h0).powi(2);
        let k = self.curvature_k();
        let f1 = (1. + k * dm1 * dm1 / (dh2 * dh2)).sqrt();
        let f2 = (1. + k * dm2 * dm2 / (dh2 * dh2)).sqrt();
        let dist = (dm2 * f1 - dm1 * f2) / (1. + z2);
        if !dist.is_finite() {
            return Err(DistanceError::NonFinite { z: z2 });
        }
        Ok(dist)
    }
}
