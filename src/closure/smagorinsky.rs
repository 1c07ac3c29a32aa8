//! # Static Smagorinsky closure
//!
//! mu_t = rho * delta^2 * |S|
//!
//! The raw stress is returned with unit constant, the constant enters
//! through [`Coefficients`]. The same kernel serves the term
//! application of the dynamic model.
use super::{Coefficients, FaceClosure, SfsStress};
use crate::gradient::FaceStencil;
use crate::tensor::StrainRate;

/// Static Smagorinsky model
///
/// cs: Smagorinsky constant
///
/// ci: isotropic constant
///
/// prt: turbulent Prandtl number
///
/// grid_filter_ratio: filter width in units of the mean grid spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smagorinsky {
    /// Smagorinsky constant
    pub cs: f64,
    /// Isotropic constant
    pub ci: f64,
    /// Turbulent Prandtl number
    pub prt: f64,
    /// Filter width / mean grid spacing
    pub grid_filter_ratio: f64,
}

impl Smagorinsky {
    /// Return new model with filter width equal to the grid spacing
    pub fn new(cs: f64, ci: f64, prt: f64) -> Self {
        Self {
            cs,
            ci,
            prt,
            grid_filter_ratio: 1.,
        }
    }
}

impl Default for Smagorinsky {
    fn default() -> Self {
        Self::new(0.1, 0., 0.7)
    }
}

/// Unit-constant Smagorinsky stress of a face
pub fn sfs_stress(stencil: &FaceStencil) -> SfsStress {
    let strain = StrainRate::from_gradient(&stencil.gradient);
    let mu_t = stencil.rho * stencil.delta * stencil.delta * strain.magnitude;
    SfsStress {
        row: strain.deviatoric_row(stencil.dir.axis(), mu_t),
        alpha: 2. * mu_t * strain.magnitude,
        flux_t: mu_t * stencil.dtdn,
    }
}

impl FaceClosure for Smagorinsky {
    fn face_stress(&self, stencil: &FaceStencil) -> SfsStress {
        sfs_stress(stencil)
    }

    fn coefficients(&self) -> Coefficients {
        Coefficients::from_constant(self.cs, self.ci, self.prt)
    }

    fn grid_filter_ratio(&self) -> f64 {
        self.grid_filter_ratio
    }
}
