//! # WALE closure
//! Wall-adapting local eddy viscosity, built from the traceless
//! symmetric part of the squared velocity gradient
//!
//! D = 1/2 (g^2 + g^2^T) - tr(g^2) / 3 I
//!
//! mu_t = rho * delta^2 * (DD)^(3/2) / ((SS)^(5/2) + (DD)^(5/4))
use super::{Coefficients, FaceClosure, SfsStress};
use crate::gradient::FaceStencil;
use crate::tensor::{contract, deviatoric, product, symmetric_part, StrainRate};

/// WALE model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wale {
    /// WALE constant
    pub cw: f64,
    /// Isotropic constant
    pub ci: f64,
    /// Turbulent Prandtl number
    pub prt: f64,
    /// Filter width / mean grid spacing
    pub grid_filter_ratio: f64,
}

impl Wale {
    /// Return new model with filter width equal to the grid spacing
    pub fn new(cw: f64, ci: f64, prt: f64) -> Self {
        Self {
            cw,
            ci,
            prt,
            grid_filter_ratio: 1.,
        }
    }
}

impl Default for Wale {
    fn default() -> Self {
        Self::new(0.5, 0., 0.7)
    }
}

/// Unit-constant WALE stress of a face
pub fn sfs_stress(stencil: &FaceStencil) -> SfsStress {
    let g = &stencil.gradient;
    let strain = StrainRate::from_gradient(g);
    let d = deviatoric(&symmetric_part(&product(g, g)));
    let dd = contract(&d, &d);
    let ss = strain.sijsij;

    let denom = ss.powi(2) * ss.sqrt() + dd * dd.sqrt().sqrt();
    // numerator vanishes faster than the denominator
    let operator = if denom > 0. {
        dd * dd.sqrt() / denom
    } else {
        0.
    };

    let rho_delta2 = stencil.rho * stencil.delta * stencil.delta;
    let mu_t = rho_delta2 * operator;
    SfsStress {
        row: strain.deviatoric_row(stencil.dir.axis(), mu_t),
        alpha: 2. * rho_delta2 * strain.magnitude * strain.magnitude,
        flux_t: mu_t * stencil.dtdn,
    }
}

impl FaceClosure for Wale {
    fn face_stress(&self, stencil: &FaceStencil) -> SfsStress {
        sfs_stress(stencil)
    }

    fn coefficients(&self) -> Coefficients {
        Coefficients::from_constant(self.cw, self.ci, self.prt)
    }

    fn grid_filter_ratio(&self) -> f64 {
        self.grid_filter_ratio
    }
}
