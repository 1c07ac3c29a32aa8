//! # Vreman closure
//!
//! beta_ij = delta^2 sum_m g_mi g_mj
//!
//! B = b11 b22 - b12^2 + b11 b33 - b13^2 + b22 b33 - b23^2
//!
//! mu_t = rho * sqrt(B / (g_ij g_ij))
use super::{Coefficients, FaceClosure, SfsStress};
use crate::gradient::FaceStencil;
use crate::tensor::{contract, StrainRate, ZERO};

/// Vreman model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vreman {
    /// Model constant
    pub cw: f64,
    /// Isotropic constant
    pub ci: f64,
    /// Turbulent Prandtl number
    pub prt: f64,
    /// Filter width / mean grid spacing
    pub grid_filter_ratio: f64,
}

impl Vreman {
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

impl Default for Vreman {
    fn default() -> Self {
        Self::new(0.5, 0., 0.7)
    }
}

/// Unit-constant Vreman stress of a face
pub fn sfs_stress(stencil: &FaceStencil) -> SfsStress {
    let g = &stencil.gradient;
    let delta2 = stencil.delta * stencil.delta;
    let strain = StrainRate::from_gradient(g);

    let mut beta = ZERO;
    for i in 0..3 {
        for j in 0..3 {
            beta[i][j] = delta2 * (g[0][i] * g[0][j] + g[1][i] * g[1][j] + g[2][i] * g[2][j]);
        }
    }
    let minors = [
        beta[0][0] * beta[1][1] - beta[0][1] * beta[0][1],
        beta[0][0] * beta[2][2] - beta[0][2] * beta[0][2],
        beta[1][1] * beta[2][2] - beta[1][2] * beta[1][2],
    ];
    let b_beta = (minors[0] + minors[1] + minors[2]).max(0.);
    let aa = contract(g, g);

    let mu_t = if aa > 0. {
        stencil.rho * (b_beta / aa).sqrt()
    } else {
        0.
    };
    SfsStress {
        row: strain.deviatoric_row(stencil.dir.axis(), mu_t),
        alpha: 2. * stencil.rho * delta2 * strain.magnitude * strain.magnitude,
        flux_t: mu_t * stencil.dtdn,
    }
}

impl FaceClosure for Vreman {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Direction;
    use crate::tensor::Tensor;
    use approx::assert_relative_eq;

    fn stencil(gradient: Tensor) -> FaceStencil {
        FaceStencil {
            dir: Direction::Z,
            gradient,
            rho: 2.,
            dtdn: -1.,
            delta: 0.1,
        }
    }

    #[test]
    fn test_one_dimensional_flow_has_no_eddy_viscosity() {
        // only one nonzero gradient entry, B = 0
        let mut g = ZERO;
        g[0][2] = 4.;
        let stress = sfs_stress(&stencil(g));
        assert_eq!(stress.row, [0., 0., 0.]);
        assert_eq!(stress.flux_t, 0.);
    }

    #[test]
    fn test_zero_gradient_is_finite() {
        assert_eq!(sfs_stress(&stencil(ZERO)), SfsStress::default());
    }

    #[test]
    fn test_plane_strain() {
        // u = a x, v = -a y: beta = delta^2 diag(a^2, a^2, 0)
        let a = 3.;
        let mut g = ZERO;
        g[0][0] = a;
        g[1][1] = -a;
        let stress = sfs_stress(&stencil(g));
        let delta2: f64 = 0.01;
        let b = delta2 * delta2 * a.powi(4);
        let mu_t = 2. * (b / (2. * a * a)).sqrt();
        assert_relative_eq!(stress.flux_t, -mu_t, max_relative = 1e-12);
        // normal z: S_zz = 0, trace free
        assert_eq!(stress.row, [0., 0., 0.]);
        let s_mag2 = 2. * (a * a + a * a);
        let alpha = 2. * 2. * delta2 * s_mag2;
        assert_relative_eq!(stress.alpha, alpha, max_relative = 1e-12);
    }
}
