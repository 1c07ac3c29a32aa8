//! # Dynamic Smagorinsky kernels
//! Cell-local pieces of the dynamic model. The grid-level passes and
//! their ordering live in [`super::pipeline`].
//!
//! The model constants are estimated per cell from the Germano
//! identity between the resolved filter width `delta_bar` and the test
//! filter width `delta_hat`:
//!
//! L_ij = <rho u_i u_j> - <rho> <u_i> <u_j>
//!
//! M_ij = beta_ij * <alpha_ij>   (elementwise)
//!
//! Cs^2 = max(L_ij M_ij / (M_ij M_ij + eps), eps)
//!
//! CI = min(max(L_kk / (beta - <alpha> + eps), eps), 1)
//!
//! Cs^2/PrT = max(KE_i T_i / (T_i T_i + eps), eps)
//!
//! where `<.>` denotes test filtered quantities and `beta` the stress
//! estimate at `delta_hat` on the filtered state.
use super::{filter_width, Coefficients};
use crate::field::{at, Grid};
use crate::gradient::cell_gradient;
use crate::layout::StateLayout;
use crate::tensor::{contract, StrainRate, Tensor, Vector, ZERO};
use ndarray::{ArrayBase, Data, Ix4};

/// Independent entries of a symmetric tensor, in storage order
pub const SYMMETRIC: [(usize, usize); 6] = [(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)];

/// Dynamic Smagorinsky model parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicSmagorinsky {
    /// Resolved filter width / mean grid spacing
    pub grid_filter_ratio: f64,
    /// Test filter width / resolved filter width
    pub test_filter_ratio: f64,
    /// Denominator regularization and coefficient floor
    pub small_num: f64,
}

impl Default for DynamicSmagorinsky {
    fn default() -> Self {
        Self {
            grid_filter_ratio: 1.,
            test_filter_ratio: 2.,
            small_num: 1e-8,
        }
    }
}

impl DynamicSmagorinsky {
    /// Resolved filter width
    pub fn delta_bar(&self, grid: &Grid) -> f64 {
        filter_width(grid, self.grid_filter_ratio)
    }

    /// Test filter width
    pub fn delta_hat(&self, grid: &Grid) -> f64 {
        self.test_filter_ratio * self.delta_bar(grid)
    }
}

/// Cell-centered stress estimate with unit constant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStress {
    /// Deviatoric stress `2 mu_t (S - S_kk / 3 I)`
    pub alphaij: Tensor,
    /// Isotropic magnitude `2 mu_t |S|`
    pub alpha: f64,
    /// Heat flux proxy `mu_t grad T`
    pub flux_t: Vector,
}

/// Smagorinsky stress of cell `iv` at filter width `delta`, with the
/// local density
pub fn cell_stress<S: Data<Elem = f64>>(
    q: &ArrayBase<S, Ix4>,
    iv: [usize; 3],
    dxinv: [f64; 3],
    delta: f64,
    layout: &StateLayout,
) -> CellStress {
    let grad = cell_gradient(q, iv, dxinv, layout);
    let strain = StrainRate::from_gradient(&grad.velocity);
    let mu_t = at(q, iv, layout.rho) * delta * delta * strain.magnitude;
    let t = grad.temperature;
    CellStress {
        alphaij: strain.deviatoric_stress(mu_t),
        alpha: 2. * mu_t * strain.magnitude,
        flux_t: [mu_t * t[0], mu_t * t[1], mu_t * t[2]],
    }
}

/// Resolved second moments of cell `iv`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMoments {
    /// `rho u_i u_j`, entries in [`SYMMETRIC`] order
    pub kij: [f64; 6],
    /// `rho u_i T`
    pub rut: Vector,
}

/// Second moments `rho u_i u_j` and `rho u_i T`
pub fn resolved_moments<S: Data<Elem = f64>>(
    q: &ArrayBase<S, Ix4>,
    iv: [usize; 3],
    layout: &StateLayout,
) -> ResolvedMoments {
    let rho = at(q, iv, layout.rho);
    let temp = at(q, iv, layout.temp);
    let u = layout.vel.map(|c| at(q, iv, c));
    let mut kij = [0.; 6];
    for (s, &(m, n)) in kij.iter_mut().zip(SYMMETRIC.iter()) {
        *s = rho * u[m] * u[n];
    }
    ResolvedMoments {
        kij,
        rut: [rho * u[0] * temp, rho * u[1] * temp, rho * u[2] * temp],
    }
}

/// Symmetric tensor from its six independent entries
pub fn unpack_symmetric(packed: &[f64; 6]) -> Tensor {
    let mut t = ZERO;
    for (&v, &(m, n)) in packed.iter().zip(SYMMETRIC.iter()) {
        t[m][n] = v;
        t[n][m] = v;
    }
    t
}

/// Test filtered quantities of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilteredQuantities {
    /// Filtered `rho u_i u_j`
    pub kij: Tensor,
    /// Filtered `rho u_i T`
    pub rut: Vector,
    /// Filtered stress at `delta_bar`
    pub alphaij: Tensor,
    /// Filtered isotropic magnitude
    pub alpha: f64,
    /// Filtered heat flux proxy
    pub flux_t: Vector,
}

/// Germano identity contractions of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contractions {
    /// `L_ij M_ij`
    pub lm: f64,
    /// `M_ij M_ij`
    pub mm: f64,
    /// `L_kk`
    pub lkk: f64,
    /// `beta - <alpha>`
    pub bma: f64,
    /// `T_i T_i`
    pub tt: f64,
    /// `KE_i T_i`
    pub kt: f64,
}

/// Contractions at cell `iv` of the filtered state `qf`
pub fn contractions<S: Data<Elem = f64>>(
    qf: &ArrayBase<S, Ix4>,
    iv: [usize; 3],
    dxinv: [f64; 3],
    delta_hat: f64,
    filtered: &FilteredQuantities,
    layout: &StateLayout,
) -> Contractions {
    let test = cell_stress(qf, iv, dxinv, delta_hat, layout);
    let rho = at(qf, iv, layout.rho);
    let temp = at(qf, iv, layout.temp);
    let u = layout.vel.map(|c| at(qf, iv, c));

    let mut l = ZERO;
    let mut m = ZERO;
    for i in 0..3 {
        for j in 0..3 {
            l[i][j] = filtered.kij[i][j] - rho * u[i] * u[j];
            m[i][j] = test.alphaij[i][j] * filtered.alphaij[i][j];
        }
    }

    let mut tt = 0.;
    let mut kt = 0.;
    for i in 0..3 {
        let ke = filtered.rut[i] - rho * u[i] * temp;
        let t = filtered.flux_t[i] - test.flux_t[i];
        tt += t * t;
        kt += ke * t;
    }

    Contractions {
        lm: contract(&l, &m),
        mm: contract(&m, &m),
        lkk: l[0][0] + l[1][1] + l[2][2],
        bma: test.alpha - filtered.alpha,
        tt,
        kt,
    }
}

impl Contractions {
    /// Bounded dynamic coefficients
    ///
    /// All three are at least `eps`, `ci` is at most 1.
    /// A NaN ratio falls back to `eps`.
    pub fn coefficients(&self, eps: f64) -> Coefficients {
        Coefficients {
            cs2: (self.lm / (self.mm + eps)).max(eps),
            ci: (self.lkk / (self.bma + eps)).max(eps).min(1.),
            cs2_prt: (self.kt / (self.tt + eps)).max(eps),
        }
    }
}
