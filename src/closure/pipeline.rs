//! # Dynamic Smagorinsky pipeline
//! Grid-level passes of the dynamic model. One cycle runs
//!
//! 1. [`DynamicPipeline::compute_quantities`]: cell stress at the
//!    resolved filter width and resolved second moments
//! 2. [`DynamicPipeline::apply_filter`]: test filter of the state and of
//!    all quantities of pass 1
//! 3. [`DynamicPipeline::compute_coefficients`]: Germano identity per
//!    cell
//! 4. [`DynamicPipeline::apply_terms`]: face fluxes with the dynamic
//!    coefficients, once per direction
//!
//! Every pass is a barrier over the whole grid and refreshes the ghost
//! cells of what it wrote. Calling a pass out of order is an error and
//! leaves all buffers untouched.
//!
//! # Example
//!```
//! use rustles::closure::{DynamicPipeline, DynamicSmagorinsky, FaceInputs};
//! use rustles::eos::ConstantCp;
//! use rustles::field::boundary::{GhostFill, PeriodicGhosts};
//! use rustles::field::filter::BoxFilter;
//! use rustles::field::functions::{apply_taylor_green, uniform_state};
//! use rustles::field::{Direction, Grid};
//! use rustles::gradient::{transverse_derivatives, NUM_TRANSVERSE};
//! use rustles::layout::Layout;
//!
//! let grid = Grid::new([8, 8, 8], [0.1, 0.1, 0.1]);
//! let layout = Layout::new(1);
//! let mut q = uniform_state(&grid, &layout.state, 1., [0., 0., 0.], 300., &[1.]);
//! apply_taylor_green(&mut q, &grid, &layout.state, 1.);
//! PeriodicGhosts.fill(q.view_mut());
//!
//! let mut pipeline = DynamicPipeline::new(DynamicSmagorinsky::default(), grid, layout);
//! pipeline.compute_quantities(&q, &PeriodicGhosts).unwrap();
//! pipeline.apply_filter(&q, &BoxFilter, &PeriodicGhosts).unwrap();
//! pipeline.compute_coefficients(&PeriodicGhosts).unwrap();
//! for dir in Direction::ALL {
//!     let mut td = grid.zeros(NUM_TRANSVERSE);
//!     transverse_derivatives(&q, &grid, dir, &layout.state, &mut td).unwrap();
//!     let area = grid.face_areas(dir);
//!     let mut flux = grid.zeros(layout.conserved.ncomp());
//!     let inputs = FaceInputs::new(q.view(), td.view(), area.view());
//!     pipeline.apply_terms(inputs, dir, &ConstantCp(1004.5), &mut flux).unwrap();
//! }
//!```
use super::dynamic::{self, unpack_symmetric, DynamicSmagorinsky, FilteredQuantities, SYMMETRIC};
use super::{finalize, smagorinsky, Coefficients, FaceInputs};
use crate::eos::SpecificHeat;
use crate::error::{LesError, Result};
use crate::field::boundary::GhostFill;
use crate::field::filter::SpatialFilter;
use crate::field::{Direction, Grid};
use crate::gradient::FaceStencil;
use crate::layout::Layout;
use crate::tensor::{Tensor, ZERO};
use log::{debug, warn};
use ndarray::parallel::prelude::*;
use ndarray::{Array4, ArrayBase, ArrayView4, Axis, Data, Ix4, Zip};
use std::fmt;

/// Slot of `Cs^2` in the coefficient field
pub const COEFF_CS2: usize = 0;
/// Slot of `CI` in the coefficient field
pub const COEFF_CI: usize = 1;
/// Slot of `Cs^2 / PrT` in the coefficient field
pub const COEFF_CS2_PRT: usize = 2;

/// Last completed pass of a [`DynamicPipeline`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Nothing computed yet
    Ready,
    /// Resolved quantities available
    Quantities,
    /// Quantities and state test filtered
    Filtered,
    /// Coefficients available
    Coefficients,
    /// Terms applied for at least one direction
    Applied,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Ready => "Ready",
            PipelineStage::Quantities => "Quantities",
            PipelineStage::Filtered => "Filtered",
            PipelineStage::Coefficients => "Coefficients",
            PipelineStage::Applied => "Applied",
        };
        write!(f, "{}", name)
    }
}

/// Dynamic Smagorinsky model with its intermediate fields
///
/// All buffers are cell-centered with one ghost layer and are reused
/// from cycle to cycle.
#[derive(Debug, Clone)]
pub struct DynamicPipeline {
    /// Model parameters
    pub model: DynamicSmagorinsky,
    grid: Grid,
    layout: Layout,
    stage: PipelineStage,
    /// `rho u_i u_j`, symmetric storage
    kij: Array4<f64>,
    /// `rho u_i T`
    rut: Array4<f64>,
    /// Cell stress, full 3x3 row-major
    alphaij: Array4<f64>,
    /// Isotropic magnitude
    alpha: Array4<f64>,
    /// Heat flux proxy
    flux_t: Array4<f64>,
    /// Test filtered state
    q_filtered: Array4<f64>,
    /// `Cs^2`, `CI`, `Cs^2/PrT`
    coeff: Array4<f64>,
}

impl DynamicPipeline {
    /// Allocate all buffers for `grid`
    pub fn new(model: DynamicSmagorinsky, grid: Grid, layout: Layout) -> Self {
        Self {
            model,
            grid,
            layout,
            stage: PipelineStage::Ready,
            kij: grid.zeros(SYMMETRIC.len()),
            rut: grid.zeros(3),
            alphaij: grid.zeros(9),
            alpha: grid.zeros(1),
            flux_t: grid.zeros(3),
            q_filtered: grid.zeros(layout.state.ncomp()),
            coeff: grid.zeros(3),
        }
    }

    /// Last completed pass
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Start over, buffers are kept
    pub fn reset(&mut self) {
        self.advance(PipelineStage::Ready);
    }

    /// Coefficient field, see [`COEFF_CS2`], [`COEFF_CI`], [`COEFF_CS2_PRT`]
    pub fn coefficients(&self) -> ArrayView4<'_, f64> {
        self.coeff.view()
    }

    /// Cell stress field, component `3 * m + n`
    pub fn cell_stress(&self) -> ArrayView4<'_, f64> {
        self.alphaij.view()
    }

    /// Test filtered state
    pub fn filtered_state(&self) -> ArrayView4<'_, f64> {
        self.q_filtered.view()
    }

    fn expect(&self, allowed: &[PipelineStage], expected: &'static str) -> Result<()> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(LesError::StageOrder {
                expected,
                found: self.stage,
            })
        }
    }

    fn advance(&mut self, next: PipelineStage) {
        debug!("Dynamic pipeline {} -> {}", self.stage, next);
        self.stage = next;
    }

    /// Pass 1: cell stress at the resolved filter width, `rho u_i u_j`
    /// and `rho u_i T`
    ///
    /// # Errors
    /// Called in the middle of a cycle, or `q` does not match the grid
    pub fn compute_quantities<S, G>(&mut self, q: &ArrayBase<S, Ix4>, ghosts: &G) -> Result<()>
    where
        S: Data<Elem = f64> + Sync,
        G: GhostFill,
    {
        self.expect(
            &[PipelineStage::Ready, PipelineStage::Applied],
            "Ready or Applied",
        )?;
        self.grid
            .check_field("q", q.shape(), self.layout.state.ncomp())?;
        let grid = &self.grid;
        let layout = &self.layout.state;
        let dxinv = grid.dxinv();
        let delta = self.model.delta_bar(grid);

        Zip::indexed(self.kij.lanes_mut(Axis(3)))
            .and(self.rut.lanes_mut(Axis(3)))
            .and(self.alphaij.lanes_mut(Axis(3)))
            .and(self.alpha.lanes_mut(Axis(3)))
            .and(self.flux_t.lanes_mut(Axis(3)))
            .par_for_each(|(i, j, k), mut kij, mut rut, mut aij, mut a, mut ft| {
                let iv = [i, j, k];
                if !grid.is_interior(iv) {
                    return;
                }
                let stress = dynamic::cell_stress(q, iv, dxinv, delta, layout);
                for m in 0..3 {
                    for n in 0..3 {
                        aij[3 * m + n] = stress.alphaij[m][n];
                    }
                    ft[m] = stress.flux_t[m];
                }
                a[0] = stress.alpha;
                let moments = dynamic::resolved_moments(q, iv, layout);
                for (s, v) in moments.kij.iter().enumerate() {
                    kij[s] = *v;
                }
                for m in 0..3 {
                    rut[m] = moments.rut[m];
                }
            });

        for field in self.quantities_mut().iter_mut() {
            ghosts.fill(field.view_mut());
        }
        self.advance(PipelineStage::Quantities);
        Ok(())
    }

    /// Filter stage: test filter `q` and all fields of pass 1
    ///
    /// # Errors
    /// Pass 1 not completed, or `q` does not match the grid
    pub fn apply_filter<S, F, G>(
        &mut self,
        q: &ArrayBase<S, Ix4>,
        filter: &F,
        ghosts: &G,
    ) -> Result<()>
    where
        S: Data<Elem = f64>,
        F: SpatialFilter,
        G: GhostFill,
    {
        self.expect(&[PipelineStage::Quantities], "Quantities")?;
        self.grid
            .check_field("q", q.shape(), self.layout.state.ncomp())?;
        if (filter.ratio() - self.model.test_filter_ratio).abs() > 1e-12 {
            warn!(
                "Test filter ratio {} differs from configured ratio {}",
                filter.ratio(),
                self.model.test_filter_ratio
            );
        }

        filter.apply(q.view(), self.q_filtered.view_mut());
        ghosts.fill(self.q_filtered.view_mut());
        for field in self.quantities_mut().iter_mut() {
            let input = field.view().to_owned();
            filter.apply(input.view(), field.view_mut());
            ghosts.fill(field.view_mut());
        }
        self.advance(PipelineStage::Filtered);
        Ok(())
    }

    /// Pass 2: per cell coefficients from the Germano identity
    ///
    /// # Errors
    /// Filter stage not completed
    pub fn compute_coefficients<G: GhostFill>(&mut self, ghosts: &G) -> Result<()> {
        self.expect(&[PipelineStage::Filtered], "Filtered")?;
        let grid = &self.grid;
        let layout = &self.layout.state;
        let dxinv = grid.dxinv();
        let delta_hat = self.model.delta_hat(grid);
        let eps = self.model.small_num;
        let (qf, kij, rut) = (&self.q_filtered, &self.kij, &self.rut);
        let (aij, alpha, flux_t) = (&self.alphaij, &self.alpha, &self.flux_t);

        Zip::indexed(self.coeff.lanes_mut(Axis(3))).par_for_each(|(i, j, k), mut c| {
            let iv = [i, j, k];
            if !grid.is_interior(iv) {
                return;
            }
            let filtered = FilteredQuantities {
                kij: unpack_symmetric(&lane(kij, iv)),
                rut: lane(rut, iv),
                alphaij: unpack_full(&lane(aij, iv)),
                alpha: alpha[[i, j, k, 0]],
                flux_t: lane(flux_t, iv),
            };
            let contractions = dynamic::contractions(qf, iv, dxinv, delta_hat, &filtered, layout);
            let coeffs = contractions.coefficients(eps);
            c[COEFF_CS2] = coeffs.cs2;
            c[COEFF_CI] = coeffs.ci;
            c[COEFF_CS2_PRT] = coeffs.cs2_prt;
        });

        ghosts.fill(self.coeff.view_mut());
        self.advance(PipelineStage::Coefficients);
        Ok(())
    }

    /// Pass 3: subgrid fluxes of all faces of direction `dir`
    ///
    /// The face stress is the unit-constant Smagorinsky stress at the
    /// resolved filter width, the coefficients are averaged over the
    /// two cells sharing the face. Writes the same slots as
    /// [`super::compute_face_fluxes`].
    ///
    /// # Errors
    /// Coefficients not computed, or arrays do not match the grid
    pub fn apply_terms<E>(
        &mut self,
        inputs: FaceInputs<'_>,
        dir: Direction,
        eos: &E,
        flux: &mut Array4<f64>,
    ) -> Result<()>
    where
        E: SpecificHeat + Sync + ?Sized,
    {
        self.expect(
            &[PipelineStage::Coefficients, PipelineStage::Applied],
            "Coefficients or Applied",
        )?;
        inputs.check(&self.grid, &self.layout)?;
        self.grid
            .check_field("flux", flux.shape(), self.layout.conserved.ncomp())?;
        let grid = &self.grid;
        let state = &self.layout.state;
        let conserved = &self.layout.conserved;
        let delta = self.model.delta_bar(grid);
        let coeff = &self.coeff;
        let FaceInputs { q, td, area } = inputs;
        let scratch = || vec![0.; state.nspecies];

        Zip::indexed(flux.lanes_mut(Axis(3)))
            .into_par_iter()
            .for_each_init(scratch, |massfrac, ((i, j, k), mut out)| {
                let iv = [i, j, k];
                if !grid.is_face(iv, dir) {
                    return;
                }
                let stencil = FaceStencil::gather(&q, &td, iv, dir, grid, delta, state);
                let stress = smagorinsky::sfs_stress(&stencil);
                let coeffs = face_coefficients(coeff, iv, dir.lower(iv));
                let face = finalize::face_flux(
                    &q,
                    iv,
                    dir,
                    &stress,
                    &coeffs,
                    area[iv],
                    state,
                    eos,
                    massfrac,
                );
                face.write(&mut out, conserved);
            });

        self.advance(PipelineStage::Applied);
        Ok(())
    }

    fn quantities_mut(&mut self) -> [&mut Array4<f64>; 5] {
        [
            &mut self.kij,
            &mut self.rut,
            &mut self.alphaij,
            &mut self.alpha,
            &mut self.flux_t,
        ]
    }
}

/// First `N` components of cell `iv`
fn lane<const N: usize>(field: &Array4<f64>, iv: [usize; 3]) -> [f64; N] {
    let mut out = [0.; N];
    for (c, v) in out.iter_mut().enumerate() {
        *v = field[[iv[0], iv[1], iv[2], c]];
    }
    out
}

fn unpack_full(values: &[f64; 9]) -> Tensor {
    let mut t = ZERO;
    for m in 0..3 {
        for n in 0..3 {
            t[m][n] = values[3 * m + n];
        }
    }
    t
}

/// Mean coefficients of the two cells sharing a face
fn face_coefficients(coeff: &Array4<f64>, iv: [usize; 3], ivm: [usize; 3]) -> Coefficients {
    let a: [f64; 3] = lane(coeff, iv);
    let b: [f64; 3] = lane(coeff, ivm);
    Coefficients {
        cs2: 0.5 * (a[COEFF_CS2] + b[COEFF_CS2]),
        ci: 0.5 * (a[COEFF_CI] + b[COEFF_CI]),
        cs2_prt: 0.5 * (a[COEFF_CS2_PRT] + b[COEFF_CS2_PRT]),
    }
}
