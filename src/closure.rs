//! # Subgrid-scale closures
//! Face-centered subgrid stress and heat flux models.
//!
//! Static closures ([`Smagorinsky`], [`Wale`], [`Vreman`]) implement
//! [`FaceClosure`] and are evaluated on all faces of one direction by
//! [`compute_face_fluxes`]. The dynamic Smagorinsky model needs
//! grid-wide passes with filtering in between; it is run through a
//! [`DynamicPipeline`].
//!
//! # Example
//! Static Smagorinsky fluxes of x-faces
//!```
//! use rustles::closure::{compute_face_fluxes, FaceInputs, FaceModel, Smagorinsky};
//! use rustles::eos::ConstantCp;
//! use rustles::field::functions::{apply_shear, uniform_state};
//! use rustles::field::{Direction, Grid};
//! use rustles::gradient::{transverse_derivatives, NUM_TRANSVERSE};
//! use rustles::layout::Layout;
//!
//! let grid = Grid::new([8, 8, 8], [0.1, 0.1, 0.1]);
//! let layout = Layout::new(1);
//! let mut q = uniform_state(&grid, &layout.state, 1.2, [0., 0., 0.], 300., &[1.]);
//! apply_shear(&mut q, &grid, &layout.state, 0, 1, 10.);
//! let dir = Direction::X;
//! let mut td = grid.zeros(NUM_TRANSVERSE);
//! transverse_derivatives(&q, &grid, dir, &layout.state, &mut td).unwrap();
//! let area = grid.face_areas(dir);
//! let mut flux = grid.zeros(layout.conserved.ncomp());
//! let model = FaceModel::from(Smagorinsky::default());
//! let inputs = FaceInputs::new(q.view(), td.view(), area.view());
//! compute_face_fluxes(&model, inputs, &grid, dir, &layout, &ConstantCp(1004.5), &mut flux).unwrap();
//! assert!(flux[[4, 4, 4, layout.conserved.mom[1]]] < 0.);
//!```
pub mod dynamic;
pub mod finalize;
pub mod pipeline;
pub mod smagorinsky;
pub mod vreman;
pub mod wale;
use crate::config::{LesConfig, ModelKind};
use crate::eos::SpecificHeat;
use crate::error::Result;
use crate::field::{Direction, Grid};
use crate::gradient::{FaceStencil, NUM_TRANSVERSE};
use crate::layout::Layout;
use crate::tensor::Vector;
pub use dynamic::DynamicSmagorinsky;
use log::info;
use ndarray::parallel::prelude::*;
use ndarray::{Array4, ArrayView3, ArrayView4, Axis, Zip};
pub use pipeline::{DynamicPipeline, PipelineStage};
pub use smagorinsky::Smagorinsky;
pub use vreman::Vreman;
pub use wale::Wale;

/// Normal row of the subgrid stress at a face, before model
/// constants are applied
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SfsStress {
    /// Deviatoric stress row `2 mu_t (S_dn - delta_dn S_kk / 3)`
    pub row: Vector,
    /// Isotropic magnitude
    pub alpha: f64,
    /// Heat flux proxy `mu_t dT/dn`
    pub flux_t: f64,
}

/// Model coefficients multiplying the raw stress
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coefficients {
    /// Squared model constant
    pub cs2: f64,
    /// Isotropic coefficient
    pub ci: f64,
    /// Squared model constant over turbulent Prandtl number
    pub cs2_prt: f64,
}

impl Coefficients {
    /// Coefficients of a static model with constant `c`
    pub fn from_constant(c: f64, ci: f64, prt: f64) -> Self {
        let c2 = c * c;
        Self {
            cs2: c2,
            ci,
            cs2_prt: c2 / prt,
        }
    }
}

/// Subgrid closure evaluated locally at a face
#[enum_dispatch]
pub trait FaceClosure {
    /// Raw stress of the face described by `stencil`
    fn face_stress(&self, stencil: &FaceStencil) -> SfsStress;

    /// Model coefficients
    fn coefficients(&self) -> Coefficients;

    /// Filter width in units of the mean grid spacing
    fn grid_filter_ratio(&self) -> f64;
}

/// Static closures
#[enum_dispatch(FaceClosure)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FaceModel {
    /// Static Smagorinsky
    Smagorinsky,
    /// WALE
    Wale,
    /// Vreman
    Vreman,
}

/// Closure selected for a simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SgsModel {
    /// Evaluated face by face
    Face(FaceModel),
    /// Evaluated in passes, see [`DynamicPipeline`]
    Dynamic(DynamicSmagorinsky),
}

impl SgsModel {
    /// Model described by `config`
    pub fn from_config(config: &LesConfig) -> Self {
        let r = config.grid_filter_ratio;
        let model = match config.model {
            ModelKind::Smagorinsky => SgsModel::Face(FaceModel::from(Smagorinsky {
                grid_filter_ratio: r,
                ..Smagorinsky::new(config.cs, config.ci, config.prt)
            })),
            ModelKind::Wale => SgsModel::Face(FaceModel::from(Wale {
                grid_filter_ratio: r,
                ..Wale::new(config.cw, config.ci, config.prt)
            })),
            ModelKind::Vreman => SgsModel::Face(FaceModel::from(Vreman {
                grid_filter_ratio: r,
                ..Vreman::new(config.cw, config.ci, config.prt)
            })),
            ModelKind::DynamicSmagorinsky => SgsModel::Dynamic(DynamicSmagorinsky {
                grid_filter_ratio: r,
                test_filter_ratio: config.test_filter_ratio,
                small_num: config.small_num,
            }),
        };
        info!("Selected subgrid model {}", config.model);
        model
    }
}

/// Read-only face inputs of one direction
#[derive(Debug, Clone)]
pub struct FaceInputs<'a> {
    /// Primitive state, ghost cells valid
    pub q: ArrayView4<'a, f64>,
    /// Transverse velocity derivatives of this direction
    pub td: ArrayView4<'a, f64>,
    /// Face areas of this direction
    pub area: ArrayView3<'a, f64>,
}

impl<'a> FaceInputs<'a> {
    /// Bundle the views
    pub fn new(q: ArrayView4<'a, f64>, td: ArrayView4<'a, f64>, area: ArrayView3<'a, f64>) -> Self {
        Self { q, td, area }
    }

    /// Check all views against the grid
    ///
    /// # Errors
    /// Any shape mismatch
    pub fn check(&self, grid: &Grid, layout: &Layout) -> Result<()> {
        grid.check_field("q", self.q.shape(), layout.state.ncomp())?;
        grid.check_field("td", self.td.shape(), NUM_TRANSVERSE)?;
        grid.check_scalar("area", self.area.shape())
    }
}

/// Resolved filter width of `grid`
pub fn filter_width(grid: &Grid, grid_filter_ratio: f64) -> f64 {
    grid_filter_ratio * grid.mean_spacing()
}

/// Evaluate a face closure on all faces of direction `dir`
///
/// Overwrites the momentum and energy slots of `flux` at every valid
/// face. Other slots and faces are not touched. Each worker thread
/// keeps one mass fraction buffer for the cp evaluation.
///
/// # Errors
/// Input or output arrays do not match grid and layout
pub fn compute_face_fluxes<C, E>(
    closure: &C,
    inputs: FaceInputs<'_>,
    grid: &Grid,
    dir: Direction,
    layout: &Layout,
    eos: &E,
    flux: &mut Array4<f64>,
) -> Result<()>
where
    C: FaceClosure + Sync,
    E: SpecificHeat + Sync + ?Sized,
{
    inputs.check(grid, layout)?;
    grid.check_field("flux", flux.shape(), layout.conserved.ncomp())?;
    let delta = filter_width(grid, closure.grid_filter_ratio());
    let coeffs = closure.coefficients();
    let state = &layout.state;
    let conserved = &layout.conserved;
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
            let stress = closure.face_stress(&stencil);
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
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::{nitrogen, oxygen, ConstantCp, NasaMixture};
    use crate::field::functions::{apply_shear, apply_taylor_green, norm_l2, uniform_state};
    use crate::gradient::transverse_derivatives;
    use approx::assert_relative_eq;

    fn models() -> Vec<FaceModel> {
        vec![
            Smagorinsky::new(0.1, 0.2, 0.7).into(),
            Wale::new(0.5, 0.2, 0.7).into(),
            Vreman::new(0.5, 0.2, 0.7).into(),
        ]
    }

    fn fluxes(
        model: &FaceModel,
        q: &Array4<f64>,
        grid: &Grid,
        layout: &Layout,
        dir: Direction,
        scale: f64,
    ) -> Array4<f64> {
        let mut td = grid.zeros(NUM_TRANSVERSE);
        transverse_derivatives(q, grid, dir, &layout.state, &mut td).unwrap();
        let area = grid.face_areas(dir) * scale;
        let mut flux = grid.zeros(layout.conserved.ncomp());
        let inputs = FaceInputs::new(q.view(), td.view(), area.view());
        let eos = ConstantCp(1000.);
        compute_face_fluxes(model, inputs, grid, dir, layout, &eos, &mut flux).unwrap();
        flux
    }

    fn turbulent_state(grid: &Grid, layout: &Layout) -> Array4<f64> {
        let mut q = uniform_state(grid, &layout.state, 1.1, [0.3, 0., 0.], 300., &[0.2, 0.8]);
        apply_taylor_green(&mut q, grid, &layout.state, 2.);
        apply_shear(&mut q, grid, &layout.state, 2, 0, 1.5);
        for ((i, j, _, c), v) in q.indexed_iter_mut() {
            if c == layout.state.temp {
                *v += 10. * (i as f64).sin() + (j as f64).cos();
            }
        }
        q
    }

    #[test]
    fn test_uniform_flow_gives_zero_flux() {
        let grid = Grid::new([4, 5, 6], [0.1, 0.1, 0.1]);
        let layout = Layout::new(2);
        let q = uniform_state(&grid, &layout.state, 1.2, [3., -1., 2.], 310., &[0.4, 0.6]);
        for model in models() {
            for dir in Direction::ALL {
                let flux = fluxes(&model, &q, &grid, &layout, dir, 1.);
                assert!(flux.iter().all(|v| *v == 0.), "{:?} {:?}", model, dir);
            }
        }
    }

    #[test]
    fn test_flux_scales_with_area() {
        let grid = Grid::new([6, 6, 6], [0.1, 0.1, 0.1]);
        let layout = Layout::new(2);
        let q = turbulent_state(&grid, &layout);
        for model in models() {
            for dir in Direction::ALL {
                let single = fluxes(&model, &q, &grid, &layout, dir, 1.);
                let double = fluxes(&model, &q, &grid, &layout, dir, 2.);
                for (a, b) in single.iter().zip(double.iter()) {
                    assert_relative_eq!(2. * a, b, max_relative = 1e-12);
                }
                assert!(norm_l2(&single) > 0.);
            }
        }
    }

    #[test]
    fn test_only_valid_faces_and_four_slots_are_written() {
        let grid = Grid::new([4, 4, 4], [0.1, 0.1, 0.1]);
        let layout = Layout::new(2);
        let q = turbulent_state(&grid, &layout);
        let dir = Direction::Y;
        let mut td = grid.zeros(NUM_TRANSVERSE);
        transverse_derivatives(&q, &grid, dir, &layout.state, &mut td).unwrap();
        let area = grid.face_areas(dir);
        let mut flux = Array4::from_elem(grid.field_shape(layout.conserved.ncomp()), -9.);
        let inputs = FaceInputs::new(q.view(), td.view(), area.view());
        let model = FaceModel::from(Smagorinsky::default());
        let eos = ConstantCp(1000.);
        compute_face_fluxes(&model, inputs, &grid, dir, &layout, &eos, &mut flux).unwrap();
        let slots = &layout.conserved;
        for ((i, j, k, c), v) in flux.indexed_iter() {
            let slot = slots.mom.contains(&c) || c == slots.eden;
            if !(grid.is_face([i, j, k], dir) && slot) {
                assert_eq!(*v, -9.);
            }
        }
        assert_ne!(flux[[2, 5, 2, layout.conserved.eden]], -9.);
        assert_eq!(flux[[2, 5, 2, layout.conserved.rho]], -9.);
    }

    #[test]
    fn test_doubling_cs_quadruples_deviatoric_part() {
        // momentum flux = -area (cs2 row - ci/3 alpha delta_dn)
        let grid = Grid::new([5, 5, 5], [0.1, 0.1, 0.1]);
        let layout = Layout::new(2);
        let q = turbulent_state(&grid, &layout);
        let dir = Direction::X;
        let run = |cs: f64, ci: f64| {
            let model: FaceModel = Smagorinsky::new(cs, ci, 0.7).into();
            fluxes(&model, &q, &grid, &layout, dir, 1.)
        };
        let (base, double_cs) = (run(0.1, 0.), run(0.2, 0.));
        let (iso, iso_double_cs) = (run(0.1, 0.3), run(0.2, 0.3));
        let mx = layout.conserved.mom[0];
        for i in 1..=6 {
            let iv = [i, 3, 3];
            let dev = base[[iv[0], iv[1], iv[2], mx]];
            let dev2 = double_cs[[iv[0], iv[1], iv[2], mx]];
            assert_relative_eq!(dev2, 4. * dev, max_relative = 1e-10);
            let ci_term = iso[[iv[0], iv[1], iv[2], mx]] - dev;
            let ci_term2 = iso_double_cs[[iv[0], iv[1], iv[2], mx]] - dev2;
            assert_relative_eq!(ci_term, ci_term2, max_relative = 1e-8, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let grid = Grid::new([4, 4, 4], [0.1, 0.1, 0.1]);
        let layout = Layout::new(1);
        let q = grid.zeros(layout.state.ncomp());
        let td = grid.zeros(NUM_TRANSVERSE);
        let area = grid.face_areas(Direction::X);
        let mut flux = grid.zeros(3);
        let inputs = FaceInputs::new(q.view(), td.view(), area.view());
        let model = FaceModel::from(Wale::default());
        let (dir, eos) = (Direction::X, ConstantCp(1.));
        let result = compute_face_fluxes(&model, inputs, &grid, dir, &layout, &eos, &mut flux);
        assert!(result.is_err());
    }

    #[test]
    fn test_mixture_cp_matches_single_face_evaluation() {
        let grid = Grid::new([5, 4, 3], [0.1, 0.1, 0.1]);
        let layout = Layout::new(2);
        let q = turbulent_state(&grid, &layout);
        let eos = NasaMixture::new(vec![nitrogen(), oxygen()]);
        let model = FaceModel::from(Vreman::default());
        for dir in Direction::ALL {
            let mut td = grid.zeros(NUM_TRANSVERSE);
            transverse_derivatives(&q, &grid, dir, &layout.state, &mut td).unwrap();
            let area = grid.face_areas(dir);
            let mut flux = grid.zeros(layout.conserved.ncomp());
            let inputs = FaceInputs::new(q.view(), td.view(), area.view());
            compute_face_fluxes(&model, inputs, &grid, dir, &layout, &eos, &mut flux).unwrap();

            let delta = filter_width(&grid, model.grid_filter_ratio());
            for iv in [[1, 1, 1], [2, 3, 2], [5, 4, 3]] {
                let stencil = FaceStencil::gather(&q, &td, iv, dir, &grid, delta, &layout.state);
                let stress = model.face_stress(&stencil);
                let mut massfrac = [0.; 2];
                let face = finalize::face_flux(
                    &q,
                    iv,
                    dir,
                    &stress,
                    &model.coefficients(),
                    area[iv],
                    &layout.state,
                    &eos,
                    &mut massfrac,
                );
                let [i, j, k] = iv;
                assert_eq!(flux[[i, j, k, layout.conserved.eden]], face.energy);
            }
        }
    }

    #[test]
    fn test_from_config() {
        let mut config = LesConfig::default();
        config.model = ModelKind::Wale;
        config.cw = 0.4;
        match SgsModel::from_config(&config) {
            SgsModel::Face(FaceModel::Wale(w)) => assert_eq!(w.cw, 0.4),
            other => panic!("unexpected model {:?}", other),
        }
        config.model = ModelKind::DynamicSmagorinsky;
        let model = SgsModel::from_config(&config);
        assert!(matches!(model, SgsModel::Dynamic(_)));
    }
}
