//! # Velocity gradient assembly
//! Second order velocity gradient tensors at faces and cell centers.
//!
//! Face variant: the derivative normal to the face is a difference
//! across the face, the in-plane derivatives are read from a
//! precomputed transverse derivative field `td`. `td` holds six
//! components at every face: `d(u,v,w)/dx_t0` in `0..3` and
//! `d(u,v,w)/dx_t1` in `3..6`, with `[t0, t1] = dir.transverse()`.
//!
//! Cell variant: central differences in all three directions.
use crate::error::Result;
use crate::field::{at, face_average, step_down, step_up, Direction, Grid};
use crate::layout::StateLayout;
use crate::tensor::{Tensor, Vector, ZERO};
use ndarray::{Array4, ArrayBase, Axis, Data, Ix4, Zip};

/// Number of components of the transverse derivative field
pub const NUM_TRANSVERSE: usize = 6;

/// Face velocity gradient, `g[m][n] = du_m / dx_n`
pub fn face_gradient<S1, S2>(
    q: &ArrayBase<S1, Ix4>,
    td: &ArrayBase<S2, Ix4>,
    iv: [usize; 3],
    dir: Direction,
    dxinv: f64,
    layout: &StateLayout,
) -> Tensor
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    let d = dir.axis();
    let ivm = dir.lower(iv);
    let mut g = ZERO;
    for m in 0..3 {
        let c = layout.vel[m];
        g[m][d] = dxinv * (at(q, iv, c) - at(q, ivm, c));
        for (block, &t) in dir.transverse().iter().enumerate() {
            g[m][t] = at(td, iv, 3 * block + m);
        }
    }
    g
}

/// Everything a face closure reads from the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceStencil {
    /// Face normal
    pub dir: Direction,
    /// Velocity gradient at the face
    pub gradient: Tensor,
    /// Face averaged density
    pub rho: f64,
    /// Temperature derivative normal to the face
    pub dtdn: f64,
    /// Filter width
    pub delta: f64,
}

impl FaceStencil {
    /// Gather the stencil of face `iv`
    pub fn gather<S1, S2>(
        q: &ArrayBase<S1, Ix4>,
        td: &ArrayBase<S2, Ix4>,
        iv: [usize; 3],
        dir: Direction,
        grid: &Grid,
        delta: f64,
        layout: &StateLayout,
    ) -> Self
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
    {
        let dxinv = 1. / grid.dx[dir.axis()];
        let ivm = dir.lower(iv);
        Self {
            dir,
            gradient: face_gradient(q, td, iv, dir, dxinv, layout),
            rho: face_average(q, iv, ivm, layout.rho),
            dtdn: dxinv * (at(q, iv, layout.temp) - at(q, ivm, layout.temp)),
            delta,
        }
    }
}

/// Velocity and temperature gradients at a cell center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGradient {
    /// `du_m / dx_n`
    pub velocity: Tensor,
    /// `dT / dx_n`
    pub temperature: Vector,
}

/// Central difference gradients at cell `iv`
pub fn cell_gradient<S: Data<Elem = f64>>(
    q: &ArrayBase<S, Ix4>,
    iv: [usize; 3],
    dxinv: [f64; 3],
    layout: &StateLayout,
) -> CellGradient {
    let mut velocity = ZERO;
    let mut temperature = [0.; 3];
    for n in 0..3 {
        let (ivp, ivm) = (step_up(iv, n), step_down(iv, n));
        let h = 0.5 * dxinv[n];
        for m in 0..3 {
            let c = layout.vel[m];
            velocity[m][n] = h * (at(q, ivp, c) - at(q, ivm, c));
        }
        temperature[n] = h * (at(q, ivp, layout.temp) - at(q, ivm, layout.temp));
    }
    CellGradient {
        velocity,
        temperature,
    }
}

/// Face centered transverse velocity derivatives for faces of `dir`
///
/// The in-plane derivative along axis `t` at face `iv` averages the
/// central differences of the two cells sharing the face:
/// `(q(iv+t) + q(ivm+t) - q(iv-t) - q(ivm-t)) / (4 dx_t)`.
/// Only valid faces are written.
///
/// # Errors
/// `q` or `td` do not match the grid
pub fn transverse_derivatives<S: Data<Elem = f64> + Sync>(
    q: &ArrayBase<S, Ix4>,
    grid: &Grid,
    dir: Direction,
    layout: &StateLayout,
    td: &mut Array4<f64>,
) -> Result<()> {
    grid.check_field("q", q.shape(), layout.ncomp())?;
    grid.check_field("td", td.shape(), NUM_TRANSVERSE)?;
    let dxinv = grid.dxinv();
    Zip::indexed(td.lanes_mut(Axis(3))).par_for_each(|(i, j, k), mut out| {
        let iv = [i, j, k];
        if !grid.is_face(iv, dir) {
            return;
        }
        let ivm = dir.lower(iv);
        for (block, &t) in dir.transverse().iter().enumerate() {
            let h = 0.25 * dxinv[t];
            for m in 0..3 {
                let c = layout.vel[m];
                out[3 * block + m] = h
                    * (at(q, step_up(iv, t), c) + at(q, step_up(ivm, t), c)
                        - at(q, step_down(iv, t), c)
                        - at(q, step_down(ivm, t), c));
            }
        }
    });
    Ok(())
}
