//! # Structured grid fields
//! Grid description and index helpers for cell-centered and
//! face-centered `ndarray` fields.
//!
//! Every field carries one ghost layer, i.e. a grid with `n` interior
//! cells along an axis holds `n + 2` entries along that axis.
//! Interior cells have array indices `1..=n`.
//!
//! Faces are addressed by the cell above them: face `iv` of
//! direction `d` separates cell `iv - e_d` from cell `iv`. Valid faces
//! have index `1..=n+1` along `d` and `1..=n` along the other axes.
pub mod boundary;
pub mod filter;
pub mod functions;
use crate::error::{LesError, Result};
use ndarray::{Array3, Array4, ArrayBase, Data, Ix4};
use serde::{Deserialize, Serialize};

/// Number of ghost layers
pub const NGHOST: usize = 1;

/// Face normal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Faces normal to x
    X,
    /// Faces normal to y
    Y,
    /// Faces normal to z
    Z,
}

impl Direction {
    /// All directions, in axis order
    pub const ALL: [Direction; 3] = [Direction::X, Direction::Y, Direction::Z];

    /// Axis of the face normal
    pub fn axis(self) -> usize {
        match self {
            Direction::X => 0,
            Direction::Y => 1,
            Direction::Z => 2,
        }
    }

    /// The two in-plane axes of the face, in increasing order.
    ///
    /// This is also the order of the two derivative blocks
    /// in the transverse derivative field.
    pub fn transverse(self) -> [usize; 2] {
        match self {
            Direction::X => [1, 2],
            Direction::Y => [0, 2],
            Direction::Z => [0, 1],
        }
    }

    /// Cell below face `iv`
    pub fn lower(self, iv: [usize; 3]) -> [usize; 3] {
        step_down(iv, self.axis())
    }
}

/// `iv + e_axis`
pub fn step_up(iv: [usize; 3], axis: usize) -> [usize; 3] {
    let mut out = iv;
    out[axis] += 1;
    out
}

/// `iv - e_axis`
pub fn step_down(iv: [usize; 3], axis: usize) -> [usize; 3] {
    let mut out = iv;
    out[axis] -= 1;
    out
}

/// Read component `comp` of cell `iv`
#[inline]
pub fn at<S: Data<Elem = f64>>(field: &ArrayBase<S, Ix4>, iv: [usize; 3], comp: usize) -> f64 {
    field[[iv[0], iv[1], iv[2], comp]]
}

/// Arithmetic mean of component `comp` over two cells
#[inline]
pub fn face_average<S: Data<Elem = f64>>(
    field: &ArrayBase<S, Ix4>,
    iv: [usize; 3],
    ivm: [usize; 3],
    comp: usize,
) -> f64 {
    0.5 * (at(field, iv, comp) + at(field, ivm, comp))
}

/// Uniform structured grid
///
/// n: interior cells per axis
///
/// dx: grid spacing per axis
///
/// # Example
///```
/// use rustles::field::{Direction, Grid};
///
/// let grid = Grid::new([8, 8, 4], [0.1, 0.1, 0.2]);
/// let q = grid.zeros(6);
/// assert_eq!(q.shape(), &[10, 10, 6, 6]);
/// assert!(grid.is_face([9, 1, 1], Direction::X));
/// assert!(!grid.is_face([9, 1, 1], Direction::Y));
///```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Number of interior cells
    pub n: [usize; 3],
    /// Grid spacing
    pub dx: [f64; 3],
}

impl Grid {
    /// Return a new grid
    pub fn new(n: [usize; 3], dx: [f64; 3]) -> Self {
        Self { n, dx }
    }

    /// Spatial shape of a field including ghost layers
    pub fn shape(&self) -> [usize; 3] {
        [
            self.n[0] + 2 * NGHOST,
            self.n[1] + 2 * NGHOST,
            self.n[2] + 2 * NGHOST,
        ]
    }

    /// Shape of a field with `ncomp` components
    pub fn field_shape(&self, ncomp: usize) -> [usize; 4] {
        let s = self.shape();
        [s[0], s[1], s[2], ncomp]
    }

    /// Zero initialized field with `ncomp` components
    pub fn zeros(&self, ncomp: usize) -> Array4<f64> {
        Array4::zeros(self.field_shape(ncomp))
    }

    /// Face areas of direction `dir` (uniform grid)
    pub fn face_areas(&self, dir: Direction) -> Array3<f64> {
        Array3::from_elem(self.shape(), self.face_area(dir))
    }

    /// Area of a single face normal to `dir`
    pub fn face_area(&self, dir: Direction) -> f64 {
        let [a, b] = dir.transverse();
        self.dx[a] * self.dx[b]
    }

    /// Inverse grid spacing
    pub fn dxinv(&self) -> [f64; 3] {
        [1. / self.dx[0], 1. / self.dx[1], 1. / self.dx[2]]
    }

    /// Arithmetic mean of the grid spacings
    pub fn mean_spacing(&self) -> f64 {
        (self.dx[0] + self.dx[1] + self.dx[2]) / 3.
    }

    /// True for interior (non-ghost) cells
    pub fn is_interior(&self, iv: [usize; 3]) -> bool {
        (0..3).all(|a| iv[a] >= NGHOST && iv[a] <= self.n[a])
    }

    /// True if `iv` addresses a face of direction `dir`
    /// on or inside the domain boundary
    pub fn is_face(&self, iv: [usize; 3], dir: Direction) -> bool {
        let d = dir.axis();
        (0..3).all(|a| {
            let hi = if a == d { self.n[a] + 1 } else { self.n[a] };
            iv[a] >= NGHOST && iv[a] <= hi
        })
    }

    /// Check that a field has the shape of this grid
    /// with `ncomp` components
    ///
    /// # Errors
    /// Shape does not match
    pub fn check_field(&self, name: &'static str, shape: &[usize], ncomp: usize) -> Result<()> {
        let expected = self.field_shape(ncomp);
        if shape == expected {
            Ok(())
        } else {
            Err(LesError::ShapeMismatch {
                name,
                expected: expected.to_vec(),
                found: shape.to_vec(),
            })
        }
    }

    /// Check that a scalar face field has the shape of this grid
    ///
    /// # Errors
    /// Shape does not match
    pub fn check_scalar(&self, name: &'static str, shape: &[usize]) -> Result<()> {
        let expected = self.shape();
        if shape == expected {
            Ok(())
        } else {
            Err(LesError::ShapeMismatch {
                name,
                expected: expected.to_vec(),
                found: shape.to_vec(),
            })
        }
    }
}
