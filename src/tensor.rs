//! Small dense 3x3 tensor algebra used by the closures
//!
//! Tensors are plain row-major arrays, `t[m][n]`. For velocity
//! gradients `g[m][n] = du_m / dx_n`.

/// Second order tensor
pub type Tensor = [[f64; 3]; 3];

/// Vector
pub type Vector = [f64; 3];

/// Zero tensor
pub const ZERO: Tensor = [[0.; 3]; 3];

/// Kronecker delta
#[inline]
pub fn delta(m: usize, n: usize) -> f64 {
    if m == n {
        1.
    } else {
        0.
    }
}

/// Symmetric part 1/2 (t + t^T)
pub fn symmetric_part(t: &Tensor) -> Tensor {
    let mut s = ZERO;
    for m in 0..3 {
        for n in 0..3 {
            s[m][n] = 0.5 * (t[m][n] + t[n][m]);
        }
    }
    s
}

/// Matrix product a . b
pub fn product(a: &Tensor, b: &Tensor) -> Tensor {
    let mut c = ZERO;
    for m in 0..3 {
        for n in 0..3 {
            c[m][n] = a[m][0] * b[0][n] + a[m][1] * b[1][n] + a[m][2] * b[2][n];
        }
    }
    c
}

/// Trace
pub fn trace(t: &Tensor) -> f64 {
    t[0][0] + t[1][1] + t[2][2]
}

/// Double contraction a_ij b_ij
pub fn contract(a: &Tensor, b: &Tensor) -> f64 {
    let mut sum = 0.;
    for m in 0..3 {
        for n in 0..3 {
            sum += a[m][n] * b[m][n];
        }
    }
    sum
}

/// Trace-free part t - tr(t)/3 I
pub fn deviatoric(t: &Tensor) -> Tensor {
    let third = trace(t) / 3.;
    let mut d = *t;
    for m in 0..3 {
        d[m][m] -= third;
    }
    d
}

/// Strain rate S = 1/2 (g + g^T) of a velocity gradient and
/// its invariants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrainRate {
    /// Strain rate tensor
    pub s: Tensor,
    /// S_ij S_ij
    pub sijsij: f64,
    /// |S| = sqrt(2 S_ij S_ij)
    pub magnitude: f64,
    /// S_kk
    pub trace: f64,
}

impl StrainRate {
    /// Strain rate of velocity gradient `g`
    pub fn from_gradient(g: &Tensor) -> Self {
        let s = symmetric_part(g);
        let sijsij = contract(&s, &s);
        Self {
            s,
            sijsij,
            magnitude: (2. * sijsij).sqrt(),
            trace: trace(&s),
        }
    }

    /// Row `d` of the deviatoric eddy-viscosity stress
    /// 2 mu_t (S_dn - delta_dn S_kk / 3)
    pub fn deviatoric_row(&self, d: usize, mu_t: f64) -> Vector {
        let mut row = [0.; 3];
        for (n, r) in row.iter_mut().enumerate() {
            *r = 2. * mu_t * (self.s[d][n] - delta(d, n) * self.trace / 3.);
        }
        row
    }

    /// Full deviatoric eddy-viscosity stress 2 mu_t (S - S_kk / 3 I)
    pub fn deviatoric_stress(&self, mu_t: f64) -> Tensor {
        let mut t = deviatoric(&self.s);
        for row in t.iter_mut() {
            for v in row.iter_mut() {
                *v *= 2. * mu_t;
            }
        }
        t
    }
}
