//! Conversion of a face stress into momentum and energy fluxes
//!
//! All closures share this last step. Given the raw normal-row stress
//! and the model coefficients, the face flux is
//!
//! sigma_n = cs2 * row_n - ci / 3 * alpha * delta_dn
//!
//! momentum_n = -sigma_n
//!
//! energy = -sigma . u_face - cp * cs2_prt * flux_t
//!
//! and every slot is multiplied by the face area.
use super::{Coefficients, SfsStress};
use crate::eos::SpecificHeat;
use crate::field::{face_average, Direction};
use crate::layout::{ConservedLayout, StateLayout};
use crate::tensor::{delta, Vector};
use ndarray::{ArrayBase, ArrayViewMut1, Data, Ix4};

/// Subgrid flux through one face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFlux {
    /// x, y, z momentum
    pub momentum: Vector,
    /// Total energy
    pub energy: f64,
}

impl FaceFlux {
    /// Store into the momentum and energy slots of a flux lane
    pub fn write(&self, out: &mut ArrayViewMut1<'_, f64>, layout: &ConservedLayout) {
        for (m, &slot) in layout.mom.iter().enumerate() {
            out[slot] = self.momentum[m];
        }
        out[layout.eden] = self.energy;
    }
}

/// Normal row of the modelled stress including the isotropic part
pub fn normal_stress(stress: &SfsStress, coeffs: &Coefficients, dir: Direction) -> Vector {
    let d = dir.axis();
    let mut sigma = [0.; 3];
    for (n, s) in sigma.iter_mut().enumerate() {
        *s = coeffs.cs2 * stress.row[n] - coeffs.ci / 3. * stress.alpha * delta(d, n);
    }
    sigma
}

/// Face flux of face `iv`
///
/// Velocity, temperature and mass fractions are averaged over the
/// two cells sharing the face; cp is evaluated at the face state.
/// The face mass fractions are written to the first
/// `layout.nspecies` entries of `massfrac`.
///
/// # Panics
/// `massfrac` is shorter than the number of species
#[allow(clippy::too_many_arguments)]
pub fn face_flux<S, E>(
    q: &ArrayBase<S, Ix4>,
    iv: [usize; 3],
    dir: Direction,
    stress: &SfsStress,
    coeffs: &Coefficients,
    area: f64,
    layout: &StateLayout,
    eos: &E,
    massfrac: &mut [f64],
) -> FaceFlux
where
    S: Data<Elem = f64>,
    E: SpecificHeat + ?Sized,
{
    let ivm = dir.lower(iv);
    let sigma = normal_stress(stress, coeffs, dir);

    let mut energy = 0.;
    for m in 0..3 {
        energy -= sigma[m] * face_average(q, iv, ivm, layout.vel[m]);
    }

    let temp = face_average(q, iv, ivm, layout.temp);
    let massfrac = &mut massfrac[..layout.nspecies];
    for (k, y) in massfrac.iter_mut().enumerate() {
        *y = face_average(q, iv, ivm, layout.species(k));
    }
    let cp = eos.cp(temp, massfrac);
    energy -= cp * coeffs.cs2_prt * stress.flux_t;

    FaceFlux {
        momentum: [-sigma[0] * area, -sigma[1] * area, -sigma[2] * area],
        energy: energy * area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::{nitrogen, oxygen, ConstantCp, NasaMixture};
    use crate::field::functions::uniform_state;
    use crate::field::Grid;
    use approx::assert_relative_eq;

    fn coeffs() -> Coefficients {
        Coefficients {
            cs2: 0.04,
            ci: 0.3,
            cs2_prt: 0.1,
        }
    }

    #[test]
    fn test_isotropic_part_on_normal_component() {
        let stress = SfsStress {
            row: [1., 2., 3.],
            alpha: 6.,
            flux_t: 0.,
        };
        for dir in Direction::ALL {
            let sigma = normal_stress(&stress, &coeffs(), dir);
            for n in 0..3 {
                let iso = if n == dir.axis() { 0.3 / 3. * 6. } else { 0. };
                assert_relative_eq!(sigma[n], 0.04 * stress.row[n] - iso, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_face_flux() {
        let grid = Grid::new([3, 3, 3], [1., 1., 1.]);
        let layout = StateLayout::new(2);
        let q = uniform_state(&grid, &layout, 1., [1., -2., 0.5], 300., &[0.5, 0.5]);
        let stress = SfsStress {
            row: [1., 0., 0.],
            alpha: 0.,
            flux_t: 2.,
        };
        let flux = face_flux(
            &q,
            [2, 2, 2],
            Direction::X,
            &stress,
            &coeffs(),
            3.,
            &layout,
            &ConstantCp(1000.),
            &mut [0.; 2],
        );
        assert_relative_eq!(flux.momentum[0], -0.04 * 3., epsilon = 1e-14);
        assert_eq!(flux.momentum[1], 0.);
        // -sigma.u - cp * cs2_prt * flux_t
        let energy = (-0.04 * 1. - 1000. * 0.1 * 2.) * 3.;
        assert_relative_eq!(flux.energy, energy, epsilon = 1e-12);
    }

    #[test]
    fn test_reused_buffer_gives_same_flux() {
        let grid = Grid::new([3, 3, 3], [1., 1., 1.]);
        let layout = StateLayout::new(2);
        let mut q = uniform_state(&grid, &layout, 1., [1., 0., 0.], 800., &[0.75, 0.25]);
        q[[1, 2, 2, layout.species(0)]] = 0.25;
        q[[1, 2, 2, layout.species(1)]] = 0.75;
        let eos = NasaMixture::new(vec![nitrogen(), oxygen()]);
        let stress = SfsStress {
            row: [0.2, 0.1, 0.],
            alpha: 1.,
            flux_t: 3.,
        };
        let flux = |massfrac: &mut [f64]| {
            face_flux(
                &q,
                [2, 2, 2],
                Direction::X,
                &stress,
                &coeffs(),
                1.,
                &layout,
                &eos,
                massfrac,
            )
        };
        let fresh = flux(&mut [0.; 2]);
        let mut stale = vec![-4., 9., 9.];
        assert_eq!(flux(&mut stale), fresh);
        assert_eq!(stale, vec![0.5, 0.5, 9.]);

        let cp = eos.cp(800., &[0.5, 0.5]);
        let energy = -0.04 * 0.2 * 1. + 0.3 / 3. - cp * 0.1 * 3.;
        assert_relative_eq!(fresh.energy, energy, max_relative = 1e-12);
    }

    #[test]
    fn test_write_touches_four_slots() {
        let layout = ConservedLayout::new(1);
        let mut lane = ndarray::Array1::from_elem(layout.ncomp(), 7.);
        let flux = FaceFlux {
            momentum: [1., 2., 3.],
            energy: 4.,
        };
        flux.write(&mut lane.view_mut(), &layout);
        assert_eq!(lane.to_vec(), vec![7., 1., 2., 3., 4., 7.]);
    }
}
