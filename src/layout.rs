//! # Variable layouts
//! Named slot indices of the primitive state `Q` and of the
//! conserved-variable flux arrays.
//!
//! Both layouts depend only on the number of species and are
//! resolved once at startup, then shared by reference with every
//! kernel.
use serde::{Deserialize, Serialize};

/// Slots of the cell-centered primitive state
///
/// `rho, u, v, w, T, Y_0 .. Y_{ns-1}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateLayout {
    /// Density
    pub rho: usize,
    /// Velocity components (u, v, w)
    pub vel: [usize; 3],
    /// Temperature
    pub temp: usize,
    /// First species mass fraction
    pub first_species: usize,
    /// Number of species
    pub nspecies: usize,
}

impl StateLayout {
    /// Layout for a mixture of `nspecies` species
    pub fn new(nspecies: usize) -> Self {
        Self {
            rho: 0,
            vel: [1, 2, 3],
            temp: 4,
            first_species: 5,
            nspecies,
        }
    }

    /// Total number of primitive components
    pub fn ncomp(&self) -> usize {
        self.first_species + self.nspecies
    }

    /// Slot of mass fraction `k`
    pub fn species(&self, k: usize) -> usize {
        self.first_species + k
    }
}

/// Slots of the conserved variables, i.e. of the flux arrays
///
/// `rho, rho*u, rho*v, rho*w, rho*E, rho*Y_0 .. rho*Y_{ns-1}`.
/// Subgrid closures write only the momentum and energy slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConservedLayout {
    /// Density
    pub rho: usize,
    /// Momentum components
    pub mom: [usize; 3],
    /// Total energy
    pub eden: usize,
    /// First species density
    pub first_species: usize,
    /// Number of species
    pub nspecies: usize,
}

impl ConservedLayout {
    /// Layout for a mixture of `nspecies` species
    pub fn new(nspecies: usize) -> Self {
        Self {
            rho: 0,
            mom: [1, 2, 3],
            eden: 4,
            first_species: 5,
            nspecies,
        }
    }

    /// Total number of conserved components
    pub fn ncomp(&self) -> usize {
        self.first_species + self.nspecies
    }
}

/// Primitive and conserved layouts of one simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Primitive state
    pub state: StateLayout,
    /// Conserved variables / fluxes
    pub conserved: ConservedLayout,
}

impl Layout {
    /// Both layouts for `nspecies` species
    pub fn new(nspecies: usize) -> Self {
        Self {
            state: StateLayout::new(nspecies),
            conserved: ConservedLayout::new(nspecies),
        }
    }
}
