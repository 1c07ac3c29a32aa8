//! # `rustles`: Subgrid-scale closures for compressible LES
//!<img align="right" src="https://rustacean.net/assets/cuddlyferris.png" width="80">
//!
//! # Dependencies
//! - cargo >= v1.55
//!
//! # Details
//!
//! This library computes the subgrid-scale (SGS) stress and heat flux
//! contributions of a large-eddy simulation of compressible, reacting
//! flow on a structured grid with one ghost layer. Given the cell
//! centered primitive state it writes face centered momentum and
//! energy fluxes, which the finite volume flux assembler of the host
//! solver adds to its resolved fluxes.
//!
//! ## Implemented closures
//!
//! - `Static Smagorinsky`, see [`closure::Smagorinsky`]
//! - `WALE`, see [`closure::Wale`]
//! - `Vreman`, see [`closure::Vreman`]
//! - `Dynamic Smagorinsky` (Germano identity), see
//!   [`closure::DynamicPipeline`]
//!
//! Static closures are evaluated face by face with
//! [`closure::compute_face_fluxes`]. The dynamic model runs in passes
//! with a test filter and ghost cell refresh in between.
//!
//! ## Collaborators
//!
//! The host solver provides specific heat ([`eos::SpecificHeat`]),
//! ghost cell refresh ([`field::boundary::GhostFill`]) and the test
//! filter ([`field::filter::SpatialFilter`]). Simple implementations
//! of all three ship with the crate.
//!
//! # Example
//! Model selected from a configuration
//! ```
//! use rustles::closure::{compute_face_fluxes, FaceInputs, SgsModel};
//! use rustles::config::LesConfig;
//! use rustles::field::functions::{apply_taylor_green, uniform_state};
//! use rustles::field::boundary::{GhostFill, PeriodicGhosts};
//! use rustles::field::{Direction, Grid};
//! use rustles::gradient::{transverse_derivatives, NUM_TRANSVERSE};
//!
//! let config: LesConfig = "model = \"vreman\"".parse().unwrap();
//! let grid = Grid::new([8, 8, 8], [0.1, 0.1, 0.1]);
//! let layout = config.layout();
//! let mut q = uniform_state(&grid, &layout.state, 1., [0., 0., 0.], 300., &[1.]);
//! apply_taylor_green(&mut q, &grid, &layout.state, 1.);
//! PeriodicGhosts.fill(q.view_mut());
//!
//! if let SgsModel::Face(model) = SgsModel::from_config(&config) {
//!     for dir in Direction::ALL {
//!         let mut td = grid.zeros(NUM_TRANSVERSE);
//!         transverse_derivatives(&q, &grid, dir, &layout.state, &mut td).unwrap();
//!         let area = grid.face_areas(dir);
//!         let mut flux = grid.zeros(layout.conserved.ncomp());
//!         let inputs = FaceInputs::new(q.view(), td.view(), area.view());
//!         compute_face_fluxes(&model, inputs, &grid, dir, &layout, &config.eos, &mut flux).unwrap();
//!     }
//! }
//! ```
//!
//! Download and run:
//!
//! `cargo doc --open`
#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_range_loop)]
#[macro_use]
extern crate enum_dispatch;
pub mod closure;
pub mod config;
pub mod eos;
pub mod error;
pub mod field;
pub mod gradient;
pub mod layout;
pub mod tensor;

pub use closure::{
    compute_face_fluxes, DynamicPipeline, DynamicSmagorinsky, FaceClosure, FaceInputs, FaceModel,
    PipelineStage, SgsModel, Smagorinsky, Vreman, Wale,
};
pub use config::{LesConfig, ModelKind};
pub use error::{LesError, Result};
pub use field::{Direction, Grid};
pub use layout::Layout;
