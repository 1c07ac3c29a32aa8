//! Run example:
//!
//! cargo run --release -- [config.toml]
//!
//! Evaluates the configured subgrid closure on a periodic Taylor-Green
//! vortex with superposed shear and logs the flux norms.
//! Set `RUST_LOG=debug` to follow the dynamic pipeline.
use log::{error, info};
use rustles::closure::{compute_face_fluxes, DynamicPipeline, FaceInputs, SgsModel};
use rustles::config::LesConfig;
use rustles::eos::SpecificHeat;
use rustles::field::boundary::{GhostFill, PeriodicGhosts};
use rustles::field::filter::BoxFilter;
use rustles::field::functions::{apply_shear, apply_taylor_green, norm_l2, uniform_state};
use rustles::field::{Direction, Grid};
use rustles::gradient::{transverse_derivatives, NUM_TRANSVERSE};
use rustles::Result;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => LesConfig::from_file(path)?,
        None => {
            info!("No configuration given, using defaults");
            LesConfig::default()
        }
    };
    let default_grid = Grid::new([32, 32, 32], [1. / 32.; 3]);
    let grid = config.grid.unwrap_or(default_grid);
    let layout = config.layout();
    info!("Grid {:?}, {} species", grid.n, layout.state.nspecies);

    // Taylor-Green vortex with shear, periodic ghosts
    let massfrac = vec![1. / layout.state.nspecies as f64; layout.state.nspecies];
    let mut q = uniform_state(&grid, &layout.state, 1.2, [0., 0., 0.], 300., &massfrac);
    apply_taylor_green(&mut q, &grid, &layout.state, 1.);
    apply_shear(&mut q, &grid, &layout.state, 2, 0, 0.5);
    PeriodicGhosts.fill(q.view_mut());

    let (face_model, mut pipeline) = match SgsModel::from_config(&config) {
        SgsModel::Face(face) => (Some(face), None),
        SgsModel::Dynamic(dynamic) => {
            let mut pipeline = DynamicPipeline::new(dynamic, grid, layout);
            pipeline.compute_quantities(&q, &PeriodicGhosts)?;
            pipeline.apply_filter(&q, &BoxFilter, &PeriodicGhosts)?;
            pipeline.compute_coefficients(&PeriodicGhosts)?;
            (None, Some(pipeline))
        }
    };

    for dir in Direction::ALL {
        let mut td = grid.zeros(NUM_TRANSVERSE);
        transverse_derivatives(&q, &grid, dir, &layout.state, &mut td)?;
        let area = grid.face_areas(dir);
        let mut flux = grid.zeros(layout.conserved.ncomp());
        let inputs = FaceInputs::new(q.view(), td.view(), area.view());
        if let Some(face) = &face_model {
            compute_face_fluxes(face, inputs, &grid, dir, &layout, &config.eos, &mut flux)?;
        } else if let Some(pipeline) = pipeline.as_mut() {
            pipeline.apply_terms(inputs, dir, &config.eos, &mut flux)?;
        }
        let momentum: f64 = layout
            .conserved
            .mom
            .iter()
            .map(|&c| norm_l2(&flux.index_axis(ndarray::Axis(3), c)))
            .sum();
        let energy = norm_l2(&flux.index_axis(ndarray::Axis(3), layout.conserved.eden));
        info!(
            "{:?}-faces: |momentum flux| = {:10.4e}, |energy flux| = {:10.4e}",
            dir, momentum, energy
        );
    }
    info!(
        "cp at 300 K: {:.2} J/(kg K)",
        config.eos.cp(300., &massfrac)
    );
    Ok(())
}
