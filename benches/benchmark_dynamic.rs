//! One full cycle of the dynamic Smagorinsky pipeline
//!
//! Run with: `cargo bench --bench benchmark_dynamic`
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rustles::closure::{DynamicPipeline, DynamicSmagorinsky, FaceInputs};
use rustles::eos::ConstantCp;
use rustles::field::boundary::{GhostFill, PeriodicGhosts};
use rustles::field::filter::BoxFilter;
use rustles::field::functions::{apply_taylor_green, uniform_state};
use rustles::field::{Direction, Grid};
use rustles::gradient::{transverse_derivatives, NUM_TRANSVERSE};
use rustles::layout::Layout;

const SIZES: [usize; 2] = [16, 32];

pub fn bench_dynamic_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_smagorinsky");
    group.significance_level(0.1).sample_size(10);
    let layout = Layout::new(1);
    let eos = ConstantCp(1004.5);
    let filter = BoxFilter;
    for n in SIZES.iter() {
        let grid = Grid::new([*n; 3], [1. / *n as f64; 3]);
        let mut q = uniform_state(&grid, &layout.state, 1.2, [0., 0., 0.], 300., &[1.]);
        apply_taylor_green(&mut q, &grid, &layout.state, 1.);
        PeriodicGhosts.fill(q.view_mut());
        let td: Vec<_> = Direction::ALL
            .iter()
            .map(|&dir| {
                let mut td = grid.zeros(NUM_TRANSVERSE);
                transverse_derivatives(&q, &grid, dir, &layout.state, &mut td).unwrap();
                td
            })
            .collect();
        let mut flux = grid.zeros(layout.conserved.ncomp());
        let mut pipeline = DynamicPipeline::new(DynamicSmagorinsky::default(), grid, layout);
        group.bench_with_input(BenchmarkId::new("cycle", n), n, |b, _| {
            b.iter(|| {
                pipeline.compute_quantities(&q, &PeriodicGhosts).unwrap();
                pipeline.apply_filter(&q, &filter, &PeriodicGhosts).unwrap();
                pipeline.compute_coefficients(&PeriodicGhosts).unwrap();
                for (dir, td) in Direction::ALL.iter().zip(td.iter()) {
                    let area = grid.face_areas(*dir);
                    let inputs = FaceInputs::new(q.view(), td.view(), area.view());
                    pipeline.apply_terms(inputs, *dir, &eos, &mut flux).unwrap();
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dynamic_cycle);
criterion_main!(benches);
