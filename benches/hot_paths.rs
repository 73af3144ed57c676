use criterion::{black_box, criterion_group, criterion_main, Criterion};

use impact_map::braille::BrailleCanvas;
use impact_map::map::geometry::{draw_line, fill_disc_stippled, ring_vertices};
use impact_map::map::Viewport;
use impact_map::physics;

fn bench_projection(c: &mut Criterion) {
    let viewport = Viewport::new(0.0, 20.0, 2.0, 400, 200);

    c.bench_function("project_point", |b| {
        b.iter(|| viewport.project(black_box(-73.97), black_box(40.78)))
    });

    c.bench_function("unproject_point", |b| {
        b.iter(|| viewport.unproject(black_box(120), black_box(60)))
    });
}

fn bench_physics(c: &mut Criterion) {
    c.bench_function("impact_chain", |b| {
        b.iter(|| {
            let energy =
                physics::kinetic_energy(black_box(100.0), black_box(20.0), black_box(3000.0));
            let crater = physics::crater_diameter(energy);
            let magnitude = physics::seismic_magnitude(energy);
            (crater, magnitude)
        })
    });

    c.bench_function("tsunami_wave", |b| {
        b.iter(|| physics::tsunami_wave(black_box(100.0), black_box(20.0)))
    });
}

fn bench_ring_geometry(c: &mut Criterion) {
    c.bench_function("ring_vertices_96", |b| {
        b.iter(|| ring_vertices(black_box(-40.0), black_box(30.0), black_box(500_000.0), 96))
    });
}

fn bench_canvas(c: &mut Criterion) {
    c.bench_function("draw_line_diagonal", |b| {
        b.iter(|| {
            let mut canvas = BrailleCanvas::new(200, 50);
            draw_line(&mut canvas, 0, 0, 399, 199);
            canvas
        })
    });

    c.bench_function("fill_disc_stippled", |b| {
        b.iter(|| {
            let mut canvas = BrailleCanvas::new(200, 50);
            fill_disc_stippled(&mut canvas, 200, 100, 80, black_box(0.4));
            canvas
        })
    });
}

criterion_group!(
    benches,
    bench_projection,
    bench_physics,
    bench_ring_geometry,
    bench_canvas
);
criterion_main!(benches);
