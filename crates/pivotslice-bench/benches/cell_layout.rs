use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pivotslice_grid::{
    CellLayouter, CellLinks, ForceDirectedLayouter, FreeAxes, LayoutSettings, Point,
};

fn ring_links(count: usize) -> CellLinks {
    let mut links = CellLinks::default();
    for i in 0..count {
        let next = (i + 1) % count;
        links.outgoing.push((i, next));
        links.incoming.push((next, i));
    }
    links
}

fn bench_force_layout_200_visuals(c: &mut Criterion) {
    let count = 200;
    let links = ring_links(count);
    let fixed = vec![false; count];
    let layouter = ForceDirectedLayouter::new(LayoutSettings::default());

    c.bench_function("force_layout_200_visuals", |b| {
        b.iter(|| {
            let mut positions = vec![Point::CENTER; count];
            layouter.execute(black_box(&mut positions), &fixed, &links, FreeAxes::BOTH);
            black_box(positions);
        })
    });
}

fn bench_force_layout_single_free_axis(c: &mut Criterion) {
    let count = 200;
    let links = ring_links(count);
    let fixed: Vec<bool> = (0..count).map(|i| i % 5 == 0).collect();
    let layouter = ForceDirectedLayouter::new(LayoutSettings::default());
    let start: Vec<Point> = (0..count)
        .map(|i| Point::new((i + 1) as f64 / (count + 1) as f64, 0.5))
        .collect();

    c.bench_function("force_layout_200_visuals_y_only", |b| {
        b.iter(|| {
            let mut positions = start.clone();
            layouter.execute(&mut positions, &fixed, &links, FreeAxes { x: false, y: true });
            black_box(positions);
        })
    });
}

criterion_group!(
    benches,
    bench_force_layout_200_visuals,
    bench_force_layout_single_free_axis
);
criterion_main!(benches);
