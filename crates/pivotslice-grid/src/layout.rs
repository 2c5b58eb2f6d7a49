use crate::cell::{NodeVisual, Point};
use crate::config::LayoutSettings;
use pivotslice_core::PublicationGraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Which coordinates the layout pass may move. Facet-derived coordinates
/// are never free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreeAxes {
    pub x: bool,
    pub y: bool,
}

impl FreeAxes {
    pub const NONE: FreeAxes = FreeAxes { x: false, y: false };
    pub const BOTH: FreeAxes = FreeAxes { x: true, y: true };

    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Citation links between visuals of one cell, as `(visual, other)` index
/// pairs. `incoming` pairs a visual with the visuals citing it, `outgoing`
/// with the visuals it cites. Links inside one aggregate are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellLinks {
    pub incoming: Vec<(usize, usize)>,
    pub outgoing: Vec<(usize, usize)>,
}

impl CellLinks {
    pub fn build(graph: &PublicationGraph, visuals: &[NodeVisual]) -> Self {
        let mut owner = BTreeMap::new();
        for (index, visual) in visuals.iter().enumerate() {
            for publication in &visual.members {
                owner.insert(*publication, index);
            }
        }

        let mut links = CellLinks::default();
        for (index, visual) in visuals.iter().enumerate() {
            for publication in &visual.members {
                for citing in graph.edges_in(*publication) {
                    if let Some(&other) = owner.get(&citing)
                        && other != index
                    {
                        links.incoming.push((index, other));
                    }
                }
                for cited in graph.edges_out(*publication) {
                    if let Some(&other) = owner.get(&cited)
                        && other != index
                    {
                        links.outgoing.push((index, other));
                    }
                }
            }
        }
        links
    }
}

pub trait CellLayouter {
    fn execute(&self, positions: &mut [Point], fixed: &[bool], links: &CellLinks, free: FreeAxes);
}

/// Places visual `i` of `n` at `(i + 1) / (n + 1)` on both axes.
pub struct DiagonalLayouter;

impl CellLayouter for DiagonalLayouter {
    fn execute(
        &self,
        positions: &mut [Point],
        _fixed: &[bool],
        _links: &CellLinks,
        _free: FreeAxes,
    ) {
        let step = 1.0 / (positions.len() + 1) as f64;
        for (i, position) in positions.iter_mut().enumerate() {
            let offset = step * (i + 1) as f64;
            *position = Point::new(offset, offset);
        }
    }
}

/// Spring embedder restricted to the free axes, with a linearly cooling
/// step bound. Seeded, so identical input yields identical output.
pub struct ForceDirectedLayouter {
    pub settings: LayoutSettings,
}

impl ForceDirectedLayouter {
    pub fn new(settings: LayoutSettings) -> Self {
        Self { settings }
    }

    fn reenter(&self, value: f64, rng: &mut StdRng) -> f64 {
        if value < 0.0 {
            self.settings.edge_jitter * rng.gen_range(0.0..1.0)
        } else if value > 1.0 {
            1.0 - self.settings.edge_jitter * rng.gen_range(0.0..1.0)
        } else {
            value
        }
    }
}

impl CellLayouter for ForceDirectedLayouter {
    fn execute(&self, positions: &mut [Point], fixed: &[bool], links: &CellLinks, free: FreeAxes) {
        let count = positions.len();
        if count == 0 || !free.any() {
            return;
        }
        let LayoutSettings {
            iterations,
            start_temperature,
            displacement_ratio,
            epsilon,
            seed,
            ..
        } = self.settings;
        let mut rng = StdRng::seed_from_u64(seed);

        for (position, &fixed) in positions.iter_mut().zip(fixed) {
            if fixed {
                continue;
            }
            if free.x {
                position.x = rng.gen_range(0.0..1.0);
            }
            if free.y {
                position.y = rng.gen_range(0.0..1.0);
            }
        }

        let k = (1.0 / count as f64).sqrt();
        let mut displacement = vec![Point::default(); count];

        let pull = |displacement: &mut [Point], a: usize, b: usize, dx: f64, dy: f64, force: f64| {
            if free.x {
                displacement[a].x -= force * dx;
                displacement[b].x += force * dx;
            }
            if free.y {
                displacement[a].y -= force * dy;
                displacement[b].y += force * dy;
            }
        };

        for iteration in 0..iterations {
            let temperature =
                start_temperature * (1.0 - iteration as f64 / iterations as f64);
            displacement.fill(Point::default());

            // repulsion between every ordered pair
            for a in 0..count {
                for b in 0..count {
                    if a == b {
                        continue;
                    }
                    let dx = positions[a].x - positions[b].x;
                    let dy = positions[a].y - positions[b].y;
                    let distance = (dx * dx + dy * dy).sqrt().max(epsilon);
                    let force = k * k / distance / distance;
                    if free.x {
                        displacement[a].x += force * dx;
                    }
                    if free.y {
                        displacement[a].y += force * dy;
                    }
                }
            }

            for &(a, b) in &links.incoming {
                let dx = positions[a].x - positions[b].x;
                let dy = positions[a].y - positions[b].y;
                let distance = (dx * dx + dy * dy).sqrt();
                pull(&mut displacement, a, b, dx, dy, distance * distance / k);
            }
            for &(a, b) in &links.outgoing {
                let dx = positions[a].x - positions[b].x;
                let dy = positions[a].y - positions[b].y;
                let distance = (dx * dx + dy * dy).sqrt().max(epsilon);
                pull(&mut displacement, a, b, dx, dy, distance / k);
            }

            for a in 0..count {
                if fixed[a] {
                    continue;
                }
                let d = displacement[a];
                let length = (d.x * d.x + d.y * d.y).sqrt().max(epsilon);
                let step = temperature.min(displacement_ratio * length);
                if free.x {
                    let x = positions[a].x + d.x / length * step;
                    positions[a].x = self.reenter(x, &mut rng);
                }
                if free.y {
                    let y = positions[a].y + d.y / length * step;
                    positions[a].y = self.reenter(y, &mut rng);
                }
            }
        }
    }
}

/// Final placement of a cell's visuals: a lone visual sits at the center,
/// matrix mode uses the diagonal, everything else runs the spring embedder
/// on the free axes (if any).
pub fn arrange(
    visuals: &mut [NodeVisual],
    links: &CellLinks,
    free: FreeAxes,
    matrix_mode: bool,
    settings: &LayoutSettings,
) {
    if visuals.is_empty() {
        return;
    }
    if visuals.len() == 1 {
        visuals[0].position = Point::CENTER;
        return;
    }

    let mut positions: Vec<Point> = visuals.iter().map(|visual| visual.position).collect();
    let fixed: Vec<bool> = visuals.iter().map(|visual| visual.fixed).collect();
    if matrix_mode {
        DiagonalLayouter.execute(&mut positions, &fixed, links, free);
    } else if free.any() {
        ForceDirectedLayouter::new(settings.clone()).execute(&mut positions, &fixed, links, free);
    }
    for (visual, position) in visuals.iter_mut().zip(positions) {
        visual.position = position;
    }
}
