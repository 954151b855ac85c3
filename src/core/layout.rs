//! Force-directed (Fruchterman-Reingold) placement of network nodes

use crate::core::network::FlightNetwork;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Distances below this are clipped to keep repulsion finite
const MIN_DISTANCE: f64 = 0.01;
/// Mean per-node movement below which iteration stops
const CONVERGENCE_THRESHOLD: f64 = 1e-4;

/// A 2D position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Spring layout parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    /// Maximum number of cooling steps
    pub iterations: usize,
    /// Seed for the initial random placement
    pub seed: u64,
    /// Optimal edge length; `sqrt(1 / n)` when `None`
    pub k: Option<f64>,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            seed: 42,
            k: None,
        }
    }
}

/// Place every node of `network`, returning positions in node order
#[must_use]
pub fn layout_network(network: &FlightNetwork, config: &SpringConfig) -> Vec<Point> {
    spring_layout(network.node_count(), &network.edge_positions(), config)
}

/// Fruchterman-Reingold layout of `n` nodes joined by `edges`
///
/// Positions start uniform in `[0, 1)²`, are refined for at most
/// `config.iterations` steps under a linearly cooling temperature, and are
/// finally centred on the origin and scaled so the largest absolute
/// coordinate is 1. Edges referring to nodes `>= n` are ignored.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::suboptimal_flops,
    clippy::needless_range_loop
)]
pub fn spring_layout(n: usize, edges: &[(usize, usize)], config: &SpringConfig) -> Vec<Point> {
    match n {
        0 => return Vec::new(),
        1 => return vec![Point::new(0.0, 0.0)],
        _ => {}
    }

    let mut adjacency = vec![vec![false; n]; n];
    for &(a, b) in edges {
        if a < n && b < n && a != b {
            adjacency[a][b] = true;
            adjacency[b][a] = true;
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<Point> = (0..n)
        .map(|_| Point::new(rng.random::<f64>(), rng.random::<f64>()))
        .collect();

    let k = config.k.unwrap_or_else(|| (1.0 / n as f64).sqrt());
    let mut temperature = 0.1 * extent(&pos);
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for _ in 0..config.iterations {
        let mut step = Vec::with_capacity(n);
        for i in 0..n {
            let mut displacement = Point::new(0.0, 0.0);
            for j in 0..n {
                if i == j {
                    continue;
                }
                let delta = Point::new(pos[i].x - pos[j].x, pos[i].y - pos[j].y);
                let distance = delta.norm().max(MIN_DISTANCE);
                let attraction = if adjacency[i][j] { distance / k } else { 0.0 };
                let force = k * k / (distance * distance) - attraction;
                displacement.x += delta.x * force;
                displacement.y += delta.y * force;
            }
            let mut length = displacement.norm();
            if length < MIN_DISTANCE {
                length = 0.1;
            }
            step.push(Point::new(
                displacement.x * temperature / length,
                displacement.y * temperature / length,
            ));
        }

        let mut total = 0.0;
        for (p, d) in pos.iter_mut().zip(&step) {
            p.x += d.x;
            p.y += d.y;
            total += d.x * d.x + d.y * d.y;
        }
        temperature -= cooling;
        if total.sqrt() / (n as f64) < CONVERGENCE_THRESHOLD {
            break;
        }
    }

    rescale(&mut pos);
    pos
}

/// Larger of the x and y spans
fn extent(pos: &[Point]) -> f64 {
    let span = |f: fn(&Point) -> f64| {
        let (lo, hi) = pos
            .iter()
            .map(f)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        hi - lo
    };
    span(|p| p.x).max(span(|p| p.y))
}

/// Centre on the origin and scale into `[-1, 1]`
#[allow(clippy::cast_precision_loss)]
fn rescale(pos: &mut [Point]) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p.y).sum::<f64>() / n;
    for p in pos.iter_mut() {
        p.x -= mean_x;
        p.y -= mean_y;
    }
    let limit = pos
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(0.0, f64::max);
    if limit > 0.0 {
        for p in pos.iter_mut() {
            p.x /= limit;
            p.y /= limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: usize) -> Vec<(usize, usize)> {
        (0..n).map(|i| (i, (i + 1) % n)).collect()
    }

    #[test]
    fn test_trivial_graphs() {
        let config = SpringConfig::default();
        assert!(spring_layout(0, &[], &config).is_empty());
        assert_eq!(spring_layout(1, &[], &config), vec![Point::new(0.0, 0.0)]);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let config = SpringConfig::default();
        let a = spring_layout(8, &ring(8), &config);
        let b = spring_layout(8, &ring(8), &config);
        assert_eq!(a, b);

        let other = SpringConfig { seed: 7, ..config };
        assert_ne!(a, spring_layout(8, &ring(8), &other));
    }

    #[test]
    fn test_layout_is_centred_and_bounded() {
        let pos = spring_layout(12, &ring(12), &SpringConfig::default());
        assert_eq!(pos.len(), 12);

        let max = pos.iter().map(|p| p.x.abs().max(p.y.abs())).fold(0.0, f64::max);
        assert!((max - 1.0).abs() < 1e-9);

        let mean_x = pos.iter().map(|p| p.x).sum::<f64>() / 12.0;
        let mean_y = pos.iter().map(|p| p.y).sum::<f64>() / 12.0;
        assert!(mean_x.abs() < 1e-9 && mean_y.abs() < 1e-9);
    }

    #[test]
    fn test_tiny_spring_length_stays_finite() {
        let config = SpringConfig {
            k: Some(0.0001),
            ..SpringConfig::default()
        };
        let pos = spring_layout(6, &[(0, 1), (1, 2), (3, 4)], &config);
        assert!(pos.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_zero_iterations_keeps_initial_placement_shape() {
        let config = SpringConfig {
            iterations: 0,
            ..SpringConfig::default()
        };
        let pos = spring_layout(5, &ring(5), &config);
        assert_eq!(pos.len(), 5);
        assert!(pos.iter().all(|p| p.x.abs() <= 1.0 && p.y.abs() <= 1.0));
    }
}
