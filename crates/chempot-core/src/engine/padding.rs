use super::vertices::{Domains, Point};

const MIN_WALL_TOLERANCE: f64 = 1e-10;

/// Coordinates this close to the default lower limit are treated as sitting on it.
fn wall_tolerance(padding: f64) -> f64 {
    padding.abs().max(MIN_WALL_TOLERANCE)
}

/// Display lower limit per axis.
///
/// For each axis this is the lowest vertex coordinate that is not on the
/// `default_min_limit` wall, minus `padding`. Axes whose every vertex lies on the
/// wall fall back to `default_min_limit - padding`.
pub fn apply_element_padding(
    domains: &Domains,
    dim: usize,
    padding: f64,
    default_min_limit: f64,
) -> Vec<f64> {
    let tolerance = wall_tolerance(padding);
    (0..dim)
        .map(|axis| {
            domains
                .values()
                .flatten()
                .map(|point| point[axis])
                .filter(|value| (value - default_min_limit).abs() > tolerance)
                .min_by(f64::total_cmp)
                .map_or(default_min_limit - padding, |min| min - padding)
        })
        .collect()
}

/// Copies `points`, moving every coordinate on the wall to that axis's new limit.
///
/// All other coordinates are copied unchanged.
pub fn pad_domain_points(
    points: &[Point],
    new_lims: &[f64],
    default_min_limit: f64,
    padding: f64,
) -> Vec<Point> {
    let tolerance = wall_tolerance(padding);
    points
        .iter()
        .map(|point| {
            point
                .iter()
                .zip(new_lims)
                .map(|(&value, &new_lim)| {
                    if (value - default_min_limit).abs() <= tolerance {
                        new_lim
                    } else {
                        value
                    }
                })
                .collect()
        })
        .collect()
}
