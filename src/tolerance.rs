//! Tolerance estimation.

use crate::vector::Point3D;

/// Per-axis indices of the minimum- and maximum-valued point, scanned once
/// over the whole input. Shared by the tolerance formula below and by the
/// hull builder's initial-simplex search, which needs the same extremes.
pub fn axis_extremes(points: &[Point3D]) -> ([usize; 3], [usize; 3]) {
    let mut min = points[0];
    let mut max = points[0];
    let mut min_idx = [0usize; 3];
    let mut max_idx = [0usize; 3];

    for (i, p) in points.iter().enumerate().skip(1) {
        for axis in 0..3 {
            if p[axis] < min[axis] {
                min[axis] = p[axis];
                min_idx[axis] = i;
            }
            if p[axis] > max[axis] {
                max[axis] = p[axis];
                max_idx[axis] = i;
            }
        }
    }

    (min_idx, max_idx)
}

/// `ε = 3 · 2⁻⁵² · (max(|xmax|,|xmin|) + max(|ymax|,|ymin|) + max(|zmax|,|zmin|))`
///
/// This exact formula (and not some other scale-derived threshold) is load
/// bearing: every "above a plane" decision in the builder is gated on it.
pub fn compute_tolerance(points: &[Point3D]) -> f64 {
    let (min_idx, max_idx) = axis_extremes(points);

    let mut sum = 0.0;
    for axis in 0..3 {
        let hi = points[max_idx[axis]][axis].abs();
        let lo = points[min_idx[axis]][axis].abs();
        sum += hi.max(lo);
    }

    3.0 * 2f64.powi(-52) * sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_scales_with_input_magnitude() {
        let unit = vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(0.0, 1.0, 0.0),
            Point3D::new(0.0, 0.0, 1.0),
        ];
        let scaled: Vec<Point3D> = unit.iter().map(|p| *p * 1000.0).collect();

        let tol_unit = compute_tolerance(&unit);
        let tol_scaled = compute_tolerance(&scaled);
        assert!((tol_scaled / tol_unit - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn axis_extremes_finds_min_and_max_per_axis() {
        let points = vec![
            Point3D::new(0.0, 5.0, 2.0),
            Point3D::new(-3.0, 1.0, 9.0),
            Point3D::new(4.0, -2.0, 0.0),
        ];
        let (min_idx, max_idx) = axis_extremes(&points);
        assert_eq!(min_idx, [1, 2, 2]);
        assert_eq!(max_idx, [2, 0, 1]);
    }
}
