use super::*;

#[test]
fn four_points_coincident() {
    let points = (0..4).map(|_| Point3D::splat(1.0)).collect::<Vec<_>>();
    let result = HullBuilder::build(&points, None);
    assert!(
        matches!(result, Err(HullError::Input(DegenerateInput::Coincident))),
        "{result:?} should be 'coincident' error"
    );
}

#[test]
fn four_points_colinear() {
    let mut points = (0..4).map(|_| Point3D::splat(1.0)).collect::<Vec<_>>();
    points[0].x += 1.0;
    points[1].x += 2.0;
    let result = HullBuilder::build(&points, None);
    assert!(
        matches!(result, Err(HullError::Input(DegenerateInput::Colinear))),
        "{result:?} should be 'colinear' error"
    );
}

#[test]
fn four_points_coplanar() {
    let mut points = (0..4).map(|_| Point3D::splat(1.0)).collect::<Vec<_>>();
    points[0].x += 1.0;
    points[1].y += 1.0;
    let result = HullBuilder::build(&points, None);
    assert!(
        matches!(result, Err(HullError::Input(DegenerateInput::Coplanar))),
        "{result:?} should be 'coplanar' error"
    );
}

#[test]
fn three_points_too_few() {
    let points = vec![
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(1.0, 0.0, 0.0),
        Point3D::new(0.0, 1.0, 0.0),
    ];
    assert_eq!(
        HullBuilder::build(&points, None).unwrap_err(),
        HullError::TooFewPoints
    );
}

#[test]
fn tetrahedron_with_interior_point() {
    let points = vec![
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(1.0, 0.0, 0.0),
        Point3D::new(0.0, 1.0, 0.0),
        Point3D::new(0.0, 0.0, 1.0),
        Point3D::new(0.2, 0.2, 0.2),
    ];
    let hull = HullBuilder::build(&points, None).unwrap();
    assert_eq!(hull.vertices.len(), 4);
    assert_eq!(hull.polygons.len(), 4);
    let mut diagnostics = Vec::new();
    assert!(Verifier::check(&hull, &points, None, |m| diagnostics.push(m)));
}

#[test]
fn octahedron_test() {
    let p1 = Point3D::new(1.0, 0.0, 0.0);
    let p2 = Point3D::new(0.0, 1.0, 0.0);
    let p3 = Point3D::new(0.0, 0.0, 1.0);
    let p4 = Point3D::new(-1.0, 0.0, 0.0);
    let p5 = Point3D::new(0.0, -1.0, 0.0);
    let p6 = Point3D::new(0.0, 0.0, -1.0);

    let points = [p1, p2, p3, p4, p5, p6];
    let hull = HullBuilder::build(&points, None).unwrap();
    assert_eq!(hull.vertices.len(), 6);
    let tri_count: usize = hull.polygons.iter().map(|p| p.len() - 2).sum();
    assert_eq!(tri_count, 8);
    let mut diagnostics = Vec::new();
    assert!(Verifier::check(&hull, &points, None, |m| diagnostics.push(m)));
}

#[test]
fn octahedron_translation_test() {
    let base = [
        Point3D::new(1.0, 0.0, 0.0),
        Point3D::new(0.0, 1.0, 0.0),
        Point3D::new(0.0, 0.0, 1.0),
        Point3D::new(-1.0, 0.0, 0.0),
        Point3D::new(0.0, -1.0, 0.0),
        Point3D::new(0.0, 0.0, -1.0),
    ];
    let points: Vec<_> = base.into_iter().map(|p| p + Point3D::splat(10.0)).collect();
    let hull = HullBuilder::build(&points, None).unwrap();
    assert_eq!(hull.vertices.len(), 6);
}

fn cube_points() -> [Point3D; 8] {
    [
        Point3D::new(1.0, 1.0, 1.0),
        Point3D::new(1.0, 1.0, -1.0),
        Point3D::new(1.0, -1.0, 1.0),
        Point3D::new(1.0, -1.0, -1.0),
        Point3D::new(-1.0, 1.0, 1.0),
        Point3D::new(-1.0, 1.0, -1.0),
        Point3D::new(-1.0, -1.0, 1.0),
        Point3D::new(-1.0, -1.0, -1.0),
    ]
}

#[test]
fn cube_test() {
    let points = cube_points();
    let hull = HullBuilder::build(&points, None).unwrap();
    assert_eq!(hull.vertices.len(), 8);
    // the cube's faces may come out as 6 quads or as 12 triangles depending
    // on whether coplanar adjacent faces got merged; either is convex.
    let total_corners: usize = hull.polygons.iter().map(|p| p.len()).sum();
    assert_eq!(total_corners, 6 * 4);
    let mut diagnostics = Vec::new();
    assert!(
        Verifier::check(&hull, &points, None, |m| diagnostics.push(m)),
        "diagnostics: {diagnostics:?}"
    );
}

#[test]
fn flat_coplanar_input_is_rejected() {
    let points = vec![
        Point3D::new(1.0, 1.0, 10.0),
        Point3D::new(1.0, -1.0, 10.0),
        Point3D::new(-1.0, 1.0, 10.0),
        Point3D::new(-1.0, -1.0, 10.0),
    ];
    assert!(matches!(
        HullBuilder::build(&points, None),
        Err(HullError::Input(DegenerateInput::Coplanar))
    ));
}

#[test]
fn colinear_input_is_rejected() {
    let points = (0..10)
        .map(|i| Point3D::new(i as f64, 1.0, 10.0))
        .collect::<Vec<_>>();
    assert!(matches!(
        HullBuilder::build(&points, None),
        Err(HullError::Input(DegenerateInput::Colinear))
    ));
}

#[test]
fn simplex_may_degenerate_test() {
    let points = vec![
        Point3D::new(1.0, 0.0, 1.0),
        Point3D::new(1.0, 1.0, 1.0),
        Point3D::new(2.0, 1.0, 0.0),
        Point3D::new(2.0, 1.0, 1.0),
        Point3D::new(2.0, 0.0, 1.0),
        Point3D::new(2.0, 0.0, 0.0),
        Point3D::new(1.0, 1.0, 2.0),
        Point3D::new(0.0, 1.0, 2.0),
        Point3D::new(0.0, 0.0, 2.0),
        Point3D::new(1.0, 0.0, 2.0),
    ];
    let hull = HullBuilder::build(&points, None).unwrap();
    let mut diagnostics = Vec::new();
    assert!(Verifier::check(&hull, &points, None, |m| diagnostics.push(m)));
}

/// A 16-point set whose full convex hull is the 8 outer corners; the
/// remaining points are either coplanar with a hull face or interior.
#[test]
fn simplex_may_degenerate_test_2() {
    let vertices = vec![
        Point3D::new(0., 0., 0.),
        Point3D::new(1., 0., 0.),
        Point3D::new(1., 0., 1.),
        Point3D::new(0., 0., 1.),
        Point3D::new(0., 1., 0.),
        Point3D::new(1., 1., 0.),
        Point3D::new(1., 1., 1.),
        Point3D::new(0., 1., 1.),
        Point3D::new(2., 1., 0.),
        Point3D::new(2., 1., 1.),
        Point3D::new(2., 0., 1.),
        Point3D::new(2., 0., 0.),
        Point3D::new(1., 1., 2.),
        Point3D::new(0., 1., 2.),
        Point3D::new(0., 0., 2.),
        Point3D::new(1., 0., 2.),
    ];

    let indices = [4, 5, 1, 11, 1, 5, 1, 11, 10, 10, 2, 1, 5, 8, 11];
    let points = indices.iter().map(|i| vertices[*i]).collect::<Vec<_>>();
    let hull = HullBuilder::build(&points, None).unwrap();
    let mut diagnostics = Vec::new();
    assert!(Verifier::check(&hull, &points, None, |m| diagnostics.push(m)));
}

/// A fixed 40-point set: the 20 vertices of a regular dodecahedron
/// (ellipsoid-ish in their spread around the origin) plus, for each, an
/// interior point halfway to the origin. The halfway points are strictly
/// inside the convex body a dodecahedron's vertices bound, so the hull's
/// 20-vertex output is exactly the dodecahedron vertex set.
#[test]
fn fixed_forty_point_set_yields_twenty_vertex_dodecahedron() {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let inv_phi = 1.0 / phi;

    let dodecahedron_vertices = vec![
        Point3D::new(1.0, 1.0, 1.0),
        Point3D::new(1.0, 1.0, -1.0),
        Point3D::new(1.0, -1.0, 1.0),
        Point3D::new(1.0, -1.0, -1.0),
        Point3D::new(-1.0, 1.0, 1.0),
        Point3D::new(-1.0, 1.0, -1.0),
        Point3D::new(-1.0, -1.0, 1.0),
        Point3D::new(-1.0, -1.0, -1.0),
        Point3D::new(0.0, inv_phi, phi),
        Point3D::new(0.0, inv_phi, -phi),
        Point3D::new(0.0, -inv_phi, phi),
        Point3D::new(0.0, -inv_phi, -phi),
        Point3D::new(inv_phi, phi, 0.0),
        Point3D::new(inv_phi, -phi, 0.0),
        Point3D::new(-inv_phi, phi, 0.0),
        Point3D::new(-inv_phi, -phi, 0.0),
        Point3D::new(phi, 0.0, inv_phi),
        Point3D::new(phi, 0.0, -inv_phi),
        Point3D::new(-phi, 0.0, inv_phi),
        Point3D::new(-phi, 0.0, -inv_phi),
    ];
    assert_eq!(dodecahedron_vertices.len(), 20);

    let mut points = dodecahedron_vertices.clone();
    points.extend(dodecahedron_vertices.iter().map(|&v| v * 0.5));
    assert_eq!(points.len(), 40);

    let hull = HullBuilder::build(&points, None).unwrap();
    let mut diagnostics = Vec::new();
    assert!(
        Verifier::check(&hull, &points, None, |m| diagnostics.push(m)),
        "diagnostics: {diagnostics:?}"
    );

    assert_eq!(hull.vertices.len(), 20);
    for expected in &dodecahedron_vertices {
        assert!(
            hull.vertices.iter().any(|&v| (v - *expected).length() < 1e-9),
            "expected dodecahedron vertex {expected:?} missing from hull output"
        );
    }
    for v in &hull.vertices {
        assert!(
            dodecahedron_vertices.iter().any(|&dv| (dv - *v).length() < 1e-9),
            "unexpected interior point {v:?} survived into the hull output"
        );
    }
}

/// 64 points on a shuffled 4x4x4 grid; only the 8 corners should survive.
#[test]
fn grid_reshuffle_test() {
    use rand::prelude::{SeedableRng, SliceRandom};

    let mut points = Vec::with_capacity(64);
    for x in 0..4 {
        for y in 0..4 {
            for z in 0..4 {
                points.push(Point3D::new(x as f64, y as f64, z as f64));
            }
        }
    }
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    points.shuffle(&mut rng);

    let hull = HullBuilder::build(&points, None).unwrap();
    assert_eq!(hull.vertices.len(), 8);
    for v in &hull.vertices {
        assert!(v.x == 0.0 || v.x == 3.0);
        assert!(v.y == 0.0 || v.y == 3.0);
        assert!(v.z == 0.0 || v.z == 3.0);
    }
}

#[cfg(test)]
fn sphere_points(divisions: usize) -> Vec<Point3D> {
    #[inline]
    fn rot_z(point: Point3D, angle: f64) -> Point3D {
        let e1 = angle.cos() * point[0] - angle.sin() * point[1];
        let e2 = angle.sin() * point[0] + angle.cos() * point[1];
        let e3 = point[2];
        Point3D::new(e1, e2, e3)
    }

    #[inline]
    fn rot_x(point: Point3D, angle: f64) -> Point3D {
        let e1 = point[0];
        let e2 = angle.cos() * point[1] - angle.sin() * point[2];
        let e3 = angle.sin() * point[1] + angle.cos() * point[2];
        Point3D::new(e1, e2, e3)
    }

    let mut points = Vec::with_capacity(divisions * divisions);
    let unit_y = Point3D::Y;
    for step_x in 0..divisions {
        let angle_x = 2.0 * std::f64::consts::PI * (step_x as f64 / divisions as f64);
        let p = rot_x(unit_y, angle_x);
        for step_z in 0..divisions {
            let angle_z = 2.0 * std::f64::consts::PI * (step_z as f64 / divisions as f64);
            let p = rot_z(p, angle_z);
            points.push(p);
        }
    }

    points
}

#[test]
fn sphere_test() {
    let points = sphere_points(10);
    let hull = HullBuilder::build(&points, None).unwrap();
    let mut diagnostics = Vec::new();
    assert!(
        Verifier::check(&hull, &points, None, |m| diagnostics.push(m)),
        "diagnostics: {diagnostics:?}"
    );
    for v in &hull.vertices {
        assert!(v.length() <= 1.0 + 1e-9);
    }
}

#[test]
fn big_sphere_test() {
    let points = sphere_points(80);
    let hull = HullBuilder::build(&points, None).unwrap();
    let mut diagnostics = Vec::new();
    assert!(
        Verifier::check(&hull, &points, None, |m| diagnostics.push(m)),
        "diagnostics: {diagnostics:?}"
    );
}

#[test]
fn random_sphere_200_test() {
    use rand::prelude::{Distribution, SeedableRng};

    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    let dist = rand::distr::Uniform::new(-1.0f64, 1.0f64).unwrap();
    let mut points = Vec::with_capacity(200);
    while points.len() < 200 {
        let p = Point3D::new(
            dist.sample(&mut rng),
            dist.sample(&mut rng),
            dist.sample(&mut rng),
        );
        if p.length() <= 1.0 {
            points.push(p);
        }
    }

    let hull = HullBuilder::build(&points, None).unwrap();
    let mut diagnostics = Vec::new();
    assert!(
        Verifier::check(&hull, &points, None, |m| diagnostics.push(m)),
        "diagnostics: {diagnostics:?}"
    );
    for v in &hull.vertices {
        assert!(v.length() <= 1.0 + 1e-9);
    }
}

/// Rodrigues' rotation formula: rotates `p` by `angle` radians about the
/// unit axis `axis`.
fn rotate(p: Point3D, axis: Point3D, angle: f64) -> Point3D {
    let (sin, cos) = angle.sin_cos();
    p * cos + axis.cross(p) * sin + axis * axis.dot(p) * (1.0 - cos)
}

/// P7: rotating every input point by an arbitrary rotation yields a hull
/// whose vertices are the rotated images of the original hull's vertices,
/// as a set.
#[test]
fn rigid_motion_invariance_test() {
    let points = cube_points();
    let axis = Point3D::new(1.0, 2.0, 3.0).normalize();
    let angle = 0.7312;
    let rotated: Vec<Point3D> = points.iter().map(|&p| rotate(p, axis, angle)).collect();

    let original_hull = HullBuilder::build(&points, None).unwrap();
    let rotated_hull = HullBuilder::build(&rotated, None).unwrap();
    assert_eq!(original_hull.vertices.len(), rotated_hull.vertices.len());

    for v in &rotated_hull.vertices {
        let back = rotate(*v, axis, -angle);
        let found = original_hull
            .vertices
            .iter()
            .any(|&ov| (ov - back).length() < 1e-9);
        assert!(found, "rotated-back vertex {back:?} not found in original hull");
    }
}

#[test]
fn truncated_build_respects_max_iter() {
    let points = sphere_points(30);
    let full = HullBuilder::build(&points, None).unwrap();
    let truncated = HullBuilder::build(&points, Some(2)).unwrap();
    assert!(truncated.vertices.len() <= full.vertices.len());
}

/// Useful for fuzzing and profiling: a sea-urchin like point cloud with
/// points distributed arbitrarily within a sphere.
#[test]
fn heavy_sea_urchin_test() {
    use rand::prelude::{Distribution, SeedableRng, SliceRandom};

    let iterations = 1;

    for s in 0..iterations {
        let mut rng = rand::rngs::StdRng::seed_from_u64(s);
        let dist = rand::distr::StandardUniform;

        fn rot_z(point: Point3D, angle: f64) -> Point3D {
            let e1 = angle.cos() * point[0] - angle.sin() * point[1];
            let e2 = angle.sin() * point[0] + angle.cos() * point[1];
            let e3 = point[2];
            Point3D::new(e1, e2, e3)
        }

        fn rot_x(point: Point3D, angle: f64) -> Point3D {
            let e1 = point[0];
            let e2 = angle.cos() * point[1] - angle.sin() * point[2];
            let e3 = angle.sin() * point[1] + angle.cos() * point[2];
            Point3D::new(e1, e2, e3)
        }

        let mut points = Vec::new();
        let dev = 100;
        let unit_y = Point3D::Y;
        for step_x in 0..dev {
            let angle_x = 2.0 * std::f64::consts::PI * (step_x as f64 / dev as f64);
            let p = rot_x(unit_y, angle_x);
            for step_z in 0..dev {
                let angle_z = 2.0 * std::f64::consts::PI * (step_z as f64 / dev as f64);
                let p = rot_z(p, angle_z);
                let rand_offset: f64 = dist.sample(&mut rng);
                points.push(p * rand_offset);
            }
        }

        points.shuffle(&mut rng);
        let _hull = HullBuilder::build(&points, None).unwrap();
    }
}
