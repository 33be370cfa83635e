use camgeom_core::nalgebra::{Point2, Point3, Vector3};
use camgeom_core::{rotation_x, rotation_y, rotation_z, translation3, PointSet};
use camgeom_pinhole::{
    camera_depth, central_projection, compose, invert_projection, invert_transform, project,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

const SAMPLE_POINTS: usize = 32;
const ROUNDS: usize = 1000;
const TOLERANCE: f64 = 1e-9;

const POINT_BOX_SIZE: f64 = 50.0;
const TRANSLATION_BOX_SIZE: f64 = 30.0;
const MINIMUM_DEPTH: f64 = 1e-3;

#[test]
fn randomized() {
    let mut rng = Pcg64::seed_from_u64(5);
    let mut worst = 0.0f64;
    for _ in 0..ROUNDS {
        worst = worst.max(run_round(&mut rng));
    }
    eprintln!("worst round trip error: {}", worst);
    assert!(worst < TOLERANCE);
}

/// Runs the full forward and inverse pipeline once and returns the largest coordinate error.
fn run_round(rng: &mut impl Rng) -> f64 {
    let translation = translation3(Vector3::from_fn(|_, _| {
        rng.gen_range(-TRANSLATION_BOX_SIZE..TRANSLATION_BOX_SIZE)
    }));
    let rx = rotation_x(rng.gen_range(-180.0..180.0));
    let ry = rotation_y(rng.gen_range(-180.0..180.0));
    let rz = rotation_z(rng.gen_range(-180.0..180.0));
    let central = central_projection(
        Point2::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0)),
        rng.gen_range(1.0..1000.0),
    );
    let (projection, extrinsics) = compose(&translation, &rx, &ry, &rz, &central);

    let world = some_world_points(rng, &extrinsics);
    let depths = camera_depth(&extrinsics, &world).unwrap();
    let image = project(&projection, &world).unwrap();
    let camera = invert_projection(&central, &image, &depths).unwrap();
    let recovered = invert_transform(&extrinsics, &camera).unwrap();

    (recovered.0 - world.0).amax()
}

/// Generates world points that do not lie on the plane of the optical center.
fn some_world_points(
    rng: &mut impl Rng,
    extrinsics: &camgeom_core::nalgebra::Matrix4<f64>,
) -> PointSet {
    let points = (0..SAMPLE_POINTS).map(|_| loop {
        let point = Point3::from(Vector3::from_fn(|_, _| {
            rng.gen_range(-POINT_BOX_SIZE..POINT_BOX_SIZE)
        }));
        let depth = (extrinsics * point.to_homogeneous()).z;
        if depth.abs() > MINIMUM_DEPTH {
            break point;
        }
    });
    PointSet::from_points(points.collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn round_trip_recovers_world_points(
        angles in proptest::array::uniform3(-360.0f64..360.0),
        offset in proptest::array::uniform3(-50.0f64..50.0),
        focal in 1.0f64..2000.0,
        principal in proptest::array::uniform2(-500.0f64..500.0),
        coords in proptest::collection::vec(proptest::array::uniform3(-50.0f64..50.0), 1..16),
    ) {
        let [x, y, z] = angles;
        let central = central_projection(Point2::from(principal), focal);
        let (projection, extrinsics) = compose(
            &translation3(Vector3::from(offset)),
            &rotation_x(x),
            &rotation_y(y),
            &rotation_z(z),
            &central,
        );
        let world = PointSet::from_points(coords.into_iter().map(Point3::from));
        let depths = camera_depth(&extrinsics, &world).unwrap();
        prop_assume!(depths.iter().all(|depth| depth.abs() > MINIMUM_DEPTH));

        let image = project(&projection, &world).unwrap();
        let camera = invert_projection(&central, &image, &depths).unwrap();
        let recovered = invert_transform(&extrinsics, &camera).unwrap();
        prop_assert!((recovered.0 - world.0).amax() < TOLERANCE);
    }
}
