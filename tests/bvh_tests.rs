mod support;

use approx::assert_relative_eq;
use nalgebra::{Isometry3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};
use navgeom::{
    Bvh, BvhConfig, Obb, Ray, Triangle,
    bvh::TRIANGLE_STRIDE,
    float_types::{Real, parry3d},
    math::BoundingBox,
};
use parry3d::query::RayCast;

#[test]
fn matches_brute_force() {
    let mut rng = support::rng(7);
    for cull_back_faces in [true, false] {
        let coords = support::random_triangle_soup(&mut rng, 150, 10.0);
        let config = BvhConfig {
            cull_back_faces,
            ..BvhConfig::default()
        };
        let bvh = Bvh::from_triangles(&coords, config);
        assert_eq!(bvh.primitive_count(), 150);

        let mut hits = 0;
        for _ in 0..200 {
            let ray = support::random_ray(&mut rng, 10.0);
            let expected = support::brute_force_hit(&ray, &coords, cull_back_faces);
            assert_eq!(bvh.intersects_ray(&ray), expected.is_some());
            assert_eq!(ray.intersects_bvh(&bvh), expected.is_some());
            assert_eq!(ray.intersect_bvh(&bvh), bvh.intersect_ray(&ray));
            match (bvh.intersect_ray(&ray), expected) {
                (Some(a), Some(b)) => {
                    hits += 1;
                    assert!((a - b).norm() < support::EPS, "{a} != {b}");
                },
                (None, None) => {},
                (a, b) => panic!("bvh {a:?} vs brute force {b:?}"),
            }
        }
        assert!(hits > 0);
    }
}

#[test]
fn parents_enclose_children() {
    let mut rng = support::rng(11);
    let coords = support::random_triangle_soup(&mut rng, 64, 5.0);
    let bvh = Bvh::from_triangles(&coords, BvhConfig::default());

    let mut leaf_triangles = 0;
    bvh.traverse(|_, node| {
        if node.is_leaf() {
            assert_eq!(node.primitives.len() % TRIANGLE_STRIDE, 0);
            leaf_triangles += node.primitive_count();
            for triangle in node.triangles() {
                let tb = triangle.bounding_box();
                assert!(node.bounding_box.contains_point(&tb.mins));
                assert!(node.bounding_box.contains_point(&tb.maxs));
            }
        } else {
            assert!(node.primitives.is_empty());
            for &child in &node.children {
                let cb = bvh.node(child).unwrap().bounding_box;
                assert!(node.bounding_box.contains_point(&cb.mins));
                assert!(node.bounding_box.contains_point(&cb.maxs));
            }
        }
    });
    assert_eq!(leaf_triangles, 64);
}

#[test]
fn depth_and_branching_limits() {
    let mut rng = support::rng(3);
    let coords = support::random_triangle_soup(&mut rng, 100, 5.0);
    let config = BvhConfig {
        branching_factor: 4,
        primitives_per_node: 2,
        max_depth: 3,
        ..BvhConfig::default()
    };
    let bvh = Bvh::from_triangles(&coords, config);
    for (id, node) in bvh.nodes().iter().enumerate() {
        assert!(bvh.depth(id).is_some_and(|d| d <= 3));
        assert!(node.children.is_empty() || node.children.len() == 4);
    }
    assert_eq!(bvh.primitive_count(), 100);
}

#[test]
fn triangle_hits_agree_with_parry() {
    let mut rng = support::rng(21);
    for _ in 0..500 {
        let a = support::random_point(&mut rng, 2.0);
        let b = support::random_point(&mut rng, 2.0);
        let c = support::random_point(&mut rng, 2.0);
        let ray = support::random_ray(&mut rng, 2.0);

        let ours = ray.intersect_triangle(&Triangle::new(a, b, c), false);
        let theirs = parry3d::shape::Triangle::new(a, b, c)
            .cast_local_ray(&ray.into(), Real::MAX, true)
            .map(|t| ray.at(t));

        match (ours, theirs) {
            (Some(p), Some(q)) => assert!((p - q).norm() < support::LOOSE_EPS, "{p} != {q}"),
            (None, None) => {},
            (p, q) => panic!("ours {p:?} vs parry {q:?}"),
        }
    }
}

#[test]
fn box_hits_agree_with_parry() {
    let mut rng = support::rng(5);
    for _ in 0..500 {
        let bb = BoundingBox::from_points(&[
            support::random_point(&mut rng, 3.0),
            support::random_point(&mut rng, 3.0),
        ]);
        let ray = support::random_ray(&mut rng, 3.0);
        if bb.contains_point(&ray.origin) {
            continue;
        }
        let aabb: parry3d::bounding_volume::Aabb = bb.into();
        let theirs = aabb.cast_local_ray(&ray.into(), Real::MAX, true).map(|t| ray.at(t));
        match (ray.intersect_box(&bb), theirs) {
            (Some(p), Some(q)) => assert!((p - q).norm() < support::LOOSE_EPS),
            (None, None) => {},
            (a, b) => panic!("{a:?} vs {b:?}"),
        }
    }
}

#[test]
fn triangle_list_builds_the_same_hierarchy() {
    let mut rng = support::rng(19);
    let coords = support::random_triangle_soup(&mut rng, 40, 4.0);
    let triangles: Vec<Triangle> = coords.chunks_exact(TRIANGLE_STRIDE).map(Triangle::from_slice).collect();

    let flat = Bvh::from_triangles(&coords, BvhConfig::default());
    let listed = Bvh::from_triangle_list(&triangles, BvhConfig::default());
    assert_eq!(listed.primitive_count(), 40);
    assert_eq!(listed.node_count(), flat.node_count());
    for _ in 0..100 {
        let ray = support::random_ray(&mut rng, 4.0);
        assert_eq!(listed.intersect_ray(&ray), flat.intersect_ray(&ray));
    }
}

#[test]
fn rotated_box_hit_and_miss() {
    let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_4 as Real);
    let obb = Obb::new(Point3::new(5.0, 0.0, 0.0), Vector3::repeat(1.0), *rotation.matrix());

    // the rotated corner points back at the origin
    let hit = Ray::new(Point3::origin(), Vector3::x()).intersect_obb(&obb).unwrap();
    assert_relative_eq!(hit, Point3::new(5.0 - (2.0 as Real).sqrt(), 0.0, 0.0), epsilon = support::EPS);

    // passes above the box
    let above = Ray::new(Point3::new(0.0, 0.0, 1.5), Vector3::x());
    assert!(!above.intersects_obb(&obb));
    // points away from it
    let away = Ray::new(Point3::origin(), -Vector3::x());
    assert!(!away.intersects_obb(&obb));

    // from inside, the exit point is reported
    let inside = Ray::new(obb.center, Vector3::y());
    let exit = inside.intersect_obb(&obb).unwrap();
    assert_relative_eq!(exit, Point3::new(5.0, (2.0 as Real).sqrt(), 0.0), epsilon = support::EPS);
}

#[test]
fn box_hits_agree_with_parry_cuboid() {
    let mut rng = support::rng(23);
    let mut hits = 0;
    for _ in 0..500 {
        let obb = support::random_obb(&mut rng, 2.0);
        let ray = support::random_ray(&mut rng, 3.0);
        if obb.contains_point(&ray.origin) {
            continue;
        }
        let pose = Isometry3::from_parts(
            Translation3::from(obb.center.coords),
            UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(obb.rotation)),
        );
        let cuboid = parry3d::shape::Cuboid::new(obb.half_sizes);
        let theirs = cuboid.cast_ray(&pose, &ray.into(), Real::MAX, true).map(|t| ray.at(t));
        match (ray.intersect_obb(&obb), theirs) {
            (Some(p), Some(q)) => {
                hits += 1;
                assert!((p - q).norm() < support::LOOSE_EPS, "{p} != {q}");
            },
            (None, None) => {},
            (a, b) => panic!("{a:?} vs {b:?}"),
        }
    }
    assert!(hits > 0);
}
