//! Value-type geometric primitives shared by the query and search layers.
//!
//! Vectors and matrices are nalgebra's `Point3`, `Vector3`, `Matrix3` and `Matrix4`
//! over [`Real`](crate::float_types::Real). Everything here is `Copy` and returned
//! by value, so no routine keeps scratch state between calls.

pub mod aabb;
pub mod eigen;
pub mod plane;
pub mod ray;
pub mod sphere;
pub mod triangle;

pub use aabb::BoundingBox;
pub use plane::Plane;
pub use ray::Ray;
pub use sphere::BoundingSphere;
pub use triangle::Triangle;
