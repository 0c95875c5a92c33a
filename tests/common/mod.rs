#![allow(dead_code)]

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use geopotential::constants::{WGS84_C20, WGS84_GM, WGS84_REF_DISTANCE};
use geopotential::gravity_field::GravityField;
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Earth-like normalized table: WGS84 C20 and uniform random coefficients
/// with a Kaula-like `1e-5 / n²` envelope for every other term.
pub fn synthetic_field(degree: usize, seed: u64) -> Arc<GravityField> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::new();
    for n in 2..=degree {
        let scale = 1e-5 / (n * n) as f64;
        for m in 0..=n {
            let cnm = if (n, m) == (2, 0) {
                WGS84_C20
            } else {
                scale * rng.random_range(-1.0..1.0)
            };
            let snm = if m == 0 {
                0.0
            } else {
                scale * rng.random_range(-1.0..1.0)
            };
            rows.push((n, m, cnm, snm));
        }
    }

    Arc::new(
        GravityField::builder()
            .model("synthetic")
            .central_body("Earth")
            .gm(WGS84_GM)
            .ref_distance(WGS84_REF_DISTANCE)
            .max_degree(degree)
            .coefficient(0, 0, 1.0, 0.0)
            .coefficients(rows)
            .build()
            .unwrap(),
    )
}

/// Random positions between 1.05 and 7 reference radii, away from the polar axis.
pub fn random_positions(count: usize, seed: u64) -> Vec<Vector3<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let r = WGS84_REF_DISTANCE * rng.random_range(1.05..7.0);
            let lat = rng.random_range(-1.4..1.4f64);
            let lon = rng.random_range(-std::f64::consts::PI..std::f64::consts::PI);
            Vector3::new(
                r * lat.cos() * lon.cos(),
                r * lat.cos() * lon.sin(),
                r * lat.sin(),
            )
        })
        .collect()
}

pub fn assert_vector_close(actual: &Vector3<f64>, expected: &Vector3<f64>, epsilon: f64) {
    assert_abs_diff_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_abs_diff_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_abs_diff_eq!(actual.z, expected.z, epsilon = epsilon);
}
