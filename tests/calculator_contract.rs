mod common;

use std::sync::Arc;
use std::thread;

use common::{random_positions, synthetic_field};
use geopotential::calculator::pines::Pines;
use geopotential::calculator::{point_mass_acceleration, AnyCalculator, GravityCalculator};
use geopotential::constants::WGS84_REF_DISTANCE;
use geopotential::gravity_field::GravityField;
use geopotential::params::{GravityAlgorithm, GravityParams};
use nalgebra::Vector3;

const ALGORITHMS: [GravityAlgorithm; 3] = [
    GravityAlgorithm::HolmesFeatherstone,
    GravityAlgorithm::Pines,
    GravityAlgorithm::Reference,
];

fn calculator(
    algorithm: GravityAlgorithm,
    field: &Arc<GravityField>,
    degree: usize,
    order: usize,
) -> AnyCalculator {
    GravityParams::builder()
        .algorithm(algorithm)
        .degree(degree)
        .order(order)
        .build()
        .unwrap()
        .build_calculator(field.clone())
}

#[test]
fn test_total_is_pert_minus_point_mass() {
    let field = synthetic_field(10, 1);
    let gm = field.get_gm();

    for algorithm in ALGORITHMS {
        let mut calc = calculator(algorithm, &field, 10, 10);
        for pos in random_positions(10, 2) {
            let pert = calc.calc_pert_acceleration(&pos);
            let total = calc.calc_total_acceleration(&pos);
            assert_eq!(total, pert - pos * (gm / (pos.norm_squared() * pos.norm())));
        }
    }
}

#[test]
fn test_degree_zero_is_point_mass() {
    let field = synthetic_field(10, 1);
    let pos = Vector3::new(7000e3, -2000e3, 500e3);

    for algorithm in ALGORITHMS {
        let mut calc = calculator(algorithm, &field, 0, 0);
        assert_eq!(calc.calc_pert_acceleration(&pos), Vector3::zeros());
        assert_eq!(
            calc.calc_total_acceleration(&pos),
            point_mass_acceleration(field.get_gm(), &pos)
        );
    }
}

#[test]
fn test_degenerate_table_is_zero() {
    let field = Arc::new(GravityField::default());
    let pos = Vector3::new(7000e3, -2000e3, 500e3);

    for algorithm in ALGORITHMS {
        let mut calc = GravityParams::builder()
            .algorithm(algorithm)
            .build()
            .unwrap()
            .build_calculator(field.clone());
        assert_eq!((calc.degree(), calc.order()), (0, 0));
        assert_eq!(calc.calc_pert_acceleration(&pos), Vector3::zeros());
        assert_eq!(calc.calc_total_acceleration(&pos), Vector3::zeros());
    }
}

#[test]
fn test_zero_gm_table_with_coefficients_is_zero() {
    let pos = Vector3::new(7000e3, -2000e3, 500e3);

    // GM and reference distance left at their zero defaults
    let unscaled = GravityField::builder()
        .max_degree(4)
        .coefficient(2, 0, -4.84e-4, 0.0)
        .coefficient(3, 1, 2.0e-6, 2.5e-7)
        .build()
        .unwrap();
    let zero_gm = GravityField::builder()
        .ref_distance(WGS84_REF_DISTANCE)
        .max_degree(4)
        .coefficient(2, 0, -4.84e-4, 0.0)
        .build()
        .unwrap();

    for field in [Arc::new(unscaled), Arc::new(zero_gm)] {
        for algorithm in ALGORITHMS {
            let mut calc = calculator(algorithm, &field, 4, 4);
            assert_eq!(calc.calc_pert_acceleration(&pos), Vector3::zeros());
            assert_eq!(calc.calc_total_acceleration(&pos), Vector3::zeros());
        }

        let (acc, gradient) = Pines::from_field(field.clone()).calc_gravity_gradient(&pos);
        assert_eq!(acc, Vector3::zeros());
        assert_eq!(gradient, nalgebra::Matrix3::zeros());
    }
}

#[test]
fn test_truncation_changes_stay_within_dropped_terms() {
    let field = synthetic_field(30, 8);
    let gm = field.get_gm();
    let pos = Vector3::new(30000e3, 20000e3, 10e3);
    let r = pos.norm();
    let ratio: f64 = WGS84_REF_DISTANCE / r;

    // crude bound on the acceleration carried by degrees 21..=30 of the synthetic table
    let bound: f64 = (21..=30)
        .map(|n| {
            let nf = n as f64;
            let envelope = 1e-5 / (nf * nf);
            gm / (r * r) * ratio.powi(n) * (nf + 1.0) * (nf + 1.0) * envelope * (2.0 * nf + 1.0).sqrt() * 4.0 * nf
        })
        .sum();

    for algorithm in ALGORITHMS {
        let mut low = calculator(algorithm, &field, 20, 20);
        let mut high = calculator(algorithm, &field, 30, 30);
        let a_low = low.calc_pert_acceleration(&pos);
        let a_high = high.calc_pert_acceleration(&pos);

        assert!(a_high.iter().all(|v| v.is_finite()));
        assert!((a_high - a_low).norm() <= bound);
        assert!((a_high - a_low).norm() < 1e-6 * a_low.norm());
    }
}

#[test]
fn test_set_degree_order_matches_fresh_calculator() {
    let field = synthetic_field(20, 4);
    let pos = Vector3::new(6800e3, 1200e3, -2400e3);

    for algorithm in ALGORITHMS {
        let mut calc = calculator(algorithm, &field, 20, 20);
        calc.set_degree_order(12, 7);
        assert_eq!((calc.degree(), calc.order()), (12, 7));

        let mut fresh = calculator(algorithm, &field, 12, 7);
        assert_eq!(
            calc.calc_pert_acceleration(&pos),
            fresh.calc_pert_acceleration(&pos)
        );

        // requests beyond the table are clamped
        calc.set_degree_order(50, 60);
        assert_eq!((calc.degree(), calc.order()), (20, 20));
        calc.set_degree_order(5, 9);
        assert_eq!((calc.degree(), calc.order()), (5, 5));
    }
}

#[test]
fn test_pines_pole_robustness() {
    let field = synthetic_field(30, 21);
    let mut pines = Pines::from_field(field);

    for z in [WGS84_REF_DISTANCE * 1.01, -WGS84_REF_DISTANCE * 3.0, 42164e3] {
        let on_axis = Vector3::new(0.0, 0.0, z);
        let a = pines.calc_pert_acceleration(&on_axis);
        assert!(a.iter().all(|v| v.is_finite()));

        let near = pines.calc_pert_acceleration(&Vector3::new(1e-6, -1e-6, z));
        assert!((a - near).norm() <= 1e-9 * a.norm());

        let (acc, gradient) = pines.calc_gravity_gradient(&on_axis);
        assert!(acc.iter().all(|v| v.is_finite()));
        assert!(gradient.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn test_shared_table_across_threads() {
    let field = synthetic_field(30, 5);
    let positions = random_positions(16, 6);

    let mut serial = Pines::from_field(field.clone());
    let expected: Vec<_> = positions
        .iter()
        .map(|p| serial.calc_pert_acceleration(p))
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let field = field.clone();
            let positions = positions.clone();
            thread::spawn(move || {
                let mut calc = Pines::from_field(field);
                positions
                    .iter()
                    .map(|p| calc.calc_pert_acceleration(p))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
