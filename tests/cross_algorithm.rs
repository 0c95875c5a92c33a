mod common;

use std::sync::Arc;

use common::{assert_vector_close, random_positions, synthetic_field};
use geopotential::calculator::holmes_featherstone::HolmesFeatherstone;
use geopotential::calculator::pines::Pines;
use geopotential::calculator::reference::ReferenceCalculator;
use geopotential::calculator::GravityCalculator;
use geopotential::constants::{WGS84_GM, WGS84_REF_DISTANCE};
use geopotential::gravity_field::GravityField;
use nalgebra::Vector3;

const FIXTURE_POSITIONS: [[f64; 3]; 2] = [[30000e3, 20000e3, 10e3], [20000e3, 30000e3, 40000e3]];

fn assert_relative_close(actual: &Vector3<f64>, expected: &Vector3<f64>, max_relative: f64) {
    let diff = (actual - expected).norm();
    assert!(
        diff <= max_relative * expected.norm(),
        "relative difference {} above {max_relative}: {actual} vs {expected}",
        diff / expected.norm()
    );
}

#[test]
fn test_fixture_positions_all_truncations() {
    let field = synthetic_field(30, 42);

    for (degree, order) in [(2, 0), (2, 2), (8, 3), (20, 20), (30, 10), (30, 30)] {
        let mut hf = HolmesFeatherstone::new(field.clone(), degree, order);
        let mut pines = Pines::new(field.clone(), degree, order);
        let mut reference = ReferenceCalculator::new(field.clone(), degree, order);

        for p in FIXTURE_POSITIONS {
            let pos = Vector3::from(p);
            let a_hf = hf.calc_pert_acceleration(&pos);
            let a_pines = pines.calc_pert_acceleration(&pos);
            let a_ref = reference.calc_pert_acceleration(&pos);

            assert_vector_close(&a_hf, &a_pines, 1e-19);
            assert_vector_close(&a_hf, &a_ref, 1e-19);
        }
    }
}

#[test]
fn test_random_positions_moderate_degree() {
    let field = synthetic_field(40, 7);
    let mut hf = HolmesFeatherstone::from_field(field.clone());
    let mut pines = Pines::from_field(field.clone());
    let mut reference = ReferenceCalculator::from_field(field);

    for pos in random_positions(50, 99) {
        let a_hf = hf.calc_pert_acceleration(&pos);
        assert_relative_close(&pines.calc_pert_acceleration(&pos), &a_hf, 1e-12);
        assert_relative_close(&reference.calc_pert_acceleration(&pos), &a_hf, 1e-12);
    }
}

#[test]
fn test_high_degree_agreement() {
    let field = synthetic_field(120, 2024);
    let mut hf = HolmesFeatherstone::from_field(field.clone());
    let mut pines = Pines::from_field(field);

    for pos in random_positions(10, 5) {
        let a_hf = hf.calc_pert_acceleration(&pos);
        let a_pines = pines.calc_pert_acceleration(&pos);
        assert!(a_hf.iter().all(|v| v.is_finite()));
        assert_relative_close(&a_pines, &a_hf, 1e-11);
    }
}

#[test]
fn test_potentials_agree() {
    let field = synthetic_field(25, 3);
    let mut hf = HolmesFeatherstone::from_field(field.clone());
    let mut reference = ReferenceCalculator::from_field(field);

    for pos in random_positions(20, 17) {
        let u_hf = hf.calc_pert_potential(&pos);
        let u_ref = reference.calc_pert_potential(&pos);
        assert!((u_hf - u_ref).abs() <= 1e-12 * u_hf.abs());
    }
}

#[test]
fn test_unnormalized_table_gives_same_result() {
    let normalized = synthetic_field(12, 11);
    let unnormalized = Arc::new(normalized.unnormalized());
    assert!(!unnormalized.is_normalized());

    let pos = Vector3::new(-5100e3, 4400e3, 1800e3);
    let expected = Pines::from_field(normalized).calc_pert_acceleration(&pos);

    let mut hf = HolmesFeatherstone::from_field(unnormalized.clone());
    let mut pines = Pines::from_field(unnormalized.clone());
    assert_relative_close(&hf.calc_pert_acceleration(&pos), &expected, 1e-12);
    assert_relative_close(&pines.calc_pert_acceleration(&pos), &expected, 1e-12);

    // the caller's table is left untouched
    assert!(!unnormalized.is_normalized());
    assert!(hf.gravity_field().is_normalized());
}

#[test]
fn test_high_degree_unnormalized_table_is_finite() {
    let unnormalized = Arc::new(
        GravityField::builder()
            .gm(WGS84_GM)
            .ref_distance(WGS84_REF_DISTANCE)
            .max_degree(100)
            .normalized(false)
            .coefficient(0, 0, 1.0, 0.0)
            .coefficient(2, 0, -1.0826e-3, 0.0)
            .build()
            .unwrap(),
    );
    let pos = Vector3::new(6900e3, -1300e3, 2100e3);
    let expected = Pines::new(unnormalized.clone(), 2, 0).calc_pert_acceleration(&pos);

    let mut hf = HolmesFeatherstone::from_field(unnormalized.clone());
    let mut pines = Pines::from_field(unnormalized);
    assert_relative_close(&hf.calc_pert_acceleration(&pos), &expected, 1e-12);
    assert_relative_close(&pines.calc_pert_acceleration(&pos), &expected, 1e-12);
}

#[test]
fn test_degree_one_terms_are_ignored_by_all_calculators() {
    let base = synthetic_field(6, 13);
    let mut with_degree_one = (*base).clone();
    with_degree_one.set_coefficient(1, 0, 3e-6, 0.0).unwrap();
    with_degree_one.set_coefficient(1, 1, 1e-6, 2e-6).unwrap();
    let with_degree_one = Arc::new(with_degree_one);

    for pos in random_positions(5, 31) {
        let expected = HolmesFeatherstone::from_field(base.clone()).calc_pert_acceleration(&pos);

        let a_hf = HolmesFeatherstone::from_field(with_degree_one.clone()).calc_pert_acceleration(&pos);
        let a_pines = Pines::from_field(with_degree_one.clone()).calc_pert_acceleration(&pos);
        let a_ref =
            ReferenceCalculator::from_field(with_degree_one.clone()).calc_pert_acceleration(&pos);

        assert_eq!(a_hf, expected);
        assert_relative_close(&a_pines, &expected, 1e-12);
        assert_relative_close(&a_ref, &expected, 1e-12);
    }
}

#[test]
fn test_wgs84_j2_fixture() {
    let field = Arc::new(GravityField::wgs84_j2());
    let expected = [
        Vector3::new(
            -1.2964608245266108e-05,
            -8.6430721635107374e-06,
            -1.2964611569525655e-08,
        ),
        Vector3::new(
            2.0450501091438087e-06,
            3.0675751637157131e-06,
            -5.6138630447084890e-07,
        ),
    ];

    let mut calculators: Vec<Box<dyn GravityCalculator>> = vec![
        Box::new(HolmesFeatherstone::new(field.clone(), 2, 0)),
        Box::new(Pines::new(field.clone(), 2, 0)),
        Box::new(ReferenceCalculator::new(field, 2, 0)),
    ];

    for calc in calculators.iter_mut() {
        for (p, e) in FIXTURE_POSITIONS.iter().zip(expected.iter()) {
            let a = calc.calc_pert_acceleration(&Vector3::from(*p));
            assert_vector_close(&a, e, 1e-18);
        }
    }
}
