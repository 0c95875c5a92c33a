//! Evaluate the WGS84 J2 field with the three calculators and print them side by side.
//!
//! ```text
//! cargo run --example compare_calculators
//! ```

use std::sync::Arc;

use nalgebra::Vector3;

use geopotential::calculator::GravityCalculator;
use geopotential::gravity_field::GravityField;
use geopotential::params::{GravityAlgorithm, GravityParams};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let field = Arc::new(GravityField::wgs84_j2());
    let positions = [
        Vector3::new(30000e3, 20000e3, 10e3),
        Vector3::new(20000e3, 30000e3, 40000e3),
        Vector3::new(6778e3, 0.0, 0.0),
        // polar axis: Holmes-Featherstone prints NaN here
        Vector3::new(0.0, 0.0, 7000e3),
    ];

    println!(
        "model '{}' ({}), GM = {:e} m^3/s^2, R = {} m",
        field.get_model_name(),
        field.get_central_body_name(),
        field.get_gm(),
        field.get_ref_distance()
    );

    for algorithm in [
        GravityAlgorithm::HolmesFeatherstone,
        GravityAlgorithm::Pines,
        GravityAlgorithm::Reference,
    ] {
        let params = GravityParams::builder().algorithm(algorithm).build()?;
        let mut calc = params.build_calculator(field.clone());

        println!("\n{} (degree {}, order {})", calc.name(), calc.degree(), calc.order());
        for p in &positions {
            let pert = calc.calc_pert_acceleration(p);
            let total = calc.calc_total_acceleration(p);
            println!(
                "  p = [{:>12.0} {:>12.0} {:>12.0}]  pert = [{:>14.6e} {:>14.6e} {:>14.6e}]  |total| = {:.9e}",
                p.x,
                p.y,
                p.z,
                pert.x,
                pert.y,
                pert.z,
                total.norm()
            );
        }
    }

    Ok(())
}
