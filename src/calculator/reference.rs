//! # Reference gravity calculator
//!
//! Direct evaluation of the spherical-harmonic series in geocentric latitude `φ` and
//! longitude `λ`, as given in Vallado, *Fundamentals of Astrodynamics and Applications*,
//! section 8.7:
//!
//! ```text
//! ∂U/∂r = -GM/r² Σₙ (R/r)ⁿ (n+1) Σₘ P̄nm(sin φ) (C̄nm cos mλ + S̄nm sin mλ)
//! ∂U/∂φ =  GM/r  Σₙ (R/r)ⁿ Σₘ [∂P̄nm/∂φ] (C̄nm cos mλ + S̄nm sin mλ)
//! ∂U/∂λ =  GM/r  Σₙ (R/r)ⁿ Σₘ m P̄nm(sin φ) (S̄nm cos mλ - C̄nm sin mλ)
//! ```
//!
//! Trigonometric functions and powers are evaluated term by term with no recursion on the
//! longitude and no scaling of the Legendre functions. This makes the calculator slow and
//! limits its accuracy at high degree (the sectorial values underflow past a few hundred),
//! but keeps it an independent cross-check of the two production algorithms.
//!
//! The latitude derivative uses `tan φ`, so the polar axis is singular.

use std::sync::Arc;

use nalgebra::Vector3;

use super::grid::Grid;
use super::{CalculatorCore, GravityCalculator};
use crate::gravity_field::GravityField;

/// Straightforward latitude/longitude spherical-harmonic gravity calculator.
#[derive(Debug, Clone)]
pub struct ReferenceCalculator {
    core: CalculatorCore,
    /// Normalized Legendre functions `P̄nm(sin φ)`, `(degree + 1) × (order + 2)`
    legendre: Grid,
}

/// Gradient of the non-central potential in geocentric spherical coordinates.
#[derive(Debug, Clone, Copy, Default)]
struct SphericalGradient {
    potential: f64,
    d_r: f64,
    d_phi: f64,
    d_lambda: f64,
}

impl ReferenceCalculator {
    /// Build a calculator truncated at `(degree, order)`, clamped to the table bounds.
    pub fn new(field: Arc<GravityField>, degree: usize, order: usize) -> Self {
        let mut calc = ReferenceCalculator {
            core: CalculatorCore::new(field, degree, order),
            legendre: Grid::default(),
        };
        calc.prepare();
        calc
    }

    /// Build a calculator using the full degree and order of the table.
    pub fn from_field(field: Arc<GravityField>) -> Self {
        let (degree, order) = (field.get_max_degree(), field.get_max_order());
        Self::new(field, degree, order)
    }

    fn prepare(&mut self) {
        // one extra column for the P̄n,m+1 term of the latitude derivative
        self.legendre = Grid::zeros(self.core.degree() + 1, self.core.order() + 2);
    }

    /// Non-central potential `U - GM/r` at `position`, in m²/s².
    pub fn calc_pert_potential(&mut self, position: &Vector3<f64>) -> f64 {
        let (x, y, z) = (position.x, position.y, position.z);
        let rho = x.hypot(y);
        let r = position.norm();
        self.spherical_gradient(r, z / r, rho / r, z / rho, y.atan2(x))
            .potential
    }

    /// Fill `P̄nm(sin φ)` for every column the sums need, by forward recursion in `n` from
    /// the sectorial value of each column.
    fn fill_legendre(&mut self, sin_phi: f64, cos_phi: f64) {
        let degree = self.core.degree();
        let last_column = (self.core.order() + 1).min(degree);
        let p = &mut self.legendre;

        p[(0, 0)] = 1.0;
        for m in 0..=last_column {
            let mf = m as f64;
            if m > 0 {
                let k = if m == 1 {
                    3f64.sqrt()
                } else {
                    ((2.0 * mf + 1.0) / (2.0 * mf)).sqrt()
                };
                p[(m, m)] = k * cos_phi * p[(m - 1, m - 1)];
            }
            for n in (m + 1)..=degree {
                let nf = n as f64;
                let a = ((2.0 * nf - 1.0) * (2.0 * nf + 1.0) / ((nf - mf) * (nf + mf))).sqrt();
                p[(n, m)] = a * sin_phi * p[(n - 1, m)];
                if n >= m + 2 {
                    let b = ((2.0 * nf + 1.0) * (nf + mf - 1.0) * (nf - mf - 1.0)
                        / ((nf - mf) * (nf + mf) * (2.0 * nf - 3.0)))
                        .sqrt();
                    p[(n, m)] -= b * p[(n - 2, m)];
                }
            }
        }
    }

    fn spherical_gradient(
        &mut self,
        r: f64,
        sin_phi: f64,
        cos_phi: f64,
        tan_phi: f64,
        lambda: f64,
    ) -> SphericalGradient {
        self.fill_legendre(sin_phi, cos_phi);

        let field = self.core.gravity_field();
        let degree = self.core.degree();
        let order = self.core.order();
        let ref_distance = field.get_ref_distance();
        let p = &self.legendre;

        let mut out = SphericalGradient::default();
        for n in 2..=degree {
            let q = (ref_distance / r).powi(n as i32);
            let (mut sum_r, mut sum_phi, mut sum_lambda) = (0.0, 0.0, 0.0);

            for m in 0..=n.min(order) {
                let cnm = field.get_cnm(n, m);
                let snm = field.get_snm(n, m);
                let (sin_ml, cos_ml) = (m as f64 * lambda).sin_cos();
                let k = if m == 0 { 2.0 } else { 1.0 };
                let (nf, mf) = (n as f64, m as f64);

                // P̄n,m+1 is zero above the diagonal
                let p_next = if m < n { p[(n, m + 1)] } else { 0.0 };
                let d_pnm = ((nf - mf) * (nf + mf + 1.0) / k).sqrt() * p_next - mf * tan_phi * p[(n, m)];

                let harmonic = cnm * cos_ml + snm * sin_ml;
                sum_r += p[(n, m)] * harmonic;
                sum_phi += d_pnm * harmonic;
                sum_lambda += mf * p[(n, m)] * (snm * cos_ml - cnm * sin_ml);
            }

            out.potential += q * sum_r;
            out.d_r += (n as f64 + 1.0) * q * sum_r;
            out.d_phi += q * sum_phi;
            out.d_lambda += q * sum_lambda;
        }

        let mu = field.get_gm();
        out.potential *= mu / r;
        out.d_r *= -mu / (r * r);
        out.d_phi *= mu / r;
        out.d_lambda *= mu / r;
        out
    }
}

impl GravityCalculator for ReferenceCalculator {
    fn core(&self) -> &CalculatorCore {
        &self.core
    }

    fn name(&self) -> &'static str {
        "Reference"
    }

    fn set_degree_order(&mut self, degree: usize, order: usize) {
        self.core.set_degree_order(degree, order);
        self.prepare();
    }

    fn calc_pert_acceleration(&mut self, position: &Vector3<f64>) -> Vector3<f64> {
        let (x, y, z) = (position.x, position.y, position.z);
        let rho2 = x * x + y * y;
        let rho = rho2.sqrt();
        let r2 = rho2 + z * z;
        let r = r2.sqrt();

        let g = self.spherical_gradient(r, z / r, rho / r, z / rho, y.atan2(x));

        let k1 = g.d_r / r - z / (r2 * rho) * g.d_phi;
        Vector3::new(
            k1 * x - g.d_lambda * y / rho2,
            k1 * y + g.d_lambda * x / rho2,
            g.d_r * z / r + rho / r2 * g.d_phi,
        )
    }
}
