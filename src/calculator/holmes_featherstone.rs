//! # Holmes–Featherstone gravity calculator
//!
//! Evaluation of the non-central gravity field with the fully-normalized associated Legendre
//! recursion of Holmes & Featherstone (2002), *A unified approach to the Clenshaw summation and
//! the recursive computation of very high degree and order normalised associated Legendre
//! functions*, J. Geodesy 76.
//!
//! ## Outline
//!
//! 1. Geocentric intermediates `r`, `ρ = √(x²+y²)`, `t = cos θ = z/r`, `u = sin θ = ρ/r`.
//! 2. Distance powers `(R/r)ⁿ` and longitude harmonics `cos mλ`, `sin mλ`, both built by
//!    splitting the index into two halves and reusing already computed entries.
//! 3. For `m = degree … 0`, the Legendre column `P̄nm / uᵐ` and its colatitude derivative are
//!    recursed from the sectorial seed with coefficients precomputed by `prepare`.
//! 4. Inner sums over `n` give the potential and its `r`, `λ`, `θ` derivatives for order `m`;
//!    the outer sum over `m` is a Horner scheme in `u`.
//! 5. Seeds are carried with a `2⁻⁹³⁰` factor which is removed at the end, then `GM/r` is
//!    applied and the spherical gradient is mapped to Cartesian axes with the Jacobian of
//!    `(r, λ, θ)` with respect to `(x, y, z)`.
//!
//! ## Limitation
//!
//! The longitude harmonics divide by `ρ`, so a position exactly on the polar axis produces NaN.
//! This is not guarded; use [`Pines`](crate::calculator::pines::Pines) when the trajectory may
//! cross the axis.

use std::sync::Arc;

use nalgebra::{Matrix3, Vector3};

use super::{CalculatorCore, GravityCalculator};
use crate::constants::HF_SCALING;
use crate::gravity_field::GravityField;

/// Holmes–Featherstone spherical-harmonic gravity calculator.
#[derive(Debug, Clone)]
pub struct HolmesFeatherstone {
    core: CalculatorCore,

    // recursion coefficients, stored column by column from m = degree down to 0
    gnm_oj: Vec<f64>,
    hnm_oj: Vec<f64>,
    enm: Vec<f64>,
    /// Scaled sectorial seeds P̄mm / uᵐ × 2⁻ˢᶜᴬᴸᴵᴺᴳ
    sectorial: Vec<f64>,

    // Legendre columns for orders m+2, m+1, m and the derivative of column m
    pnm0_plus2: Vec<f64>,
    pnm0_plus1: Vec<f64>,
    pnm0: Vec<f64>,
    pnm1: Vec<f64>,

    a_or_n: Vec<f64>,
    cos_m_lambda: Vec<f64>,
    sin_m_lambda: Vec<f64>,
}

/// Fill `a_or_n[n] = (R/r)ⁿ`, splitting `n = p + q` with `p = n/2`.
fn fill_distance_powers(a_or: f64, a_or_n: &mut [f64]) {
    a_or_n[0] = 1.0;
    if a_or_n.len() > 1 {
        a_or_n[1] = a_or;
    }
    for n in 2..a_or_n.len() {
        let p = n / 2;
        let q = n - p;
        a_or_n[n] = a_or_n[p] * a_or_n[q];
    }
}

/// Fill `cos(mλ)` and `sin(mλ)` from `cos λ`, `sin λ` with the angle-sum identities,
/// splitting `m = p + q` so that neither half dominates the rounding error.
fn fill_cos_sin(cos_lambda: f64, sin_lambda: f64, cos_ml: &mut [f64], sin_ml: &mut [f64]) {
    cos_ml[0] = 1.0;
    sin_ml[0] = 0.0;
    if cos_ml.len() > 1 {
        cos_ml[1] = cos_lambda;
        sin_ml[1] = sin_lambda;
    }
    for m in 2..cos_ml.len() {
        let p = m / 2;
        let q = m - p;
        cos_ml[m] = cos_ml[p] * cos_ml[q] - sin_ml[p] * sin_ml[q];
        sin_ml[m] = sin_ml[p] * cos_ml[q] + cos_ml[p] * sin_ml[q];
    }
}

impl HolmesFeatherstone {
    /// Build a calculator truncated at `(degree, order)`, clamped to the table bounds.
    pub fn new(field: Arc<GravityField>, degree: usize, order: usize) -> Self {
        let mut calc = HolmesFeatherstone {
            core: CalculatorCore::new(field, degree, order),
            gnm_oj: Vec::new(),
            hnm_oj: Vec::new(),
            enm: Vec::new(),
            sectorial: Vec::new(),
            pnm0_plus2: Vec::new(),
            pnm0_plus1: Vec::new(),
            pnm0: Vec::new(),
            pnm1: Vec::new(),
            a_or_n: Vec::new(),
            cos_m_lambda: Vec::new(),
            sin_m_lambda: Vec::new(),
        };
        calc.prepare();
        calc
    }

    /// Build a calculator using the full degree and order of the table.
    pub fn from_field(field: Arc<GravityField>) -> Self {
        let (degree, order) = (field.get_max_degree(), field.get_max_order());
        Self::new(field, degree, order)
    }

    /// Size the scratch buffers and precompute the recursion coefficients for the current
    /// truncation.
    fn prepare(&mut self) {
        let degree = self.core.degree();
        let order = self.core.order();

        self.pnm0_plus2 = vec![0.0; degree + 1];
        self.pnm0_plus1 = vec![0.0; degree + 1];
        self.pnm0 = vec![0.0; degree + 1];
        self.pnm1 = vec![0.0; degree + 1];
        self.a_or_n = vec![0.0; degree + 1];
        self.cos_m_lambda = vec![0.0; order + 1];
        self.sin_m_lambda = vec![0.0; order + 1];

        // triangle without the diagonal n = m and without (1, 0)
        let size = (degree * (degree + 1) / 2).saturating_sub(1);
        self.gnm_oj = Vec::with_capacity(size);
        self.hnm_oj = Vec::with_capacity(size);
        self.enm = Vec::with_capacity(size);

        // eq. 19 and 22, in the order the columns are consumed
        for m in (0..=degree).rev() {
            let j = if m == 0 { 2.0 } else { 1.0 };
            for n in 2.max(m + 1)..=degree {
                let (nf, mf) = (n as f64, m as f64);
                let f = (nf - mf) * (nf + mf + 1.0);
                self.gnm_oj.push(2.0 * (mf + 1.0) / (j * f).sqrt());
                self.hnm_oj
                    .push(((nf + mf + 2.0) * (nf - mf - 1.0) / (j * f)).sqrt());
                self.enm.push((f / j).sqrt());
            }
        }

        // eq. 28
        self.sectorial = vec![0.0; degree + 1];
        self.sectorial[0] = 2f64.powi(-HF_SCALING);
        if degree > 0 {
            self.sectorial[1] = 3f64.sqrt() * self.sectorial[0];
        }
        for m in 2..=degree {
            let mf = m as f64;
            self.sectorial[m] = ((2.0 * mf + 1.0) / (2.0 * mf)).sqrt() * self.sectorial[m - 1];
        }
    }

    /// Non-central potential `U - GM/r` at `position`, in m²/s².
    pub fn calc_pert_potential(&mut self, position: &Vector3<f64>) -> f64 {
        self.compute_gradient(position).0
    }

    /// Fill column `m` of the scaled Legendre values and their colatitude derivative.
    ///
    /// `index` is the position of the first recursion coefficient of this column; the position
    /// of the next column is returned.
    fn compute_tesseral(&mut self, m: usize, index: usize, t: f64, u: f64, t_ou: f64) -> usize {
        let degree = self.core.degree();
        let u2 = u * u;
        let mf = m as f64;
        let start = 2.max(m);

        // eq. 27
        let mut n = start;
        if n == m {
            self.pnm0[n] = self.sectorial[n];
            n += 1;
        }
        let mut local_index = index;
        while n <= degree {
            self.pnm0[n] = self.gnm_oj[local_index] * t * self.pnm0_plus1[n]
                - self.hnm_oj[local_index] * u2 * self.pnm0_plus2[n];
            local_index += 1;
            n += 1;
        }

        // eq. 30
        let mut n = start;
        if n == m {
            self.pnm1[n] = mf * t_ou * self.pnm0[n];
            n += 1;
        }
        let mut local_index = index;
        while n <= degree {
            self.pnm1[n] =
                mf * t_ou * self.pnm0[n] - self.enm[local_index] * u * self.pnm0_plus1[n];
            local_index += 1;
            n += 1;
        }

        local_index
    }

    /// Non-central potential and its Cartesian gradient.
    fn compute_gradient(&mut self, position: &Vector3<f64>) -> (f64, Vector3<f64>) {
        let degree = self.core.degree();
        let order = self.core.order();
        let mu = self.core.gravity_field().get_gm();
        let ref_distance = self.core.gravity_field().get_ref_distance();

        let (x, y, z) = (position.x, position.y, position.z);
        let rho2 = x * x + y * y;
        let r2 = rho2 + z * z;
        let r = r2.sqrt();
        let rho = rho2.sqrt();
        let t = z / r; // cos(θ)
        let u = rho / r; // sin(θ)
        let t_ou = z / rho;

        fill_distance_powers(ref_distance / r, &mut self.a_or_n);
        fill_cos_sin(
            x / rho,
            y / rho,
            &mut self.cos_m_lambda,
            &mut self.sin_m_lambda,
        );

        // columns are only written from index max(2, m) on; stale entries must not leak
        self.pnm0_plus2.fill(0.0);
        self.pnm0_plus1.fill(0.0);
        self.pnm0.fill(0.0);

        let mut index = 0;
        let mut value = 0.0;
        let mut gradient = Vector3::zeros();

        for m in (0..=degree).rev() {
            index = self.compute_tesseral(m, index, t, u, t_ou);

            if m <= order {
                let field = self.core.gravity_field();
                let mut sum_degree_s = 0.0;
                let mut sum_degree_c = 0.0;
                let mut d_sum_degree_s_dr = 0.0;
                let mut d_sum_degree_c_dr = 0.0;
                let mut d_sum_degree_s_dtheta = 0.0;
                let mut d_sum_degree_c_dtheta = 0.0;

                for n in 2.max(m)..=degree {
                    let q_snm = self.a_or_n[n] * field.get_snm(n, m);
                    let q_cnm = self.a_or_n[n] * field.get_cnm(n, m);
                    let n_or = n as f64 / r;
                    let s0 = self.pnm0[n] * q_snm;
                    let c0 = self.pnm0[n] * q_cnm;
                    let s1 = self.pnm1[n] * q_snm;
                    let c1 = self.pnm1[n] * q_cnm;

                    sum_degree_s += s0;
                    sum_degree_c += c0;
                    d_sum_degree_s_dr -= n_or * s0;
                    d_sum_degree_c_dr -= n_or * c0;
                    d_sum_degree_s_dtheta += s1;
                    d_sum_degree_c_dtheta += c1;
                }

                // gradient components: [r, λ, θ]
                let s_ml = self.sin_m_lambda[m];
                let c_ml = self.cos_m_lambda[m];
                let mf = m as f64;

                value = value * u + s_ml * sum_degree_s + c_ml * sum_degree_c;
                gradient[0] = gradient[0] * u + s_ml * d_sum_degree_s_dr + c_ml * d_sum_degree_c_dr;
                gradient[1] = gradient[1] * u + mf * (c_ml * sum_degree_s - s_ml * sum_degree_c);
                gradient[2] =
                    gradient[2] * u + s_ml * d_sum_degree_s_dtheta + c_ml * d_sum_degree_c_dtheta;
            }

            // column m becomes m+1 for the next order
            std::mem::swap(&mut self.pnm0_plus2, &mut self.pnm0_plus1);
            std::mem::swap(&mut self.pnm0_plus1, &mut self.pnm0);
        }

        let factor = 2f64.powi(HF_SCALING);
        value *= factor;
        gradient *= factor;

        let mu_or = mu / r;
        value *= mu_or;
        gradient[0] = mu_or * gradient[0] - value / r;
        gradient[1] *= mu_or;
        gradient[2] *= mu_or;

        // rows: ∂r/∂(x,y,z), ∂λ/∂(x,y,z), ∂θ/∂(x,y,z)
        let rho_times_r2 = rho * r2;
        #[rustfmt::skip]
        let jacobian = Matrix3::new(
            x / r,                  y / r,                  t,
            -y / rho2,              x / rho2,               0.0,
            x * z / rho_times_r2,   y * z / rho_times_r2,   -rho / r2,
        );

        (value, jacobian.tr_mul(&gradient))
    }
}

impl GravityCalculator for HolmesFeatherstone {
    fn core(&self) -> &CalculatorCore {
        &self.core
    }

    fn name(&self) -> &'static str {
        "Holmes-Featherstone"
    }

    fn set_degree_order(&mut self, degree: usize, order: usize) {
        self.core.set_degree_order(degree, order);
        self.prepare();
    }

    fn calc_pert_acceleration(&mut self, position: &Vector3<f64>) -> Vector3<f64> {
        self.compute_gradient(position).1
    }
}
