//! # Pines gravity calculator
//!
//! Singularity-free evaluation of the spherical-harmonic series following
//! S. Pines (1973), *Uniform representation of the gravitational potential and its derivatives*,
//! AIAA Journal 11, with the fully-normalized derived Legendre functions of
//! Lundberg & Schutz (1988).
//!
//! The position enters only through its direction cosines `s = x/r`, `t = y/r`, `u = z/r`
//! and the ratio `R/r`, so nothing divides by the distance to the polar axis. The longitude
//! dependence is carried by the complex powers `(s + i t)ᵐ`, stored as real and imaginary
//! parts.
//!
//! Besides the acceleration, the calculator can produce the gravity-gradient tensor
//! `∂a/∂p` of the non-central part, see [`Pines::calc_gravity_gradient`].

use std::sync::Arc;

use nalgebra::{Matrix3, Vector3};

use super::grid::Grid;
use super::{CalculatorCore, GravityCalculator};
use crate::gravity_field::GravityField;

/// Pines spherical-harmonic gravity calculator.
#[derive(Debug, Clone)]
pub struct Pines {
    core: CalculatorCore,

    /// Derived Legendre functions `Anm(u)`, `(degree + 3) × (order + 3)`
    a: Grid,
    n1: Grid,
    n2: Grid,

    // (degree + 1) × (order + 1) multipliers of the shifted Anm, halved by √2 at m = 0
    vr01: Grid,
    vr11: Grid,
    vr02: Grid,
    vr12: Grid,
    vr22: Grid,

    re: Vec<f64>,
    im: Vec<f64>,
}

/// Sums accumulated over the series for the acceleration and, optionally, its gradient.
#[derive(Debug, Default)]
struct PinesSums {
    a1: f64,
    a2: f64,
    a3: f64,
    a4: f64,
    a11: f64,
    a12: f64,
    a13: f64,
    a14: f64,
    a23: f64,
    a24: f64,
    a33: f64,
    a34: f64,
    a44: f64,
}

impl Pines {
    /// Build a calculator truncated at `(degree, order)`, clamped to the table bounds.
    pub fn new(field: Arc<GravityField>, degree: usize, order: usize) -> Self {
        let mut calc = Pines {
            core: CalculatorCore::new(field, degree, order),
            a: Grid::default(),
            n1: Grid::default(),
            n2: Grid::default(),
            vr01: Grid::default(),
            vr11: Grid::default(),
            vr02: Grid::default(),
            vr12: Grid::default(),
            vr22: Grid::default(),
            re: Vec::new(),
            im: Vec::new(),
        };
        calc.prepare();
        calc
    }

    /// Build a calculator using the full degree and order of the table.
    pub fn from_field(field: Arc<GravityField>) -> Self {
        let (degree, order) = (field.get_max_degree(), field.get_max_order());
        Self::new(field, degree, order)
    }

    /// Size the tables for the current truncation and fill every position independent entry.
    fn prepare(&mut self) {
        let nn = self.core.degree();
        let mm = self.core.order();
        let rows = nn + 3;
        let cols = mm + 3;

        // the diagonal does not depend on the position
        self.a = Grid::zeros(rows, cols);
        self.a[(0, 0)] = 1.0;
        for n in 1..rows.min(cols) {
            let nf = n as f64;
            self.a[(n, n)] = ((2.0 * nf + 1.0) / (2.0 * nf)).sqrt() * self.a[(n - 1, n - 1)];
        }

        self.n1 = Grid::zeros(rows, cols);
        self.n2 = Grid::zeros(rows, cols);
        for m in 0..cols {
            let mf = m as f64;
            for n in (m + 2)..rows {
                let nf = n as f64;
                self.n1[(n, m)] =
                    ((2.0 * nf + 1.0) * (2.0 * nf - 1.0) / ((nf - mf) * (nf + mf))).sqrt();
                self.n2[(n, m)] = ((2.0 * nf + 1.0) * (nf - mf - 1.0) * (nf + mf - 1.0)
                    / ((2.0 * nf - 3.0) * (nf + mf) * (nf - mf)))
                    .sqrt();
            }
        }

        let table = |f: fn(f64, f64) -> f64| {
            Grid::lower_from_fn(nn + 1, mm + 1, |n, m| {
                let v = f(n as f64, m as f64);
                if m == 0 {
                    v / std::f64::consts::SQRT_2
                } else {
                    v
                }
            })
        };
        self.vr01 = table(|n, m| ((n - m) * (n + m + 1.0)).sqrt());
        self.vr11 = table(|n, m| {
            ((2.0 * n + 1.0) * (n + m + 2.0) * (n + m + 1.0) / (2.0 * n + 3.0)).sqrt()
        });
        self.vr02 =
            table(|n, m| ((n - m) * (n - m - 1.0) * (n + m + 1.0) * (n + m + 2.0)).max(0.0).sqrt());
        self.vr12 = table(|n, m| {
            ((2.0 * n + 1.0) / (2.0 * n + 3.0)
                * (n - m)
                * (n + m + 1.0)
                * (n + m + 2.0)
                * (n + m + 3.0))
                .sqrt()
        });
        self.vr22 = table(|n, m| {
            ((2.0 * n + 1.0) / (2.0 * n + 5.0)
                * (n + m + 1.0)
                * (n + m + 2.0)
                * (n + m + 3.0)
                * (n + m + 4.0))
                .sqrt()
        });

        self.re = vec![0.0; cols];
        self.im = vec![0.0; cols];
    }

    /// Fill the position dependent part of `Anm` and the longitude powers.
    ///
    /// `extra` is the number of additional degrees and orders needed beyond the truncation:
    /// 1 for the acceleration, 2 for the gradient.
    fn fill_legendre(&mut self, s: f64, t: f64, u: f64, extra: usize) {
        let nn = self.core.degree();
        let mm = self.core.order();
        let a = &mut self.a;

        a[(1, 0)] = u * 3f64.sqrt();
        for n in 1..=(nn + extra - 1).min(mm + extra) {
            a[(n + 1, n)] = u * (2.0 * n as f64 + 3.0).sqrt() * a[(n, n)];
        }

        for m in 0..=(mm + extra) {
            for n in (m + 2)..=(nn + extra) {
                a[(n, m)] = u * self.n1[(n, m)] * a[(n - 1, m)] - self.n2[(n, m)] * a[(n - 2, m)];
            }
            if m == 0 {
                self.re[0] = 1.0;
                self.im[0] = 0.0;
            } else {
                self.re[m] = s * self.re[m - 1] - t * self.im[m - 1];
                self.im[m] = s * self.im[m - 1] + t * self.re[m - 1];
            }
        }
    }

    /// Accumulate the series at `position`; the second-order sums are only filled when
    /// `with_gradient` is set.
    fn evaluate(&mut self, position: &Vector3<f64>, with_gradient: bool) -> (PinesSums, f64) {
        let r = position.norm();
        let s = position.x / r;
        let t = position.y / r;
        let u = position.z / r;

        let extra = if with_gradient { 2 } else { 1 };
        self.fill_legendre(s, t, u, extra);

        let field = self.core.gravity_field();
        let ref_distance = field.get_ref_distance();
        let nn = self.core.degree();
        let mm = self.core.order();
        let sqrt2 = std::f64::consts::SQRT_2;

        // GM/r² (R/r)ⁿ and GM/r³ (R/r)ⁿ, never dividing by R
        let rho = ref_distance / r;
        let gm_or2 = field.get_gm() / (r * r);
        let mut scale1 = gm_or2 * rho;
        let mut scale2 = gm_or2 / r * rho;
        let mut acc = PinesSums::default();

        let a = &self.a;
        let (re, im) = (&self.re, &self.im);

        // degree-1 terms vanish in a body-centred frame and are skipped
        for n in 2..=nn {
            scale1 *= rho;
            scale2 *= rho;

            let (mut sum1, mut sum2, mut sum3, mut sum4) = (0.0, 0.0, 0.0, 0.0);
            let mut sum11 = 0.0;
            let mut sum12 = 0.0;
            let mut sum13 = 0.0;
            let mut sum14 = 0.0;
            let mut sum23 = 0.0;
            let mut sum24 = 0.0;
            let mut sum33 = 0.0;
            let mut sum34 = 0.0;
            let mut sum44 = 0.0;

            for m in 0..=n.min(mm) {
                let cnm = field.get_cnm(n, m);
                let snm = field.get_snm(n, m);
                let mf = m as f64;

                let d = (cnm * re[m] + snm * im[m]) * sqrt2;
                let (e, f) = if m == 0 {
                    (0.0, 0.0)
                } else {
                    (
                        (cnm * re[m - 1] + snm * im[m - 1]) * sqrt2,
                        (snm * re[m - 1] - cnm * im[m - 1]) * sqrt2,
                    )
                };

                let avv00 = a[(n, m)];
                let avv01 = self.vr01[(n, m)] * a[(n, m + 1)];
                let avv11 = self.vr11[(n, m)] * a[(n + 1, m + 1)];

                sum1 += mf * avv00 * e;
                sum2 += mf * avv00 * f;
                sum3 += avv01 * d;
                sum4 += avv11 * d;

                if with_gradient {
                    let (g, h) = if m <= 1 {
                        (0.0, 0.0)
                    } else {
                        (
                            (cnm * re[m - 2] + snm * im[m - 2]) * sqrt2,
                            (snm * re[m - 2] - cnm * im[m - 2]) * sqrt2,
                        )
                    };

                    let avv02 = self.vr02[(n, m)] * a[(n, m + 2)];
                    let avv12 = self.vr12[(n, m)] * a[(n + 1, m + 2)];
                    let avv22 = self.vr22[(n, m)] * a[(n + 2, m + 2)];

                    sum11 += mf * (mf - 1.0) * avv00 * g;
                    sum12 += mf * (mf - 1.0) * avv00 * h;
                    sum13 += mf * avv01 * e;
                    sum14 += mf * avv11 * e;
                    sum23 += mf * avv01 * f;
                    sum24 += mf * avv11 * f;
                    sum33 += avv02 * d;
                    sum34 += avv12 * d;
                    sum44 += avv22 * d;
                }
            }

            let rr = scale1;
            acc.a1 += rr * sum1;
            acc.a2 += rr * sum2;
            acc.a3 += rr * sum3;
            acc.a4 -= rr * sum4;

            if with_gradient {
                let rr2 = scale2;
                acc.a11 += rr2 * sum11;
                acc.a12 += rr2 * sum12;
                acc.a13 += rr2 * sum13;
                acc.a14 -= rr2 * sum14;
                acc.a23 += rr2 * sum23;
                acc.a24 -= rr2 * sum24;
                acc.a33 += rr2 * sum33;
                acc.a34 -= rr2 * sum34;
                acc.a44 += rr2 * sum44;
            }
        }

        (acc, r)
    }

    /// Non-central acceleration and gravity-gradient tensor at `position`.
    ///
    /// Return
    /// ------
    /// * the acceleration in m/s², identical to
    ///   [`calc_pert_acceleration`](GravityCalculator::calc_pert_acceleration),
    /// * the symmetric tensor `∂aᵢ/∂pⱼ` of that acceleration in 1/s².
    pub fn calc_gravity_gradient(&mut self, position: &Vector3<f64>) -> (Vector3<f64>, Matrix3<f64>) {
        let (sums, r) = self.evaluate(position, true);
        let s = position.x / r;
        let t = position.y / r;
        let u = position.z / r;

        let g00 = sums.a11 + s * s * sums.a44 + sums.a4 / r + 2.0 * s * sums.a14;
        let g11 = -sums.a11 + t * t * sums.a44 + sums.a4 / r + 2.0 * t * sums.a24;
        let g22 = sums.a33 + u * u * sums.a44 + sums.a4 / r + 2.0 * u * sums.a34;
        let g01 = sums.a12 + s * t * sums.a44 + s * sums.a24 + t * sums.a14;
        let g02 = sums.a13 + s * u * sums.a44 + s * sums.a34 + u * sums.a14;
        let g12 = sums.a23 + t * u * sums.a44 + u * sums.a24 + t * sums.a34;

        #[rustfmt::skip]
        let gradient = Matrix3::new(
            g00, g01, g02,
            g01, g11, g12,
            g02, g12, g22,
        );

        (Self::acceleration_from(&sums, s, t, u), gradient)
    }

    fn acceleration_from(sums: &PinesSums, s: f64, t: f64, u: f64) -> Vector3<f64> {
        Vector3::new(
            sums.a1 + sums.a4 * s,
            sums.a2 + sums.a4 * t,
            sums.a3 + sums.a4 * u,
        )
    }
}

impl GravityCalculator for Pines {
    fn core(&self) -> &CalculatorCore {
        &self.core
    }

    fn name(&self) -> &'static str {
        "Pines"
    }

    fn set_degree_order(&mut self, degree: usize, order: usize) {
        self.core.set_degree_order(degree, order);
        self.prepare();
    }

    fn calc_pert_acceleration(&mut self, position: &Vector3<f64>) -> Vector3<f64> {
        let (sums, r) = self.evaluate(position, false);
        Self::acceleration_from(&sums, position.x / r, position.y / r, position.z / r)
    }
}
