//! # Gravity field coefficient table
//!
//! This module defines [`GravityField`](crate::gravity_field::GravityField), the immutable,
//! shareable store of spherical-harmonic coefficients consumed by every gravity calculator,
//! together with its scalar header [`GravityFieldHead`](crate::gravity_field::GravityFieldHead).
//!
//! ## Data model
//!
//! - A triangular mapping `(n, m) → (Cnm, Snm)` for `0 ≤ m ≤ n ≤ N_max`, stored in a
//!   [`LowerMatrix`](crate::gravity_field::lower_matrix::LowerMatrix).
//! - Scale constants: GM (m³/s²) and the reference distance of the expansion (m).
//! - Truncation bounds: maximum degree `N_max` and maximum order `M_max ≤ N_max`.
//! - A `normalized` flag telling whether the stored values are fully normalized.
//!
//! ## Normalization convention
//!
//! Fully-normalized coefficients relate to the conventional ones through
//!
//! ```text
//! C̄nm = Cnm · sqrt( (n+m)! / ((n-m)! · (2 - δ0m) · (2n+1)) )
//! ```
//!
//! and likewise for `S̄nm`. See [`normalization_factor`](crate::gravity_field::normalization_factor).
//!
//! ## Lifecycle
//!
//! Parsing coefficient files is outside the scope of this crate. Tables are assembled through
//! [`GravityField::builder`](crate::gravity_field::GravityField::builder) (or any external
//! loader using it), then wrapped in an [`Arc`](std::sync::Arc) and shared read-only by all
//! calculators, possibly across threads.
//!
//! ## Example
//!
//! ```rust
//! use geopotential::gravity_field::GravityField;
//!
//! let field = GravityField::builder()
//!     .model("toy")
//!     .central_body("Earth")
//!     .gm(3.986004418e14)
//!     .ref_distance(6_378_137.0)
//!     .max_degree(2)
//!     .coefficient(0, 0, 1.0, 0.0)
//!     .coefficient(2, 0, -4.8416685e-4, 0.0)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(field.get_max_order(), 2);
//! assert_eq!(field.get_cnm(2, 0), -4.8416685e-4);
//! assert_eq!(field.get_cnm(5, 0), 0.0);
//! ```

pub mod lower_matrix;

use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Meter, Mu, Order, WGS84_C20, WGS84_GM, WGS84_REF_DISTANCE};
use crate::gravity_errors::GravityError;
use lower_matrix::LowerMatrix;

/// Scalar description of a gravity field model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravityFieldHead {
    /// Model name (e.g. `"WGS84"`, `"JGM3"`)
    pub model: String,
    /// Name of the central body the model describes
    pub central_body: String,
    /// Highest degree stored in the table
    pub max_degree: Degree,
    /// Highest order stored in the table (≤ `max_degree`)
    pub max_order: Order,
    /// Gravitational parameter in m³/s²
    pub gm: Mu,
    /// Reference distance of the expansion in meters
    pub ref_distance: Meter,
    /// Whether the stored coefficients are fully normalized
    pub normalized: bool,
    /// Whether C20 includes the permanent tide
    pub includes_perm_tide: bool,
}

impl Default for GravityFieldHead {
    fn default() -> Self {
        GravityFieldHead {
            model: String::new(),
            central_body: String::new(),
            max_degree: 0,
            max_order: 0,
            gm: 0.0,
            ref_distance: 0.0,
            normalized: true,
            includes_perm_tide: false,
        }
    }
}

/// Conversion factor from conventional to fully-normalized coefficients for term `(n, m)`.
///
/// ```text
/// N(n, m) = sqrt( (n+m)! / (n-m)! / ((2 - δ0m) · (2n+1)) )
/// ```
///
/// The square root is taken factor by factor, so the result stays finite as long as it is
/// representable; it exceeds the double range only for `n + m` around 300, where conventional
/// coefficients underflow anyway and models ship normalized. Returns `0.0` for `m > n`.
pub fn normalization_factor(n: usize, m: usize) -> f64 {
    if m > n {
        return 0.0;
    }
    let k = if m == 0 { 1.0 } else { 2.0 };
    (n - m + 1..=n + m).fold((k * (2 * n + 1) as f64).sqrt().recip(), |acc, i| {
        acc * (i as f64).sqrt()
    })
}

/// Triangular table of spherical-harmonic coefficients with its header.
///
/// Reads outside the stored triangle (`m > n`, `n > N_max`) return `0.0`, which is the value a
/// truncated expansion assigns to missing terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravityField {
    head: GravityFieldHead,
    cnm: LowerMatrix,
    snm: LowerMatrix,
}

impl Default for GravityField {
    /// The empty table left behind by a failed load: degree 0, GM 0.
    fn default() -> Self {
        GravityField {
            head: GravityFieldHead::default(),
            cnm: LowerMatrix::zeros(1),
            snm: LowerMatrix::zeros(1),
        }
    }
}

impl GravityField {
    /// Start assembling a table with [`GravityFieldBuilder`].
    pub fn builder() -> GravityFieldBuilder {
        GravityFieldBuilder::new()
    }

    /// Degree-2 WGS84 table holding only C00 = 1 and the normalized C20.
    ///
    /// This is the J2-only truncation of the WGS84 model; it is mainly useful for tests,
    /// demos and benchmarks.
    pub fn wgs84_j2() -> Self {
        let mut field = GravityField::with_head(GravityFieldHead {
            model: "WGS84".into(),
            central_body: "Earth".into(),
            max_degree: 2,
            max_order: 2,
            gm: WGS84_GM,
            ref_distance: WGS84_REF_DISTANCE,
            normalized: true,
            includes_perm_tide: false,
        });
        field.cnm[(0, 0)] = 1.0;
        field.cnm[(2, 0)] = WGS84_C20;
        field
    }

    fn with_head(head: GravityFieldHead) -> Self {
        let dim = head.max_degree + 1;
        GravityField {
            head,
            cnm: LowerMatrix::zeros(dim),
            snm: LowerMatrix::zeros(dim),
        }
    }

    pub fn head(&self) -> &GravityFieldHead {
        &self.head
    }

    pub fn get_model_name(&self) -> &str {
        &self.head.model
    }

    pub fn get_central_body_name(&self) -> &str {
        &self.head.central_body
    }

    pub fn get_max_degree(&self) -> Degree {
        self.head.max_degree
    }

    pub fn get_max_order(&self) -> Order {
        self.head.max_order
    }

    pub fn get_gm(&self) -> Mu {
        self.head.gm
    }

    pub fn get_ref_distance(&self) -> Meter {
        self.head.ref_distance
    }

    pub fn is_normalized(&self) -> bool {
        self.head.normalized
    }

    pub fn is_includes_perm_tide(&self) -> bool {
        self.head.includes_perm_tide
    }

    /// `true` when `(n, m)` lies inside the stored triangle and the order bound.
    pub fn is_valid_degree_order(&self, n: usize, m: usize) -> bool {
        n <= self.head.max_degree && m <= n && m <= self.head.max_order
    }

    /// Cnm in the stored convention, `0.0` outside the table.
    #[inline]
    pub fn get_cnm(&self, n: usize, m: usize) -> f64 {
        self.cnm.get(n, m).unwrap_or(0.0)
    }

    /// Snm in the stored convention, `0.0` outside the table.
    #[inline]
    pub fn get_snm(&self, n: usize, m: usize) -> f64 {
        self.snm.get(n, m).unwrap_or(0.0)
    }

    pub fn get_cnm_normalized(&self, n: usize, m: usize) -> f64 {
        self.to_normalized(n, m, self.get_cnm(n, m))
    }

    pub fn get_snm_normalized(&self, n: usize, m: usize) -> f64 {
        self.to_normalized(n, m, self.get_snm(n, m))
    }

    pub fn get_cnm_unnormalized(&self, n: usize, m: usize) -> f64 {
        self.to_unnormalized(n, m, self.get_cnm(n, m))
    }

    pub fn get_snm_unnormalized(&self, n: usize, m: usize) -> f64 {
        self.to_unnormalized(n, m, self.get_snm(n, m))
    }

    fn to_normalized(&self, n: usize, m: usize, value: f64) -> f64 {
        if self.head.normalized || m > n || value == 0.0 {
            value
        } else {
            value * normalization_factor(n, m)
        }
    }

    fn to_unnormalized(&self, n: usize, m: usize, value: f64) -> f64 {
        if !self.head.normalized || m > n || value == 0.0 {
            value
        } else {
            value / normalization_factor(n, m)
        }
    }

    /// Overwrite the pair `(Cnm, Snm)` in the stored convention.
    ///
    /// Return
    /// ----------
    /// * [`GravityError::InvalidDegreeOrder`] if `(n, m)` is outside the table bounds.
    ///   `Snm(n, 0)` is always stored as zero.
    pub fn set_coefficient(
        &mut self,
        n: usize,
        m: usize,
        cnm: f64,
        snm: f64,
    ) -> Result<(), GravityError> {
        if !self.is_valid_degree_order(n, m) {
            return Err(GravityError::InvalidDegreeOrder {
                degree: n,
                order: m,
                max_degree: self.head.max_degree,
                max_order: self.head.max_order,
            });
        }
        self.cnm[(n, m)] = cnm;
        self.snm[(n, m)] = if m == 0 { 0.0 } else { snm };
        Ok(())
    }

    /// Convert the stored coefficients to the fully-normalized convention, in place.
    ///
    /// Does nothing when the table is already normalized.
    pub fn normalize(&mut self) {
        if self.head.normalized {
            return;
        }
        self.head.normalized = true;
        self.rescale(|c, factor| c * factor);
    }

    /// Convert the stored coefficients back to the conventional (un-normalized) form, in place.
    ///
    /// Does nothing when the table is already un-normalized.
    pub fn unnormalize(&mut self) {
        if !self.head.normalized {
            return;
        }
        self.head.normalized = false;
        self.rescale(|c, factor| c / factor);
    }

    /// Normalized copy of this table.
    pub fn normalized(&self) -> GravityField {
        let mut gf = self.clone();
        gf.normalize();
        gf
    }

    /// Un-normalized copy of this table.
    pub fn unnormalized(&self) -> GravityField {
        let mut gf = self.clone();
        gf.unnormalize();
        gf
    }

    /// Apply `op(value, N(n, m))` to every non-zero coefficient; missing terms stay zero.
    fn rescale(&mut self, op: impl Fn(f64, f64) -> f64) {
        for n in 0..=self.head.max_degree {
            for m in 0..=n {
                let factor = normalization_factor(n, m);
                for table in [&mut self.cnm, &mut self.snm] {
                    if table[(n, m)] != 0.0 {
                        table[(n, m)] = op(table[(n, m)], factor);
                    }
                }
            }
        }
    }
}

/// Builder for [`GravityField`], with validation.
#[derive(Debug, Clone, Default)]
pub struct GravityFieldBuilder {
    head: GravityFieldHead,
    max_order: Option<usize>,
    coefficients: Vec<(usize, usize, f64, f64)>,
}

impl GravityFieldBuilder {
    /// Create a new builder for an empty, normalized table.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, v: &str) -> Self {
        self.head.model = v.to_string();
        self
    }
    pub fn central_body(mut self, v: &str) -> Self {
        self.head.central_body = v.to_string();
        self
    }
    pub fn gm(mut self, v: f64) -> Self {
        self.head.gm = v;
        self
    }
    pub fn ref_distance(mut self, v: f64) -> Self {
        self.head.ref_distance = v;
        self
    }
    pub fn max_degree(mut self, v: usize) -> Self {
        self.head.max_degree = v;
        self
    }
    /// Defaults to the maximum degree when not set.
    pub fn max_order(mut self, v: usize) -> Self {
        self.max_order = Some(v);
        self
    }
    pub fn normalized(mut self, v: bool) -> Self {
        self.head.normalized = v;
        self
    }
    pub fn includes_perm_tide(mut self, v: bool) -> Self {
        self.head.includes_perm_tide = v;
        self
    }

    /// Queue one `(n, m, Cnm, Snm)` row. Later rows overwrite earlier ones.
    pub fn coefficient(mut self, n: usize, m: usize, cnm: f64, snm: f64) -> Self {
        self.coefficients.push((n, m, cnm, snm));
        self
    }

    /// Queue many `(n, m, Cnm, Snm)` rows.
    pub fn coefficients<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, f64, f64)>,
    {
        self.coefficients.extend(rows);
        self
    }

    /// Finalize the builder and produce a [`GravityField`].
    ///
    /// Validation rules
    /// -----------------
    /// * `max_order ≤ max_degree`.
    /// * `gm` and `ref_distance` are finite.
    /// * Every queued row satisfies `m ≤ n ≤ max_degree` and `m ≤ max_order`.
    ///
    /// A zero GM or a degree-0 table is accepted: calculators built on it return zero
    /// non-central acceleration.
    pub fn build(self) -> Result<GravityField, GravityError> {
        let mut head = self.head;
        head.max_order = self.max_order.unwrap_or(head.max_degree);

        if head.max_order > head.max_degree {
            return Err(GravityError::InvalidMaxDegreeOrder {
                max_degree: head.max_degree,
                max_order: head.max_order,
            });
        }
        if !head.gm.is_finite() {
            return Err(GravityError::NonFiniteConstant(format!("GM = {}", head.gm)));
        }
        if !head.ref_distance.is_finite() {
            return Err(GravityError::NonFiniteConstant(format!(
                "reference distance = {}",
                head.ref_distance
            )));
        }

        let mut field = GravityField::with_head(head);
        for (n, m, cnm, snm) in self.coefficients {
            field.set_coefficient(n, m, cnm, snm)?;
        }
        Ok(field)
    }
}
