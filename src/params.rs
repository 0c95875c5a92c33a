//! # Gravity evaluation parameters
//!
//! This module defines [`GravityParams`](crate::params::GravityParams) and its builder, which
//! select the calculator algorithm and the truncation of the series, and turn a shared
//! [`GravityField`](crate::gravity_field::GravityField) into a ready-to-use
//! [`AnyCalculator`](crate::calculator::AnyCalculator).
//!
//! The parameters are plain data and derive `serde`, so they can be embedded in a larger
//! configuration file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nalgebra::Vector3;
//! use geopotential::calculator::GravityCalculator;
//! use geopotential::gravity_field::GravityField;
//! use geopotential::params::{GravityAlgorithm, GravityParams};
//!
//! let params = GravityParams::builder()
//!     .algorithm(GravityAlgorithm::HolmesFeatherstone)
//!     .degree(2)
//!     .order(0)
//!     .build()
//!     .unwrap();
//!
//! let mut calc = params.build_calculator(Arc::new(GravityField::wgs84_j2()));
//! let acc = calc.calc_total_acceleration(&Vector3::new(7000e3, 0.0, 0.0));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calculator::holmes_featherstone::HolmesFeatherstone;
use crate::calculator::pines::Pines;
use crate::calculator::reference::ReferenceCalculator;
use crate::calculator::AnyCalculator;
use crate::gravity_errors::GravityError;
use crate::gravity_field::GravityField;

/// Algorithm used to evaluate the spherical-harmonic series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GravityAlgorithm {
    HolmesFeatherstone,
    /// Singularity-free at the poles; the general purpose choice.
    #[default]
    Pines,
    /// Slow latitude/longitude formulation, for cross-checks.
    Reference,
}

impl fmt::Display for GravityAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GravityAlgorithm::HolmesFeatherstone => "Holmes-Featherstone",
            GravityAlgorithm::Pines => "Pines",
            GravityAlgorithm::Reference => "Reference",
        };
        f.write_str(name)
    }
}

/// Calculator selection and truncation.
///
/// Fields
/// -----------------
/// * `algorithm` – evaluation algorithm, see [`GravityAlgorithm`].
/// * `degree` – maximum degree retained; `None` uses the table's maximum degree.
/// * `order` – maximum order retained; `None` uses the table's maximum order.
///
/// Values larger than the table bounds are clamped when the calculator is built, and the order
/// is never allowed above the retained degree.
///
/// Defaults
/// -----------------
/// Pines algorithm, full table.
///
/// See also
/// -----------------
/// * [`GravityParams::build_calculator`] – turns the parameters into a calculator.
/// * [`crate::calculator::GravityCalculator`] – the evaluation contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GravityParams {
    #[serde(default)]
    pub algorithm: GravityAlgorithm,
    #[serde(default)]
    pub degree: Option<usize>,
    #[serde(default)]
    pub order: Option<usize>,
}

impl GravityParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`GravityParamsBuilder`] starting from the defaults.
    pub fn builder() -> GravityParamsBuilder {
        GravityParamsBuilder::new()
    }

    /// Build the selected calculator on a shared coefficient table.
    ///
    /// Arguments
    /// -----------------
    /// * `field` – coefficient table; un-normalized tables are normalized into a private copy.
    ///
    /// Return
    /// ----------
    /// * An [`AnyCalculator`] truncated at `(degree, order)` after clamping to the table.
    pub fn build_calculator(&self, field: Arc<GravityField>) -> AnyCalculator {
        let degree = self.degree.unwrap_or_else(|| field.get_max_degree());
        let order = self.order.unwrap_or_else(|| field.get_max_order());

        log::debug!(
            "building {} calculator for '{}' at degree {degree}, order {order}",
            self.algorithm,
            field.get_model_name()
        );

        match self.algorithm {
            GravityAlgorithm::HolmesFeatherstone => {
                HolmesFeatherstone::new(field, degree, order).into()
            }
            GravityAlgorithm::Pines => Pines::new(field, degree, order).into(),
            GravityAlgorithm::Reference => ReferenceCalculator::new(field, degree, order).into(),
        }
    }
}

/// Builder for [`GravityParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct GravityParamsBuilder {
    params: GravityParams,
}

impl GravityParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: GravityParams::default(),
        }
    }

    pub fn algorithm(mut self, v: GravityAlgorithm) -> Self {
        self.params.algorithm = v;
        self
    }
    pub fn degree(mut self, v: usize) -> Self {
        self.params.degree = Some(v);
        self
    }
    pub fn order(mut self, v: usize) -> Self {
        self.params.order = Some(v);
        self
    }

    /// Validate and return the parameters.
    ///
    /// Errors
    /// -----------------
    /// * [`GravityError::InvalidParams`] if both degree and order are given and `order > degree`.
    pub fn build(self) -> Result<GravityParams, GravityError> {
        let p = self.params;
        if let (Some(degree), Some(order)) = (p.degree, p.order) {
            if order > degree {
                return Err(GravityError::InvalidParams(format!(
                    "order ({order}) must not exceed degree ({degree})"
                )));
            }
        }
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::GravityCalculator;

    #[test]
    fn test_builder_defaults() {
        let p = GravityParams::builder().build().unwrap();
        assert_eq!(p, GravityParams::default());
        assert_eq!(p.algorithm, GravityAlgorithm::Pines);
        assert_eq!(p.degree, None);
    }

    #[test]
    fn test_builder_rejects_order_above_degree() {
        let err = GravityParams::builder()
            .degree(4)
            .order(5)
            .build()
            .unwrap_err();
        assert!(matches!(err, GravityError::InvalidParams(_)));

        // order alone is checked against the table later
        assert!(GravityParams::builder().order(5).build().is_ok());
    }

    #[test]
    fn test_build_calculator_selects_algorithm() {
        let field = Arc::new(GravityField::wgs84_j2());
        for (algorithm, name) in [
            (GravityAlgorithm::HolmesFeatherstone, "Holmes-Featherstone"),
            (GravityAlgorithm::Pines, "Pines"),
            (GravityAlgorithm::Reference, "Reference"),
        ] {
            let calc = GravityParams::builder()
                .algorithm(algorithm)
                .degree(2)
                .order(0)
                .build()
                .unwrap()
                .build_calculator(field.clone());
            assert_eq!(calc.name(), name);
            assert_eq!(algorithm.to_string(), name);
            assert_eq!((calc.degree(), calc.order()), (2, 0));
        }

        let calc = GravityParams::default().build_calculator(field);
        assert!(matches!(calc, AnyCalculator::Pines(_)));
        assert_eq!((calc.degree(), calc.order()), (2, 2));
    }

    #[test]
    fn test_serde_json() {
        let p: GravityParams =
            serde_json::from_str(r#"{ "algorithm": "HolmesFeatherstone", "degree": 70 }"#).unwrap();
        assert_eq!(p.algorithm, GravityAlgorithm::HolmesFeatherstone);
        assert_eq!(p.degree, Some(70));
        assert_eq!(p.order, None);

        let p: GravityParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p, GravityParams::default());

        let json = serde_json::to_string(&GravityAlgorithm::Reference).unwrap();
        assert_eq!(json, r#""Reference""#);
    }
}
