//! # Spherical-harmonic gravity calculators
//!
//! This module defines the [`GravityCalculator`](crate::calculator::GravityCalculator) contract
//! and the three interchangeable algorithms that implement it. All of them evaluate the same
//! truncated series and agree to near machine precision; they differ in numerical robustness
//! and speed.
//!
//! ## Algorithms
//!
//! | Calculator | Formulation | Poles | High degree |
//! |------------|-------------|-------|-------------|
//! | [`HolmesFeatherstone`](crate::calculator::holmes_featherstone::HolmesFeatherstone) | scaled Legendre columns, Horner in sin θ, spherical → Cartesian Jacobian | singular on the axis | stable (2⁻⁹³⁰ scaling) |
//! | [`Pines`](crate::calculator::pines::Pines) | direction cosines, complex longitude powers, Cartesian sums | safe | stable |
//! | [`ReferenceCalculator`](crate::calculator::reference::ReferenceCalculator) | textbook recursion in geocentric latitude/longitude | singular on the axis | limited |
//!
//! ## Contract
//!
//! * [`calc_pert_acceleration`](crate::calculator::GravityCalculator::calc_pert_acceleration) –
//!   non-central part of the acceleration, degrees `2 ≤ n ≤ degree`.
//! * [`calc_total_acceleration`](crate::calculator::GravityCalculator::calc_total_acceleration) –
//!   the non-central part minus the point-mass term `GM·p/|p|³`.
//!
//! Positions are Cartesian, in meters, in the body-fixed frame of the field; accelerations are
//! returned in m/s² in the same frame.
//!
//! ## Threading
//!
//! The coefficient table is held through an [`Arc`] and never mutated, so any number of
//! calculators may share it across threads. Each calculator owns private scratch buffers that
//! every call overwrites, hence the `&mut self` receivers: use one calculator per thread.
//!
//! ## Failure model
//!
//! Evaluation never fails and never panics on numeric input. Requested degree/order are clamped
//! to the table bounds, a degenerate table (GM = 0 or degree 0) yields a zero non-central
//! acceleration, and singular inputs produce NaN rather than an error.

pub mod grid;
pub mod holmes_featherstone;
pub mod pines;
pub mod reference;

use std::sync::Arc;

use nalgebra::Vector3;

use crate::constants::{Meter, MeterPerSecond2, Mu};
use crate::gravity_field::GravityField;
use holmes_featherstone::HolmesFeatherstone;
use pines::Pines;
use reference::ReferenceCalculator;

/// Point-mass gravity `-GM·p/|p|³`.
#[inline]
pub fn point_mass_acceleration(gm: Mu, position: &Vector3<Meter>) -> Vector3<MeterPerSecond2> {
    let factor = gm / (position.norm_squared() * position.norm());
    position * (-factor)
}

/// State shared by every calculator: the coefficient table handle and the truncation.
#[derive(Debug, Clone)]
pub struct CalculatorCore {
    field: Arc<GravityField>,
    degree: usize,
    order: usize,
}

impl CalculatorCore {
    /// Bind a table and a requested truncation.
    ///
    /// An un-normalized table is replaced, for this calculator only, by a normalized copy.
    /// The requested degree is clamped to the table's maximum degree and the order to both the
    /// table's maximum order and the retained degree.
    pub fn new(field: Arc<GravityField>, degree: usize, order: usize) -> Self {
        let field = if field.is_normalized() {
            field
        } else {
            log::debug!(
                "normalizing gravity field '{}' (degree {}) for evaluation",
                field.get_model_name(),
                field.get_max_degree()
            );
            Arc::new(field.normalized())
        };

        if field.get_gm() == 0.0 || field.get_max_degree() == 0 {
            log::warn!(
                "gravity field '{}' is degenerate (GM = {}, max degree = {}): non-central acceleration will be zero",
                field.get_model_name(),
                field.get_gm(),
                field.get_max_degree()
            );
        }

        let mut core = CalculatorCore {
            field,
            degree: 0,
            order: 0,
        };
        core.set_degree_order(degree, order);
        core
    }

    /// Bind a table using its full degree and order.
    pub fn from_field(field: Arc<GravityField>) -> Self {
        let (degree, order) = (field.get_max_degree(), field.get_max_order());
        Self::new(field, degree, order)
    }

    /// Clamp and store a new truncation. Calculators must re-run their preparation afterwards.
    pub fn set_degree_order(&mut self, degree: usize, order: usize) {
        let degree_clamped = degree.min(self.field.get_max_degree());
        let order_clamped = order.min(self.field.get_max_order()).min(degree_clamped);
        if degree_clamped != degree || order_clamped != order {
            log::debug!(
                "requested truncation ({degree}, {order}) clamped to ({degree_clamped}, {order_clamped})"
            );
        }
        self.degree = degree_clamped;
        self.order = order_clamped;
    }

    pub fn gravity_field(&self) -> &GravityField {
        &self.field
    }

    /// Shared handle on the (normalized) table used by this calculator.
    pub fn field_handle(&self) -> &Arc<GravityField> {
        &self.field
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn order(&self) -> usize {
        self.order
    }
}

/// Common contract of the spherical-harmonic gravity calculators.
pub trait GravityCalculator {
    /// Table handle and truncation of this calculator.
    fn core(&self) -> &CalculatorCore;

    /// Short human-readable name of the algorithm.
    fn name(&self) -> &'static str;

    /// Change the truncation and recompute every degree/order dependent table.
    fn set_degree_order(&mut self, degree: usize, order: usize);

    /// Non-central (perturbing) acceleration at `position`, body-fixed frame, m/s².
    ///
    /// The series runs over degrees `2..=degree`. Degree-1 coefficients only describe an offset
    /// of the frame origin from the center of mass and are ignored by every calculator.
    fn calc_pert_acceleration(&mut self, position: &Vector3<Meter>) -> Vector3<MeterPerSecond2>;

    /// Full gravitational acceleration: the non-central part minus `GM·p/|p|³`.
    fn calc_total_acceleration(&mut self, position: &Vector3<Meter>) -> Vector3<MeterPerSecond2> {
        let pert = self.calc_pert_acceleration(position);
        let factor = self.gravity_field().get_gm() / (position.norm_squared() * position.norm());
        pert - position * factor
    }

    fn gravity_field(&self) -> &GravityField {
        self.core().gravity_field()
    }

    fn degree(&self) -> usize {
        self.core().degree()
    }

    fn order(&self) -> usize {
        self.core().order()
    }
}

/// Any of the three calculators, selectable at runtime.
#[derive(Debug, Clone)]
pub enum AnyCalculator {
    HolmesFeatherstone(HolmesFeatherstone),
    Pines(Pines),
    Reference(ReferenceCalculator),
}

impl AnyCalculator {
    fn inner(&self) -> &dyn GravityCalculator {
        match self {
            AnyCalculator::HolmesFeatherstone(c) => c,
            AnyCalculator::Pines(c) => c,
            AnyCalculator::Reference(c) => c,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn GravityCalculator {
        match self {
            AnyCalculator::HolmesFeatherstone(c) => c,
            AnyCalculator::Pines(c) => c,
            AnyCalculator::Reference(c) => c,
        }
    }
}

impl GravityCalculator for AnyCalculator {
    fn core(&self) -> &CalculatorCore {
        self.inner().core()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn set_degree_order(&mut self, degree: usize, order: usize) {
        self.inner_mut().set_degree_order(degree, order)
    }

    fn calc_pert_acceleration(&mut self, position: &Vector3<f64>) -> Vector3<f64> {
        self.inner_mut().calc_pert_acceleration(position)
    }
}

impl From<HolmesFeatherstone> for AnyCalculator {
    fn from(c: HolmesFeatherstone) -> Self {
        AnyCalculator::HolmesFeatherstone(c)
    }
}

impl From<Pines> for AnyCalculator {
    fn from(c: Pines) -> Self {
        AnyCalculator::Pines(c)
    }
}

impl From<ReferenceCalculator> for AnyCalculator {
    fn from(c: ReferenceCalculator) -> Self {
        AnyCalculator::Reference(c)
    }
}
