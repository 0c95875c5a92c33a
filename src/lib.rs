//! # geopotential
//!
//! Gravitational acceleration of a non-spherical body from a spherical-harmonic expansion of
//! its potential.
//!
//! ## Overview
//!
//! * [`gravity_field`] holds the coefficient table (`C̄nm`, `S̄nm`, `GM`, reference radius)
//!   with its header and normalization conventions.
//! * [`calculator`] defines the [`GravityCalculator`](crate::calculator::GravityCalculator)
//!   contract and three interchangeable algorithms: Holmes–Featherstone, Pines, and a
//!   straightforward reference formulation.
//! * [`params`] selects an algorithm and a truncation and builds the calculator.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nalgebra::Vector3;
//! use geopotential::calculator::GravityCalculator;
//! use geopotential::calculator::pines::Pines;
//! use geopotential::gravity_field::GravityField;
//!
//! let field = Arc::new(GravityField::wgs84_j2());
//! let mut pines = Pines::from_field(field);
//!
//! let position = Vector3::new(7000e3, 100e3, 1200e3);
//! let total = pines.calc_total_acceleration(&position);
//! let pert = pines.calc_pert_acceleration(&position);
//! ```

pub mod calculator;
pub mod constants;
pub mod gravity_errors;
pub mod gravity_field;
pub mod params;
