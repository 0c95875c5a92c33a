//! # Constants and type definitions for geopotential
//!
//! This module centralizes the **physical constants**, **numerical scaling factors**, and
//! **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Reference constants of the WGS84 Earth gravity model
//! - Power-of-two scaling used by the Holmes–Featherstone recursion
//! - Type aliases documenting the units carried by plain `f64` values
//!
//! These definitions are shared by the coefficient table, every gravity calculator,
//! the tests and the benchmarks.

// -------------------------------------------------------------------------------------------------
// Physical constants
// -------------------------------------------------------------------------------------------------

/// Earth gravitational parameter GM in m³/s² (WGS84)
pub const WGS84_GM: f64 = 3.986004418e14;

/// Earth equatorial radius in meters (WGS84), used as reference distance of the harmonic expansion
pub const WGS84_REF_DISTANCE: f64 = 6_378_137.0;

/// Fully-normalized C(2,0) coefficient of the WGS84 gravity model
pub const WGS84_C20: f64 = -4.841668500000e-04;

// -------------------------------------------------------------------------------------------------
// Numerical scaling
// -------------------------------------------------------------------------------------------------

/// Binary exponent used to descale the sectorial seeds of the Holmes–Featherstone recursion.
///
/// Seeds are multiplied by 2⁻⁹³⁰ and the accumulated sums by 2⁺⁹³⁰ at the end, which keeps
/// the Legendre columns inside the double-precision range up to degrees of several thousands.
/// A power of two is used so that the scaling itself is exact.
pub const HF_SCALING: i32 = 930;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Distance in meters
pub type Meter = f64;
/// Gravitational parameter in m³/s²
pub type Mu = f64;
/// Acceleration in m/s²
pub type MeterPerSecond2 = f64;
/// Spherical-harmonic degree (n)
pub type Degree = usize;
/// Spherical-harmonic order (m)
pub type Order = usize;
