//! # Constants and type definitions for Cadence
//!
//! This module centralizes the **reference constants**, **conversion factors**, and **common type
//! aliases** used throughout the `cadence` library.
//!
//! ## Overview
//!
//! - Survey reference values (mission start epoch, base pixelization resolution, field of view)
//! - Unit conversions (degrees ↔ radians)
//! - Core type aliases used across the crate
//!
//! These definitions are used by all main modules: pointing generation, exposure matching,
//! and the artifact store.

// -------------------------------------------------------------------------------------------------
// Survey reference values
// -------------------------------------------------------------------------------------------------

/// MJD of the first exposure of the reference survey simulation.
///
/// Epoch arrays written by the matcher are expressed relative to this value.
pub const MIN_MJD: MJD = 59580.139555;

/// Base HEALPix resolution of the survey footprint list (ring indexing).
pub const NSIDE_IN: u32 = 32;

/// Field-of-view radius of a pointing, in degrees.
pub const FOV_RADIUS: Degree = 1.75;

/// Default seed, reserved for stochastic pointing sampling.
pub const DEFAULT_SEED: u64 = 1234;

/// Number of photometric bands (`u, g, r, i, z, y`).
pub const N_BANDS: usize = 6;

/// Largest supported HEALPix order (`nside = 2^29`).
pub const MAX_ORDER: u32 = 29;

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Radians → degrees
pub const DEGRAD: f64 = 180.0 / std::f64::consts::PI;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// HEALPix pixel identifier
pub type PixelId = u64;
