//! # cadence
//!
//! Per-pointing observation cadences for a simulated wide-field survey.
//!
//! Given a survey footprint expressed as HEALPix pixels and an exposure log of the survey
//! scheduler, the crate
//!
//! * generates pointing centers over the footprint ([`pointings`], [`healpix`]),
//! * matches each pointing against the exposures whose center falls within the field of view
//!   ([`matcher`]),
//! * persists, per pointing, the matched exposures, their normalized epochs and a band mask
//!   ([`cadence_store`]),
//! * reads these artifacts back with optional band projection ([`reader`]).
//!
//! [`survey::SurveyCadence`] bundles the whole pipeline behind one configuration
//! ([`params::CadenceParams`]).
pub mod bands;
pub mod cadence_errors;
pub mod cadence_store;
pub mod constants;
pub mod conversion;
pub mod exposure_log;
pub mod footprint;
pub mod healpix;
pub mod matcher;
pub mod params;
pub mod pointings;
pub mod reader;
pub mod survey;

#[cfg(feature = "progress")]
pub(crate) mod progress_bar;
