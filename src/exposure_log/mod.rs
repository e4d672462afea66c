//! # Exposure log
//!
//! In-memory representation of the historical survey exposure log ("OpSim" summary table) and
//! the readers that load it.
//!
//! ## Overview
//! -----------------
//! - [`RawExposure`] mirrors one row of the persisted table, angles in **radians** as stored.
//! - [`ExposureRecord`] is a loaded row, with the pointing center also available in **degrees**.
//! - [`ExposureLog`] holds every record in source order together with the precomputed
//!   equatorial unit vector of each exposure, so that angular separations to a pointing can be
//!   evaluated in a single pass.
//! - [`ExposureLogSource`] abstracts where a log comes from; two implementations ship with the
//!   crate:
//!   - [`OpsimDatabase`](crate::exposure_log::sqlite_reader::OpsimDatabase) – SQLite file with a
//!     `Summary` table,
//!   - [`CsvExposureLog`](crate::exposure_log::csv_reader::CsvExposureLog) – CSV dump with the
//!     same column names.
//!
//! ## Column projection
//! -----------------
//! Every reader projects the same ten columns ([`EXPOSURE_COLUMNS`]):
//! `expMJD`, `visitExpTime`, `obsHistID`, `descDitheredRA`, `descDitheredDec`,
//! `fiveSigmaDepth`, `filtSkyBrightness`, `filter`, `FWHMgeom`, `FWHMeff`.
//!
//! The `filter` label is kept as raw text. It is mapped onto the band alphabet only when a
//! pointing's mask is built, so that a corrupt label fails that pointing alone instead of the
//! whole load.
//!
//! ## Usage
//! -----------------
//! A log is meant to be loaded **once** and shared read-only by the matching stage:
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use cadence::exposure_log::{ExposureLogSource, sqlite_reader::OpsimDatabase};
//!
//! let source = OpsimDatabase::new(Utf8Path::new("minion_1016_desc_dithered_v4_trimmed.db"));
//! let log = source.load().unwrap();
//! println!("{} exposures, first at MJD {:?}", log.len(), log.min_mjd());
//! ```
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    cadence_errors::CadenceError,
    constants::{Degree, Radian, MJD},
    conversion::{rad_to_deg, radec_to_unit_vector, separation_from_unit_vectors},
};

pub mod csv_reader;
pub mod sqlite_reader;

/// Columns projected from the exposure table, in storage order.
pub const EXPOSURE_COLUMNS: [&str; 10] = [
    "expMJD",
    "visitExpTime",
    "obsHistID",
    "descDitheredRA",
    "descDitheredDec",
    "fiveSigmaDepth",
    "filtSkyBrightness",
    "filter",
    "FWHMgeom",
    "FWHMeff",
];

/// One exposure-log row, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExposure {
    #[serde(rename = "expMJD")]
    pub exp_mjd: MJD,
    #[serde(rename = "visitExpTime")]
    pub visit_exp_time: f64,
    #[serde(rename = "obsHistID")]
    pub obs_hist_id: i64,
    #[serde(rename = "descDitheredRA")]
    pub dithered_ra: Radian,
    #[serde(rename = "descDitheredDec")]
    pub dithered_dec: Radian,
    #[serde(rename = "fiveSigmaDepth")]
    pub five_sigma_depth: f64,
    #[serde(rename = "filtSkyBrightness")]
    pub filt_sky_brightness: f64,
    pub filter: String,
    #[serde(rename = "FWHMgeom")]
    pub fwhm_geom: f64,
    #[serde(rename = "FWHMeff")]
    pub fwhm_eff: f64,
}

/// A loaded exposure: the stored row plus its center in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureRecord {
    pub raw: RawExposure,
    pub ra: Degree,
    pub dec: Degree,
}

impl From<RawExposure> for ExposureRecord {
    fn from(raw: RawExposure) -> Self {
        ExposureRecord {
            ra: rad_to_deg(raw.dithered_ra),
            dec: rad_to_deg(raw.dithered_dec),
            raw,
        }
    }
}

/// An exposure retained for a pointing, as written to `obs_{i}.csv`.
///
/// Columns are the stored ones followed by `ra`, `dec` (degrees) and `dist`, the angular
/// separation to the pointing center in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedExposure {
    #[serde(rename = "expMJD")]
    pub exp_mjd: MJD,
    #[serde(rename = "visitExpTime")]
    pub visit_exp_time: f64,
    #[serde(rename = "obsHistID")]
    pub obs_hist_id: i64,
    #[serde(rename = "descDitheredRA")]
    pub dithered_ra: Radian,
    #[serde(rename = "descDitheredDec")]
    pub dithered_dec: Radian,
    #[serde(rename = "fiveSigmaDepth")]
    pub five_sigma_depth: f64,
    #[serde(rename = "filtSkyBrightness")]
    pub filt_sky_brightness: f64,
    pub filter: String,
    #[serde(rename = "FWHMgeom")]
    pub fwhm_geom: f64,
    #[serde(rename = "FWHMeff")]
    pub fwhm_eff: f64,
    pub ra: Degree,
    pub dec: Degree,
    pub dist: Degree,
}

impl MatchedExposure {
    pub fn new(record: &ExposureRecord, dist: Degree) -> Self {
        let raw = &record.raw;
        MatchedExposure {
            exp_mjd: raw.exp_mjd,
            visit_exp_time: raw.visit_exp_time,
            obs_hist_id: raw.obs_hist_id,
            dithered_ra: raw.dithered_ra,
            dithered_dec: raw.dithered_dec,
            five_sigma_depth: raw.five_sigma_depth,
            filt_sky_brightness: raw.filt_sky_brightness,
            filter: raw.filter.clone(),
            fwhm_geom: raw.fwhm_geom,
            fwhm_eff: raw.fwhm_eff,
            ra: record.ra,
            dec: record.dec,
            dist,
        }
    }
}

/// The loaded exposure log, in source order.
#[derive(Debug, Clone, Default)]
pub struct ExposureLog {
    records: Vec<ExposureRecord>,
    directions: Vec<Vector3<f64>>,
}

impl ExposureLog {
    /// Build a log from stored rows, converting radians to degrees and caching unit vectors.
    pub fn from_raw<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawExposure>,
    {
        let records: Vec<ExposureRecord> = rows.into_iter().map(ExposureRecord::from).collect();
        let directions = records
            .iter()
            .map(|r| radec_to_unit_vector(r.ra, r.dec))
            .collect();
        ExposureLog {
            records,
            directions,
        }
    }

    pub fn records(&self) -> &[ExposureRecord] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&ExposureRecord> {
        self.records.get(idx)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest exposure epoch in the log.
    pub fn min_mjd(&self) -> Option<MJD> {
        self.records
            .iter()
            .map(|r| r.raw.exp_mjd)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Great-circle separation of every exposure center to `(ra, dec)`, in degrees.
    ///
    /// The returned vector is index-aligned with [`records`](ExposureLog::records).
    pub fn separations_from(&self, ra: Degree, dec: Degree) -> Vec<Degree> {
        let center = radec_to_unit_vector(ra, dec);
        self.directions
            .iter()
            .map(|d| separation_from_unit_vectors(&center, d))
            .collect()
    }
}

/// A persisted exposure log that can be materialized in memory.
pub trait ExposureLogSource {
    /// Load the projected columns of every exposure.
    ///
    /// Return
    /// ----------
    /// * The [`ExposureLog`], or [`CadenceError::MissingExposureLog`] when the source, its
    ///   table or one of [`EXPOSURE_COLUMNS`] is absent.
    fn load(&self) -> Result<ExposureLog, CadenceError>;
}

impl ExposureLogSource for ExposureLog {
    fn load(&self) -> Result<ExposureLog, CadenceError> {
        Ok(self.clone())
    }
}
