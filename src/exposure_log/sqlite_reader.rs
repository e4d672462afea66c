//! # SQLite reader for OpSim exposure logs
//!
//! Loads the projected [`EXPOSURE_COLUMNS`] from the `Summary` table of an OpSim database file.
//! The database is opened **read-only**: a missing file is reported as
//! [`CadenceError::MissingExposureLog`] instead of silently creating an empty database.
//!
//! Expected schema (at least):
//! - `expMJD REAL`, `visitExpTime REAL`, `obsHistID INTEGER`
//! - `descDitheredRA REAL`, `descDitheredDec REAL`, in radians
//! - `fiveSigmaDepth REAL`, `filtSkyBrightness REAL`
//! - `filter TEXT`, one of `u g r i z y`
//! - `FWHMgeom REAL`, `FWHMeff REAL`
use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, OpenFlags};
use tracing::info;

use super::{ExposureLog, ExposureLogSource, RawExposure, EXPOSURE_COLUMNS};
use crate::cadence_errors::CadenceError;

/// Name of the exposure table inside an OpSim database.
pub const SUMMARY_TABLE: &str = "Summary";

#[derive(Debug, Clone)]
pub struct OpsimDatabase {
    path: Utf8PathBuf,
}

impl OpsimDatabase {
    pub fn new(path: &Utf8Path) -> Self {
        OpsimDatabase {
            path: path.to_owned(),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn query() -> String {
        format!(
            "SELECT {} FROM {SUMMARY_TABLE}",
            EXPOSURE_COLUMNS.join(", ")
        )
    }
}

impl ExposureLogSource for OpsimDatabase {
    fn load(&self) -> Result<ExposureLog, CadenceError> {
        if !self.path.is_file() {
            return Err(CadenceError::MissingExposureLog(format!(
                "no database file at {}",
                self.path
            )));
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| CadenceError::MissingExposureLog(format!("{}: {e}", self.path)))?;

        // Preparing fails on a missing table or column
        let mut stmt = conn
            .prepare(&Self::query())
            .map_err(|e| CadenceError::MissingExposureLog(format!("{}: {e}", self.path)))?;

        let rows = stmt.query_map([], |row| {
            Ok(RawExposure {
                exp_mjd: row.get(0)?,
                visit_exp_time: row.get(1)?,
                obs_hist_id: row.get(2)?,
                dithered_ra: row.get(3)?,
                dithered_dec: row.get(4)?,
                five_sigma_depth: row.get(5)?,
                filt_sky_brightness: row.get(6)?,
                filter: row.get(7)?,
                fwhm_geom: row.get(8)?,
                fwhm_eff: row.get(9)?,
            })
        })?;

        let raw = rows.collect::<Result<Vec<_>, _>>()?;
        let log = ExposureLog::from_raw(raw);
        info!(path = %self.path, exposures = log.len(), "loaded exposure log");
        Ok(log)
    }
}
