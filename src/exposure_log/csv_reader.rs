//! CSV reader for exposure logs exported from an OpSim `Summary` table.
//!
//! The file must carry a header row naming at least the [`EXPOSURE_COLUMNS`]; extra columns are
//! ignored. Angles are in radians, as in the database.
use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use super::{ExposureLog, ExposureLogSource, RawExposure, EXPOSURE_COLUMNS};
use crate::cadence_errors::CadenceError;

#[derive(Debug, Clone)]
pub struct CsvExposureLog {
    path: Utf8PathBuf,
}

impl CsvExposureLog {
    pub fn new(path: &Utf8Path) -> Self {
        CsvExposureLog {
            path: path.to_owned(),
        }
    }
}

impl ExposureLogSource for CsvExposureLog {
    fn load(&self) -> Result<ExposureLog, CadenceError> {
        if !self.path.is_file() {
            return Err(CadenceError::MissingExposureLog(format!(
                "no csv file at {}",
                self.path
            )));
        }
        let mut reader = csv::Reader::from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        if let Some(missing) = EXPOSURE_COLUMNS
            .iter()
            .find(|col| !headers.iter().any(|h| h == **col))
        {
            return Err(CadenceError::MissingExposureLog(format!(
                "{}: missing column {missing}",
                self.path
            )));
        }

        let raw = reader
            .deserialize::<RawExposure>()
            .collect::<Result<Vec<_>, _>>()?;
        let log = ExposureLog::from_raw(raw);
        info!(path = %self.path, exposures = log.len(), "loaded exposure log");
        Ok(log)
    }
}
