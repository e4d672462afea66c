//! # Cadence matching
//!
//! For every pointing, select the exposures of the [`ExposureLog`] whose center lies within the
//! field of view and compact them into a [`PointingCadence`]:
//!
//! 1. great-circle separation between the pointing and every exposure,
//! 2. keep exposures with separation **strictly less** than the field-of-view radius, in log
//!    order (an inclusive spatial filter, any number of exposures may match),
//! 3. epochs: `expMJD − reference_mjd`,
//! 4. mask: one row per kept exposure, `true` in the column of its band.
//!
//! ## Batch runs
//! -----------------
//! [`CadenceMatcher::match_all`] walks the pointings in index order and writes each result to a
//! [`CadenceStore`]. With `skip_existing`, pointings already present in the store are left
//! untouched, which makes an interrupted run resumable.
//!
//! Failures are isolated per pointing: an exposure with a band label outside `u g r i z y`
//! ([`CadenceError::UnmappedBandLabel`]) or a failed write aborts that pointing only. Nothing
//! is written for a failed pointing, any artifact left by a previous run for it is invalidated,
//! and the run continues. The outcome is summarized in a
//! [`MatchReport`].
use ndarray::{Array1, Array2};
use tracing::{debug, info, warn};

#[cfg(feature = "progress")]
use crate::progress_bar::PointingProgress;

use crate::{
    bands::Band,
    cadence_errors::CadenceError,
    cadence_store::{CadenceStore, PointingCadence},
    constants::{Degree, FOV_RADIUS, MIN_MJD, MJD, N_BANDS},
    exposure_log::{ExposureLog, MatchedExposure},
    pointings::Pointings,
};

/// Outcome of a batch matching run.
#[derive(Debug, Default, PartialEq)]
pub struct MatchReport {
    /// Pointings matched and written during this run.
    pub matched: usize,
    /// Pointings left untouched because their artifacts already existed.
    pub skipped: usize,
    /// Pointings whose processing failed, with the cause.
    pub failed: Vec<(usize, CadenceError)>,
}

impl MatchReport {
    pub fn total(&self) -> usize {
        self.matched + self.skipped + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CadenceMatcher {
    fov_radius: Degree,
    reference_mjd: MJD,
}

impl Default for CadenceMatcher {
    fn default() -> Self {
        CadenceMatcher {
            fov_radius: FOV_RADIUS,
            reference_mjd: MIN_MJD,
        }
    }
}

impl CadenceMatcher {
    /// Arguments
    /// -----------------
    /// * `fov_radius`: field-of-view radius in degrees, must be positive and finite
    /// * `reference_mjd`: epoch subtracted from every exposure MJD
    pub fn new(fov_radius: Degree, reference_mjd: MJD) -> Result<Self, CadenceError> {
        if !(fov_radius.is_finite() && fov_radius > 0.0) {
            return Err(CadenceError::InvalidParameter(format!(
                "fov_radius must be positive, got {fov_radius}"
            )));
        }
        if !reference_mjd.is_finite() {
            return Err(CadenceError::InvalidParameter(
                "reference_mjd must be finite".into(),
            ));
        }
        Ok(CadenceMatcher {
            fov_radius,
            reference_mjd,
        })
    }

    pub fn fov_radius(&self) -> Degree {
        self.fov_radius
    }

    pub fn reference_mjd(&self) -> MJD {
        self.reference_mjd
    }

    /// Match a single pointing against the exposure log.
    ///
    /// Arguments
    /// -----------------
    /// * `ra`, `dec`: pointing center in degrees
    /// * `log`: the loaded exposure log
    ///
    /// Return
    /// ----------
    /// * The index-aligned [`PointingCadence`], or [`CadenceError::UnmappedBandLabel`] if one
    ///   of the retained exposures has a band label outside the alphabet.
    pub fn match_pointing(
        &self,
        ra: Degree,
        dec: Degree,
        log: &ExposureLog,
    ) -> Result<PointingCadence, CadenceError> {
        let observations: Vec<MatchedExposure> = log
            .separations_from(ra, dec)
            .into_iter()
            .zip(log.records())
            .filter(|(dist, _)| *dist < self.fov_radius)
            .map(|(dist, record)| MatchedExposure::new(record, dist))
            .collect();

        let epochs: Array1<f64> = observations
            .iter()
            .map(|obs| obs.exp_mjd - self.reference_mjd)
            .collect();

        let mut mask = Array2::from_elem((observations.len(), N_BANDS), false);
        for (row, obs) in observations.iter().enumerate() {
            let band =
                Band::from_label(&obs.filter).ok_or_else(|| CadenceError::UnmappedBandLabel {
                    label: obs.filter.clone(),
                    exposure_id: obs.obs_hist_id,
                })?;
            mask[[row, band.code()]] = true;
        }

        Ok(PointingCadence {
            observations,
            epochs,
            mask,
        })
    }

    fn process(
        &self,
        index: usize,
        ra: Degree,
        dec: Degree,
        log: &ExposureLog,
        store: &CadenceStore,
    ) -> Result<usize, CadenceError> {
        // Artifacts of a previous run must not outlive a failed recompute
        store.invalidate(index)?;
        let cadence = self.match_pointing(ra, dec, log)?;
        store.write(index, &cadence)?;
        Ok(cadence.len())
    }

    fn record(&self, report: &mut MatchReport, index: usize, outcome: Result<usize, CadenceError>) {
        match outcome {
            Ok(n) => {
                debug!(pointing = index, exposures = n, "matched pointing");
                report.matched += 1;
            }
            Err(err) => {
                warn!(pointing = index, error = %err, "pointing failed");
                report.failed.push((index, err));
            }
        }
    }

    /// Match every pointing and persist its artifacts.
    ///
    /// Arguments
    /// -----------------
    /// * `pointings`: pointing centers; the position in the batch is the artifact key
    /// * `log`: the exposure log, loaded once and shared by all pointings
    /// * `store`: destination of the artifacts
    /// * `skip_existing`: leave pointings already present in `store` untouched
    ///
    /// Return
    /// ----------
    /// * A [`MatchReport`] counting matched, skipped and failed pointings.
    ///
    /// With the `progress` feature, a progress bar tracks the batch.
    pub fn match_all(
        &self,
        pointings: &Pointings,
        log: &ExposureLog,
        store: &CadenceStore,
        skip_existing: bool,
    ) -> MatchReport {
        #[cfg(feature = "progress")]
        let mut progress = PointingProgress::new(pointings.len() as u64);
        let mut report = MatchReport::default();

        for (index, (ra, dec)) in pointings.iter().enumerate() {
            if skip_existing && store.contains(index) {
                report.skipped += 1;
                #[cfg(feature = "progress")]
                progress.skipped();
                continue;
            }
            let outcome = self.process(index, ra, dec, log, store);
            #[cfg(feature = "progress")]
            progress.processed(outcome.is_err());
            self.record(&mut report, index, outcome);
        }

        #[cfg(feature = "progress")]
        progress.finish();
        self.summarize(&report);
        report
    }

    fn summarize(&self, report: &MatchReport) {
        info!(
            matched = report.matched,
            skipped = report.skipped,
            failed = report.failed.len(),
            "cadence matching done"
        );
    }
}
