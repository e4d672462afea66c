//! # Survey cadence façade
//!
//! [`SurveyCadence`] wires the pipeline together for one survey configuration:
//!
//! 1. **Parameters** ([`CadenceParams`]): output directory, field of view, reference epoch
//! 2. **Pointing generation** ([`PointingGenerator`]) over the survey [`Footprint`].
//! 3. **Matching** ([`CadenceMatcher`]) of pointings against an exposure log, persisted to the
//!    [`CadenceStore`] rooted at `out_dir`.
//! 4. **Reading** ([`CadenceReader`]) of epochs and band-projected masks.
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use cadence::bands::Band;
//! use cadence::exposure_log::sqlite_reader::OpsimDatabase;
//! use cadence::footprint::Footprint;
//! use cadence::params::CadenceParams;
//! use cadence::survey::SurveyCadence;
//!
//! let params = CadenceParams::builder().out_dir("obs").build().unwrap();
//! let footprint = Footprint::from_file(Utf8Path::new("healpix_list_dc2.txt"), params.base_nside).unwrap();
//! let mut survey = SurveyCadence::new(params, footprint).unwrap();
//!
//! let pointings = survey.get_pointings(10).unwrap();
//! let db = OpsimDatabase::new(Utf8Path::new("minion_1016_desc_dithered_v4_trimmed.db"));
//! let report = survey.get_obs_info(&pointings, &db).unwrap();
//! println!("{report:?}");
//!
//! survey.set_bandpasses([Band::I, Band::G]);
//! let mjd = survey.get_mjd_single_pointing(0, false).unwrap();
//! let mask = survey.get_mask_single_pointing(0).unwrap();
//! assert_eq!(mjd.len(), mask.nrows());
//! ```
//!
//! ## Errors
//!
//! Loading the exposure log is the only fatal step of [`SurveyCadence::get_obs_info`]; once the
//! log is in memory, failures are reported per pointing in the returned [`MatchReport`].
use ndarray::{Array1, Array2};

use crate::{
    bands::{Band, BandSelection},
    cadence_errors::CadenceError,
    cadence_store::CadenceStore,
    exposure_log::{ExposureLog, ExposureLogSource},
    footprint::Footprint,
    matcher::{CadenceMatcher, MatchReport},
    params::CadenceParams,
    pointings::{PointingGenerator, Pointings},
    reader::CadenceReader,
};

#[derive(Debug, Clone)]
pub struct SurveyCadence {
    params: CadenceParams,
    generator: PointingGenerator,
    matcher: CadenceMatcher,
    reader: CadenceReader,
}

impl SurveyCadence {
    /// Build the pipeline and open (create) the artifact directory.
    ///
    /// Arguments
    /// -----------------
    /// * `params`: validated run parameters
    /// * `footprint`: survey footprint, at `params.base_nside`
    ///
    /// Return
    /// ----------
    /// * The façade, or an error if the footprint resolution disagrees with the parameters or
    ///   the output directory cannot be created.
    pub fn new(params: CadenceParams, footprint: Footprint) -> Result<Self, CadenceError> {
        if footprint.nside() != params.base_nside {
            return Err(CadenceError::InvalidResolution(format!(
                "footprint nside {} differs from base_nside {}",
                footprint.nside(),
                params.base_nside
            )));
        }
        let matcher = CadenceMatcher::new(params.fov_radius, params.reference_mjd)?;
        let store = CadenceStore::open(&params.out_dir)?;
        let reader = CadenceReader::with_bands(store, params.bands.clone());

        Ok(SurveyCadence {
            params,
            generator: PointingGenerator::new(footprint),
            matcher,
            reader,
        })
    }

    pub fn params(&self) -> &CadenceParams {
        &self.params
    }

    pub fn footprint(&self) -> &Footprint {
        self.generator.footprint()
    }

    pub fn matcher(&self) -> &CadenceMatcher {
        &self.matcher
    }

    pub fn store(&self) -> &CadenceStore {
        self.reader.store()
    }

    pub fn reader(&self) -> &CadenceReader {
        &self.reader
    }

    /// Select the bands returned by [`get_mask_single_pointing`](SurveyCadence::get_mask_single_pointing).
    pub fn set_bandpasses<I>(&mut self, bands: I)
    where
        I: IntoIterator<Item = Band>,
    {
        let selection = BandSelection::new(bands);
        self.reader.set_bands(selection.bands().iter().copied());
        self.params.bands = Some(selection);
    }

    /// `n_pointings` pointings over the footprint.
    pub fn get_pointings(&self, n_pointings: usize) -> Result<Pointings, CadenceError> {
        self.generator.generate(n_pointings)
    }

    /// Load the exposure log once and match every pointing against it.
    ///
    /// Uses `params.skip_existing` for resumability.
    pub fn get_obs_info<S>(&self, pointings: &Pointings, source: &S) -> Result<MatchReport, CadenceError>
    where
        S: ExposureLogSource + ?Sized,
    {
        let log = source.load()?;
        Ok(self.match_log(pointings, &log))
    }

    /// Match every pointing against an already loaded exposure log.
    pub fn match_log(&self, pointings: &Pointings, log: &ExposureLog) -> MatchReport {
        self.matcher
            .match_all(pointings, log, self.reader.store(), self.params.skip_existing)
    }

    pub fn get_mjd_single_pointing(&self, index: usize, rounded: bool) -> Result<Array1<f64>, CadenceError> {
        self.reader.epochs(index, rounded)
    }

    pub fn get_mask_single_pointing(&self, index: usize) -> Result<Array2<bool>, CadenceError> {
        self.reader.mask(index)
    }
}
