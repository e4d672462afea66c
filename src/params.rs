//! # Cadence parameters
//!
//! [`CadenceParams`] gathers the configuration of a survey cadence run. Defaults reproduce the
//! reference survey configuration:
//!
//! | parameter       | default          | meaning                                          |
//! |-----------------|------------------|--------------------------------------------------|
//! | `out_dir`       | `obs`            | artifact directory, created if absent            |
//! | `seed`          | `1234`           | reserved for stochastic pointing sampling        |
//! | `fov_radius`    | `1.75` deg       | field-of-view radius of a pointing               |
//! | `reference_mjd` | `59580.139555`   | epoch subtracted from exposure MJDs              |
//! | `base_nside`    | `32`             | HEALPix resolution of the footprint list         |
//! | `bands`         | `None`           | band selection applied when reading masks        |
//! | `skip_existing` | `true`           | resume: keep pointings already in the store      |
//!
//! ```rust
//! use cadence::bands::Band;
//! use cadence::params::CadenceParams;
//!
//! let params = CadenceParams::builder()
//!     .out_dir("cadence_out")
//!     .fov_radius(2.0)
//!     .bands([Band::G, Band::I])
//!     .build()
//!     .unwrap();
//! assert_eq!(params.base_nside, 32);
//! ```
use camino::Utf8PathBuf;

use crate::{
    bands::{Band, BandSelection},
    cadence_errors::CadenceError,
    constants::{Degree, DEFAULT_SEED, FOV_RADIUS, MIN_MJD, MJD, NSIDE_IN},
    healpix::is_valid_nside,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CadenceParams {
    pub out_dir: Utf8PathBuf,
    pub seed: u64,
    pub fov_radius: Degree,
    pub reference_mjd: MJD,
    pub base_nside: u32,
    pub bands: Option<BandSelection>,
    pub skip_existing: bool,
}

impl Default for CadenceParams {
    fn default() -> Self {
        CadenceParams {
            out_dir: Utf8PathBuf::from("obs"),
            seed: DEFAULT_SEED,
            fov_radius: FOV_RADIUS,
            reference_mjd: MIN_MJD,
            base_nside: NSIDE_IN,
            bands: None,
            skip_existing: true,
        }
    }
}

impl CadenceParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> CadenceParamsBuilder {
        CadenceParamsBuilder::new()
    }
}

#[derive(Debug, Clone)]
pub struct CadenceParamsBuilder {
    params: CadenceParams,
}

impl Default for CadenceParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CadenceParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: CadenceParams::default(),
        }
    }

    pub fn out_dir(mut self, v: impl Into<Utf8PathBuf>) -> Self {
        self.params.out_dir = v.into();
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.params.seed = v;
        self
    }
    pub fn fov_radius(mut self, v: Degree) -> Self {
        self.params.fov_radius = v;
        self
    }
    pub fn reference_mjd(mut self, v: MJD) -> Self {
        self.params.reference_mjd = v;
        self
    }
    pub fn base_nside(mut self, v: u32) -> Self {
        self.params.base_nside = v;
        self
    }
    pub fn bands<I: IntoIterator<Item = Band>>(mut self, v: I) -> Self {
        self.params.bands = Some(BandSelection::new(v));
        self
    }
    pub fn skip_existing(mut self, v: bool) -> Self {
        self.params.skip_existing = v;
        self
    }

    /// Validate and return the parameters.
    ///
    /// * `fov_radius` must be finite and in `(0, 180]`.
    /// * `reference_mjd` must be finite.
    /// * `base_nside` must be a power of two.
    /// * `out_dir` must not be empty.
    pub fn build(self) -> Result<CadenceParams, CadenceError> {
        let p = &self.params;

        if !(p.fov_radius.is_finite() && p.fov_radius > 0.0 && p.fov_radius <= 180.0) {
            return Err(CadenceError::InvalidParameter(format!(
                "fov_radius must be in (0, 180] degrees, got {}",
                p.fov_radius
            )));
        }
        if !p.reference_mjd.is_finite() {
            return Err(CadenceError::InvalidParameter(
                "reference_mjd must be finite".into(),
            ));
        }
        if !is_valid_nside(p.base_nside) {
            return Err(CadenceError::InvalidResolution(format!(
                "base_nside {} is not a power of two",
                p.base_nside
            )));
        }
        if p.out_dir.as_str().is_empty() {
            return Err(CadenceError::InvalidParameter(
                "out_dir must not be empty".into(),
            ));
        }

        Ok(self.params)
    }
}
