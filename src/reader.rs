//! # Cadence reader
//!
//! Read back the per-pointing artifacts written by the
//! [`CadenceMatcher`](crate::matcher::CadenceMatcher), optionally projecting the observation
//! masks onto a [`BandSelection`].
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use cadence::{bands::Band, cadence_store::CadenceStore, reader::CadenceReader};
//!
//! let store = CadenceStore::open(Utf8Path::new("obs")).unwrap();
//! let mut reader = CadenceReader::new(store);
//! reader.set_bands([Band::I, Band::G]);
//!
//! let mjd = reader.epochs(0, false).unwrap();
//! let mask = reader.mask(0).unwrap(); // columns: g, i
//! assert_eq!(mjd.len(), mask.nrows());
//! ```
use ndarray::{Array1, Array2, Axis};

use crate::{
    bands::{Band, BandSelection},
    cadence_errors::CadenceError,
    cadence_store::CadenceStore,
    exposure_log::MatchedExposure,
};

#[derive(Debug, Clone)]
pub struct CadenceReader {
    store: CadenceStore,
    bands: Option<BandSelection>,
}

impl CadenceReader {
    pub fn new(store: CadenceStore) -> Self {
        CadenceReader { store, bands: None }
    }

    pub fn with_bands(store: CadenceStore, bands: Option<BandSelection>) -> Self {
        CadenceReader { store, bands }
    }

    pub fn store(&self) -> &CadenceStore {
        &self.store
    }

    pub fn bands(&self) -> Option<&BandSelection> {
        self.bands.as_ref()
    }

    /// Restrict [`mask`](CadenceReader::mask) to the given bands, in integer code order.
    pub fn set_bands<I>(&mut self, bands: I)
    where
        I: IntoIterator<Item = Band>,
    {
        self.bands = Some(BandSelection::new(bands));
    }

    /// Return to full six-band masks.
    pub fn clear_bands(&mut self) {
        self.bands = None;
    }

    /// Normalized epochs of pointing `index`.
    ///
    /// With `rounded`, every epoch is rounded to the nearest integer day, ties to even.
    pub fn epochs(&self, index: usize, rounded: bool) -> Result<Array1<f64>, CadenceError> {
        let epochs = self.store.read_epochs(index)?;
        Ok(if rounded {
            epochs.mapv_into(f64::round_ties_even)
        } else {
            epochs
        })
    }

    /// Observation mask of pointing `index`, `[n_exposures, n_bands]`.
    ///
    /// Without a band selection all six columns are returned (`u g r i z y`); otherwise only the
    /// selected columns, ordered by band code.
    pub fn mask(&self, index: usize) -> Result<Array2<bool>, CadenceError> {
        let mask = self.store.read_mask(index)?;
        Ok(match &self.bands {
            Some(selection) => mask.select(Axis(1), &selection.codes()),
            None => mask,
        })
    }

    /// Matched exposure records of pointing `index`.
    pub fn observations(&self, index: usize) -> Result<Vec<MatchedExposure>, CadenceError> {
        self.store.read_observations(index)
    }
}
