//! # Per-pointing cadence artifacts
//!
//! [`CadenceStore`] is an on-disk cache keyed by pointing index. Each matched pointing `i`
//! owns three files in the store directory:
//!
//! | file            | content                                                        |
//! |-----------------|----------------------------------------------------------------|
//! | `obs_{i}.csv`   | matched exposures, header row, no index column, `dist` in deg |
//! | `mjd_{i}.npy`   | `f64[n]`, exposure epochs minus the reference epoch            |
//! | `mask_{i}.npy`  | `bool[n, 6]`, band flags in `u g r i z y` order                |
//!
//! All three are row-aligned: row `k` of the mask, element `k` of the epochs and record `k`
//! of the csv describe the same exposure.
//!
//! ## Existence-check-then-write protocol
//! -----------------
//! The mask is the **completion marker** of a pointing: [`CadenceStore::contains`] only checks
//! for `mask_{i}.npy`. [`CadenceStore::write`] therefore removes any previous mask, writes the
//! csv and the epochs, then the mask under a temporary name renamed into place, so an
//! interrupted write or overwrite never leaves a pointing that looks complete but is not.
//! [`CadenceStore::invalidate`] drops the marker on its own, before a recompute.
//! Pointings write disjoint files, so no locking is needed.
//!
//! A mask read back with a width other than six columns is a [`CadenceError::ShapeMismatch`].
use std::{fs, io};

use camino::{Utf8Path, Utf8PathBuf};
use ndarray::{Array1, Array2, Axis};
use ndarray_npy::{read_npy, write_npy};

use crate::{
    cadence_errors::CadenceError,
    constants::N_BANDS,
    exposure_log::{MatchedExposure, EXPOSURE_COLUMNS},
};

/// Header of `obs_{i}.csv`.
pub fn observation_columns() -> Vec<&'static str> {
    EXPOSURE_COLUMNS
        .iter()
        .copied()
        .chain(["ra", "dec", "dist"])
        .collect()
}

/// The three index-aligned artifacts of one pointing.
#[derive(Debug, Clone, PartialEq)]
pub struct PointingCadence {
    pub observations: Vec<MatchedExposure>,
    pub epochs: Array1<f64>,
    pub mask: Array2<bool>,
}

impl PointingCadence {
    /// Number of matched exposures.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Check the row alignment of the three artifacts.
    pub fn check_alignment(&self) -> Result<(), CadenceError> {
        let n = self.observations.len();
        if self.epochs.len() != n
            || self.mask.len_of(Axis(0)) != n
            || self.mask.len_of(Axis(1)) != N_BANDS
        {
            return Err(CadenceError::ShapeMismatch(format!(
                "{n} observations, {} epochs, mask {:?}",
                self.epochs.len(),
                self.mask.shape()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CadenceStore {
    dir: Utf8PathBuf,
}

impl CadenceStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Utf8Path) -> Result<Self, CadenceError> {
        fs::create_dir_all(dir)?;
        Ok(CadenceStore {
            dir: dir.to_owned(),
        })
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn observations_path(&self, index: usize) -> Utf8PathBuf {
        self.dir.join(format!("obs_{index}.csv"))
    }

    pub fn epochs_path(&self, index: usize) -> Utf8PathBuf {
        self.dir.join(format!("mjd_{index}.npy"))
    }

    pub fn mask_path(&self, index: usize) -> Utf8PathBuf {
        self.dir.join(format!("mask_{index}.npy"))
    }

    /// `true` if pointing `index` was completely written.
    pub fn contains(&self, index: usize) -> bool {
        self.mask_path(index).is_file()
    }

    /// Drop the completion marker of pointing `index`, if any.
    ///
    /// The csv and epoch files are left in place; without a mask they are never served.
    pub fn invalidate(&self, index: usize) -> Result<(), CadenceError> {
        match fs::remove_file(self.mask_path(index)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the artifacts of pointing `index`, overwriting previous ones.
    ///
    /// The previous mask is removed before anything else is written, so a failure part way
    /// leaves the pointing incomplete rather than mixing old and new rows.
    pub fn write(&self, index: usize, cadence: &PointingCadence) -> Result<(), CadenceError> {
        cadence.check_alignment()?;
        self.invalidate(index)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(self.observations_path(index))?;
        // Header is written explicitly so that empty matches keep it
        writer.write_record(observation_columns())?;
        for obs in &cadence.observations {
            writer.serialize(obs)?;
        }
        writer.flush()?;

        write_npy(self.epochs_path(index), &cadence.epochs)?;

        let mask_path = self.mask_path(index);
        let partial = self.dir.join(format!("mask_{index}.npy.partial"));
        write_npy(&partial, &cadence.mask)?;
        fs::rename(&partial, &mask_path)?;
        Ok(())
    }

    fn existing(&self, index: usize, path: Utf8PathBuf) -> Result<Utf8PathBuf, CadenceError> {
        if path.is_file() {
            Ok(path)
        } else {
            Err(CadenceError::ArtifactNotFound { index, path })
        }
    }

    pub fn read_epochs(&self, index: usize) -> Result<Array1<f64>, CadenceError> {
        let path = self.existing(index, self.epochs_path(index))?;
        Ok(read_npy(path)?)
    }

    pub fn read_mask(&self, index: usize) -> Result<Array2<bool>, CadenceError> {
        let path = self.existing(index, self.mask_path(index))?;
        let mask: Array2<bool> = read_npy(&path)?;
        if mask.ncols() != N_BANDS {
            return Err(CadenceError::ShapeMismatch(format!(
                "{path}: mask has {} columns, expected {N_BANDS}",
                mask.ncols()
            )));
        }
        Ok(mask)
    }

    pub fn read_observations(&self, index: usize) -> Result<Vec<MatchedExposure>, CadenceError> {
        let path = self.existing(index, self.observations_path(index))?;
        let mut reader = csv::Reader::from_path(path)?;
        Ok(reader
            .deserialize::<MatchedExposure>()
            .collect::<Result<Vec<_>, _>>()?)
    }
}
