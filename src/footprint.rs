//! # Survey footprint
//!
//! The footprint is the fixed, ordered list of base-resolution HEALPix pixels (ring indexing)
//! covering the survey area. Its order is part of the pointing contract: pointings are generated
//! footprint pixel by footprint pixel, so downstream consumers can index pointings stably.
//!
//! The on-disk format is a plain-text file holding one pixel id per line:
//!
//! ```text
//! 10450
//! 10451
//! 10452
//! ```
//!
//! Blank lines are ignored; any other non-integer line is a [`CadenceError::FootprintParse`].
use std::io::{BufRead, BufReader};

use camino::Utf8Path;

use crate::{
    cadence_errors::CadenceError,
    constants::PixelId,
    healpix::{is_valid_nside, npix},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    pixels: Vec<PixelId>,
    nside: u32,
}

impl Footprint {
    /// Build a footprint from pixel ids in ring indexing at `nside`.
    ///
    /// Arguments
    /// -----------------
    /// * `pixels`: ordered ring-scheme pixel ids
    /// * `nside`: base resolution of the ids, a power of two
    ///
    /// Return
    /// ----------
    /// * The footprint, or an error if the list is empty, the resolution invalid,
    ///   or one pixel does not exist at `nside`.
    pub fn new(pixels: Vec<PixelId>, nside: u32) -> Result<Self, CadenceError> {
        if !is_valid_nside(nside) {
            return Err(CadenceError::InvalidResolution(format!(
                "footprint nside {nside} is not a power of two"
            )));
        }
        if pixels.is_empty() {
            return Err(CadenceError::EmptyFootprint);
        }
        if let Some(&pixel) = pixels.iter().find(|&&p| p >= npix(nside)) {
            return Err(CadenceError::InvalidPixel { pixel, nside });
        }
        Ok(Footprint { pixels, nside })
    }

    /// Read a footprint list, one pixel id per line.
    pub fn from_reader<R: BufRead>(reader: R, nside: u32) -> Result<Self, CadenceError> {
        let mut pixels = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let content = line.trim();
            if content.is_empty() {
                continue;
            }
            let pixel = content
                .parse::<PixelId>()
                .map_err(|_| CadenceError::FootprintParse {
                    line: idx + 1,
                    content: content.to_string(),
                })?;
            pixels.push(pixel);
        }
        Footprint::new(pixels, nside)
    }

    /// Load a footprint list from a text file.
    pub fn from_file(path: &Utf8Path, nside: u32) -> Result<Self, CadenceError> {
        let file = std::fs::File::open(path)?;
        Footprint::from_reader(BufReader::new(file), nside)
    }

    pub fn pixels(&self) -> &[PixelId] {
        &self.pixels
    }

    pub fn nside(&self) -> u32 {
        self.nside
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always `false`: an empty footprint cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}
