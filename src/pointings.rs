//! # Pointing generation
//!
//! Draw telescope pointings uniformly over the survey [`Footprint`] by upsampling its base
//! HEALPix pixels.
//!
//! ## Algorithm
//!
//! For `n` requested pointings over a footprint of `m` pixels:
//!
//! 1. `k = ceil(n / m)` pointings are drawn from every footprint pixel.
//! 2. Each base pixel is subdivided at the smallest resolution offering at least `k`
//!    sub-pixels ([`target_nside_for_count`]).
//! 3. The centers of the first `k` sub-pixels, in nested order, become pointings.
//! 4. The per-pixel lists are concatenated in footprint order and the tail is truncated so that
//!    exactly `n` pointings remain.
//!
//! The procedure is deterministic. Ordering (footprint pixel outer, nested sub-pixel inner) is
//! a contract: the pointing index is the key of every artifact written by the
//! [`CadenceMatcher`](crate::matcher::CadenceMatcher).
//!
//! When `n` is not a multiple of `m`, the last footprint pixels are under-sampled relative to
//! the others. `generate(n)` is **not** a prefix of `generate(n')` for `n' > n` in general,
//! since `k` (and hence the subdivision level) depends on `n`.
use itertools::Itertools;

use crate::{
    cadence_errors::CadenceError,
    constants::{Degree, PixelId},
    footprint::Footprint,
    healpix::{centers, subdivide, target_nside_for_count, IndexingScheme},
};

/// A batch of pointings as two parallel coordinate sequences, in degrees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pointings {
    pub ra: Vec<Degree>,
    pub dec: Vec<Degree>,
}

impl Pointings {
    /// Build a batch from parallel coordinate vectors.
    pub fn new(ra: Vec<Degree>, dec: Vec<Degree>) -> Result<Self, CadenceError> {
        if ra.len() != dec.len() {
            return Err(CadenceError::ShapeMismatch(format!(
                "{} right ascensions for {} declinations",
                ra.len(),
                dec.len()
            )));
        }
        Ok(Pointings { ra, dec })
    }

    pub fn len(&self) -> usize {
        self.ra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ra.is_empty()
    }

    /// `(ra, dec)` of pointing `i`.
    pub fn get(&self, i: usize) -> Option<(Degree, Degree)> {
        Some((*self.ra.get(i)?, *self.dec.get(i)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Degree, Degree)> + '_ {
        self.ra.iter().copied().zip(self.dec.iter().copied())
    }

    fn truncate(&mut self, n: usize) {
        self.ra.truncate(n);
        self.dec.truncate(n);
    }
}

#[derive(Debug, Clone)]
pub struct PointingGenerator {
    footprint: Footprint,
}

impl PointingGenerator {
    pub fn new(footprint: Footprint) -> Self {
        PointingGenerator { footprint }
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Pointings drawn from a single footprint pixel.
    ///
    /// Arguments
    /// -----------------
    /// * `pixel`: base pixel id (ring indexing at the footprint resolution)
    /// * `n_pointings`: number of sub-pixel centers to keep
    ///
    /// Return
    /// ----------
    /// * The centers of the first `n_pointings` nested sub-pixels of `pixel`.
    pub fn generate_for_pixel(
        &self,
        pixel: PixelId,
        n_pointings: usize,
    ) -> Result<Pointings, CadenceError> {
        let base_nside = self.footprint.nside();
        let nside_out = target_nside_for_count(n_pointings, base_nside)?;
        let children = subdivide(pixel, base_nside, nside_out, IndexingScheme::Ring)?;
        let kept = &children[..n_pointings.min(children.len())];
        let (ra, dec) = centers(kept, nside_out, IndexingScheme::Nested)?;
        Ok(Pointings { ra, dec })
    }

    /// Exactly `n_pointings` pointings spread over the whole footprint.
    ///
    /// See the module documentation for the sampling and ordering rules.
    pub fn generate(&self, n_pointings: usize) -> Result<Pointings, CadenceError> {
        if n_pointings == 0 {
            return Ok(Pointings::default());
        }
        let per_pixel = n_pointings.div_ceil(self.footprint.len());

        let (ra, dec): (Vec<Vec<Degree>>, Vec<Vec<Degree>>) = self
            .footprint
            .pixels()
            .iter()
            .map(|&pixel| {
                self.generate_for_pixel(pixel, per_pixel)
                    .map(|p| (p.ra, p.dec))
            })
            .process_results(|iter| iter.unzip())?;

        let mut pointings = Pointings {
            ra: ra.into_iter().flatten().collect(),
            dec: dec.into_iter().flatten().collect(),
        };
        pointings.truncate(n_pointings);
        Ok(pointings)
    }
}
