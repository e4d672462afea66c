//! # Photometric band alphabet
//!
//! The survey observes through six filters, `u g r i z y`, encoded as the integers `0..=5`.
//! [`Band`] is the single, immutable bidirectional mapping between the two: the letter ↔ code
//! lookup is resolved at compile time through the enum discriminants, so no shared mutable
//! table exists at runtime.
//!
//! [`BandSelection`] is an ordered subset of the alphabet used by the
//! [`CadenceReader`](crate::reader::CadenceReader) to project observation masks. Regardless of
//! the order in which bands are supplied, a selection is always sorted by integer code and
//! free of duplicates.
//!
//! ```rust
//! use cadence::bands::{Band, BandSelection};
//!
//! let selection: BandSelection = ["i", "g"].iter().map(|s| s.parse::<Band>()).collect::<Result<_, _>>().unwrap();
//! assert_eq!(selection.codes(), vec![1, 3]);
//! assert_eq!(selection.letters(), vec!['g', 'i']);
//! ```
use std::fmt;
use std::str::FromStr;

use crate::constants::N_BANDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Band {
    U = 0,
    G = 1,
    R = 2,
    I = 3,
    Z = 4,
    Y = 5,
}

impl Band {
    /// Every band, in integer code order.
    pub const ALL: [Band; N_BANDS] = [Band::U, Band::G, Band::R, Band::I, Band::Z, Band::Y];

    /// Integer code of the band (`u = 0` … `y = 5`), also its mask column.
    #[inline]
    pub fn code(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        match self {
            Band::U => 'u',
            Band::G => 'g',
            Band::R => 'r',
            Band::I => 'i',
            Band::Z => 'z',
            Band::Y => 'y',
        }
    }

    pub fn from_code(code: usize) -> Option<Band> {
        Band::ALL.get(code).copied()
    }

    pub fn from_letter(letter: char) -> Option<Band> {
        match letter {
            'u' => Some(Band::U),
            'g' => Some(Band::G),
            'r' => Some(Band::R),
            'i' => Some(Band::I),
            'z' => Some(Band::Z),
            'y' => Some(Band::Y),
            _ => None,
        }
    }

    /// Resolve a band label as stored in the exposure log.
    ///
    /// Only the exact single-letter lower-case labels are accepted; surrounding
    /// whitespace is tolerated.
    pub fn from_label(label: &str) -> Option<Band> {
        let mut chars = label.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Band::from_letter(c),
            _ => None,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Error returned when parsing a string that is not one of `u g r i z y`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBandError(pub String);

impl fmt::Display for ParseBandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown band label {:?}", self.0)
    }
}

impl std::error::Error for ParseBandError {}

impl FromStr for Band {
    type Err = ParseBandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Band::from_label(s).ok_or_else(|| ParseBandError(s.to_string()))
    }
}

/// An ordered, de-duplicated subset of the band alphabet, sorted by integer code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BandSelection {
    bands: Vec<Band>,
}

impl BandSelection {
    pub fn new<I>(bands: I) -> Self
    where
        I: IntoIterator<Item = Band>,
    {
        let mut bands: Vec<Band> = bands.into_iter().collect();
        bands.sort_unstable();
        bands.dedup();
        BandSelection { bands }
    }

    /// The full alphabet, `u g r i z y`.
    pub fn all() -> Self {
        BandSelection::new(Band::ALL)
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Integer codes of the selected bands, ascending.
    pub fn codes(&self) -> Vec<usize> {
        self.bands.iter().map(|b| b.code()).collect()
    }

    /// Letters of the selected bands, in code order.
    pub fn letters(&self) -> Vec<char> {
        self.bands.iter().map(|b| b.letter()).collect()
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

impl FromIterator<Band> for BandSelection {
    fn from_iter<T: IntoIterator<Item = Band>>(iter: T) -> Self {
        BandSelection::new(iter)
    }
}
