use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CadenceError {
    #[error("Invalid HEALPix resolution: {0}")]
    InvalidResolution(String),

    #[error("Pixel {pixel} is out of range for nside {nside}")]
    InvalidPixel { pixel: u64, nside: u32 },

    #[error("Footprint contains no pixel")]
    EmptyFootprint,

    #[error("Unable to parse footprint line {line}: {content:?}")]
    FootprintParse { line: usize, content: String },

    #[error("Exposure log unavailable: {0}")]
    MissingExposureLog(String),

    #[error("Unmapped band label {label:?} for exposure {exposure_id}")]
    UnmappedBandLabel { label: String, exposure_id: i64 },

    #[error("Artifact not found for pointing {index}: {path}")]
    ArtifactNotFound { index: usize, path: Utf8PathBuf },

    #[error("Invalid cadence parameter: {0}")]
    InvalidParameter(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("Unable to write npy array: {0}")]
    NpyWrite(#[from] ndarray_npy::WriteNpyError),

    #[error("Unable to read npy array: {0}")]
    NpyRead(#[from] ndarray_npy::ReadNpyError),
}

impl PartialEq for CadenceError {
    fn eq(&self, other: &Self) -> bool {
        use CadenceError::*;
        match (self, other) {
            (InvalidResolution(a), InvalidResolution(b)) => a == b,
            (
                InvalidPixel {
                    pixel: a,
                    nside: na,
                },
                InvalidPixel {
                    pixel: b,
                    nside: nb,
                },
            ) => a == b && na == nb,
            (
                FootprintParse {
                    line: a,
                    content: ca,
                },
                FootprintParse {
                    line: b,
                    content: cb,
                },
            ) => a == b && ca == cb,
            (MissingExposureLog(a), MissingExposureLog(b)) => a == b,
            (
                UnmappedBandLabel {
                    label: a,
                    exposure_id: ia,
                },
                UnmappedBandLabel {
                    label: b,
                    exposure_id: ib,
                },
            ) => a == b && ia == ib,
            (ArtifactNotFound { index: a, path: pa }, ArtifactNotFound { index: b, path: pb }) => {
                a == b && pa == pb
            }
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (ShapeMismatch(a), ShapeMismatch(b)) => a == b,

            // Wrapped library errors are not comparable: same variant means equal
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (SqliteError(_), SqliteError(_)) => true,
            (NpyWrite(_), NpyWrite(_)) => true,
            (NpyRead(_), NpyRead(_)) => true,

            (EmptyFootprint, EmptyFootprint) => true,

            _ => false,
        }
    }
}
