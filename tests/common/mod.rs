#![allow(dead_code)]

use approx::assert_relative_eq;
use cadence::exposure_log::{MatchedExposure, RawExposure};
use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::Connection;

/// Exposure row with the center given in degrees and neutral photometric columns.
pub fn raw(id: i64, mjd: f64, ra_deg: f64, dec_deg: f64, filter: &str) -> RawExposure {
    RawExposure {
        exp_mjd: mjd,
        visit_exp_time: 30.0,
        obs_hist_id: id,
        dithered_ra: ra_deg.to_radians(),
        dithered_dec: dec_deg.to_radians(),
        five_sigma_depth: 24.1,
        filt_sky_brightness: 21.3,
        filter: filter.to_string(),
        fwhm_geom: 0.8,
        fwhm_eff: 0.9,
    }
}

/// Exposure log around the nside 1 footprint `[0, 4]`: pointing 0 sits at (45, 19.47),
/// pointing 3 at (22.5, 0).
pub fn survey_rows() -> Vec<RawExposure> {
    vec![
        raw(100, 59581.139555, 45.5, 19.0, "g"),
        raw(101, 59582.339555, 44.0, 20.0, "i"),
        raw(102, 59583.139555, 120.0, -60.0, "r"),
        raw(103, 59584.139555, 23.0, 0.8, "z"),
        raw(104, 59585.139555, 45.2, 19.9, "i"),
        raw(105, 59586.139555, 22.0, -1.0, "u"),
        raw(106, 59587.139555, 300.0, 10.0, "y"),
    ]
}

/// Write an OpSim-like SQLite file holding a `Summary` table with `rows`.
pub fn write_opsim_db(path: &Utf8Path, rows: &[RawExposure]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE Summary (
            obsHistID INTEGER, expMJD REAL, visitExpTime REAL,
            descDitheredRA REAL, descDitheredDec REAL, fiveSigmaDepth REAL,
            filtSkyBrightness REAL, filter TEXT, FWHMgeom REAL, FWHMeff REAL,
            propID INTEGER
        );",
    )
    .unwrap();
    for r in rows {
        conn.execute(
            "INSERT INTO Summary VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 54)",
            rusqlite::params![
                r.obs_hist_id,
                r.exp_mjd,
                r.visit_exp_time,
                r.dithered_ra,
                r.dithered_dec,
                r.five_sigma_depth,
                r.filt_sky_brightness,
                r.filter,
                r.fwhm_geom,
                r.fwhm_eff
            ],
        )
        .unwrap();
    }
}

pub fn scratch_dir() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, path)
}

pub fn assert_observation_close(actual: &MatchedExposure, expected: &MatchedExposure, epsilon: f64) {
    assert_eq!(actual.obs_hist_id, expected.obs_hist_id);
    assert_eq!(actual.filter, expected.filter);
    assert_relative_eq!(actual.exp_mjd, expected.exp_mjd, epsilon = epsilon);
    assert_relative_eq!(actual.dithered_ra, expected.dithered_ra, epsilon = epsilon);
    assert_relative_eq!(actual.dithered_dec, expected.dithered_dec, epsilon = epsilon);
    assert_relative_eq!(actual.ra, expected.ra, epsilon = epsilon);
    assert_relative_eq!(actual.dec, expected.dec, epsilon = epsilon);
    assert_relative_eq!(actual.dist, expected.dist, epsilon = epsilon);
}
