use std::env;
use std::process::ExitCode;

use camino::Utf8Path;
use cadence::bands::Band;
use cadence::cadence_errors::CadenceError;
use cadence::exposure_log::sqlite_reader::OpsimDatabase;
use cadence::footprint::Footprint;
use cadence::params::CadenceParams;
use cadence::survey::SurveyCadence;
use tracing_subscriber::EnvFilter;

/// Match `n` pointings of a footprint against an OpSim database, then print the cadence of the
/// first pointing in the g and i bands.
///
/// Arguments
/// -----------------
/// * `footprint`: text file with one ring pixel id per line, at nside 32
/// * `db`: OpSim SQLite file with a `Summary` table
/// * `out_dir`: artifact directory
/// * `n`: number of pointings
fn run(footprint: &Utf8Path, db: &Utf8Path, out_dir: &Utf8Path, n: usize) -> Result<(), CadenceError> {
    let params = CadenceParams::builder()
        .out_dir(out_dir)
        .bands([Band::G, Band::I])
        .build()?;
    let footprint = Footprint::from_file(footprint, params.base_nside)?;
    let survey = SurveyCadence::new(params, footprint)?;

    let pointings = survey.get_pointings(n)?;
    let report = survey.get_obs_info(&pointings, &OpsimDatabase::new(db))?;
    println!(
        "matched: {}, skipped: {}, failed: {}",
        report.matched,
        report.skipped,
        report.failed.len()
    );
    for (index, err) in &report.failed {
        println!("  pointing {index}: {err}");
    }

    if let Some((ra, dec)) = pointings.get(0) {
        let mjd = survey.get_mjd_single_pointing(0, true)?;
        let mask = survey.get_mask_single_pointing(0)?;
        println!("pointing 0 at ({ra:.4}, {dec:.4}): {} exposures", mjd.len());
        for (t, row) in mjd.iter().zip(mask.rows()) {
            println!("  {t:>6} g={} i={}", row[0] as u8, row[1] as u8);
        }
    }
    Ok(())
}

/// Usage:
///   lsst_cadence <FOOTPRINT> <DB> [OUT_DIR] [N]
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: {} <FOOTPRINT> <DB> [OUT_DIR] [N]", args[0]);
        return ExitCode::FAILURE;
    }
    let out_dir = args.get(3).map(String::as_str).unwrap_or("obs");
    let n = match args.get(4).map(|s| s.parse::<usize>()) {
        None => 10,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("invalid pointing count: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(
        Utf8Path::new(&args[1]),
        Utf8Path::new(&args[2]),
        Utf8Path::new(out_dir),
        n,
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
