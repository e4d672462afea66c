mod common;

use approx::assert_relative_eq;
use cadence::bands::Band;
use cadence::cadence_errors::CadenceError;
use cadence::exposure_log::csv_reader::CsvExposureLog;
use cadence::exposure_log::sqlite_reader::OpsimDatabase;
use cadence::exposure_log::{ExposureLog, ExposureLogSource};
use cadence::footprint::Footprint;
use cadence::params::CadenceParams;
use cadence::survey::SurveyCadence;
use camino::Utf8Path;
use ndarray::{array, Axis};

use common::{assert_observation_close, scratch_dir, survey_rows, write_opsim_db};

fn survey_in(out_dir: &Utf8Path, skip_existing: bool) -> SurveyCadence {
    let params = CadenceParams::builder()
        .out_dir(out_dir.join("obs"))
        .base_nside(1)
        .skip_existing(skip_existing)
        .build()
        .unwrap();
    SurveyCadence::new(params, Footprint::new(vec![0, 4], 1).unwrap()).unwrap()
}

#[test]
fn test_sqlite_pipeline() {
    let (_dir, root) = scratch_dir();
    let db_path = root.join("opsim.db");
    write_opsim_db(&db_path, &survey_rows());

    let mut survey = survey_in(&root, true);
    let pointings = survey.get_pointings(4).unwrap();
    assert_eq!(pointings.len(), 4);

    let report = survey
        .get_obs_info(&pointings, &OpsimDatabase::new(&db_path))
        .unwrap();
    assert_eq!(report.matched, 4);
    assert_eq!(report.skipped, 0);
    assert!(report.is_success());

    for i in 0..4 {
        assert!(survey.store().contains(i));
        assert!(survey.store().observations_path(i).is_file());
        assert!(survey.store().epochs_path(i).is_file());
    }

    let obs = survey.reader().observations(0).unwrap();
    let ids: Vec<i64> = obs.iter().map(|o| o.obs_hist_id).collect();
    assert_eq!(ids, vec![100, 101, 104]);
    for o in &obs {
        assert!(o.dist < 1.75);
    }

    let mjd = survey.get_mjd_single_pointing(0, false).unwrap();
    assert_relative_eq!(mjd[0], 1.0, epsilon = 1e-6);
    assert_relative_eq!(mjd[1], 2.2, epsilon = 1e-6);
    assert_relative_eq!(mjd[2], 5.0, epsilon = 1e-6);
    assert_eq!(
        survey.get_mjd_single_pointing(0, true).unwrap(),
        array![1.0, 2.0, 5.0]
    );

    let mask = survey.get_mask_single_pointing(0).unwrap();
    assert_eq!(
        mask,
        array![
            [false, true, false, false, false, false],
            [false, false, false, true, false, false],
            [false, false, false, true, false, false]
        ]
    );

    let ids_3: Vec<i64> = survey
        .reader()
        .observations(3)
        .unwrap()
        .iter()
        .map(|o| o.obs_hist_id)
        .collect();
    assert_eq!(ids_3, vec![103, 105]);

    // Pointings without any exposure still get empty, readable artifacts
    assert!(survey.reader().observations(1).unwrap().is_empty());
    assert_eq!(survey.get_mask_single_pointing(1).unwrap().shape(), &[0, 6]);
    assert_eq!(survey.get_mjd_single_pointing(2, true).unwrap().len(), 0);

    survey.set_bandpasses([Band::I, Band::G]);
    assert_eq!(
        survey.get_mask_single_pointing(0).unwrap(),
        array![[true, false], [false, true], [false, true]]
    );
    assert_eq!(
        survey.get_mask_single_pointing(3).unwrap(),
        array![[false, false], [false, false]]
    );
}

#[test]
fn test_artifacts_stay_aligned() {
    let (_dir, root) = scratch_dir();
    let survey = survey_in(&root, true);
    let pointings = survey.get_pointings(4).unwrap();
    let log = ExposureLog::from_raw(survey_rows());
    survey.match_log(&pointings, &log);

    for i in 0..pointings.len() {
        let obs = survey.reader().observations(i).unwrap();
        let mjd = survey.get_mjd_single_pointing(i, false).unwrap();
        let mask = survey.get_mask_single_pointing(i).unwrap();
        assert_eq!(obs.len(), mjd.len());
        assert_eq!(obs.len(), mask.nrows());

        for ((o, t), row) in obs.iter().zip(mjd.iter()).zip(mask.axis_iter(Axis(0))) {
            assert_relative_eq!(*t, o.exp_mjd - 59580.139555, epsilon = 1e-9);
            assert_eq!(row.iter().filter(|&&v| v).count(), 1);
            let band: Band = o.filter.parse().unwrap();
            assert!(row[band.code()]);
        }
    }
}

#[test]
fn test_observations_round_trip() {
    let (_dir, root) = scratch_dir();
    let survey = survey_in(&root, true);
    let pointings = survey.get_pointings(4).unwrap();
    let log = ExposureLog::from_raw(survey_rows());
    survey.match_log(&pointings, &log);

    for (i, (ra, dec)) in pointings.iter().enumerate() {
        let expected = survey.matcher().match_pointing(ra, dec, &log).unwrap();
        let read = survey.reader().observations(i).unwrap();
        assert_eq!(read.len(), expected.len());
        for (actual, expected) in read.iter().zip(&expected.observations) {
            assert_observation_close(actual, expected, 1e-12);
        }
    }
}

#[test]
fn test_resume_is_idempotent() {
    let (_dir, root) = scratch_dir();
    let db_path = root.join("opsim.db");
    write_opsim_db(&db_path, &survey_rows());
    let source = OpsimDatabase::new(&db_path);

    let survey = survey_in(&root, true);
    let pointings = survey.get_pointings(4).unwrap();
    survey.get_obs_info(&pointings, &source).unwrap();

    let snapshot = |i: usize| {
        (
            std::fs::read(survey.store().observations_path(i)).unwrap(),
            std::fs::read(survey.store().epochs_path(i)).unwrap(),
            std::fs::read(survey.store().mask_path(i)).unwrap(),
        )
    };
    let before: Vec<_> = (0..4).map(snapshot).collect();

    let second = survey.get_obs_info(&pointings, &source).unwrap();
    assert_eq!(second.skipped, 4);
    assert_eq!(second.matched, 0);
    let after: Vec<_> = (0..4).map(snapshot).collect();
    assert_eq!(before, after);

    // Without resumption every pointing is recomputed, to identical bytes
    let rerun = survey_in(&root, false);
    let third = rerun.get_obs_info(&pointings, &source).unwrap();
    assert_eq!(third.matched, 4);
    let rewritten: Vec<_> = (0..4).map(snapshot).collect();
    assert_eq!(before, rewritten);
}

#[test]
fn test_csv_source_matches_sqlite() {
    let (_dir, root) = scratch_dir();
    let db_path = root.join("opsim.db");
    let csv_path = root.join("opsim.csv");
    write_opsim_db(&db_path, &survey_rows());

    let mut writer = csv::Writer::from_path(&csv_path).unwrap();
    for row in survey_rows() {
        writer.serialize(row).unwrap();
    }
    writer.flush().unwrap();

    let from_db = OpsimDatabase::new(&db_path).load().unwrap();
    let from_csv = CsvExposureLog::new(&csv_path).load().unwrap();
    assert_eq!(from_db.len(), from_csv.len());
    for (a, b) in from_db.records().iter().zip(from_csv.records()) {
        assert_eq!(a.raw.obs_hist_id, b.raw.obs_hist_id);
        assert_eq!(a.raw.filter, b.raw.filter);
        assert_relative_eq!(a.ra, b.ra, epsilon = 1e-12);
        assert_relative_eq!(a.dec, b.dec, epsilon = 1e-12);
    }
}

#[test]
fn test_missing_exposure_log_is_fatal() {
    let (_dir, root) = scratch_dir();
    let survey = survey_in(&root, true);
    let pointings = survey.get_pointings(2).unwrap();

    let missing = OpsimDatabase::new(&root.join("nope.db"));
    assert!(matches!(
        survey.get_obs_info(&pointings, &missing),
        Err(CadenceError::MissingExposureLog(_))
    ));
    assert!(!survey.store().contains(0));

    let reader = survey.reader();
    assert!(matches!(
        reader.epochs(0, false),
        Err(CadenceError::ArtifactNotFound { index: 0, .. })
    ));
}
