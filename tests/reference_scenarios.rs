//! Integration tests: the three reference UE positions.
//!
//! One eNB at 30 m height, one UE at 1 m height, 25 resource blocks at 30 dBm,
//! 9 dB UE noise figure and deterministic losses from the drive test.

use mcslineup::{
    run_scenario, LinkBudgetParameters, McsTable, ReferenceDownlink, ScenarioCase,
    ScenarioSettings, ScenarioSuite, TabulatedPathLoss, NO_MCS,
};

/// Helper: assert float equality within tolerance
fn assert_approx(actual: f64, expected: f64, tol: f64, msg: &str) {
    assert!(
        (actual - expected).abs() < tol,
        "{msg}: expected {expected:.6}, got {actual:.6}"
    );
}

fn run_reference(distance_m: f64, path_loss_db: f64) -> mcslineup::ScenarioResult {
    let settings = ScenarioSettings::default();
    let case = mcslineup::reference_case(
        &settings,
        &McsTable::reference(),
        distance_m,
        path_loss_db,
        None,
    )
    .unwrap();
    run_scenario(
        &case,
        &settings,
        &TabulatedPathLoss::reference(),
        &mut ReferenceDownlink::default(),
    )
    .unwrap()
}

#[test]
fn near_ue_100m() {
    let result = run_reference(100.0, 81.057184);
    assert!(result.passed, "{}", result);
    assert_approx(result.expected_sinr_db, 47.410691, 1e-5, "expected SINR");
    assert_approx(result.observed_sinr_db.unwrap(), 47.410691, 0.001, "observed SINR");
    assert_eq!(result.reference_mcs_index, 28);
    assert_eq!(result.observed_mcs, vec![28]);
}

#[test]
fn mid_ue_500m() {
    let result = run_reference(500.0, 134.081310);
    assert!(result.passed, "{}", result);
    assert_approx(result.expected_sinr_db, -5.613435, 1e-5, "expected SINR");
    // below the -5 dB row: no usable MCS, so nothing is granted after CQI
    assert_eq!(result.reference_mcs_index, NO_MCS);
    assert!(result.observed_mcs.is_empty());
}

#[test]
fn far_ue_1500m() {
    let result = run_reference(1500.0, 144.259958);
    assert!(result.passed, "{}", result);
    assert_approx(result.expected_sinr_db, -15.792083, 1e-5, "expected SINR");
    assert_eq!(result.reference_mcs_index, NO_MCS);
    assert_eq!(result.sample_count, 5);
}

#[test]
fn longer_run_checks_every_post_warm_up_subframe() {
    let settings = ScenarioSettings {
        duration_ms: 40,
        ..ScenarioSettings::default()
    };
    let case = ScenarioCase::new("100 m, 40 ms", 47.410691, 100.0, 28);
    let result = run_scenario(
        &case,
        &settings,
        &TabulatedPathLoss::reference(),
        &mut ReferenceDownlink::default(),
    )
    .unwrap();
    assert!(result.passed, "{}", result);
    assert_eq!(result.sample_count, 40);
    assert_eq!(result.observed_mcs.len(), 36);
    assert_eq!(result.trace.len(), 36);
    assert!(result.trace.iter().all(|l| l == "47.410691\t28\t28"));
}

#[test]
fn warm_up_subframes_use_default_mcs_and_are_not_checked() {
    // MCS 0 is scheduled for subframes 1-4, yet the 28 reference holds
    let case = ScenarioCase::new("100 m", 47.410691, 100.0, 28);
    let settings = ScenarioSettings {
        duration_ms: 10,
        ..ScenarioSettings::default()
    };
    let result = run_scenario(
        &case,
        &settings,
        &TabulatedPathLoss::reference(),
        &mut ReferenceDownlink::default(),
    )
    .unwrap();
    assert!(result.passed, "{}", result);
    assert_eq!(result.observed_mcs, vec![28; 6]);
}

#[test]
fn reference_suite_end_to_end() {
    let suite = ScenarioSuite::reference().unwrap();
    let report = suite.run_all(&mut ReferenceDownlink::default()).unwrap();
    assert!(report.all_passed(), "{}", report);
    for (result, (distance, loss)) in report.results.iter().zip(mcslineup::REFERENCE_POSITIONS) {
        assert_eq!(result.distance_m, distance);
        assert_eq!(result.path_loss_db, loss);
        let expected = LinkBudgetParameters::with_path_loss(loss).sinr().unwrap();
        assert_eq!(result.expected_sinr_db, expected.sinr_db);
    }
}
