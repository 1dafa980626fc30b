//! One link budget validation scenario.
//!
//! A [`ScenarioRunner`] goes Configured -> Running -> Completed exactly once. It
//! computes the expected SINR from the link budget, drives a [`SimulatedPhy`]
//! with itself as the observer, then checks the first SINR sample against the
//! reference within tolerance and every post warm-up MCS decision for equality.

use std::fmt;

use tracing::{debug, info, warn};

use crate::constants::{
    DEFAULT_DURATION_MS, DEFAULT_NOISE_FIGURE_DB, DEFAULT_RESOURCE_BLOCKS, DEFAULT_TX_POWER_DBM,
    SINR_TOLERANCE_DB, THERMAL_NOISE_DENSITY_DBM_PER_HZ,
};
use crate::error::{LinkError, LinkResult};
use crate::link_budget::{resource_blocks_bandwidth_hz, LinkBudgetParameters};
use crate::pathloss::{Environment, PathLoss};
use crate::phy::{PhyObserver, SimulatedPhy};
use crate::scheduling::SchedulingOutcome;
use crate::sinr::SinrAccumulator;

/// Reference values for one UE position.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioCase {
    pub name: String,
    pub reference_sinr_db: f64,
    pub distance_m: f64,
    pub reference_mcs_index: i32,
}

impl ScenarioCase {
    pub fn new(
        name: impl Into<String>,
        reference_sinr_db: f64,
        distance_m: f64,
        reference_mcs_index: i32,
    ) -> ScenarioCase {
        ScenarioCase {
            name: name.into(),
            reference_sinr_db,
            distance_m,
            reference_mcs_index,
        }
    }
}

impl fmt::Display for ScenarioCase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (snr={} mcs={} distance={})",
            self.name, self.reference_sinr_db, self.reference_mcs_index, self.distance_m
        )
    }
}

/// Fixed eNB/UE settings shared by the cases of a suite.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioSettings {
    pub tx_power_dbm: f64,
    pub noise_figure_db: f64,
    pub resource_blocks: u32,
    pub duration_ms: u32,
    pub tolerance_db: f64,
    pub environment: Environment,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            tx_power_dbm: DEFAULT_TX_POWER_DBM,
            noise_figure_db: DEFAULT_NOISE_FIGURE_DB,
            resource_blocks: DEFAULT_RESOURCE_BLOCKS,
            duration_ms: DEFAULT_DURATION_MS,
            tolerance_db: SINR_TOLERANCE_DB,
            environment: Environment::reference(),
        }
    }
}

impl ScenarioSettings {
    pub fn link_budget(&self, path_loss_db: f64) -> LinkResult<LinkBudgetParameters> {
        let budget = LinkBudgetParameters {
            tx_power_dbm: self.tx_power_dbm,
            path_loss_db,
            noise_figure_db: self.noise_figure_db,
            bandwidth_hz: resource_blocks_bandwidth_hz(self.resource_blocks),
            noise_density_dbm_per_hz: THERMAL_NOISE_DENSITY_DBM_PER_HZ,
        };
        budget.validate()?;
        Ok(budget)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenarioState {
    Configured,
    Running,
    Completed { passed: bool },
}

/// Verdict of one scenario, with enough context to reproduce a failure.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioResult {
    pub name: String,
    pub passed: bool,
    pub distance_m: f64,
    pub path_loss_db: f64,
    pub expected_sinr_db: f64,  // from the link budget
    pub reference_sinr_db: f64, // from the fixture
    pub observed_sinr_db: Option<f64>,
    pub tolerance_db: f64,
    pub reference_mcs_index: i32,
    pub observed_mcs: Vec<u8>, // post warm-up TB1 decisions
    pub sample_count: usize,
    pub failure: Option<LinkError>,
    pub diagnostic: String,
    pub trace: Vec<String>,
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let verdict = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "[{}] {}: {}", verdict, self.name, self.diagnostic)
    }
}

pub struct ScenarioRunner {
    case: ScenarioCase,
    settings: ScenarioSettings,
    state: ScenarioState,
    accumulator: SinrAccumulator,
    outcomes: Vec<SchedulingOutcome>,
    mismatch: Option<LinkError>,
    header_logged: bool,
    trace: Vec<String>,
}

impl ScenarioRunner {
    pub fn new(case: ScenarioCase, settings: ScenarioSettings) -> ScenarioRunner {
        debug!(
            snr = case.reference_sinr_db,
            mcs = case.reference_mcs_index,
            distance = case.distance_m,
            "creating scenario {}",
            case.name
        );
        ScenarioRunner {
            case,
            settings,
            state: ScenarioState::Configured,
            accumulator: SinrAccumulator::new(),
            outcomes: Vec::new(),
            mismatch: None,
            header_logged: false,
            trace: Vec::new(),
        }
    }

    pub fn state(&self) -> ScenarioState {
        self.state
    }

    pub fn case(&self) -> &ScenarioCase {
        &self.case
    }

    /// Run the scenario once.
    ///
    /// Non-physical inputs abort with `InvalidParameter`. Missing samples, SINR
    /// outside tolerance and MCS mismatches all complete the scenario as failed
    /// and are reported inside the returned result.
    pub fn run(
        &mut self,
        path_loss: &dyn PathLoss,
        phy: &mut dyn SimulatedPhy,
    ) -> LinkResult<ScenarioResult> {
        if self.state != ScenarioState::Configured {
            return Err(LinkError::invalid(
                "scenario_state",
                format!("scenario '{}' already ran ({:?})", self.case.name, self.state),
            ));
        }

        let prepared = self.prepare(path_loss);
        let (budget, expected_sinr_db) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                self.state = ScenarioState::Completed { passed: false };
                return Err(err);
            }
        };
        info!(
            ptx = budget.tx_power_dbm,
            pn = budget.noise_power_dbm().unwrap_or(f64::NAN),
            nf = budget.noise_figure_db,
            pl = budget.path_loss_db,
            dist = self.case.distance_m,
            expected_sinr_db,
            "link budget"
        );

        self.state = ScenarioState::Running;
        let duration_ms = self.settings.duration_ms;
        if let Err(err) = phy.run(&budget, duration_ms, &mut *self) {
            self.state = ScenarioState::Completed { passed: false };
            return Err(err);
        }

        let accumulator = std::mem::take(&mut self.accumulator);
        let sample_count = accumulator.len();
        let observed = accumulator.first_sinr_db(&self.case.name);
        let observed_sinr_db = observed.as_ref().ok().copied();
        if let Some(observed_db) = observed_sinr_db {
            info!(
                distance = self.case.distance_m,
                calculated = observed_db,
                reference = self.case.reference_sinr_db,
                "observed SINR"
            );
        }

        let tolerance_db = self.settings.tolerance_db;
        let mismatch = self.mismatch.take();
        let (failure, pending) = match observed {
            Err(err) => (Some(err), mismatch),
            Ok(observed_db)
                if !within_tolerance(observed_db, self.case.reference_sinr_db, tolerance_db) =>
            {
                let err = LinkError::ToleranceExceeded {
                    scenario: self.case.name.clone(),
                    expected_db: self.case.reference_sinr_db,
                    observed_db,
                    tolerance_db,
                };
                (Some(err), mismatch)
            }
            Ok(_) => (mismatch, None),
        };

        let observed_mcs: Vec<u8> = self
            .outcomes
            .iter()
            .filter(|o| !o.in_warm_up())
            .map(|o| o.mcs_tb1)
            .collect();

        let passed = failure.is_none();
        let diagnostic = match (&failure, &pending) {
            (Some(err), Some(mismatch)) => format!("{}; also {}", err, mismatch),
            (Some(err), None) => err.to_string(),
            (None, _) => format!(
                "SINR {:.6} dB within {} dB of {:.6} dB, MCS {} in {} scheduled subframes",
                observed_sinr_db.unwrap_or(f64::NAN),
                tolerance_db,
                self.case.reference_sinr_db,
                self.case.reference_mcs_index,
                observed_mcs.len()
            ),
        };
        if passed {
            info!("{}: {}", self.case.name, diagnostic);
        } else {
            warn!("{}: {}", self.case.name, diagnostic);
        }

        self.state = ScenarioState::Completed { passed };
        Ok(ScenarioResult {
            name: self.case.name.clone(),
            passed,
            distance_m: self.case.distance_m,
            path_loss_db: budget.path_loss_db,
            expected_sinr_db,
            reference_sinr_db: self.case.reference_sinr_db,
            observed_sinr_db,
            tolerance_db,
            reference_mcs_index: self.case.reference_mcs_index,
            observed_mcs,
            sample_count,
            failure,
            diagnostic,
            trace: std::mem::take(&mut self.trace),
        })
    }

    fn prepare(&self, path_loss: &dyn PathLoss) -> LinkResult<(LinkBudgetParameters, f64)> {
        let path_loss_db =
            path_loss.path_loss_db(self.case.distance_m, &self.settings.environment)?;
        let budget = self.settings.link_budget(path_loss_db)?;
        let expected = budget.sinr()?;
        Ok((budget, expected.sinr_db))
    }
}

impl PhyObserver for ScenarioRunner {
    fn record_sample(&mut self, sinr_linear: f64) {
        if self.state != ScenarioState::Running {
            warn!(sinr_linear, "SINR sample outside a running scenario dropped");
            return;
        }
        self.accumulator.record(sinr_linear);
    }

    fn record_scheduling_outcome(&mut self, outcome: SchedulingOutcome) {
        if self.state != ScenarioState::Running {
            warn!(%outcome, "scheduling outcome outside a running scenario dropped");
            return;
        }
        if !self.header_logged {
            self.header_logged = true;
            info!("SNR\tRef_MCS\tCalc_MCS");
        }
        self.outcomes.push(outcome);

        // CQI feedback has not reached the eNB yet
        if outcome.in_warm_up() {
            return;
        }

        let line = format!(
            "{}\t{}\t{}",
            self.case.reference_sinr_db, self.case.reference_mcs_index, outcome.mcs_tb1
        );
        info!("{}", line);
        self.trace.push(line);

        let observed = outcome.mcs_tb1 as i32;
        if observed != self.case.reference_mcs_index && self.mismatch.is_none() {
            self.mismatch = Some(LinkError::MismatchError {
                scenario: self.case.name.clone(),
                frame_no: outcome.frame_no,
                subframe_no: outcome.subframe_no,
                expected: self.case.reference_mcs_index,
                observed,
            });
        }
    }
}

/// False for NaN, so a garbage sample can never pass.
fn within_tolerance(observed_db: f64, reference_db: f64, tolerance_db: f64) -> bool {
    (observed_db - reference_db).abs() <= tolerance_db
}

/// Build a fresh runner for `case` and run it once.
pub fn run_scenario(
    case: &ScenarioCase,
    settings: &ScenarioSettings,
    path_loss: &dyn PathLoss,
    phy: &mut dyn SimulatedPhy,
) -> LinkResult<ScenarioResult> {
    ScenarioRunner::new(case.clone(), settings.clone()).run(path_loss, phy)
}
