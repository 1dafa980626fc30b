use std::fmt;

use tracing::info;

use crate::error::LinkResult;
use crate::mcs::McsTable;
use crate::pathloss::{PathLoss, TabulatedPathLoss};
use crate::phy::SimulatedPhy;
use crate::scenario::{ScenarioCase, ScenarioResult, ScenarioRunner, ScenarioSettings};

/// Distances (m) and measured losses (dB) of the reference drive test.
pub const REFERENCE_POSITIONS: [(f64, f64); 3] =
    [(100.0, 81.057184), (500.0, 134.081310), (1500.0, 144.259958)];

/// An explicit, ordered registry of scenarios sharing one setup.
pub struct ScenarioSuite {
    pub name: String,
    pub settings: ScenarioSettings,
    cases: Vec<ScenarioCase>,
    path_loss: Box<dyn PathLoss>,
}

impl fmt::Debug for ScenarioSuite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ScenarioSuite")
            .field("name", &self.name)
            .field("settings", &self.settings)
            .field("cases", &self.cases)
            .finish_non_exhaustive()
    }
}

impl ScenarioSuite {
    pub fn new(
        name: impl Into<String>,
        settings: ScenarioSettings,
        path_loss: Box<dyn PathLoss>,
    ) -> ScenarioSuite {
        ScenarioSuite {
            name: name.into(),
            settings,
            cases: Vec::new(),
            path_loss,
        }
    }

    /// The three position pathloss suite: 100 m, 500 m and 1500 m from the eNB.
    pub fn reference() -> LinkResult<ScenarioSuite> {
        let settings = ScenarioSettings::default();
        let table = McsTable::reference();
        let mut suite = ScenarioSuite::new(
            "lte-pathloss-model",
            settings,
            Box::new(TabulatedPathLoss::reference()),
        );
        for (distance_m, path_loss_db) in REFERENCE_POSITIONS {
            let case = reference_case(&suite.settings, &table, distance_m, path_loss_db, None)?;
            suite.register(case);
        }
        Ok(suite)
    }

    pub fn register(&mut self, case: ScenarioCase) -> &mut Self {
        self.cases.push(case);
        self
    }

    pub fn cases(&self) -> &[ScenarioCase] {
        &self.cases
    }

    /// Run every case in order with a fresh runner each.
    ///
    /// Failed comparisons are collected; an invalid parameter stops the suite.
    pub fn run_all(&self, phy: &mut dyn SimulatedPhy) -> LinkResult<SuiteReport> {
        info!(suite = %self.name, cases = self.cases.len(), "running suite");
        let mut results = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            let mut runner = ScenarioRunner::new(case.clone(), self.settings.clone());
            results.push(runner.run(self.path_loss.as_ref(), phy)?);
        }
        let report = SuiteReport {
            suite: self.name.clone(),
            results,
        };
        info!("{}", report.summary());
        Ok(report)
    }
}

/// Derive a case from a known loss: SINR from the link budget, MCS from the table.
pub fn reference_case(
    settings: &ScenarioSettings,
    table: &McsTable,
    distance_m: f64,
    path_loss_db: f64,
    name: Option<String>,
) -> LinkResult<ScenarioCase> {
    let sinr = settings.link_budget(path_loss_db)?.sinr()?;
    let mcs_index = table.mcs_index(sinr.sinr_db);
    let name = name.unwrap_or_else(|| format!(" snr= {} dB,  mcs= {}", sinr.sinr_db, mcs_index));
    Ok(ScenarioCase::new(name, sinr.sinr_db, distance_m, mcs_index))
}

#[derive(Clone, Debug, PartialEq)]
pub struct SuiteReport {
    pub suite: String,
    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} scenarios, {} passed, {} failed",
            self.suite,
            self.results.len(),
            self.passed(),
            self.failed()
        )
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{}", result)?;
        }
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcs::NO_MCS;
    use crate::phy::ReferenceDownlink;

    #[test]
    fn reference_suite_registers_three_cases() {
        let suite = ScenarioSuite::reference().unwrap();
        let cases = suite.cases();
        assert_eq!(cases.len(), 3);
        assert_eq!(
            cases.iter().map(|c| c.distance_m).collect::<Vec<_>>(),
            vec![100.0, 500.0, 1500.0]
        );
        assert_eq!(
            cases.iter().map(|c| c.reference_mcs_index).collect::<Vec<_>>(),
            vec![28, NO_MCS, NO_MCS]
        );
        assert!(cases[0].name.starts_with(" snr= 47.41"));
    }

    #[test]
    fn reference_suite_passes() {
        let suite = ScenarioSuite::reference().unwrap();
        let report = suite.run_all(&mut ReferenceDownlink::default()).unwrap();
        assert!(report.all_passed(), "{}", report);
        assert_eq!(report.passed(), 3);
    }

    #[test]
    fn failures_do_not_stop_the_suite() {
        let mut suite = ScenarioSuite::new(
            "mixed",
            ScenarioSettings::default(),
            Box::new(TabulatedPathLoss::reference()),
        );
        suite
            .register(ScenarioCase::new("wrong sinr", 10.0, 100.0, 28))
            .register(ScenarioCase::new("wrong mcs", 47.410691, 100.0, 26))
            .register(ScenarioCase::new("good", 47.410691, 100.0, 28));
        let report = suite.run_all(&mut ReferenceDownlink::default()).unwrap();
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.failed(), 2);
        assert!(report.results[2].passed);
        assert_eq!(report.summary(), "mixed: 3 scenarios, 1 passed, 2 failed");
    }

    #[test]
    fn invalid_distance_stops_the_suite() {
        let mut suite = ScenarioSuite::new(
            "broken",
            ScenarioSettings::default(),
            Box::new(TabulatedPathLoss::reference()),
        );
        suite.register(ScenarioCase::new("too far", 0.0, 5000.0, 0));
        assert!(suite.run_all(&mut ReferenceDownlink::default()).is_err());
    }
}
