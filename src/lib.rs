#[cfg(feature = "cli")]
pub mod cli;
pub mod constants;
pub mod earfcn;
mod error;
mod file;
mod link_budget;
mod mcs;
mod pathloss;
mod phy;
#[cfg(feature = "report")]
pub mod report;
mod scenario;
mod scheduling;
mod sinr;
mod suite;

pub use error::{LinkError, LinkResult};
pub use file::{build_suite, load_suite, parse_suite_config, PathLossModel, ScenarioConfig, SuiteConfig};
pub use link_budget::{compute_sinr, resource_blocks_bandwidth_hz, LinkBudgetParameters, SinrResult};
pub use mcs::{McsBreakpoint, McsTable, NO_MCS};
pub use pathloss::{
    Cost231HataPathLoss, Environment, FreeSpacePathLoss, PathLoss, TabulatedPathLoss,
};
pub use phy::{PhyObserver, ReferenceDownlink, SimulatedPhy};
pub use scenario::{
    run_scenario, ScenarioCase, ScenarioResult, ScenarioRunner, ScenarioSettings, ScenarioState,
};
pub use scheduling::SchedulingOutcome;
pub use sinr::SinrAccumulator;
pub use suite::{reference_case, ScenarioSuite, SuiteReport, REFERENCE_POSITIONS};
