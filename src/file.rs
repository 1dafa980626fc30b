use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::constants::{
    DEFAULT_DL_EARFCN, DEFAULT_DURATION_MS, DEFAULT_NOISE_FIGURE_DB, DEFAULT_RESOURCE_BLOCKS,
    DEFAULT_TX_POWER_DBM, SINR_TOLERANCE_DB,
};
use crate::error::{LinkError, LinkResult};
use crate::mcs::McsTable;
use crate::pathloss::{
    Cost231HataPathLoss, Environment, FreeSpacePathLoss, PathLoss, TabulatedPathLoss,
};
use crate::scenario::{ScenarioCase, ScenarioSettings};
use crate::suite::{reference_case, ScenarioSuite};

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    pub name: Option<String>,
    pub tx_power_dbm: Option<f64>,
    pub noise_figure_db: Option<f64>,
    pub resource_blocks: Option<u32>,
    pub duration_ms: Option<u32>,
    pub dl_earfcn: Option<u32>,
    pub tolerance_db: Option<f64>,
    #[serde(default)]
    pub path_loss_model: PathLossModel,
    pub scenarios: Vec<ScenarioConfig>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PathLossModel {
    /// Every scenario carries its own `path_loss_db`
    #[default]
    Table,
    FreeSpace,
    /// COST-231 Hata, `metropolitan` adds the dense urban correction
    Cost231Hata {
        #[serde(default)]
        metropolitan: bool,
    },
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    pub name: Option<String>,
    pub distance_m: f64,
    pub path_loss_db: Option<f64>,
    pub reference_sinr_db: Option<f64>,
    pub reference_mcs: Option<i32>,
}

pub fn parse_suite_config(content: &str) -> LinkResult<SuiteConfig> {
    let config: SuiteConfig = toml::from_str(content)?;
    debug!("Config: {:#?}", config);
    Ok(config)
}

pub fn load_suite(path: &str) -> LinkResult<ScenarioSuite> {
    info!("Loading Config: {}", path);
    let content = fs::read_to_string(path)?;
    let config = parse_suite_config(&content)?;
    let default_name = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());
    build_suite(config, &default_name)
}

/// Turn a parsed config into a registered suite, filling in omitted references.
pub fn build_suite(config: SuiteConfig, default_name: &str) -> LinkResult<ScenarioSuite> {
    if config.scenarios.is_empty() {
        return Err(LinkError::Config("no [[scenarios]] defined".to_string()));
    }
    let settings = ScenarioSettings {
        tx_power_dbm: config.tx_power_dbm.unwrap_or(DEFAULT_TX_POWER_DBM),
        noise_figure_db: config.noise_figure_db.unwrap_or(DEFAULT_NOISE_FIGURE_DB),
        resource_blocks: config.resource_blocks.unwrap_or(DEFAULT_RESOURCE_BLOCKS),
        duration_ms: config.duration_ms.unwrap_or(DEFAULT_DURATION_MS),
        tolerance_db: config.tolerance_db.unwrap_or(SINR_TOLERANCE_DB),
        environment: Environment::from_dl_earfcn(config.dl_earfcn.unwrap_or(DEFAULT_DL_EARFCN))?,
    };
    if !settings.tolerance_db.is_finite() || settings.tolerance_db < 0.0 {
        return Err(LinkError::invalid(
            "tolerance_db",
            format!("must be finite and >= 0, got {}", settings.tolerance_db),
        ));
    }

    let path_loss: Box<dyn PathLoss> = match config.path_loss_model {
        PathLossModel::Table => {
            let mut points = Vec::with_capacity(config.scenarios.len());
            for (i, scenario) in config.scenarios.iter().enumerate() {
                let loss = scenario.path_loss_db.ok_or_else(|| {
                    LinkError::Config(format!(
                        "scenario {} has no path_loss_db and path_loss_model is table",
                        i
                    ))
                })?;
                if !points.contains(&(scenario.distance_m, loss)) {
                    points.push((scenario.distance_m, loss));
                }
            }
            Box::new(TabulatedPathLoss::new(points)?)
        }
        PathLossModel::FreeSpace => Box::new(FreeSpacePathLoss),
        PathLossModel::Cost231Hata { metropolitan } => {
            Box::new(Cost231HataPathLoss { metropolitan })
        }
    };

    let table = McsTable::reference();
    let mut cases: Vec<ScenarioCase> = Vec::with_capacity(config.scenarios.len());
    for scenario in config.scenarios {
        let path_loss_db = path_loss.path_loss_db(scenario.distance_m, &settings.environment)?;
        let derived = reference_case(
            &settings,
            &table,
            scenario.distance_m,
            path_loss_db,
            scenario.name,
        )?;
        cases.push(ScenarioCase {
            reference_sinr_db: scenario.reference_sinr_db.unwrap_or(derived.reference_sinr_db),
            reference_mcs_index: scenario.reference_mcs.unwrap_or(derived.reference_mcs_index),
            ..derived
        });
    }

    let mut suite = ScenarioSuite::new(
        config.name.unwrap_or_else(|| default_name.to_string()),
        settings,
        path_loss,
    );
    for case in cases {
        suite.register(case);
    }
    Ok(suite)
}
