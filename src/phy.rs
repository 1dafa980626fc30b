//! Boundary to the simulated downlink PHY/MAC.
//!
//! A [`SimulatedPhy`] runs for a fixed number of 1 ms subframes and pushes its
//! measurements into a [`PhyObserver`] handed to it for the duration of the run.
//! [`ReferenceDownlink`] is a deterministic single cell, single UE stand-in that
//! reproduces the timing of a real eNB: SINR every subframe, scheduling decisions
//! on a robust default MCS until CQI feedback arrives.

use tracing::debug;

use crate::constants::SUBFRAMES_PER_FRAME;
use crate::error::{LinkError, LinkResult};
use crate::link_budget::LinkBudgetParameters;
use crate::mcs::McsTable;
use crate::scheduling::SchedulingOutcome;

/// Receives measurement events while a simulated run is in progress.
pub trait PhyObserver {
    fn record_sample(&mut self, sinr_linear: f64);
    fn record_scheduling_outcome(&mut self, outcome: SchedulingOutcome);
}

/// A simulated downlink that can be driven for a fixed duration.
pub trait SimulatedPhy {
    fn run(
        &mut self,
        budget: &LinkBudgetParameters,
        duration_ms: u32,
        observer: &mut dyn PhyObserver,
    ) -> LinkResult<()>;
}

/// Ideal single-link downlink: no fading, no interference, fixed CQI delay.
#[derive(Clone, Debug)]
pub struct ReferenceDownlink {
    pub table: McsTable,
    pub rnti: u16,
    pub cqi_delay_subframes: u32,
    pub default_mcs: u8, // used until the first CQI report
}

impl Default for ReferenceDownlink {
    fn default() -> Self {
        Self {
            table: McsTable::reference(),
            rnti: 1,
            cqi_delay_subframes: 4,
            default_mcs: 0,
        }
    }
}

impl ReferenceDownlink {
    pub fn new(table: McsTable) -> ReferenceDownlink {
        ReferenceDownlink {
            table,
            ..ReferenceDownlink::default()
        }
    }

    fn efficiency_of(&self, mcs: u8) -> f64 {
        self.table
            .breakpoints()
            .iter()
            .find(|b| b.mcs_index == mcs as i32)
            .unwrap_or(&self.table.below_minimum())
            .spectral_efficiency
    }
}

/// Transport block size in bytes carried in one subframe.
fn transport_block_bytes(spectral_efficiency: f64, bandwidth_hz: f64) -> u32 {
    (spectral_efficiency * bandwidth_hz * 1.0e-3 / 8.0).floor() as u32
}

impl SimulatedPhy for ReferenceDownlink {
    fn run(
        &mut self,
        budget: &LinkBudgetParameters,
        duration_ms: u32,
        observer: &mut dyn PhyObserver,
    ) -> LinkResult<()> {
        let sinr = budget.sinr()?;
        let measured = self.table.lookup(sinr.sinr_db);
        debug!(sinr_db = sinr.sinr_db, mcs = measured.mcs_index, "downlink run");
        let scheduled_mcs = if measured.is_usable() {
            let mcs = u8::try_from(measured.mcs_index).map_err(|_| {
                LinkError::invalid(
                    "mcs_index",
                    format!("{} does not fit the DCI MCS field", measured.mcs_index),
                )
            })?;
            Some(mcs)
        } else {
            None
        };

        for tti in 0..duration_ms {
            let frame_no = tti / SUBFRAMES_PER_FRAME + 1;
            let subframe_no = tti % SUBFRAMES_PER_FRAME + 1;

            observer.record_sample(sinr.sinr_linear);

            let (mcs, efficiency) = if tti < self.cqi_delay_subframes {
                (self.default_mcs, self.efficiency_of(self.default_mcs))
            } else if let Some(mcs) = scheduled_mcs {
                (mcs, measured.spectral_efficiency)
            } else {
                // CQI says out of range, nothing is granted
                continue;
            };

            observer.record_scheduling_outcome(SchedulingOutcome {
                frame_no,
                subframe_no,
                rnti: self.rnti,
                mcs_tb1: mcs,
                size_tb1: transport_block_bytes(efficiency, budget.bandwidth_hz),
                mcs_tb2: 0,
                size_tb2: 0,
            });
        }
        Ok(())
    }
}
