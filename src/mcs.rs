use std::fmt;

use crate::error::{LinkError, LinkResult};

/// MCS index meaning "no usable MCS", the UE is not scheduled.
pub const NO_MCS: i32 = -1;

/// One row of the SINR to MCS mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct McsBreakpoint {
    pub snr_db_threshold: f64,    // dB, closed lower bound of the row
    pub spectral_efficiency: f64, // bit/s/Hz
    pub mcs_index: i32,           // NO_MCS below the first usable row
}

impl McsBreakpoint {
    pub const fn new(snr_db_threshold: f64, spectral_efficiency: f64, mcs_index: i32) -> Self {
        Self {
            snr_db_threshold,
            spectral_efficiency,
            mcs_index,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.mcs_index >= 0
    }
}

impl fmt::Display for McsBreakpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "McsBreakpoint {{ snr: {:.2} dB, efficiency: {:.5}, mcs: {} }}",
            self.snr_db_threshold, self.spectral_efficiency, self.mcs_index
        )
    }
}

/// SNR (dB), spectral efficiency, MCS index
const REFERENCE_BREAKPOINTS: [(f64, f64, i32); 36] = [
    (-5.0, 0.08024, -1),
    (-4.0, 0.10030, -1),
    (-3.0, 0.12518, -1),
    (-2.0, 0.15589, 0),
    (-1.0, 0.19365, 0),
    (0.0, 0.23983, 2),
    (1.0, 0.29593, 2),
    (2.0, 0.36360, 2),
    (3.0, 0.44451, 4),
    (4.0, 0.54031, 4),
    (5.0, 0.65251, 6),
    (6.0, 0.78240, 6),
    (7.0, 0.93086, 8),
    (8.0, 1.09835, 8),
    (9.0, 1.28485, 10),
    (10.0, 1.48981, 12),
    (11.0, 1.71229, 12),
    (12.0, 1.95096, 14),
    (13.0, 2.20429, 14),
    (14.0, 2.47062, 16),
    (15.0, 2.74826, 18),
    (16.0, 3.03560, 18),
    (17.0, 3.33115, 20),
    (18.0, 3.63355, 20),
    (19.0, 3.94163, 22),
    (20.0, 4.25439, 22),
    (21.0, 4.57095, 24),
    (22.0, 4.89060, 24),
    (23.0, 5.21276, 26),
    (24.0, 5.53693, 26),
    (25.0, 5.86271, 28),
    (26.0, 6.18980, 28),
    (27.0, 6.51792, 28),
    (28.0, 6.84687, 28),
    (29.0, 7.17649, 28),
    (30.0, 7.50663, 28),
];

/// Immutable, ascending breakpoint table with a below-minimum sentinel.
#[derive(Clone, Debug)]
pub struct McsTable {
    breakpoints: Vec<McsBreakpoint>,
    below_minimum: McsBreakpoint,
}

impl McsTable {
    /// Build a table, rejecting empty tables and non-increasing thresholds.
    pub fn new(breakpoints: Vec<McsBreakpoint>) -> LinkResult<McsTable> {
        let first = *breakpoints
            .first()
            .ok_or_else(|| LinkError::invalid("mcs_table", "no breakpoints"))?;
        if let Some(bad) = breakpoints.iter().find(|b| !b.snr_db_threshold.is_finite()) {
            return Err(LinkError::invalid(
                "mcs_table",
                format!("threshold must be finite, got {}", bad.snr_db_threshold),
            ));
        }
        if let Some(bad) = breakpoints
            .iter()
            .find(|b| b.mcs_index < NO_MCS || b.mcs_index > i32::from(u8::MAX))
        {
            return Err(LinkError::invalid(
                "mcs_table",
                format!("MCS index must be in {}..=255, got {}", NO_MCS, bad.mcs_index),
            ));
        }
        if let Some(w) = breakpoints
            .windows(2)
            .find(|w| w[1].snr_db_threshold <= w[0].snr_db_threshold)
        {
            return Err(LinkError::invalid(
                "mcs_table",
                format!(
                    "thresholds must be strictly increasing, {} dB follows {} dB",
                    w[1].snr_db_threshold, w[0].snr_db_threshold
                ),
            ));
        }
        Ok(McsTable {
            breakpoints,
            below_minimum: McsBreakpoint::new(
                f64::NEG_INFINITY,
                first.spectral_efficiency,
                NO_MCS,
            ),
        })
    }

    /// The 36 row table spanning -5 dB to 30 dB in 1 dB steps.
    pub fn reference() -> McsTable {
        let breakpoints = REFERENCE_BREAKPOINTS
            .iter()
            .map(|&(snr, efficiency, mcs)| McsBreakpoint::new(snr, efficiency, mcs))
            .collect::<Vec<_>>();
        let first = breakpoints[0];
        McsTable {
            breakpoints,
            below_minimum: McsBreakpoint::new(f64::NEG_INFINITY, first.spectral_efficiency, NO_MCS),
        }
    }

    /// Row with the greatest threshold <= `sinr_db`, or the sentinel below the table.
    ///
    /// A SINR exactly on a threshold resolves to that row. NaN is treated as
    /// below every threshold.
    pub fn lookup(&self, sinr_db: f64) -> McsBreakpoint {
        let above = self
            .breakpoints
            .partition_point(|b| b.snr_db_threshold <= sinr_db);
        match above {
            0 => self.below_minimum,
            n => self.breakpoints[n - 1],
        }
    }

    pub fn mcs_index(&self, sinr_db: f64) -> i32 {
        self.lookup(sinr_db).mcs_index
    }

    pub fn below_minimum(&self) -> McsBreakpoint {
        self.below_minimum
    }

    pub fn breakpoints(&self) -> &[McsBreakpoint] {
        &self.breakpoints
    }

    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }
}

impl Default for McsTable {
    fn default() -> Self {
        McsTable::reference()
    }
}
