/// Reference thermal noise power spectral density (kT at 290 K) in dBm/Hz.
pub const THERMAL_NOISE_DENSITY_DBM_PER_HZ: f64 = -174.0;

/// Bandwidth of one LTE resource block in Hz (12 subcarriers x 15 kHz).
pub const RESOURCE_BLOCK_BANDWIDTH_HZ: f64 = 180_000.0;

/// Default downlink bandwidth in resource blocks (5 MHz carrier).
pub const DEFAULT_RESOURCE_BLOCKS: u32 = 25;

/// Default eNB transmit power over the whole bandwidth, dBm.
pub const DEFAULT_TX_POWER_DBM: f64 = 30.0;

/// Default UE receiver noise figure, dB.
pub const DEFAULT_NOISE_FIGURE_DB: f64 = 9.0;

/// Default simulated run length, in 1 ms subframes.
pub const DEFAULT_DURATION_MS: u32 = 5;

/// Absolute SINR tolerance, dB.
pub const SINR_TOLERANCE_DB: f64 = 0.001;

/// Downlink EARFCN used by the reference scenarios.
pub const DEFAULT_DL_EARFCN: u32 = 200;

/// Subframes per LTE radio frame.
pub const SUBFRAMES_PER_FRAME: u32 = 10;

/// Scheduling outcomes at or before this frame and subframe predate CQI feedback.
pub const WARM_UP_LAST_FRAME: u32 = 1;
pub const WARM_UP_LAST_SUBFRAME: u32 = 4;
