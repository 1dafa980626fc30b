use std::fmt;

use rfconversions::power::{db_to_linear, linear_to_db};

use crate::constants::{
    DEFAULT_NOISE_FIGURE_DB, DEFAULT_RESOURCE_BLOCKS, DEFAULT_TX_POWER_DBM,
    RESOURCE_BLOCK_BANDWIDTH_HZ, THERMAL_NOISE_DENSITY_DBM_PER_HZ,
};
use crate::error::{LinkError, LinkResult};

/// Inputs of a single downlink budget, fixed for the lifetime of a scenario.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkBudgetParameters {
    pub tx_power_dbm: f64,
    pub path_loss_db: f64,
    pub noise_figure_db: f64,
    pub bandwidth_hz: f64,
    pub noise_density_dbm_per_hz: f64, // kT reference, -174 unless overridden
}

impl fmt::Display for LinkBudgetParameters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LinkBudgetParameters {{ Ptx: {} dBm, Pl: {} dB, Fn: {} dB, BW: {} Hz }}",
            self.tx_power_dbm, self.path_loss_db, self.noise_figure_db, self.bandwidth_hz
        )
    }
}

impl LinkBudgetParameters {
    /// Parameters with the reference eNB/UE defaults and the given path loss.
    pub fn with_path_loss(path_loss_db: f64) -> LinkBudgetParameters {
        LinkBudgetParameters {
            tx_power_dbm: DEFAULT_TX_POWER_DBM,
            path_loss_db,
            noise_figure_db: DEFAULT_NOISE_FIGURE_DB,
            bandwidth_hz: resource_blocks_bandwidth_hz(DEFAULT_RESOURCE_BLOCKS),
            noise_density_dbm_per_hz: THERMAL_NOISE_DENSITY_DBM_PER_HZ,
        }
    }

    pub fn validate(&self) -> LinkResult<()> {
        if !self.path_loss_db.is_finite() || self.path_loss_db < 0.0 {
            return Err(LinkError::invalid(
                "path_loss_db",
                format!("must be finite and >= 0, got {}", self.path_loss_db),
            ));
        }
        if !self.bandwidth_hz.is_finite() || self.bandwidth_hz <= 0.0 {
            return Err(LinkError::invalid(
                "bandwidth_hz",
                format!("must be finite and > 0, got {}", self.bandwidth_hz),
            ));
        }
        if !self.tx_power_dbm.is_finite() {
            return Err(LinkError::invalid(
                "tx_power_dbm",
                format!("must be finite, got {}", self.tx_power_dbm),
            ));
        }
        if !self.noise_figure_db.is_finite() {
            return Err(LinkError::invalid(
                "noise_figure_db",
                format!("must be finite, got {}", self.noise_figure_db),
            ));
        }
        Ok(())
    }

    /// Thermal noise power over the bandwidth, dBm (kT + 10 log10(B)).
    pub fn noise_power_dbm(&self) -> LinkResult<f64> {
        self.validate()?;
        Ok(self.noise_density_dbm_per_hz + linear_to_db(self.bandwidth_hz))
    }

    /// Receiver noise power in watts, noise figure included.
    pub fn noise_linear(&self) -> LinkResult<f64> {
        let noise_power_dbm = self.noise_power_dbm()?;
        let noise_linear = db_to_linear(noise_power_dbm - 30.0 + self.noise_figure_db);
        if !(noise_linear > 0.0) || !noise_linear.is_finite() {
            return Err(LinkError::invalid(
                "noise_figure_db",
                format!("noise power must be > 0 W, got {}", noise_linear),
            ));
        }
        Ok(noise_linear)
    }

    /// Transmit power in watts.
    pub fn tx_power_linear(&self) -> f64 {
        db_to_linear(self.tx_power_dbm - 30.0)
    }

    /// Received power in watts after path loss.
    pub fn received_power_linear(&self) -> LinkResult<f64> {
        self.validate()?;
        Ok(self.tx_power_linear() / db_to_linear(self.path_loss_db))
    }

    pub fn sinr(&self) -> LinkResult<SinrResult> {
        let noise_linear = self.noise_linear()?;
        let received_linear = self.received_power_linear()?;
        SinrResult::from_linear(received_linear / noise_linear)
    }
}

/// Bandwidth of `resource_blocks` LTE resource blocks, Hz.
pub fn resource_blocks_bandwidth_hz(resource_blocks: u32) -> f64 {
    resource_blocks as f64 * RESOURCE_BLOCK_BANDWIDTH_HZ
}

/// Signal to interference plus noise ratio, kept in both domains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinrResult {
    pub sinr_linear: f64,
    pub sinr_db: f64,
}

impl SinrResult {
    pub fn from_linear(sinr_linear: f64) -> LinkResult<SinrResult> {
        if !(sinr_linear > 0.0) || !sinr_linear.is_finite() {
            return Err(LinkError::invalid(
                "sinr_linear",
                format!("must be finite and > 0, got {}", sinr_linear),
            ));
        }
        Ok(SinrResult {
            sinr_linear,
            sinr_db: linear_to_db(sinr_linear),
        })
    }
}

impl fmt::Display for SinrResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.6} dB ({:.6e} linear)", self.sinr_db, self.sinr_linear)
    }
}

/// Compute the SINR of a single link, failing fast on non-physical inputs.
pub fn compute_sinr(
    tx_power_dbm: f64,
    path_loss_db: f64,
    noise_figure_db: f64,
    bandwidth_hz: f64,
) -> LinkResult<SinrResult> {
    LinkBudgetParameters {
        tx_power_dbm,
        path_loss_db,
        noise_figure_db,
        bandwidth_hz,
        noise_density_dbm_per_hz: THERMAL_NOISE_DENSITY_DBM_PER_HZ,
    }
    .sinr()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64, tol: f64, msg: &str) {
        assert!(
            (actual - expected).abs() < tol,
            "{msg}: expected {expected:.6}, got {actual:.6}"
        );
    }

    #[test]
    fn reference_noise_floor() {
        let params = LinkBudgetParameters::with_path_loss(0.0);
        assert_eq!(params.bandwidth_hz, 4.5e6);
        assert_approx(
            params.noise_power_dbm().unwrap(),
            -107.467875,
            1e-6,
            "kT + 10log10(25 RB)",
        );
    }

    #[test]
    fn reference_sinr_100m() {
        let sinr = compute_sinr(30.0, 81.057184, 9.0, 25.0 * 180_000.0).unwrap();
        assert_approx(sinr.sinr_db, 47.410691, 1e-5, "SINR at 100 m");
    }

    #[test]
    fn reference_sinr_500m() {
        let sinr = compute_sinr(30.0, 134.081310, 9.0, 25.0 * 180_000.0).unwrap();
        assert_approx(sinr.sinr_db, -5.613435, 1e-5, "SINR at 500 m");
    }

    #[test]
    fn reference_sinr_1500m() {
        let sinr = compute_sinr(30.0, 144.259958, 9.0, 25.0 * 180_000.0).unwrap();
        assert_approx(sinr.sinr_db, -15.792083, 1e-5, "SINR at 1500 m");
    }

    #[test]
    fn deterministic() {
        let a = compute_sinr(30.0, 100.0, 9.0, 4.5e6).unwrap();
        let b = compute_sinr(30.0, 100.0, 9.0, 4.5e6).unwrap();
        assert_eq!(a.sinr_db.to_bits(), b.sinr_db.to_bits());
        assert_eq!(a.sinr_linear.to_bits(), b.sinr_linear.to_bits());
    }

    #[test]
    fn more_path_loss_less_sinr() {
        let mut previous = f64::INFINITY;
        for loss in [0.0, 0.5, 10.0, 81.0, 81.1, 134.0, 200.0] {
            let sinr = compute_sinr(30.0, loss, 9.0, 4.5e6).unwrap().sinr_db;
            assert!(sinr < previous, "loss {loss} gave {sinr}, previous {previous}");
            previous = sinr;
        }
    }

    #[test]
    fn db_and_linear_agree() {
        for loss in [60.0, 81.057184, 120.0, 144.259958] {
            let sinr = compute_sinr(30.0, loss, 9.0, 4.5e6).unwrap();
            let back = 10f64.powf(sinr.sinr_db / 10.0);
            assert!((back - sinr.sinr_linear).abs() <= 1e-9 * sinr.sinr_linear);
        }
    }

    #[test]
    fn negative_path_loss_rejected() {
        let err = compute_sinr(30.0, -1.0, 9.0, 4.5e6).unwrap_err();
        assert!(matches!(
            err,
            LinkError::InvalidParameter { name: "path_loss_db", .. }
        ));
    }

    #[test]
    fn zero_bandwidth_rejected() {
        let err = compute_sinr(30.0, 80.0, 9.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            LinkError::InvalidParameter { name: "bandwidth_hz", .. }
        ));
        assert!(compute_sinr(30.0, 80.0, 9.0, -180_000.0).is_err());
    }

    #[test]
    fn vanishing_noise_rejected() {
        // 10^(-4000/10) underflows to zero watts
        let err = compute_sinr(30.0, 80.0, -4000.0, 4.5e6).unwrap_err();
        assert!(matches!(
            err,
            LinkError::InvalidParameter { name: "noise_figure_db", .. }
        ));
    }
}
