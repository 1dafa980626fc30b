//! Path loss sources.
//!
//! The scenario runner only needs a path loss in dB for a given distance, so any
//! propagation model is accepted behind the single-method [`PathLoss`] trait.
//! Plain closures of the shape `Fn(f64, &Environment) -> f64` qualify directly.
//! Free space and COST-231 Hata are built in, as is a measured loss table.

use std::f64::consts::PI;

use crate::constants::DEFAULT_DL_EARFCN;
use crate::earfcn;
use crate::error::{LinkError, LinkResult};
use crate::suite::REFERENCE_POSITIONS;

const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Link geometry and carrier seen by a propagation model.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    pub carrier_frequency_hz: f64,
    pub tx_height_m: f64, // eNB antenna
    pub rx_height_m: f64, // UE antenna
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            carrier_frequency_hz: 2130.0e6, // EARFCN 200
            tx_height_m: 30.0,
            rx_height_m: 1.0,
        }
    }
}

impl Environment {
    pub fn from_dl_earfcn(earfcn: u32) -> LinkResult<Environment> {
        Ok(Environment {
            carrier_frequency_hz: earfcn::dl_frequency_hz(earfcn)?,
            ..Environment::default()
        })
    }

    /// Reference geometry on the default downlink carrier.
    pub fn reference() -> Environment {
        Environment::from_dl_earfcn(DEFAULT_DL_EARFCN).unwrap_or_default()
    }
}

/// Anything that turns a distance into a path loss.
pub trait PathLoss {
    fn path_loss_db(&self, distance_m: f64, environment: &Environment) -> LinkResult<f64>;
}

impl<F> PathLoss for F
where
    F: Fn(f64, &Environment) -> f64,
{
    fn path_loss_db(&self, distance_m: f64, environment: &Environment) -> LinkResult<f64> {
        check_distance(distance_m)?;
        Ok(self(distance_m, environment))
    }
}

fn check_distance(distance_m: f64) -> LinkResult<()> {
    if !distance_m.is_finite() || distance_m <= 0.0 {
        return Err(LinkError::invalid(
            "distance_m",
            format!("must be finite and > 0, got {}", distance_m),
        ));
    }
    Ok(())
}

/// Friis free space loss, 20 log10(4 pi d f / c), clamped at 0 dB inside the near field.
#[derive(Clone, Copy, Debug, Default)]
pub struct FreeSpacePathLoss;

impl PathLoss for FreeSpacePathLoss {
    fn path_loss_db(&self, distance_m: f64, environment: &Environment) -> LinkResult<f64> {
        check_distance(distance_m)?;
        let f = environment.carrier_frequency_hz;
        if !f.is_finite() || f <= 0.0 {
            return Err(LinkError::invalid(
                "carrier_frequency_hz",
                format!("must be finite and > 0, got {}", f),
            ));
        }
        let loss = 20.0 * (4.0 * PI * distance_m * f / SPEED_OF_LIGHT).log10();
        Ok(loss.max(0.0))
    }
}

/// COST-231 extension of the Hata urban model for the 1.5-2 GHz band.
///
/// Inputs are clamped to the model's validity range: 1-20 km, 1500-2000 MHz,
/// eNB height 30-200 m and UE height 1-10 m. `metropolitan` adds the 3 dB
/// dense urban correction, otherwise the medium city/suburban form is used.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cost231HataPathLoss {
    pub metropolitan: bool,
}

impl PathLoss for Cost231HataPathLoss {
    fn path_loss_db(&self, distance_m: f64, environment: &Environment) -> LinkResult<f64> {
        check_distance(distance_m)?;
        for (name, value) in [
            ("carrier_frequency_hz", environment.carrier_frequency_hz),
            ("tx_height_m", environment.tx_height_m),
            ("rx_height_m", environment.rx_height_m),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LinkError::invalid(
                    name,
                    format!("must be finite and > 0, got {}", value),
                ));
            }
        }
        let d_km = (distance_m / 1000.0).clamp(1.0, 20.0);
        let f_mhz = (environment.carrier_frequency_hz / 1e6).clamp(1500.0, 2000.0);
        let h_t = environment.tx_height_m.clamp(30.0, 200.0);
        let h_r = environment.rx_height_m.clamp(1.0, 10.0);

        let log_f = f_mhz.log10();
        let log_ht = h_t.log10();

        // UE antenna correction, small/medium city
        let a_hr = (1.1 * log_f - 0.7) * h_r - (1.56 * log_f - 0.8);
        let c_m = if self.metropolitan { 3.0 } else { 0.0 };

        let loss = 46.3 + 33.9 * log_f - 13.82 * log_ht - a_hr
            + (44.9 - 6.55 * log_ht) * d_km.log10()
            + c_m;
        Ok(loss.max(0.0))
    }
}

/// Measured or precomputed losses keyed by distance.
///
/// Distances between two entries are interpolated linearly in log10(distance),
/// which is exact for any log-distance model. Distances outside the table are
/// rejected rather than extrapolated.
#[derive(Clone, Debug)]
pub struct TabulatedPathLoss {
    points: Vec<(f64, f64)>, // (distance m, loss dB), strictly increasing distance
}

impl TabulatedPathLoss {
    pub fn new(mut points: Vec<(f64, f64)>) -> LinkResult<TabulatedPathLoss> {
        if points.is_empty() {
            return Err(LinkError::invalid("path_loss_table", "no entries"));
        }
        for &(distance, loss) in &points {
            check_distance(distance)?;
            if !loss.is_finite() || loss < 0.0 {
                return Err(LinkError::invalid(
                    "path_loss_db",
                    format!("must be finite and >= 0, got {} at {} m", loss, distance),
                ));
            }
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        if points.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(LinkError::invalid(
                "path_loss_table",
                "duplicate distance entries",
            ));
        }
        Ok(TabulatedPathLoss { points })
    }

    /// Losses of the three reference drive-test positions.
    pub fn reference() -> TabulatedPathLoss {
        TabulatedPathLoss {
            points: REFERENCE_POSITIONS.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl PathLoss for TabulatedPathLoss {
    fn path_loss_db(&self, distance_m: f64, _environment: &Environment) -> LinkResult<f64> {
        check_distance(distance_m)?;
        let idx = self.points.partition_point(|&(d, _)| d < distance_m);
        if let Some(&(d, loss)) = self.points.get(idx) {
            if d == distance_m {
                return Ok(loss);
            }
        }
        if idx == 0 || idx == self.points.len() {
            let (first, last) = (self.points[0].0, self.points[self.points.len() - 1].0);
            return Err(LinkError::invalid(
                "distance_m",
                format!("{} m is outside the table range {} m to {} m", distance_m, first, last),
            ));
        }
        let (d0, l0) = self.points[idx - 1];
        let (d1, l1) = self.points[idx];
        let t = (distance_m.log10() - d0.log10()) / (d1.log10() - d0.log10());
        Ok(l0 + t * (l1 - l0))
    }
}
