use crate::error::{LinkError, LinkResult};

/// Downlink band definition: (band, F_DL_low in MHz, N_Offs-DL, last EARFCN of the band)
const DL_BANDS: [(u8, f64, u32, u32); 7] = [
    (1, 2110.0, 0, 599),
    (2, 1930.0, 600, 1199),
    (3, 1805.0, 1200, 1949),
    (4, 2110.0, 1950, 2399),
    (5, 869.0, 2400, 2649),
    (7, 2620.0, 2750, 3449),
    (8, 925.0, 3450, 3799),
];

/// Operating band of a downlink EARFCN.
pub fn dl_band(earfcn: u32) -> LinkResult<u8> {
    band_entry(earfcn).map(|(band, _, _, _)| band)
}

/// Downlink carrier frequency in Hz: F_DL = F_DL_low + 0.1 (N_DL - N_Offs-DL) MHz.
pub fn dl_frequency_hz(earfcn: u32) -> LinkResult<f64> {
    let (_, f_dl_low_mhz, n_offs, _) = band_entry(earfcn)?;
    Ok((f_dl_low_mhz + 0.1 * (earfcn - n_offs) as f64) * 1.0e6)
}

fn band_entry(earfcn: u32) -> LinkResult<(u8, f64, u32, u32)> {
    DL_BANDS
        .iter()
        .copied()
        .find(|&(_, _, n_offs, last)| earfcn >= n_offs && earfcn <= last)
        .ok_or_else(|| {
            LinkError::invalid("dl_earfcn", format!("{} is not in a known band", earfcn))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_earfcn_is_band_1() {
        assert_eq!(dl_band(200).unwrap(), 1);
        assert!((dl_frequency_hz(200).unwrap() - 2130.0e6).abs() < 1.0);
    }

    #[test]
    fn band_edges() {
        assert!((dl_frequency_hz(0).unwrap() - 2110.0e6).abs() < 1.0);
        assert_eq!(dl_band(599).unwrap(), 1);
        assert_eq!(dl_band(600).unwrap(), 2);
        assert!((dl_frequency_hz(3450).unwrap() - 925.0e6).abs() < 1.0);
    }

    #[test]
    fn unknown_earfcn() {
        assert!(dl_frequency_hz(2700).is_err());
        assert!(dl_band(100_000).is_err());
    }
}
