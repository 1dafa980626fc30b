//! Integration tests: breakpoint table lookup over the whole real line.

use mcslineup::{McsBreakpoint, McsTable, NO_MCS};

#[test]
fn lookup_is_total() {
    let table = McsTable::reference();
    let mut sinr_db = -60.0;
    while sinr_db <= 60.0 {
        let row = table.lookup(sinr_db);
        assert!(
            row.snr_db_threshold <= sinr_db,
            "{sinr_db} dB mapped to {row}"
        );
        let matching = table
            .breakpoints()
            .iter()
            .filter(|b| b.snr_db_threshold <= sinr_db)
            .last();
        match matching {
            Some(b) => assert_eq!(row, *b),
            None => assert_eq!(row.mcs_index, NO_MCS),
        }
        sinr_db += 0.25;
    }
}

#[test]
fn mcs_never_decreases_with_sinr() {
    let table = McsTable::reference();
    let mut previous = i32::MIN;
    for tenth in -100..=400 {
        let mcs = table.mcs_index(tenth as f64 / 10.0);
        assert!(mcs >= previous);
        previous = mcs;
    }
}

#[test]
fn exact_threshold_takes_the_higher_row() {
    let table = McsTable::reference();
    // 9 dB -> MCS 10, 10 dB -> MCS 12
    assert_eq!(table.mcs_index(10.0), 12);
    assert_eq!(table.mcs_index(10.0 - f64::EPSILON * 16.0), 10);
    assert_eq!(table.mcs_index(-2.0), 0);
    assert_eq!(table.mcs_index(-2.000001), NO_MCS);
}

#[test]
fn custom_table_sentinel_uses_lowest_row_efficiency() {
    let table = McsTable::new(vec![
        McsBreakpoint::new(2.0, 0.5, 3),
        McsBreakpoint::new(8.0, 1.5, 9),
    ])
    .unwrap();
    assert_eq!(table.mcs_index(1.0), NO_MCS);
    assert_eq!(table.lookup(1.0).spectral_efficiency, 0.5);
    assert_eq!(table.mcs_index(2.0), 3);
    assert_eq!(table.mcs_index(100.0), 9);
}
