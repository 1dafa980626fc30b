use std::fmt;

use crate::constants::{WARM_UP_LAST_FRAME, WARM_UP_LAST_SUBFRAME};

/// Downlink scheduling decision reported by the eNB MAC for one subframe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulingOutcome {
    pub frame_no: u32,    // starts at 1
    pub subframe_no: u32, // 1..=10
    pub rnti: u16,
    pub mcs_tb1: u8,
    pub size_tb1: u32, // bytes
    pub mcs_tb2: u8,
    pub size_tb2: u32, // bytes
}

impl SchedulingOutcome {
    /// Before the first CQI report reaches the eNB, the MCS is a placeholder.
    pub fn in_warm_up(&self) -> bool {
        self.frame_no <= WARM_UP_LAST_FRAME && self.subframe_no <= WARM_UP_LAST_SUBFRAME
    }
}

impl fmt::Display for SchedulingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DlScheduling {{ frame: {}, subframe: {}, rnti: {}, tb1: mcs {} / {} B, tb2: mcs {} / {} B }}",
            self.frame_no,
            self.subframe_no,
            self.rnti,
            self.mcs_tb1,
            self.size_tb1,
            self.mcs_tb2,
            self.size_tb2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(frame_no: u32, subframe_no: u32) -> SchedulingOutcome {
        SchedulingOutcome {
            frame_no,
            subframe_no,
            rnti: 1,
            mcs_tb1: 0,
            size_tb1: 0,
            mcs_tb2: 0,
            size_tb2: 0,
        }
    }

    #[test]
    fn first_four_subframes_are_warm_up() {
        for sf in 1..=4 {
            assert!(outcome(1, sf).in_warm_up(), "subframe {sf}");
        }
        assert!(!outcome(1, 5).in_warm_up());
        assert!(!outcome(1, 10).in_warm_up());
    }

    #[test]
    fn later_frames_are_never_warm_up() {
        assert!(!outcome(2, 1).in_warm_up());
        assert!(!outcome(7, 4).in_warm_up());
    }
}
