//! Display labels for the four observation blocks.

use crate::models::{HourSlot, TimeMode};

/// Label shown on the tab for `slot` under `mode`.
pub fn hour_label(slot: HourSlot, mode: TimeMode) -> &'static str {
    match (mode, slot) {
        (TimeMode::Standard, HourSlot::First) => "21:00 SDT",
        (TimeMode::Standard, HourSlot::Second) => "23:00 SDT",
        (TimeMode::Standard, HourSlot::Third) => "01:00 SDT",
        (TimeMode::Standard, HourSlot::Fourth) => "03:00 SDT",
        (TimeMode::Daylight, HourSlot::First) => "22:00 DST",
        (TimeMode::Daylight, HourSlot::Second) => "00:00 DST",
        (TimeMode::Daylight, HourSlot::Third) => "02:00 DST",
        (TimeMode::Daylight, HourSlot::Fourth) => "04:00 DST",
    }
}

/// Labels for all four tabs, in slot order.
pub fn tab_labels(mode: TimeMode) -> [&'static str; 4] {
    HourSlot::ALL.map(|slot| hour_label(slot, mode))
}
