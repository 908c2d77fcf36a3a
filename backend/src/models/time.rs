use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar month used to look up optimal constellation visibility.
///
/// Always holds a value in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    pub const JANUARY: Month = Month(1);

    /// Create a month from its number, `None` outside `1..=12`.
    pub fn new(value: u8) -> Option<Self> {
        (1..=12).contains(&value).then_some(Self(value))
    }

    /// Month number in `1..=12`.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// English month name.
    pub fn name(&self) -> &'static str {
        chrono::Month::try_from(self.0)
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }

    /// All twelve months in calendar order.
    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12).map(Month)
    }
}

impl Default for Month {
    fn default() -> Self {
        Self::JANUARY
    }
}

impl TryFrom<u8> for Month {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Month::new(value).ok_or_else(|| format!("Month must be between 1 and 12, got {}", value))
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name for a raw month number; "Unknown" when out of range.
pub fn month_name(n: i64) -> &'static str {
    u8::try_from(n)
        .ok()
        .and_then(Month::new)
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

/// Clock convention used to label the observation blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    /// Standard time, labels suffixed "SDT".
    #[default]
    Standard,
    /// Daylight saving time, labels suffixed "DST".
    Daylight,
}

impl TimeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeMode::Standard => "standard",
            TimeMode::Daylight => "daylight",
        }
    }
}

impl FromStr for TimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "sdt" | "std" => Ok(Self::Standard),
            "daylight" | "daylight saving" | "daylight_saving" | "dst" => Ok(Self::Daylight),
            _ => Err(format!(
                "Unknown time mode: {}. Use 'standard' or 'daylight'",
                s
            )),
        }
    }
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four two-hour observation blocks of a night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HourSlot {
    First,
    Second,
    Third,
    Fourth,
}

impl HourSlot {
    pub const ALL: [HourSlot; 4] = [
        HourSlot::First,
        HourSlot::Second,
        HourSlot::Third,
        HourSlot::Fourth,
    ];

    /// Slot number as stored in the Visibility table's Hour column.
    pub fn number(&self) -> u8 {
        match self {
            HourSlot::First => 1,
            HourSlot::Second => 2,
            HourSlot::Third => 3,
            HourSlot::Fourth => 4,
        }
    }

    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(HourSlot::First),
            2 => Some(HourSlot::Second),
            3 => Some(HourSlot::Third),
            4 => Some(HourSlot::Fourth),
            _ => None,
        }
    }
}

impl TryFrom<u8> for HourSlot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HourSlot::from_number(i64::from(value))
            .ok_or_else(|| format!("Hour slot must be between 1 and 4, got {}", value))
    }
}

impl From<HourSlot> for u8 {
    fn from(slot: HourSlot) -> Self {
        slot.number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        assert!(Month::new(0).is_none());
        assert!(Month::new(13).is_none());
        assert_eq!(Month::new(12).unwrap().value(), 12);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(Month::new(1).unwrap().name(), "January");
        assert_eq!(Month::new(12).unwrap().name(), "December");
        assert_eq!(month_name(7), "July");
        assert_eq!(month_name(0), "Unknown");
        assert_eq!(month_name(13), "Unknown");
        assert_eq!(month_name(-3), "Unknown");
    }

    #[test]
    fn test_month_all_in_order() {
        let months: Vec<u8> = Month::all().map(|m| m.value()).collect();
        assert_eq!(months, (1..=12).collect::<Vec<u8>>());
    }

    #[test]
    fn test_month_serde_rejects_out_of_range() {
        let parsed: Result<Month, _> = serde_json::from_str("13");
        assert!(parsed.is_err());
        let parsed: Month = serde_json::from_str("3").unwrap();
        assert_eq!(parsed.value(), 3);
    }

    #[test]
    fn test_time_mode_parse() {
        assert_eq!("Standard".parse::<TimeMode>().unwrap(), TimeMode::Standard);
        assert_eq!("sdt".parse::<TimeMode>().unwrap(), TimeMode::Standard);
        assert_eq!(
            "Daylight Saving".parse::<TimeMode>().unwrap(),
            TimeMode::Daylight
        );
        assert_eq!("DST".parse::<TimeMode>().unwrap(), TimeMode::Daylight);
        assert!("summer".parse::<TimeMode>().is_err());
    }

    #[test]
    fn test_hour_slot_numbers() {
        for (idx, slot) in HourSlot::ALL.iter().enumerate() {
            assert_eq!(slot.number() as usize, idx + 1);
            assert_eq!(HourSlot::from_number(idx as i64 + 1), Some(*slot));
        }
        assert_eq!(HourSlot::from_number(0), None);
        assert_eq!(HourSlot::from_number(5), None);
    }
}
