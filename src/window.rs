//! Trailing time-window selection over the daily series.

use serde::{Deserialize, Serialize};

use crate::dataset::DailyMetric;
use crate::error::{PulseError, Result};

/// The window lengths offered by the dashboard's range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "7")]
    Last7,
    #[default]
    #[serde(rename = "14")]
    Last14,
    #[serde(rename = "30")]
    Last30,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [TimeWindow::Last7, TimeWindow::Last14, TimeWindow::Last30];

    pub fn days(&self) -> usize {
        match self {
            TimeWindow::Last7  => 7,
            TimeWindow::Last14 => 14,
            TimeWindow::Last30 => 30,
        }
    }

    pub fn from_days(days: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|w| w.days() == days)
            .ok_or_else(|| PulseError::UnknownWindow(days.to_string()))
    }
}

impl std::str::FromStr for TimeWindow {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self> {
        let days: usize = s
            .trim()
            .trim_end_matches('d')
            .parse()
            .map_err(|_| PulseError::UnknownWindow(s.to_string()))?;
        Self::from_days(days)
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d", self.days())
    }
}

/// The last `len` items of `items`, or all of them when `len` exceeds the
/// available history.
pub fn trailing<T>(items: &[T], len: usize) -> &[T] {
    &items[items.len().saturating_sub(len)..]
}

/// The trailing slice of the daily series covered by `window`.
pub fn select(daily: &[DailyMetric], window: TimeWindow) -> &[DailyMetric] {
    trailing(daily, window.days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(7, 30, 7)]
    #[case(14, 30, 14)]
    #[case(30, 30, 30)]
    #[case(14, 10, 10)]
    #[case(30, 0, 0)]
    fn test_trailing_length_is_min(#[case] w: usize, #[case] n: usize, #[case] expected: usize) {
        let data: Vec<usize> = (0..n).collect();
        assert_eq!(trailing(&data, w).len(), expected);
    }

    #[test]
    fn test_trailing_is_last_entries_in_order() {
        let data: Vec<u32> = (1..=30).collect();
        assert_eq!(trailing(&data, 7), &[24, 25, 26, 27, 28, 29, 30]);
    }

    #[test]
    fn test_trailing_zero_is_empty() {
        let data = [1, 2, 3];
        assert!(trailing(&data, 0).is_empty());
    }

    #[rstest]
    #[case("7", TimeWindow::Last7)]
    #[case("14", TimeWindow::Last14)]
    #[case("30d", TimeWindow::Last30)]
    fn test_window_parses(#[case] input: &str, #[case] expected: TimeWindow) {
        assert_eq!(input.parse::<TimeWindow>().unwrap(), expected);
    }

    #[test]
    fn test_window_rejects_unknown_length() {
        assert!(matches!("21".parse::<TimeWindow>(), Err(PulseError::UnknownWindow(_))));
        assert!("abc".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn test_window_default_is_fourteen_days() {
        assert_eq!(TimeWindow::default().days(), 14);
        assert_eq!(TimeWindow::default().to_string(), "14d");
    }
}
