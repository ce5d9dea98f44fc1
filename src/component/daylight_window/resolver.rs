use super::ephemeris::SunWindow;
use chrono::Timelike;
use std::fmt;
use std::ops::RangeInclusive;

/// 收集影像的時間範圍（含頭尾，精確到分鐘）
///
/// 同一小時內 `first_minute > last_minute` 是合法狀態，代表沒有任何分鐘需要收集
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureWindow {
    pub first_hour: u32,
    pub first_minute: u32,
    pub last_hour: u32,
    pub last_minute: u32,
}

impl CaptureWindow {
    pub const FULL_DAY: Self = Self {
        first_hour: 0,
        first_minute: 0,
        last_hour: 23,
        last_minute: 59,
    };

    #[must_use]
    pub fn hours(&self) -> RangeInclusive<u32> {
        self.first_hour..=self.last_hour
    }

    /// 指定小時內需要收集的分鐘範圍，首尾小時會被裁切
    #[must_use]
    pub fn minutes_in(&self, hour: u32) -> RangeInclusive<u32> {
        let start = if hour == self.first_hour {
            self.first_minute
        } else {
            0
        };
        let end = if hour == self.last_hour {
            self.last_minute
        } else {
            59
        };
        start..=end
    }
}

impl fmt::Display for CaptureWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.first_hour, self.first_minute, self.last_hour, self.last_minute
        )
    }
}

/// 由太陽事件決定收集範圍：黎明到黃昏，或整天
#[must_use]
pub fn resolve(sun_window: &SunWindow, full_day: bool) -> CaptureWindow {
    if full_day {
        return CaptureWindow::FULL_DAY;
    }

    CaptureWindow {
        first_hour: sun_window.dawn.hour(),
        first_minute: sun_window.dawn.minute(),
        last_hour: sun_window.dusk.hour(),
        last_minute: sun_window.dusk.minute(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 21)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn sun(dawn: NaiveDateTime, dusk: NaiveDateTime) -> SunWindow {
        SunWindow {
            dawn,
            sunrise: dawn,
            sunset: dusk,
            dusk,
        }
    }

    #[test]
    fn test_resolve_uses_dawn_and_dusk() {
        let window = resolve(&sun(at(8, 20, 41), at(15, 40, 2)), false);
        assert_eq!(
            window,
            CaptureWindow {
                first_hour: 8,
                first_minute: 20,
                last_hour: 15,
                last_minute: 40,
            }
        );
        assert_eq!(window.to_string(), "08:20-15:40");
    }

    #[test]
    fn test_resolve_full_day_ignores_sun() {
        for (dawn, dusk) in [(at(8, 20, 0), at(15, 40, 0)), (at(3, 1, 0), at(23, 5, 0))] {
            assert_eq!(resolve(&sun(dawn, dusk), true), CaptureWindow::FULL_DAY);
        }
    }

    #[test]
    fn test_minutes_in_interior_and_edges() {
        let window = resolve(&sun(at(8, 20, 0), at(15, 40, 0)), false);
        assert_eq!(window.minutes_in(8), 20..=59);
        assert_eq!(window.minutes_in(12), 0..=59);
        assert_eq!(window.minutes_in(15), 0..=40);
    }

    #[test]
    fn test_minutes_in_single_hour() {
        let window = CaptureWindow {
            first_hour: 14,
            first_minute: 10,
            last_hour: 14,
            last_minute: 45,
        };
        assert_eq!(window.minutes_in(14), 10..=45);

        let inverted = CaptureWindow {
            first_hour: 14,
            first_minute: 45,
            last_hour: 14,
            last_minute: 10,
        };
        assert_eq!(inverted.minutes_in(14).count(), 0);
    }
}
