//! 內建地點資料表與時區規則

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Weekday};

/// 夏令時間規則
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DstRule {
    None,
    /// 三月最後一個週日 01:00 UTC 至十月最後一個週日 01:00 UTC
    EuropeanUnion,
    /// 三月第二個週日 02:00 標準時間至十一月第一個週日 02:00 夏令時間
    NorthAmerica,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeZoneRule {
    pub standard_offset_minutes: i32,
    pub dst: DstRule,
}

impl TimeZoneRule {
    #[must_use]
    pub const fn new(standard_offset_minutes: i32, dst: DstRule) -> Self {
        Self {
            standard_offset_minutes,
            dst,
        }
    }

    /// 指定 UTC 時刻的當地偏移（分鐘）
    #[must_use]
    pub fn offset_minutes_at(&self, utc: NaiveDateTime) -> i32 {
        if self.is_daylight_saving(utc) {
            self.standard_offset_minutes + 60
        } else {
            self.standard_offset_minutes
        }
    }

    #[must_use]
    pub fn to_local(&self, utc: NaiveDateTime) -> NaiveDateTime {
        utc + TimeDelta::minutes(i64::from(self.offset_minutes_at(utc)))
    }

    fn is_daylight_saving(&self, utc: NaiveDateTime) -> bool {
        let year = utc.year();
        let standard = TimeDelta::minutes(i64::from(self.standard_offset_minutes));

        let (start, end) = match self.dst {
            DstRule::None => return false,
            DstRule::EuropeanUnion => {
                let (Some(start), Some(end)) = (last_sunday(year, 3), last_sunday(year, 10))
                else {
                    return false;
                };
                (at_hour(start, 1), at_hour(end, 1))
            }
            DstRule::NorthAmerica => {
                let (Some(start), Some(end)) = (
                    NaiveDate::from_weekday_of_month_opt(year, 3, Weekday::Sun, 2),
                    NaiveDate::from_weekday_of_month_opt(year, 11, Weekday::Sun, 1),
                ) else {
                    return false;
                };
                // 結束時刻 02:00 夏令時間等於 01:00 標準時間
                (at_hour(start, 2) - standard, at_hour(end, 1) - standard)
            }
        };

        utc >= start && utc < end
    }
}

fn at_hour(date: NaiveDate, hour: i64) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN) + TimeDelta::hours(hour)
}

fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let last_day = NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()?;
    let back = i64::from(last_day.weekday().num_days_from_sunday());
    Some(last_day - TimeDelta::days(back))
}

/// 地點資訊（經度東正西負）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub name: &'static str,
    pub region: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: TimeZoneRule,
}

const UK: TimeZoneRule = TimeZoneRule::new(0, DstRule::EuropeanUnion);
const CET: TimeZoneRule = TimeZoneRule::new(60, DstRule::EuropeanUnion);

#[rustfmt::skip]
static LOCATIONS: &[Location] = &[
    Location { name: "Edinburgh", region: "Scotland", latitude: 55.9533, longitude: -3.1883, timezone: UK },
    Location { name: "Glasgow", region: "Scotland", latitude: 55.8642, longitude: -4.2518, timezone: UK },
    Location { name: "Aberdeen", region: "Scotland", latitude: 57.1497, longitude: -2.0943, timezone: UK },
    Location { name: "London", region: "England", latitude: 51.5074, longitude: -0.1278, timezone: UK },
    Location { name: "Manchester", region: "England", latitude: 53.4808, longitude: -2.2426, timezone: UK },
    Location { name: "Cardiff", region: "Wales", latitude: 51.4816, longitude: -3.1791, timezone: UK },
    Location { name: "Belfast", region: "Northern Ireland", latitude: 54.5973, longitude: -5.9301, timezone: UK },
    Location { name: "Dublin", region: "Ireland", latitude: 53.3498, longitude: -6.2603, timezone: UK },
    Location { name: "Lisbon", region: "Portugal", latitude: 38.7223, longitude: -9.1393, timezone: UK },
    Location { name: "Paris", region: "France", latitude: 48.8566, longitude: 2.3522, timezone: CET },
    Location { name: "Amsterdam", region: "Netherlands", latitude: 52.3676, longitude: 4.9041, timezone: CET },
    Location { name: "Berlin", region: "Germany", latitude: 52.52, longitude: 13.405, timezone: CET },
    Location { name: "Madrid", region: "Spain", latitude: 40.4168, longitude: -3.7038, timezone: CET },
    Location { name: "Rome", region: "Italy", latitude: 41.9028, longitude: 12.4964, timezone: CET },
    Location { name: "Oslo", region: "Norway", latitude: 59.9139, longitude: 10.7522, timezone: CET },
    Location { name: "Stockholm", region: "Sweden", latitude: 59.3293, longitude: 18.0686, timezone: CET },
    Location { name: "Tromso", region: "Norway", latitude: 69.6492, longitude: 18.9553, timezone: CET },
    Location { name: "Reykjavik", region: "Iceland", latitude: 64.1466, longitude: -21.9426, timezone: TimeZoneRule::new(0, DstRule::None) },
    Location { name: "New York", region: "USA", latitude: 40.7128, longitude: -74.006, timezone: TimeZoneRule::new(-300, DstRule::NorthAmerica) },
    Location { name: "Chicago", region: "USA", latitude: 41.8781, longitude: -87.6298, timezone: TimeZoneRule::new(-360, DstRule::NorthAmerica) },
    Location { name: "Denver", region: "USA", latitude: 39.7392, longitude: -104.9903, timezone: TimeZoneRule::new(-420, DstRule::NorthAmerica) },
    Location { name: "Los Angeles", region: "USA", latitude: 34.0522, longitude: -118.2437, timezone: TimeZoneRule::new(-480, DstRule::NorthAmerica) },
    Location { name: "Toronto", region: "Canada", latitude: 43.6532, longitude: -79.3832, timezone: TimeZoneRule::new(-300, DstRule::NorthAmerica) },
    Location { name: "Tokyo", region: "Japan", latitude: 35.6762, longitude: 139.6503, timezone: TimeZoneRule::new(540, DstRule::None) },
    Location { name: "Singapore", region: "Singapore", latitude: 1.3521, longitude: 103.8198, timezone: TimeZoneRule::new(480, DstRule::None) },
];

/// 依名稱查詢地點（不分大小寫）
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Location> {
    let name = name.trim();
    LOCATIONS
        .iter()
        .find(|location| location.name.eq_ignore_ascii_case(name))
}
