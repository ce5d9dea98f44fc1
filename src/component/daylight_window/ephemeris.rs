//! 日出日落時刻計算
//!
//! 使用 NOAA 太陽位置公式，黎明/黃昏取民用曙暮光（太陽在地平線下 6 度）

use super::location::{Location, lookup};
use crate::error::{Result, TimelapseError};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use log::debug;

/// 民用曙暮光的天頂角
const CIVIL_TWILIGHT_ZENITH: f64 = 96.0;
/// 日出日落的天頂角（含大氣折射與太陽視半徑）
const HORIZON_ZENITH: f64 = 90.833;
const REFINE_ITERATIONS: usize = 3;

/// 單一地點、單一日期的四個太陽事件（當地時間）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunWindow {
    pub dawn: NaiveDateTime,
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
    pub dusk: NaiveDateTime,
}

pub trait Ephemeris: Send + Sync {
    fn sun_window(&self, location: &str, date: NaiveDate) -> Result<SunWindow>;
}

/// 使用內建地點資料表的太陽曆
#[derive(Debug, Default, Clone, Copy)]
pub struct SolarEphemeris;

impl Ephemeris for SolarEphemeris {
    fn sun_window(&self, location: &str, date: NaiveDate) -> Result<SunWindow> {
        let place =
            lookup(location).ok_or_else(|| TimelapseError::UnknownLocation(location.to_string()))?;

        let event = |name: &'static str, zenith: f64, rising: bool| {
            event_time(place, date, zenith, rising).ok_or_else(|| TimelapseError::NoSunEvent {
                event: name,
                location: place.name.to_string(),
                date,
            })
        };

        let window = SunWindow {
            dawn: event("黎明", CIVIL_TWILIGHT_ZENITH, true)?,
            sunrise: event("日出", HORIZON_ZENITH, true)?,
            sunset: event("日落", HORIZON_ZENITH, false)?,
            dusk: event("黃昏", CIVIL_TWILIGHT_ZENITH, false)?,
        };

        debug!(
            "{} ({}) {date}: 黎明 {} 日出 {} 日落 {} 黃昏 {}",
            place.name,
            place.region,
            window.dawn.time(),
            window.sunrise.time(),
            window.sunset.time(),
            window.dusk.time()
        );

        Ok(window)
    }
}

/// 計算事件的當地時間，太陽到不了指定天頂角時回傳 `None`
fn event_time(
    place: &Location,
    date: NaiveDate,
    zenith: f64,
    rising: bool,
) -> Option<NaiveDateTime> {
    let minutes = event_utc_minutes(place.latitude, place.longitude, date, zenith, rising)?;
    let utc = date.and_time(NaiveTime::MIN) + TimeDelta::seconds((minutes * 60.0).round() as i64);
    Some(place.timezone.to_local(utc))
}

/// 事件距離當日 00:00 UTC 的分鐘數
fn event_utc_minutes(
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
    zenith: f64,
    rising: bool,
) -> Option<f64> {
    let day_start = julian_day(date);
    // 從太陽正午開始逐次逼近
    let mut minutes = 720.0 - 4.0 * longitude;

    for _ in 0..REFINE_ITERATIONS {
        let sun = SolarParameters::at(day_start + minutes / 1440.0);
        let hour_angle = hour_angle(latitude, sun.declination, zenith)?;
        let signed = if rising { hour_angle } else { -hour_angle };
        minutes = 720.0 - 4.0 * (longitude + signed) - sun.equation_of_time;
    }

    Some(minutes)
}

/// 當日 00:00 UTC 的儒略日
fn julian_day(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce()) + 1_721_424.5
}

fn hour_angle(latitude: f64, declination: f64, zenith: f64) -> Option<f64> {
    let lat = latitude.to_radians();
    let cos_ha = zenith.to_radians().cos() / (lat.cos() * declination.cos())
        - lat.tan() * declination.tan();
    if !(-1.0..=1.0).contains(&cos_ha) {
        return None;
    }
    Some(cos_ha.acos().to_degrees())
}

struct SolarParameters {
    /// 弧度
    declination: f64,
    /// 分鐘
    equation_of_time: f64,
}

impl SolarParameters {
    fn at(julian_day: f64) -> Self {
        let t = (julian_day - 2_451_545.0) / 36_525.0;

        let mean_longitude = (280.466_46 + t * (36_000.769_83 + 0.000_303_2 * t)).rem_euclid(360.0);
        let mean_anomaly = 357.529_11 + t * (35_999.050_29 - 0.000_153_7 * t);
        let eccentricity = 0.016_708_634 - t * (0.000_042_037 + 0.000_000_126_7 * t);

        let m = mean_anomaly.to_radians();
        let center = m.sin() * (1.914_602 - t * (0.004_817 + 0.000_014 * t))
            + (2.0 * m).sin() * (0.019_993 - 0.000_101 * t)
            + (3.0 * m).sin() * 0.000_289;

        let omega = (125.04 - 1_934.136 * t).to_radians();
        let apparent_longitude = mean_longitude + center - 0.005_69 - 0.004_78 * omega.sin();

        let mean_obliquity =
            23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.000_59 - t * 0.001_813))) / 60.0) / 60.0;
        let obliquity = (mean_obliquity + 0.002_56 * omega.cos()).to_radians();

        let declination = (obliquity.sin() * apparent_longitude.to_radians().sin()).asin();

        let y = (obliquity / 2.0).tan().powi(2);
        let l0 = mean_longitude.to_radians();
        let equation = y * (2.0 * l0).sin() - 2.0 * eccentricity * m.sin()
            + 4.0 * eccentricity * y * m.sin() * (2.0 * l0).cos()
            - 0.5 * y * y * (4.0 * l0).sin()
            - 1.25 * eccentricity * eccentricity * (2.0 * m).sin();

        Self {
            declination,
            equation_of_time: equation.to_degrees() * 4.0,
        }
    }
}
