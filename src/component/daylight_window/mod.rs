//! 日照時段元件
//!
//! 依地點與日期計算黎明到黃昏的時段，決定要收集哪些分鐘的影像

mod ephemeris;
mod location;
mod resolver;

pub use ephemeris::{Ephemeris, SolarEphemeris, SunWindow};
pub use location::{DstRule, Location, TimeZoneRule, lookup};
pub use resolver::{CaptureWindow, resolve};
