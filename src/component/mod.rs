//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod daylight_window;
pub mod timelapse_assembler;

pub use daylight_window::{CaptureWindow, Ephemeris, SolarEphemeris, SunWindow, resolve};
pub use timelapse_assembler::{RunSummary, TimelapseAssembler, TimelapseBuilder};
