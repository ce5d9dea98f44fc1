pub mod date;
pub mod load;
pub mod types;

pub use date::{DATE_FORMAT, default_date, parse_date};
pub use types::{FrameDuration, RunConfig, SETTINGS_FILE_NAME, Settings, SettingsOverrides};
