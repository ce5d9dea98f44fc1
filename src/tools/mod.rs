mod file_tools;
mod path_validator;

pub use file_tools::{discard_file, remove_file_if_exists};
pub use path_validator::ensure_directory_exists;
