mod file_hasher;
mod path_validator;

pub use file_hasher::calculate_file_hash;
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
