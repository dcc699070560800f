//! CLI command implementations.
//!
//! Available commands:
//! - **validate**: Validate an event's scouting data against official results
//! - **init**: Write a default `.scoutcheck.toml`
//! - **sort-keys**: Print match keys in schedule order

pub mod init;
pub mod sort_keys;
pub mod validate;

pub use init::init_config;
pub use sort_keys::print_sorted_keys;
pub use validate::{validate_event_files, ValidateConfig};
