pub mod output;

pub use output::{create_writer, OutputFormat, OutputWriter, ValidationReport};

use crate::errors::{Error, Result, ResultExt};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::file_system("Failed to read file", path, e))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::file_system("Failed to write file", path, e))
}

/// Read and deserialize a JSON input file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents)
        .map_err(Error::from)
        .context(path.display().to_string())
}
