//! Kernel configuration persistence
//!
//! Configurations are stored as pretty-printed JSON so that the CLI and
//! library callers can share kernel settings, including a soft-matching
//! substitution table.

use crate::core::{KernelConfig, Result, SSKError};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Save a configuration to a JSON file
pub fn save_config<P: AsRef<Path>>(config: &KernelConfig, path: P) -> Result<()> {
    let file = File::create(path).map_err(SSKError::IoError)?;
    write_config(config, BufWriter::new(file))
}

/// Load and validate a configuration from a JSON file
///
/// Fields missing from the file take their default values.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<KernelConfig> {
    let file = File::open(path).map_err(SSKError::IoError)?;
    read_config(BufReader::new(file))
}

/// Write a configuration as pretty JSON
pub fn write_config<W: Write>(config: &KernelConfig, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, config)
        .map_err(|e| SSKError::SerializationError(e.to_string()))?;
    writer.flush().map_err(SSKError::IoError)
}

/// Read and validate a configuration from JSON
pub fn read_config<R: Read>(reader: R) -> Result<KernelConfig> {
    let config: KernelConfig = serde_json::from_reader(reader)
        .map_err(|e| SSKError::SerializationError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
