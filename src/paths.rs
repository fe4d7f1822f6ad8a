use std::path::PathBuf;

use anyhow::{Context, Result};

fn data_home() -> Result<PathBuf> {
    let base = dirs::data_dir().context("unable to resolve data directory")?;
    Ok(base.join("cinetrack"))
}

pub fn database_file_path() -> Result<PathBuf> {
    Ok(data_home()?.join("cinetrack.db"))
}

pub fn log_file_path() -> Result<PathBuf> {
    Ok(data_home()?.join("cinetrack.log"))
}
