use thiserror::Error;

use super::dispatch::{CatalogUnavailable, DispatchError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("Simulation failed: {0}")]
    Run(#[from] DispatchError),
    #[error("{0}")]
    Catalog(#[from] CatalogUnavailable),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
