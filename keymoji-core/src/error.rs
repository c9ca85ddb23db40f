use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid raster ladder: {0}")]
    InvalidLadder(String),

    #[error("Invalid growth factor: {0}")]
    InvalidGrowthFactor(f64),

    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, Error>;
