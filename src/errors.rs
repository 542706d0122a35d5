use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
