use thiserror::Error;

#[derive(Debug, Error)]
pub enum MerError {
    #[error("Unknown timezone: {0}. Use `mer search` to find a valid name")]
    UnknownTimezone(String),

    #[error("No config directory available on this system")]
    NoConfigDir,

    #[error("Failed to encode config: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] meridian_core::CoreError),

    #[error("Window error: {0}")]
    Window(#[from] meridian_core::WindowError),
}
