use thiserror::Error;

use crate::dial::DialError;
use crate::window::WindowError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("dial error: {0}")]
    Dial(#[from] DialError),

    #[error("window error: {0}")]
    Window(#[from] WindowError),
}
