/// Top-level fault type for the binary.
///
/// Game outcomes (no path, win, loss) are plain values in the simulation;
/// only I/O and configuration problems end up here.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
