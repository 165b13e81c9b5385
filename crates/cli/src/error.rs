//! CLI failures and the exit code each one maps to.
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | success |
//! | 2    | argument parse error, reported by clap |
//! | 10   | scene error: unknown scene or preset, bad dimensions |
//! | 11   | file could not be read or written |
//! | 12   | bad user input: palette, color, `--params`, spec file |
//! | 13   | JSON output could not be produced |

use citylights_core::SceneError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Scene(SceneError),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Input(String),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Scene(_) => 10,
            Self::Io(_) => 11,
            Self::Input(_) => 12,
            Self::Serialization(_) => 13,
        }
    }
}

/// Color and palette problems come from user input; file problems keep
/// their own code.
impl From<SceneError> for CliError {
    fn from(e: SceneError) -> Self {
        match e {
            SceneError::Io(msg) => Self::Io(msg),
            SceneError::InvalidColor(_) | SceneError::InvalidPalette(_) => Self::Input(e.to_string()),
            other => Self::Scene(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
