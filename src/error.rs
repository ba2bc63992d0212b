use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
  #[error("Invalid configuration: {0}")]
  Configuration(String),

  #[error("Invalid move at ({row}, {col}): {reason}")]
  InvalidMove {
    row: usize,
    col: usize,
    reason: &'static str,
  },

  #[error("Game is already finished")]
  GameFinished,

  #[error("No candidate moves left")]
  OutOfCandidates,

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

impl EngineError {
  /// Whether the engine state is still usable after this error.
  pub fn is_recoverable(&self) -> bool {
    match self {
      EngineError::InvalidMove { .. } => true,
      EngineError::OutOfCandidates => true,
      EngineError::GameFinished => true,
      EngineError::Io(_) | EngineError::Json(_) => true,
      EngineError::Configuration(_) => false,
    }
  }
}
