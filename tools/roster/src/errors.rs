use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("io error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    ConfigParse(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("cli error: {0}")]
    Cli(String),
    #[error("illegal console transition: {0}")]
    IllegalTransition(String),
    #[error("maximum number of records reached ({capacity})")]
    CapacityExceeded { capacity: usize },
    #[error("invalid index {index}: store holds {len} records")]
    InvalidIndex { index: i64, len: usize },
    #[error("'{0}' is not a valid number")]
    Parse(String),
}

impl RosterError {
    /// Errors the console reports and recovers from; everything else aborts the run.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::CapacityExceeded { .. } | Self::InvalidIndex { .. } | Self::Parse(_)
        )
    }
}
