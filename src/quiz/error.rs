/// Failure while turning source text into questions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("could not load the C++ grammar: {0}")]
    Language(String),
    #[error("the parser returned no syntax tree")]
    Parse,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The learner did not pick a valid option. Nothing changed, ask again.
    #[error("no option selected")]
    NoSelection,
    #[error("option {selected} does not exist, the question has {available} options")]
    OptionOutOfRange { selected: usize, available: usize },
    #[error("`{action}` is not allowed while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },
    /// A generation result arrived for a quiz that has been restarted since.
    #[error("generation #{ticket} was superseded by #{current}")]
    StaleGeneration { ticket: u64, current: u64 },
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl SessionError {
    /// Validation failures leave the session untouched and only need a re-prompt.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SessionError::NoSelection | SessionError::OptionOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
