use log::{info, warn};

use super::error::{GenerationError, Result, SessionError};
use super::Question;

/// Where a quiz attempt currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    /// Waiting for the questions of generation `epoch`.
    Generating { epoch: u64 },
    Presenting(usize),
    Feedback { index: usize, outcome: Outcome },
    Completed,
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Generating { .. } => "generating questions",
            Phase::Presenting(_) => "presenting a question",
            Phase::Feedback { .. } => "showing feedback",
            Phase::Completed => "completed",
        }
    }
}

/// Result of checking one answer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Outcome {
    pub correct: bool,
    /// Text of the right option, only when the learner got it wrong.
    pub correct_option: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub score: usize,
    pub total: usize,
}

/// Handed out by [`QuizSession::start`]. Results carrying an old ticket are
/// thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket(u64);

impl GenerationTicket {
    pub fn epoch(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    epoch: u64,
    phase: Phase,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the attempt and waits for fresh questions. Any generation still
    /// in flight is invalidated.
    pub fn start(&mut self) -> GenerationTicket {
        self.epoch += 1;
        self.questions.clear();
        self.current_index = 0;
        self.score = 0;
        self.phase = Phase::Generating { epoch: self.epoch };

        info!("Quiz started, generation #{}", self.epoch);
        GenerationTicket(self.epoch)
    }

    /// Delivers the generated questions. A failed generation drops the
    /// session back to `Idle` so the learner can retry.
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        generated: std::result::Result<Vec<Question>, GenerationError>,
    ) -> Result<&Phase> {
        if ticket.0 != self.epoch {
            warn!(
                "Dropping result of generation #{}, current is #{}",
                ticket.0, self.epoch
            );
            return Err(SessionError::StaleGeneration {
                ticket: ticket.0,
                current: self.epoch,
            });
        }
        if self.phase != (Phase::Generating { epoch: ticket.0 }) {
            return Err(self.invalid("finish generation"));
        }

        match generated {
            Ok(questions) => {
                self.questions = questions;
                self.phase = if self.questions.is_empty() {
                    Phase::Completed
                } else {
                    Phase::Presenting(0)
                };
                info!("Quiz ready with {} questions", self.questions.len());
                Ok(&self.phase)
            }
            Err(e) => {
                warn!("Question generation failed: {}", e);
                self.phase = Phase::Idle;
                Err(e.into())
            }
        }
    }

    /// Scores the selected option of the question on screen.
    pub fn check_answer(&mut self, selected: Option<usize>) -> Result<Outcome> {
        let index = match self.phase {
            Phase::Presenting(index) => index,
            _ => return Err(self.invalid("check answer")),
        };
        let selected = selected.ok_or(SessionError::NoSelection)?;
        // A session restored from storage may not match its questions
        let question = match self.questions.get(index) {
            Some(question) => question,
            None => return Err(self.invalid("check answer")),
        };
        let correct_option = match question.correct_option() {
            Some(option) => option.to_string(),
            None => return Err(self.invalid("check answer")),
        };
        if selected >= question.options().len() {
            return Err(SessionError::OptionOutOfRange {
                selected,
                available: question.options().len(),
            });
        }

        let outcome = if selected == question.correct_index() {
            self.score += 1;
            Outcome {
                correct: true,
                correct_option: None,
            }
        } else {
            Outcome {
                correct: false,
                correct_option: Some(correct_option),
            }
        };

        self.phase = Phase::Feedback {
            index,
            outcome: outcome.clone(),
        };
        Ok(outcome)
    }

    /// Moves past the feedback to the next question, or finishes.
    pub fn advance(&mut self) -> Result<&Phase> {
        if !matches!(self.phase, Phase::Feedback { .. }) {
            return Err(self.invalid("advance"));
        }

        self.current_index += 1;
        self.phase = if self.current_index < self.questions.len() {
            Phase::Presenting(self.current_index)
        } else {
            info!(
                "Quiz completed with score {}/{}",
                self.score,
                self.questions.len()
            );
            Phase::Completed
        };
        Ok(&self.phase)
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            phase: self.phase.name(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// The question being asked or reviewed.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Presenting(index) | Phase::Feedback { index, .. } => self.questions.get(index),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<Summary> {
        match self.phase {
            Phase::Completed => Some(Summary {
                score: self.score,
                total: self.questions.len(),
            }),
            _ => None,
        }
    }
}
