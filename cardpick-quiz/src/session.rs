use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::answers::AnswerSet;
use crate::question::{Question, QuestionSet, SelectionMode};

/// Where the questionnaire currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for an answer to the question at this index
    Asking(usize),
    /// An early-exit predicate fired; terminal
    EarlyExit,
    /// Every question answered; terminal
    Completed,
}

/// Terminal result of a session, consumed by the recommendation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome<'a> {
    EarlyExit,
    Completed(&'a AnswerSet),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Select at least one option before proceeding")]
    IncompleteSelection,

    #[error("Question {question} has no option {value}")]
    UnknownOption { question: String, value: String },
}

/// A single questionnaire run: advances one question at a time, accumulating
/// answers until a terminal state. All mutation goes through `&mut self`, so
/// a session is single-writer by construction.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    questions: QuestionSet,
    state: SessionState,
    answers: AnswerSet,
}

impl Session {
    pub fn new(questions: QuestionSet) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            questions,
            state: SessionState::Asking(0),
            answers: AnswerSet::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    /// The question awaiting an answer, if the session is still asking
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::Asking(idx) => self.questions.by_index(idx),
            _ => None,
        }
    }

    /// Terminal outcome; `None` while the session is still asking
    pub fn outcome(&self) -> Option<SessionOutcome<'_>> {
        match self.state {
            SessionState::Asking(_) => None,
            SessionState::EarlyExit => Some(SessionOutcome::EarlyExit),
            SessionState::Completed => Some(SessionOutcome::Completed(&self.answers)),
        }
    }

    /// Answer a single-select question and advance immediately
    pub fn select_single(&mut self, question_id: &str, value: &str) -> Result<(), SessionError> {
        let (idx, question) = self.expect_current(question_id)?;
        if question.mode != SelectionMode::Single {
            return Err(SessionError::InvalidTransition(format!(
                "question {question_id} is multi-select; use toggle_multiple"
            )));
        }
        if !question.has_option(value) {
            return Err(SessionError::UnknownOption {
                question: question_id.to_string(),
                value: value.to_string(),
            });
        }
        let exits = question
            .early_exit
            .as_ref()
            .is_some_and(|e| e.fires([value]));

        self.answers.set_single(question_id, value);
        if exits {
            debug!("Session {} early exit on question {}", self.id, question_id);
            self.state = SessionState::EarlyExit;
        } else {
            self.advance(idx);
        }
        Ok(())
    }

    /// Toggle a value on the current multi-select question. Adding beyond the
    /// question's cap is a silent no-op, not an error.
    pub fn toggle_multiple(&mut self, question_id: &str, value: &str) -> Result<(), SessionError> {
        let (_idx, question) = self.expect_current(question_id)?;
        let max_selections = match question.mode {
            SelectionMode::Multiple { max_selections } => max_selections,
            SelectionMode::Single => {
                return Err(SessionError::InvalidTransition(format!(
                    "question {question_id} is single-select; use select_single"
                )));
            }
        };
        if !question.has_option(value) {
            return Err(SessionError::UnknownOption {
                question: question_id.to_string(),
                value: value.to_string(),
            });
        }

        let selected = self.answers.toggle(question_id, value, max_selections);
        debug!(
            "Session {} toggled {}={} (selected: {})",
            self.id, question_id, value, selected
        );
        Ok(())
    }

    /// Advance past the current multi-select question. Requires at least one
    /// selected value.
    pub fn proceed(&mut self) -> Result<(), SessionError> {
        let idx = match self.state {
            SessionState::Asking(idx) => idx,
            _ => {
                return Err(SessionError::InvalidTransition(
                    "session already finished".to_string(),
                ));
            }
        };
        let question = self.questions.by_index(idx).ok_or_else(|| {
            SessionError::InvalidTransition(format!("no question at index {idx}"))
        })?;
        if !matches!(question.mode, SelectionMode::Multiple { .. }) {
            return Err(SessionError::InvalidTransition(format!(
                "question {} is single-select and advances on selection",
                question.id
            )));
        }

        let selected = self.answers.selected_values(&question.id);
        if selected.is_empty() {
            return Err(SessionError::IncompleteSelection);
        }
        let exits = question
            .early_exit
            .as_ref()
            .is_some_and(|e| e.fires(selected.iter().map(String::as_str)));

        if exits {
            debug!("Session {} early exit on question {}", self.id, question.id);
            self.state = SessionState::EarlyExit;
        } else {
            self.advance(idx);
        }
        Ok(())
    }

    /// Discard all answers and return to the first question
    pub fn reset(&mut self) {
        debug!("Session {} reset", self.id);
        self.state = SessionState::Asking(0);
        self.answers = AnswerSet::default();
    }

    fn advance(&mut self, idx: usize) {
        if idx + 1 >= self.questions.len() {
            debug!("Session {} completed", self.id);
            self.state = SessionState::Completed;
        } else {
            self.state = SessionState::Asking(idx + 1);
        }
    }

    fn expect_current(&self, question_id: &str) -> Result<(usize, &Question), SessionError> {
        match self.state {
            SessionState::Asking(idx) => {
                let question = self.questions.by_index(idx).ok_or_else(|| {
                    SessionError::InvalidTransition(format!("no question at index {idx}"))
                })?;
                if question.id != question_id {
                    return Err(SessionError::InvalidTransition(format!(
                        "expected an answer for question {}, got {question_id}",
                        question.id
                    )));
                }
                Ok((idx, question))
            }
            SessionState::EarlyExit | SessionState::Completed => Err(
                SessionError::InvalidTransition("session already finished".to_string()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{EarlyExit, QuestionOption};

    fn option(value: &str) -> QuestionOption {
        QuestionOption {
            value: value.to_string(),
            label: value.to_string(),
        }
    }

    fn question_set() -> QuestionSet {
        QuestionSet::new(vec![
            Question {
                id: "credit-score".to_string(),
                prompt: "What is your credit score?".to_string(),
                options: vec![option("excellent"), option("good"), option("poor")],
                mode: SelectionMode::Single,
                early_exit: Some(EarlyExit {
                    values: vec!["poor".to_string()],
                }),
            },
            Question {
                id: "spend-categories".to_string(),
                prompt: "Where do you spend the most?".to_string(),
                options: vec![
                    option("fuel"),
                    option("travel"),
                    option("shopping"),
                    option("dining"),
                ],
                mode: SelectionMode::Multiple { max_selections: 3 },
                early_exit: None,
            },
            Question {
                id: "reward-style".to_string(),
                prompt: "Points or cashback?".to_string(),
                options: vec![option("rewards"), option("cashback")],
                mode: SelectionMode::Single,
                early_exit: None,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_single_select_auto_advances() {
        let mut session = Session::new(question_set());
        assert_eq!(session.state(), SessionState::Asking(0));

        session.select_single("credit-score", "excellent").unwrap();
        assert_eq!(session.state(), SessionState::Asking(1));
        assert_eq!(session.current_question().unwrap().id, "spend-categories");
    }

    #[test]
    fn test_multi_select_waits_for_proceed() {
        let mut session = Session::new(question_set());
        session.select_single("credit-score", "good").unwrap();

        session.toggle_multiple("spend-categories", "fuel").unwrap();
        session.toggle_multiple("spend-categories", "travel").unwrap();
        assert_eq!(session.state(), SessionState::Asking(1));

        session.proceed().unwrap();
        assert_eq!(session.state(), SessionState::Asking(2));

        session.select_single("reward-style", "cashback").unwrap();
        assert_eq!(session.state(), SessionState::Completed);
        assert!(matches!(
            session.outcome(),
            Some(SessionOutcome::Completed(_))
        ));
    }

    #[test]
    fn test_toggle_cap_keeps_first_three() {
        let mut session = Session::new(question_set());
        session.select_single("credit-score", "good").unwrap();

        for value in ["fuel", "travel", "shopping", "dining"] {
            session.toggle_multiple("spend-categories", value).unwrap();
        }
        assert_eq!(
            session.answers().selected_values("spend-categories"),
            ["fuel", "travel", "shopping"]
        );
    }

    #[test]
    fn test_early_exit_is_terminal() {
        let mut session = Session::new(question_set());
        session.select_single("credit-score", "poor").unwrap();

        assert_eq!(session.state(), SessionState::EarlyExit);
        assert!(matches!(session.outcome(), Some(SessionOutcome::EarlyExit)));
        assert!(matches!(
            session.select_single("reward-style", "rewards"),
            Err(SessionError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_out_of_order_and_wrong_mode_rejected() {
        let mut session = Session::new(question_set());

        // wrong question
        assert!(matches!(
            session.select_single("reward-style", "rewards"),
            Err(SessionError::InvalidTransition(_))
        ));
        // wrong mode for the current question
        assert!(matches!(
            session.toggle_multiple("credit-score", "good"),
            Err(SessionError::InvalidTransition(_))
        ));
        // state untouched by the rejections
        assert_eq!(session.state(), SessionState::Asking(0));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_proceed_requires_a_selection() {
        let mut session = Session::new(question_set());
        session.select_single("credit-score", "good").unwrap();

        assert!(matches!(
            session.proceed(),
            Err(SessionError::IncompleteSelection)
        ));
        assert_eq!(session.state(), SessionState::Asking(1));
    }

    #[test]
    fn test_unknown_option_rejected_state_unchanged() {
        let mut session = Session::new(question_set());

        assert!(matches!(
            session.select_single("credit-score", "stellar"),
            Err(SessionError::UnknownOption { .. })
        ));
        assert_eq!(session.state(), SessionState::Asking(0));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut session = Session::new(question_set());
        session.select_single("credit-score", "poor").unwrap();
        assert_eq!(session.state(), SessionState::EarlyExit);

        session.reset();
        assert_eq!(session.state(), SessionState::Asking(0));
        assert!(session.answers().is_empty());

        // run to completion, then reset again
        session.select_single("credit-score", "good").unwrap();
        session.toggle_multiple("spend-categories", "fuel").unwrap();
        session.proceed().unwrap();
        session.select_single("reward-style", "rewards").unwrap();
        assert_eq!(session.state(), SessionState::Completed);

        session.reset();
        assert_eq!(session.state(), SessionState::Asking(0));
        assert!(session.answers().is_empty());
    }
}
