use serde::{Deserialize, Serialize};

/// One selectable option of a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
}

/// How answers to a question are collected.
///
/// Single-select questions auto-advance on selection; multi-select questions
/// accumulate up to `max_selections` values and advance only on an explicit
/// proceed. The asymmetry is a UX contract, kept explicit here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionMode {
    Single,
    Multiple { max_selections: usize },
}

/// Terminates the questionnaire with the alternate outcome when any chosen
/// value is in `values`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyExit {
    pub values: Vec<String>,
}

impl EarlyExit {
    pub fn fires<'a>(&self, chosen: impl IntoIterator<Item = &'a str>) -> bool {
        chosen
            .into_iter()
            .any(|value| self.values.iter().any(|v| v == value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuestionOption>,
    pub mode: SelectionMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_exit: Option<EarlyExit>,
}

impl Question {
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// Ordered, validated question definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        for (idx, question) in questions.iter().enumerate() {
            if questions[..idx].iter().any(|q| q.id == question.id) {
                return Err(QuestionSetError::DuplicateQuestionId(question.id.clone()));
            }
            if question.options.is_empty() {
                return Err(QuestionSetError::NoOptions(question.id.clone()));
            }
            for (opt_idx, option) in question.options.iter().enumerate() {
                if question.options[..opt_idx].iter().any(|o| o.value == option.value) {
                    return Err(QuestionSetError::DuplicateOptionValue {
                        question: question.id.clone(),
                        value: option.value.clone(),
                    });
                }
            }
            if let SelectionMode::Multiple { max_selections } = question.mode {
                if max_selections == 0 || max_selections > question.options.len() {
                    return Err(QuestionSetError::InvalidMaxSelections {
                        question: question.id.clone(),
                        max: max_selections,
                        options: question.options.len(),
                    });
                }
            }
            if let Some(early_exit) = &question.early_exit {
                for value in &early_exit.values {
                    if !question.has_option(value) {
                        return Err(QuestionSetError::UnknownOptionValue {
                            question: question.id.clone(),
                            value: value.clone(),
                        });
                    }
                }
            }
        }
        Ok(Self { questions })
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn by_index(&self, idx: usize) -> Option<&Question> {
        self.questions.get(idx)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionSetError {
    #[error("Question set is empty")]
    Empty,

    #[error("Duplicate question id: {0}")]
    DuplicateQuestionId(String),

    #[error("Question {0} has no options")]
    NoOptions(String),

    #[error("Duplicate option value {value} in question {question}")]
    DuplicateOptionValue { question: String, value: String },

    #[error("Question {question} allows {max} selections but has only {options} options")]
    InvalidMaxSelections {
        question: String,
        max: usize,
        options: usize,
    },

    #[error("Question {question} early-exit references unknown option value: {value}")]
    UnknownOptionValue { question: String, value: String },
}
