use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A recorded answer to one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    /// Selection order is preserved
    Multiple(Vec<String>),
}

impl Answer {
    pub fn values(&self) -> &[String] {
        match self {
            Answer::Single(value) => std::slice::from_ref(value),
            Answer::Multiple(values) => values,
        }
    }
}

/// Accumulated answers keyed by question id. Holds no entry for a question
/// that has not been answered yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    answers: HashMap<String, Answer>,
}

impl AnswerSet {
    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    /// Selected values for a question; empty when unanswered
    pub fn selected_values(&self, question_id: &str) -> &[String] {
        self.answers
            .get(question_id)
            .map(Answer::values)
            .unwrap_or(&[])
    }

    pub fn contains(&self, question_id: &str, value: &str) -> bool {
        self.selected_values(question_id).iter().any(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn set_single(&mut self, question_id: &str, value: impl Into<String>) {
        self.answers
            .insert(question_id.to_string(), Answer::Single(value.into()));
    }

    pub fn set_multiple(&mut self, question_id: &str, values: Vec<String>) {
        self.answers
            .insert(question_id.to_string(), Answer::Multiple(values));
    }

    /// Toggle a multi-select value under a selection cap. Returns whether the
    /// value is selected afterwards. Adding beyond the cap is a silent no-op.
    pub(crate) fn toggle(&mut self, question_id: &str, value: &str, max_selections: usize) -> bool {
        let entry = self
            .answers
            .entry(question_id.to_string())
            .or_insert_with(|| Answer::Multiple(Vec::new()));
        let Answer::Multiple(values) = entry else {
            return false;
        };
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
            if values.is_empty() {
                self.answers.remove(question_id);
            }
            false
        } else if values.len() < max_selections {
            values.push(value.to_string());
            true
        } else {
            false
        }
    }
}
