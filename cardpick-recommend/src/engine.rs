use cardpick_catalog::{Card, Catalog};
use cardpick_quiz::{AnswerSet, QuestionSet, Session, SessionOutcome};

use crate::config::{ConfigError, EngineConfig};
use crate::pipeline::{self, Recommendation};
use crate::rules::{RuleError, RuleSet};

/// Validated catalog, questionnaire, and rules, ready to serve sessions.
/// Construction fails fast on a dangling card/question/option reference, so
/// no session can run against a broken configuration.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Catalog,
    questions: QuestionSet,
    rules: RuleSet,
}

impl Recommender {
    pub fn new(
        catalog: Catalog,
        questions: QuestionSet,
        rules: RuleSet,
    ) -> Result<Self, RuleError> {
        rules.validate(&catalog, &questions)?;
        Ok(Self {
            catalog,
            questions,
            rules,
        })
    }

    pub fn from_config(config: EngineConfig) -> Result<Self, ConfigError> {
        let catalog = Catalog::new(config.catalog)?;
        let questions = QuestionSet::new(config.questions)?;
        Ok(Self::new(catalog, questions, config.rules)?)
    }

    /// A fresh session over this recommender's question set
    pub fn start_session(&self) -> Session {
        Session::new(self.questions.clone())
    }

    pub fn recommend(&self, outcome: &SessionOutcome<'_>) -> Recommendation {
        match outcome {
            SessionOutcome::EarlyExit => Recommendation::Alternate,
            SessionOutcome::Completed(answers) => Recommendation::Ranked {
                cards: pipeline::evaluate(&self.catalog, answers, &self.rules),
            },
        }
    }

    /// `None` while the session is still asking questions
    pub fn recommend_session(&self, session: &Session) -> Option<Recommendation> {
        session.outcome().map(|outcome| self.recommend(&outcome))
    }

    /// Run the filter pipeline directly over a completed answer set
    pub fn evaluate(&self, answers: &AnswerSet) -> Vec<Card> {
        pipeline::evaluate(&self.catalog, answers, &self.rules)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
