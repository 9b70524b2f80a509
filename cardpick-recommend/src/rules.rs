use serde::{Deserialize, Serialize};

use cardpick_catalog::{Card, Catalog, Tag};
use cardpick_quiz::{AnswerSet, Question, QuestionSet};

/// A per-question reduction of the candidate set. Stages combine with AND;
/// within a stage, an answer's selected values combine with OR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterStage {
    /// Question whose answer drives this stage; unanswered means no constraint
    pub question: String,
    pub kind: StageKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageKind {
    /// Card passes if its issuer equals any selected value
    Issuer,
    /// Card passes if its annual fee falls inside any selected tier
    FeeTier(Vec<FeeTier>),
    /// Card passes if it carries none of the tags excluded by a selected bucket
    SpendCeiling(Vec<SpendBucket>),
    /// Card passes if it carries the tag mapped from any selected value.
    /// Selected values with no mapping impose no constraint.
    TagMatch(Vec<TagMapping>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeTier {
    pub value: String,
    pub min_fee: u32,
    /// Open-ended tier when absent
    pub max_fee: Option<u32>,
}

impl FeeTier {
    pub fn contains(&self, fee: u32) -> bool {
        fee >= self.min_fee && self.max_fee.map_or(true, |max| fee <= max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendBucket {
    pub value: String,
    pub excluded: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagMapping {
    pub value: String,
    pub tag: Tag,
}

/// Predicate over the answer set; a rule's conditions are AND-combined
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RuleCondition {
    Selected { question: String, value: String },
    AnySelected { question: String, values: Vec<String> },
}

impl RuleCondition {
    pub fn matches(&self, answers: &AnswerSet) -> bool {
        match self {
            RuleCondition::Selected { question, value } => answers.contains(question, value),
            RuleCondition::AnySelected { question, values } => {
                values.iter().any(|v| answers.contains(question, v))
            }
        }
    }
}

/// Forces a card into the result ahead of ordinary matches when its
/// conditions hold against the answer set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideRule {
    pub name: String,
    pub card_id: String,
    pub conditions: Vec<RuleCondition>,
}

impl OverrideRule {
    pub fn fires(&self, answers: &AnswerSet) -> bool {
        self.conditions.iter().all(|c| c.matches(answers))
    }
}

/// Unconditional denylist entry, applied after every other rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExclusionRule {
    ById(String),
    /// Case-insensitive substring match on the card name
    ByName(String),
}

impl ExclusionRule {
    pub fn excludes(&self, card: &Card) -> bool {
        match self {
            ExclusionRule::ById(id) => card.id == *id,
            ExclusionRule::ByName(needle) => card
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}

/// Promotes cards carrying the trigger tag plus at least one other selected
/// tag from the trigger question or a companion question. Reorders only;
/// never changes membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityRule {
    pub name: String,
    /// Multi-select question the trigger value belongs to
    pub question: String,
    pub trigger_value: String,
    pub tag: Tag,
    /// Related questions whose selected tags also count as companions
    #[serde(default)]
    pub companions: Vec<String>,
}

/// Complete rule configuration for the pipeline, validated once at load time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub stages: Vec<FilterStage>,
    #[serde(default)]
    pub overrides: Vec<OverrideRule>,
    #[serde(default)]
    pub exclusions: Vec<ExclusionRule>,
    #[serde(default)]
    pub priorities: Vec<PriorityRule>,
}

impl RuleSet {
    /// Fail-fast check that every card, question, and option value a rule
    /// references actually exists
    pub fn validate(&self, catalog: &Catalog, questions: &QuestionSet) -> Result<(), RuleError> {
        for stage in &self.stages {
            let question = lookup_question(questions, &stage.question)?;
            match &stage.kind {
                StageKind::Issuer => {}
                StageKind::FeeTier(tiers) => {
                    for tier in tiers {
                        check_option(question, &tier.value)?;
                    }
                }
                StageKind::SpendCeiling(buckets) => {
                    for bucket in buckets {
                        check_option(question, &bucket.value)?;
                    }
                }
                StageKind::TagMatch(mappings) => {
                    for mapping in mappings {
                        check_option(question, &mapping.value)?;
                    }
                }
            }
        }

        for rule in &self.overrides {
            if catalog.get(&rule.card_id).is_none() {
                return Err(RuleError::UnknownItemReference(rule.card_id.clone()));
            }
            for condition in &rule.conditions {
                match condition {
                    RuleCondition::Selected { question, value } => {
                        check_option(lookup_question(questions, question)?, value)?;
                    }
                    RuleCondition::AnySelected { question, values } => {
                        let question = lookup_question(questions, question)?;
                        for value in values {
                            check_option(question, value)?;
                        }
                    }
                }
            }
        }

        for rule in &self.exclusions {
            if let ExclusionRule::ById(id) = rule {
                if catalog.get(id).is_none() {
                    return Err(RuleError::UnknownItemReference(id.clone()));
                }
            }
        }

        for rule in &self.priorities {
            check_option(lookup_question(questions, &rule.question)?, &rule.trigger_value)?;
            for companion in &rule.companions {
                lookup_question(questions, companion)?;
            }
        }

        Ok(())
    }

    /// Value-to-tag mappings declared by a `TagMatch` stage for a question
    pub fn tag_mappings(&self, question_id: &str) -> Option<&[TagMapping]> {
        self.stages.iter().find_map(|stage| match &stage.kind {
            StageKind::TagMatch(mappings) if stage.question == question_id => {
                Some(mappings.as_slice())
            }
            _ => None,
        })
    }
}

fn lookup_question<'a>(
    questions: &'a QuestionSet,
    question_id: &str,
) -> Result<&'a Question, RuleError> {
    questions
        .get(question_id)
        .ok_or_else(|| RuleError::UnknownQuestion(question_id.to_string()))
}

fn check_option(question: &Question, value: &str) -> Result<(), RuleError> {
    if question.has_option(value) {
        Ok(())
    } else {
        Err(RuleError::UnknownOptionValue {
            question: question.id.clone(),
            value: value.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Rule references unknown card id: {0}")]
    UnknownItemReference(String),

    #[error("Rule references unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Rule references unknown option value {value} for question {question}")]
    UnknownOptionValue { question: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardpick_quiz::{QuestionOption, SelectionMode};

    fn catalog() -> Catalog {
        Catalog::new(vec![Card {
            id: "apex-everyday".to_string(),
            name: "Apex Everyday".to_string(),
            issuer: "Apex".to_string(),
            tags: vec![Tag::Cashback, Tag::LifetimeFree],
            annual_fee: 0,
        }])
        .unwrap()
    }

    fn questions() -> QuestionSet {
        QuestionSet::new(vec![Question {
            id: "annual-fee".to_string(),
            prompt: "How much annual fee works for you?".to_string(),
            options: vec![
                QuestionOption {
                    value: "lifetime-free".to_string(),
                    label: "No fee, ever".to_string(),
                },
                QuestionOption {
                    value: "mid".to_string(),
                    label: "Up to 5,000".to_string(),
                },
            ],
            mode: SelectionMode::Single,
            early_exit: None,
        }])
        .unwrap()
    }

    #[test]
    fn test_override_condition_matching() {
        let rule = OverrideRule {
            name: "starter".to_string(),
            card_id: "apex-everyday".to_string(),
            conditions: vec![RuleCondition::Selected {
                question: "annual-fee".to_string(),
                value: "lifetime-free".to_string(),
            }],
        };

        let mut answers = AnswerSet::default();
        assert!(!rule.fires(&answers));

        answers.set_single("annual-fee", "lifetime-free");
        assert!(rule.fires(&answers));
    }

    #[test]
    fn test_validate_unknown_card() {
        let rules = RuleSet {
            overrides: vec![OverrideRule {
                name: "ghost".to_string(),
                card_id: "no-such-card".to_string(),
                conditions: vec![],
            }],
            ..Default::default()
        };

        let result = rules.validate(&catalog(), &questions());
        assert!(matches!(
            result,
            Err(RuleError::UnknownItemReference(id)) if id == "no-such-card"
        ));
    }

    #[test]
    fn test_validate_unknown_option_value() {
        let rules = RuleSet {
            stages: vec![FilterStage {
                question: "annual-fee".to_string(),
                kind: StageKind::FeeTier(vec![FeeTier {
                    value: "platinum".to_string(),
                    min_fee: 10_000,
                    max_fee: None,
                }]),
            }],
            ..Default::default()
        };

        let result = rules.validate(&catalog(), &questions());
        assert!(matches!(
            result,
            Err(RuleError::UnknownOptionValue { value, .. }) if value == "platinum"
        ));
    }

    #[test]
    fn test_validate_unknown_question() {
        let rules = RuleSet {
            stages: vec![FilterStage {
                question: "no-such-question".to_string(),
                kind: StageKind::Issuer,
            }],
            ..Default::default()
        };

        let result = rules.validate(&catalog(), &questions());
        assert!(matches!(result, Err(RuleError::UnknownQuestion(_))));
    }

    #[test]
    fn test_exclusion_by_name_is_case_insensitive() {
        let card = Card {
            id: "crescent-heritage".to_string(),
            name: "Crescent Heritage".to_string(),
            issuer: "Crescent".to_string(),
            tags: vec![Tag::Rewards],
            annual_fee: 2999,
        };

        assert!(ExclusionRule::ByName("heritage".to_string()).excludes(&card));
        assert!(ExclusionRule::ById("crescent-heritage".to_string()).excludes(&card));
        assert!(!ExclusionRule::ById("crescent".to_string()).excludes(&card));
    }

    #[test]
    fn test_fee_tier_ranges() {
        let free = FeeTier {
            value: "lifetime-free".to_string(),
            min_fee: 0,
            max_fee: Some(0),
        };
        let open = FeeTier {
            value: "premium-fee".to_string(),
            min_fee: 5000,
            max_fee: None,
        };

        assert!(free.contains(0));
        assert!(!free.contains(1));
        assert!(open.contains(5000));
        assert!(open.contains(50_000));
        assert!(!open.contains(4999));
    }
}
