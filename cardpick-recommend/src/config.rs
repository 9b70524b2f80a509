use serde::{Deserialize, Serialize};

use cardpick_catalog::{Card, CatalogError};
use cardpick_quiz::{Question, QuestionSetError};

use crate::rules::{RuleError, RuleSet};

/// Host-supplied engine configuration: the card catalog, the questionnaire,
/// and the rule set, typically loaded from a single JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub catalog: Vec<Card>,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub rules: RuleSet,
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid question set: {0}")]
    Questions(#[from] QuestionSetError),

    #[error("Invalid rules: {0}")]
    Rules(#[from] RuleError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Recommender;

    #[test]
    fn test_config_from_json() {
        let raw = r#"{
            "catalog": [
                {
                    "id": "apex-everyday",
                    "name": "Apex Everyday",
                    "issuer": "Apex",
                    "tags": ["cashback", "lifetime-free"],
                    "annual_fee": 0
                }
            ],
            "questions": [
                {
                    "id": "reward-style",
                    "prompt": "Points or cashback?",
                    "options": [
                        { "value": "rewards", "label": "Reward points" },
                        { "value": "cashback", "label": "Cashback" }
                    ],
                    "mode": "SINGLE"
                }
            ],
            "rules": {
                "stages": [
                    {
                        "question": "reward-style",
                        "kind": {
                            "TagMatch": [
                                { "value": "cashback", "tag": "cashback" },
                                { "value": "rewards", "tag": "rewards" }
                            ]
                        }
                    }
                ]
            }
        }"#;

        let config = EngineConfig::from_json_str(raw).unwrap();
        assert_eq!(config.catalog.len(), 1);
        assert_eq!(config.questions.len(), 1);
        assert_eq!(config.rules.stages.len(), 1);

        let recommender = Recommender::from_config(config).unwrap();
        assert_eq!(recommender.catalog().len(), 1);
    }

    #[test]
    fn test_config_rejects_dangling_reference() {
        let raw = r#"{
            "catalog": [],
            "questions": [
                {
                    "id": "reward-style",
                    "prompt": "Points or cashback?",
                    "options": [{ "value": "rewards", "label": "Reward points" }],
                    "mode": "SINGLE"
                }
            ],
            "rules": {
                "overrides": [
                    { "name": "ghost", "card_id": "missing", "conditions": [] }
                ]
            }
        }"#;

        let config = EngineConfig::from_json_str(raw).unwrap();
        let result = Recommender::from_config(config);
        assert!(matches!(result, Err(ConfigError::Rules(_))));
    }
}
