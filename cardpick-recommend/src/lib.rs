pub mod config;
pub mod defaults;
pub mod engine;
pub mod pipeline;
pub mod rules;

pub use config::{ConfigError, EngineConfig};
pub use engine::Recommender;
pub use pipeline::{evaluate, Recommendation, MAX_RESULTS};
pub use rules::{
    ExclusionRule, FeeTier, FilterStage, OverrideRule, PriorityRule, RuleCondition, RuleError,
    RuleSet, SpendBucket, StageKind, TagMapping,
};
