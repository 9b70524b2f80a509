//! Built-in questionnaire, rules, and sample catalog. Hosts normally supply
//! their own via `EngineConfig`; these defaults back the demo flow and the
//! integration tests.

use cardpick_catalog::{Card, Tag};
use cardpick_quiz::{EarlyExit, Question, QuestionOption, SelectionMode};

use crate::config::EngineConfig;
use crate::rules::{
    ExclusionRule, FeeTier, FilterStage, OverrideRule, PriorityRule, RuleCondition, RuleSet,
    SpendBucket, StageKind, TagMapping,
};

fn card(id: &str, name: &str, issuer: &str, tags: &[Tag], annual_fee: u32) -> Card {
    Card {
        id: id.to_string(),
        name: name.to_string(),
        issuer: issuer.to_string(),
        tags: tags.to_vec(),
        annual_fee,
    }
}

pub fn default_cards() -> Vec<Card> {
    vec![
        card(
            "apex-everyday",
            "Apex Everyday",
            "Apex",
            &[Tag::Cashback, Tag::LifetimeFree, Tag::Shopping],
            0,
        ),
        card(
            "apex-voyage",
            "Apex Voyage",
            "Apex",
            &[Tag::Travel, Tag::Rewards, Tag::DomesticLounge],
            2999,
        ),
        card(
            "harbor-fuel-plus",
            "Harbor Fuel Plus",
            "Harbor",
            &[Tag::Fuel, Tag::Cashback],
            499,
        ),
        card(
            "harbor-voyager-infinite",
            "Harbor Voyager Infinite",
            "Harbor",
            &[
                Tag::Travel,
                Tag::InternationalLounge,
                Tag::DomesticLounge,
                Tag::Premium,
                Tag::Rewards,
            ],
            9999,
        ),
        card(
            "summit-rewards-classic",
            "Summit Rewards Classic",
            "Summit",
            &[Tag::Rewards, Tag::LifetimeFree, Tag::Groceries],
            0,
        ),
        card(
            "summit-dine-more",
            "Summit Dine More",
            "Summit",
            &[Tag::Dining, Tag::Rewards],
            999,
        ),
        card(
            "summit-skyline",
            "Summit Skyline",
            "Summit",
            &[Tag::Travel, Tag::Fuel, Tag::Rewards, Tag::DomesticLounge],
            4999,
        ),
        card(
            "crescent-platinum",
            "Crescent Platinum",
            "Crescent",
            &[Tag::Premium, Tag::Rewards, Tag::DomesticLounge, Tag::Travel],
            4999,
        ),
        // Discontinued line, kept in the catalog for historical links but
        // denylisted from recommendations
        card(
            "crescent-heritage",
            "Crescent Heritage",
            "Crescent",
            &[Tag::Rewards, Tag::Shopping],
            2999,
        ),
        card(
            "meridian-obsidian",
            "Meridian Obsidian",
            "Meridian",
            &[
                Tag::UltraPremium,
                Tag::InternationalLounge,
                Tag::DomesticLounge,
                Tag::Travel,
                Tag::Rewards,
            ],
            29_999,
        ),
        card(
            "meridian-shield",
            "Meridian Shield",
            "Meridian",
            &[Tag::Secured, Tag::Cashback],
            499,
        ),
        card(
            "meridian-grocer",
            "Meridian Grocer",
            "Meridian",
            &[Tag::Groceries, Tag::Cashback, Tag::LifetimeFree],
            0,
        ),
    ]
}

fn option(value: &str, label: &str) -> QuestionOption {
    QuestionOption {
        value: value.to_string(),
        label: label.to_string(),
    }
}

pub fn default_questions() -> Vec<Question> {
    vec![
        Question {
            id: "credit-score".to_string(),
            prompt: "What is your credit score?".to_string(),
            options: vec![
                option("excellent", "750 or above"),
                option("good", "700 to 749"),
                option("fair", "650 to 699"),
                option("poor", "Below 650, or no credit history"),
            ],
            mode: SelectionMode::Single,
            early_exit: Some(EarlyExit {
                values: vec!["poor".to_string()],
            }),
        },
        Question {
            id: "issuer".to_string(),
            prompt: "Which banks do you prefer?".to_string(),
            options: vec![
                option("Apex", "Apex Bank"),
                option("Harbor", "Harbor Bank"),
                option("Summit", "Summit Bank"),
                option("Crescent", "Crescent Bank"),
                option("Meridian", "Meridian Bank"),
            ],
            mode: SelectionMode::Multiple { max_selections: 3 },
            early_exit: None,
        },
        Question {
            id: "annual-fee".to_string(),
            prompt: "How much annual fee are you comfortable with?".to_string(),
            options: vec![
                option("lifetime-free", "No fee, ever"),
                option("entry", "Up to 1,000"),
                option("mid", "1,000 to 5,000"),
                option("premium-fee", "Above 5,000"),
            ],
            mode: SelectionMode::Single,
            early_exit: None,
        },
        Question {
            id: "monthly-spend".to_string(),
            prompt: "How much do you spend on cards in a month?".to_string(),
            options: vec![
                option("under-25k", "Under 25,000"),
                option("25k-75k", "25,000 to 75,000"),
                option("above-75k", "Above 75,000"),
            ],
            mode: SelectionMode::Single,
            early_exit: None,
        },
        Question {
            id: "spend-categories".to_string(),
            prompt: "Where do you spend the most?".to_string(),
            options: vec![
                option("fuel", "Fuel"),
                option("travel", "Travel"),
                option("shopping", "Shopping"),
                option("dining", "Dining out"),
                option("groceries", "Groceries"),
            ],
            mode: SelectionMode::Multiple { max_selections: 3 },
            early_exit: None,
        },
        Question {
            id: "lounge-access".to_string(),
            prompt: "How often do you fly?".to_string(),
            options: vec![
                option("international", "Internationally, several times a year"),
                option("domestic", "Domestic routes, a few times a year"),
                option("rarely", "Rarely or never"),
            ],
            mode: SelectionMode::Single,
            early_exit: None,
        },
        Question {
            id: "reward-style".to_string(),
            prompt: "Reward points or straight cashback?".to_string(),
            options: vec![
                option("rewards", "Reward points"),
                option("cashback", "Cashback"),
            ],
            mode: SelectionMode::Multiple { max_selections: 2 },
            early_exit: None,
        },
    ]
}

pub fn default_rules() -> RuleSet {
    RuleSet {
        stages: vec![
            FilterStage {
                question: "issuer".to_string(),
                kind: StageKind::Issuer,
            },
            FilterStage {
                question: "annual-fee".to_string(),
                kind: StageKind::FeeTier(vec![
                    FeeTier {
                        value: "lifetime-free".to_string(),
                        min_fee: 0,
                        max_fee: Some(0),
                    },
                    FeeTier {
                        value: "entry".to_string(),
                        min_fee: 1,
                        max_fee: Some(999),
                    },
                    FeeTier {
                        value: "mid".to_string(),
                        min_fee: 1000,
                        max_fee: Some(4999),
                    },
                    FeeTier {
                        value: "premium-fee".to_string(),
                        min_fee: 5000,
                        max_fee: None,
                    },
                ]),
            },
            FilterStage {
                question: "monthly-spend".to_string(),
                kind: StageKind::SpendCeiling(vec![
                    SpendBucket {
                        value: "under-25k".to_string(),
                        excluded: vec![Tag::Premium, Tag::UltraPremium],
                    },
                    SpendBucket {
                        value: "25k-75k".to_string(),
                        excluded: vec![Tag::UltraPremium],
                    },
                    SpendBucket {
                        value: "above-75k".to_string(),
                        excluded: vec![],
                    },
                ]),
            },
            FilterStage {
                question: "spend-categories".to_string(),
                kind: StageKind::TagMatch(vec![
                    TagMapping {
                        value: "fuel".to_string(),
                        tag: Tag::Fuel,
                    },
                    TagMapping {
                        value: "travel".to_string(),
                        tag: Tag::Travel,
                    },
                    TagMapping {
                        value: "shopping".to_string(),
                        tag: Tag::Shopping,
                    },
                    TagMapping {
                        value: "dining".to_string(),
                        tag: Tag::Dining,
                    },
                    TagMapping {
                        value: "groceries".to_string(),
                        tag: Tag::Groceries,
                    },
                ]),
            },
            FilterStage {
                question: "lounge-access".to_string(),
                // "rarely" has no mapping on purpose: it imposes no constraint
                kind: StageKind::TagMatch(vec![
                    TagMapping {
                        value: "international".to_string(),
                        tag: Tag::InternationalLounge,
                    },
                    TagMapping {
                        value: "domestic".to_string(),
                        tag: Tag::DomesticLounge,
                    },
                ]),
            },
            FilterStage {
                question: "reward-style".to_string(),
                kind: StageKind::TagMatch(vec![
                    TagMapping {
                        value: "rewards".to_string(),
                        tag: Tag::Rewards,
                    },
                    TagMapping {
                        value: "cashback".to_string(),
                        tag: Tag::Cashback,
                    },
                ]),
            },
        ],
        overrides: vec![
            OverrideRule {
                name: "Frequent flyer flagship".to_string(),
                card_id: "harbor-voyager-infinite".to_string(),
                conditions: vec![
                    RuleCondition::Selected {
                        question: "lounge-access".to_string(),
                        value: "international".to_string(),
                    },
                    RuleCondition::AnySelected {
                        question: "monthly-spend".to_string(),
                        values: vec!["25k-75k".to_string(), "above-75k".to_string()],
                    },
                ],
            },
            OverrideRule {
                name: "Starter cashback pick".to_string(),
                card_id: "apex-everyday".to_string(),
                conditions: vec![
                    RuleCondition::Selected {
                        question: "annual-fee".to_string(),
                        value: "lifetime-free".to_string(),
                    },
                    RuleCondition::Selected {
                        question: "reward-style".to_string(),
                        value: "cashback".to_string(),
                    },
                ],
            },
        ],
        exclusions: vec![ExclusionRule::ById("crescent-heritage".to_string())],
        priorities: vec![PriorityRule {
            name: "Fuel first".to_string(),
            question: "spend-categories".to_string(),
            trigger_value: "fuel".to_string(),
            tag: Tag::Fuel,
            companions: vec!["lounge-access".to_string(), "reward-style".to_string()],
        }],
    }
}

/// The default catalog, questionnaire, and rules bundled as a config
pub fn default_config() -> EngineConfig {
    EngineConfig {
        catalog: default_cards(),
        questions: default_questions(),
        rules: default_rules(),
    }
}
