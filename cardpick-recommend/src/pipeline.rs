use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use cardpick_catalog::{Card, Catalog, Tag};
use cardpick_quiz::AnswerSet;

use crate::rules::{ExclusionRule, PriorityRule, RuleSet, StageKind};

/// Display cap for ranked results
pub const MAX_RESULTS: usize = 3;

/// Outcome of a completed questionnaire
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// The early-exit branch fired; no catalog cards apply
    Alternate,
    /// Ranked, deduplicated cards, at most `MAX_RESULTS`
    Ranked { cards: Vec<Card> },
}

/// Pure filter/override pipeline over an immutable catalog and a completed
/// answer set. Deterministic: the same inputs always produce the same
/// ordered result.
///
/// Steps, in order: stage filters, override insertion, exclusion, priority
/// reordering, empty-result fallback, minimum-size backfill, truncation.
pub fn evaluate(catalog: &Catalog, answers: &AnswerSet, rules: &RuleSet) -> Vec<Card> {
    // Stage filters: OR across a stage's selected values, AND across stages.
    // An unanswered question imposes no constraint.
    let mut candidates: Vec<&Card> = catalog.cards().iter().collect();
    for stage in &rules.stages {
        let selected = answers.selected_values(&stage.question);
        if selected.is_empty() {
            continue;
        }
        let before = candidates.len();
        candidates.retain(|card| stage_passes(card, &stage.kind, selected));
        debug!(
            "Stage {} narrowed candidates {} -> {}",
            stage.question,
            before,
            candidates.len()
        );
    }

    // Overrides are evaluated against the answers, not the filtered set, and
    // form a pinned front block in declaration order.
    let mut pinned: Vec<&Card> = Vec::new();
    for rule in &rules.overrides {
        if !rule.fires(answers) {
            continue;
        }
        if let Some(card) = catalog.get(&rule.card_id) {
            if !pinned.iter().any(|c| c.id == card.id) {
                debug!("Override {} pins {}", rule.name, card.id);
                pinned.push(card);
            }
        }
    }

    // Exclusion wins over everything, overrides and backfill included.
    let excluded = |card: &Card| rules.exclusions.iter().any(|r| r.excludes(card));
    pinned.retain(|card| !excluded(card));
    let mut tail: Vec<&Card> = candidates
        .into_iter()
        .filter(|card| !excluded(card))
        .filter(|card| !pinned.iter().any(|p| p.id == card.id))
        .collect();

    // Priority reordering touches only the unpinned tail, as a stable
    // partition so relative order survives within each half.
    for rule in &rules.priorities {
        if !answers.contains(&rule.question, &rule.trigger_value) {
            continue;
        }
        let companions = companion_tags(rule, answers, rules);
        if companions.is_empty() {
            continue;
        }
        let (mut promoted, rest): (Vec<&Card>, Vec<&Card>) = tail.into_iter().partition(|card| {
            card.has_tag(rule.tag) && card.tags.iter().any(|t| companions.contains(t))
        });
        debug!("Priority {} promoted {} cards", rule.name, promoted.len());
        promoted.extend(rest);
        tail = promoted;
    }

    let mut result: Vec<&Card> = pinned;
    result.extend(tail);

    if result.is_empty() {
        // Fallback: the broad default pool stands in for an over-filtered result
        result = default_pool(catalog, &rules.exclusions);
    } else if result.len() < MAX_RESULTS {
        // Backfill up to the display minimum, skipping cards already present
        for card in default_pool(catalog, &rules.exclusions) {
            if result.len() >= MAX_RESULTS {
                break;
            }
            if result.iter().any(|c| c.id == card.id) {
                continue;
            }
            result.push(card);
        }
    }

    result.truncate(MAX_RESULTS);
    result.into_iter().cloned().collect()
}

fn stage_passes(card: &Card, kind: &StageKind, selected: &[String]) -> bool {
    match kind {
        StageKind::Issuer => selected.iter().any(|value| card.issuer == *value),
        StageKind::FeeTier(tiers) => {
            let active: Vec<_> = tiers.iter().filter(|t| selected.contains(&t.value)).collect();
            if active.is_empty() {
                return true;
            }
            active.iter().any(|tier| tier.contains(card.annual_fee))
        }
        StageKind::SpendCeiling(buckets) => {
            let active: Vec<_> = buckets
                .iter()
                .filter(|b| selected.contains(&b.value))
                .collect();
            if active.is_empty() {
                return true;
            }
            active
                .iter()
                .any(|bucket| !bucket.excluded.iter().any(|tag| card.has_tag(*tag)))
        }
        StageKind::TagMatch(mappings) => {
            let active: Vec<Tag> = mappings
                .iter()
                .filter(|m| selected.contains(&m.value))
                .map(|m| m.tag)
                .collect();
            if active.is_empty() {
                return true;
            }
            active.iter().any(|tag| card.has_tag(*tag))
        }
    }
}

/// Tags selected on the trigger question and its companions, excluding the
/// rule's own trigger tag
fn companion_tags(rule: &PriorityRule, answers: &AnswerSet, rules: &RuleSet) -> HashSet<Tag> {
    let mut tags = HashSet::new();
    let question_ids =
        std::iter::once(rule.question.as_str()).chain(rule.companions.iter().map(String::as_str));
    for question_id in question_ids {
        let Some(mappings) = rules.tag_mappings(question_id) else {
            continue;
        };
        let selected = answers.selected_values(question_id);
        for mapping in mappings {
            if selected.contains(&mapping.value) {
                tags.insert(mapping.tag);
            }
        }
    }
    tags.remove(&rule.tag);
    tags
}

/// Broad default subset used for fallback and backfill: everything except
/// ultra-premium and secured cards, minus the denylist
fn default_pool<'a>(catalog: &'a Catalog, exclusions: &[ExclusionRule]) -> Vec<&'a Card> {
    catalog
        .cards()
        .iter()
        .filter(|card| !card.has_tag(Tag::UltraPremium) && !card.has_tag(Tag::Secured))
        .filter(|card| !exclusions.iter().any(|r| r.excludes(card)))
        .collect()
}
