//! The fit scorer — the central ranking primitive, reused identically across
//! every content category.
//!
//! Positive part rewards presence and positional alignment of the user's
//! included archetypes in the item's ordered tags. Negative part penalizes
//! tags whose raw (full-table) score is low, even when that archetype was not
//! included — the item leans on a trait the user does not have much of.

use std::cmp::Ordering;

use tracing::debug;

use crate::config::ScoringConfig;
use crate::library::ContentItem;
use crate::scoring::archetype::{ArchetypeScore, IncludedSet};

/// Bonus when the user's rank-N archetype is the item's first tag.
const FIRST_TAG_BONUS: [f64; 3] = [3.0, 2.0, 1.5];
/// Bonus when it appears anywhere else in the tags.
const ANY_TAG_BONUS: [f64; 3] = [2.0, 1.0, 0.7];
/// Penalty discount by tag position; positions past the third reuse the last.
const POSITION_WEIGHTS: [f64; 3] = [1.0, 0.6, 0.4];

/// Everything the scorer and selectors need for one request.
#[derive(Debug, Clone, Copy)]
pub struct RankContext<'a> {
    pub included: &'a IncludedSet,
    /// The raw, unfiltered score table — penalty lookups use this, not the
    /// included set.
    pub full_scores: &'a [ArchetypeScore],
    pub config: &'a ScoringConfig,
}

/// An item paired with its fit score for this request.
#[derive(Debug, Clone, Copy)]
pub struct ScoredItem<'a> {
    pub item: &'a ContentItem,
    pub score: f64,
}

/// Computes the scalar fit score. Pure: identical inputs give identical
/// output. Items with no tags score exactly 0 and sort last.
pub fn score_item(item: &ContentItem, ctx: &RankContext) -> f64 {
    let tags = &item.archetypes;
    if tags.is_empty() {
        return 0.0;
    }

    let mut score = 0.0;
    let mut matched = 0usize;
    for (rank, member) in ctx.included.members().iter().take(3).enumerate() {
        if tags.first() == Some(&member.archetype) {
            score += FIRST_TAG_BONUS[rank] * member.weight;
            matched += 1;
        } else if tags.contains(&member.archetype) {
            score += ANY_TAG_BONUS[rank] * member.weight;
            matched += 1;
        }
    }
    score += match matched {
        3 => 0.75,
        2 => 0.4,
        1 => 0.1,
        _ => 0.0,
    };

    let mut total_penalty = 0.0;
    for (idx, tag) in tags.iter().enumerate() {
        let Some(raw) = ctx
            .full_scores
            .iter()
            .find(|s| s.archetype == *tag)
            .map(|s| s.score)
        else {
            continue;
        };
        let base = if raw < 50.0 {
            1.2
        } else if raw < 60.0 {
            0.8
        } else {
            continue;
        };
        let position_weight = POSITION_WEIGHTS
            .get(idx)
            .copied()
            .unwrap_or(POSITION_WEIGHTS[2]);
        let penalty = base * position_weight;
        debug!(
            item = %item.title,
            tag = tag.name(),
            raw,
            position = idx,
            penalty,
            "low-affinity tag penalty"
        );
        total_penalty += penalty;
    }

    // the summed penalty is capped; scores may still go negative
    score - total_penalty.min(ctx.config.max_penalty)
}

/// The total order used everywhere items are ranked: score descending, then
/// fewer tags first (specificity), then case-insensitive title — so any two
/// distinct items compare strictly.
pub fn rank_order(a: &ScoredItem, b: &ScoredItem) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.item.archetypes.len().cmp(&b.item.archetypes.len()))
        .then_with(|| {
            a.item
                .title
                .to_lowercase()
                .cmp(&b.item.title.to_lowercase())
        })
}
