//! Bank selection: rank every candidate with the fit scorer, truncate to the
//! category count, then guarantee (best-effort) that every included archetype
//! is represented at least once in the output.

use std::collections::HashSet;

use crate::library::ContentItem;
use crate::scoring::archetype::Archetype;
use crate::scoring::fit::{rank_order, score_item, RankContext, ScoredItem};
use crate::scoring::fuzzy::best_fuzzy_match;

/// Subject-slot reservation parameters for the fit-area and subject banks.
#[derive(Debug, Clone, Copy)]
pub struct SubjectSlots<'a> {
    pub user_subjects: &'a [String],
    /// The bank whose titles the user's declared subjects are matched against.
    pub subject_bank: &'a [ContentItem],
    pub total: usize,
    pub reserved: usize,
}

/// Scores and ranks a whole bank, returning the top `count` after the
/// coverage pass. The generic path used for strengths, environments, and
/// both role lists.
pub fn rank_bank<'a>(
    items: &'a [ContentItem],
    ctx: &RankContext,
    count: usize,
) -> Vec<&'a ContentItem> {
    let ranked = score_and_sort(items, ctx);
    let picked: Vec<ScoredItem<'a>> = ranked.iter().take(count).copied().collect();
    ensure_coverage(picked, &ranked, ctx, count)
        .into_iter()
        .map(|s| s.item)
        .collect()
}

/// Fit-area selection: up to `reserved` slots go to areas related (by shared
/// archetype) to the user's fuzzy-matched subjects of interest, the rest to
/// the general ranking, then the coverage pass runs over the combined pick.
pub fn select_fit_areas<'a>(
    fit_areas: &'a [ContentItem],
    ctx: &RankContext,
    slots: SubjectSlots,
) -> Vec<&'a ContentItem> {
    let ranked = score_and_sort(fit_areas, ctx);

    let matched = match_user_subjects(slots.user_subjects, slots.subject_bank, ctx.config.fuzzy_threshold);
    let mut reserved: Vec<ScoredItem<'a>> = Vec::new();
    if !matched.is_empty() {
        let subject_archetypes: HashSet<Archetype> = matched
            .iter()
            .flat_map(|s| s.archetypes.iter().copied())
            .collect();
        reserved = ranked
            .iter()
            .filter(|s| s.item.archetypes.iter().any(|a| subject_archetypes.contains(a)))
            .take(slots.reserved)
            .copied()
            .collect();
    }

    let picked = fill_remaining(reserved, &ranked, slots.total);
    ensure_coverage(picked, &ranked, ctx, slots.total)
        .into_iter()
        .map(|s| s.item)
        .collect()
}

/// Subject selection: fuzzy-matched user subjects take the reserved slots
/// directly, the rest come from the general ranking.
pub fn select_subjects<'a>(
    subjects: &'a [ContentItem],
    ctx: &RankContext,
    user_subjects: &[String],
    total: usize,
    reserved_slots: usize,
) -> Vec<&'a ContentItem> {
    let ranked = score_and_sort(subjects, ctx);

    let matched = match_user_subjects(user_subjects, subjects, ctx.config.fuzzy_threshold);
    let reserved: Vec<ScoredItem<'a>> = matched
        .iter()
        .take(reserved_slots)
        .filter_map(|item| ranked.iter().find(|s| s.item.title == item.title))
        .copied()
        .collect();

    let picked = fill_remaining(reserved, &ranked, total);
    ensure_coverage(picked, &ranked, ctx, total)
        .into_iter()
        .map(|s| s.item)
        .collect()
}

/// Resolves each declared subject against bank titles by edit distance.
/// Unmatched subjects are skipped; duplicates collapse to one entry.
pub fn match_user_subjects<'a>(
    user_subjects: &[String],
    bank: &'a [ContentItem],
    threshold: f64,
) -> Vec<&'a ContentItem> {
    let titles: Vec<String> = bank.iter().map(|s| s.title.to_lowercase()).collect();
    let mut matched: Vec<&ContentItem> = Vec::new();
    for raw in user_subjects {
        let query = raw.trim().to_lowercase();
        if query.is_empty() {
            continue;
        }
        let Some(best) = best_fuzzy_match(&query, titles.iter().map(String::as_str), threshold)
        else {
            continue;
        };
        if let Some(item) = bank.iter().find(|s| s.title.to_lowercase() == best) {
            if !matched.iter().any(|m| m.title == item.title) {
                matched.push(item);
            }
        }
    }
    matched
}

fn score_and_sort<'a>(items: &'a [ContentItem], ctx: &RankContext) -> Vec<ScoredItem<'a>> {
    let mut scored: Vec<ScoredItem<'a>> = items
        .iter()
        .map(|item| ScoredItem {
            item,
            score: score_item(item, ctx),
        })
        .collect();
    scored.sort_by(rank_order);
    scored
}

/// Tops up `reserved` from the ranking, skipping duplicates by title.
fn fill_remaining<'a>(
    reserved: Vec<ScoredItem<'a>>,
    ranked: &[ScoredItem<'a>],
    total: usize,
) -> Vec<ScoredItem<'a>> {
    let mut out = reserved;
    for candidate in ranked {
        if out.len() >= total {
            break;
        }
        if out.iter().any(|p| p.item.title == candidate.item.title) {
            continue;
        }
        out.push(*candidate);
    }
    out.truncate(total);
    out
}

/// For each included archetype missing from the pick, swaps in the best
/// unchosen candidate carrying it, evicting the lowest-ranked chosen item.
/// Best-effort: an archetype no candidate carries is skipped. The final list
/// is re-sorted by the total order so sections always read best-first.
fn ensure_coverage<'a>(
    mut picked: Vec<ScoredItem<'a>>,
    ranked: &[ScoredItem<'a>],
    ctx: &RankContext,
    limit: usize,
) -> Vec<ScoredItem<'a>> {
    for member in ctx.included.members() {
        let archetype = member.archetype;
        if picked.iter().any(|s| s.item.archetypes.contains(&archetype)) {
            continue;
        }
        // `ranked` is already in rank order, so the first hit is the best
        let candidate = ranked.iter().find(|s| {
            s.item.archetypes.contains(&archetype)
                && !picked.iter().any(|p| p.item.title == s.item.title)
        });
        let Some(candidate) = candidate else {
            continue;
        };
        let worst = (0..picked.len()).max_by(|&i, &j| rank_order(&picked[i], &picked[j]));
        if let Some(worst) = worst {
            picked[worst] = *candidate;
        }
    }
    picked.sort_by(rank_order);
    picked.truncate(limit);
    picked
}
