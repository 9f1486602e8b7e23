//! Per-item sub-dimension hints: for each selected item, pick the allowed
//! sub-dimensions with the strongest summed affinity toward the item's
//! archetype tags. The output only enriches the prose prompt — it never
//! feeds back into scoring.

use crate::scoring::archetype::Archetype;
use crate::scoring::matrix::{SubDimension, TraitGroup};

/// Picks up to `n` hints for one item. Candidates are scored by summing the
/// matrix affinity toward each tag; ties keep the input order of `allowed`
/// (pre-sorted by personal weight descending). When nothing scores above
/// zero — or the item has no tags — the first `n` allowed sub-dimensions come
/// back unscored, so every item still gets some hint material.
pub fn derive_hints(
    tags: &[Archetype],
    allowed: &[SubDimension],
    n: usize,
) -> Vec<SubDimension> {
    if tags.is_empty() || allowed.is_empty() {
        return allowed.iter().copied().take(n).collect();
    }

    let mut scored: Vec<(SubDimension, f64)> = allowed
        .iter()
        .copied()
        .map(|sd| (sd, tags.iter().map(|tag| sd.affinity(*tag)).sum::<f64>()))
        .filter(|(_, affinity)| *affinity > 0.0)
        .collect();

    if scored.is_empty() {
        return allowed.iter().copied().take(n).collect();
    }

    scored.sort_by(|a, b| b.1.total_cmp(&a.1)); // stable: ties keep allowed order
    scored.into_iter().take(n).map(|(sd, _)| sd).collect()
}

/// Builds a section's hint pool from the allowed list: group-major order
/// (each group's members in their allowed order), duplicates dropped.
pub fn section_pool(allowed: &[SubDimension], groups: &[TraitGroup]) -> Vec<SubDimension> {
    let mut pool = Vec::new();
    for group in groups {
        for sd in allowed {
            if sd.group() == *group && !pool.contains(sd) {
                pool.push(*sd);
            }
        }
    }
    pool
}
