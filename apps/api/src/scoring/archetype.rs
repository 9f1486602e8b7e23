//! The seven archetypes, plus the per-request inclusion and weighting rules.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;

/// One of the seven fixed personality/work-style categories.
/// The closed primary classification axis — never extended at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Achiever,
    Connector,
    Creator,
    Explorer,
    Organizer,
    Thinker,
    Visionary,
}

impl Archetype {
    pub const ALL: [Archetype; 7] = [
        Archetype::Achiever,
        Archetype::Connector,
        Archetype::Creator,
        Archetype::Explorer,
        Archetype::Organizer,
        Archetype::Thinker,
        Archetype::Visionary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Achiever => "Achiever",
            Archetype::Connector => "Connector",
            Archetype::Creator => "Creator",
            Archetype::Explorer => "Explorer",
            Archetype::Organizer => "Organizer",
            Archetype::Thinker => "Thinker",
            Archetype::Visionary => "Visionary",
        }
    }

    /// Case-insensitive name lookup. Unknown names resolve to `None`;
    /// the boundary drops them rather than erroring per-name.
    pub fn parse(raw: &str) -> Option<Archetype> {
        let trimmed = raw.trim();
        Archetype::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(trimmed))
    }

    /// Canonical definition text, surfaced to the prose model via the prompt META.
    pub fn definition(self) -> &'static str {
        match self {
            Archetype::Achiever => {
                "An Achiever is ambitious, driven, and focused on results. They set high \
                 standards, work hard to meet goals, and take pride in pushing their limits. \
                 Achievers thrive in fast-paced environments where performance is recognised \
                 and rewarded."
            }
            Archetype::Connector => {
                "A Connector is people-focused, empathetic, and great at building \
                 relationships. They feel energised by collaboration, love supporting others, \
                 and are often the glue that holds a team or community together."
            }
            Archetype::Creator => {
                "A Creator is imaginative, hands-on, and expressive. They enjoy turning ideas \
                 into reality through art, design, technology, or storytelling. Creators \
                 thrive when given freedom to innovate and explore new forms."
            }
            Archetype::Explorer => {
                "An Explorer is curious, adventurous, and driven by discovery. They love \
                 trying new things, asking big questions, and learning through real-world \
                 experiences. Explorers get bored with routine and crave variety and challenge."
            }
            Archetype::Organizer => {
                "An Organizer is structured, dependable, and detail-oriented. They bring \
                 order to chaos, love planning and systems, and thrive in environments where \
                 reliability and accuracy are essential."
            }
            Archetype::Thinker => {
                "A Thinker is analytical, logical, and reflective. They enjoy solving complex \
                 problems, diving deep into topics, and making sense of patterns. Thinkers \
                 are most comfortable in roles that reward independence and intellectual depth."
            }
            Archetype::Visionary => {
                "A Visionary is future-focused, bold, and full of ideas. They're passionate \
                 about making a difference and inspired by big-picture thinking. Visionaries \
                 thrive in spaces where they can lead change, innovate, and inspire others."
            }
        }
    }
}

/// A raw per-request archetype score on the 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeScore {
    pub archetype: Archetype,
    pub score: f64,
}

/// One member of the included set, carrying its normalized weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IncludedArchetype {
    pub archetype: Archetype,
    pub score: f64,
    pub weight: f64,
}

/// The 1–3 archetypes selected for a request, in descending raw-score order,
/// weights summing to 1. Empty only when the input score table was empty,
/// which the boundary rejects before the core runs.
#[derive(Debug, Clone, Default)]
pub struct IncludedSet {
    members: Vec<IncludedArchetype>,
}

impl IncludedSet {
    pub fn members(&self) -> &[IncludedArchetype] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, archetype: Archetype) -> bool {
        self.members.iter().any(|m| m.archetype == archetype)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.members.iter().map(|m| m.archetype.name()).collect()
    }
}

/// Applies the inclusion rule over raw scores.
///
/// Scores are sorted descending (stable — ties keep input order). Rank-1 is
/// always included; further archetypes are included in rank order while their
/// raw score clears `min_include` and the set holds fewer than `max_included`.
pub fn select_included(scores: &[ArchetypeScore], config: &ScoringConfig) -> IncludedSet {
    let mut sorted: Vec<ArchetypeScore> = scores.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut selected: Vec<ArchetypeScore> = Vec::new();
    for (rank, entry) in sorted.iter().enumerate() {
        if selected.len() >= config.max_included {
            break;
        }
        if rank == 0 || entry.score >= config.min_include {
            selected.push(*entry);
        } else {
            break; // sorted descending, nothing further can qualify
        }
    }

    IncludedSet {
        members: assign_weights(selected, config),
    }
}

/// Normalizes weights so the dominant archetype is over-represented
/// super-linearly: (score + hard bonus if auto-include)^exponent, divided by
/// the sum across the included set.
fn assign_weights(selected: Vec<ArchetypeScore>, config: &ScoringConfig) -> Vec<IncludedArchetype> {
    let transformed: Vec<f64> = selected
        .iter()
        .map(|entry| {
            let bonus = if entry.score >= config.auto_include {
                config.hard_bonus
            } else {
                0.0
            };
            (entry.score + bonus).max(0.0).powf(config.weight_exponent)
        })
        .collect();

    let sum: f64 = transformed.iter().sum();
    let count = selected.len().max(1) as f64;
    selected
        .into_iter()
        .zip(transformed)
        .map(|(entry, w)| IncludedArchetype {
            archetype: entry.archetype,
            score: entry.score,
            // an all-zero transform (top score 0) degenerates to equal weights
            weight: if sum > 0.0 { w / sum } else { 1.0 / count },
        })
        .collect()
}

#[cfg(test)]
impl IncludedSet {
    /// Test-only constructor with explicit weights, for exercising the fit
    /// scorer at exact weight values.
    pub(crate) fn pinned_for_tests(members: Vec<(Archetype, f64, f64)>) -> Self {
        Self {
            members: members
                .into_iter()
                .map(|(archetype, score, weight)| IncludedArchetype {
                    archetype,
                    score,
                    weight,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(archetype: Archetype, score: f64) -> ArchetypeScore {
        ArchetypeScore { archetype, score }
    }

    fn weight_sum(set: &IncludedSet) -> f64 {
        set.members().iter().map(|m| m.weight).sum()
    }

    #[test]
    fn test_top_archetype_always_included() {
        let set = select_included(
            &[score(Archetype::Creator, 42.0), score(Archetype::Thinker, 38.0)],
            &ScoringConfig::default(),
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.members()[0].archetype, Archetype::Creator);
    }

    #[test]
    fn test_below_threshold_not_auto_included() {
        // Visionary at 55 is below 60 and not rank-1, so it stays out even
        // though a third slot is free.
        let set = select_included(
            &[
                score(Archetype::Achiever, 85.0),
                score(Archetype::Thinker, 70.0),
                score(Archetype::Visionary, 55.0),
                score(Archetype::Connector, 20.0),
            ],
            &ScoringConfig::default(),
        );
        assert_eq!(set.names(), vec!["Achiever", "Thinker"]);
    }

    #[test]
    fn test_soft_cap_at_three() {
        let set = select_included(
            &[
                score(Archetype::Achiever, 90.0),
                score(Archetype::Thinker, 85.0),
                score(Archetype::Visionary, 80.0),
                score(Archetype::Connector, 75.0),
            ],
            &ScoringConfig::default(),
        );
        assert_eq!(set.len(), 3);
        assert!(!set.contains(Archetype::Connector));
    }

    #[test]
    fn test_threshold_tie_keeps_input_order() {
        // Exact tie at the boundary: stable sort preserves input order,
        // so the first-listed archetype wins the remaining slots.
        let set = select_included(
            &[
                score(Archetype::Achiever, 90.0),
                score(Archetype::Creator, 60.0),
                score(Archetype::Explorer, 60.0),
                score(Archetype::Organizer, 60.0),
            ],
            &ScoringConfig::default(),
        );
        assert_eq!(set.names(), vec!["Achiever", "Creator", "Explorer"]);
    }

    #[test]
    fn test_empty_input_gives_empty_set() {
        let set = select_included(&[], &ScoringConfig::default());
        assert!(set.is_empty());
    }

    #[test]
    fn test_weights_sum_to_one() {
        let set = select_included(
            &[
                score(Archetype::Achiever, 85.0),
                score(Archetype::Thinker, 70.0),
                score(Archetype::Visionary, 62.0),
            ],
            &ScoringConfig::default(),
        );
        assert!((weight_sum(&set) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dominant_archetype_over_represented() {
        // 85 vs 70 raw is ~1.21x, but the exponent plus the hard bonus at 85
        // pushes the weight ratio well past that.
        let set = select_included(
            &[score(Archetype::Achiever, 85.0), score(Archetype::Thinker, 70.0)],
            &ScoringConfig::default(),
        );
        let ratio = set.members()[0].weight / set.members()[1].weight;
        assert!(ratio > 85.0 / 70.0, "ratio was {ratio}");
    }

    #[test]
    fn test_hard_bonus_applies_at_auto_include() {
        let with_bonus = select_included(
            &[score(Archetype::Achiever, 80.0), score(Archetype::Thinker, 70.0)],
            &ScoringConfig::default(),
        );
        let without = select_included(
            &[score(Archetype::Achiever, 79.9), score(Archetype::Thinker, 70.0)],
            &ScoringConfig::default(),
        );
        assert!(with_bonus.members()[0].weight > without.members()[0].weight);
    }

    #[test]
    fn test_zero_scores_degenerate_to_equal_weights() {
        let set = select_included(&[score(Archetype::Achiever, 0.0)], &ScoringConfig::default());
        assert_eq!(set.len(), 1);
        assert_eq!(set.members()[0].weight, 1.0);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Archetype::parse(" thinker "), Some(Archetype::Thinker));
        assert_eq!(Archetype::parse("VISIONARY"), Some(Archetype::Visionary));
        assert_eq!(Archetype::parse("Wizard"), None);
    }
}
