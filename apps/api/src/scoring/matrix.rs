//! The trait matrix: 24 sub-dimensions, each with a fixed affinity (0–1)
//! toward each of the 7 archetypes. Pure data, immutable at runtime.
//!
//! Membership checks elsewhere treat ANY nonzero affinity as a link, so a
//! future negative affinity would still count — the shipped matrix is
//! entirely non-negative today.

use serde::{Deserialize, Serialize};

use crate::scoring::archetype::Archetype;

/// The four trait groups the 24 sub-dimensions divide into (six each).
/// Used to build section-specific hint pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraitGroup {
    WhoYouAre,
    WhatYouLove,
    WhatMatters,
    HowYouWorkBest,
}

/// One of the 24 fixed finer-grained trait descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubDimension {
    // WHO YOU ARE
    CuriosityOpenness,
    ReliabilityFocus,
    EmotionalStability,
    UncertaintyTolerance,
    Perseverance,
    SociabilityExtroversion,
    // WHAT YOU LOVE
    InvestigativeCuriosity,
    CreativeExpression,
    HelpingOrientation,
    EntrepreneurialDrive,
    HandsOnEngagement,
    NoveltyVarietySeeking,
    // WHAT MATTERS
    PurposeImpact,
    IndependenceAutonomy,
    StabilityPredictability,
    RecognitionVisibility,
    FinancialAmbition,
    BelongingConnection,
    // HOW YOU WORK BEST
    PaceIntensityPreference,
    OrganisationSystemsOrientation,
    ClarityStructurePreference,
    TeamCollaboration,
    IndependentWorkingApproach,
    AttentionToDetail,
}

impl SubDimension {
    pub const ALL: [SubDimension; 24] = [
        SubDimension::CuriosityOpenness,
        SubDimension::ReliabilityFocus,
        SubDimension::EmotionalStability,
        SubDimension::UncertaintyTolerance,
        SubDimension::Perseverance,
        SubDimension::SociabilityExtroversion,
        SubDimension::InvestigativeCuriosity,
        SubDimension::CreativeExpression,
        SubDimension::HelpingOrientation,
        SubDimension::EntrepreneurialDrive,
        SubDimension::HandsOnEngagement,
        SubDimension::NoveltyVarietySeeking,
        SubDimension::PurposeImpact,
        SubDimension::IndependenceAutonomy,
        SubDimension::StabilityPredictability,
        SubDimension::RecognitionVisibility,
        SubDimension::FinancialAmbition,
        SubDimension::BelongingConnection,
        SubDimension::PaceIntensityPreference,
        SubDimension::OrganisationSystemsOrientation,
        SubDimension::ClarityStructurePreference,
        SubDimension::TeamCollaboration,
        SubDimension::IndependentWorkingApproach,
        SubDimension::AttentionToDetail,
    ];

    /// Canonical display label — the exact key callers send over the wire.
    pub fn label(self) -> &'static str {
        match self {
            SubDimension::CuriosityOpenness => "Curiosity & Openness",
            SubDimension::ReliabilityFocus => "Reliability & Focus",
            SubDimension::EmotionalStability => "Emotional Stability",
            SubDimension::UncertaintyTolerance => "Uncertainty Tolerance",
            SubDimension::Perseverance => "Perseverance",
            SubDimension::SociabilityExtroversion => "Sociability & Extroversion",
            SubDimension::InvestigativeCuriosity => "Investigative Curiosity",
            SubDimension::CreativeExpression => "Creative Expression",
            SubDimension::HelpingOrientation => "Helping Orientation",
            SubDimension::EntrepreneurialDrive => "Entrepreneurial Drive",
            SubDimension::HandsOnEngagement => "Hands-On Engagement",
            SubDimension::NoveltyVarietySeeking => "Novelty & Variety Seeking",
            SubDimension::PurposeImpact => "Purpose & Impact",
            SubDimension::IndependenceAutonomy => "Independence & Autonomy",
            SubDimension::StabilityPredictability => "Stability & Predictability",
            SubDimension::RecognitionVisibility => "Recognition & Visibility",
            SubDimension::FinancialAmbition => "Financial Ambition",
            SubDimension::BelongingConnection => "Belonging & Connection",
            SubDimension::PaceIntensityPreference => "Pace & Intensity Preference",
            SubDimension::OrganisationSystemsOrientation => "Organisation & Systems Orientation",
            SubDimension::ClarityStructurePreference => "Clarity & Structure Preference",
            SubDimension::TeamCollaboration => "Team Collaboration",
            SubDimension::IndependentWorkingApproach => "Independent Working Approach",
            SubDimension::AttentionToDetail => "Attention to Detail",
        }
    }

    pub fn group(self) -> TraitGroup {
        match self {
            SubDimension::CuriosityOpenness
            | SubDimension::ReliabilityFocus
            | SubDimension::EmotionalStability
            | SubDimension::UncertaintyTolerance
            | SubDimension::Perseverance
            | SubDimension::SociabilityExtroversion => TraitGroup::WhoYouAre,
            SubDimension::InvestigativeCuriosity
            | SubDimension::CreativeExpression
            | SubDimension::HelpingOrientation
            | SubDimension::EntrepreneurialDrive
            | SubDimension::HandsOnEngagement
            | SubDimension::NoveltyVarietySeeking => TraitGroup::WhatYouLove,
            SubDimension::PurposeImpact
            | SubDimension::IndependenceAutonomy
            | SubDimension::StabilityPredictability
            | SubDimension::RecognitionVisibility
            | SubDimension::FinancialAmbition
            | SubDimension::BelongingConnection => TraitGroup::WhatMatters,
            SubDimension::PaceIntensityPreference
            | SubDimension::OrganisationSystemsOrientation
            | SubDimension::ClarityStructurePreference
            | SubDimension::TeamCollaboration
            | SubDimension::IndependentWorkingApproach
            | SubDimension::AttentionToDetail => TraitGroup::HowYouWorkBest,
        }
    }

    /// Static affinity of this sub-dimension toward an archetype.
    /// 0 = unrelated, 1.0 = fully determines that archetype.
    pub fn affinity(self, archetype: Archetype) -> f64 {
        use Archetype::*;
        match self {
            SubDimension::CuriosityOpenness => match archetype {
                Creator => 0.6,
                Explorer => 1.0,
                Visionary => 0.8,
                _ => 0.0,
            },
            SubDimension::ReliabilityFocus => match archetype {
                Achiever => 0.8,
                Organizer => 1.0,
                Thinker => 0.5,
                _ => 0.0,
            },
            SubDimension::EmotionalStability => match archetype {
                Connector => 0.5,
                Organizer => 0.5,
                _ => 0.0,
            },
            SubDimension::UncertaintyTolerance => match archetype {
                Achiever => 0.5,
                Creator => 0.5,
                Explorer => 1.0,
                Visionary => 0.5,
                _ => 0.0,
            },
            SubDimension::Perseverance => match archetype {
                Achiever => 1.0,
                Organizer => 0.5,
                _ => 0.0,
            },
            SubDimension::SociabilityExtroversion => match archetype {
                Connector => 1.0,
                _ => 0.0,
            },
            SubDimension::InvestigativeCuriosity => match archetype {
                Explorer => 0.8,
                Thinker => 1.0,
                _ => 0.0,
            },
            SubDimension::CreativeExpression => match archetype {
                Creator => 1.0,
                _ => 0.0,
            },
            SubDimension::HelpingOrientation => match archetype {
                Connector => 1.0,
                _ => 0.0,
            },
            SubDimension::EntrepreneurialDrive => match archetype {
                Visionary => 1.0,
                _ => 0.0,
            },
            SubDimension::HandsOnEngagement => match archetype {
                Creator => 1.0,
                Explorer => 0.5,
                _ => 0.0,
            },
            SubDimension::NoveltyVarietySeeking => match archetype {
                Creator => 0.8,
                Explorer => 1.0,
                Visionary => 0.5,
                _ => 0.0,
            },
            SubDimension::PurposeImpact => match archetype {
                Connector => 0.5,
                Visionary => 1.0,
                _ => 0.0,
            },
            SubDimension::IndependenceAutonomy => match archetype {
                Achiever => 0.5,
                Creator => 0.8,
                Explorer => 0.5,
                Thinker => 0.5,
                Visionary => 1.0,
                _ => 0.0,
            },
            SubDimension::StabilityPredictability => match archetype {
                Organizer => 1.0,
                _ => 0.0,
            },
            SubDimension::RecognitionVisibility => match archetype {
                Achiever => 1.0,
                Creator => 0.5,
                Visionary => 0.5,
                _ => 0.0,
            },
            SubDimension::FinancialAmbition => match archetype {
                Achiever => 1.0,
                _ => 0.0,
            },
            SubDimension::BelongingConnection => match archetype {
                Connector => 1.0,
                _ => 0.0,
            },
            SubDimension::PaceIntensityPreference => match archetype {
                Achiever => 1.0,
                Organizer => 0.5,
                Visionary => 0.5,
                _ => 0.0,
            },
            SubDimension::OrganisationSystemsOrientation => match archetype {
                Organizer => 1.0,
                Thinker => 0.5,
                _ => 0.0,
            },
            SubDimension::ClarityStructurePreference => match archetype {
                Organizer => 1.0,
                Thinker => 0.8,
                _ => 0.0,
            },
            SubDimension::TeamCollaboration => match archetype {
                Connector => 1.0,
                Organizer => 0.5,
                Visionary => 0.5,
                _ => 0.0,
            },
            SubDimension::IndependentWorkingApproach => match archetype {
                Creator => 0.5,
                Explorer => 1.0,
                Thinker => 0.5,
                Visionary => 0.5,
                _ => 0.0,
            },
            SubDimension::AttentionToDetail => match archetype {
                Achiever => 0.5,
                Organizer => 0.8,
                Thinker => 1.0,
                _ => 0.0,
            },
        }
    }

    /// Resolves a caller-supplied name: exact label match first, then a
    /// canonicalized comparison that forgives case, spacing, and the common
    /// extraversion/extroversion spelling variant.
    pub fn resolve(raw: &str) -> Option<SubDimension> {
        SubDimension::ALL
            .into_iter()
            .find(|sd| sd.label() == raw)
            .or_else(|| {
                let canonical = canon_name(raw);
                SubDimension::ALL
                    .into_iter()
                    .find(|sd| canon_name(sd.label()) == canonical)
            })
    }

    /// One-line definition, surfaced to the prose model via the prompt META.
    pub fn description(self) -> &'static str {
        match self {
            SubDimension::CuriosityOpenness => "Shows imagination and curiosity about new ideas and experiences. Higher scores mean you enjoy exploring and thinking creatively.",
            SubDimension::ReliabilityFocus => "Shows organisation, persistence, and reliability. Higher scores mean you plan carefully, stay on task, and deliver what you promise.",
            SubDimension::EmotionalStability => "Shows calmness and ability to handle pressure. Higher scores mean you stay steady and adapt well when things change.",
            SubDimension::UncertaintyTolerance => "Shows comfort with unpredictability and change. Higher scores mean you handle ambiguity well and can take considered risks.",
            SubDimension::Perseverance => "Shows determination and sustained effort toward goals. Higher scores mean you keep going even when things get tough.",
            SubDimension::SociabilityExtroversion => "Shows comfort around people and enthusiasm for social interaction. Higher scores mean you enjoy teamwork, communication, and visibility.",
            SubDimension::InvestigativeCuriosity => "Shows a drive to question, analyse, and understand how things work. Higher scores mean you like exploring complex ideas and patterns.",
            SubDimension::CreativeExpression => "Shows enjoyment of creating or designing things. Higher scores mean you like bringing ideas to life visually, practically, or conceptually.",
            SubDimension::HelpingOrientation => "Shows motivation to support or teach others. Higher scores mean you care about people's wellbeing and like making a difference.",
            SubDimension::EntrepreneurialDrive => "Shows initiative, leadership, and opportunity-seeking. Higher scores mean you like to start things, improve systems, and make ideas real.",
            SubDimension::HandsOnEngagement => "Shows preference for practical, tangible work. Higher scores mean you like learning by doing, building, or experimenting.",
            SubDimension::NoveltyVarietySeeking => "Shows enjoyment of change and new experiences. Higher scores mean you get energy from variety and dislike too much routine.",
            SubDimension::PurposeImpact => "Shows motivation to make a meaningful difference. Higher scores mean you care that your work contributes to a bigger purpose.",
            SubDimension::IndependenceAutonomy => "Shows desire for freedom and control over your own approach. Higher scores mean you like self-direction and ownership.",
            SubDimension::StabilityPredictability => "Shows preference for structure, clarity, and consistency. Higher scores mean you value routine and clear expectations.",
            SubDimension::RecognitionVisibility => "Shows motivation from acknowledgment and success. Higher scores mean you like your efforts to be noticed and valued.",
            SubDimension::FinancialAmbition => "Shows motivation from reward and achievement. Higher scores mean you focus on results, success, and long-term goals.",
            SubDimension::BelongingConnection => "Shows value placed on inclusion, teamwork, and belonging. Higher scores mean you enjoy shared goals and collaboration.",
            SubDimension::PaceIntensityPreference => "Shows how well you handle busy, fast-moving work. Higher scores mean you stay motivated and focused under pressure.",
            SubDimension::OrganisationSystemsOrientation => "Shows comfort with structured systems and processes. Higher scores mean you like order, routines, and efficiency.",
            SubDimension::ClarityStructurePreference => "Shows need for clear expectations and defined tasks. Higher scores mean you like knowing what good performance looks like.",
            SubDimension::TeamCollaboration => "Shows comfort working with others toward shared goals. Higher scores mean you enjoy cooperation and open communication.",
            SubDimension::IndependentWorkingApproach => "Shows comfort working autonomously. Higher scores mean you like to set your own direction and make progress independently.",
            SubDimension::AttentionToDetail => "Shows precision, accuracy, and thoroughness. Higher scores mean you take care to complete work properly and to a high standard.",
        }
    }
}

/// Canonical form used for forgiving name comparison: lowercase, collapsed
/// whitespace, ampersands spaced, slashes unspaced, one spelling fix.
fn canon_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for ch in lowered.chars() {
        match ch {
            c if c.is_whitespace() => pending_space = true,
            '&' => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
                out.push('&');
                out.push(' ');
                pending_space = false;
            }
            '/' => {
                while out.ends_with(' ') {
                    out.pop();
                }
                out.push('/');
                pending_space = false;
            }
            c => {
                if pending_space && !out.is_empty() && !out.ends_with(' ') && !out.ends_with('/') {
                    out.push(' ');
                }
                out.push(c);
                pending_space = false;
            }
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out.replace("extraversion/sociability", "extroversion/sociability")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::archetype::Archetype;

    #[test]
    fn test_every_subdim_links_to_some_archetype() {
        for sd in SubDimension::ALL {
            let linked = Archetype::ALL.iter().any(|a| sd.affinity(*a) != 0.0);
            assert!(linked, "{} has no archetype link", sd.label());
        }
    }

    #[test]
    fn test_affinities_within_unit_range() {
        for sd in SubDimension::ALL {
            for a in Archetype::ALL {
                let v = sd.affinity(a);
                assert!((0.0..=1.0).contains(&v), "{}/{} = {v}", sd.label(), a.name());
            }
        }
    }

    #[test]
    fn test_groups_have_six_members_each() {
        for group in [
            TraitGroup::WhoYouAre,
            TraitGroup::WhatYouLove,
            TraitGroup::WhatMatters,
            TraitGroup::HowYouWorkBest,
        ] {
            let count = SubDimension::ALL.iter().filter(|sd| sd.group() == group).count();
            assert_eq!(count, 6, "{group:?}");
        }
    }

    #[test]
    fn test_resolve_exact_label() {
        assert_eq!(
            SubDimension::resolve("Curiosity & Openness"),
            Some(SubDimension::CuriosityOpenness)
        );
    }

    #[test]
    fn test_resolve_forgives_case_and_spacing() {
        assert_eq!(
            SubDimension::resolve("curiosity&openness"),
            Some(SubDimension::CuriosityOpenness)
        );
        assert_eq!(
            SubDimension::resolve("  PACE &  intensity   preference "),
            Some(SubDimension::PaceIntensityPreference)
        );
    }

    #[test]
    fn test_resolve_unknown_is_none() {
        assert_eq!(SubDimension::resolve("Stage Presence"), None);
    }

    #[test]
    fn test_canon_name_slash_handling() {
        assert_eq!(canon_name("a / b"), "a/b");
        assert_eq!(canon_name("Extraversion / Sociability"), "extroversion/sociability");
    }
}
