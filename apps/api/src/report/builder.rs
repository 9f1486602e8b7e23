//! Report selection — orchestrates the full scoring pipeline.
//!
//! Flow: select included archetypes → personal sub-dimension weights →
//! rank each bank (with coverage pass) → per-item hint derivation.
//!
//! Everything here is pure and synchronous over validated input; the LLM
//! call happens afterwards in the handler and never mutates this output.

use std::collections::HashSet;

use tracing::info;

use crate::config::ScoringConfig;
use crate::library::{norm_title, ContentItem, Library};
use crate::scoring::archetype::{select_included, Archetype, ArchetypeScore, IncludedSet};
use crate::scoring::fit::RankContext;
use crate::scoring::hints::{derive_hints, section_pool};
use crate::scoring::matrix::{SubDimension, TraitGroup};
use crate::scoring::selector::{rank_bank, select_fit_areas, select_subjects, SubjectSlots};
use crate::scoring::subdims::{PersonalWeights, UserSubdimScore};

/// The user's life stage, decided at the boundary. Selection policy switches
/// on it: school profiles get subject suggestions, everyone else gets role
/// ideas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeStage {
    School,
    Undergraduate,
    Postgraduate,
}

impl LifeStage {
    /// Accepts the canonical values plus the synonyms callers actually send.
    pub fn parse(raw: &str) -> Option<LifeStage> {
        match raw.trim().to_lowercase().as_str() {
            "school" | "gcse" | "a-level" | "alevel" | "sixth form" | "sixth-form" => {
                Some(LifeStage::School)
            }
            "undergraduate" | "undergrad" | "ug" => Some(LifeStage::Undergraduate),
            "postgraduate" | "postgrad" | "pg" | "masters" | "master" | "msc" | "mba" => {
                Some(LifeStage::Postgraduate)
            }
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifeStage::School => "school",
            LifeStage::Undergraduate => "undergraduate",
            LifeStage::Postgraduate => "postgraduate",
        }
    }

    pub fn is_school(self) -> bool {
        self == LifeStage::School
    }
}

/// Strict, validated input to the selection core. Built exactly once at the
/// boundary — core code never branches on wire shapes.
#[derive(Debug, Clone)]
pub struct ReportInput {
    /// Non-empty; the boundary rejects requests with no usable scores.
    pub archetype_scores: Vec<ArchetypeScore>,
    pub subdim_scores: Vec<UserSubdimScore>,
    /// Declared subjects of interest (school) or the single degree subject.
    pub subjects: Vec<String>,
    pub stage: LifeStage,
    pub age: Option<String>,
}

/// One selected bank item, ready for prompt construction.
#[derive(Debug, Clone)]
pub struct SelectedItem {
    pub title: String,
    /// The item's tags intersected with the included set, in tag order.
    pub archetypes: Vec<Archetype>,
    pub hints: Vec<SubDimension>,
}

/// The full structured output of the selection core — the sole input handed
/// to prompt construction, and the ranking source for the reorder pass.
#[derive(Debug, Clone)]
pub struct ReportSelection {
    pub included: IncludedSet,
    pub strengths: Vec<SelectedItem>,
    pub environments: Vec<SelectedItem>,
    pub fit_areas: Vec<SelectedItem>,
    /// School profiles only; empty otherwise.
    pub subjects: Vec<SelectedItem>,
    /// Non-school profiles only; empty otherwise.
    pub roles_classic: Vec<SelectedItem>,
    pub roles_emerging: Vec<SelectedItem>,
    /// Every sub-dimension that ended up as a hint, in first-use order.
    pub allowed_subdims: Vec<SubDimension>,
}

pub fn build_selection(
    input: &ReportInput,
    library: &Library,
    config: &ScoringConfig,
) -> ReportSelection {
    let included = select_included(&input.archetype_scores, config);
    info!("included archetypes: {:?}", included.names());

    let personal = PersonalWeights::build(&input.subdim_scores, &included, config);
    let allowed = personal.high_confidence(config.high_subdim_score);

    let ctx = RankContext {
        included: &included,
        full_scores: &input.archetype_scores,
        config,
    };

    let strengths = rank_bank(&library.strengths, &ctx, config.strengths_count);
    let environments = rank_bank(&library.environments, &ctx, config.environments_count);
    let fit_areas = select_fit_areas(
        &library.fit_areas,
        &ctx,
        SubjectSlots {
            user_subjects: &input.subjects,
            subject_bank: &library.subjects,
            total: config.fit_areas_count,
            reserved: config.subject_slots,
        },
    );

    let subjects = if input.stage.is_school() {
        // reserve slots only when the user actually declared subjects
        let reserved = if input.subjects.is_empty() {
            0
        } else {
            config.subject_slots
        };
        select_subjects(
            &library.subjects,
            &ctx,
            &input.subjects,
            config.subjects_count,
            reserved,
        )
    } else {
        Vec::new()
    };

    let (classic_bank, emerging_bank) = if input.stage.is_school() {
        (Vec::new(), Vec::new())
    } else {
        role_banks(library, &fit_areas)
    };
    let roles_classic = rank_bank(&classic_bank, &ctx, config.roles_count);
    let roles_emerging = rank_bank(&emerging_bank, &ctx, config.roles_count);

    info!(
        strengths = strengths.len(),
        environments = environments.len(),
        fit_areas = fit_areas.len(),
        subjects = subjects.len(),
        roles_classic = roles_classic.len(),
        roles_emerging = roles_emerging.len(),
        "bank selection complete"
    );

    // section-specific hint pools, group-major over the allowed list
    let strength_pool = section_pool(
        &allowed,
        &[TraitGroup::WhoYouAre, TraitGroup::WhatYouLove, TraitGroup::WhatMatters],
    );
    let environment_pool =
        section_pool(&allowed, &[TraitGroup::HowYouWorkBest, TraitGroup::WhatMatters]);
    let fit_area_pool =
        section_pool(&allowed, &[TraitGroup::WhatYouLove, TraitGroup::WhatMatters]);
    let subject_pool = section_pool(&allowed, &[TraitGroup::WhatYouLove, TraitGroup::WhoYouAre]);
    let role_pool = section_pool(
        &allowed,
        &[TraitGroup::WhatYouLove, TraitGroup::HowYouWorkBest, TraitGroup::WhatMatters],
    );

    let hints_per_item = config.hints_per_item;
    let strengths = attach_hints(strengths, &strength_pool, &included, hints_per_item);
    let environments = attach_hints(environments, &environment_pool, &included, hints_per_item);
    let fit_areas = attach_hints(fit_areas, &fit_area_pool, &included, hints_per_item);
    let subjects = attach_hints(subjects, &subject_pool, &included, hints_per_item);
    let roles_classic = attach_hints(roles_classic, &role_pool, &included, hints_per_item);
    let roles_emerging = attach_hints(roles_emerging, &role_pool, &included, hints_per_item);

    let mut allowed_subdims: Vec<SubDimension> = Vec::new();
    for section in [
        &strengths,
        &environments,
        &fit_areas,
        &subjects,
        &roles_classic,
        &roles_emerging,
    ] {
        for item in section.iter() {
            for hint in &item.hints {
                if !allowed_subdims.contains(hint) {
                    allowed_subdims.push(*hint);
                }
            }
        }
    }

    ReportSelection {
        included,
        strengths,
        environments,
        fit_areas,
        subjects,
        roles_classic,
        roles_emerging,
        allowed_subdims,
    }
}

/// Pairs each selected item with its per-section hints and the subset of its
/// tags that are actually included for this request.
fn attach_hints(
    items: Vec<&ContentItem>,
    pool: &[SubDimension],
    included: &IncludedSet,
    hints_per_item: usize,
) -> Vec<SelectedItem> {
    items
        .into_iter()
        .map(|item| SelectedItem {
            title: item.title.clone(),
            archetypes: item
                .archetypes
                .iter()
                .copied()
                .filter(|a| included.contains(*a))
                .collect(),
            hints: derive_hints(&item.archetypes, pool, hints_per_item),
        })
        .collect()
}

/// Flattens the role groups linked to the selected fit areas into the two
/// independently ranked banks.
fn role_banks(
    library: &Library,
    selected_fit_areas: &[&ContentItem],
) -> (Vec<ContentItem>, Vec<ContentItem>) {
    let selected: HashSet<String> = selected_fit_areas
        .iter()
        .map(|area| norm_title(&area.title))
        .collect();

    let mut classic = Vec::new();
    let mut emerging = Vec::new();
    for group in &library.roles {
        if !selected.contains(&norm_title(&group.fit_area)) {
            continue;
        }
        classic.extend(group.classic.iter().cloned());
        emerging.extend(group.emerging.iter().cloned());
    }
    (classic, emerging)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::RoleGroup;
    use Archetype::*;

    fn item(title: &str, archetypes: &[Archetype]) -> ContentItem {
        ContentItem {
            title: title.to_string(),
            archetypes: archetypes.to_vec(),
        }
    }

    fn test_library() -> Library {
        Library {
            strengths: vec![
                item("Structured Delivery", &[Achiever, Organizer]),
                item("Analytical Depth", &[Thinker]),
                item("Creative Problem Solving", &[Creator, Thinker]),
                item("Community Care", &[Connector]),
                item("Bold Direction", &[Visionary, Achiever]),
                item("Practical Experimentation", &[Explorer, Creator]),
            ],
            environments: vec![
                item("Data-led Teams", &[Thinker, Organizer]),
                item("Fast-paced Delivery Groups", &[Achiever]),
                item("Independent Research Settings", &[Thinker, Explorer]),
                item("Collaborative Studios", &[Connector, Creator]),
            ],
            fit_areas: vec![
                item("Research and Analysis", &[Thinker]),
                item("Business and Management", &[Achiever, Organizer]),
                item("Creative Industries", &[Creator]),
                item("Community Services", &[Connector]),
            ],
            subjects: vec![
                item("Computer Science", &[Thinker, Organizer]),
                item("Psychology", &[Connector, Thinker]),
                item("Design", &[Creator]),
                item("Business Studies", &[Achiever, Visionary]),
            ],
            roles: vec![
                RoleGroup {
                    fit_area: "Research and Analysis".to_string(),
                    classic: vec![
                        item("Data Analyst", &[Thinker, Organizer]),
                        item("Research Scientist", &[Thinker, Explorer]),
                    ],
                    emerging: vec![item("AI Research Engineer", &[Thinker, Visionary])],
                },
                RoleGroup {
                    fit_area: "Business and Management".to_string(),
                    classic: vec![item("Operations Manager", &[Organizer, Achiever])],
                    emerging: vec![item("Automation Strategist", &[Visionary, Organizer])],
                },
                RoleGroup {
                    fit_area: "Creative Industries".to_string(),
                    classic: vec![item("Graphic Designer", &[Creator])],
                    emerging: vec![item("Digital Content Creator", &[Creator, Connector])],
                },
            ],
        }
    }

    fn input(stage: LifeStage, scores: &[(Archetype, f64)], subjects: &[&str]) -> ReportInput {
        ReportInput {
            archetype_scores: scores
                .iter()
                .map(|(archetype, score)| ArchetypeScore {
                    archetype: *archetype,
                    score: *score,
                })
                .collect(),
            subdim_scores: vec![
                UserSubdimScore {
                    name: "Investigative Curiosity".to_string(),
                    score: 85.0,
                },
                UserSubdimScore {
                    name: "Attention to Detail".to_string(),
                    score: 72.0,
                },
                UserSubdimScore {
                    name: "Purpose & Impact".to_string(),
                    score: 40.0,
                },
            ],
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            stage,
            age: None,
        }
    }

    #[test]
    fn test_school_profile_gets_subjects_not_roles() {
        let selection = build_selection(
            &input(
                LifeStage::School,
                &[(Thinker, 82.0), (Organizer, 66.0), (Connector, 30.0)],
                &["computer science"],
            ),
            &test_library(),
            &ScoringConfig::default(),
        );
        assert!(!selection.subjects.is_empty());
        assert!(selection.roles_classic.is_empty());
        assert!(selection.roles_emerging.is_empty());
    }

    #[test]
    fn test_non_school_profile_gets_roles_not_subjects() {
        let selection = build_selection(
            &input(
                LifeStage::Undergraduate,
                &[(Thinker, 82.0), (Organizer, 66.0), (Connector, 30.0)],
                &["Computer Science"],
            ),
            &test_library(),
            &ScoringConfig::default(),
        );
        assert!(selection.subjects.is_empty());
        assert!(!selection.roles_classic.is_empty());
        assert!(!selection.roles_emerging.is_empty());
    }

    #[test]
    fn test_roles_come_only_from_selected_fit_areas() {
        // with two fit-area slots, Creative Industries falls out of the
        // selection and its roles must not appear
        let config = ScoringConfig {
            fit_areas_count: 2,
            ..ScoringConfig::default()
        };
        let selection = build_selection(
            &input(
                LifeStage::Postgraduate,
                &[(Thinker, 85.0), (Organizer, 64.0)],
                &["Computer Science"],
            ),
            &test_library(),
            &config,
        );
        let role_titles: Vec<&str> = selection
            .roles_classic
            .iter()
            .chain(&selection.roles_emerging)
            .map(|r| r.title.as_str())
            .collect();
        assert!(!role_titles.is_empty());
        assert!(!role_titles.contains(&"Graphic Designer"));
        assert!(!role_titles.contains(&"Digital Content Creator"));
        assert!(role_titles.contains(&"Data Analyst"));
    }

    #[test]
    fn test_included_archetypes_covered_in_each_section() {
        let selection = build_selection(
            &input(
                LifeStage::Undergraduate,
                &[(Thinker, 85.0), (Creator, 70.0), (Connector, 20.0)],
                &["Design"],
            ),
            &test_library(),
            &ScoringConfig::default(),
        );
        for member in selection.included.members() {
            for (name, section) in [
                ("strengths", &selection.strengths),
                ("environments", &selection.environments),
                ("fit_areas", &selection.fit_areas),
            ] {
                let covered = section
                    .iter()
                    .any(|it| it.archetypes.contains(&member.archetype));
                assert!(covered, "{name} lacks {}", member.archetype.name());
            }
        }
    }

    #[test]
    fn test_item_archetypes_restricted_to_included() {
        let selection = build_selection(
            &input(
                LifeStage::Undergraduate,
                &[(Thinker, 85.0), (Organizer, 66.0)],
                &["Computer Science"],
            ),
            &test_library(),
            &ScoringConfig::default(),
        );
        for item in &selection.strengths {
            for archetype in &item.archetypes {
                assert!(selection.included.contains(*archetype));
            }
        }
    }

    #[test]
    fn test_every_item_gets_hint_material_when_subdims_exist() {
        let selection = build_selection(
            &input(
                LifeStage::School,
                &[(Thinker, 85.0), (Organizer, 66.0)],
                &[],
            ),
            &test_library(),
            &ScoringConfig::default(),
        );
        assert!(!selection.allowed_subdims.is_empty());
        for item in &selection.strengths {
            assert!(item.hints.len() <= 1);
        }
    }

    #[test]
    fn test_no_subdim_scores_means_no_hints() {
        let mut report_input = input(
            LifeStage::School,
            &[(Thinker, 85.0), (Organizer, 66.0)],
            &[],
        );
        report_input.subdim_scores.clear();
        let selection =
            build_selection(&report_input, &test_library(), &ScoringConfig::default());
        assert!(selection.allowed_subdims.is_empty());
        assert!(selection.strengths.iter().all(|it| it.hints.is_empty()));
    }

    #[test]
    fn test_empty_banks_give_empty_sections() {
        let selection = build_selection(
            &input(LifeStage::Undergraduate, &[(Thinker, 85.0)], &["Maths"]),
            &Library::default(),
            &ScoringConfig::default(),
        );
        assert!(selection.strengths.is_empty());
        assert!(selection.roles_classic.is_empty());
        assert!(!selection.included.is_empty());
    }

    #[test]
    fn test_stage_parsing_synonyms() {
        assert_eq!(LifeStage::parse("Sixth Form"), Some(LifeStage::School));
        assert_eq!(LifeStage::parse("GCSE"), Some(LifeStage::School));
        assert_eq!(LifeStage::parse("undergrad"), Some(LifeStage::Undergraduate));
        assert_eq!(LifeStage::parse("MSc"), Some(LifeStage::Postgraduate));
        assert_eq!(LifeStage::parse("employed"), None);
    }
}
