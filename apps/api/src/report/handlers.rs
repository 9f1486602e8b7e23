//! Axum handlers for the report API, plus the input-normalization boundary.
//!
//! All wire-shape forgiveness lives here — score maps with string numbers,
//! status synonyms, string-or-array subject fields. The selection core only
//! ever sees the strict `ReportInput` type.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::report::builder::{
    build_selection, LifeStage, ReportInput, ReportSelection, SelectedItem,
};
use crate::report::prompts::build_report_prompt;
use crate::report::reorder::reorder_report;
use crate::scoring::archetype::{Archetype, ArchetypeScore};
use crate::scoring::subdims::UserSubdimScore;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    /// Map of archetype name → score, or an array of `{name, score}` rows.
    /// Scores may be numbers or numeric strings.
    pub archetypes: Option<Value>,
    #[serde(default)]
    pub age: Option<Value>,
    pub status: Option<String>,
    /// School users: a single subject string or an array of them.
    #[serde(default)]
    pub school_subjects: Option<Value>,
    /// Everyone else: the degree subject, required non-empty.
    #[serde(default)]
    pub uni_subject: Option<String>,
    #[serde(default)]
    pub subdims: Vec<SubdimRow>,
    /// Accepted under either key; `subdims` wins when both are present.
    #[serde(default)]
    pub subdimensions: Vec<SubdimRow>,
}

#[derive(Debug, Deserialize)]
pub struct SubdimRow {
    #[serde(alias = "title", alias = "subdim")]
    pub name: Option<String>,
    #[serde(default)]
    pub score: Option<Value>,
    #[serde(default)]
    pub score_pct: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
    /// Populated only in dev no-LLM mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handler
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/summary
///
/// Validates and normalizes the request, runs the selection core, builds the
/// prompt, delegates prose generation to the LLM collaborator (once — its
/// failure is reported, not retried here), and re-orders the returned
/// markdown to match the computed rankings.
pub async fn handle_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let input = normalize_input(request)?;
    let selection = build_selection(&input, &state.library, &state.config.scoring);

    let prompt = build_report_prompt(&input, &selection);

    if state.config.dev_no_llm {
        info!("dev no-LLM mode: returning diagnostics without prose");
        return Ok(Json(SummaryResponse {
            summary: "# Summary\n\n1) Dev mode: LLM skipped.".to_string(),
            diagnostics: Some(diagnostics(&selection)),
        }));
    }

    let prose = state
        .prose
        .generate(&prompt)
        .await
        .map_err(|err| AppError::Llm(err.to_string()))?;
    let summary = reorder_report(&prose, &selection);

    Ok(Json(SummaryResponse {
        summary,
        diagnostics: None,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization boundary
// ────────────────────────────────────────────────────────────────────────────

/// The single place wire shapes become strict types. Core components never
/// branch on input shape.
pub fn normalize_input(request: SummaryRequest) -> Result<ReportInput, AppError> {
    let stage = request
        .status
        .as_deref()
        .and_then(LifeStage::parse)
        .ok_or_else(|| AppError::Validation("Invalid or missing status".to_string()))?;

    let archetype_scores = request
        .archetypes
        .as_ref()
        .map(normalize_archetype_scores)
        .unwrap_or_default();
    if archetype_scores.is_empty() {
        return Err(AppError::Validation(
            "Invalid or missing archetype data".to_string(),
        ));
    }

    let subjects = if stage.is_school() {
        normalize_subjects(request.school_subjects.as_ref())
    } else {
        let uni = request
            .uni_subject
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if uni.is_empty() {
            return Err(AppError::Validation(
                "University subject must be a non-empty string".to_string(),
            ));
        }
        vec![uni.to_string()]
    };

    let rows = if request.subdims.is_empty() {
        request.subdimensions
    } else {
        request.subdims
    };
    let subdim_scores = rows
        .into_iter()
        .filter_map(|row| {
            let name = row.name?.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let score = row
                .score
                .as_ref()
                .and_then(coerce_number)
                .or_else(|| row.score_pct.as_ref().and_then(coerce_number))
                .unwrap_or(0.0);
            Some(UserSubdimScore { name, score })
        })
        .collect();

    let age = request.age.as_ref().and_then(|value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    Ok(ReportInput {
        archetype_scores,
        subdim_scores,
        subjects,
        stage,
        age,
    })
}

/// Accepts the two wire shapes archetype scores arrive in: a name → score
/// map, or an array of `{name, score}` rows. Unknown names and non-numeric
/// scores are dropped; duplicates keep the first occurrence.
///
/// Map entries come out in the closed set's canonical order, so tie-breaking
/// stays deterministic regardless of JSON key order. Array order is the
/// caller's and is preserved.
fn normalize_archetype_scores(value: &Value) -> Vec<ArchetypeScore> {
    let mut scores: Vec<ArchetypeScore> = Vec::new();
    match value {
        Value::Object(map) => {
            for archetype in Archetype::ALL {
                let entry = map
                    .iter()
                    .find(|(name, _)| Archetype::parse(name) == Some(archetype))
                    .map(|(_, value)| value);
                let Some(score) = entry.and_then(coerce_number) else {
                    continue;
                };
                scores.push(ArchetypeScore { archetype, score });
            }
        }
        Value::Array(rows) => {
            for row in rows {
                let Some(archetype) = row
                    .get("name")
                    .and_then(Value::as_str)
                    .and_then(Archetype::parse)
                else {
                    continue;
                };
                let Some(score) = row.get("score").and_then(coerce_number) else {
                    continue;
                };
                if !scores.iter().any(|s| s.archetype == archetype) {
                    scores.push(ArchetypeScore { archetype, score });
                }
            }
        }
        _ => {}
    }
    scores
}

/// Accepts a JSON number or a numeric string; anything else is dropped.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// String or array of strings → trimmed, non-empty list.
fn normalize_subjects(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dev diagnostics
// ────────────────────────────────────────────────────────────────────────────

fn diagnostics(selection: &ReportSelection) -> Value {
    json!({
        "included": selection.included.names(),
        "strengths": titles(&selection.strengths),
        "environments": titles(&selection.environments),
        "fit_areas": titles(&selection.fit_areas),
        "subjects": titles(&selection.subjects),
        "roles_classic": titles(&selection.roles_classic),
        "roles_emerging": titles(&selection.roles_emerging),
        "itemArchetypes": {
            "strengths": archetype_map(&selection.strengths),
            "environments": archetype_map(&selection.environments),
            "fit_areas": archetype_map(&selection.fit_areas),
            "subjects": archetype_map(&selection.subjects),
            "roles_classic": archetype_map(&selection.roles_classic),
            "roles_emerging": archetype_map(&selection.roles_emerging),
        },
        "itemSubdimHints": {
            "strengths": hint_map(&selection.strengths),
            "environments": hint_map(&selection.environments),
            "fit_areas": hint_map(&selection.fit_areas),
            "subjects": hint_map(&selection.subjects),
            "roles_classic": hint_map(&selection.roles_classic),
            "roles_emerging": hint_map(&selection.roles_emerging),
        },
        "allowedSubdims": selection.allowed_subdims.iter()
            .map(|sd| sd.label()).collect::<Vec<_>>(),
    })
}

fn titles(items: &[SelectedItem]) -> Vec<&str> {
    items.iter().map(|item| item.title.as_str()).collect()
}

fn archetype_map(items: &[SelectedItem]) -> Value {
    items
        .iter()
        .map(|item| {
            (
                item.title.clone(),
                json!(item.archetypes.iter().map(|a| a.name()).collect::<Vec<_>>()),
            )
        })
        .collect::<serde_json::Map<String, Value>>()
        .into()
}

fn hint_map(items: &[SelectedItem]) -> Value {
    items
        .iter()
        .map(|item| {
            (
                item.title.clone(),
                json!(item.hints.iter().map(|sd| sd.label()).collect::<Vec<_>>()),
            )
        })
        .collect::<serde_json::Map<String, Value>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::config::Config;
    use crate::library::{ContentItem, Library};
    use crate::llm_client::{LlmError, ProseGenerator};

    fn request_json(body: Value) -> SummaryRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_missing_status_rejected() {
        let request = request_json(json!({ "archetypes": { "Thinker": 80 } }));
        let err = normalize_input(request).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_missing_archetypes_rejected() {
        let request = request_json(json!({ "status": "school" }));
        assert!(normalize_input(request).is_err());
    }

    #[test]
    fn test_unknown_archetype_names_dropped() {
        let request = request_json(json!({
            "status": "school",
            "archetypes": { "Thinker": 80, "Wizard": 99 }
        }));
        let input = normalize_input(request).unwrap();
        assert_eq!(input.archetype_scores.len(), 1);
    }

    #[test]
    fn test_all_unknown_archetypes_rejected() {
        let request = request_json(json!({
            "status": "school",
            "archetypes": { "Wizard": 99 }
        }));
        assert!(normalize_input(request).is_err());
    }

    #[test]
    fn test_string_scores_coerced() {
        let request = request_json(json!({
            "status": "school",
            "archetypes": { "Thinker": "82.5" }
        }));
        let input = normalize_input(request).unwrap();
        assert_eq!(input.archetype_scores[0].score, 82.5);
    }

    #[test]
    fn test_school_subjects_accept_string_or_array() {
        let single = normalize_input(request_json(json!({
            "status": "school",
            "archetypes": { "Thinker": 80 },
            "schoolSubjects": "  Maths  "
        })))
        .unwrap();
        assert_eq!(single.subjects, vec!["Maths"]);

        let several = normalize_input(request_json(json!({
            "status": "school",
            "archetypes": { "Thinker": 80 },
            "schoolSubjects": ["Maths", " Physics ", ""]
        })))
        .unwrap();
        assert_eq!(several.subjects, vec!["Maths", "Physics"]);
    }

    #[test]
    fn test_non_school_requires_uni_subject() {
        let request = request_json(json!({
            "status": "undergraduate",
            "archetypes": { "Thinker": 80 },
            "uniSubject": "   "
        }));
        assert!(normalize_input(request).is_err());
    }

    #[test]
    fn test_status_synonyms_normalized() {
        let input = normalize_input(request_json(json!({
            "status": "A-Level",
            "archetypes": { "Thinker": 80 }
        })))
        .unwrap();
        assert_eq!(input.stage, LifeStage::School);
    }

    #[test]
    fn test_subdims_key_preferred_over_subdimensions() {
        let input = normalize_input(request_json(json!({
            "status": "school",
            "archetypes": { "Thinker": 80 },
            "subdims": [{ "name": "Attention to Detail", "score": 70 }],
            "subdimensions": [{ "name": "Perseverance", "score": 60 }]
        })))
        .unwrap();
        assert_eq!(input.subdim_scores.len(), 1);
        assert_eq!(input.subdim_scores[0].name, "Attention to Detail");
    }

    #[test]
    fn test_subdim_score_pct_fallback() {
        let input = normalize_input(request_json(json!({
            "status": "school",
            "archetypes": { "Thinker": 80 },
            "subdims": [{ "name": "Perseverance", "score_pct": 65 }]
        })))
        .unwrap();
        assert_eq!(input.subdim_scores[0].score, 65.0);
    }

    #[test]
    fn test_archetypes_accepted_as_array_of_rows() {
        let input = normalize_input(request_json(json!({
            "status": "school",
            "archetypes": [
                { "name": "Visionary", "score": 70 },
                { "name": "Thinker", "score": "81" },
                { "name": "Wizard", "score": 99 },
                { "name": "Thinker", "score": 10 }
            ]
        })))
        .unwrap();
        // array order preserved, unknown name dropped, duplicate keeps first
        assert_eq!(input.archetype_scores.len(), 2);
        assert_eq!(input.archetype_scores[0].archetype, Archetype::Visionary);
        assert_eq!(input.archetype_scores[1].score, 81.0);
    }

    #[test]
    fn test_score_order_is_canonical_not_map_order() {
        let input = normalize_input(request_json(json!({
            "status": "school",
            "archetypes": { "Visionary": 70, "Achiever": 70, "Creator": 70 }
        })))
        .unwrap();
        let names: Vec<&str> = input
            .archetype_scores
            .iter()
            .map(|s| s.archetype.name())
            .collect();
        assert_eq!(names, vec!["Achiever", "Creator", "Visionary"]);
    }

    // ── end-to-end over the handler with a mock prose backend ──────────────

    struct FixedProse(&'static str);

    #[async_trait]
    impl ProseGenerator for FixedProse {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingProse;

    #[async_trait]
    impl ProseGenerator for FailingProse {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::AllModelsFailed)
        }
    }

    fn test_state(prose: Arc<dyn ProseGenerator>, dev_no_llm: bool) -> AppState {
        AppState {
            config: Config {
                port: 0,
                data_dir: String::new(),
                openai_api_key: None,
                openai_model: None,
                dev_no_llm,
                rust_log: "info".to_string(),
                scoring: Default::default(),
            },
            library: Arc::new(test_library()),
            prose,
        }
    }

    fn test_library() -> Library {
        let item = |title: &str, archetypes: &[Archetype]| ContentItem {
            title: title.to_string(),
            archetypes: archetypes.to_vec(),
        };
        Library {
            strengths: vec![
                item("Analytical Depth", &[Archetype::Thinker]),
                item("Structured Delivery", &[Archetype::Organizer]),
            ],
            environments: vec![item(
                "Data-led Teams",
                &[Archetype::Thinker, Archetype::Organizer],
            )],
            fit_areas: vec![item("Research and Analysis", &[Archetype::Thinker])],
            subjects: vec![item("Computer Science", &[Archetype::Thinker])],
            roles: vec![],
        }
    }

    fn school_body() -> Value {
        json!({
            "status": "school",
            "archetypes": { "Thinker": 85, "Organizer": 66, "Connector": 20 },
            "schoolSubjects": ["Computer Science"],
            "subdims": [{ "name": "Investigative Curiosity", "score": 85 }]
        })
    }

    #[tokio::test]
    async fn test_summary_reordered_to_rankings() {
        // the mock returns strengths in the wrong order; the handler must
        // put the computed ranking back
        let prose = "\
# Your Personalized Career Summary

## Strengths

- **Structured Delivery**: steady output.
- **Analytical Depth**: sharp analysis.
";
        let state = test_state(Arc::new(FixedProse(prose)), false);
        let response = handle_summary(
            State(state),
            Json(request_json(school_body())),
        )
        .await
        .unwrap();
        let summary = &response.0.summary;
        let depth = summary.find("**Analytical Depth**").unwrap();
        let delivery = summary.find("**Structured Delivery**").unwrap();
        assert!(depth < delivery, "computed order must win: {summary}");
    }

    #[tokio::test]
    async fn test_dev_mode_returns_diagnostics() {
        let state = test_state(Arc::new(FailingProse), true);
        let response = handle_summary(State(state), Json(request_json(school_body())))
            .await
            .unwrap();
        let diagnostics = response.0.diagnostics.expect("diagnostics in dev mode");
        assert_eq!(diagnostics["included"][0], "Thinker");
        assert!(diagnostics["strengths"].as_array().unwrap().len() <= 5);
    }

    #[tokio::test]
    async fn test_llm_failure_surfaces_as_llm_error() {
        let state = test_state(Arc::new(FailingProse), false);
        let err = handle_summary(State(state), Json(request_json(school_body())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
