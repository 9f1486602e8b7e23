//! Prompt construction for the career report — assembles the META block,
//! the writing instructions, and per-section skeleton lists. Nothing here
//! affects scoring; the selection is fully computed before this runs.

use serde_json::{json, Value};

use crate::report::builder::{LifeStage, ReportInput, ReportSelection, SelectedItem};
use crate::scoring::archetype::Archetype;
use crate::scoring::matrix::SubDimension;

const SUMMARY_SENTENCES: usize = 7;
const BULLET_RANGE: &str = "2–3";

/// Section headers — shared with the reorder pass, which locates sections by
/// these exact strings.
pub const STRENGTHS_HEADER: &str = "## Strengths";
pub const ENVIRONMENTS_HEADER: &str = "## Ideal Environments";
pub const FIT_AREAS_HEADER: &str = "## Career Fit Areas";
pub const SUBJECTS_HEADER: &str = "## University Subject Suggestions";
pub const ROLES_CLASSIC_HEADER: &str = "## Classic Roles";
pub const ROLES_EMERGING_HEADER: &str = "## Emerging / Future Roles";

pub fn build_report_prompt(input: &ReportInput, selection: &ReportSelection) -> String {
    let meta = build_meta(input, selection);
    let instructions = report_instructions(input.stage);
    let blend_line = blend_line(selection);

    let mut prompt = format!(
        "\n[META START]\n{}\n[META END]\n\n{}\n\n# Your Personalized Career Summary\n\n## Summary\n{}\n(Continue the summary with the remaining {} sentences. Do NOT rewrite or reorder the first line.)\n",
        serde_json::to_string_pretty(&meta).unwrap_or_else(|_| "{}".to_string()),
        instructions,
        blend_line,
        SUMMARY_SENTENCES - 1,
    );

    push_section(&mut prompt, STRENGTHS_HEADER, &selection.strengths);
    push_section(&mut prompt, ENVIRONMENTS_HEADER, &selection.environments);
    push_section(&mut prompt, FIT_AREAS_HEADER, &selection.fit_areas);
    if input.stage.is_school() {
        push_section(&mut prompt, SUBJECTS_HEADER, &selection.subjects);
    } else {
        push_section(&mut prompt, ROLES_CLASSIC_HEADER, &selection.roles_classic);
        push_section(&mut prompt, ROLES_EMERGING_HEADER, &selection.roles_emerging);
    }
    prompt
}

fn push_section(prompt: &mut String, header: &str, items: &[SelectedItem]) {
    prompt.push('\n');
    prompt.push_str(header);
    prompt.push('\n');
    prompt.push_str(&skeleton_list(items));
    prompt.push('\n');
}

/// Numbered skeleton the model fills in — one line per selected title, in
/// ranked order.
fn skeleton_list(items: &[SelectedItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}) **{}**: ", i + 1, item.title))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The fixed first summary line, naming the included archetypes in order.
fn blend_line(selection: &ReportSelection) -> String {
    let names = selection.included.names();
    match names.as_slice() {
        [] => "**Your profile blends your top archetypes.**".to_string(),
        [only] => format!("**Your profile blends {only} archetypes.**"),
        [rest @ .., last] => format!(
            "**Your profile blends {} and {last} archetypes.**",
            rest.join(", ")
        ),
    }
}

fn build_meta(input: &ReportInput, selection: &ReportSelection) -> Value {
    let archetype_definitions: Value = selection
        .included
        .members()
        .iter()
        .map(|m| (m.archetype.name().to_string(), json!(m.archetype.definition())))
        .collect::<serde_json::Map<String, Value>>()
        .into();
    let subdim_definitions: Value = selection
        .allowed_subdims
        .iter()
        .map(|sd| (sd.label().to_string(), json!(sd.description())))
        .collect::<serde_json::Map<String, Value>>()
        .into();

    json!({
        "user": {
            "status": input.stage.as_str(),
            "age": input.age,
            "archetypes": input.archetype_scores.iter()
                .map(|s| json!({"name": s.archetype.name(), "score": s.score}))
                .collect::<Vec<_>>(),
            "subjects": input.subjects,
        },
        "definitions": {
            "archetypes": archetype_definitions,
            "subdimensions": subdim_definitions,
        },
        "allowed": {
            "archetypes": selection.included.names(),
            "subdims": labels(&selection.allowed_subdims),
        },
        "items": {
            "strengths": items_meta(&selection.strengths),
            "environments": items_meta(&selection.environments),
            "fit_areas": items_meta(&selection.fit_areas),
            "subjects": items_meta(&selection.subjects),
            "roles_classic": items_meta(&selection.roles_classic),
            "roles_emerging": items_meta(&selection.roles_emerging),
        },
    })
}

fn items_meta(items: &[SelectedItem]) -> Vec<Value> {
    items
        .iter()
        .map(|item| {
            json!({
                "title": item.title,
                "archetypes": archetype_names(&item.archetypes),
                "subdims": labels(&item.hints),
            })
        })
        .collect()
}

fn archetype_names(archetypes: &[Archetype]) -> Vec<&'static str> {
    archetypes.iter().map(|a| a.name()).collect()
}

fn labels(subdims: &[SubDimension]) -> Vec<&'static str> {
    subdims.iter().map(|sd| sd.label()).collect()
}

fn report_instructions(stage: LifeStage) -> String {
    let section_counts = if stage.is_school() {
        format!(
            "SECTION COUNTS\n\
             - Summary: 1 paragraph, {SUMMARY_SENTENCES} sentences.\n\
             - Strengths: 5 bullets, {BULLET_RANGE} sentences each.\n\
             - Ideal Environments: 6 bullets, 2–3 sentences each.\n\
             - Career Fit Areas: 6 bullets, 2–3 sentences each.\n\
             - University Subject Suggestions: 6 bullets, 2–3 sentences each. If the user \
             provided current/liked subjects, start with up to 3 of those, then move to \
             archetype-matched subjects."
        )
    } else {
        format!(
            "SECTION COUNTS\n\
             - Summary: 1 paragraph, {SUMMARY_SENTENCES} sentences.\n\
             - Strengths: 5 bullets, {BULLET_RANGE} sentences each.\n\
             - Ideal Environments: 6 bullets, 2–3 sentences each.\n\
             - Career Fit Areas: 6 bullets, 2–3 sentences each.\n\
             - Classic Roles: 5 bullets, 2–3 sentences each.\n\
             - Emerging / Future Roles: 5 bullets, 2–3 sentences each."
        )
    };

    format!(
        "You are writing a personal, item-by-item report. Each bullet must stand on its own. \
         Do NOT refer to other bullets.\n\n\
         GENERAL LANGUAGE RULES\n\
         - Write in clear, natural English.\n\
         - Use {BULLET_RANGE} short sentences per bullet for strengths and environments.\n\
         - Use {BULLET_RANGE} sentences for career fit areas and subjects so the explanation \
         is not too thin.\n\
         - No dashes to glue ideas; write full sentences.\n\
         - Do not invent activities or achievements; describe tendencies.\n\
         - ALWAYS ground the explanation in the archetypes passed for that item.\n\
         - NEVER use the word \"energy\". Use \"blend\", \"traits\", \"profile\", or \"style\".\n\n\
         VARIETY RULES\n\
         - Do NOT start two bullets in a row with the same word.\n\
         - Rotate between opener patterns:\n\
         \u{2022} \"Your [Archetype] + [Archetype] blend means ...\"\n\
         \u{2022} \"One side of your profile is [Archetype], which ...\"\n\
         \u{2022} \"This fits you because your profile mixes [Archetype] and [Archetype] ...\"\n\
         \u{2022} \"With a strong [Archetype] strand, you tend to ...\"\n\
         \u{2022} \"People with this mix often ...\"\n\
         - If the previous bullet started with \"Your\", the next one must not.\n\n\
         SUBDIMENSIONS\n\
         - Some items in META include 0 or 1 subdimension hints (already filtered to what \
         the user scored high on).\n\
         - If there IS a subdimension hint for that item, add EXACTLY ONE final sentence in \
         this format: \"This also suits your [subdimension in simple words] because it lets \
         you use that preference.\"\n\
         - If there is NO hint, do NOT invent one.\n\
         - This sentence must always come LAST in the bullet.\n\
         - Vary the benefit slightly so every bullet does not sound identical.\n\n\
         LOGIC FOR EVERY ITEM\n\
         1. WHY: name 1–2 most relevant archetypes for that item and what they typically do \
         (create, deliver, plan, connect, explore, think).\n\
         2. FIT: link that to the specific item (strength, environment, area, subject).\n\
         3. BENEFIT: show why this helps the user or why they will probably enjoy it.\n\
         4. (Optional, only if hint present) SUBDIM: add the final sentence above.\n\n\
         SUMMARY RULES\n\
         - Start: \"Your profile blends\" followed by allowed.archetypes from META, in the \
         SAME order.\n\
         - Do NOT add or invent archetypes that are not in META allowed.archetypes.\n\
         - Unpack those archetypes using the definitions in META.\n\
         - Then say what kinds of projects this mix suits.\n\
         - End the summary by signalling that the next sections will show strengths, \
         environments, and areas/subjects.\n\n\
         {section_counts}"
    )
}
