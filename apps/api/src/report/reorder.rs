//! Re-orders the bullets of each report section to match the computed
//! rankings, keeping the model's rationale text intact. The model is asked
//! to keep the skeleton order, but it sometimes shuffles — this pass makes
//! the visible order authoritative again.
//!
//! Purely string-based and conservative: a section or bullet that fails to
//! parse is left untouched.

use crate::report::builder::{ReportSelection, SelectedItem};
use crate::report::prompts::{
    ENVIRONMENTS_HEADER, FIT_AREAS_HEADER, ROLES_CLASSIC_HEADER, ROLES_EMERGING_HEADER,
    STRENGTHS_HEADER, SUBJECTS_HEADER,
};

/// Applies the reorder pass for every section present in the selection.
pub fn reorder_report(markdown: &str, selection: &ReportSelection) -> String {
    let mut out = markdown.to_string();
    for (header, items) in [
        (STRENGTHS_HEADER, &selection.strengths),
        (ENVIRONMENTS_HEADER, &selection.environments),
        (FIT_AREAS_HEADER, &selection.fit_areas),
        (SUBJECTS_HEADER, &selection.subjects),
        (ROLES_CLASSIC_HEADER, &selection.roles_classic),
        (ROLES_EMERGING_HEADER, &selection.roles_emerging),
    ] {
        let titles: Vec<&str> = items.iter().map(|it: &SelectedItem| it.title.as_str()).collect();
        if !titles.is_empty() {
            out = reorder_section(&out, header, &titles);
        }
    }
    out
}

/// Rewrites one section's bullets into `ranked_titles` order. Bullets whose
/// titles are not in the ranking keep their relative order at the end.
pub fn reorder_section(markdown: &str, header: &str, ranked_titles: &[&str]) -> String {
    let lines: Vec<&str> = markdown.lines().collect();
    let Some(header_idx) = lines.iter().position(|line| line.trim() == header) else {
        return markdown.to_string();
    };
    let body_start = header_idx + 1;
    let body_end = lines[body_start..]
        .iter()
        .position(|line| is_section_header(line))
        .map(|offset| body_start + offset)
        .unwrap_or(lines.len());

    let bullets: Vec<(&str, &str)> = lines[body_start..body_end]
        .iter()
        .filter_map(|line| bullet_title(line).map(|title| (title, *line)))
        .collect();
    if bullets.is_empty() {
        return markdown.to_string();
    }

    let mut ordered: Vec<&str> = Vec::with_capacity(bullets.len());
    for title in ranked_titles {
        if let Some((_, line)) = bullets.iter().find(|(t, _)| t == title) {
            ordered.push(line);
        }
    }
    for (title, line) in &bullets {
        if !ranked_titles.contains(title) {
            ordered.push(line);
        }
    }

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend(&lines[..body_start]);
    out.push("");
    out.extend(&ordered);
    out.push("");
    out.extend(&lines[body_end..]);
    out.join("\n")
}

fn is_section_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("## ") || trimmed.starts_with("# ")
}

/// Extracts the bold title from a bullet line — `- **Title**: ...` or the
/// numbered `1) **Title**: ...` skeleton form.
fn bullet_title(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let is_bullet = trimmed.starts_with('-')
        || trimmed
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit());
    if !is_bullet {
        return None;
    }
    let start = trimmed.find("**")? + 2;
    let end = trimmed[start..].find("**")? + start;
    Some(trimmed[start..end].trim())
}
