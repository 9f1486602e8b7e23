//! Static content banks: strengths, environments, fit areas, subjects, and
//! role groups. Loaded once at process start, shared read-only across all
//! requests, never mutated afterwards.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scoring::archetype::Archetype;

/// A curated bank entry. Titles are unique within a category; tags are an
/// ordered list of 1–3 archetypes, first tag being the primary one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub title: String,
    #[serde(default)]
    pub archetypes: Vec<Archetype>,
}

/// Roles are grouped under the fit area they belong to, split into classic
/// and emerging lists that are ranked independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleGroup {
    pub fit_area: String,
    #[serde(default)]
    pub classic: Vec<ContentItem>,
    #[serde(default)]
    pub emerging: Vec<ContentItem>,
}

#[derive(Debug, Clone, Default)]
pub struct Library {
    pub strengths: Vec<ContentItem>,
    pub environments: Vec<ContentItem>,
    pub fit_areas: Vec<ContentItem>,
    pub subjects: Vec<ContentItem>,
    pub roles: Vec<RoleGroup>,
}

impl Library {
    /// Reads every bank file from `dir`. A missing or malformed file yields
    /// an empty bank with a warning — the service starts regardless, and the
    /// affected category simply selects nothing.
    pub fn load(dir: &Path) -> Library {
        Library {
            strengths: read_bank(dir, "strengths.json"),
            environments: read_bank(dir, "environments.json"),
            fit_areas: read_bank(dir, "fit_areas.json"),
            subjects: read_bank(dir, "subjects.json"),
            roles: read_bank(dir, "roles.json"),
        }
    }
}

fn read_bank<T: DeserializeOwned>(dir: &Path, file: &str) -> Vec<T> {
    let path = dir.join(file);
    let parsed = fs::read_to_string(&path)
        .map_err(anyhow::Error::from)
        .and_then(|raw| serde_json::from_str(&raw).map_err(anyhow::Error::from));
    match parsed {
        Ok(items) => items,
        Err(err) => {
            warn!("error loading {file}: {err}");
            Vec::new()
        }
    }
}

/// Normalized form for title comparison across banks (role `fit_area` keys
/// against selected fit-area titles): lowercase, collapsed whitespace,
/// ampersands spaced consistently.
pub fn norm_title(raw: &str) -> String {
    raw.to_lowercase()
        .replace('&', " & ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
