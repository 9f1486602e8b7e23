//! Personal sub-dimension weighing: turns raw caller scores into the ordered
//! weight map used for hint pools. Weights are personal salience only — no
//! archetype-affinity multiplier is applied at this stage.

use crate::config::ScoringConfig;
use crate::scoring::archetype::IncludedSet;
use crate::scoring::matrix::SubDimension;

/// A caller-supplied sub-dimension score. The scale convention varies
/// (0..1 or 0..100); normalization happens here, nowhere else.
#[derive(Debug, Clone)]
pub struct UserSubdimScore {
    pub name: String,
    pub score: f64,
}

/// Sub-dimensions kept for this request, descending by personal weight.
/// Ordering is part of the contract — hint pools preserve it.
#[derive(Debug, Clone, Default)]
pub struct PersonalWeights {
    entries: Vec<(SubDimension, f64)>,
}

impl PersonalWeights {
    /// Builds the weight map:
    /// 1. normalize each score to 0..1 (values above 1 are percentages),
    /// 2. resolve names against the matrix (unresolvable names are dropped
    ///    silently — they cannot be scored),
    /// 3. keep only sub-dimensions with a nonzero affinity to at least one
    ///    included archetype (nonzero, not positive),
    /// 4. keep only personal scores at or above the minimum threshold,
    /// 5. weight = the personal score itself.
    pub fn build(
        user_scores: &[UserSubdimScore],
        included: &IncludedSet,
        config: &ScoringConfig,
    ) -> Self {
        let mut entries: Vec<(SubDimension, f64)> = Vec::new();
        for row in user_scores {
            let Some(sd) = SubDimension::resolve(&row.name) else {
                continue;
            };
            let belongs = included
                .members()
                .iter()
                .any(|m| sd.affinity(m.archetype) != 0.0);
            if !belongs {
                continue;
            }
            let personal = normalize_score(row.score);
            if personal < config.min_subdim_score {
                continue;
            }
            let personal = personal.clamp(0.0, 1.0);
            // later duplicates overwrite, first-seen position is kept
            match entries.iter_mut().find(|(existing, _)| *existing == sd) {
                Some(slot) => slot.1 = personal,
                None => entries.push((sd, personal)),
            }
        }
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn weight(&self, sd: SubDimension) -> Option<f64> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == sd)
            .map(|(_, w)| *w)
    }

    /// All kept sub-dimensions, descending by weight.
    pub fn subdims(&self) -> Vec<SubDimension> {
        self.entries.iter().map(|(sd, _)| *sd).collect()
    }

    /// The subset scoring at or above `threshold`, falling back to the full
    /// list when nothing clears it — every item still gets hint material.
    pub fn high_confidence(&self, threshold: f64) -> Vec<SubDimension> {
        let high: Vec<SubDimension> = self
            .entries
            .iter()
            .filter(|(_, w)| *w >= threshold)
            .map(|(sd, _)| *sd)
            .collect();
        if high.is_empty() {
            self.subdims()
        } else {
            high
        }
    }
}

fn normalize_score(raw: f64) -> f64 {
    if raw > 1.0 {
        raw / 100.0
    } else {
        raw
    }
}
