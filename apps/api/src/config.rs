use anyhow::{Context, Result};

/// Application configuration loaded from environment variables once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory holding the static content bank JSON files.
    pub data_dir: String,
    /// Optional — when absent the prose client returns a placeholder summary.
    pub openai_api_key: Option<String>,
    /// Preferred model, tried before the built-in fallback chain.
    pub openai_model: Option<String>,
    /// Skip the LLM call and return structured diagnostics instead.
    pub dev_no_llm: bool,
    pub rust_log: String,
    pub scoring: ScoringConfig,
}

/// Every threshold and count the scoring core uses, fixed at startup.
///
/// Core components receive this struct and never read the environment;
/// the env overrides below exist for operational tuning only and are
/// resolved once in `Config::from_env`.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Most archetypes ever included for one request.
    pub max_included: usize,
    /// Inclusion threshold for rank-2 and below, on the 0–100 scale.
    pub min_include: f64,
    /// Raw score at which the hard bonus applies.
    pub auto_include: f64,
    /// Additive boost applied before exponentiation.
    pub hard_bonus: f64,
    /// Super-linear weighting exponent.
    pub weight_exponent: f64,
    /// Minimum normalized personal score for a sub-dimension to be kept.
    pub min_subdim_score: f64,
    /// Personal score above which a sub-dimension is preferred for hints.
    pub high_subdim_score: f64,
    /// Ceiling on the summed low-affinity penalty per item.
    pub max_penalty: f64,
    /// Edit-distance ratio allowed by the fuzzy subject matcher.
    pub fuzzy_threshold: f64,
    pub strengths_count: usize,
    pub environments_count: usize,
    pub fit_areas_count: usize,
    pub subjects_count: usize,
    pub roles_count: usize,
    /// Slots reserved for user-declared subjects in fit-area/subject selection.
    pub subject_slots: usize,
    pub hints_per_item: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_included: 3,
            min_include: 60.0,
            auto_include: 80.0,
            hard_bonus: 5.0,
            weight_exponent: 1.7,
            min_subdim_score: 0.30,
            high_subdim_score: 0.60,
            max_penalty: 1.2,
            fuzzy_threshold: 0.35,
            strengths_count: 5,
            environments_count: 6,
            fit_areas_count: 6,
            subjects_count: 6,
            roles_count: 5,
            subject_slots: 3,
            hints_per_item: 1,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = ScoringConfig::default();
        let scoring = ScoringConfig {
            min_include: env_f64("CDNA_MIN_INCLUDE", defaults.min_include)?,
            auto_include: env_f64("CDNA_AUTO_INCLUDE", defaults.auto_include)?,
            hard_bonus: env_f64("CDNA_HARD_BONUS", defaults.hard_bonus)?,
            weight_exponent: env_f64("CDNA_WEIGHT_EXP", defaults.weight_exponent)?,
            min_subdim_score: env_f64("CDNA_MIN_SUBDIM_SCORE", defaults.min_subdim_score)?,
            ..defaults
        };

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            data_dir: std::env::var("CDNA_DATA_DIR").unwrap_or_else(|_| "data/cdna".to_string()),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_model: std::env::var("OPENAI_MODEL").ok().filter(|m| !m.is_empty()),
            dev_no_llm: env_flag("CDNA_DEV_NO_LLM"),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            scoring,
        })
    }
}

fn env_f64(key: &str, default: f64) -> Result<f64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("{key} must be a number")),
        Err(_) => Ok(default),
    }
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
