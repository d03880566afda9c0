use crate::types::{PatientCount, StaffCount};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL_ID: &str = "staffing_model";

/// The deterministic staffing rule: baseline ratio plus situational bonuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StaffingRule {
    pub min_staff:          StaffCount,
    pub patients_per_staff: PatientCount,
    pub weekend_from_day:   i64,
    pub weekend_bonus:      StaffCount,
    /// Hours strictly below this count as night shift.
    pub night_before_hour:  i64,
    /// Hours strictly above this count as night shift.
    pub night_after_hour:   i64,
    pub night_bonus:        StaffCount,
    pub event_bonus:        StaffCount,
}

impl Default for StaffingRule {
    fn default() -> Self {
        Self {
            min_staff:          2,
            patients_per_staff: 4,
            weekend_from_day:   5,
            weekend_bonus:      2,
            night_before_hour:  8,
            night_after_hour:   20,
            night_bonus:        1,
            event_bonus:        3,
        }
    }
}

/// Tolerance windows and confidence shaping for the similarity lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimilarityConfig {
    pub patient_tolerance:   PatientCount,
    pub hour_tolerance:      i64,
    pub base_confidence:     f64,
    pub match_divisor:       f64,
    pub max_confidence:      f64,
    pub fallback_confidence: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            patient_tolerance:   10,
            hour_tolerance:      3,
            base_confidence:     0.5,
            match_divisor:       100.0,
            max_confidence:      0.9,
            fallback_confidence: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub row_count:   usize,
    pub patient_min: PatientCount,
    /// Exclusive upper bound.
    pub patient_max: PatientCount,
    /// When unset, a seed is drawn from entropy and persisted with the table.
    pub seed:        Option<u64>,
    pub model_id:    String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            row_count:   1000,
            patient_min: 5,
            patient_max: 100,
            seed:        None,
            model_id:    DEFAULT_MODEL_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EstimatorConfig {
    pub rule:       StaffingRule,
    pub similarity: SimilarityConfig,
    pub generator:  GeneratorConfig,
}

impl EstimatorConfig {
    /// Load a JSON config file. Missing sections and fields take defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EstimatorConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rule.patients_per_staff <= 0 {
            anyhow::bail!("rule.patients_per_staff must be positive");
        }
        if self.generator.patient_max <= self.generator.patient_min {
            anyhow::bail!(
                "generator.patient_max ({}) must exceed generator.patient_min ({})",
                self.generator.patient_max,
                self.generator.patient_min
            );
        }
        if self.similarity.patient_tolerance < 0 || self.similarity.hour_tolerance < 0 {
            anyhow::bail!(
                "similarity tolerances must be non-negative (patient={}, hour={})",
                self.similarity.patient_tolerance,
                self.similarity.hour_tolerance
            );
        }
        if self.similarity.match_divisor <= 0.0 {
            anyhow::bail!("similarity.match_divisor must be positive");
        }
        if self.generator.model_id.is_empty() {
            anyhow::bail!("generator.model_id must not be empty");
        }
        Ok(())
    }

    /// Builder-style seed override, used by the runner's `--seed` flag.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.generator.seed = Some(seed);
        self
    }
}
