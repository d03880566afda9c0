//! The synthetic reference table the estimator searches.
//!
//! A table is generated once from a seed, persisted as a single blob and
//! never mutated afterwards. Row order carries no meaning.

use crate::{
    config::{GeneratorConfig, StaffingRule},
    query::StaffingQuery,
    rng::GeneratorRng,
    types::{GenerationId, ModelId, PatientCount, StaffCount},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bump when the persisted row layout changes. Stored tables carrying a
/// different version are discarded and regenerated.
pub const TABLE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceRow {
    pub patient_count: PatientCount,
    pub day_of_week:   i64,
    pub hour_of_day:   i64,
    pub has_event:     bool,
    pub staff_needed:  StaffCount,
}

impl ReferenceRow {
    pub fn situation(&self) -> StaffingQuery {
        StaffingQuery::new(self.patient_count, self.day_of_week, self.hour_of_day, self.has_event)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceTable {
    pub model_id:      ModelId,
    pub generation_id: GenerationId,
    pub seed:          u64,
    pub created_at:    DateTime<Utc>,
    pub rows:          Vec<ReferenceRow>,
}

impl ReferenceTable {
    /// Wrap pre-built rows, e.g. historical observations or test fixtures.
    pub fn from_rows(model_id: impl Into<ModelId>, rows: Vec<ReferenceRow>) -> Self {
        Self {
            model_id:      model_id.into(),
            generation_id: uuid::Uuid::new_v4().to_string(),
            seed:          0,
            created_at:    Utc::now(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build a synthetic table of `config.row_count` rows from `seed`.
///
/// Draw order per row is fixed: patients, day, hour, event. Changing it
/// changes every table generated from an existing seed.
pub fn generate_reference_table(
    seed:   u64,
    config: &GeneratorConfig,
    rule:   &StaffingRule,
) -> ReferenceTable {
    let mut rng = GeneratorRng::new(seed);
    let mut rows = Vec::with_capacity(config.row_count);

    for _ in 0..config.row_count {
        let situation = StaffingQuery::new(
            rng.range(config.patient_min, config.patient_max),
            rng.range(0, 7),
            rng.range(0, 24),
            rng.coin(),
        );
        rows.push(ReferenceRow {
            patient_count: situation.patient_count,
            day_of_week:   situation.day_of_week,
            hour_of_day:   situation.hour_of_day,
            has_event:     situation.has_event,
            staff_needed:  rule.generated_staff(&situation),
        });
    }

    log::info!(
        "Generated reference table '{}' with {} rows (seed={seed})",
        config.model_id,
        rows.len()
    );

    ReferenceTable {
        model_id:      config.model_id.clone(),
        generation_id: uuid::Uuid::new_v4().to_string(),
        seed,
        created_at:    Utc::now(),
        rows,
    }
}
