//! Lazily initialized, explicitly owned access to the reference table.
//!
//! RULE: A provider builds or loads its table at most once. The first
//! caller takes the lock and either loads the persisted table or generates
//! and persists a new one; every later (or concurrent) caller waits on the
//! same lock and receives the same `Arc`.

use crate::{
    config::{GeneratorConfig, StaffingRule},
    error::{StaffingError, StaffingResult},
    reference::{generate_reference_table, ReferenceTable},
    rng::fresh_seed,
    store::ModelStore,
};
use std::sync::{Arc, Mutex, MutexGuard};

struct ProviderState {
    store: ModelStore,
    table: Option<Arc<ReferenceTable>>,
}

pub struct ReferenceProvider {
    state:     Mutex<ProviderState>,
    generator: GeneratorConfig,
    rule:      StaffingRule,
}

impl ReferenceProvider {
    pub fn new(store: ModelStore, generator: GeneratorConfig, rule: StaffingRule) -> Self {
        Self {
            state: Mutex::new(ProviderState { store, table: None }),
            generator,
            rule,
        }
    }

    /// The reference table, loading or generating it on first use.
    pub fn table(&self) -> StaffingResult<Arc<ReferenceTable>> {
        let mut state = self.lock()?;
        if let Some(table) = &state.table {
            return Ok(Arc::clone(table));
        }

        let table = match state.store.load_table(&self.generator.model_id)? {
            Some(stored) => {
                log::info!(
                    "Loaded reference table '{}' ({} rows, generation {})",
                    stored.model_id,
                    stored.len(),
                    stored.generation_id
                );
                stored
            }
            None => self.generate_and_save(&state.store)?,
        };

        let table = Arc::new(table);
        state.table = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Discard the current table (cached and persisted) and build a new one.
    pub fn regenerate(&self) -> StaffingResult<Arc<ReferenceTable>> {
        let mut state = self.lock()?;
        let table = Arc::new(self.generate_and_save(&state.store)?);
        state.table = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Persist and adopt a caller-supplied table (historical data, fixtures).
    /// Rows below the staffing floor are rejected.
    pub fn install(&self, mut table: ReferenceTable) -> StaffingResult<Arc<ReferenceTable>> {
        if let Some(row) = table.rows.iter().find(|r| r.staff_needed < self.rule.min_staff) {
            return Err(StaffingError::malformed(
                "staff_needed",
                format!(
                    "reference row {:?} is below the minimum of {}",
                    row, self.rule.min_staff
                ),
            ));
        }
        table.model_id = self.generator.model_id.clone();
        let mut state = self.lock()?;
        state.store.save_table(&table)?;
        let table = Arc::new(table);
        state.table = Some(Arc::clone(&table));
        Ok(table)
    }

    /// The table if it has already been initialized. Never touches storage.
    pub fn cached(&self) -> StaffingResult<Option<Arc<ReferenceTable>>> {
        Ok(self.lock()?.table.clone())
    }

    fn generate_and_save(&self, store: &ModelStore) -> StaffingResult<ReferenceTable> {
        let seed = match self.generator.seed {
            Some(seed) => seed,
            None => {
                let seed = fresh_seed();
                log::info!("No generator seed configured; drew seed {seed}");
                seed
            }
        };
        let table = generate_reference_table(seed, &self.generator, &self.rule);
        store.save_table(&table)?;
        Ok(table)
    }

    fn lock(&self) -> StaffingResult<MutexGuard<'_, ProviderState>> {
        self.state.lock().map_err(|_| {
            log::warn!("Reference provider lock poisoned by a panicking caller");
            StaffingError::Other(anyhow::anyhow!("reference provider lock poisoned"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poisoned_lock_is_reported_by_every_accessor() {
        let store = ModelStore::in_memory().expect("in-memory store");
        store.migrate().expect("migration");
        let provider = ReferenceProvider::new(store, GeneratorConfig::default(), StaffingRule::default());

        let poisoned = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = provider.state.lock().expect("first lock");
                    panic!("poison the provider lock");
                })
                .join()
        });
        assert!(poisoned.is_err());

        assert!(provider.cached().is_err(), "cached() must not hide a poisoned lock");
        assert!(provider.table().is_err());
    }
}
