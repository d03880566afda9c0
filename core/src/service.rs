//! The staffing service. Wires config, storage and the estimator.
//!
//! Callers hand the service wire requests; it validates them at the
//! boundary, makes sure the reference table is available, and delegates
//! to a pure `Estimator`.

use crate::{
    config::EstimatorConfig,
    error::StaffingResult,
    estimator::{Estimator, Prediction},
    provider::ReferenceProvider,
    query::{PredictionRequest, StaffingQuery, StreamRequest},
    reference::ReferenceTable,
    store::ModelStore,
};
use std::sync::Arc;

pub struct StaffingService {
    config:   EstimatorConfig,
    provider: ReferenceProvider,
}

impl StaffingService {
    /// Build a service over `store`. The config is validated first.
    pub fn new(store: ModelStore, config: EstimatorConfig) -> StaffingResult<Self> {
        config.validate()?;
        let provider = ReferenceProvider::new(
            store,
            config.generator.clone(),
            config.rule.clone(),
        );
        Ok(Self { config, provider })
    }

    /// Open the database at `path`, migrate it and build a service.
    pub fn open(path: &str, config: EstimatorConfig) -> StaffingResult<Self> {
        let store = ModelStore::open(path)?;
        store.migrate()?;
        Self::new(store, config)
    }

    /// A service over a fresh in-memory database (used in tests).
    pub fn in_memory(config: EstimatorConfig) -> StaffingResult<Self> {
        let store = ModelStore::in_memory()?;
        store.migrate()?;
        Self::new(store, config)
    }

    pub fn provider(&self) -> &ReferenceProvider {
        &self.provider
    }

    pub fn table(&self) -> StaffingResult<Arc<ReferenceTable>> {
        self.provider.table()
    }

    /// An estimator bound to the current reference table.
    pub fn estimator(&self) -> StaffingResult<Estimator> {
        Ok(Estimator::new(
            self.provider.table()?,
            self.config.rule.clone(),
            self.config.similarity.clone(),
        ))
    }

    /// Estimate for an already-built query. No range validation is applied.
    pub fn estimate(&self, query: &StaffingQuery) -> StaffingResult<Prediction> {
        Ok(self.estimator()?.estimate(query))
    }

    /// Request/response surface: validate the request, then estimate.
    pub fn predict(&self, request: &PredictionRequest) -> StaffingResult<Prediction> {
        let query = request.to_query()?;
        log::debug!("predict for department '{}'", request.department);
        self.estimate(&query)
    }

    /// Streaming surface: one JSON message in, one prediction out.
    pub fn handle_stream_message(&self, line: &str) -> StaffingResult<Prediction> {
        let query = StreamRequest::parse(line)?;
        self.estimate(&query)
    }
}
