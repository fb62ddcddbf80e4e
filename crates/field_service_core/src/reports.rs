//! crates/field_service_core/src/reports.rs

use crate::domain::{EntityId, Intervention, Report};
use crate::drafts::{ReportDetails, ReportDraft};
use crate::ports::{EntityGateway, PortResult};
use crate::store::{DeletePolicy, EntityStore};
use std::ops::Deref;
use std::sync::Arc;

/// Reports are terminal records, written once per finished intervention.
pub struct ReportStore<G: EntityGateway<Entity = Report>> {
    store: EntityStore<G>,
}

impl<G> ReportStore<G>
where
    G: EntityGateway<Entity = Report, Draft = ReportDraft>,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            store: EntityStore::new(gateway, DeletePolicy::RemoveLocally),
        }
    }

    /// Refuses interventions that are not finished.
    pub async fn create_for(
        &self,
        intervention: &Intervention,
        details: ReportDetails,
    ) -> PortResult<Report> {
        let draft = ReportDraft::for_intervention(intervention, details)?;
        self.store.create(&draft).await
    }

    /// The report written for an intervention, used when exporting it.
    pub async fn for_intervention(&self, intervention_id: &EntityId) -> Option<Report> {
        self.store
            .items()
            .await
            .into_iter()
            .find(|r| &r.intervention_id == intervention_id)
    }
}

impl<G: EntityGateway<Entity = Report>> Deref for ReportStore<G> {
    type Target = EntityStore<G>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
