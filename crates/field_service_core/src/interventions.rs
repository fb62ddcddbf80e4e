//! crates/field_service_core/src/interventions.rs
//!
//! The intervention store: start/finish transitions, and the link that
//! resolves the incident an intervention was opened for once it is finished.

use crate::domain::{EntityId, Intervention, InterventionStatus};
use crate::ports::{IncidentResolver, InterventionGateway, PortError, PortResult};
use crate::store::{DeletePolicy, EntityStore};
use chrono::Utc;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct InterventionStore<G: InterventionGateway> {
    store: EntityStore<G>,
    incidents: Arc<dyn IncidentResolver>,
}

impl<G: InterventionGateway> InterventionStore<G> {
    pub fn new(gateway: Arc<G>, incidents: Arc<dyn IncidentResolver>) -> Self {
        Self {
            store: EntityStore::new(gateway, DeletePolicy::RemoveLocally),
            incidents,
        }
    }

    pub async fn start(&self, id: &EntityId) -> PortResult<()> {
        if let Some(local) = self.store.get(id).await {
            if !local.can_start() {
                return Err(PortError::Validation(format!(
                    "intervention {} cannot be started from {:?}",
                    id, local.statut
                )));
            }
        }
        let returned = self.store.gateway().start(id).await.map_err(|e| {
            error!("Failed to start intervention {}: {}", id, e);
            e
        })?;
        self.store
            .apply_transition(id, returned, |i| i.mark_started(Utc::now()))
            .await;
        info!("Started intervention {}", id);
        self.store.reload().await;
        Ok(())
    }

    /// Finishes an intervention. If it references an incident, that incident
    /// is resolved exactly once after the finish call succeeds. A failed
    /// resolve is logged; the finish stands.
    pub async fn finish(&self, id: &EntityId) -> PortResult<()> {
        let local = self.store.get(id).await;
        if let Some(local) = &local {
            if !local.can_finish() {
                return Err(PortError::Validation(format!(
                    "intervention {} is already finished",
                    id
                )));
            }
        }
        let returned = self.store.gateway().finish(id).await.map_err(|e| {
            error!("Failed to finish intervention {}: {}", id, e);
            e
        })?;

        let incident_id = returned
            .as_ref()
            .and_then(|i| i.incident_id.clone())
            .or_else(|| local.and_then(|i| i.incident_id));

        self.store
            .apply_transition(id, returned, |i| i.mark_finished(Utc::now()))
            .await;
        info!("Finished intervention {}", id);

        if let Some(incident_id) = incident_id {
            if let Err(e) = self.incidents.resolve_incident(&incident_id).await {
                warn!(
                    "Intervention {} finished but incident {} could not be resolved: {}",
                    id, incident_id, e
                );
            }
        }

        self.store.reload().await;
        Ok(())
    }

    pub async fn by_status(&self, statut: InterventionStatus) -> Vec<Intervention> {
        self.store
            .items()
            .await
            .into_iter()
            .filter(|i| i.statut == statut)
            .collect()
    }
}

impl<G: InterventionGateway> Deref for InterventionStore<G> {
    type Target = EntityStore<G>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
