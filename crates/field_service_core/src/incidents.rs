//! crates/field_service_core/src/incidents.rs
//!
//! The incident store and the resolve capability it lends to interventions.

use crate::domain::{EntityId, Incident, IncidentStatus};
use crate::ports::{IncidentGateway, IncidentResolver, PortResult};
use crate::store::{DeletePolicy, EntityStore};
use async_trait::async_trait;
use chrono::Utc;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{error, info};

pub struct IncidentStore<G: IncidentGateway> {
    store: EntityStore<G>,
}

impl<G: IncidentGateway> IncidentStore<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            store: EntityStore::new(gateway, DeletePolicy::RemoveLocally),
        }
    }

    /// Marks an incident resolved on the server, reflects it locally at once,
    /// then reconciles with a reload.
    pub async fn resolve(&self, id: &EntityId) -> PortResult<()> {
        let returned = self.store.gateway().resolve(id).await.map_err(|e| {
            error!("Failed to resolve incident {}: {}", id, e);
            e
        })?;
        self.store
            .apply_transition(id, returned, |incident| incident.mark_resolved(Utc::now()))
            .await;
        info!("Resolved incident {}", id);
        self.store.reload().await;
        Ok(())
    }

    pub async fn unresolved(&self) -> Vec<Incident> {
        self.store
            .items()
            .await
            .into_iter()
            .filter(|i| i.statut == IncidentStatus::Unresolved)
            .collect()
    }
}

impl<G: IncidentGateway> Deref for IncidentStore<G> {
    type Target = EntityStore<G>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

#[async_trait]
impl<G: IncidentGateway> IncidentResolver for IncidentStore<G> {
    async fn resolve_incident(&self, id: &EntityId) -> PortResult<()> {
        self.resolve(id).await
    }
}
