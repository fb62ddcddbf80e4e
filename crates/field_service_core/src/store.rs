//! crates/field_service_core/src/store.rs
//!
//! The generic entity store: one in-memory collection mediated by a remote
//! gateway. Every successful write is followed by a full reload from the
//! server; the server list is the source of truth.

use crate::domain::{Entity, EntityId};
use crate::ports::{EntityGateway, PortResult};
use crate::validate::Validate;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// What a store does with its local list after a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Drop the item from the local list without asking the server again.
    RemoveLocally,
    /// Reload the whole list from the server.
    Reload,
}

struct StoreState<E> {
    items: Vec<E>,
    /// Number of reloads currently waiting on the gateway.
    in_flight: usize,
}

pub struct EntityStore<G: EntityGateway> {
    gateway: Arc<G>,
    state: RwLock<StoreState<G::Entity>>,
    delete_policy: DeletePolicy,
}

impl<G: EntityGateway> EntityStore<G> {
    const KIND: &'static str = <G::Entity as Entity>::KIND;

    pub fn new(gateway: Arc<G>, delete_policy: DeletePolicy) -> Self {
        Self {
            gateway,
            state: RwLock::new(StoreState {
                items: Vec::new(),
                in_flight: 0,
            }),
            delete_policy,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    //=====================================================================================
    // Reads
    //=====================================================================================

    /// A snapshot of the current list.
    pub async fn items(&self) -> Vec<G::Entity> {
        self.state.read().await.items.clone()
    }

    pub async fn get(&self, id: &EntityId) -> Option<G::Entity> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// True while at least one reload is waiting on the server. Callers use it
    /// to disable controls that would trigger duplicate requests.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.in_flight > 0
    }

    //=====================================================================================
    // Reload
    //=====================================================================================

    /// Replaces the local list with the server's.
    ///
    /// Never fails: on error the previous items are kept and the failure is
    /// logged. When reloads overlap, whichever response lands last wins.
    pub async fn reload(&self) {
        self.state.write().await.in_flight += 1;

        let result = self.gateway.list().await;

        let mut state = self.state.write().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        match result {
            Ok(items) => {
                debug!("Reloaded {} list: {} items", Self::KIND, items.len());
                state.items = items;
            }
            Err(e) => {
                warn!(
                    "Failed to reload {} list, keeping {} cached items: {}",
                    Self::KIND,
                    state.items.len(),
                    e
                );
            }
        }
    }

    //=====================================================================================
    // Writes
    //=====================================================================================

    /// Creates an entity on the server, then reloads. The returned entity is
    /// the server's response; it is never spliced into the local list.
    pub async fn create(&self, draft: &G::Draft) -> PortResult<G::Entity> {
        draft.validate()?;
        let created = self.gateway.create(draft).await.map_err(|e| {
            error!("Failed to create {}: {}", Self::KIND, e);
            e
        })?;
        info!("Created {} {}", Self::KIND, created.id());
        self.reload().await;
        Ok(created)
    }

    pub async fn update(&self, id: &EntityId, patch: &G::Patch) -> PortResult<G::Entity> {
        patch.validate()?;
        let updated = self.gateway.update(id, patch).await.map_err(|e| {
            error!("Failed to update {} {}: {}", Self::KIND, id, e);
            e
        })?;
        info!("Updated {} {}", Self::KIND, id);
        self.reload().await;
        Ok(updated)
    }

    pub async fn delete(&self, id: &EntityId) -> PortResult<()> {
        self.gateway.delete(id).await.map_err(|e| {
            error!("Failed to delete {} {}: {}", Self::KIND, id, e);
            e
        })?;
        info!("Deleted {} {}", Self::KIND, id);
        match self.delete_policy {
            DeletePolicy::RemoveLocally => {
                self.state.write().await.items.retain(|item| item.id() != id);
            }
            DeletePolicy::Reload => self.reload().await,
        }
        Ok(())
    }

    //=====================================================================================
    // Local patches used by transitions
    //=====================================================================================

    /// Records the outcome of a successful transition call before the
    /// reconciling reload: the server's copy when it sent one, otherwise the
    /// optimistic patch applied to the local item. Returns the resulting item.
    pub(crate) async fn apply_transition(
        &self,
        id: &EntityId,
        returned: Option<G::Entity>,
        optimistic: impl FnOnce(&mut G::Entity),
    ) -> Option<G::Entity> {
        let mut state = self.state.write().await;
        let slot = state.items.iter_mut().find(|item| item.id() == id);
        match (slot, returned) {
            (Some(slot), Some(server_copy)) => {
                *slot = server_copy;
                Some(slot.clone())
            }
            (Some(slot), None) => {
                optimistic(slot);
                Some(slot.clone())
            }
            (None, server_copy) => server_copy,
        }
    }
}
