//! crates/field_service_core/src/users.rs
//!
//! The user store. Account creation and deletion leave an in-app notification.

use crate::domain::{EntityId, User};
use crate::ports::{Notifier, PortResult, UserGateway};
use crate::store::{DeletePolicy, EntityStore};
use std::ops::Deref;
use std::sync::Arc;
use tracing::{error, info};

pub struct UserStore<G: UserGateway> {
    store: EntityStore<G>,
    notifier: Arc<dyn Notifier>,
}

impl<G: UserGateway> UserStore<G> {
    pub fn new(gateway: Arc<G>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store: EntityStore::new(gateway, DeletePolicy::Reload),
            notifier,
        }
    }

    pub async fn create(&self, draft: &G::Draft) -> PortResult<User> {
        let user = self.store.create(draft).await?;
        self.notifier
            .notify(format!("User {} created", user.display_name()));
        Ok(user)
    }

    pub async fn delete(&self, id: &EntityId) -> PortResult<()> {
        let name = self
            .store
            .get(id)
            .await
            .map(|u| u.display_name())
            .unwrap_or_else(|| id.to_string());
        self.store.delete(id).await?;
        self.notifier.notify(format!("User {} deleted", name));
        Ok(())
    }

    /// Activates an inactive account or deactivates an active one.
    pub async fn toggle_status(&self, id: &EntityId) -> PortResult<()> {
        let returned = self.store.gateway().toggle_status(id).await.map_err(|e| {
            error!("Failed to toggle status of user {}: {}", id, e);
            e
        })?;
        self.store
            .apply_transition(id, returned, |u| u.statut = u.statut.toggled())
            .await;
        info!("Toggled status of user {}", id);
        self.store.reload().await;
        Ok(())
    }
}

impl<G: UserGateway> Deref for UserStore<G> {
    type Target = EntityStore<G>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
