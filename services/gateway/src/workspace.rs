//! services/gateway/src/workspace.rs
//!
//! The composition root: builds the HTTP client, restores the session and
//! wires every store, injecting the incident store into the intervention
//! store as its `IncidentResolver`.

use crate::adapters::{
    ClientResource, FileSessionStorage, HttpClient, IncidentResource, InterventionResource,
    ProductResource, ReportResource, Resources, UserResource,
};
use crate::config::Config;
use crate::error::ClientError;
use field_service_core::{
    DeletePolicy, EntityStore, IncidentStore, InterventionStore, NotificationCenter, ReportStore,
    SessionManager, UserStore,
};
use std::sync::Arc;
use tracing::info;

pub type ClientStore = EntityStore<ClientResource>;
pub type ProductStore = EntityStore<ProductResource>;

pub struct Workspace {
    pub session: Arc<SessionManager>,
    pub notifications: Arc<NotificationCenter>,
    pub users: UserStore<UserResource>,
    pub clients: ClientStore,
    pub products: ProductStore,
    pub incidents: Arc<IncidentStore<IncidentResource>>,
    pub interventions: InterventionStore<InterventionResource>,
    pub reports: ReportStore<ReportResource>,
}

impl Workspace {
    /// Restores the persisted session and builds every store against the
    /// configured backend. Nothing is fetched until `reload_all`.
    pub async fn connect(config: &Config) -> Result<Self, ClientError> {
        let storage = Arc::new(FileSessionStorage::new(config.session_file.clone()));
        let session = Arc::new(SessionManager::new(storage));
        let restored = session.restore().await;
        if let Some(user) = &restored.current_user {
            info!("Restored session for {}", user.email);
        }

        let http = HttpClient::new(
            &config.api_base_url,
            config.request_timeout,
            session.clone(),
        )?;
        info!("Workspace ready against {}", config.api_base_url);
        Ok(Self::assemble(http, session))
    }

    /// Wires the stores over an existing client and session.
    pub fn assemble(http: HttpClient, session: Arc<SessionManager>) -> Self {
        let resources = Resources::new(http);
        let notifications = Arc::new(NotificationCenter::new());
        let incidents = Arc::new(IncidentStore::new(Arc::new(resources.incidents)));

        Self {
            session,
            users: UserStore::new(Arc::new(resources.users), notifications.clone()),
            notifications,
            clients: EntityStore::new(Arc::new(resources.clients), DeletePolicy::RemoveLocally),
            products: EntityStore::new(Arc::new(resources.products), DeletePolicy::RemoveLocally),
            interventions: InterventionStore::new(
                Arc::new(resources.interventions),
                incidents.clone(),
            ),
            incidents,
            reports: ReportStore::new(Arc::new(resources.reports)),
        }
    }

    /// Reloads every store concurrently. Individual failures are logged by
    /// the stores and leave their previous items in place.
    pub async fn reload_all(&self) {
        futures::join!(
            self.users.reload(),
            self.clients.reload(),
            self.products.reload(),
            self.incidents.reload(),
            self.interventions.reload(),
            self.reports.reload(),
        );
        info!("All stores reloaded");
    }
}
