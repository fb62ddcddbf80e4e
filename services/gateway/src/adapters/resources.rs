//! services/gateway/src/adapters/resources.rs
//!
//! The backend's resources and their transition endpoints.

use super::http::{HttpClient, RestResource};
use async_trait::async_trait;
use field_service_core::domain::{Client, EntityId, Incident, Intervention, Product, Report, User};
use field_service_core::drafts::{
    ClientDraft, ClientPatch, IncidentDraft, IncidentPatch, InterventionDraft, InterventionPatch,
    ProductDraft, ProductPatch, ReportDraft, ReportPatch, UserDraft, UserPatch,
};
use field_service_core::ports::{IncidentGateway, InterventionGateway, PortResult, UserGateway};

pub const USERS_PATH: &str = "utilisateurs";
pub const CLIENTS_PATH: &str = "clients";
pub const PRODUCTS_PATH: &str = "produits";
pub const INCIDENTS_PATH: &str = "incidents";
pub const INTERVENTIONS_PATH: &str = "interventions";
pub const REPORTS_PATH: &str = "rapports";

pub type UserResource = RestResource<User, UserDraft, UserPatch>;
pub type ClientResource = RestResource<Client, ClientDraft, ClientPatch>;
pub type ProductResource = RestResource<Product, ProductDraft, ProductPatch>;
pub type IncidentResource = RestResource<Incident, IncidentDraft, IncidentPatch>;
pub type InterventionResource = RestResource<Intervention, InterventionDraft, InterventionPatch>;
pub type ReportResource = RestResource<Report, ReportDraft, ReportPatch>;

/// Every resource adapter, sharing one HTTP client.
pub struct Resources {
    pub users: UserResource,
    pub clients: ClientResource,
    pub products: ProductResource,
    pub incidents: IncidentResource,
    pub interventions: InterventionResource,
    pub reports: ReportResource,
}

impl Resources {
    pub fn new(http: HttpClient) -> Self {
        Self {
            users: RestResource::new(http.clone(), USERS_PATH),
            clients: RestResource::new(http.clone(), CLIENTS_PATH),
            products: RestResource::new(http.clone(), PRODUCTS_PATH),
            incidents: RestResource::new(http.clone(), INCIDENTS_PATH),
            interventions: RestResource::new(http.clone(), INTERVENTIONS_PATH),
            reports: RestResource::new(http, REPORTS_PATH),
        }
    }
}

#[async_trait]
impl IncidentGateway for IncidentResource {
    async fn resolve(&self, id: &EntityId) -> PortResult<Option<Incident>> {
        self.transition(id, "resolve").await
    }
}

#[async_trait]
impl InterventionGateway for InterventionResource {
    async fn start(&self, id: &EntityId) -> PortResult<Option<Intervention>> {
        self.transition(id, "start").await
    }

    async fn finish(&self, id: &EntityId) -> PortResult<Option<Intervention>> {
        self.transition(id, "finish").await
    }
}

#[async_trait]
impl UserGateway for UserResource {
    async fn toggle_status(&self, id: &EntityId) -> PortResult<Option<User>> {
        self.transition(id, "statut").await
    }
}
