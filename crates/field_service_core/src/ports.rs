//! crates/field_service_core/src/ports.rs
//!
//! Defines the service contracts (traits) the stores depend on.
//! These traits form the boundary of the hexagonal architecture, so the stores
//! never see HTTP, files or any other concrete transport.

use crate::domain::{
    Entity, EntityId, Incident, Intervention, Notification, PersistedSession, User,
};
use crate::validate::Validate;
use async_trait::async_trait;
use serde::Serialize;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error type for all port operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The request never reached the server, or no response came back.
    #[error("Network error: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    /// Rejected on the client before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Remote Gateways
//=========================================================================================

/// CRUD access to one remote resource.
#[async_trait]
pub trait EntityGateway: Send + Sync + 'static {
    type Entity: Entity;
    type Draft: Validate + Serialize + Send + Sync;
    type Patch: Validate + Serialize + Send + Sync;

    async fn list(&self) -> PortResult<Vec<Self::Entity>>;

    async fn create(&self, draft: &Self::Draft) -> PortResult<Self::Entity>;

    async fn update(&self, id: &EntityId, patch: &Self::Patch) -> PortResult<Self::Entity>;

    async fn delete(&self, id: &EntityId) -> PortResult<()>;
}

// Transition endpoints answer `None` when the server sends no body.

#[async_trait]
pub trait IncidentGateway: EntityGateway<Entity = Incident> {
    async fn resolve(&self, id: &EntityId) -> PortResult<Option<Incident>>;
}

#[async_trait]
pub trait InterventionGateway: EntityGateway<Entity = Intervention> {
    async fn start(&self, id: &EntityId) -> PortResult<Option<Intervention>>;

    async fn finish(&self, id: &EntityId) -> PortResult<Option<Intervention>>;
}

#[async_trait]
pub trait UserGateway: EntityGateway<Entity = User> {
    async fn toggle_status(&self, id: &EntityId) -> PortResult<Option<User>>;
}

//=========================================================================================
// Capabilities injected across stores
//=========================================================================================

/// The one operation the intervention store may invoke on incidents.
#[async_trait]
pub trait IncidentResolver: Send + Sync {
    async fn resolve_incident(&self, id: &EntityId) -> PortResult<()>;
}

/// Receives user-facing messages produced as side effects of mutations.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: String) -> Notification;
}

/// Supplies the bearer token attached to each outgoing request.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

//=========================================================================================
// Persisted client state
//=========================================================================================

#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Returns `None` when nothing has been persisted yet.
    async fn load(&self) -> PortResult<Option<PersistedSession>>;

    async fn save(&self, session: &PersistedSession) -> PortResult<()>;

    async fn clear(&self) -> PortResult<()>;
}
