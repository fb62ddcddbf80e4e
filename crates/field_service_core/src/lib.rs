pub mod domain;
pub mod drafts;
pub mod incidents;
pub mod interventions;
pub mod notifications;
pub mod ports;
pub mod query;
pub mod reports;
pub mod session;
pub mod store;
pub mod users;
pub mod validate;

#[cfg(test)]
mod testing;

pub use domain::{
    Client, Entity, EntityId, Incident, IncidentStatus, Intervention, InterventionStatus,
    Notification, PersistedSession, Priority, Product, Report, User, UserStatus,
};
pub use incidents::IncidentStore;
pub use interventions::InterventionStore;
pub use notifications::NotificationCenter;
pub use ports::{
    EntityGateway, IncidentGateway, IncidentResolver, InterventionGateway, Notifier, PortError,
    PortResult, SessionStorage, TokenProvider, UserGateway,
};
pub use query::{ListQuery, Page, Searchable};
pub use reports::ReportStore;
pub use session::SessionManager;
pub use store::{DeletePolicy, EntityStore};
pub use users::UserStore;
