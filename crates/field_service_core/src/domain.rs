//! crates/field_service_core/src/domain.rs
//!
//! Defines the core data structures for the field-service back office.
//! Field names follow the backend's JSON representation so the same types
//! travel through the gateways, the stores and the persisted session.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

//=========================================================================================
// Identity
//=========================================================================================

/// A server-assigned identifier.
///
/// The backend hands out either numeric or string ids depending on the
/// resource, so both are accepted on the way in and always carried as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct EntityId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for EntityId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        }
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything held by an entity store.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human-readable resource name, used in logs and error messages.
    const KIND: &'static str;

    fn id(&self) -> &EntityId;
}

/// A reference to an uploaded image (URL or storage path).
pub type ImageRef = String;

//=========================================================================================
// Shared enums
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentStatus {
    #[serde(rename = "non résolu")]
    Unresolved,
    #[serde(rename = "résolu")]
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterventionStatus {
    #[serde(rename = "en attente")]
    Pending,
    #[serde(rename = "en cours")]
    InProgress,
    #[serde(rename = "terminée")]
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Actif,
    Inactif,
}

impl UserStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Actif => Self::Inactif,
            Self::Inactif => Self::Actif,
        }
    }
}

//=========================================================================================
// Incidents
//=========================================================================================

/// A problem declared by a client on one of its products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: EntityId,
    pub client: String,
    pub produit: String,
    pub description: String,
    pub priorite: Priority,
    pub statut: IncidentStatus,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(deserialize_with = "wire_time::date")]
    pub date_survenu: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_resolu: Option<DateTime<Utc>>,
}

impl Incident {
    /// Moves the incident to `Resolved`. Resolving twice keeps the first date.
    pub fn mark_resolved(&mut self, at: DateTime<Utc>) {
        self.statut = IncidentStatus::Resolved;
        self.date_resolu.get_or_insert(at);
    }

    /// `date_resolu` is present exactly when the incident is resolved.
    pub fn is_consistent(&self) -> bool {
        (self.statut == IncidentStatus::Resolved) == self.date_resolu.is_some()
    }
}

impl Entity for Incident {
    const KIND: &'static str = "incident";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

//=========================================================================================
// Interventions
//=========================================================================================

/// A technician visit, optionally opened to handle an incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    pub id: EntityId,
    pub client_id: EntityId,
    pub produit_id: EntityId,
    pub description: String,
    #[serde(deserialize_with = "wire_time::datetime")]
    pub datetime: NaiveDateTime,
    pub technicien: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<EntityId>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    pub priorite: Priority,
    pub statut: InterventionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Intervention {
    pub fn can_start(&self) -> bool {
        self.statut == InterventionStatus::Pending
    }

    pub fn can_finish(&self) -> bool {
        self.statut != InterventionStatus::Done
    }

    pub fn mark_started(&mut self, at: DateTime<Utc>) {
        self.statut = InterventionStatus::InProgress;
        self.started_at = Some(at);
    }

    /// Finishing straight from `Pending` also stamps `started_at`.
    pub fn mark_finished(&mut self, at: DateTime<Utc>) {
        self.statut = InterventionStatus::Done;
        self.started_at.get_or_insert(at);
        self.ended_at = Some(at);
    }

    pub fn is_consistent(&self) -> bool {
        let started = matches!(
            self.statut,
            InterventionStatus::InProgress | InterventionStatus::Done
        );
        let ended = self.statut == InterventionStatus::Done;
        started == self.started_at.is_some() && ended == self.ended_at.is_some()
    }
}

impl Entity for Intervention {
    const KIND: &'static str = "intervention";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

//=========================================================================================
// Reports
//=========================================================================================

/// The terminal record written once an intervention is finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: EntityId,
    #[serde(rename = "interventionId")]
    pub intervention_id: EntityId,
    pub client: String,
    pub intervenant: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub observation: String,
    #[serde(default)]
    pub travaux: String,
    #[serde(deserialize_with = "wire_time::date")]
    pub date: NaiveDate,
}

impl Entity for Report {
    const KIND: &'static str = "report";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

//=========================================================================================
// Users, clients and products
//=========================================================================================

/// A back-office account (administrator or technician).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    pub statut: UserStatus,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom).trim().to_string()
    }
}

impl Entity for User {
    const KIND: &'static str = "user";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: EntityId,
    pub nom: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub adresse: String,
}

impl Entity for Client {
    const KIND: &'static str = "client";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub nom: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub description: String,
}

impl Entity for Product {
    const KIND: &'static str = "product";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

//=========================================================================================
// Client-only state
//=========================================================================================

/// An in-app message. Never sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub read: bool,
}

/// What survives a restart: the bearer token and the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user: Option<User>,
}

//=========================================================================================
// Lenient wire dates
//=========================================================================================

/// Dates as backends and browser forms actually send them: a plain date, a
/// local date-time with or without seconds, or RFC 3339 with an offset.
mod wire_time {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    const LOCAL_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    /// Offsets are dropped, keeping the wall-clock time as sent.
    fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        LOCAL_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .or_else(|| parse_plain_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)))
    }

    fn parse_date(raw: &str) -> Option<NaiveDate> {
        parse_plain_date(raw.trim()).or_else(|| parse_datetime(raw).map(|dt| dt.date()))
    }

    fn parse_plain_date(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    pub(super) fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw)))
    }

    pub(super) fn datetime<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_datetime(&raw).ok_or_else(|| D::Error::custom(format!("invalid date-time '{}'", raw)))
    }
}
