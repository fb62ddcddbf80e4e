//! crates/field_service_core/src/drafts.rs
//!
//! Create payloads (drafts) and partial update payloads (patches) for each
//! resource. Patch fields left as `None` are omitted from the JSON body.

use crate::domain::{
    EntityId, ImageRef, IncidentStatus, Intervention, InterventionStatus, Priority, UserStatus,
};
use crate::ports::{PortError, PortResult};
use crate::validate::{email, non_empty_patch, not_blank, required, Validate};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

//=========================================================================================
// Incidents
//=========================================================================================

/// A new incident. Always declared unresolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentDraft {
    pub client: String,
    pub produit: String,
    pub description: String,
    pub priorite: Priority,
    statut: IncidentStatus,
    pub images: Vec<ImageRef>,
    pub date_survenu: NaiveDate,
}

impl IncidentDraft {
    pub fn new(
        client: impl Into<String>,
        produit: impl Into<String>,
        description: impl Into<String>,
        priorite: Priority,
        date_survenu: NaiveDate,
    ) -> Self {
        Self {
            client: client.into(),
            produit: produit.into(),
            description: description.into(),
            priorite,
            statut: IncidentStatus::Unresolved,
            images: Vec::new(),
            date_survenu,
        }
    }

    pub fn with_images(mut self, images: Vec<ImageRef>) -> Self {
        self.images = images;
        self
    }
}

impl Validate for IncidentDraft {
    fn validate(&self) -> PortResult<()> {
        required("client", &self.client)?;
        required("produit", &self.produit)?;
        required("description", &self.description)
    }
}

/// Status changes go through the resolve transition, never through a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IncidentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priorite: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_survenu: Option<NaiveDate>,
}

impl Validate for IncidentPatch {
    fn validate(&self) -> PortResult<()> {
        non_empty_patch("incident", *self != Self::default())?;
        not_blank("client", self.client.as_ref())?;
        not_blank("produit", self.produit.as_ref())?;
        not_blank("description", self.description.as_ref())
    }
}

//=========================================================================================
// Interventions
//=========================================================================================

/// A new intervention. Always created pending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionDraft {
    pub client_id: EntityId,
    pub produit_id: EntityId,
    pub description: String,
    pub datetime: NaiveDateTime,
    pub technicien: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<EntityId>,
    pub images: Vec<ImageRef>,
    pub priorite: Priority,
    statut: InterventionStatus,
}

impl InterventionDraft {
    pub fn new(
        client_id: EntityId,
        produit_id: EntityId,
        description: impl Into<String>,
        datetime: NaiveDateTime,
        technicien: impl Into<String>,
        priorite: Priority,
    ) -> Self {
        Self {
            client_id,
            produit_id,
            description: description.into(),
            datetime,
            technicien: technicien.into(),
            incident_id: None,
            images: Vec::new(),
            priorite,
            statut: InterventionStatus::Pending,
        }
    }

    /// Links the intervention to the incident it is meant to fix.
    pub fn for_incident(mut self, incident_id: EntityId) -> Self {
        self.incident_id = Some(incident_id);
        self
    }
}

impl Validate for InterventionDraft {
    fn validate(&self) -> PortResult<()> {
        required("clientId", self.client_id.as_str())?;
        required("produitId", self.produit_id.as_str())?;
        required("description", &self.description)?;
        required("technicien", &self.technicien)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterventionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technicien: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priorite: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageRef>>,
}

impl Validate for InterventionPatch {
    fn validate(&self) -> PortResult<()> {
        non_empty_patch("intervention", *self != Self::default())?;
        not_blank("description", self.description.as_ref())?;
        not_blank("technicien", self.technicien.as_ref())
    }
}

//=========================================================================================
// Reports
//=========================================================================================

/// The free-text part of a report, filled in by the technician.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDetails {
    pub client: String,
    pub kind: String,
    pub description: String,
    pub observation: String,
    pub travaux: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDraft {
    #[serde(rename = "interventionId")]
    pub intervention_id: EntityId,
    pub client: String,
    pub intervenant: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub observation: String,
    pub travaux: String,
    pub date: NaiveDate,
}

impl ReportDraft {
    /// Builds a report for a finished intervention. The technician who ran
    /// the intervention is recorded as the `intervenant`.
    pub fn for_intervention(
        intervention: &Intervention,
        details: ReportDetails,
    ) -> PortResult<Self> {
        if intervention.statut != InterventionStatus::Done {
            return Err(PortError::Validation(format!(
                "intervention {} is not finished",
                intervention.id
            )));
        }
        Ok(Self {
            intervention_id: intervention.id.clone(),
            client: details.client,
            intervenant: intervention.technicien.clone(),
            kind: details.kind,
            description: details.description,
            observation: details.observation,
            travaux: details.travaux,
            date: details.date,
        })
    }
}

impl Validate for ReportDraft {
    fn validate(&self) -> PortResult<()> {
        required("interventionId", self.intervention_id.as_str())?;
        required("client", &self.client)?;
        required("intervenant", &self.intervenant)?;
        required("type", &self.kind)?;
        required("description", &self.description)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travaux: Option<String>,
}

impl Validate for ReportPatch {
    fn validate(&self) -> PortResult<()> {
        non_empty_patch("report", *self != Self::default())?;
        not_blank("description", self.description.as_ref())
    }
}

//=========================================================================================
// Users
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDraft {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub statut: UserStatus,
}

impl UserDraft {
    pub fn new(
        nom: impl Into<String>,
        prenom: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            nom: nom.into(),
            prenom: prenom.into(),
            email: email.into(),
            role: role.into(),
            password: None,
            statut: UserStatus::Actif,
        }
    }
}

impl Validate for UserDraft {
    fn validate(&self) -> PortResult<()> {
        required("nom", &self.nom)?;
        email("email", &self.email)?;
        required("role", &self.role)?;
        if let Some(password) = &self.password {
            if password.chars().count() < 8 {
                return Err(PortError::Validation(
                    "password must be at least 8 characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Validate for UserPatch {
    fn validate(&self) -> PortResult<()> {
        non_empty_patch("user", *self != Self::default())?;
        not_blank("nom", self.nom.as_ref())?;
        not_blank("role", self.role.as_ref())?;
        match &self.email {
            Some(e) => email("email", e),
            None => Ok(()),
        }
    }
}

//=========================================================================================
// Clients and products
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientDraft {
    pub nom: String,
    pub email: String,
    pub telephone: String,
    pub adresse: String,
}

impl Validate for ClientDraft {
    fn validate(&self) -> PortResult<()> {
        required("nom", &self.nom)?;
        if !self.email.is_empty() {
            email("email", &self.email)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
}

impl Validate for ClientPatch {
    fn validate(&self) -> PortResult<()> {
        non_empty_patch("client", *self != Self::default())?;
        not_blank("nom", self.nom.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductDraft {
    pub nom: String,
    pub reference: String,
    pub description: String,
}

impl Validate for ProductDraft {
    fn validate(&self) -> PortResult<()> {
        required("nom", &self.nom)?;
        required("reference", &self.reference)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for ProductPatch {
    fn validate(&self) -> PortResult<()> {
        non_empty_patch("product", *self != Self::default())?;
        not_blank("nom", self.nom.as_ref())?;
        not_blank("reference", self.reference.as_ref())
    }
}
