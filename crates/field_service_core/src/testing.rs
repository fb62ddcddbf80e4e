//! In-memory gateways standing in for the REST backend in unit tests.

use crate::domain::{
    Client, Entity, EntityId, Incident, Intervention, Report, User,
};
use crate::drafts::{
    ClientDraft, ClientPatch, IncidentDraft, IncidentPatch, InterventionDraft, InterventionPatch,
    ReportDraft, ReportPatch, UserDraft, UserPatch,
};
use crate::ports::{
    EntityGateway, IncidentGateway, InterventionGateway, PortError, PortResult, UserGateway,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// A fake server for one resource. Rows live in memory, every call is
/// recorded, and failures can be queued per operation.
pub struct FakeGateway<E, D, P> {
    rows: Mutex<Vec<E>>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, PortError>>,
    next_id: AtomicU64,
    materialize: fn(EntityId, &D) -> E,
    apply: fn(&mut E, &P),
    /// Transition endpoints answer with a body when set, 204-style otherwise.
    echo_transitions: bool,
}

impl<E: Entity, D, P> FakeGateway<E, D, P> {
    pub fn new(materialize: fn(EntityId, &D) -> E, apply: fn(&mut E, &P)) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            materialize,
            apply,
            echo_transitions: false,
        }
    }

    pub fn echoing_transitions(mut self) -> Self {
        self.echo_transitions = true;
        self
    }

    pub fn seed(&self, row: E) {
        self.rows.lock().unwrap().push(row);
    }

    pub fn rows(&self) -> Vec<E> {
        self.rows.lock().unwrap().clone()
    }

    pub fn row(&self, id: &EntityId) -> Option<E> {
        self.rows().into_iter().find(|r| r.id() == id)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.split(' ').next() == Some(op)).count()
    }

    /// The next call to `op` fails with `err`.
    pub fn fail_next(&self, op: &'static str, err: PortError) {
        self.failures.lock().unwrap().insert(op, err);
    }

    fn record(&self, op: &'static str, id: Option<&EntityId>) -> PortResult<()> {
        let entry = match id {
            Some(id) => format!("{} {}", op, id),
            None => op.to_string(),
        };
        self.calls.lock().unwrap().push(entry);
        match self.failures.lock().unwrap().remove(op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found(id: &EntityId) -> PortError {
        PortError::Server {
            status: 404,
            message: format!("{} {} not found", E::KIND, id),
        }
    }

    /// Runs a transition against the stored row.
    fn transition(
        &self,
        op: &'static str,
        id: &EntityId,
        change: impl FnOnce(&mut E),
    ) -> PortResult<Option<E>> {
        self.record(op, Some(id))?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        change(row);
        Ok(self.echo_transitions.then(|| row.clone()))
    }
}

#[async_trait]
impl<E, D, P> EntityGateway for FakeGateway<E, D, P>
where
    E: Entity,
    D: crate::validate::Validate + Serialize + Send + Sync + 'static,
    P: crate::validate::Validate + Serialize + Send + Sync + 'static,
{
    type Entity = E;
    type Draft = D;
    type Patch = P;

    async fn list(&self) -> PortResult<Vec<E>> {
        self.record("list", None)?;
        Ok(self.rows())
    }

    async fn create(&self, draft: &D) -> PortResult<E> {
        self.record("create", None)?;
        let id = EntityId::from(self.next_id.fetch_add(1, Ordering::SeqCst).to_string());
        let row = (self.materialize)(id, draft);
        self.seed(row.clone());
        Ok(row)
    }

    async fn update(&self, id: &EntityId, patch: &P) -> PortResult<E> {
        self.record("update", Some(id))?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        (self.apply)(row, patch);
        Ok(row.clone())
    }

    async fn delete(&self, id: &EntityId) -> PortResult<()> {
        self.record("delete", Some(id))?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        if rows.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}

//=========================================================================================
// Per-resource fakes
//=========================================================================================

pub type ClientGateway = FakeGateway<Client, ClientDraft, ClientPatch>;
pub type FakeIncidents = FakeGateway<Incident, IncidentDraft, IncidentPatch>;
pub type FakeInterventions = FakeGateway<Intervention, InterventionDraft, InterventionPatch>;
pub type FakeReports = FakeGateway<Report, ReportDraft, ReportPatch>;
pub type FakeUsers = FakeGateway<User, UserDraft, UserPatch>;

pub fn client_gateway() -> ClientGateway {
    FakeGateway::new(
        |id, d: &ClientDraft| Client {
            id,
            // The server trims names, so the stored copy can differ from the draft.
            nom: d.nom.trim().to_string(),
            email: d.email.clone(),
            telephone: d.telephone.clone(),
            adresse: d.adresse.clone(),
        },
        |row: &mut Client, p: &ClientPatch| {
            if let Some(v) = &p.nom {
                row.nom = v.clone();
            }
            if let Some(v) = &p.email {
                row.email = v.clone();
            }
            if let Some(v) = &p.telephone {
                row.telephone = v.clone();
            }
            if let Some(v) = &p.adresse {
                row.adresse = v.clone();
            }
        },
    )
}

pub fn incident_gateway() -> FakeIncidents {
    FakeGateway::new(
        |id, d: &IncidentDraft| {
            let mut value = serde_json::to_value(d).unwrap();
            value["id"] = serde_json::Value::String(id.to_string());
            serde_json::from_value(value).unwrap()
        },
        |row: &mut Incident, p: &IncidentPatch| {
            if let Some(v) = &p.description {
                row.description = v.clone();
            }
            if let Some(v) = p.priorite {
                row.priorite = v;
            }
        },
    )
}

pub fn intervention_gateway() -> FakeInterventions {
    FakeGateway::new(
        |id, d: &InterventionDraft| Intervention {
            id,
            client_id: d.client_id.clone(),
            produit_id: d.produit_id.clone(),
            description: d.description.clone(),
            datetime: d.datetime,
            technicien: d.technicien.clone(),
            incident_id: d.incident_id.clone(),
            images: d.images.clone(),
            priorite: d.priorite,
            statut: crate::domain::InterventionStatus::Pending,
            started_at: None,
            ended_at: None,
        },
        |row: &mut Intervention, p: &InterventionPatch| {
            if let Some(v) = &p.technicien {
                row.technicien = v.clone();
            }
            if let Some(v) = &p.description {
                row.description = v.clone();
            }
        },
    )
}

pub fn report_gateway() -> FakeReports {
    FakeGateway::new(
        |id, d: &ReportDraft| Report {
            id,
            intervention_id: d.intervention_id.clone(),
            client: d.client.clone(),
            intervenant: d.intervenant.clone(),
            kind: d.kind.clone(),
            description: d.description.clone(),
            observation: d.observation.clone(),
            travaux: d.travaux.clone(),
            date: d.date,
        },
        |row: &mut Report, p: &ReportPatch| {
            if let Some(v) = &p.observation {
                row.observation = v.clone();
            }
        },
    )
}

pub fn user_gateway() -> FakeUsers {
    FakeGateway::new(
        |id, d: &UserDraft| User {
            id,
            nom: d.nom.clone(),
            prenom: d.prenom.clone(),
            email: d.email.to_lowercase(),
            role: d.role.clone(),
            statut: d.statut,
        },
        |row: &mut User, p: &UserPatch| {
            if let Some(v) = &p.role {
                row.role = v.clone();
            }
        },
    )
}

#[async_trait]
impl IncidentGateway for FakeIncidents {
    async fn resolve(&self, id: &EntityId) -> PortResult<Option<Incident>> {
        self.transition("resolve", id, |row| row.mark_resolved(Utc::now()))
    }
}

#[async_trait]
impl InterventionGateway for FakeInterventions {
    async fn start(&self, id: &EntityId) -> PortResult<Option<Intervention>> {
        self.transition("start", id, |row| row.mark_started(Utc::now()))
    }

    async fn finish(&self, id: &EntityId) -> PortResult<Option<Intervention>> {
        self.transition("finish", id, |row| row.mark_finished(Utc::now()))
    }
}

#[async_trait]
impl UserGateway for FakeUsers {
    async fn toggle_status(&self, id: &EntityId) -> PortResult<Option<User>> {
        self.transition("toggle_status", id, |row| row.statut = row.statut.toggled())
    }
}
