use serde::Serialize;
use serde_json::Value;
use studiocore::{
    ac::{
        permit::{
            Operation,
            Scope,
        },
        Agent,
        Employee,
    },
    record::{
        task::{
            self,
            TaskRecord,
            TaskStatus,
            TASK_FILE_NAME,
        },
        NewRecord,
        RecordId,
        RecordPatch,
        SavedRecord,
        COLLECTION,
    },
};

use crate::{
    audit::LogAuditSink,
    error::{
        Denial,
        Error,
    },
};

use super::*;

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_platform(mut self, val: impl RecordPlatform + 'static) -> Self {
        self.record_platform = Some(Box::new(val));
        self
    }

    pub fn audit_sink(mut self, val: impl AuditSink + 'static) -> Self {
        self.audit_sink = Some(Box::new(val));
        self
    }

    pub fn id_factory(mut self, val: RecordIdFactory) -> Self {
        self.id_factory = val;
        self
    }

    pub fn policy(mut self, val: Policy) -> Self {
        self.policy = val;
        self
    }

    pub fn build(self) -> Platform {
        let (snapshot, _) = watch::channel(SavedRecords::default());
        Platform(Arc::new(PlatformInner {
            record_platform: self.record_platform
                .expect("missing required argument record_platform"),
            audit_sink: self.audit_sink
                .unwrap_or_else(|| Box::new(LogAuditSink)),
            id_factory: self.id_factory,
            policy: self.policy,
            cache: RecordCache::default(),
            snapshot,
        }))
    }
}

fn payload(value: &impl Serialize) -> Option<Value> {
    serde_json::to_value(value).ok()
}

fn session_employee(agent: &Agent) -> Result<&Employee, Error> {
    agent.employee().ok_or(Error::Unauthenticated)
}

impl Platform {
    pub fn record_platform(&self) -> &dyn RecordPlatform {
        self.0.record_platform.as_ref()
    }

    pub fn policy(&self) -> &Policy {
        &self.0.policy
    }

    fn deny(
        &self,
        path: String,
        operation: Operation,
        payload: Option<Value>,
        employee: &Employee,
    ) -> Error {
        let denial = Denial {
            path,
            operation,
            payload,
            employee: employee.clone(),
        };
        log::info!("{denial}");
        self.0.audit_sink.report(&denial);
        Error::PermissionDenied(denial)
    }

    // The backend is authoritative; staged records cover a lagging one.
    async fn fetch(
        &self,
        id: &RecordId,
    ) -> Result<Option<SavedRecord>, Error> {
        Ok(match self.0.record_platform.get_record(id).await? {
            Some(record) => Some(record),
            None => self.0.cache.get(id),
        })
    }

    async fn publish(&self) {
        if let Err(e) = self.refresh().await {
            log::warn!("could not publish record snapshot: {e}");
        }
    }
}

// Mutations
//
// Once authorized, each write runs on its own task so that it completes
// against the backend even if the caller stops waiting for it.

impl Platform {
    /// Saves a new record authored by the agent's employee.
    pub async fn add(
        &self,
        agent: &Agent,
        record: NewRecord,
    ) -> Result<RecordId, Error> {
        let employee = session_employee(agent)?;
        if self.0.policy.scope(employee.role, Operation::Create).is_none() {
            return Err(self.deny(
                COLLECTION.to_string(),
                Operation::Create,
                payload(&record),
                employee,
            ));
        }
        let platform = self.clone();
        let employee = employee.clone();
        tokio::spawn(async move {
            let id = platform.0.id_factory.create();
            let saved = platform.0.record_platform
                .insert_record(&id, &employee, &record)
                .await?;
            log::info!(
                "employee {} saved {:?} as {}",
                employee.id,
                saved.file_name,
                saved.path(),
            );
            platform.0.cache.stage(saved);
            platform.publish().await;
            Ok::<_, Error>(id)
        }).await?
    }

    /// Replaces the top-level fields supplied by the patch.
    pub async fn update(
        &self,
        agent: &Agent,
        id: &RecordId,
        patch: RecordPatch,
    ) -> Result<(), Error> {
        let employee = session_employee(agent)?;
        if self.0.policy.scope(employee.role, Operation::Update).is_none() {
            return Err(self.deny(id.path(), Operation::Update, payload(&patch), employee));
        }
        let existing = self.fetch(id).await?
            .ok_or_else(|| Error::NotFound(id.clone()))?;
        if !self.0.policy.permits(employee, Operation::Update, existing.employee_id) {
            return Err(self.deny(id.path(), Operation::Update, payload(&patch), employee));
        }
        let platform = self.clone();
        let id = id.clone();
        tokio::spawn(async move {
            let updated = platform.0.record_platform
                .update_record(&id, &patch)
                .await?;
            if !updated && platform.0.cache.get(&id).is_none() {
                return Err(Error::NotFound(id));
            }
            platform.0.cache.apply(&id, &patch);
            log::info!("updated {}", id.path());
            platform.publish().await;
            Ok::<_, Error>(())
        }).await?
    }

    /// Deletes the record; a record that is already absent is not an
    /// error.
    pub async fn delete(
        &self,
        agent: &Agent,
        id: &RecordId,
    ) -> Result<(), Error> {
        let employee = session_employee(agent)?;
        if self.0.policy.scope(employee.role, Operation::Delete).is_none() {
            return Err(self.deny(id.path(), Operation::Delete, None, employee));
        }
        let Some(existing) = self.fetch(id).await? else {
            log::debug!("{} is already absent", id.path());
            return Ok(());
        };
        if !self.0.policy.permits(employee, Operation::Delete, existing.employee_id) {
            return Err(self.deny(id.path(), Operation::Delete, None, employee));
        }
        let platform = self.clone();
        let id = id.clone();
        tokio::spawn(async move {
            platform.0.record_platform.delete_record(&id).await?;
            platform.0.cache.forget(&id);
            log::info!("deleted {}", id.path());
            platform.publish().await;
            Ok::<_, Error>(())
        }).await?
    }
}

// Reads

impl Platform {
    /// The records visible to the agent, newest first.
    pub async fn list(
        &self,
        agent: &Agent,
    ) -> Result<SavedRecords, Error> {
        let employee = session_employee(agent)?;
        let listing = match self.0.policy.scope(employee.role, Operation::Read) {
            Some(Scope::All) => self.0.record_platform.list_records().await?,
            Some(Scope::Own) => self.0.record_platform
                .list_records_by_employee(employee.id)
                .await?,
            None => return Ok(SavedRecords::default()),
        };
        Ok(self.0.cache.reconcile(
            listing,
            |record| self.0.policy.can_read(employee, record),
        ))
    }

    /// The record, if it exists and the agent may read it.
    pub async fn get(
        &self,
        agent: &Agent,
        id: &RecordId,
    ) -> Result<Option<SavedRecord>, Error> {
        let employee = session_employee(agent)?;
        Ok(self.fetch(id).await?
            .filter(|record| self.0.policy.can_read(employee, record)))
    }

    /// A live view of the full listing, republished after every
    /// successful mutation and on `refresh`.
    pub fn subscribe(&self) -> watch::Receiver<SavedRecords> {
        self.0.snapshot.subscribe()
    }

    /// Republishes the full listing from the backend.
    pub async fn refresh(&self) -> Result<(), Error> {
        let listing = self.0.record_platform.list_records().await?;
        let listing = self.0.cache.reconcile(listing, |_| true);
        log::trace!(
            "publishing {} records, {} staged",
            listing.len(),
            self.0.cache.len(),
        );
        self.0.snapshot.send_replace(listing);
        Ok(())
    }
}

// Task assignments

impl Platform {
    pub async fn tasks(
        &self,
        agent: &Agent,
    ) -> Result<Vec<TaskRecord>, Error> {
        Ok(self.list(agent).await?
            .iter()
            .filter_map(TaskRecord::from_record)
            .collect())
    }

    /// Rewrites the status line of a task assignment through the
    /// regular update path.
    pub async fn set_task_status(
        &self,
        agent: &Agent,
        id: &RecordId,
        status: TaskStatus,
    ) -> Result<TaskRecord, Error> {
        let mut record = self.get(agent, id).await?
            .filter(|record| record.file_name == TASK_FILE_NAME)
            .ok_or_else(|| Error::NotFound(id.clone()))?;
        let data = task::with_status(&record.data, status);
        self.update(agent, id, RecordPatch {
            data: Some(data.clone()),
            ..Default::default()
        }).await?;
        record.data = data;
        TaskRecord::from_record(&record)
            .ok_or_else(|| Error::NotFound(id.clone()))
    }
}
