use async_trait::async_trait;
use crate::{
    ac::Employee,
    error::BackendError,
};
use super::{
    NewRecord,
    RecordId,
    RecordPatch,
    SavedRecord,
    SavedRecords,
};

#[async_trait]
pub trait RecordBackend {
    /// Inserts a new `SavedRecord` under the given `id`, authored by the
    /// `employee`.  The backend assigns `createdAt`, which must be
    /// strictly greater than that of every record already stored.
    ///
    /// Returns the record as stored.
    async fn insert_record(
        &self,
        id: &RecordId,
        employee: &Employee,
        record: &NewRecord,
    ) -> Result<SavedRecord, BackendError>;

    /// Replaces only the fields supplied by the `patch`.
    ///
    /// Returns false if no record with the `id` exists.
    async fn update_record(
        &self,
        id: &RecordId,
        patch: &RecordPatch,
    ) -> Result<bool, BackendError>;

    /// Returns false if no record with the `id` existed.
    async fn delete_record(
        &self,
        id: &RecordId,
    ) -> Result<bool, BackendError>;

    async fn get_record(
        &self,
        id: &RecordId,
    ) -> Result<Option<SavedRecord>, BackendError>;

    /// Returns all records, newest first.
    async fn list_records(
        &self,
    ) -> Result<SavedRecords, BackendError>;

    /// Returns the records authored by the employee, newest first.
    async fn list_records_by_employee(
        &self,
        employee_id: i64,
    ) -> Result<SavedRecords, BackendError>;
}
