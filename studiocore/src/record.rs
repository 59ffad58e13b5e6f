use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

mod data;
mod id;
mod impls;
pub mod task;
pub mod traits;

pub use data::{
    split_text,
    value_to_string,
    Item,
    RecordData,
    Section,
};
pub use id::{
    RecordId,
    RecordIdFactory,
};

/// The namespace saved records live under; combined with the record id
/// to form the path reported on access-control failures.
pub const COLLECTION: &str = "savedRecords";

/// A persisted document representing one saved form submission.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecord {
    pub id: RecordId,
    pub employee_id: i64,
    pub employee_name: String,
    pub file_name: String,
    pub project_name: String,
    pub created_at: i64,
    #[serde(default)]
    pub data: RecordData,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SavedRecords(Vec<SavedRecord>);

/// The payload a form page supplies when saving a new record.  Identity,
/// id and timestamp are absent as they are asserted by the store.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default)]
    pub data: RecordData,
}

/// A partial update; only the supplied top-level fields are replaced.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RecordData>,
}

impl Deref for SavedRecords {
    type Target = Vec<SavedRecord>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SavedRecords {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
