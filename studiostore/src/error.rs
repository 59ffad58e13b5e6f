use serde::Serialize;
use serde_json::Value;
use std::fmt;
use studiocore::{
    ac::{
        permit::Operation,
        Employee,
    },
    error::BackendError,
    record::RecordId,
};
use thiserror::Error;

/// The message shown to users for any failure that is not one of the
/// access-control outcomes.
pub const GENERIC_MESSAGE: &str = "could not complete action";

/// A structured record of an operation refused by the access rules.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Denial {
    /// `savedRecords/<id>` for an existing record, `savedRecords` for
    /// a creation.
    pub path: String,
    pub operation: Operation,
    /// The attempted write, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    pub employee: Employee,
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("no active session")]
    Unauthenticated,
    #[error("{0}")]
    PermissionDenied(Denial),
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "permission denied: {} on {} for employee {}",
            self.operation,
            self.path,
            self.employee.id,
        )
    }
}

impl Error {
    /// The message fit for presenting to the user; never exposes
    /// backend details.
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated => "please sign in to continue".to_string(),
            Error::PermissionDenied(denial) => format!(
                "you do not have permission to {} this record",
                denial.operation,
            ),
            Error::NotFound(_) => "the record could not be found".to_string(),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }
}
