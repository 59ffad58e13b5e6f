use rand::{
    distributions::Alphanumeric,
    Rng,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use super::COLLECTION;

const RECORD_ID_LEN: usize = 20;

/// An opaque record identifier assigned by the store.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn path(&self) -> String {
        format!("{COLLECTION}/{}", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// Produces new record identifiers, 20 alphanumeric characters long.
#[derive(Default)]
pub struct RecordIdFactory {
    source: Option<Box<dyn Fn() -> String + Send + Sync + 'static>>,
}

impl RecordIdFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the random source, e.g. for deterministic identifiers.
    pub fn source(mut self, val: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(val));
        self
    }

    pub fn create(&self) -> RecordId {
        RecordId(
            self.source
                .as_ref()
                .map(|f| f())
                .unwrap_or_else(|| rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(RECORD_ID_LEN)
                    .map(char::from)
                    .collect()
                )
        )
    }
}
