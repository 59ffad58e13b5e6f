use crate::{
    ac::traits::{
        EmployeeBackend,
        SessionBackend,
    },
    record::traits::RecordBackend,
};

pub trait PlatformUrl {
    fn url(&self) -> &str;
}

/// Options for connecting to a backend.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorOption {
    pub url: String,
    pub auto_create_db: bool,
}

impl ConnectorOption {
    pub fn auto_create_db(mut self, val: bool) -> Self {
        self.auto_create_db = val;
        self
    }
}

impl From<&str> for ConnectorOption {
    fn from(url: &str) -> Self {
        Self {
            url: url.to_string(),
            auto_create_db: false,
        }
    }
}

impl From<&String> for ConnectorOption {
    fn from(url: &String) -> Self {
        url.as_str().into()
    }
}

/// RecordPlatform - the persistence collaborator of the record store.
///
/// Applicable to everything that implements `RecordBackend`.
pub trait RecordPlatform: RecordBackend
    + PlatformUrl

    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn RecordPlatform;
}

impl<P: RecordBackend
    + PlatformUrl

    + Send
    + Sync
> RecordPlatform for P {
    fn as_dyn(&self) -> &(dyn RecordPlatform) {
        self
    }
}

/// IdentityPlatform - resolves sessions to the employees behind them.
pub trait IdentityPlatform: EmployeeBackend
    + SessionBackend

    + PlatformUrl

    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn IdentityPlatform;
}

impl<P: EmployeeBackend
    + SessionBackend

    + PlatformUrl

    + Send
    + Sync
> IdentityPlatform for P {
    fn as_dyn(&self) -> &(dyn IdentityPlatform) {
        self
    }
}
