use serde::{Deserialize, Serialize};
use super::employee::Employee;

/// An authenticated session as supplied by the identity provider.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Session {
    pub token: SessionToken,
    pub employee: Employee,
    pub origin: String,
    pub created_ts: i64,
    pub last_active_ts: i64,
}

mod factory;
mod token;

pub use factory::SessionFactory;
pub use token::SessionToken;
