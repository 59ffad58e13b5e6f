use serde::{Deserialize, Serialize};
use super::role::Role;

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub role: Role,
    pub created_ts: i64,
}
