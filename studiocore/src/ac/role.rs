use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};

#[non_exhaustive]
#[derive(Debug, Default, EnumSetType, Hash, Deserialize, Serialize)]
pub enum Role {
    // catch-all for whenever infallable conversion is needed
    #[default]
    Undefined,
    Admin,
    Manager,
    Employee,
    Viewer,
}

pub type Roles = EnumSet<Role>;

mod impls;
