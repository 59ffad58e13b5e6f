//! The operations a role may be permitted to perform on saved records,
//! and the scope over which that permit applies.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    str::FromStr,
};
use crate::error::ValueError;
use super::role::Role;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

/// `Own` restricts the permit to records authored by the agent; `All`
/// extends it to every record in the collection.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Own,
    All,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct RolePermit {
    pub role: Role,
    pub operation: Operation,
    pub scope: Scope,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        })
    }
}

impl FromStr for Operation {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Operation::Create),
            "read" => Ok(Operation::Read),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

impl FromStr for Scope {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "own" => Ok(Scope::Own),
            "all" => Ok(Scope::All),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

impl FromStr for RolePermit {
    type Err = ValueError;

    /// Parses a permit in the form of `role, operation, scope`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split(',').map(str::trim);
        let (Some(role), Some(operation), Some(scope), None) = (
            tokens.next(),
            tokens.next(),
            tokens.next(),
            tokens.next(),
        ) else {
            return Err(ValueError::Unsupported(format!("malformed permit {s:?}")));
        };
        Ok(Self {
            role: role.parse()?,
            operation: operation.parse()?,
            scope: scope.parse()?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_permit() -> anyhow::Result<()> {
        assert_eq!(
            "Manager, update, all".parse::<RolePermit>()?,
            RolePermit {
                role: Role::Manager,
                operation: Operation::Update,
                scope: Scope::All,
            },
        );
        assert!("Manager, update".parse::<RolePermit>().is_err());
        assert!("Manager, update, all, extra".parse::<RolePermit>().is_err());
        assert!("Manager, fly, all".parse::<RolePermit>().is_err());
        Ok(())
    }
}
