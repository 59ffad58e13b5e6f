//! Role based access rules over the saved records collection.
//!
//! Rules are written one permit per line as `role, operation, scope`;
//! a role absent from the rules for an operation may not perform it.

use std::collections::HashMap;
use studiocore::{
    ac::{
        permit::{
            Operation,
            RolePermit,
            Scope,
        },
        Employee,
        Role,
    },
    error::ValueError,
    record::SavedRecord,
};

pub const DEFAULT_POLICY: &str = "\
# role, operation, scope
Admin, create, all
Admin, read, all
Admin, update, all
Admin, delete, all

Manager, create, all
Manager, read, all
Manager, update, all
Manager, delete, own

Employee, create, own
Employee, read, own
Employee, update, own
Employee, delete, own

Viewer, read, all
";

#[derive(Clone, Debug, PartialEq)]
pub struct Policy(HashMap<(Role, Operation), Scope>);

impl Policy {
    /// Parses rules text, skipping blank lines and `#` comments.
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        s.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::parse::<RolePermit>)
            .collect()
    }

    /// The widest scope the role holds for the operation.
    pub fn scope(&self, role: Role, operation: Operation) -> Option<Scope> {
        self.0.get(&(role, operation)).copied()
    }

    /// Whether the employee may perform the operation on a record
    /// authored by `author_id`.
    pub fn permits(
        &self,
        employee: &Employee,
        operation: Operation,
        author_id: i64,
    ) -> bool {
        match self.scope(employee.role, operation) {
            Some(Scope::All) => true,
            Some(Scope::Own) => employee.id == author_id,
            None => false,
        }
    }

    pub fn can_read(&self, employee: &Employee, record: &SavedRecord) -> bool {
        self.permits(employee, Operation::Read, record.employee_id)
    }
}

impl Default for Policy {
    fn default() -> Self {
        DEFAULT_POLICY.lines()
            .map(str::trim)
            .filter_map(|line| line.parse::<RolePermit>().ok())
            .collect()
    }
}

impl FromIterator<RolePermit> for Policy {
    fn from_iter<I: IntoIterator<Item=RolePermit>>(iter: I) -> Self {
        Self(iter.into_iter()
            .fold(HashMap::new(), |mut m, RolePermit { role, operation, scope }| {
                m.entry((role, operation))
                    .and_modify(|s: &mut Scope| *s = (*s).max(scope))
                    .or_insert(scope);
                m
            })
        )
    }
}
