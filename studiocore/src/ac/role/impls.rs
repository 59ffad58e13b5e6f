use std::{
    fmt,
    str::FromStr,
};
use crate::error::ValueError;
use super::Role;

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Role {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" | "admin" => Ok(Role::Admin),
            "Manager" | "manager" => Ok(Role::Manager),
            "Employee" | "employee" => Ok(Role::Employee),
            "Viewer" | "viewer" => Ok(Role::Viewer),
            // Undefined,
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use super::Role;
    use crate::error::ValueError;

    #[test]
    fn smoke() -> anyhow::Result<()> {
        assert_eq!(Role::Manager.to_string(), "Manager");
        assert_eq!(Role::Manager, Role::from_str("Manager")?);
        assert_eq!(Role::Employee, Role::from_str("employee")?);

        assert!(Role::from_str("Undefined").is_err());
        assert!(matches!(
            Role::from_str("no_such_role")
                .expect_err("should be an error"),
            ValueError::Unsupported(s) if s == "no_such_role",
        ));

        // infallable conversion
        assert_eq!(
            Role::from_str("no_such_role")
                .unwrap_or_default(),
            Role::Undefined,
        );
        Ok(())
    }
}
