use studiocore::{
    ac::{
        session::SessionFactory,
        traits::{
            EmployeeBackend,
            SessionBackend,
        },
    },
    platform::IdentityPlatform,
};

use crate::conf::EmployeeCmd;

/// Runs an `employee` subcommand, returning the line to report.
pub async fn run(
    identity: &dyn IdentityPlatform,
    cmd: EmployeeCmd,
) -> anyhow::Result<String> {
    Ok(match cmd {
        EmployeeCmd::Add { name, role } => {
            let id = identity.add_employee(&name, role).await?;
            format!("added employee {name:?} ({role}) with id {id}")
        }
        EmployeeCmd::Login { id, origin } => {
            let employee = identity.get_employee_by_id(id).await?
                .ok_or_else(|| anyhow::anyhow!("no employee with id {id}"))?;
            let session = SessionFactory::new().create(employee, origin);
            identity.save_session(&session).await?;
            session.token.to_string()
        }
        EmployeeCmd::Role { id, role } => {
            if !identity.set_employee_role(id, role).await? {
                anyhow::bail!("no employee with id {id}");
            }
            format!("employee {id} now has role {role}")
        }
        EmployeeCmd::Logout { token } => {
            match identity.load_session(token).await? {
                Some(session) => {
                    identity.purge_session(token).await?;
                    format!("ended session of employee {}", session.employee.id)
                }
                None => format!("no session for token {token}"),
            }
        }
    })
}

#[cfg(test)]
mod test {
    use studiocore::ac::Role;
    use test_studio::db::{
        create_employee_session,
        create_sqlite_backend,
    };
    use super::*;

    #[tokio::test]
    async fn role_and_logout() -> anyhow::Result<()> {
        let backend = create_sqlite_backend().await?;
        let session = create_employee_session(&backend, "Ana", Role::Employee).await?;
        let id = session.employee.id;

        let line = run(&backend, EmployeeCmd::Role { id, role: Role::Manager }).await?;
        assert_eq!(line, format!("employee {id} now has role Manager"));
        let token = run(&backend, EmployeeCmd::Login { id, origin: "cli".into() }).await?;
        let token = token.parse()?;
        let fresh = SessionBackend::load_session(&backend, token).await?
            .expect("saved session");
        assert_eq!(fresh.employee.role, Role::Manager);
        assert!(run(&backend, EmployeeCmd::Role { id: 99, role: Role::Viewer }).await.is_err());

        let line = run(&backend, EmployeeCmd::Logout { token: session.token }).await?;
        assert_eq!(line, format!("ended session of employee {id}"));
        assert!(SessionBackend::load_session(&backend, session.token).await?.is_none());
        let line = run(&backend, EmployeeCmd::Logout { token: session.token }).await?;
        assert!(line.starts_with("no session for token"));
        Ok(())
    }
}
