use studiocore::ac::{
    session::{
        Session,
        SessionFactory,
    },
    traits::{
        EmployeeBackend,
        SessionBackend,
    },
    Role,
};
use studiodb_sqlite::SqliteBackend;

pub async fn create_sqlite_backend() -> anyhow::Result<SqliteBackend> {
    Ok(SqliteBackend::from_url("sqlite::memory:").await?)
}

/// Adds an employee with the `role` and saves a fresh session for them.
pub async fn create_employee_session(
    backend: &SqliteBackend,
    name: &str,
    role: Role,
) -> anyhow::Result<Session> {
    let id = EmployeeBackend::add_employee(backend, name, role).await?;
    let employee = EmployeeBackend::get_employee_by_id(backend, id).await?
        .ok_or_else(|| anyhow::anyhow!("employee {id} went missing"))?;
    let session = SessionFactory::new().create(employee, "localhost");
    SessionBackend::save_session(backend, &session).await?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn smoke_test_create_session() -> anyhow::Result<()> {
        let backend = create_sqlite_backend().await?;
        let session = create_employee_session(&backend, "Ana", Role::Admin).await?;
        let loaded = SessionBackend::load_session(&backend, session.token).await?;
        assert_eq!(loaded.map(|s| s.employee), Some(session.employee));
        Ok(())
    }
}
