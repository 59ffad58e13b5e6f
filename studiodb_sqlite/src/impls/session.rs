use async_trait::async_trait;
use sqlx::Row;
use studiocore::{
    ac::{
        session::{
            Session,
            SessionToken,
        },
        traits::SessionBackend,
        Employee,
    },
    error::BackendError,
};

use crate::{
    SqliteBackend,
    chrono::Utc,
};

async fn save_session_sqlite(
    backend: &SqliteBackend,
    session: &Session,
) -> Result<i64, BackendError> {
    let last_active_ts = Utc::now().timestamp();
    let token_str = session.token.to_string();
    sqlx::query(
        r#"
INSERT INTO employee_session (
    token,
    employee_id,
    origin,
    created_ts,
    last_active_ts
)
VALUES ( ?1, ?2, ?3, ?4, ?5 )
ON CONFLICT(token)
DO UPDATE SET
    origin = ?3,
    last_active_ts = ?6
        "#,
    )
    .bind(token_str)
    .bind(session.employee.id)
    .bind(&session.origin)
    .bind(session.created_ts)
    .bind(session.last_active_ts)
    .bind(last_active_ts)
    .execute(&*backend.pool)
    .await?;
    Ok(last_active_ts)
}

async fn load_session_sqlite(
    backend: &SqliteBackend,
    token: SessionToken,
) -> Result<Option<Session>, BackendError> {
    let token_str = token.to_string();
    let row = sqlx::query(
        r#"
SELECT
    employee_session.origin,
    employee_session.created_ts,
    employee_session.last_active_ts,
    employee.id AS employee_id,
    employee.name AS employee_name,
    employee.role AS employee_role,
    employee.created_ts AS employee_created_ts
FROM
    employee_session
JOIN
    employee ON employee.id = employee_session.employee_id
WHERE
    employee_session.token = ?1
        "#,
    )
    .bind(token_str)
    .fetch_optional(&*backend.pool)
    .await?;
    row.map(|row| -> Result<Session, BackendError> { Ok(Session {
        token,
        employee: Employee {
            id: row.try_get("employee_id")?,
            name: row.try_get("employee_name")?,
            role: row.try_get::<&str, _>("employee_role")?
                .parse()
                .unwrap_or_default(),
            created_ts: row.try_get("employee_created_ts")?,
        },
        origin: row.try_get("origin")?,
        created_ts: row.try_get("created_ts")?,
        last_active_ts: row.try_get("last_active_ts")?,
    }) })
    .transpose()
}

async fn purge_session_sqlite(
    backend: &SqliteBackend,
    token: SessionToken,
) -> Result<(), BackendError> {
    let token_str = token.to_string();
    sqlx::query(
        r#"
DELETE FROM
    employee_session
WHERE
    token = ?1
        "#,
    )
    .bind(token_str)
    .execute(&*backend.pool)
    .await?;
    Ok(())
}

#[async_trait]
impl SessionBackend for SqliteBackend {
    async fn save_session(
        &self,
        session: &Session,
    ) -> Result<i64, BackendError> {
        save_session_sqlite(
            &self,
            session,
        ).await
    }

    async fn load_session(
        &self,
        token: SessionToken,
    ) -> Result<Option<Session>, BackendError> {
        load_session_sqlite(
            &self,
            token,
        ).await
    }

    async fn purge_session(
        &self,
        token: SessionToken,
    ) -> Result<(), BackendError> {
        purge_session_sqlite(
            &self,
            token,
        ).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use studiocore::ac::{
        session::SessionFactory,
        traits::{
            EmployeeBackend,
            SessionBackend,
        },
        Role,
    };
    use test_studio::chrono::set_timestamp;
    use crate::SqliteBackend;

    #[tokio::test]
    async fn test_basic() -> anyhow::Result<()> {
        let backend = SqliteBackend::from_url("sqlite::memory:").await?;
        let id = EmployeeBackend::add_employee(&backend, "Ana", Role::Admin).await?;
        let employee = EmployeeBackend::get_employee_by_id(&backend, id).await?
            .expect("employee is missing?");
        let session = SessionFactory::new()
            .ts_source(|| 1234567890)
            .create(employee, "localhost");
        SessionBackend::save_session(&backend, &session).await?;

        let loaded = SessionBackend::load_session(&backend, session.token).await?
            .expect("session is missing?");
        assert_eq!(loaded, session);

        set_timestamp(1234567999);
        assert_eq!(SessionBackend::save_session(&backend, &session).await?, 1234567999);
        let loaded = SessionBackend::load_session(&backend, session.token).await?
            .expect("session is missing?");
        assert_eq!(loaded.last_active_ts, 1234567999);
        assert_eq!(loaded.created_ts, 1234567890);

        SessionBackend::purge_session(&backend, session.token).await?;
        assert_eq!(SessionBackend::load_session(&backend, session.token).await?, None);
        Ok(())
    }
}
