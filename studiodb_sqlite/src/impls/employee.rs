use async_trait::async_trait;
use sqlx::Row;
use studiocore::{
    ac::{
        traits::EmployeeBackend,
        Employee,
        Role,
    },
    error::BackendError,
};

use crate::{
    SqliteBackend,
    chrono::Utc,
};

async fn add_employee_sqlite(
    backend: &SqliteBackend,
    name: &str,
    role: Role,
) -> Result<i64, BackendError> {
    let ts = Utc::now().timestamp();
    let id = sqlx::query(
        r#"
INSERT INTO employee (
    name,
    role,
    created_ts
)
VALUES ( ?1, ?2, ?3 )
        "#,
    )
    .bind(name)
    .bind(role.to_string())
    .bind(ts)
    .execute(&*backend.pool)
    .await?
    .last_insert_rowid();
    Ok(id)
}

async fn get_employee_by_id_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<Employee>, BackendError> {
    let row = sqlx::query(
        r#"
SELECT
    id,
    name,
    role,
    created_ts
FROM
    employee
WHERE
    id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&*backend.pool)
    .await?;
    row.map(|row| -> Result<Employee, BackendError> { Ok(Employee {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        role: row.try_get::<&str, _>("role")?
            .parse()
            .unwrap_or_default(),
        created_ts: row.try_get("created_ts")?,
    }) })
    .transpose()
}

async fn set_employee_role_sqlite(
    backend: &SqliteBackend,
    id: i64,
    role: Role,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(
        r#"
UPDATE
    employee
SET
    role = ?2
WHERE
    id = ?1
        "#,
    )
    .bind(id)
    .bind(role.to_string())
    .execute(&*backend.pool)
    .await?
    .rows_affected();
    Ok(rows_affected > 0)
}

#[async_trait]
impl EmployeeBackend for SqliteBackend {
    async fn add_employee(
        &self,
        name: &str,
        role: Role,
    ) -> Result<i64, BackendError> {
        add_employee_sqlite(
            &self,
            name,
            role,
        ).await
    }

    async fn get_employee_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Employee>, BackendError> {
        get_employee_by_id_sqlite(
            &self,
            id,
        ).await
    }

    async fn set_employee_role(
        &self,
        id: i64,
        role: Role,
    ) -> Result<bool, BackendError> {
        set_employee_role_sqlite(
            &self,
            id,
            role,
        ).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use studiocore::ac::{
        traits::EmployeeBackend,
        Employee,
        Role,
    };
    use crate::SqliteBackend;

    #[tokio::test]
    async fn test_basic() -> anyhow::Result<()> {
        let backend = SqliteBackend::from_url("sqlite::memory:").await?;
        let id = EmployeeBackend::add_employee(&backend, "Ana", Role::Manager).await?;
        let employee = EmployeeBackend::get_employee_by_id(&backend, id).await?
            .expect("employee is missing?");
        assert_eq!(
            employee,
            Employee {
                id: 1,
                name: "Ana".to_string(),
                role: Role::Manager,
                created_ts: 1234567890,
            },
        );

        assert!(EmployeeBackend::set_employee_role(&backend, id, Role::Viewer).await?);
        assert!(!EmployeeBackend::set_employee_role(&backend, 99, Role::Viewer).await?);
        let employee = EmployeeBackend::get_employee_by_id(&backend, id).await?
            .expect("employee is missing?");
        assert_eq!(employee.role, Role::Viewer);

        assert_eq!(EmployeeBackend::get_employee_by_id(&backend, 99).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_undefined_role() -> anyhow::Result<()> {
        let backend = SqliteBackend::from_url("sqlite::memory:").await?;
        let id = EmployeeBackend::add_employee(&backend, "Ghost", Role::Undefined).await?;
        let employee = EmployeeBackend::get_employee_by_id(&backend, id).await?
            .expect("employee is missing?");
        assert_eq!(employee.role, Role::Undefined);
        Ok(())
    }
}
