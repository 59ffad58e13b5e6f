use async_trait::async_trait;
use sqlx::{
    sqlite::SqliteRow,
    Row,
};
use studiocore::{
    ac::Employee,
    error::BackendError,
    record::{
        traits::RecordBackend,
        NewRecord,
        RecordData,
        RecordId,
        RecordPatch,
        SavedRecord,
        SavedRecords,
    },
};

use crate::{
    SqliteBackend,
    chrono::Utc,
};

fn row_to_record(row: SqliteRow) -> Result<SavedRecord, BackendError> {
    let data: String = row.try_get("data")?;
    Ok(SavedRecord {
        id: row.try_get::<String, _>("id")?.into(),
        employee_id: row.try_get("employee_id")?,
        employee_name: row.try_get("employee_name")?,
        file_name: row.try_get("file_name")?,
        project_name: row.try_get("project_name")?,
        created_at: row.try_get("created_at")?,
        data: serde_json::from_str::<RecordData>(&data)?,
    })
}

async fn insert_record_sqlite(
    backend: &SqliteBackend,
    id: &RecordId,
    employee: &Employee,
    record: &NewRecord,
) -> Result<SavedRecord, BackendError> {
    let now = Utc::now().timestamp_millis();
    let data = serde_json::to_string(&record.data)?;
    let project_name = record.resolved_project_name();
    let created_at: i64 = sqlx::query(
        r#"
INSERT INTO saved_record (
    id,
    employee_id,
    employee_name,
    file_name,
    project_name,
    created_at,
    data
)
VALUES (
    ?1,
    ?2,
    ?3,
    ?4,
    ?5,
    MAX(?6, (SELECT COALESCE(MAX(created_at) + 1, 0) FROM saved_record)),
    ?7
)
RETURNING created_at
        "#,
    )
    .bind(id.as_str())
    .bind(employee.id)
    .bind(&employee.name)
    .bind(&record.file_name)
    .bind(project_name)
    .bind(now)
    .bind(&data)
    .fetch_one(&*backend.pool)
    .await?
    .try_get("created_at")?;
    Ok(SavedRecord {
        id: id.clone(),
        employee_id: employee.id,
        employee_name: employee.name.clone(),
        file_name: record.file_name.clone(),
        project_name: project_name.to_string(),
        created_at,
        data: record.data.clone(),
    })
}

async fn update_record_sqlite(
    backend: &SqliteBackend,
    id: &RecordId,
    patch: &RecordPatch,
) -> Result<bool, BackendError> {
    let data = patch.data
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let rows_affected = sqlx::query(
        r#"
UPDATE
    saved_record
SET
    file_name = COALESCE(?2, file_name),
    project_name = COALESCE(?3, project_name),
    data = COALESCE(?4, data)
WHERE
    id = ?1
        "#,
    )
    .bind(id.as_str())
    .bind(patch.file_name.as_deref())
    .bind(patch.project_name.as_deref())
    .bind(data)
    .execute(&*backend.pool)
    .await?
    .rows_affected();
    Ok(rows_affected > 0)
}

async fn delete_record_sqlite(
    backend: &SqliteBackend,
    id: &RecordId,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(
        r#"
DELETE FROM
    saved_record
WHERE
    id = ?1
        "#,
    )
    .bind(id.as_str())
    .execute(&*backend.pool)
    .await?
    .rows_affected();
    Ok(rows_affected > 0)
}

async fn get_record_sqlite(
    backend: &SqliteBackend,
    id: &RecordId,
) -> Result<Option<SavedRecord>, BackendError> {
    sqlx::query(
        r#"
SELECT
    id,
    employee_id,
    employee_name,
    file_name,
    project_name,
    created_at,
    data
FROM
    saved_record
WHERE
    id = ?1
        "#,
    )
    .bind(id.as_str())
    .fetch_optional(&*backend.pool)
    .await?
    .map(row_to_record)
    .transpose()
}

async fn list_records_sqlite(
    backend: &SqliteBackend,
) -> Result<SavedRecords, BackendError> {
    sqlx::query(
        r#"
SELECT
    id,
    employee_id,
    employee_name,
    file_name,
    project_name,
    created_at,
    data
FROM
    saved_record
ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(&*backend.pool)
    .await?
    .into_iter()
    .map(row_to_record)
    .collect()
}

async fn list_records_by_employee_sqlite(
    backend: &SqliteBackend,
    employee_id: i64,
) -> Result<SavedRecords, BackendError> {
    sqlx::query(
        r#"
SELECT
    id,
    employee_id,
    employee_name,
    file_name,
    project_name,
    created_at,
    data
FROM
    saved_record
WHERE
    employee_id = ?1
ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(employee_id)
    .fetch_all(&*backend.pool)
    .await?
    .into_iter()
    .map(row_to_record)
    .collect()
}

#[async_trait]
impl RecordBackend for SqliteBackend {
    async fn insert_record(
        &self,
        id: &RecordId,
        employee: &Employee,
        record: &NewRecord,
    ) -> Result<SavedRecord, BackendError> {
        insert_record_sqlite(
            &self,
            id,
            employee,
            record,
        ).await
    }

    async fn update_record(
        &self,
        id: &RecordId,
        patch: &RecordPatch,
    ) -> Result<bool, BackendError> {
        update_record_sqlite(
            &self,
            id,
            patch,
        ).await
    }

    async fn delete_record(
        &self,
        id: &RecordId,
    ) -> Result<bool, BackendError> {
        delete_record_sqlite(
            &self,
            id,
        ).await
    }

    async fn get_record(
        &self,
        id: &RecordId,
    ) -> Result<Option<SavedRecord>, BackendError> {
        get_record_sqlite(
            &self,
            id,
        ).await
    }

    async fn list_records(
        &self,
    ) -> Result<SavedRecords, BackendError> {
        list_records_sqlite(&self).await
    }

    async fn list_records_by_employee(
        &self,
        employee_id: i64,
    ) -> Result<SavedRecords, BackendError> {
        list_records_by_employee_sqlite(
            &self,
            employee_id,
        ).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use serde_json::json;
    use studiocore::{
        ac::{
            Employee,
            Role,
        },
        record::{
            traits::RecordBackend,
            NewRecord,
            RecordId,
            RecordPatch,
        },
    };
    use test_studio::chrono::set_timestamp;
    use crate::SqliteBackend;

    fn employee() -> Employee {
        Employee {
            id: 3,
            name: "Carla".to_string(),
            role: Role::Employee,
            created_ts: 1234567890,
        }
    }

    #[tokio::test]
    async fn test_round_trip() -> anyhow::Result<()> {
        let backend = SqliteBackend::from_url("sqlite::memory:").await?;
        let data = json!([{
            "category": "Terms",
            "items": [
                "amount: 500",
                {"label": "Approved", "value": true},
                {"comment": "Drawing", "url": "https://files.example.com/d.png"},
                {"lineItem": "Steel", "unitCost": 40, "isHeader": false},
            ],
        }]);
        let id = RecordId::from("rec0");
        let inserted = RecordBackend::insert_record(
            &backend,
            &id,
            &employee(),
            &NewRecord::new("Change Order", data.clone()),
        ).await?;
        assert_eq!(inserted.created_at, 1234567890000);
        assert_eq!(inserted.project_name, "Change Order");

        let record = RecordBackend::get_record(&backend, &id).await?
            .expect("record is missing?");
        assert_eq!(record, inserted);
        assert_eq!(record.data.as_value(), &data);
        assert_eq!(record.employee_id, 3);
        assert_eq!(record.employee_name, "Carla");

        assert_eq!(RecordBackend::get_record(&backend, &"missing".into()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_monotonic_created_at() -> anyhow::Result<()> {
        let backend = SqliteBackend::from_url("sqlite::memory:").await?;
        set_timestamp(1000);
        for id in ["a", "b", "c"] {
            RecordBackend::insert_record(
                &backend,
                &id.into(),
                &employee(),
                &NewRecord::new("Leave Application", json!([])),
            ).await?;
        }
        // a clock that went backwards does not reorder records
        set_timestamp(10);
        RecordBackend::insert_record(
            &backend,
            &"d".into(),
            &employee(),
            &NewRecord::new("Leave Application", json!([])),
        ).await?;

        let records = RecordBackend::list_records(&backend).await?;
        let stamps = records.iter()
            .map(|r| (r.id.as_str(), r.created_at))
            .collect::<Vec<_>>();
        assert_eq!(stamps, [
            ("d", 1000003),
            ("c", 1000002),
            ("b", 1000001),
            ("a", 1000000),
        ]);
        Ok(())
    }

    #[tokio::test]
    async fn test_partial_update() -> anyhow::Result<()> {
        let backend = SqliteBackend::from_url("sqlite::memory:").await?;
        let id = RecordId::from("rec0");
        RecordBackend::insert_record(
            &backend,
            &id,
            &employee(),
            &NewRecord::new("Transmittal Letter", json!({"category": "To", "items": []}))
                .project_name("Harbour Tower"),
        ).await?;

        assert!(RecordBackend::update_record(&backend, &id, &RecordPatch {
            project_name: Some("Harbour Tower Stage 2".into()),
            ..Default::default()
        }).await?);
        let record = RecordBackend::get_record(&backend, &id).await?
            .expect("record is missing?");
        assert_eq!(record.project_name, "Harbour Tower Stage 2");
        assert_eq!(record.file_name, "Transmittal Letter");
        assert_eq!(record.data.as_value(), &json!({"category": "To", "items": []}));

        assert!(RecordBackend::update_record(&backend, &id, &RecordPatch {
            data: Some(json!([]).into()),
            ..Default::default()
        }).await?);
        let record = RecordBackend::get_record(&backend, &id).await?
            .expect("record is missing?");
        assert_eq!(record.data.as_value(), &json!([]));
        assert_eq!(record.project_name, "Harbour Tower Stage 2");

        // no upsert
        let missing = RecordId::from("abc");
        assert!(!RecordBackend::update_record(&backend, &missing, &RecordPatch {
            file_name: Some("Change Order".into()),
            ..Default::default()
        }).await?);
        assert_eq!(RecordBackend::get_record(&backend, &missing).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_and_by_employee() -> anyhow::Result<()> {
        let backend = SqliteBackend::from_url("sqlite::memory:").await?;
        let other = Employee {
            id: 4,
            name: "Dev".to_string(),
            ..employee()
        };
        RecordBackend::insert_record(
            &backend, &"a".into(), &employee(), &NewRecord::new("A", json!([])),
        ).await?;
        RecordBackend::insert_record(
            &backend, &"b".into(), &other, &NewRecord::new("B", json!([])),
        ).await?;

        let mine = RecordBackend::list_records_by_employee(&backend, 3).await?;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id.as_str(), "a");

        assert!(RecordBackend::delete_record(&backend, &"a".into()).await?);
        assert!(!RecordBackend::delete_record(&backend, &"a".into()).await?);
        assert_eq!(RecordBackend::list_records(&backend).await?.len(), 1);
        Ok(())
    }
}
