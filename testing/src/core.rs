use async_trait::async_trait;
use mockall::mock;
use studiocore::{
    ac::Employee,
    error::BackendError,
    platform::PlatformUrl,
    record::{
        NewRecord,
        RecordId,
        RecordPatch,
        SavedRecord,
        SavedRecords,
        traits::RecordBackend,
    },
};

mock! {
    pub Platform {}

    #[async_trait]
    impl RecordBackend for Platform {
        async fn insert_record(
            &self,
            id: &RecordId,
            employee: &Employee,
            record: &NewRecord,
        ) -> Result<SavedRecord, BackendError>;
        async fn update_record(
            &self,
            id: &RecordId,
            patch: &RecordPatch,
        ) -> Result<bool, BackendError>;
        async fn delete_record(
            &self,
            id: &RecordId,
        ) -> Result<bool, BackendError>;
        async fn get_record(
            &self,
            id: &RecordId,
        ) -> Result<Option<SavedRecord>, BackendError>;
        async fn list_records(&self) -> Result<SavedRecords, BackendError>;
        async fn list_records_by_employee(
            &self,
            employee_id: i64,
        ) -> Result<SavedRecords, BackendError>;
    }

    impl PlatformUrl for Platform {
        fn url(&self) -> &str;
    }
}

/// A `MockPlatform` that answers `url()` with `"mock://"`.
pub fn mock_platform() -> MockPlatform {
    let mut platform = MockPlatform::new();
    platform.expect_url()
        .return_const("mock://".to_string());
    platform
}
