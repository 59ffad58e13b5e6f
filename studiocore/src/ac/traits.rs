use async_trait::async_trait;
use crate::error::BackendError;
use super::{
    employee::Employee,
    role::Role,
    session::{
        Session,
        SessionToken,
    },
};

#[async_trait]
pub trait EmployeeBackend {
    async fn add_employee(
        &self,
        name: &str,
        role: Role,
    ) -> Result<i64, BackendError>;
    async fn get_employee_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Employee>, BackendError>;
    async fn set_employee_role(
        &self,
        id: i64,
        role: Role,
    ) -> Result<bool, BackendError>;
}

#[async_trait]
pub trait SessionBackend {
    async fn save_session(
        &self,
        session: &Session,
    ) -> Result<i64, BackendError>;
    async fn load_session(
        &self,
        token: SessionToken,
    ) -> Result<Option<Session>, BackendError>;
    async fn purge_session(
        &self,
        token: SessionToken,
    ) -> Result<(), BackendError>;
}
