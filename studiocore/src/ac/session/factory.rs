use crate::{
    ac::employee::Employee,
    chrono::Utc,
};
use super::{Session, SessionToken};

#[derive(Default)]
pub struct SessionFactory {
    ts_source: Option<Box<dyn Fn() -> i64 + Send + Sync + 'static>>,
}

impl SessionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ts_source(mut self, val: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.ts_source = Some(Box::new(val));
        self
    }

    pub fn create(
        &self,
        employee: Employee,
        origin: impl Into<String>,
    ) -> Session {
        let origin = origin.into();
        let token = SessionToken::new();
        let created_ts = self.ts_source
            .as_ref()
            .map(|f| f())
            .unwrap_or_else(|| Utc::now().timestamp());
        let last_active_ts = created_ts;
        Session {
            token,
            employee,
            origin,
            created_ts,
            last_active_ts,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::ac::role::Role;
    use super::*;

    fn employee() -> Employee {
        Employee {
            id: 1,
            name: "Ana".to_string(),
            role: Role::Employee,
            created_ts: 1234567890,
        }
    }

    #[test]
    fn default_clock() {
        let session = SessionFactory::new().create(employee(), "localhost");
        assert_eq!(session.created_ts, 1234567890);
        assert_eq!(session.last_active_ts, 1234567890);
        assert_eq!(session.origin, "localhost");
    }

    #[test]
    fn custom_clock() {
        let session = SessionFactory::new()
            .ts_source(|| 42)
            .create(employee(), "localhost");
        assert_eq!(session.created_ts, 42);
        assert_eq!(session.employee, employee());
    }
}
