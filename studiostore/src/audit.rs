//! The developer-facing channel permission denials are reported to,
//! separate from the message returned to the user.

use parking_lot::Mutex;
use std::sync::Arc;
use crate::error::Denial;

pub const AUDIT_TARGET: &str = "studio::audit";

pub trait AuditSink: Send + Sync {
    fn report(&self, denial: &Denial);
}

/// Writes each denial as a JSON line to the `studio::audit` log target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogAuditSink;

/// Retains every reported denial in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryAuditSink(Arc<Mutex<Vec<Denial>>>);

impl AuditSink for LogAuditSink {
    fn report(&self, denial: &Denial) {
        match serde_json::to_string(denial) {
            Ok(line) => log::warn!(target: AUDIT_TARGET, "{line}"),
            Err(e) => log::warn!(target: AUDIT_TARGET, "{denial} (unserializable: {e})"),
        }
    }
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn denials(&self) -> Vec<Denial> {
        self.0.lock().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn report(&self, denial: &Denial) {
        self.0.lock().push(denial.clone());
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use studiocore::ac::{
        permit::Operation,
        Employee,
        Role,
    };
    use super::*;

    #[test]
    fn memory_sink_shares_denials() {
        let sink = MemoryAuditSink::new();
        let reporter: Box<dyn AuditSink> = Box::new(sink.clone());
        let denial = Denial {
            path: "savedRecords/abc".into(),
            operation: Operation::Delete,
            payload: None,
            employee: Employee {
                id: 4,
                name: "Vic".into(),
                role: Role::Viewer,
                created_ts: 0,
            },
        };
        reporter.report(&denial);
        assert_eq!(sink.denials(), vec![denial.clone()]);
        assert_eq!(
            serde_json::to_value(&denial).expect("serializable"),
            json!({
                "path": "savedRecords/abc",
                "operation": "delete",
                "employee": {
                    "id": 4,
                    "name": "Vic",
                    "role": "Viewer",
                    "created_ts": 0,
                },
            }),
        );
    }
}
