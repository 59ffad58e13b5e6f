//! A read-only projection over task-assignment records.
//!
//! The task form saves its fields as `"Label: value"` strings; this
//! module recovers them by label prefix.  Writes never go through this
//! type: a status change yields a new `RecordData` which is then saved
//! through the regular record update path.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    str::FromStr,
};
use crate::error::ValueError;
use super::{
    data::{
        split_text,
        Item,
    },
    RecordData,
    RecordId,
    SavedRecord,
};

/// The `fileName` the task-assignment form saves under.
pub const TASK_FILE_NAME: &str = "Task Assignment";

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: RecordId,
    pub project_name: String,
    pub employee_name: String,
    pub created_at: i64,
    pub task_name: String,
    pub assigned_to: String,
    pub assigned_by: String,
    pub priority: String,
    pub due_date: String,
    pub description: String,
    pub status: TaskStatus,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        })
    }
}

impl FromStr for TaskStatus {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(' ', "-").as_str() {
            "not-started" => Ok(TaskStatus::NotStarted),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

impl TaskRecord {
    /// Projects a saved record, yielding `None` unless it was produced
    /// by the task-assignment form.
    pub fn from_record(record: &SavedRecord) -> Option<Self> {
        (record.file_name == TASK_FILE_NAME).then(|| {
            let mut task = TaskRecord {
                id: record.id.clone(),
                project_name: record.project_name.clone(),
                employee_name: record.employee_name.clone(),
                created_at: record.created_at,
                ..Default::default()
            };
            record.data.sections()
                .iter()
                .flat_map(|section| section.items.iter())
                .filter_map(|item| match item {
                    Item::Text(s) => split_text(s),
                    _ => None,
                })
                .for_each(|(label, value)| task.assign(label, value));
            task
        })
    }

    // Earlier lines win; the form never repeats a label.
    fn assign(&mut self, label: &str, value: &str) {
        let label = label.to_lowercase();
        let field = if label.starts_with("task name") {
            &mut self.task_name
        } else if label.starts_with("assigned to") {
            &mut self.assigned_to
        } else if label.starts_with("assigned by") {
            &mut self.assigned_by
        } else if label.starts_with("priority") {
            &mut self.priority
        } else if label.starts_with("due date") || label.starts_with("deadline") {
            &mut self.due_date
        } else if label.starts_with("description") {
            &mut self.description
        } else if label.starts_with("status") {
            if self.status == TaskStatus::default() {
                self.status = value.parse().unwrap_or_default();
            }
            return;
        } else {
            return;
        };
        if field.is_empty() {
            *field = value.to_string();
        }
    }
}

/// Produces the payload of a task record with its status item rewritten.
pub fn with_status(data: &RecordData, status: TaskStatus) -> RecordData {
    data.rewrite_text_item("status", &format!("Status: {status}"))
}
