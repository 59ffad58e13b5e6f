use axum::{
    extract::{
        rejection::JsonRejection,
        Path,
    },
    Extension,
    Json,
};
use serde::Deserialize;
use studiocore::record::{
    task::{
        TaskRecord,
        TaskStatus,
    },
    RecordId,
};

use crate::error::AppError;
use super::{
    AppContext,
    Caller,
};

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: TaskStatus,
}

pub async fn list_tasks(
    Extension(ctx): Extension<AppContext>,
    caller: Caller,
) -> Result<Json<Vec<TaskRecord>>, AppError> {
    Ok(Json(ctx.store.tasks(&caller.0).await?))
}

pub async fn set_task_status(
    Extension(ctx): Extension<AppContext>,
    caller: Caller,
    Path(id): Path<RecordId>,
    update: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<TaskRecord>, AppError> {
    let Json(update) = update?;
    let task = ctx.store.set_task_status(&caller.0, &id, update.status).await?;
    log::info!("task {} is now {}", id, task.status);
    Ok(Json(task))
}
