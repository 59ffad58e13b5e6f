use axum::{
    extract::{
        rejection::{
            JsonRejection,
            QueryRejection,
        },
        Path,
        Query,
    },
    response::{
        Html,
        IntoResponse,
        Response,
    },
    Extension,
    Json,
};
use http::{
    header,
    StatusCode,
};
use serde::Deserialize;
use studiocore::record::{
    NewRecord,
    RecordId,
    RecordPatch,
    SavedRecord,
    SavedRecords,
};
use studiorender::{
    pdf::render_pdf,
    screen::{
        render_listing,
        render_record,
    },
    OutputMode,
};

use crate::error::AppError;
use super::{
    AppContext,
    Caller,
};

#[derive(Debug, Default, Deserialize)]
pub struct PdfQuery {
    #[serde(default)]
    pub mode: OutputMode,
}

async fn fetch(
    ctx: &AppContext,
    caller: &Caller,
    id: &RecordId,
) -> Result<SavedRecord, AppError> {
    ctx.store.get(&caller.0, id).await?
        .ok_or(AppError::NotFound)
}

pub async fn list_records(
    Extension(ctx): Extension<AppContext>,
    caller: Caller,
) -> Result<Json<SavedRecords>, AppError> {
    Ok(Json(ctx.store.list(&caller.0).await?))
}

pub async fn listing_html(
    Extension(ctx): Extension<AppContext>,
    caller: Caller,
) -> Result<Html<String>, AppError> {
    let records = ctx.store.list(&caller.0).await?;
    Ok(Html(render_listing(&records)))
}

pub async fn add_record(
    Extension(ctx): Extension<AppContext>,
    caller: Caller,
    record: Result<Json<NewRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<SavedRecord>), AppError> {
    let Json(record) = record?;
    let id = ctx.store.add(&caller.0, record).await?;
    Ok((StatusCode::CREATED, Json(fetch(&ctx, &caller, &id).await?)))
}

pub async fn get_record(
    Extension(ctx): Extension<AppContext>,
    caller: Caller,
    Path(id): Path<RecordId>,
) -> Result<Json<SavedRecord>, AppError> {
    Ok(Json(fetch(&ctx, &caller, &id).await?))
}

pub async fn view_record(
    Extension(ctx): Extension<AppContext>,
    caller: Caller,
    Path(id): Path<RecordId>,
) -> Result<Html<String>, AppError> {
    let record = fetch(&ctx, &caller, &id).await?;
    Ok(Html(render_record(&record)))
}

pub async fn update_record(
    Extension(ctx): Extension<AppContext>,
    caller: Caller,
    Path(id): Path<RecordId>,
    patch: Result<Json<RecordPatch>, JsonRejection>,
) -> Result<Json<SavedRecord>, AppError> {
    let Json(patch) = patch?;
    ctx.store.update(&caller.0, &id, patch).await?;
    Ok(Json(fetch(&ctx, &caller, &id).await?))
}

pub async fn delete_record(
    Extension(ctx): Extension<AppContext>,
    caller: Caller,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    ctx.store.delete(&caller.0, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn record_pdf(
    Extension(ctx): Extension<AppContext>,
    caller: Caller,
    Path(id): Path<RecordId>,
    query: Result<Query<PdfQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let record = fetch(&ctx, &caller, &id).await?;
    let output = tokio::task::spawn_blocking(move || render_pdf(
        &record,
        &ctx.pdf_options,
        ctx.attachments.as_ref(),
        query.mode,
    )).await??;
    let disposition = output.content_disposition();
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        output.bytes,
    ).into_response())
}
