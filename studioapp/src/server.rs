use axum::{
    extract::FromRequestParts,
    routing::{
        get,
        put,
    },
    Extension,
    Router,
};
use http::{
    header,
    request::Parts,
};
use std::sync::Arc;
use studiocore::{
    ac::{
        session::SessionToken,
        traits::SessionBackend,
        Agent,
    },
    platform::IdentityPlatform,
};
use studiorender::pdf::{
    AttachmentSource,
    PdfOptions,
};
use studiostore::Platform;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::error::AppError;

pub mod records;
pub mod tasks;

/// Everything a request handler needs, shared across requests.
#[derive(Clone)]
pub struct AppContext {
    pub store: Platform,
    pub identity: Arc<dyn IdentityPlatform>,
    pub pdf_options: Arc<PdfOptions>,
    pub attachments: Arc<dyn AttachmentSource>,
}

/// The caller as identified by the `Authorization: Bearer` header.
/// Without a known session token the caller is anonymous.
pub struct Caller(pub Agent);

fn bearer_token(parts: &Parts) -> Option<SessionToken> {
    parts.headers.get(header::AUTHORIZATION)?
        .to_str().ok()?
        .strip_prefix("Bearer ")?
        .trim()
        .parse()
        .ok()
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Caller(Agent::Anonymous));
        };
        let ctx = parts.extensions.get::<AppContext>()
            .cloned()
            .ok_or_else(|| {
                log::error!("request reached a handler without the app context");
                AppError::InternalServerError
            })?;
        let session = ctx.identity.load_session(token).await
            .map_err(|e| {
                log::error!("could not load session: {e}");
                AppError::InternalServerError
            })?;
        if session.is_none() {
            log::debug!("unknown session token presented");
        }
        Ok(Caller(session.into()))
    }
}

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/records", get(records::list_records).post(records::add_record))
        .route("/records.html", get(records::listing_html))
        .route(
            "/records/{id}",
            get(records::get_record)
                .patch(records::update_record)
                .delete(records::delete_record),
        )
        .route("/records/{id}/view", get(records::view_record))
        .route("/records/{id}/pdf", get(records::record_pdf))
        .route("/tasks", get(tasks::list_tasks))
        .route("/tasks/{id}/status", put(tasks::set_task_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(ctx))
        )
}

pub async fn serve(listen: &str, router: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    log::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
            log::info!("shutting down");
        })
        .await?;
    Ok(())
}
