use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::{service::PopsicleService, storage::PopsicleRepository};

mod handlers;
pub mod models;

use handlers::{
    create_popsicle, get_popsicle, health, not_found, remove_popsicle, replace_popsicle,
    search_popsicles, update_popsicle,
};

#[derive(Clone)]
pub struct AppState<R> {
    pub service: PopsicleService<R>,
    pub started_at: std::time::SystemTime,
}

impl<R: PopsicleRepository> AppState<R> {
    pub fn new(service: PopsicleService<R>) -> Self {
        Self {
            service,
            started_at: std::time::SystemTime::now(),
        }
    }
}

pub fn router<R: PopsicleRepository + Clone + Send + Sync + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .route("/health", get(health::<R>))
        .route(
            "/popsicles",
            get(search_popsicles::<R>).post(create_popsicle::<R>),
        )
        .route(
            "/popsicles/:id",
            get(get_popsicle::<R>)
                .put(replace_popsicle::<R>)
                .patch(update_popsicle::<R>)
                .delete(remove_popsicle::<R>),
        )
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

pub async fn serve<R: PopsicleRepository + Clone + Send + Sync + 'static>(
    listener: TcpListener,
    state: AppState<R>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    log::info!("🌐 REST listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
