mod wiring;

use crate::{cli, context, rest, storage::InMemoryPopsicleRepository};
use anyhow::Result;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The running service: configuration, the shared store and the shutdown
/// signal every task listens on.
pub struct App {
    ctx: context::Context,
    state: rest::AppState<InMemoryPopsicleRepository>,
    shutdown: CancellationToken,
}

impl App {
    pub fn from_cli() -> Self {
        let (cli, dotenv_path) = cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::init(ctx.log_file.as_deref());
        log::info!("🚀 Starting popsicle-factory");
        if let Some(path) = dotenv_path {
            log::info!("📄 Loaded env from {}", path);
        }

        Self::new(ctx, wiring::build_state())
    }

    fn new(ctx: context::Context, state: rest::AppState<InMemoryPopsicleRepository>) -> Self {
        Self {
            ctx,
            state,
            shutdown: CancellationToken::new(),
        }
    }

    pub async fn run_daemon(&self) -> Result<()> {
        self.log_runtime_config();

        let listener = wiring::bind_listener(&self.ctx).await?;
        let mut rest_handle = self.spawn_rest_server(listener);

        self.wait_for_shutdown(&mut rest_handle).await
    }

    fn spawn_rest_server(&self, listener: TcpListener) -> JoinHandle<()> {
        let state = self.state.clone();
        let token = self.shutdown.clone();

        tokio::spawn(async move {
            if let Err(e) = rest::serve(listener, state, token).await {
                log::error!("REST server failed: {:#}", e);
            }
        })
    }

    async fn wait_for_shutdown(&self, rest_task: &mut JoinHandle<()>) -> Result<()> {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => log::info!("🧨 Ctrl-C received, shutting down..."),
            _ = &mut *rest_task => log::error!("REST task exited unexpectedly"),
        }

        self.shutdown.cancel();

        // Polling a completed JoinHandle again panics.
        if !rest_task.is_finished() {
            if let Err(e) = rest_task.await {
                log::error!("REST task failed: {}", e);
                return Err(e.into());
            }
        }

        log::info!("✅ Shutdown complete");
        Ok(())
    }

    fn log_runtime_config(&self) {
        log::info!("🌐 REST API: http://{}", self.ctx.api_listen);
        if let Some(path) = self.ctx.log_file.as_deref() {
            log::info!("📝 Log file: {}", path.to_string_lossy());
        }
    }
}

pub async fn run() -> Result<()> {
    let app = App::from_cli();
    app.run_daemon().await
}
