use anyhow::{Context as _, Result};
use tokio::net::TcpListener;

use crate::{
    context,
    rest::AppState,
    service::PopsicleService,
    storage::InMemoryPopsicleRepository,
};

pub fn build_state() -> AppState<InMemoryPopsicleRepository> {
    let repository = InMemoryPopsicleRepository::new();
    AppState::new(PopsicleService::new(repository))
}

pub async fn bind_listener(ctx: &context::Context) -> Result<TcpListener> {
    TcpListener::bind(ctx.api_listen)
        .await
        .with_context(|| format!("binding REST listener on {}", ctx.api_listen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PopsicleRepository;

    #[test]
    fn build_state_starts_with_empty_store() {
        let state = build_state();
        assert!(state.service.repository().get_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bind_listener_reports_address_in_use() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let ctx = context::Context {
            api_listen: taken.local_addr().unwrap(),
            log_file: None,
        };

        let err = bind_listener(&ctx).await.unwrap_err();
        assert!(err.to_string().starts_with("binding REST listener on"));
    }
}
