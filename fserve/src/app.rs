//! Dispatcher assembly and the listener loop.

use std::sync::Arc;

use tokio::net::TcpListener;
use toolrelay::{
    ChatPolicy, ChatService, CustomModelStore, DispatcherParts, HttpToolTransport,
    ProviderBuildConfig, build_dispatcher_with, build_openai_provider, build_proxy, http_client,
};
use tracing_subscriber::EnvFilter;

use crate::{AppState, ServeConfig, ServeError, router};

/// Installs the global `tracing` subscriber. `RUST_LOG` wins over the configured level.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(level: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .try_init()
        .is_ok()
}

pub fn build_service(config: &ServeConfig) -> Result<ChatService, ServeError> {
    let mut provider_config = ProviderBuildConfig::new().with_timeout(config.completion_timeout);
    provider_config.api_key = config.openai_api_key.clone();
    provider_config.organization = config.openai_organization.clone();
    provider_config.base_url = config.openai_base_url.clone();

    let planner = build_openai_provider(&provider_config)?;
    let custom_models = config
        .load_custom_models()?
        .map(|store| Arc::new(store) as Arc<dyn CustomModelStore>);
    let proxy = build_proxy(planner.clone(), custom_models, config.completion_timeout)?;

    let transport = HttpToolTransport::new(http_client(config.tool_timeout)?)
        .with_timeout(config.tool_timeout);
    let policy = ChatPolicy::default()
        .with_fallback_model(config.default_tool_model.clone())
        .with_local_timeout(Some(config.tool_timeout));

    Ok(build_dispatcher_with(
        planner,
        DispatcherParts::default()
            .with_proxy(proxy)
            .with_transport(Arc::new(transport))
            .with_policy(policy),
    ))
}

pub async fn serve(config: ServeConfig) -> Result<(), ServeError> {
    let service = build_service(&config)?;
    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!(
        bind = %config.bind,
        tool_model = %config.default_tool_model,
        custom_models = config.custom_models_path.is_some(),
        "toolrelay listening"
    );

    axum::serve(listener, router(AppState::new(service)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
