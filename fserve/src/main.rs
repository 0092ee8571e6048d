use fserve::{ServeConfig, init_tracing, serve};

#[tokio::main]
async fn main() {
    let config = match ServeConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("toolrelay-server: {error}");
            std::process::exit(2);
        }
    };

    init_tracing(&config.log_level);

    if let Err(error) = serve(config).await {
        tracing::error!(error = %error, "server stopped");
        std::process::exit(1);
    }
}
