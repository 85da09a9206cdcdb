use konsertliste::config::env_loader::load_config;
use konsertliste::sitemap::server::start_server;
use konsertliste::tracing::setup_loki;
use std::env;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let loki_url = env::var("LOKI_URL").ok();
    let _loki = setup_loki(loki_url.as_deref(), "sitemap").await;

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = start_server(&config).await {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
