use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;

use asset_shared::config::AppConfig;
use asset_shared::telemetry::init_telemetry;

mod app;
mod signal;

use app::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    let _log_guard = init_telemetry(&config.log);

    info!(
        name = %config.app.name,
        env = %config.app.env,
        version = env!("CARGO_PKG_VERSION"),
        "Asset server starting..."
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(signal::cancel_on_signal(shutdown.clone()));

    let app = Application::build(config).await?;
    app.run(shutdown).await
}
