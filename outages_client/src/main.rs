use crate::config::Settings;

mod app;
mod config;
mod input;
mod presenter;
mod terminal;
mod view;

const SERVICE_NAME: &str = "outages_client";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = shared_kernel::configuration::config::<Settings>()?;
    shared_kernel::tracing::config_telemetry(SERVICE_NAME, &settings.logging.file)?;
    app::run(&settings).await
}
