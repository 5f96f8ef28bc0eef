use anyhow::Context;
use trivia_api::{configuration::get_configuration, server::app::run_server, telemetry::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing("info")?;
    let settings = get_configuration().context("Failed to read configuration")?;
    run_server(settings).await
}
