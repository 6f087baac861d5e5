use clap::Parser;
use tokio::net::TcpListener;
use todo_server::config::Config;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    todo_server::logging::init();
    let config = Config::parse();

    let manager = config.open_manager().await?;
    if config.seed {
        let seeded = todo_server::seed_examples(&manager).await?;
        info!(seeded, "seeded example todos");
    }

    let listener = TcpListener::bind(config.addr()).await?;
    info!(addr = %listener.local_addr()?, "todo API listening");
    for (route, description) in todo_server::ENDPOINTS {
        info!("  {route:<24} {description}");
    }

    todo_server::run(listener, manager, shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
