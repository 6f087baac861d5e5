//! Command-line and environment configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;
use todo_core::{SqliteStore, TodoManager};
use tracing::info;

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "REST API for managing a todo list")]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite database URL, e.g. `sqlite:todos.db`. Todos are kept in memory
    /// when unset.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Insert two example todos at startup if the store is empty.
    #[arg(long, env = "TODO_SEED")]
    pub seed: bool,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Open the configured store and wrap it in a manager.
    pub async fn open_manager(&self) -> todo_core::Result<TodoManager> {
        match &self.database_url {
            Some(url) => {
                info!(%url, "using sqlite store");
                Ok(TodoManager::new(SqliteStore::connect(url).await?))
            }
            None => {
                info!("using in-memory store");
                Ok(TodoManager::in_memory())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_override_defaults() {
        let config = Config::try_parse_from([
            "todo-server",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--database-url",
            "sqlite::memory:",
            "--seed",
        ])
        .unwrap();
        assert_eq!(config.addr(), "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.database_url.as_deref(), Some("sqlite::memory:"));
        assert!(config.seed);
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(Config::try_parse_from(["todo-server", "--port", "http"]).is_err());
    }

    #[tokio::test]
    async fn opens_sqlite_manager_from_url() {
        let config =
            Config::try_parse_from(["todo-server", "--database-url", "sqlite::memory:"]).unwrap();
        let manager = config.open_manager().await.unwrap();
        assert!(manager.list().await.unwrap().is_empty());
    }
}
