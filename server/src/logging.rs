//! Tracing subscriber bootstrap.

use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "todo_server=info,todo_core=info,tower_http=info";

/// Install a fmt subscriber writing to stderr. Calling it again is a no-op.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn init_twice_does_not_panic() {
        init();
        init();
    }
}
