use common::logger::LogFormat;

use crate::cli::{Backend, Cli};

#[derive(Clone, Debug)]
pub struct CheckConfig {
    /// Which reference adapter is exercised.
    pub backend: Backend,

    /// Database connection string for the SQLite backend.
    pub database_url: String,

    pub log_format: LogFormat,

    /// Suppress per-scenario console markers.
    pub quiet: bool,
}

impl CheckConfig {
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

        let backend = match std::env::var("ADAPTER_BACKEND").as_deref() {
            Ok("memory") => Backend::Memory,
            _ => Backend::Sqlite,
        };

        let log_format = match std::env::var("APP_ENV").as_deref() {
            Ok("production") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            backend,
            database_url,
            log_format,
            quiet: false,
        }
    }

    /// Command line flags win over the environment.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(backend) = cli.backend {
            self.backend = backend;
        }
        if let Some(url) = &cli.database_url {
            self.database_url = url.clone();
        }
        if cli.json_logs {
            self.log_format = LogFormat::Json;
        }
        self.quiet |= cli.quiet;
        self
    }
}
