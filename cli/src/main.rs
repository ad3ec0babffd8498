mod cli;
mod config;
mod console;

use anyhow::Context;
use clap::Parser;

use cli::{Backend, Cli};
use common::logger::init_logger;
use conformance::{AdapterTestSuite, ConformanceError, RandomIdGenerator, fixture_person};
use config::CheckConfig;
use console::ConsoleReporter;
use session::store::{MemoryAdapter, SqliteAdapter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = CheckConfig::from_env().with_cli(&cli);

    init_logger("adapter-check", cfg.log_format);

    let person = fixture_person(&RandomIdGenerator);
    let suite =
        AdapterTestSuite::new(person.clone()).with_reporter(ConsoleReporter::new(cfg.quiet));

    tracing::info!(
        backend = ?cfg.backend,
        person_id = %person.id,
        trace_id = %suite.trace_id(),
        "starting conformance run"
    );

    match cfg.backend {
        Backend::Memory => {
            let adapter = MemoryAdapter::new();
            adapter.insert_person(person).await;
            suite.run(&adapter).await?;
        }
        Backend::Sqlite => {
            let adapter = SqliteAdapter::connect(&cfg.database_url).await?;
            adapter
                .insert_person(&person)
                .await
                .context("failed to seed fixture person")?;

            let outcome = suite.run(&adapter).await;

            // Leave a shared database as we found it
            let cleanup = adapter
                .delete_person(&person.id)
                .await
                .context("failed to remove fixture person");

            finish_run(outcome, cleanup)?;
        }
    }

    Ok(())
}

/// The conformance outcome wins; a failed cleanup is only logged unless the
/// run itself passed.
fn finish_run(
    outcome: Result<(), ConformanceError>,
    cleanup: anyhow::Result<()>,
) -> anyhow::Result<()> {
    match (outcome, cleanup) {
        (Ok(()), cleanup) => cleanup,
        (Err(e), Ok(())) => Err(e.into()),
        (Err(e), Err(cleanup_err)) => {
            tracing::warn!(error = ?cleanup_err, "cleanup after failed run also failed");
            Err(e.into())
        }
    }
}
