/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use store::consts::DEFAULT_LIST_LIMIT;
use store::input::greater_than_zero;
use store::{BuildRecord, DatabaseConfig, Fingerprint, Storage};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "baur-storage", version, about = "Build cache metadata store")]
struct Cli {
    #[arg(long, env = "BAUR_LOG_LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long, env = "BAUR_LOG_JSON", default_value = "false")]
    log_json: bool,
    #[command(flatten)]
    database: DatabaseConfig,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply pending schema migrations and exit.
    Migrate,
    /// List the most recent builds of an application.
    Ls {
        app: String,
        #[arg(long, value_parser = greater_than_zero::<usize>, default_value_t = DEFAULT_LIST_LIMIT)]
        max: usize,
        #[arg(long)]
        json: bool,
    },
    /// Check whether a build with the given total input fingerprint exists.
    Lookup { app: String, fingerprint: String },
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Connecting migrates the schema by default. The `migrate` command does that
/// itself, so it connects without the implicit pass.
fn database_config(cli: &Cli) -> DatabaseConfig {
    let mut config = cli.database.clone();
    if matches!(cli.command, Commands::Migrate) {
        config.skip_migrations = true;
    }

    config
}

fn print_record(record: &BuildRecord) {
    println!(
        "{}  {}  {} - {}  {}",
        record.id,
        record.build.application().name(),
        record.build.started_at().format("%Y-%m-%d %H:%M:%S"),
        record.build.stopped_at().format("%H:%M:%S"),
        record.build.total_input_fingerprint(),
    );

    for output in &record.outputs {
        println!(
            "    output {} ({}, {} bytes, {})",
            output.name(),
            output.kind(),
            output.size_bytes(),
            output.fingerprint()
        );

        for upload in output.uploads() {
            println!(
                "        -> {} in {}ms",
                upload.destination_uri(),
                upload.duration().as_millis()
            );
        }
    }

    println!("    inputs: {}", record.inputs.len());
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    tracing::debug!(command = ?cli.command, "starting");

    let storage = Storage::connect(&database_config(&cli))
        .await
        .context("failed to open build cache database")?;

    match &cli.command {
        Commands::Migrate => {
            store::database::migrate(storage.connection())
                .await
                .context("failed to migrate build cache database")?;
        }
        Commands::Ls { app, max, json } => {
            let records = storage
                .list_builds_per_app(app, *max)
                .await
                .with_context(|| format!("failed to list builds of {}", app))?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("no builds recorded for {}", app);
            } else {
                records.iter().for_each(print_record);
            }
        }
        Commands::Lookup { app, fingerprint } => {
            let fingerprint: Fingerprint = fingerprint
                .parse()
                .with_context(|| format!("invalid fingerprint {:?}", fingerprint))?;

            match storage
                .find_latest_build_by_fingerprint(app, &fingerprint)
                .await
                .with_context(|| format!("failed to look up build of {}", app))?
            {
                Some(record) => {
                    println!("hit");
                    print_record(&record);
                }
                None => println!("miss"),
            }
        }
    }

    storage.close().await.context("failed to close database")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_connects_without_implicit_migrations() {
        let cli = Cli::try_parse_from([
            "baur-storage",
            "--database-url",
            "sqlite::memory:",
            "migrate",
        ])
        .unwrap();
        assert!(database_config(&cli).skip_migrations);

        let cli = Cli::try_parse_from([
            "baur-storage",
            "--database-url",
            "sqlite::memory:",
            "ls",
            "svc-a",
        ])
        .unwrap();
        assert!(!database_config(&cli).skip_migrations);
    }
}
