mod cli;

use crate::cli::{Command, SlugStyleArg, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use jumplink_core::{LinkRecord, Page, Repository};
use jumplink_generator::{PairGenerator, RandomGenerator};
use jumplink_storage::{FlatFileRepository, SqliteRepository};
use jumplink_store::{LinkStore, LinkStoreService, StoreError, StoreSettings};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit status for a code that is not stored.
const EXIT_NOT_FOUND: u8 = 1;
/// Exit status for a request the store rejected.
const EXIT_REJECTED: u8 = 2;
/// Exit status for a backend failure.
const EXIT_STORAGE: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match CLI::try_parse() {
        Ok(config) => config,
        Err(err) => err.exit(),
    };

    match run(config).await {
        Ok(code) => code,
        Err(err) => {
            let status = match err.downcast_ref::<StoreError>() {
                Some(store_err) if store_err.is_client_error() => EXIT_REJECTED,
                _ => EXIT_STORAGE,
            };
            error!(error = format!("{err:#}"), "command failed");
            ExitCode::from(status)
        }
    }
}

async fn run(config: CLI) -> anyhow::Result<ExitCode> {
    info!(
        storage_backend = %config.storage,
        slug_style = %config.slug_style,
        "opening link store"
    );

    let store = open_store(&config).await?;
    let base_url = config.base_url.as_deref();

    match config.command {
        Command::Add { long_url, code } => {
            let record = store.add(&long_url, code.as_deref()).await?;
            println!("{}", display_code(&record, base_url));
            Ok(ExitCode::SUCCESS)
        }
        Command::Get { code } => print_found(store.find_by_code(&code).await?, base_url),
        Command::Resolve { code } => print_found(store.resolve(&code).await?, base_url),
        Command::List {
            page,
            page_size,
            json,
        } => {
            let records = match page {
                Some(number) => store.list_page(Page::new(number, page_size)).await?,
                None => store.list_all().await?,
            };

            if json {
                let rendered = serde_json::to_string_pretty(&records)
                    .context("failed to render records as json")?;
                println!("{rendered}");
            } else {
                for record in &records {
                    println!("{}", render_record(record, base_url));
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Hit { code } => {
            store.record_hit(&code).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Delete { code } => {
            if store.delete(&code).await? {
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("no link stored under {code}");
                Ok(ExitCode::from(EXIT_NOT_FOUND))
            }
        }
    }
}

async fn open_store(config: &CLI) -> anyhow::Result<Arc<dyn LinkStore>> {
    let settings = match config.max_attempts {
        Some(max) => StoreSettings::builder().max_attempts(max as usize).build(),
        None => StoreSettings::builder().build(),
    };

    let store = match config.storage {
        StorageBackendArg::FlatFile => {
            let repository = FlatFileRepository::open(&config.file_path)
                .await
                .with_context(|| format!("failed to open {}", config.file_path.display()))?;
            with_generator(repository, config, settings)
        }
        StorageBackendArg::Sqlite => {
            let repository = SqliteRepository::open(&config.db_path)
                .await
                .with_context(|| format!("failed to open {}", config.db_path.display()))?;
            with_generator(repository, config, settings)
        }
    };

    Ok(store)
}

fn with_generator<R: Repository>(
    repository: R,
    config: &CLI,
    settings: StoreSettings,
) -> Arc<dyn LinkStore> {
    match config.slug_style {
        SlugStyleArg::Uid => {
            let generator = RandomGenerator::builder()
                .length(config.slug_length as usize)
                .build();
            Arc::new(LinkStoreService::with_settings(repository, generator, settings))
        }
        SlugStyleArg::Pair => {
            let generator = PairGenerator::builder()
                .fallback(
                    RandomGenerator::builder()
                        .length(config.slug_length as usize)
                        .build(),
                )
                .build();
            Arc::new(LinkStoreService::with_settings(repository, generator, settings))
        }
    }
}

fn print_found(record: Option<LinkRecord>, base_url: Option<&str>) -> anyhow::Result<ExitCode> {
    match record {
        Some(record) => {
            println!("{}", render_record(&record, base_url));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("no link stored under that code");
            Ok(ExitCode::from(EXIT_NOT_FOUND))
        }
    }
}

fn display_code(record: &LinkRecord, base_url: Option<&str>) -> String {
    match base_url {
        Some(base) => record.short_code.to_url(base),
        None => record.short_code.to_string(),
    }
}

fn render_record(record: &LinkRecord, base_url: Option<&str>) -> String {
    format!(
        "{}\t{}\t{}",
        display_code(record, base_url),
        record.long_url,
        record.hits
    )
}
