//! Tessera CLI: cache call recording and document-store utilities.
//!
//! `tessera [--config FILE] [--json] COMMAND`. Command output goes to stdout,
//! tracing output and errors to stderr.

mod commands;
mod config;
mod format;
mod parse;
mod value;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde_json::Value as JsonValue;
use tessera_cache::{Cache, KeyValueStore, MemoryStore, RedisStore, Replay, STORE_OPERATION};
use tessera_core::{Document, Value};
use tessera_docstore::{
    insert_school, list_all, schools_by_topic, top_students, update_topics, LogStats,
    MemoryCollection,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use config::{CacheBackend, CacheConfig, TesseraConfig, CONFIG_FILE_NAME};
use format::{
    format_cache_run, format_documents, format_error, format_inserted, format_log_stats,
    format_replay, format_update, OutputMode,
};
use parse::{matches_to_action, CliAction, SchoolsOp};

fn main() {
    let matches = build_cli().get_matches();
    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    if let Err(e) = run(&matches, mode) {
        eprintln!("{}", format_error(&e, mode));
        process::exit(1);
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load the config and install the tracing subscriber it asks for.
fn setup(config_path: Option<&Path>) -> Result<TesseraConfig> {
    let config = TesseraConfig::load(config_path)?;
    init_tracing(&config.log_level);
    Ok(config)
}

fn init_config(config_path: Option<&Path>) -> Result<String> {
    init_tracing("warn");
    let path = config_path.unwrap_or_else(|| Path::new(CONFIG_FILE_NAME));
    if TesseraConfig::write_default_if_missing(path)? {
        Ok(format!("Wrote {}", path.display()))
    } else {
        Ok(format!("{} already exists", path.display()))
    }
}

fn run(matches: &ArgMatches, mode: OutputMode) -> Result<()> {
    let action = matches_to_action(matches).map_err(anyhow::Error::msg)?;
    let config_path = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);

    let output = match action {
        CliAction::ConfigInit => init_config(config_path)?,
        CliAction::LogStats { logs, include_ips } => {
            let config = setup(config_path)?;
            let path = logs.unwrap_or(config.logs.path);
            let collection = open_collection(&path)?;
            let top_ips = include_ips.then_some(config.logs.top_ips);
            format_log_stats(&LogStats::collect_with(&collection, top_ips)?, mode)
        }
        CliAction::Schools { data, op } => {
            setup(config_path)?;
            debug!(data = %data.display(), ?op, "schools");
            run_schools(&data, op, mode)?
        }
        CliAction::TopStudents { data } => {
            setup(config_path)?;
            let collection = open_collection(&data)?;
            format_documents(&top_students(&collection)?, mode)
        }
        CliAction::CacheRun { values } => {
            let config = setup(config_path)?;
            run_cache(values, &config.cache, mode)?
        }
        CliAction::CacheReplay { operation } => {
            let config = setup(config_path)?;
            let store = open_store(&config.cache)?;
            format_replay(&Replay::load(&*store, &operation)?, mode)
        }
    };

    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

fn open_collection(path: &Path) -> Result<MemoryCollection> {
    MemoryCollection::load_json_lines(path)
        .with_context(|| format!("Failed to load collection '{}'", path.display()))
}

fn save_collection(collection: &MemoryCollection, path: &Path) -> Result<()> {
    collection
        .save_json_lines(path)
        .with_context(|| format!("Failed to save collection '{}'", path.display()))
}

fn run_schools(data: &Path, op: SchoolsOp, mode: OutputMode) -> Result<String> {
    match op {
        SchoolsOp::List => {
            let collection = open_collection(data)?;
            Ok(format_documents(&list_all(&collection)?, mode))
        }
        SchoolsOp::ByTopic(topic) => {
            let collection = open_collection(data)?;
            Ok(format_documents(&schools_by_topic(&collection, &topic)?, mode))
        }
        SchoolsOp::Insert {
            name,
            topics,
            fields,
        } => {
            // Inserting into a dump that does not exist yet starts a new one
            let collection = if data.exists() {
                open_collection(data)?
            } else {
                MemoryCollection::new()
            };
            let mut doc = Document::new();
            doc.insert("name".to_string(), JsonValue::String(name));
            for (key, value) in fields {
                doc.insert(key, JsonValue::String(value));
            }
            doc.insert(
                "topics".to_string(),
                JsonValue::Array(topics.into_iter().map(JsonValue::String).collect()),
            );
            let id = insert_school(&collection, doc)?;
            save_collection(&collection, data)?;
            Ok(format_inserted(&id, mode))
        }
        SchoolsOp::UpdateTopics { name, topics } => {
            let collection = open_collection(data)?;
            let result = update_topics(&collection, &name, &topics)?;
            if result.modified > 0 {
                save_collection(&collection, data)?;
            }
            Ok(format_update(&result, mode))
        }
    }
}

fn open_store(config: &CacheConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        CacheBackend::Redis => {
            let store = RedisStore::connect(&config.url)
                .with_context(|| format!("Failed to connect to '{}'", config.url))?;
            Ok(Arc::new(store))
        }
        CacheBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

fn run_cache(values: Vec<Value>, config: &CacheConfig, mode: OutputMode) -> Result<String> {
    let store = open_store(config)?;
    let mut builder = Cache::builder(Arc::clone(&store));
    if config.count_calls {
        builder = builder.count_calls();
    }
    if config.call_history {
        builder = builder.call_history();
    }
    let cache = builder.build()?;

    let keys = values
        .into_iter()
        .map(|value| cache.store(value))
        .collect::<tessera_core::Result<Vec<_>>>()?;

    let history = if config.call_history {
        Some(Replay::load(&*store, STORE_OPERATION)?)
    } else {
        None
    };
    Ok(format_cache_run(&keys, history.as_ref(), mode))
}
