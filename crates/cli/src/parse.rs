//! ArgMatches → CliAction conversion.

use std::path::PathBuf;

use clap::ArgMatches;
use tessera_core::Value;

use crate::value::{parse_field, parse_values};

/// The result of parsing the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    /// Print the access-log report.
    LogStats {
        logs: Option<PathBuf>,
        include_ips: bool,
    },
    /// Operate on a school collection dump.
    Schools { data: PathBuf, op: SchoolsOp },
    /// Rank the students of a collection dump.
    TopStudents { data: PathBuf },
    /// Store values through a recording cache.
    CacheRun { values: Vec<Value> },
    /// Print the recorded history of an operation.
    CacheReplay { operation: String },
    /// Write the default config file.
    ConfigInit,
}

/// School collection operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SchoolsOp {
    List,
    ByTopic(String),
    Insert {
        name: String,
        topics: Vec<String>,
        fields: Vec<(String, String)>,
    },
    UpdateTopics {
        name: String,
        topics: Vec<String>,
    },
}

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default()
}

fn required(matches: &ArgMatches, id: &str) -> Result<String, String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| format!("Missing argument '{}'", id))
}

fn data_path(matches: &ArgMatches) -> Result<PathBuf, String> {
    matches
        .get_one::<PathBuf>("data")
        .cloned()
        .ok_or_else(|| "Missing --data".to_string())
}

/// Convert top-level matches into an action.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    match matches.subcommand() {
        Some(("log-stats", sub)) => Ok(CliAction::LogStats {
            logs: sub.get_one::<PathBuf>("logs").cloned(),
            include_ips: !sub.get_flag("no-ips"),
        }),
        Some(("schools", sub)) => parse_schools(sub),
        Some(("students", sub)) => match sub.subcommand() {
            Some(("top", top)) => Ok(CliAction::TopStudents {
                data: data_path(top)?,
            }),
            _ => Err("Unknown students subcommand".to_string()),
        },
        Some(("cache", sub)) => parse_cache(sub),
        Some(("config", sub)) => match sub.subcommand() {
            Some(("init", _)) => Ok(CliAction::ConfigInit),
            _ => Err("Unknown config subcommand".to_string()),
        },
        Some((name, _)) => Err(format!("Unknown command '{}'", name)),
        None => Err("No command given".to_string()),
    }
}

fn parse_schools(matches: &ArgMatches) -> Result<CliAction, String> {
    let (op, sub) = match matches.subcommand() {
        Some(("list", sub)) => (SchoolsOp::List, sub),
        Some(("by-topic", sub)) => (SchoolsOp::ByTopic(required(sub, "topic")?), sub),
        Some(("insert", sub)) => {
            let fields = strings(sub, "field")
                .iter()
                .map(|f| parse_field(f))
                .collect::<Result<Vec<_>, _>>()?;
            let op = SchoolsOp::Insert {
                name: required(sub, "name")?,
                topics: strings(sub, "topic"),
                fields,
            };
            (op, sub)
        }
        Some(("update-topics", sub)) => {
            let op = SchoolsOp::UpdateTopics {
                name: required(sub, "name")?,
                topics: strings(sub, "topics"),
            };
            (op, sub)
        }
        _ => return Err("Unknown schools subcommand".to_string()),
    };
    Ok(CliAction::Schools {
        data: data_path(sub)?,
        op,
    })
}

fn parse_cache(matches: &ArgMatches) -> Result<CliAction, String> {
    match matches.subcommand() {
        Some(("run", sub)) => Ok(CliAction::CacheRun {
            values: parse_values(&strings(sub, "values"), sub.get_flag("text")),
        }),
        Some(("replay", sub)) => Ok(CliAction::CacheReplay {
            operation: required(sub, "operation")?,
        }),
        _ => Err("Unknown cache subcommand".to_string()),
    }
}
