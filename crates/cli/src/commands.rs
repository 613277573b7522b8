//! Clap command tree definition.

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("tessera")
        .about("Cache call recording and document-store utilities")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file (default: ./tessera.toml)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_log_stats())
        .subcommand(build_schools())
        .subcommand(build_students())
        .subcommand(build_cache())
        .subcommand(build_config())
}

fn data_arg() -> Arg {
    Arg::new("data")
        .long("data")
        .help("JSON-lines collection dump")
        .value_parser(value_parser!(PathBuf))
}

fn build_log_stats() -> Command {
    Command::new("log-stats")
        .about("Print access-log statistics")
        .arg(
            Arg::new("logs")
                .long("logs")
                .help("JSON-lines log dump (default: [logs] path from config)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("no-ips")
                .long("no-ips")
                .help("Omit the top addresses section")
                .action(ArgAction::SetTrue),
        )
}

fn build_schools() -> Command {
    Command::new("schools")
        .about("School records")
        .subcommand_required(true)
        .arg(data_arg().global(true))
        .subcommand(Command::new("list").about("List every school"))
        .subcommand(
            Command::new("by-topic")
                .about("Schools teaching a topic")
                .arg(Arg::new("topic").required(true)),
        )
        .subcommand(
            Command::new("insert")
                .about("Insert a school and print its id")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("topic")
                        .long("topic")
                        .help("Topic label (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("field")
                        .long("field")
                        .help("Extra KEY=VALUE field (repeatable)")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("update-topics")
                .about("Replace the topics of every school with this name")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("topics").num_args(0..).action(ArgAction::Append)),
        )
}

fn build_students() -> Command {
    Command::new("students")
        .about("Student records")
        .subcommand_required(true)
        .arg(data_arg().global(true))
        .subcommand(Command::new("top").about("Students ranked by average score"))
}

fn build_cache() -> Command {
    Command::new("cache")
        .about("Value cache with call recording")
        .subcommand_required(true)
        .subcommand(
            Command::new("run")
                .about("Flush the store, cache each value, print keys and history")
                .arg(
                    Arg::new("values")
                        .required(true)
                        .num_args(1..)
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("text")
                        .long("text")
                        .help("Store every value as text")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("replay")
                .about("Print the recorded history of an operation")
                .arg(Arg::new("operation").default_value("Cache.store")),
        )
}

fn build_config() -> Command {
    Command::new("config")
        .about("Configuration file")
        .subcommand_required(true)
        .subcommand(Command::new("init").about("Write the default config file if missing"))
}
