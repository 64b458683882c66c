use std::path::PathBuf;

use clap::{Parser, Subcommand};
use config::{Limit, RowOrder};

#[derive(Debug, Parser)]
#[command(name = "workbench", version, about = "Alert workbench aggregations over exported query data")]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, env = "WORKBENCH_CONFIG_PATH")]
    pub config: Option<PathBuf>,
    /// Log filter, e.g. "info" or "workbench=debug,triage=debug"
    #[arg(long, global = true, env = "WORKBENCH_LOG", default_value = "info")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Group the alert rules of a data frame into the workbench tree
    Rows {
        /// Data frame JSON (one frame or an array of frames), `-` for stdin
        input: PathBuf,
        /// Grouping label, outermost first. Repeat for nested levels
        #[arg(long = "group-by", value_name = "KEY")]
        group_by: Vec<String>,
        /// Row order: first-seen or alphabetical
        #[arg(long)]
        order: Option<RowOrder>,
    },
    /// Rank the label keys and values of active alert instances
    Labels {
        /// JSON array of label maps, `-` for stdin
        input: PathBuf,
        /// Number of label keys to keep, or "unbounded"
        #[arg(long)]
        max_keys: Option<Limit>,
        /// Number of values to keep per key, or "unbounded"
        #[arg(long)]
        max_values: Option<Limit>,
    },
}
