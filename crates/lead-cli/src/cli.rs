use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lead_types::UndatedPolicy;

#[derive(Parser)]
#[command(
    name = "leads",
    about = "Deduplicate lead records by id and email, keeping the newest",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deduplicate a leads document and write the result and change log
    Dedup(DedupArgs),
    /// Check that no id or email appears in more than one record
    Verify(VerifyArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

/// Matching options shared by every command. Flags override the config file.
#[derive(Args, Clone, Debug, Default)]
pub struct MatchArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Field holding the primary dedup key
    #[arg(long)]
    pub id_field: Option<String>,
    /// Field holding the secondary dedup key
    #[arg(long)]
    pub email_field: Option<String>,
    /// Field holding the entry date
    #[arg(long)]
    pub date_field: Option<String>,
    /// Trim and lowercase emails before matching
    #[arg(long)]
    pub normalize_email: bool,
    /// How records with a missing or unparsable entry date compare
    #[arg(long)]
    pub undated: Option<UndatedArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum UndatedArg {
    NeverNewer,
    Oldest,
}

impl From<UndatedArg> for UndatedPolicy {
    fn from(arg: UndatedArg) -> Self {
        match arg {
            UndatedArg::NeverNewer => UndatedPolicy::NeverNewer,
            UndatedArg::Oldest => UndatedPolicy::Oldest,
        }
    }
}

#[derive(Args)]
pub struct DedupArgs {
    /// Input document with a `leads` array
    #[arg(default_value = "leads.json")]
    pub input: PathBuf,
    /// Where to write the deduplicated leads
    #[arg(short, long, default_value = "dedupedLeads.json")]
    pub output: PathBuf,
    /// Where to write the change log
    #[arg(short, long, default_value = "log.json")]
    pub log: PathBuf,
    #[command(flatten)]
    pub matching: MatchArgs,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub file: PathBuf,
    #[command(flatten)]
    pub matching: MatchArgs,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub matching: MatchArgs,
}
