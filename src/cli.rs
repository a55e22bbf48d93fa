use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::SourceChoice;
use crate::models::Status;

#[derive(Parser, Debug)]
#[command(
    name = "client-pulse",
    about = "Client portfolio dashboard backed by NocoDB or Google Sheets",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file [default: ./.client-pulse/config.toml, fallback ~/.config/client-pulse/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data source; `auto` tries NocoDB and falls back to Google Sheets
    #[arg(long, global = true, value_name = "SOURCE")]
    pub source: Option<SourceArg>,

    /// Seed for the demo source
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Log fetch details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print summary lines
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Metric cards, status breakdown and per-squad metrics
    Dashboard(DashboardArgs),
    /// List clients, optionally filtered
    Clients(ClientsArgs),
    /// Ask the assistant webhook about the portfolio
    Chat(ChatArgs),
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Only include one squad (`todos` for all)
    #[arg(long)]
    pub squad: Option<String>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// PDF output path; use without value to default to client-pulse.pdf
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "client-pulse.pdf")]
    pub pdf: Option<PathBuf>,

    /// Also write a PNG with the status pie and fee-by-squad chart
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "client-pulse.png")]
    pub chart: Option<PathBuf>,

    /// Keep refreshing until interrupted
    #[arg(long)]
    pub watch: bool,
}

#[derive(Args, Debug)]
pub struct ClientsArgs {
    /// Only list one squad (`todos` for all)
    #[arg(long)]
    pub squad: Option<String>,

    /// Case-insensitive search on the client name
    #[arg(long)]
    pub search: Option<String>,

    /// Only list clients with this status
    #[arg(long, value_name = "STATUS")]
    pub status: Option<StatusArg>,

    /// Print records as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Send a single message and exit; without it an interactive prompt starts
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum SourceArg {
    Auto,
    Nocodb,
    Sheets,
    Demo,
}

impl From<&SourceArg> for SourceChoice {
    fn from(arg: &SourceArg) -> Self {
        match arg {
            SourceArg::Auto => SourceChoice::Auto,
            SourceArg::Nocodb => SourceChoice::NocoDb,
            SourceArg::Sheets => SourceChoice::Sheets,
            SourceArg::Demo => SourceChoice::Demo,
        }
    }
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum StatusArg {
    Safe,
    Care,
    Danger,
    #[value(name = "aviso-previo")]
    AvisoPrevio,
    #[value(name = "implementacao")]
    Implementacao,
}

impl From<&StatusArg> for Status {
    fn from(arg: &StatusArg) -> Self {
        match arg {
            StatusArg::Safe => Status::Safe,
            StatusArg::Care => Status::Care,
            StatusArg::Danger => Status::Danger,
            StatusArg::AvisoPrevio => Status::NoticePending,
            StatusArg::Implementacao => Status::InImplementation,
        }
    }
}
