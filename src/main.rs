//! `client-pulse`: client portfolio dashboard backed by NocoDB or Google Sheets.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialize logging.
//! 2. Load config ([`config::load_config`]) and apply environment overrides.
//! 3. Fetch raw rows from the selected data source ([`source::fetch_batch`]), falling back
//!    from NocoDB to Google Sheets in `auto` mode.
//! 4. Normalize rows into client records ([`normalize`]).
//! 5. Filter ([`filter`]) and aggregate ([`aggregate::summarize`]).
//! 6. Render the requested report ([`report`]), or talk to the assistant ([`chat`]).
//! 7. Exit `1` when the data cannot be loaded.

mod aggregate;
mod chat;
mod cli;
mod config;
mod csv_line;
mod error;
mod filter;
mod models;
mod normalize;
mod report;
mod source;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use reqwest::Client;
use tokio::io::{AsyncBufReadExt, BufReader};

use chat::{ChatSession, FALLBACK_REPLY};
use cli::{ChatArgs, Cli, ClientsArgs, Command, DashboardArgs, ReportFormat};
use config::{load_config, Config, SourceChoice};
use filter::{unique_groups, ClientFilter};
use models::{ClientRecord, DataSource};
use normalize::record::normalize_batch;
use report::Dashboard;
use source::{fetch_batch, FetchOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let working_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    let config = load_config(&working_dir, cli.config.as_deref())?;

    let choice = cli
        .source
        .as_ref()
        .map(SourceChoice::from)
        .unwrap_or(config.source.default);
    log::info!("data source: {choice:?}");

    let client = Client::builder()
        .timeout(Duration::from_secs(config.refresh.timeout_secs))
        .build()?;

    match &cli.command {
        Command::Dashboard(args) => run_dashboard(&cli, args, &config, &client, choice).await,
        Command::Clients(args) => run_clients(&cli, args, &config, &client, choice).await,
        Command::Chat(args) => run_chat(args, &config, client).await,
    }
}

/// Fetch from the selected source and normalize every row.
async fn load_records(
    cli: &Cli,
    config: &Config,
    client: &Client,
    choice: SourceChoice,
) -> Result<(DataSource, Vec<ClientRecord>)> {
    let opts = FetchOptions {
        quiet: cli.quiet,
        seed: cli.seed,
    };
    let batch = fetch_batch(client, config, choice, opts)
        .await
        .context("Failed to load client data")?;

    let records = normalize_batch(&batch.rows, batch.source.default_group());
    log::info!("{} record(s) from {}", records.len(), batch.source);

    if !cli.quiet {
        eprintln!(
            "  {} {} {} client(s)",
            "→".cyan(),
            batch.source,
            records.len()
        );
    }
    Ok((batch.source, records))
}

async fn run_dashboard(
    cli: &Cli,
    args: &DashboardArgs,
    config: &Config,
    client: &Client,
    choice: SourceChoice,
) -> Result<()> {
    render_dashboard(cli, args, config, client, choice).await?;
    if !args.watch {
        return Ok(());
    }

    let period = Duration::from_secs(config.refresh.interval_secs.max(1));
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("watch interrupted");
                return Ok(());
            }
        }

        // A failed refresh keeps the loop alive; the next tick retries.
        if let Err(err) = render_dashboard(cli, args, config, client, choice).await {
            log::warn!("refresh failed: {err:#}");
            eprintln!("  {} Refresh failed: {:#}", "✗".red(), err);
        }
    }
}

async fn render_dashboard(
    cli: &Cli,
    args: &DashboardArgs,
    config: &Config,
    client: &Client,
    choice: SourceChoice,
) -> Result<()> {
    let (source, records) = load_records(cli, config, client, choice).await?;

    let filter = ClientFilter::new(args.squad.clone(), None, None);
    warn_unknown_squad(&filter, &records, cli.quiet);
    let selected = filter.apply(&records);
    let stats = aggregate::summarize(&selected);

    let dashboard = Dashboard {
        source,
        squad: filter.group_label(),
        generated_at: report::timestamp(),
        stats: &stats,
    };

    // --pdf implies PDF format
    let report_format = match &args.pdf {
        Some(_) => ReportFormat::Pdf,
        None => args.report.clone(),
    };

    match report_format {
        ReportFormat::Terminal => {
            if args.watch && !cli.quiet {
                // Clear screen and move the cursor home
                print!("\x1B[2J\x1B[1;1H");
            }
            report::terminal::render_dashboard(&dashboard, cli.quiet);
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
        }
        ReportFormat::Pdf => {
            let pdf_path = args
                .pdf
                .clone()
                .unwrap_or_else(|| PathBuf::from("client-pulse.pdf"));
            report::pdf::render(&dashboard, &selected, &pdf_path)?;
        }
    }

    if let Some(chart_path) = &args.chart {
        report::chart::render(&stats, chart_path)
            .with_context(|| format!("Failed to write chart to {}", chart_path.display()))?;
    }

    Ok(())
}

async fn run_clients(
    cli: &Cli,
    args: &ClientsArgs,
    config: &Config,
    client: &Client,
    choice: SourceChoice,
) -> Result<()> {
    let (source, records) = load_records(cli, config, client, choice).await?;

    let filter = ClientFilter::new(
        args.squad.clone(),
        args.search.clone(),
        args.status.as_ref().map(Into::into),
    );
    warn_unknown_squad(&filter, &records, cli.quiet);
    let selected = filter.apply(&records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
    } else {
        report::terminal::render_clients(
            &selected,
            source,
            &filter,
            &report::timestamp(),
            cli.quiet,
        );
    }
    Ok(())
}

fn warn_unknown_squad(filter: &ClientFilter, records: &[ClientRecord], quiet: bool) {
    let Some(group) = &filter.group else {
        return;
    };
    let groups = unique_groups(records);
    if quiet || groups.iter().any(|g| g == group) {
        return;
    }
    eprintln!(
        "  {} No squad named '{}'. Available: {}",
        "⚠".yellow(),
        group,
        groups.join(", ")
    );
}

async fn run_chat(args: &ChatArgs, config: &Config, client: Client) -> Result<()> {
    let webhook_url = config
        .chat
        .webhook_url
        .as_deref()
        .context("Chat is not configured: set [chat] webhook_url or CHAT_WEBHOOK_URL")?;
    let session = ChatSession::new(client, webhook_url);
    log::info!("chat session {}", session.session_id());

    if let Some(message) = &args.message {
        let reply = session.send(message).await?;
        println!("{}", reply);
        return Ok(());
    }

    eprintln!(
        "  {} Ask about the portfolio. Type {} or press Ctrl-D to quit.\n",
        "💬".cyan(),
        "exit".bold()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "you>".green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("exit") {
            break;
        }

        match session.send(message).await {
            Ok(reply) => println!("{} {}\n", "bot>".cyan().bold(), reply),
            Err(err) => {
                log::warn!("chat request failed: {err:#}");
                eprintln!("  {} {:#}", "✗".red(), err);
                println!("{} {}\n", "bot>".cyan().bold(), FALLBACK_REPLY);
            }
        }
    }
    Ok(())
}
