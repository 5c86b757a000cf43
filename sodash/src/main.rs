//! Entry point for the sodash TUI. Parses args, resolves the backend and runs the App.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sodash::api::ApiClient;
use sodash::app::App;
use sodash::config::{self, ConfigFile, PollingConfig, ProfileRequest, Resolution, UrlSource};

#[derive(Parser, Debug)]
#[command(name = "sodash")]
#[command(version)]
#[command(about = "Terminal dashboard for an OS monitoring REST API", long_about = None)]
struct Cli {
    /// Backend base URL, e.g. http://localhost:5000
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Named profile to load, or to create when a URL is also given
    #[arg(short = 'P', long, value_name = "NAME")]
    profile: Option<String>,

    /// Overwrite an existing profile with the given URL
    #[arg(long)]
    save: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "SODASH_CONFIG")]
    config: Option<PathBuf>,

    /// Poll every card at this interval instead of its configured one
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Per-request timeout (defaults to each card's interval)
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Print the effective settings and exit
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbosity: u8) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // The terminal belongs to the UI, so logs go to a file
    let log_dir = dirs_next::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sodash")
        .join("logs");

    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log dir {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "sodash.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}

fn print_settings(path: &std::path::Path, cfg: &ConfigFile, res: &Resolution) {
    let source = match &res.source {
        UrlSource::Cli => "command line".to_string(),
        UrlSource::Profile(name) => format!("profile '{name}'"),
        UrlSource::Default => "default".to_string(),
    };
    let p = &cfg.polling;
    println!("url: {} ({source})", res.url);
    println!("config: {}", path.display());
    println!(
        "intervals (ms): cpu={} memory={} processes={} status={} totals={} filesystem={} directory={} process_io={}",
        p.cpu_ms,
        p.memory_ms,
        p.processes_ms,
        p.status_ms,
        p.totals_ms,
        p.filesystem_ms,
        p.directory_ms,
        p.process_io_ms
    );
    match p.request_timeout_ms {
        Some(ms) => println!("request timeout (ms): {ms}"),
        None => println!("request timeout: per-card interval"),
    }
    println!(
        "history: {} points, summary: {} points",
        p.history_points, p.summary_points
    );
    println!(
        "table: page size {}, load more +{}",
        cfg.table.page_size, cfg.table.page_increment
    );
    let names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        println!("profiles: (none)");
    } else {
        println!("profiles: {}", names.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive for the duration of the program
    let _logging_guard = if cli.dry_run {
        None
    } else {
        Some(setup_logging(cli.verbose)?)
    };

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let mut cfg = config::load_config(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let req = ProfileRequest {
        profile_name: cli.profile.clone(),
        url: cli.url.clone(),
        save: cli.save,
    };
    let resolution = req.resolve(&mut cfg)?;
    if resolution.dirty {
        config::save_config(&config_path, &cfg)?;
        info!(profile = ?cli.profile, url = %resolution.url, "profile saved");
    }

    // Overrides apply to this run only and are never written back
    let mut effective = cfg.clone();
    if let Some(ms) = cli.interval_ms {
        effective.polling.override_all(ms);
    }
    if let Some(ms) = cli.timeout_ms {
        effective.polling.request_timeout_ms = Some(ms);
    }

    if cli.dry_run {
        print_settings(&config_path, &effective, &resolution);
        return Ok(());
    }

    let client = ApiClient::new(&resolution.url)
        .with_context(|| format!("building client for {}", resolution.url))?;
    info!(
        url = %resolution.url,
        cpu_every = ?PollingConfig::every(effective.polling.cpu_ms),
        "starting dashboard"
    );

    let mut app = App::new(client, effective);
    app.run().await
}
