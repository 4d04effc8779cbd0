use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};
use web_monitor::{
    config::{Config, TargetConfig, check_url, read_config_file},
    monitor::Monitor,
    probe::HttpProbe,
    render::LogRender,
    scheduler::Scheduler,
    util::{get_config_path, get_log_file},
};

#[derive(Debug, Clone, Parser)]
#[command(name = "web-monitor")]
#[command(about = "Console application for website availability & performance monitoring")]
struct Args {
    /// Config file (defaults to $WEB_MONITOR_CONFIG or ./config.json)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Website to monitor instead of the config file's list (repeatable)
    #[arg(short = 'w', long = "website", value_name = "URL", value_parser = parse_url)]
    websites: Vec<String>,

    /// Probe interval in seconds, one per --website
    #[arg(short = 'i', long = "interval", value_name = "SECS")]
    intervals: Vec<u64>,

    /// Log snapshots instead of drawing the dashboard
    #[arg(long)]
    headless: bool,

    /// Log file used while the dashboard is shown
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn parse_url(value: &str) -> Result<String, String> {
    check_url(value)
        .map(|_| value.to_string())
        .map_err(|e| e.to_string())
}

fn init(log_file: Option<&Path>) -> Result<()> {
    let filter = filter::Targets::new().with_target("web_monitor", LevelFilter::DEBUG);

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .compact()
                    .with_ansi(false),
            )
            .with(filter)
            .init();
        return Ok(());
    };

    // stdout belongs to the dashboard
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
    Ok(())
}

#[cfg(feature = "dashboard")]
fn default_log_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("web-monitor")
        .join("monitor.log")
}

#[cfg(not(feature = "dashboard"))]
fn default_log_file() -> PathBuf {
    PathBuf::from("web-monitor.log")
}

fn load_config(args: &Args) -> Result<Config> {
    let path = args.file.clone().unwrap_or_else(get_config_path);

    if args.websites.is_empty() {
        if !args.intervals.is_empty() {
            bail!("--interval requires a matching --website");
        }
        return read_config_file(&path);
    }

    // Ad-hoc targets keep the remaining settings of an existing config file
    let mut config = if args.file.is_some() || path.exists() {
        read_config_file(&path)?
    } else {
        Config::for_targets(vec![])
    };

    if !args.intervals.is_empty() && args.intervals.len() != args.websites.len() {
        bail!(
            "{} websites but {} intervals given",
            args.websites.len(),
            args.intervals.len()
        );
    }

    config.monitor = args
        .websites
        .iter()
        .enumerate()
        .map(|(i, website)| TargetConfig::new(website.clone(), args.intervals.get(i).copied()))
        .collect();

    Ok(config)
}

async fn run(mut monitor: Monitor) -> Result<()> {
    let mut scheduler = Scheduler::new();
    monitor.schedule(&mut scheduler)?;

    tokio::select! {
        _ = scheduler.run(&mut monitor) => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl-C")?;
            info!("received Ctrl-C, shutting down");
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let headless = args.headless || cfg!(not(feature = "dashboard"));
    let log_file = (!headless).then(|| {
        args.log_file
            .clone()
            .or_else(get_log_file)
            .unwrap_or_else(default_log_file)
    });
    init(log_file.as_deref())?;
    trace!("started with args: {args:?}");

    let config = load_config(&args)?;
    let probe = Box::new(HttpProbe::new(config.probe_timeout())?);

    if headless {
        let monitor = Monitor::from_config(&config, probe, Box::new(LogRender::new()))?;
        return run(monitor).await;
    }

    #[cfg(feature = "dashboard")]
    {
        use web_monitor::dashboard::{Dashboard, ScreenGuard};

        let monitor = Monitor::from_config(&config, probe, Box::new(Dashboard::stdout()?))?;
        let _screen = ScreenGuard::enter()?;
        run(monitor).await?;
    }

    Ok(())
}
