use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use greeting_core::model::GreetingConfig;
use services::{AppServices, AudioBackend, Clock, QuizService, StageController};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, WebAudio, build_app_context};

mod config;
mod db;

/// Quiz-gated greeting card: countdown, quiz, story slideshow, reveal.
#[derive(Parser, Debug)]
#[command(name = "greeting", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Greeting document (TOML). Defaults to the bundled one.
    #[arg(long, global = true, env = "GREETING_CONFIG")]
    config: Option<PathBuf>,

    /// Progress database. Defaults to the platform data directory.
    #[arg(long, global = true, env = "GREETING_DB_URL")]
    db: Option<String>,

    /// Pretend the current time is this instant (RFC 3339).
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Open the greeting window (default).
    Ui,
    /// Validate the greeting document and print a summary.
    Check,
    /// Show the persisted progress flags.
    Status,
    /// Forget that the quiz was passed and the countdown skipped.
    Reset,
}

struct DesktopApp {
    services: AppServices,
    audio: Arc<dyn AudioBackend>,
}

impl UiApp for DesktopApp {
    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn config(&self) -> Arc<GreetingConfig> {
        self.services.config()
    }

    fn stages(&self) -> Arc<StageController> {
        self.services.stages()
    }

    fn quiz(&self) -> Arc<QuizService> {
        self.services.quiz()
    }

    fn audio(&self) -> Arc<dyn AudioBackend> {
        Arc::clone(&self.audio)
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Open the progress store. A database that cannot be opened degrades to
/// memory so the greeting still plays; progress just won't survive a restart.
async fn open_storage(db: Option<&str>) -> Storage {
    let url = db
        .map(db::normalize_sqlite_url)
        .or_else(db::default_db_url)
        .unwrap_or_else(|| db::MEMORY_URL.to_string());

    let opened = async {
        db::prepare_sqlite_file(&url)?;
        Storage::sqlite(&url)
            .await
            .with_context(|| format!("opening {url}"))
    }
    .await;

    match opened {
        Ok(storage) => {
            tracing::info!(%url, "progress database ready");
            storage
        }
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "falling back to in-memory progress");
            Storage::in_memory()
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let greeting = config::load(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Ui);

    if command == Commands::Check {
        println!("{}", config::summary(&greeting));
        return Ok(());
    }

    let clock = cli.now.map_or_else(Clock::system, Clock::fixed);
    let storage = open_storage(cli.db.as_deref()).await;
    let services = AppServices::new(&storage, clock, greeting);

    match command {
        Commands::Status => {
            let flags = services.progress().snapshot().await?;
            if flags.is_empty() {
                println!("no progress recorded");
            }
            for flag in flags {
                println!("{} = {} ({})", flag.key, flag.value, flag.updated_at.to_rfc3339());
            }
            Ok(())
        }
        Commands::Reset => {
            let cleared = services.progress().reset().await?;
            println!("cleared {cleared} flag(s)");
            Ok(())
        }
        Commands::Ui | Commands::Check => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                audio: Arc::new(WebAudio::new()),
            });
            let context = build_app_context(&app);

            // Some tao setups default to always-on-top; keep it a normal window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("For you")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}
