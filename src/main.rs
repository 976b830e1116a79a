//! Main entry point for the `elo` command line tool
//!
//! Resolves configuration and the current competition once, then hands
//! them to the history service for the requested command.

use anyhow::Result;
use clap::{Parser, Subcommand};
use elo_ladder::chart::{self, DEFAULT_CHART_WIDTH};
use elo_ladder::config::{self, AppConfig, JsonStateStore, StateStore};
use elo_ladder::history::{
    AutoConfirm, Confirmation, FileMatchLogStore, HistoryService, MatchOutcome,
    PromptConfirmation,
};
use elo_ladder::rating::EloRatingCalculator;
use elo_ladder::report;
use elo_ladder::types::Competition;
use elo_ladder::utils::SystemClock;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{debug, error, info};

/// Elo ratings for table tennis, pool, darts or anything else played one on one
#[derive(Parser)]
#[command(
    name = "elo",
    version,
    about = "Keep Elo ratings for one-on-one competitions",
    long_about = "Records match results in a flat log per competition and derives every \
                 rating from that log, so rankings, charts and undo are always consistent \
                 with the recorded history."
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, global = true, value_name = "DIR", help = "Override the data directory")]
    data_dir: Option<PathBuf>,

    /// Competition override
    #[arg(
        short = 'C',
        long,
        global = true,
        value_name = "NAME",
        help = "Use this competition instead of the current one"
    )]
    competition: Option<String>,

    /// Log level override
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Create new players without asking
    #[arg(short, long, global = true, help = "Create new players without asking")]
    yes: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Record that WINNER beat LOSER today
    Match { winner: String, loser: String },
    /// Remove the most recently recorded match
    Undo,
    /// Show players ordered by rating
    Ranking,
    /// Create a competition and make it current
    Start {
        /// Competition name (letters, digits, '-' and '_')
        name: String,
    },
    /// Switch to an existing competition
    Change {
        /// Competition name
        name: String,
    },
    /// List all competitions
    List,
    /// Show rating history as a live chart
    Graph {
        /// Draw a single frame and exit
        #[arg(long)]
        once: bool,
        /// Number of most recent points shown per player
        #[arg(long, default_value_t = DEFAULT_CHART_WIDTH)]
        width: usize,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if let Some(data_dir) = &args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    if args.yes {
        config.interaction.auto_confirm_new_players = true;
    }

    config::validate_config(&config)?;
    Ok(config)
}

/// Completes when Ctrl+C is pressed
async fn wait_for_shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn run(args: Args, config: AppConfig) -> Result<()> {
    let state: Arc<dyn StateStore> = Arc::new(JsonStateStore::new(config.state_file()));
    let service = HistoryService::new(
        Arc::new(FileMatchLogStore::new(config.match_history_dir())),
        Arc::new(EloRatingCalculator::default()),
        Arc::new(SystemClock),
    );

    let explicit = args
        .competition
        .as_deref()
        .map(Competition::new)
        .transpose()?;

    match args.command {
        Command::Match { winner, loser } => {
            let competition = config::resolve_competition(explicit, state.as_ref())?;
            let confirmation: Box<dyn Confirmation> = if config.interaction.auto_confirm_new_players
            {
                Box::new(AutoConfirm::yes())
            } else {
                Box::new(PromptConfirmation::stdio())
            };

            match service.record_match(&competition, &winner, &loser, confirmation.as_ref())? {
                MatchOutcome::Recorded(recorded) => {
                    print!("{}", report::format_recorded_match(&recorded));
                }
                MatchOutcome::Declined { player } => {
                    println!("Match not recorded: player '{}' was not created", player);
                }
            }
        }
        Command::Undo => {
            let competition = config::resolve_competition(explicit, state.as_ref())?;
            match service.undo_last(&competition)? {
                Some(removed) => println!("Removed: {}", removed),
                None => println!("No matches to undo in {}", competition),
            }
        }
        Command::Ranking => {
            let competition = config::resolve_competition(explicit, state.as_ref())?;
            print!("{}", report::format_ranking(&service.rank(&competition)?));
        }
        Command::Start { name } => {
            let competition = Competition::new(&name)?;
            if service.create_competition(&competition)? {
                println!("Started competition {}", competition);
            } else {
                println!("Competition {} already exists, switched to it", competition);
            }
            config::set_current_competition(state.as_ref(), &competition)?;
        }
        Command::Change { name } => {
            let competition = Competition::new(&name)?;
            service.ensure_competition(&competition)?;
            config::set_current_competition(state.as_ref(), &competition)?;
            println!("Switched to competition {}", competition);
        }
        Command::List => {
            let current = config::current_competition(state.as_ref())?;
            print!(
                "{}",
                report::format_competitions(&service.competitions()?, current.as_ref())
            );
        }
        Command::Graph { once, width } => {
            let competition = config::resolve_competition(explicit, state.as_ref())?;
            info!(
                "Charting {} every {}ms",
                competition, config.interaction.graph_interval_ms
            );

            let frames = chart::watch(
                &service,
                &competition,
                config.graph_interval(),
                once.then_some(1),
                |series| {
                    let mut stdout = std::io::stdout().lock();
                    if !once {
                        // clear screen, cursor home
                        write!(stdout, "\x1B[2J\x1B[H")?;
                    }
                    write!(stdout, "{}", chart::render_chart(&competition, series, width))?;
                    stdout.flush()?;
                    Ok(())
                },
                wait_for_shutdown_signal(),
            )
            .await?;
            debug!("Chart closed after {} frames", frames);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    debug!("Using data directory {}", config.storage.data_dir.display());

    if let Err(e) = run(args, config).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
