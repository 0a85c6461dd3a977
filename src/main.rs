use anyhow::{Context, Result};
use clap::Parser;
use snake_stats::game::{GameConfig, GameMode};
use snake_stats::modes::{HumanMode, StatsMode};
use snake_stats::session::{DEFAULT_DATA_FILE, SessionStore, SessionWorker};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_stats")]
#[command(version, about = "Snake game with session history and analytics")]
struct Cli {
    /// Mode that Enter starts on the intro screen
    #[arg(long)]
    game_mode: Option<GameMode>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between game ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// JSON game configuration; flags above override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session history file
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    /// Log file (the terminal belongs to the game)
    #[arg(long, default_value = "logs/snake.log")]
    log_file: PathBuf,

    /// Print statistics for the history file and exit
    #[arg(long)]
    print_stats: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GameConfig::default(),
        };

        if let Some(mode) = self.game_mode {
            config.mode = mode;
        }
        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse config {:?}", path))
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {:?}", parent))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    if cli.print_stats {
        let mut stdout = std::io::stdout();
        return StatsMode::new(&cli.data_file).run(&mut stdout);
    }

    let config = cli.game_config()?;
    info!(
        width = config.grid_width,
        height = config.grid_height,
        mode = config.mode.as_str(),
        data_file = %cli.data_file.display(),
        "starting"
    );

    // History loads in the background while the intro screen is up
    let worker = SessionWorker::spawn(SessionStore::new(&cli.data_file));
    let mut human_mode = HumanMode::new(config, worker.submitter(), worker.snapshot());
    let result = human_mode.run().await;

    // Let queued session writes finish before exiting
    worker
        .shutdown()
        .await
        .context("Session worker panicked")?;

    result
}
