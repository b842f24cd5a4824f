use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use scribe_core::{BufferConfig, ConfigError, TextBuffer};
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, Result};
use crate::menu::Menu;

#[derive(Debug, Parser)]
#[command(
    name = "scribe",
    about = "Menu-driven text buffer with undo/redo history",
    version
)]
pub struct Cli {
    /// TOML buffer configuration.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// File to load before the menu starts.
    #[arg(long, value_name = "PATH")]
    pub open: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(cli, stdin.lock(), stdout.lock())
}

pub fn run(cli: Cli, input: impl BufRead, output: impl Write) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BufferConfig::default(),
    };

    let mut buffer = TextBuffer::with_config(config);
    if let Some(path) = &cli.open {
        buffer.load_from_file(path)?;
        // Opening is the starting point, not an undoable edit.
        buffer.clear_history();
    }

    tracing::info!(
        capacity = buffer.capacity(),
        length = buffer.len(),
        "scribe.start"
    );
    Menu::new(buffer, input, output).run()
}

pub fn load_config(path: &Path) -> Result<BufferConfig> {
    let wrap = |source| CliError::Config {
        path: path.to_path_buf(),
        source,
    };
    let config = BufferConfig::from_toml_file(path).map_err(wrap)?;
    let problems = config.validate();
    if !problems.is_empty() {
        return Err(wrap(ConfigError::Invalid(problems)));
    }
    Ok(config)
}

/// Install a stderr fmt subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed by an embedding test harness.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
