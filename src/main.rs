use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tmux_tui::config::{self, Config};
use tmux_tui::tmux::{Multiplexer, Tmux};
use tmux_tui::{VERSION, tui};

#[derive(Parser)]
#[command(
    name = "tmux-tui",
    version = VERSION,
    about = "Browse and manage tmux sessions, windows and panes"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[command(flatten)]
    overrides: Overrides,
}

/// Flags that take precedence over config.toml.
#[derive(Args)]
struct Overrides {
    /// List windows and panes of every session, not just the selected one
    #[arg(short = 'a', long, global = true)]
    show_all: bool,
    /// tmux binary to run
    #[arg(long = "tmux", global = true)]
    tmux_binary: Option<String>,
    /// Milliseconds between refreshes
    #[arg(long = "tick-ms", global = true)]
    tick_interval_ms: Option<u64>,
    /// Config file (default: ~/.config/tmux-tui/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log file (default: <state dir>/tmux-tui/tmux-tui.log)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the TUI (default)
    Dashboard,
    /// Print the session/window/pane tree and exit
    List {
        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
}

impl Overrides {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load()?,
        };
        if self.show_all {
            config.show_all = true;
        }
        if let Some(binary) = &self.tmux_binary {
            config.tmux_binary.clone_from(binary);
        }
        if let Some(ms) = self.tick_interval_ms {
            config.tick_interval_ms = ms;
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        Ok(config)
    }
}

/// Send tracing output to the log file; the terminal belongs to the TUI.
/// Verbosity comes from `TMUX_TUI_LOG` (default `warn`).
fn init_logging(path: &Path) {
    let filter = EnvFilter::try_from_env("TMUX_TUI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let file = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| File::options().create(true).append(true).open(path));

    match file {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
        Err(_) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.overrides.load_config()?;
    init_logging(&config.log_path()?);
    tracing::info!("tmux-tui {VERSION} starting");

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => tui::run(&config),
        Commands::List { json } => {
            let snapshot = Tmux::new(&config.tmux_binary).snapshot()?;
            if json {
                let out = serde_json::to_string_pretty(&snapshot)
                    .context("failed to serialize snapshot")?;
                println!("{out}");
            } else if snapshot.sessions.is_empty() {
                println!("No sessions found. Is tmux running?");
            } else {
                print!("{}", snapshot.to_tree());
            }
            Ok(())
        }
    }
}
