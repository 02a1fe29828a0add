pub mod config;
pub mod tmux;
pub mod tui;

/// Version string shown in `--version` and the status bar.
pub const VERSION: &str = env!("TMUX_TUI_VERSION");
