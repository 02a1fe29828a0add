mod models;
mod parse;

pub use models::{Entity, EntityId, Level, Snapshot, TmuxAction};
pub use parse::parse_snapshot;

use std::process::Command;

use anyhow::{Context, Result, bail};

/// The operations the TUI needs from a terminal multiplexer.
///
/// Calls block until the underlying process exits, so the TUI runs them on
/// worker threads and receives the results as events.
pub trait Multiplexer: Send + Sync {
    /// Fetch every session, window and pane plus the currently active ids.
    fn snapshot(&self) -> Result<Snapshot>;

    /// Capture the visible contents of an entity, with ANSI escapes.
    fn capture(&self, level: Level, id: EntityId) -> Result<String>;

    /// Run a mutating action.
    fn execute(&self, action: &TmuxAction) -> Result<()>;
}

/// [`Multiplexer`] backed by the `tmux` binary.
#[derive(Debug, Clone)]
pub struct Tmux {
    binary: String,
}

impl Tmux {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn output(&self, args: &[String]) -> Result<String> {
        tracing::debug!("running {} {}", self.binary, args.join(" "));
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .with_context(|| format!("failed to run {}", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} {} failed: {}",
                self.binary,
                args.first().map_or("", String::as_str),
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for Tmux {
    fn default() -> Self {
        Self::new("tmux")
    }
}

impl Multiplexer for Tmux {
    fn snapshot(&self) -> Result<Snapshot> {
        let args: Vec<String> = [
            "list-panes",
            "-aF",
            parse::LIST_FORMAT,
            ";",
            "display-message",
            "-p",
            parse::ACTIVE_FORMAT,
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
        let stdout = self.output(&args)?;
        Ok(parse_snapshot(&stdout))
    }

    fn capture(&self, level: Level, id: EntityId) -> Result<String> {
        let args = ["capture-pane", "-ep", "-t"]
            .iter()
            .map(|s| (*s).to_string())
            .chain(std::iter::once(level.target(id)))
            .collect::<Vec<_>>();
        self.output(&args)
    }

    fn execute(&self, action: &TmuxAction) -> Result<()> {
        self.output(&action.args())
            .with_context(|| format!("failed to {}", action.describe()))?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_an_error() {
        let tmux = Tmux::new("/nonexistent/tmux-binary");
        let err = tmux.snapshot().unwrap_err();
        assert!(err.to_string().contains("failed to run"));
    }

    #[test]
    fn failed_action_names_the_action() {
        let tmux = Tmux::new("/nonexistent/tmux-binary");
        let err = tmux
            .execute(&TmuxAction::Delete {
                level: Level::Window,
                id: 3,
            })
            .unwrap_err();
        assert!(err.to_string().contains("delete @3"));
    }
}
