use std::fmt::Write;

use serde::Serialize;

/// Numeric tmux id with its sigil stripped (`$3` → 3, `@12` → 12, `%40` → 40).
pub type EntityId = u32;

/// One tier of the tmux hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Session,
    Window,
    Pane,
}

impl Level {
    pub const ALL: [Self; 3] = [Self::Session, Self::Window, Self::Pane];

    /// The prefix tmux uses for ids at this level.
    pub fn sigil(self) -> char {
        match self {
            Self::Session => '$',
            Self::Window => '@',
            Self::Pane => '%',
        }
    }

    /// Format an id as a tmux target (`-t`) argument.
    pub fn target(self, id: EntityId) -> String {
        format!("{}{id}", self.sigil())
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Session => "Sessions",
            Self::Window => "Windows",
            Self::Pane => "Panes",
        }
    }

    /// The digit key that focuses this level's list.
    pub fn number(self) -> u8 {
        match self {
            Self::Session => 1,
            Self::Window => 2,
            Self::Pane => 3,
        }
    }

    /// Sessions and windows can be created and renamed; panes cannot.
    pub fn is_nameable(self) -> bool {
        matches!(self, Self::Session | Self::Window)
    }

    /// Windows and panes can be swapped with a sibling; sessions cannot.
    pub fn is_swappable(self) -> bool {
        matches!(self, Self::Window | Self::Pane)
    }
}

/// One node of the hierarchy as reported by tmux.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    /// Owning session (for windows) or window (for panes). `None` for sessions.
    pub parent: Option<EntityId>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, parent: Option<EntityId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
        }
    }
}

/// The full hierarchy at one point in time, plus what tmux considers active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub sessions: Vec<Entity>,
    pub windows: Vec<Entity>,
    pub panes: Vec<Entity>,
    pub active_session: Option<EntityId>,
    pub active_window: Option<EntityId>,
    pub active_pane: Option<EntityId>,
}

impl Snapshot {
    pub fn entities(&self, level: Level) -> &[Entity] {
        match level {
            Level::Session => &self.sessions,
            Level::Window => &self.windows,
            Level::Pane => &self.panes,
        }
    }

    pub fn active(&self, level: Level) -> Option<EntityId> {
        match level {
            Level::Session => self.active_session,
            Level::Window => self.active_window,
            Level::Pane => self.active_pane,
        }
    }

    /// Indented outline of sessions, windows and panes. Active entities are
    /// marked with `*`.
    pub fn to_tree(&self) -> String {
        let mut out = String::new();
        let mut line = |depth: usize, level: Level, entity: &Entity| {
            let active = if self.active(level) == Some(entity.id) {
                " *"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "{:indent$}{} {}{active}",
                "",
                level.target(entity.id),
                entity.name,
                indent = depth * 2
            );
        };

        for session in &self.sessions {
            line(0, Level::Session, session);
            for window in self.windows.iter().filter(|w| w.parent == Some(session.id)) {
                line(1, Level::Window, window);
                for pane in self.panes.iter().filter(|p| p.parent == Some(window.id)) {
                    line(2, Level::Pane, pane);
                }
            }
        }
        out
    }
}

/// A command that changes tmux state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmuxAction {
    GoTo {
        level: Level,
        id: EntityId,
    },
    Delete {
        level: Level,
        id: EntityId,
    },
    Rename {
        level: Level,
        id: EntityId,
        name: String,
    },
    /// New session (`parent` is `None`) or new window inside `parent`.
    Create {
        level: Level,
        parent: Option<EntityId>,
        name: Option<String>,
    },
    Swap {
        level: Level,
        src: EntityId,
        dst: EntityId,
    },
    Split {
        pane: EntityId,
        horizontal: bool,
    },
}

impl TmuxAction {
    /// Whether the program should exit once this action has run.
    pub fn terminates(&self) -> bool {
        matches!(self, Self::GoTo { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            Self::GoTo { level, id } => format!("go to {}", level.target(*id)),
            Self::Delete { level, id } => format!("delete {}", level.target(*id)),
            Self::Rename { level, id, name } => {
                format!("rename {} to '{name}'", level.target(*id))
            }
            Self::Create { level, name, .. } => match name {
                Some(name) => format!("create {level:?} '{name}'"),
                None => format!("create {level:?}"),
            },
            Self::Swap { level, src, dst } => {
                format!("swap {} with {}", level.target(*src), level.target(*dst))
            }
            Self::Split { pane, horizontal } => {
                let dir = if *horizontal { "horizontally" } else { "vertically" };
                format!("split {} {dir}", Level::Pane.target(*pane))
            }
        }
    }

    /// The tmux argument vector for this action. Multiple tmux commands are
    /// chained with `;` so they run in a single invocation.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        let mut push = |parts: &[&str]| args.extend(parts.iter().map(|s| (*s).to_string()));

        match self {
            Self::GoTo { level, id } => {
                let target = level.target(*id);
                push(&["switch-client", "-t", &target]);
                if matches!(level, Level::Window | Level::Pane) {
                    push(&[";", "select-window", "-t", &target]);
                }
                if *level == Level::Pane {
                    push(&[";", "select-pane", "-t", &target]);
                }
            }
            Self::Delete { level, id } => {
                let cmd = match level {
                    Level::Session => "kill-session",
                    Level::Window => "kill-window",
                    Level::Pane => "kill-pane",
                };
                push(&[cmd, "-t", &level.target(*id)]);
            }
            Self::Rename { level, id, name } => {
                let cmd = match level {
                    Level::Session => "rename-session",
                    Level::Window | Level::Pane => "rename-window",
                };
                push(&[cmd, "-t", &level.target(*id), name]);
            }
            Self::Create { level, parent, name } => {
                if *level == Level::Session {
                    push(&["new-session", "-d"]);
                    if let Some(name) = name {
                        push(&["-s", name]);
                    }
                } else {
                    push(&["new-window", "-d"]);
                    if let Some(parent) = parent {
                        push(&["-t", &format!("{}:", Level::Session.target(*parent))]);
                    }
                    if let Some(name) = name {
                        push(&["-n", name]);
                    }
                }
            }
            Self::Swap { level, src, dst } => {
                let cmd = if *level == Level::Pane {
                    "swap-pane"
                } else {
                    "swap-window"
                };
                push(&[cmd, "-s", &level.target(*src), "-t", &level.target(*dst)]);
            }
            Self::Split { pane, horizontal } => {
                let dir = if *horizontal { "-h" } else { "-v" };
                push(&["split-window", dir, "-t", &Level::Pane.target(*pane)]);
            }
        }

        args
    }
}
