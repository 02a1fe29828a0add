use super::models::{Entity, EntityId, Snapshot};

/// `list-panes -aF` format: one row per pane, carrying its session and window.
pub const LIST_FORMAT: &str = "#{session_id}\t#{window_id}\t#{pane_id}\t#{session_name}\t#{window_name}\t#{pane_current_command}";

/// `display-message -p` format: the ids of the client's active session/window/pane.
pub const ACTIVE_FORMAT: &str = "#{session_id}\t#{window_id}\t#{pane_id}";

fn parse_id(field: &str, sigil: char) -> Option<EntityId> {
    field.trim().trim_start_matches(sigil).parse().ok()
}

/// Parse the combined output of `list-panes` and `display-message`.
///
/// Rows whose ids don't parse, or with an unexpected number of fields, are
/// skipped. Entities come back sorted and deduplicated by id.
pub fn parse_snapshot(output: &str) -> Snapshot {
    let mut snapshot = Snapshot::default();

    for line in output.lines() {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 3 {
            continue;
        }

        let (Some(session_id), Some(window_id), Some(pane_id)) = (
            parse_id(parts[0], '$'),
            parse_id(parts[1], '@'),
            parse_id(parts[2], '%'),
        ) else {
            tracing::debug!("skipping malformed tmux row: {line:?}");
            continue;
        };

        match parts.len() {
            3 => {
                snapshot.active_session = Some(session_id);
                snapshot.active_window = Some(window_id);
                snapshot.active_pane = Some(pane_id);
            }
            6 => {
                snapshot
                    .sessions
                    .push(Entity::new(session_id, parts[3], None));
                snapshot
                    .windows
                    .push(Entity::new(window_id, parts[4], Some(session_id)));
                snapshot
                    .panes
                    .push(Entity::new(pane_id, parts[5], Some(window_id)));
            }
            _ => {
                tracing::debug!("skipping tmux row with {} fields", parts.len());
            }
        }
    }

    for list in [
        &mut snapshot.sessions,
        &mut snapshot.windows,
        &mut snapshot.panes,
    ] {
        list.sort_by_key(|e| e.id);
        list.dedup_by_key(|e| e.id);
    }

    snapshot
}
