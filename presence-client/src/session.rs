//! Line commands for the interactive session.
//!
//! Plain text is a question. Shortcuts are picked by number in elder mode
//! (`1`..`3`) and by prefixed number in teen mode (`t1`..`t4` quick topics,
//! `a1`..`a3` quick actions).
use crate::view::{
    CUSTOM_CATEGORY, ELDER_SUGGESTIONS, Mode, SearchKind, Shortcut, TEEN_QUICK_ACTIONS,
    TEEN_QUICK_TOPICS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask {
        query: String,
        kind: SearchKind,
        category: String,
    },
    Today,
    History,
    Stats,
    Help,
    Quit,
}

/// Parse one input line; `None` for a blank line.
pub fn parse_command(mode: Mode, line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let cmd = match line.to_ascii_lowercase().as_str() {
        "/quit" | "/exit" | "/q" => Command::Quit,
        "/help" | "/?" => Command::Help,
        "/today" => Command::Today,
        "/history" => Command::History,
        "/stats" => Command::Stats,
        lower => match shortcut(mode, lower) {
            Some((shortcut, kind)) => Command::Ask {
                query: shortcut.query.to_string(),
                kind,
                category: shortcut.category.to_string(),
            },
            None => Command::Ask {
                query: line.to_string(),
                kind: SearchKind::Manual,
                category: CUSTOM_CATEGORY.to_string(),
            },
        },
    };
    Some(cmd)
}

fn pick(list: &[Shortcut], digits: &str) -> Option<Shortcut> {
    let n: usize = digits.parse().ok()?;
    list.get(n.checked_sub(1)?).copied()
}

fn shortcut(mode: Mode, key: &str) -> Option<(Shortcut, SearchKind)> {
    match mode {
        Mode::Elder => pick(&ELDER_SUGGESTIONS, key).map(|s| (s, SearchKind::Manual)),
        Mode::Teen => {
            if let Some(rest) = key.strip_prefix('t') {
                pick(&TEEN_QUICK_TOPICS, rest).map(|s| (s, SearchKind::QuickTopic))
            } else if let Some(rest) = key.strip_prefix('a') {
                pick(&TEEN_QUICK_ACTIONS, rest).map(|s| (s, SearchKind::QuickAction))
            } else {
                None
            }
        }
    }
}
