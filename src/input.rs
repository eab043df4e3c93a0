/// Key edges → engine commands.
///
/// Movement keys accept key-repeat (holding a direction keeps stepping);
/// fire does not, so holding Space yields one shot per press.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::entities::{Command, Lateral};

fn lateral_for(code: KeyCode) -> Option<Lateral> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Lateral::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Lateral::Right),
        _ => None,
    }
}

/// Translate one key event. Keys that are not game controls yield `None`.
pub fn command_for_key(event: &KeyEvent) -> Option<Command> {
    if let Some(direction) = lateral_for(event.code) {
        return match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => Some(Command::MoveStart(direction)),
            KeyEventKind::Release => Some(Command::MoveStop(direction)),
        };
    }
    match (event.code, event.kind) {
        (KeyCode::Char(' '), KeyEventKind::Press) => Some(Command::Fire),
        _ => None,
    }
}
