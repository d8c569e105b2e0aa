use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::model::Model;
use super::update::Message;

/// Map a terminal event to a message. Keys mirror the ranger convention:
/// `h/j/k/l` plus the arrows, with Enter doubling as move-right.
pub fn handle_event(event: &Event, model: &Model) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(*key, model),
        Event::Resize(_, _) => Some(Message::Redraw),
        _ => None,
    }
}

fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Message::Quit),
            _ => None,
        };
    }

    if model.prompt.is_some() {
        return match key.code {
            KeyCode::Esc => Some(Message::PromptCancel),
            KeyCode::Enter => Some(Message::PromptSubmit),
            KeyCode::Backspace => Some(Message::PromptBackspace),
            KeyCode::Char(c) => Some(Message::PromptChar(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Message::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(Message::SelectionDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::SelectionUp),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => Some(Message::Advance),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Esc => Some(Message::Retreat),
        KeyCode::Char('/') | KeyCode::Char('f') => Some(Message::StartFilter),
        KeyCode::Char('i') => Some(Message::StartInsert),
        KeyCode::Char('d') => Some(Message::DeleteSelected),
        KeyCode::Char('r') => Some(Message::Reload),
        _ => None,
    }
}
