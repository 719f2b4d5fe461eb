use futures::StreamExt;
use ratatui::crossterm::{
    self,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};

use crate::library::Catalog;

use super::app::CurrentMode;

#[derive(Debug)]
pub enum Message {
    // Input
    Character(char),
    Paste(String),
    Backspace,
    // Navigation
    Up,
    Down,
    Select,
    Back,
    // General
    Quit,
    // Background work
    CatalogLoaded { generation: u64, catalog: Catalog },
    None,
}

pub fn handler(key_event: KeyEvent, mode: CurrentMode) -> Message {
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Message::Quit;
    }

    if mode == CurrentMode::Normal {
        match key_event.code {
            KeyCode::Esc | KeyCode::Char('q') => Message::Quit,
            KeyCode::Char('j') | KeyCode::Down => Message::Down,
            KeyCode::Char('k') | KeyCode::Up => Message::Up,
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Message::Select,
            KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => Message::Back,
            _ => Message::None,
        }
    } else {
        match key_event.code {
            KeyCode::Char(a) => Message::Character(a),
            KeyCode::Backspace => Message::Backspace,
            KeyCode::Down => Message::Down,
            KeyCode::Up => Message::Up,
            KeyCode::Esc => Message::Quit,
            KeyCode::Enter => Message::Select,
            _ => Message::None,
        }
    }
}

#[derive(Debug)]
pub enum Event {
    Key(crossterm::event::KeyEvent),
    Paste(String),
}

pub struct EventHandler {
    rx: tokio::sync::mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            while let Some(event) = reader.next().await {
                let event = match event {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
                    Ok(CrosstermEvent::Paste(text)) => Event::Paste(text),
                    Ok(_) => continue,
                    Err(e) => {
                        log::error!("failed to read terminal event: {e}");
                        break;
                    }
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
        EventHandler { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn normal_mode_keys() {
        assert!(matches!(handler(key(KeyCode::Up), CurrentMode::Normal), Message::Up));
        assert!(matches!(handler(key(KeyCode::Down), CurrentMode::Normal), Message::Down));
        assert!(matches!(handler(key(KeyCode::Enter), CurrentMode::Normal), Message::Select));
        assert!(matches!(handler(key(KeyCode::Backspace), CurrentMode::Normal), Message::Back));
        assert!(matches!(handler(key(KeyCode::Esc), CurrentMode::Normal), Message::Quit));
        assert!(matches!(handler(key(KeyCode::Char('x')), CurrentMode::Normal), Message::None));
    }

    #[test]
    fn insert_mode_keys() {
        assert!(matches!(
            handler(key(KeyCode::Char('q')), CurrentMode::Insert),
            Message::Character('q')
        ));
        assert!(matches!(
            handler(key(KeyCode::Backspace), CurrentMode::Insert),
            Message::Backspace
        ));
        assert!(matches!(handler(key(KeyCode::Enter), CurrentMode::Insert), Message::Select));
        assert!(matches!(handler(key(KeyCode::Esc), CurrentMode::Insert), Message::Quit));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(handler(event, CurrentMode::Insert), Message::Quit));
        assert!(matches!(handler(event, CurrentMode::Normal), Message::Quit));
    }
}
