//! Terminal key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ddns_core::traits::Key;

/// Key hint shown on the status screen
pub const KEY_HINT: &str = "e: edit entries  q: quit";

/// What a terminal key press means to the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(Key),
    /// Ctrl-C while the terminal is in raw mode
    Interrupt,
}

/// Translate a key press
///
/// | Terminal key         | Signal     |
/// |----------------------|------------|
/// | Enter                | Confirm    |
/// | Esc, Backspace       | Cancel     |
/// | Up / Down, k / j     | Up / Down  |
/// | e                    | OpenEditor |
/// | q                    | Exit       |
/// | Delete, d            | Delete     |
pub fn translate(event: &KeyEvent) -> Option<Input> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => Some(Input::Interrupt),
            _ => None,
        };
    }

    let key = match event.code {
        KeyCode::Enter => Key::Confirm,
        KeyCode::Esc | KeyCode::Backspace => Key::Cancel,
        KeyCode::Up | KeyCode::Char('k') => Key::Up,
        KeyCode::Down | KeyCode::Char('j') => Key::Down,
        KeyCode::Char('e') => Key::OpenEditor,
        KeyCode::Char('q') => Key::Exit,
        KeyCode::Delete | KeyCode::Char('d') => Key::Delete,
        _ => return None,
    };
    Some(Input::Key(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_bindings() {
        let cases = [
            (KeyCode::Enter, Key::Confirm),
            (KeyCode::Esc, Key::Cancel),
            (KeyCode::Backspace, Key::Cancel),
            (KeyCode::Up, Key::Up),
            (KeyCode::Char('j'), Key::Down),
            (KeyCode::Char('e'), Key::OpenEditor),
            (KeyCode::Char('q'), Key::Exit),
            (KeyCode::Delete, Key::Delete),
            (KeyCode::Char('d'), Key::Delete),
        ];
        for (code, key) in cases {
            assert_eq!(translate(&press(code)), Some(Input::Key(key)), "{:?}", code);
        }
        assert_eq!(translate(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(translate(&event), Some(Input::Interrupt));

        let event = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(translate(&event), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut event = press(KeyCode::Enter);
        event.kind = KeyEventKind::Release;
        assert_eq!(translate(&event), None);
    }
}
