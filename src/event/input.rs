//! Terminal input events, decoupled from crossterm.
//!
//! Crossterm events are converted via `From` impls; [`Command`] maps keys to
//! what the terminal host does with them.

use std::ops::BitOr;

// ---------------------------------------------------------------------------
// Key / Modifiers / KeyEvent
// ---------------------------------------------------------------------------

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Other,
}

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

/// A key press with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Input delivered by the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    Paste(String),
    /// Mouse, focus and key-release events; the host ignores them.
    Ignored,
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// What a key does in the terminal host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FocusNext,
    FocusPrev,
    /// Press the focused button or toggle the focused checkbox.
    Activate,
    /// Type into the focused input.
    Insert(char),
    DeleteBack,
    CaretLeft,
    CaretRight,
    Quit,
}

impl Command {
    /// Key binding table. `editing` is true while an input has focus, which
    /// turns printable keys into text instead of shortcuts.
    pub fn from_key(key: KeyEvent, editing: bool) -> Option<Command> {
        if key.modifiers.contains(Modifiers::CTRL) {
            return match key.code {
                Key::Char('c') | Key::Char('q') => Some(Command::Quit),
                _ => None,
            };
        }
        match key.code {
            Key::Tab | Key::Down => Some(Command::FocusNext),
            Key::BackTab | Key::Up => Some(Command::FocusPrev),
            Key::Escape => Some(Command::Quit),
            Key::Enter => Some(Command::Activate),
            Key::Char(c) if editing => Some(Command::Insert(c)),
            Key::Backspace if editing => Some(Command::DeleteBack),
            Key::Left if editing => Some(Command::CaretLeft),
            Key::Right if editing => Some(Command::CaretRight),
            Key::Char(' ') => Some(Command::Activate),
            Key::Char('q') => Some(Command::Quit),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::KeyCode;
        let code = match ct.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            _ => Key::Other,
        };
        KeyEvent::new(code, convert_modifiers(ct.modifiers))
    }
}

impl From<crossterm::event::Event> for InputEvent {
    fn from(ct: crossterm::event::Event) -> Self {
        use crossterm::event::{Event, KeyEventKind};
        match ct {
            Event::Key(ke) if ke.kind != KeyEventKind::Release => InputEvent::Key(KeyEvent::from(ke)),
            Event::Resize(width, height) => InputEvent::Resize { width, height },
            Event::Paste(s) => InputEvent::Paste(s),
            _ => InputEvent::Ignored,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn ct_key(code: KeyCode, mods: KeyModifiers) -> crossterm::event::KeyEvent {
        crossterm::event::KeyEvent::new(code, mods)
    }

    #[test]
    fn modifiers_combine() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn from_crossterm_key() {
        let ke = KeyEvent::from(ct_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(ke.code, Key::Char('c'));
        assert!(ke.modifiers.contains(Modifiers::CTRL));
        assert_eq!(KeyEvent::from(ct_key(KeyCode::F(5), KeyModifiers::NONE)).code, Key::Other);
    }

    #[test]
    fn from_crossterm_event() {
        let ev = crossterm::event::Event::Key(ct_key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(InputEvent::from(ev), InputEvent::Key(KeyEvent::plain(Key::Enter)));
        assert_eq!(
            InputEvent::from(crossterm::event::Event::Resize(80, 24)),
            InputEvent::Resize { width: 80, height: 24 }
        );
        assert_eq!(InputEvent::from(crossterm::event::Event::FocusLost), InputEvent::Ignored);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut ke = ct_key(KeyCode::Enter, KeyModifiers::NONE);
        ke.kind = crossterm::event::KeyEventKind::Release;
        assert_eq!(InputEvent::from(crossterm::event::Event::Key(ke)), InputEvent::Ignored);
    }

    #[test]
    fn bindings() {
        let key = KeyEvent::plain;
        assert_eq!(Command::from_key(key(Key::Tab), false), Some(Command::FocusNext));
        assert_eq!(Command::from_key(key(Key::BackTab), false), Some(Command::FocusPrev));
        assert_eq!(Command::from_key(key(Key::Enter), true), Some(Command::Activate));
        assert_eq!(Command::from_key(key(Key::Char(' ')), false), Some(Command::Activate));
        assert_eq!(Command::from_key(key(Key::Char('q')), false), Some(Command::Quit));
        assert_eq!(Command::from_key(key(Key::Escape), true), Some(Command::Quit));
    }

    #[test]
    fn editing_captures_printables() {
        let key = KeyEvent::plain;
        assert_eq!(Command::from_key(key(Key::Char('q')), true), Some(Command::Insert('q')));
        assert_eq!(Command::from_key(key(Key::Char(' ')), true), Some(Command::Insert(' ')));
        assert_eq!(Command::from_key(key(Key::Backspace), true), Some(Command::DeleteBack));
        assert_eq!(Command::from_key(key(Key::Backspace), false), None);
        let ctrl_c = KeyEvent::new(Key::Char('c'), Modifiers::CTRL);
        assert_eq!(Command::from_key(ctrl_c, true), Some(Command::Quit));
    }
}
