// # Console Traits
//
// The interactive collaborators: a text display, discrete key signals, a
// free-text prompt, and the host's "keep running" predicate.
//
// ## Implementations
//
// - crossterm terminal: `ddns-console` crate
//
// The editor and scheduler take a single console value, which is any
// type implementing all four traits.

use crate::error::Result;

/// A discrete input signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Confirm,
    Cancel,
    Up,
    Down,
    OpenEditor,
    Exit,
    Delete,
}

impl Key {
    pub const ALL: [Key; 7] = [
        Key::Confirm,
        Key::Cancel,
        Key::Up,
        Key::Down,
        Key::OpenEditor,
        Key::Exit,
        Key::Delete,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of keys that were just pressed during one poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySet(u8);

impl KeySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    pub const fn contains(self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Pressed keys in [`Key::ALL`] order
    pub fn iter(self) -> impl Iterator<Item = Key> {
        Key::ALL.into_iter().filter(move |key| self.contains(*key))
    }
}

impl From<Key> for KeySet {
    fn from(key: Key) -> Self {
        let mut set = Self::empty();
        set.insert(key);
        set
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut set = Self::empty();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

/// Text screen
pub trait Display {
    /// Clear the screen and move to the top
    fn clear(&mut self) -> Result<()>;

    /// Print one line
    fn print_line(&mut self, line: &str) -> Result<()>;
}

/// Edge-triggered key source
pub trait KeySource {
    /// Keys pressed since the previous poll; never blocks
    fn poll_keys(&mut self) -> KeySet;
}

/// Free-text prompt
pub trait TextInput {
    /// Ask for a value, starting from `initial`
    ///
    /// Blocks until the user confirms (`Some`) or cancels (`None`).
    fn prompt(&mut self, hint: &str, initial: &str) -> Option<String>;
}

/// Host environment loop control
pub trait HostControl {
    /// `false` once the host asked the agent to stop
    fn should_continue(&self) -> bool;
}

/// Everything the editor and scheduler need from the terminal
pub trait Console: Display + KeySource + TextInput + HostControl {}

impl<T: Display + KeySource + TextInput + HostControl + ?Sized> Console for T {}
