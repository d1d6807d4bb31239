//! Interactive entry editor
//!
//! A small state machine driven by discrete key signals:
//!
//! ```text
//!               Confirm(entry)             Confirm
//!   MainMenu ───────────────► EntryAction ────────► EntryEditor(existing)
//!     │  ▲ ◄──── Cancel ────────┘  │ Delete                 │ Cancel (save)
//!     │  └──── (save) ◄────────────┘                        │
//!     │  ▲ ◄────────────────────────────────────────────────┘
//!     │  │
//!     │  └── Cancel (commit if complete, save) ── EntryEditor(new)
//!     ├── Confirm(add new) ──────────────────────────► EntryEditor(new)
//!     ├── Confirm(interval) ── prompt ── save
//!     └── Cancel ──► back to the caller
//! ```
//!
//! Every mutation that reaches the entry table or the interval is saved
//! immediately, so leaving the editor never drops pending changes.

mod render;

use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::{DdnsConfig, Entry, Field};
use crate::error::Error;
use crate::store::ConfigStore;
use crate::traits::{Console, Key, TextInput};

/// Prompt hint for the interval row
pub const INTERVAL_HINT: &str = "Interval (seconds)";

/// Which entry an [`EntryDraft`] will be written back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// A blank entry, appended on completion if provider and domain are set
    New,
    /// An existing entry, replaced in place on completion
    Existing(usize),
}

/// Working copy of the entry being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub target: EditTarget,
    pub entry: Entry,
    /// Index into [`Field::ALL`]
    pub field_cursor: usize,
}

impl EntryDraft {
    fn new(target: EditTarget, entry: Entry) -> Self {
        Self {
            target,
            entry,
            field_cursor: 0,
        }
    }

    pub fn selected_field(&self) -> Field {
        Field::ALL[self.field_cursor]
    }
}

/// Editor screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    /// Entry list, "add new" slot and interval row
    MainMenu,
    /// Edit-or-delete prompt for one entry
    EntryAction { index: usize },
    /// Field-by-field editor
    EntryEditor(EntryDraft),
}

/// One selectable row of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRow {
    Entry(usize),
    AddNew,
    Interval,
}

/// Rows of the main menu for the current configuration
///
/// The "add new" row only exists while the table has room.
pub fn menu_rows(config: &DdnsConfig) -> Vec<MenuRow> {
    let mut rows: Vec<MenuRow> = (0..config.entries.len()).map(MenuRow::Entry).collect();
    if !config.entries.is_full() {
        rows.push(MenuRow::AddNew);
    }
    rows.push(MenuRow::Interval);
    rows
}

/// Result of handling one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Interactive editor over the process configuration
///
/// Borrows the [`ConfigStore`] for incremental saves. The configuration
/// itself is passed to each call, so the editor holds no copy of it.
pub struct Editor<'a> {
    store: &'a ConfigStore,
    state: EditorState,
    cursor: usize,
    notice: Option<String>,
    tick: Duration,
}

impl<'a> Editor<'a> {
    /// Create an editor in its initial state (main menu, first row)
    pub fn new(store: &'a ConfigStore, tick: Duration) -> Self {
        Self {
            store,
            state: EditorState::MainMenu,
            cursor: 0,
            notice: None,
            tick,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Selected main menu row index
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Message shown under the current screen, if any
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Run the editor until the user goes back or the host stops
    ///
    /// Blocks the caller: no update cycle runs while the editor is open.
    pub async fn run<C: Console + ?Sized>(
        &mut self,
        config: &mut DdnsConfig,
        console: &mut C,
    ) -> crate::Result<()> {
        info!("Editor opened");
        self.state = EditorState::MainMenu;
        self.cursor = 0;
        self.notice = None;
        self.render(config, console)?;

        loop {
            if !console.should_continue() {
                info!("Host requested shutdown, closing editor");
                return Ok(());
            }

            let keys = console.poll_keys();
            if keys.is_empty() {
                tokio::time::sleep(self.tick).await;
                continue;
            }

            for key in keys.iter() {
                if self.handle_key(key, config, console).await == Flow::Exit {
                    info!("Editor closed");
                    return Ok(());
                }
            }
            self.render(config, console)?;
        }
    }

    /// Apply one key to the state machine
    pub async fn handle_key<I: TextInput + ?Sized>(
        &mut self,
        key: Key,
        config: &mut DdnsConfig,
        input: &mut I,
    ) -> Flow {
        self.notice = None;
        let state = std::mem::replace(&mut self.state, EditorState::MainMenu);

        self.state = match state {
            EditorState::MainMenu => return self.on_main_menu(key, config, input).await,
            EditorState::EntryAction { index } => self.on_entry_action(index, key, config).await,
            EditorState::EntryEditor(draft) => self.on_entry_editor(draft, key, config, input).await,
        };
        Flow::Continue
    }

    async fn on_main_menu<I: TextInput + ?Sized>(
        &mut self,
        key: Key,
        config: &mut DdnsConfig,
        input: &mut I,
    ) -> Flow {
        let rows = menu_rows(config);
        self.cursor = self.cursor.min(rows.len() - 1);

        match key {
            Key::Up => self.cursor = self.cursor.saturating_sub(1),
            Key::Down => self.cursor = (self.cursor + 1).min(rows.len() - 1),
            Key::Cancel => return Flow::Exit,
            Key::Confirm => match rows[self.cursor] {
                MenuRow::Entry(index) => self.state = EditorState::EntryAction { index },
                MenuRow::AddNew => {
                    if config.entries.is_full() {
                        self.notice = Some("Entry table is full".to_string());
                    } else {
                        let draft = EntryDraft::new(EditTarget::New, Entry::default());
                        self.state = EditorState::EntryEditor(draft);
                    }
                }
                MenuRow::Interval => self.edit_interval(config, input).await,
            },
            _ => {}
        }
        Flow::Continue
    }

    async fn on_entry_action(
        &mut self,
        index: usize,
        key: Key,
        config: &mut DdnsConfig,
    ) -> EditorState {
        match key {
            Key::Confirm => match config.entries.get(index) {
                Some(entry) => {
                    let draft = EntryDraft::new(EditTarget::Existing(index), entry.clone());
                    EditorState::EntryEditor(draft)
                }
                None => EditorState::MainMenu,
            },
            Key::Delete => {
                if let Some(removed) = config.entries.remove(index) {
                    debug!("Deleted entry {} ({})", index, removed.domain());
                    self.clamp_cursor_to_entries(config);
                    self.persist(config).await;
                }
                EditorState::MainMenu
            }
            Key::Cancel => EditorState::MainMenu,
            _ => EditorState::EntryAction { index },
        }
    }

    async fn on_entry_editor<I: TextInput + ?Sized>(
        &mut self,
        mut draft: EntryDraft,
        key: Key,
        config: &mut DdnsConfig,
        input: &mut I,
    ) -> EditorState {
        match key {
            Key::Up => draft.field_cursor = draft.field_cursor.saturating_sub(1),
            Key::Down => draft.field_cursor = (draft.field_cursor + 1).min(Field::ALL.len() - 1),
            Key::Confirm => {
                let field = draft.selected_field();
                if let Some(value) = input.prompt(field.label(), draft.entry.get(field)) {
                    draft.entry.set(field, &value);
                }
            }
            Key::Cancel => {
                self.commit_draft(draft, config).await;
                return EditorState::MainMenu;
            }
            _ => {}
        }
        EditorState::EntryEditor(draft)
    }

    async fn commit_draft(&mut self, draft: EntryDraft, config: &mut DdnsConfig) {
        match draft.target {
            EditTarget::Existing(index) => {
                if let Err(e) = config.entries.replace(index, draft.entry) {
                    self.notice = Some(e.to_string());
                    return;
                }
                self.persist(config).await;
            }
            EditTarget::New => {
                if !draft.entry.is_complete() {
                    self.notice = Some("Provider and domain required, entry discarded".to_string());
                    return;
                }
                if let Err(e) = config.entries.push(draft.entry) {
                    self.notice = Some(e.to_string());
                    return;
                }
                self.cursor = config.entries.len() - 1;
                self.persist(config).await;
            }
        }
    }

    async fn edit_interval<I: TextInput + ?Sized>(&mut self, config: &mut DdnsConfig, input: &mut I) {
        let current = config.interval_secs.to_string();
        let Some(value) = input.prompt(INTERVAL_HINT, &current) else {
            return;
        };

        let result = value
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::invalid_input("not a number"))
            .and_then(|secs| config.set_interval(secs).map(|()| secs));

        match result {
            Ok(secs) => {
                info!("Polling interval set to {}s", secs);
                self.persist(config).await;
            }
            Err(_) => self.notice = Some(format!("Invalid interval: '{}'", value)),
        }
    }

    // Keep the cursor on an entry row after the table shrinks.
    fn clamp_cursor_to_entries(&mut self, config: &DdnsConfig) {
        let len = config.entries.len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    async fn persist(&mut self, config: &DdnsConfig) {
        if let Err(e) = self.store.save(config).await {
            error!("Failed to save {}: {}", self.store.path().display(), e);
            self.notice = Some(format!("Save failed: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_ENTRIES;

    #[test]
    fn test_menu_rows_hide_add_when_full() {
        let mut config = DdnsConfig::new();
        assert_eq!(menu_rows(&config), [MenuRow::AddNew, MenuRow::Interval]);

        for i in 0..MAX_ENTRIES {
            config.entries.push(Entry::new("duckdns", &format!("h{}", i))).unwrap();
        }
        let rows = menu_rows(&config);
        assert_eq!(rows.len(), MAX_ENTRIES + 1);
        assert!(!rows.contains(&MenuRow::AddNew));
        assert_eq!(rows.last(), Some(&MenuRow::Interval));
    }
}
