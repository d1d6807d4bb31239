//! Screen text for each editor state

use super::{Editor, EditTarget, EditorState, EntryDraft, MenuRow, menu_rows};
use crate::config::{DdnsConfig, Field};
use crate::traits::Display;

const SELECTED: &str = "> ";
const UNSELECTED: &str = "  ";

impl Editor<'_> {
    /// Redraw the screen for the current state
    pub fn render<D: Display + ?Sized>(
        &self,
        config: &DdnsConfig,
        display: &mut D,
    ) -> crate::Result<()> {
        display.clear()?;
        for line in self.screen_lines(config) {
            display.print_line(&line)?;
        }
        Ok(())
    }

    /// Lines of the current screen, top to bottom
    pub fn screen_lines(&self, config: &DdnsConfig) -> Vec<String> {
        let mut lines = match &self.state {
            EditorState::MainMenu => self.main_menu_lines(config),
            EditorState::EntryAction { index } => entry_action_lines(*index, config),
            EditorState::EntryEditor(draft) => entry_editor_lines(draft),
        };

        if let Some(notice) = &self.notice {
            lines.push(String::new());
            lines.push(format!("! {}", notice));
        }
        lines
    }

    fn main_menu_lines(&self, config: &DdnsConfig) -> Vec<String> {
        let mut lines = vec![
            "DDNS entries".to_string(),
            "Up/Down: move  Confirm: select  Cancel: back".to_string(),
            String::new(),
        ];

        for (row_index, row) in menu_rows(config).into_iter().enumerate() {
            let marker = if row_index == self.cursor { SELECTED } else { UNSELECTED };
            let text = match row {
                MenuRow::Entry(i) => match config.entries.get(i) {
                    Some(entry) => format!("[{}] {},{}", i, entry.provider(), entry.domain()),
                    None => continue,
                },
                MenuRow::AddNew => "[+] Add new entry".to_string(),
                MenuRow::Interval => format!("Interval: {} s", config.interval_secs),
            };
            lines.push(format!("{}{}", marker, text));
        }
        lines
    }
}

fn entry_action_lines(index: usize, config: &DdnsConfig) -> Vec<String> {
    let title = match config.entries.get(index) {
        Some(entry) => format!("Entry [{}] {},{}", index, entry.provider(), entry.domain()),
        None => format!("Entry [{}]", index),
    };
    vec![
        title,
        String::new(),
        "Confirm: edit  Delete: delete  Cancel: back".to_string(),
    ]
}

fn entry_editor_lines(draft: &EntryDraft) -> Vec<String> {
    let title = match draft.target {
        EditTarget::New => "New entry".to_string(),
        EditTarget::Existing(i) => format!("Edit entry [{}]", i),
    };
    let mut lines = vec![
        title,
        "Up/Down: field  Confirm: change  Cancel: done".to_string(),
        String::new(),
    ];

    for (i, field) in Field::ALL.iter().enumerate() {
        let marker = if i == draft.field_cursor { SELECTED } else { UNSELECTED };
        let value = draft.entry.get(*field);
        let shown = if field.is_sensitive() && !value.is_empty() {
            "*".repeat(value.chars().count().min(8))
        } else {
            value.to_string()
        };
        lines.push(format!("{}{:<9}{}", marker, format!("{}:", field.label()), shown));
    }
    lines
}
