//! Interactive repository picker.
//!
//! [`Picker`] holds the selection state and key handling; [`pick`] runs it
//! in the terminal. An empty entry list is rejected with
//! [`RjError::NoResults`] before the terminal is touched.

mod terminal;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use crate::discovery::DirectoryEntry;
use crate::error::{Result, RjError};

pub use terminal::pick;

/// Number of rows shown at once.
pub const PAGE_SIZE: usize = 10;

pub const LABEL: &str = "Found directories (press 'Enter' to copy directory path to clipboard)";

/// Result of feeding one key to the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    Pending,
    Selected(usize),
    Cancelled,
}

pub struct Picker<'a> {
    entries: &'a [DirectoryEntry],
    state: ListState,
}

impl<'a> Picker<'a> {
    pub fn new(entries: &'a [DirectoryEntry]) -> Result<Self> {
        if entries.is_empty() {
            return Err(RjError::NoResults);
        }
        Ok(Self {
            entries,
            state: ListState::default().with_selected(Some(0)),
        })
    }

    #[must_use]
    pub const fn entries(&self) -> &'a [DirectoryEntry] {
        self.entries
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    pub(crate) const fn state_mut(&mut self) -> &mut ListState {
        &mut self.state
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerEvent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => PickerEvent::Cancelled,
            KeyCode::Esc | KeyCode::Char('q') => PickerEvent::Cancelled,
            KeyCode::Enter => PickerEvent::Selected(self.selected()),
            KeyCode::Up | KeyCode::Char('k') => self.move_up(1),
            KeyCode::Char('p') if ctrl => self.move_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(1),
            KeyCode::Char('n') if ctrl => self.move_down(1),
            KeyCode::PageUp => self.move_up(PAGE_SIZE),
            KeyCode::PageDown => self.move_down(PAGE_SIZE),
            KeyCode::Home | KeyCode::Char('g') => self.select(0),
            KeyCode::End | KeyCode::Char('G') => self.select(self.entries.len() - 1),
            _ => PickerEvent::Pending,
        }
    }

    fn move_up(&mut self, step: usize) -> PickerEvent {
        self.select(self.selected().saturating_sub(step))
    }

    fn move_down(&mut self, step: usize) -> PickerEvent {
        let last = self.entries.len() - 1;
        self.select(self.selected().saturating_add(step).min(last))
    }

    fn select(&mut self, index: usize) -> PickerEvent {
        self.state.select(Some(index));
        PickerEvent::Pending
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn entries(count: usize) -> Vec<DirectoryEntry> {
        (0..count)
            .map(|i| DirectoryEntry {
                path: PathBuf::from(format!("./repo{i}")),
                branch: "main".to_string(),
            })
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(matches!(Picker::new(&[]), Err(RjError::NoResults)));
    }

    #[test]
    fn enter_selects_highlighted_entry() {
        let list = entries(3);
        let mut picker = Picker::new(&list).unwrap();
        assert_eq!(picker.handle_key(key(KeyCode::Down)), PickerEvent::Pending);
        assert_eq!(picker.handle_key(key(KeyCode::Char('j'))), PickerEvent::Pending);
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), PickerEvent::Selected(2));
    }

    #[test]
    fn movement_is_clamped() {
        let list = entries(3);
        let mut picker = Picker::new(&list).unwrap();
        picker.handle_key(key(KeyCode::Up));
        assert_eq!(picker.selected(), 0);
        for _ in 0..5 {
            picker.handle_key(key(KeyCode::Down));
        }
        assert_eq!(picker.selected(), 2);
    }

    #[test]
    fn paging_moves_a_screen_at_a_time() {
        let list = entries(25);
        let mut picker = Picker::new(&list).unwrap();
        picker.handle_key(key(KeyCode::PageDown));
        assert_eq!(picker.selected(), PAGE_SIZE);
        picker.handle_key(key(KeyCode::End));
        assert_eq!(picker.selected(), 24);
        picker.handle_key(key(KeyCode::PageUp));
        assert_eq!(picker.selected(), 24 - PAGE_SIZE);
        picker.handle_key(key(KeyCode::Home));
        assert_eq!(picker.selected(), 0);
    }

    #[test]
    fn escape_and_ctrl_c_cancel() {
        let list = entries(2);
        let mut picker = Picker::new(&list).unwrap();
        assert_eq!(picker.handle_key(key(KeyCode::Esc)), PickerEvent::Cancelled);
        assert_eq!(
            picker.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            PickerEvent::Cancelled
        );
    }
}
