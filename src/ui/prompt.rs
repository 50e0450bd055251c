//! Prompt panel: a free-text input over a filterable history list.
//!
//! Typing narrows the visible history to entries containing the input as a
//! substring; emptying the input shows everything again. The highlighted
//! entry (when history is visible) wins over the typed text on submit.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use super::keymap::{Binding, KeyMap};
use crate::ctrl::HistoryEntry;

/// What the prompt panel resolves to on submit. A non-empty `command` means
/// "reuse this exact pair without generation"; an empty `command` with a
/// non-empty `prompt` means "generate from this new prompt".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPrompt {
    pub prompt: String,
    pub command: String,
}

impl InputPrompt {
    pub fn is_new(&self) -> bool {
        !self.prompt.is_empty() && self.command.is_empty()
    }
}

pub struct PromptPanel {
    entries: Vec<HistoryEntry>,
    /// Indices into `entries` matching the current filter.
    visible: Vec<usize>,
    list_state: ListState,
    input: String,
    /// Cursor position in chars, not bytes.
    cursor: usize,
    history_visible: bool,
}

impl PromptPanel {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        let mut panel = Self {
            entries,
            visible: Vec::new(),
            list_state: ListState::default(),
            input: String::new(),
            cursor: 0,
            history_visible: true,
        };
        panel.refilter();
        panel
    }

    /// Handle a key in the prompting state. Returns the entry to delete from
    /// the store when the delete action fires.
    pub fn handle_key(&mut self, key: &KeyEvent, km: &KeyMap) -> Option<HistoryEntry> {
        if km.up.matches(key) {
            self.select_prev();
        } else if km.down.matches(key) {
            self.select_next();
        } else if km.toggle_history.matches(key) {
            self.history_visible = !self.history_visible;
        } else if km.delete_entry.matches(key) {
            return self.delete_highlighted();
        } else {
            self.handle_edit_key(key);
        }
        None
    }

    /// Resolve the panel to a submission.
    pub fn selected(&self) -> InputPrompt {
        if self.history_visible
            && let Some(sel) = self.list_state.selected()
            && let Some(entry) = self.visible.get(sel).and_then(|&i| self.entries.get(i))
        {
            return InputPrompt {
                prompt: entry.prompt.clone(),
                command: entry.command.clone(),
            };
        }
        // No highlighted entry: the typed text is a new prompt.
        InputPrompt {
            prompt: self.input.clone(),
            command: String::new(),
        }
    }

    /// Remove the highlighted entry from the visible list (optimistic; the
    /// store delete runs asynchronously) and return it.
    fn delete_highlighted(&mut self) -> Option<HistoryEntry> {
        if !self.history_visible {
            return None;
        }
        let sel = self.list_state.selected()?;
        let &idx = self.visible.get(sel)?;
        let entry = self.entries.remove(idx);
        self.refilter();
        Some(entry)
    }

    fn handle_edit_key(&mut self, key: &KeyEvent) {
        let before_len = self.input.len();
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_char(c);
            }
            KeyCode::Backspace => self.delete_char_before(),
            KeyCode::Delete => self.delete_char_at(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.char_count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_count(),
            _ => {}
        }
        if self.input.len() != before_len {
            self.refilter();
        }
    }

    fn insert_char(&mut self, c: char) {
        let i = self.byte_index();
        self.input.insert(i, c);
        self.cursor += 1;
    }

    fn delete_char_before(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let i = self.byte_index();
        self.input.remove(i);
    }

    fn delete_char_at(&mut self) {
        if self.cursor >= self.char_count() {
            return;
        }
        let i = self.byte_index();
        self.input.remove(i);
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    /// Recompute the visible subset and clamp the highlight to it.
    fn refilter(&mut self) {
        let query = self.input.as_str();
        self.visible = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                query.is_empty()
                    || format!("{} {}", entry.prompt, entry.command).contains(query)
            })
            .map(|(i, _)| i)
            .collect();
        if self.visible.is_empty() {
            self.list_state.select(None);
        } else {
            let sel = self
                .list_state
                .selected()
                .unwrap_or(0)
                .min(self.visible.len() - 1);
            self.list_state.select(Some(sel));
        }
    }

    fn select_prev(&mut self) {
        if let Some(i) = self.list_state.selected()
            && i > 0
        {
            self.list_state.select(Some(i - 1));
        }
    }

    fn select_next(&mut self) {
        if let Some(i) = self.list_state.selected()
            && i + 1 < self.visible.len()
        {
            self.list_state.select(Some(i + 1));
        }
    }

    fn has_highlight(&self) -> bool {
        self.history_visible && self.list_state.selected().is_some() && !self.visible.is_empty()
    }

    fn placeholder(&self) -> &'static str {
        if !self.entries.is_empty() && self.history_visible {
            "Search history or type a new prompt"
        } else {
            "Type a prompt"
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let show_list = self.history_visible && !self.visible.is_empty();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(if show_list {
                [Constraint::Min(1), Constraint::Length(2)]
            } else {
                [Constraint::Length(0), Constraint::Min(2)]
            })
            .split(area);

        if show_list {
            let items: Vec<ListItem> = self
                .visible
                .iter()
                .filter_map(|&i| self.entries.get(i))
                .map(|entry| {
                    ListItem::new(vec![
                        Line::styled(
                            entry.prompt.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Line::styled(
                            entry.command.clone(),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ])
                })
                .collect();
            let list = List::new(items)
                .highlight_style(Style::default().fg(Color::Indexed(170)))
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, chunks[0], &mut self.list_state);
        }

        let text = if self.input.is_empty() {
            Line::from(vec![
                Span::raw("> "),
                Span::styled(self.placeholder(), Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(vec![Span::raw("> "), Span::raw(self.input.clone())])
        };
        let input_area = chunks[1];
        frame.render_widget(Paragraph::new(vec![Line::default(), text]), input_area);
        frame.set_cursor_position((
            input_area.x + 2 + self.cursor as u16,
            input_area.y + 1,
        ));
    }

    pub fn short_help<'a>(&self, km: &'a KeyMap) -> Vec<&'a Binding> {
        let mut bindings = vec![&km.submit, &km.cancel];
        if self.has_highlight() {
            bindings.push(&km.up);
            bindings.push(&km.down);
            bindings.push(&km.delete_entry);
        }
        if !self.entries.is_empty() {
            bindings.push(&km.toggle_history);
        }
        bindings
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(panel: &mut PromptPanel, km: &KeyMap, text: &str) {
        for c in text.chars() {
            panel.handle_key(&key(KeyCode::Char(c)), km);
        }
    }

    fn sample_entries() -> Vec<HistoryEntry> {
        vec![
            HistoryEntry::new("list files", "ls -l"),
            HistoryEntry::new("find dirs", "find . -type d"),
            HistoryEntry::new("disk usage", "du -sh"),
        ]
    }

    #[test]
    fn highlighted_entry_wins_over_typed_text() {
        let km = KeyMap::default();
        let mut panel = PromptPanel::new(sample_entries());
        type_text(&mut panel, &km, "find");

        let selected = panel.selected();
        assert_eq!(selected.prompt, "find dirs");
        assert_eq!(selected.command, "find . -type d");
        assert!(!selected.is_new());
    }

    #[test]
    fn typing_filters_by_substring() {
        let km = KeyMap::default();
        let mut panel = PromptPanel::new(sample_entries());

        type_text(&mut panel, &km, "du");
        assert_eq!(panel.visible.len(), 1);

        // Case-sensitive: no match means no highlight, so the text is new.
        type_text(&mut panel, &km, "X");
        assert!(panel.visible.is_empty());
        assert!(panel.selected().is_new());

        // Emptying the input deactivates the filter.
        panel.handle_key(&key(KeyCode::Backspace), &km);
        panel.handle_key(&key(KeyCode::Backspace), &km);
        panel.handle_key(&key(KeyCode::Backspace), &km);
        assert_eq!(panel.visible.len(), 3);
    }

    #[test]
    fn hidden_history_always_resolves_to_new_prompt() {
        let km = KeyMap::default();
        let mut panel = PromptPanel::new(sample_entries());
        type_text(&mut panel, &km, "list files");
        panel.handle_key(&ctrl('h'), &km);

        let selected = panel.selected();
        assert!(selected.is_new());
        assert_eq!(selected.prompt, "list files");
    }

    #[test]
    fn toggle_preserves_input_buffer() {
        let km = KeyMap::default();
        let mut panel = PromptPanel::new(sample_entries());
        type_text(&mut panel, &km, "du");
        panel.handle_key(&ctrl('h'), &km);
        panel.handle_key(&ctrl('h'), &km);
        assert_eq!(panel.input, "du");
        assert_eq!(panel.visible.len(), 1);
    }

    #[test]
    fn delete_removes_highlighted_entry_optimistically() {
        let km = KeyMap::default();
        let mut panel = PromptPanel::new(sample_entries());
        panel.handle_key(&key(KeyCode::Down), &km);

        let deleted = panel.handle_key(&ctrl('d'), &km);
        assert_eq!(deleted, Some(HistoryEntry::new("find dirs", "find . -type d")));
        assert_eq!(panel.visible.len(), 2);
        // Highlight stays in bounds.
        assert!(panel.list_state.selected().unwrap() < 2);
    }

    #[test]
    fn delete_does_nothing_while_history_hidden() {
        let km = KeyMap::default();
        let mut panel = PromptPanel::new(sample_entries());
        panel.handle_key(&ctrl('h'), &km);
        assert_eq!(panel.handle_key(&ctrl('d'), &km), None);
        assert_eq!(panel.entries.len(), 3);
    }

    #[test]
    fn delete_last_entry_clears_highlight() {
        let km = KeyMap::default();
        let mut panel = PromptPanel::new(vec![HistoryEntry::new("p", "c")]);
        assert!(panel.handle_key(&ctrl('d'), &km).is_some());
        assert!(panel.list_state.selected().is_none());
        // With nothing highlighted the panel resolves to the (empty) input.
        assert_eq!(panel.selected().command, "");
    }

    #[test]
    fn cursor_editing_is_char_based() {
        let km = KeyMap::default();
        let mut panel = PromptPanel::new(Vec::new());
        type_text(&mut panel, &km, "héllo");
        panel.handle_key(&key(KeyCode::Home), &km);
        panel.handle_key(&key(KeyCode::Delete), &km);
        assert_eq!(panel.input, "éllo");
        panel.handle_key(&key(KeyCode::End), &km);
        panel.handle_key(&key(KeyCode::Backspace), &km);
        assert_eq!(panel.input, "éll");
    }

    #[test]
    fn placeholder_tracks_history_visibility() {
        let km = KeyMap::default();
        let mut panel = PromptPanel::new(sample_entries());
        assert_eq!(panel.placeholder(), "Search history or type a new prompt");
        panel.handle_key(&ctrl('h'), &km);
        assert_eq!(panel.placeholder(), "Type a prompt");

        let empty = PromptPanel::new(Vec::new());
        assert_eq!(empty.placeholder(), "Type a prompt");
    }
}
