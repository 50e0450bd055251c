//! Selection panel: pick one of several generated candidates.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use super::keymap::{Binding, KeyMap};

#[derive(Default)]
pub struct SelectPanel {
    items: Vec<String>,
    list_state: ListState,
}

impl SelectPanel {
    /// Replace the candidate list. Order is the gateway's order; no
    /// re-sorting happens here.
    pub fn set_items(&mut self, items: Vec<String>) {
        self.list_state
            .select(if items.is_empty() { None } else { Some(0) });
        self.items = items;
    }

    pub fn handle_key(&mut self, key: &KeyEvent, km: &KeyMap) {
        if km.up.matches(key) {
            self.select_prev();
        } else if km.down.matches(key) {
            self.select_next();
        }
    }

    /// The highlighted candidate, or the empty string when the list is empty
    /// or nothing is highlighted. Callers treat that as "no command
    /// selected".
    pub fn selected(&self) -> String {
        self.list_state
            .selected()
            .and_then(|i| self.items.get(i))
            .cloned()
            .unwrap_or_default()
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
            && i + 1 < self.items.len()
        {
            self.list_state.select(Some(i + 1));
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(1)])
            .split(area);

        frame.render_widget(Paragraph::new("\nSelect completion"), chunks[0]);

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| ListItem::new(item.as_str()))
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().fg(Color::Indexed(170)))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }

    pub fn short_help<'a>(&self, km: &'a KeyMap) -> Vec<&'a Binding> {
        vec![&km.up, &km.down, &km.submit, &km.cancel]
    }
}
