//! Key bindings and the help footer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// One action bound to one or more key chords, with its help label.
pub struct Binding {
    keys: Vec<(KeyModifiers, KeyCode)>,
    pub help_keys: &'static str,
    pub help_desc: &'static str,
}

impl Binding {
    fn new(
        keys: &[(KeyModifiers, KeyCode)],
        help_keys: &'static str,
        help_desc: &'static str,
    ) -> Self {
        Self {
            keys: keys.to_vec(),
            help_keys,
            help_desc,
        }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.keys
            .iter()
            .any(|(modifiers, code)| key.modifiers == *modifiers && key.code == *code)
    }
}

pub struct KeyMap {
    pub submit: Binding,
    pub cancel: Binding,
    pub up: Binding,
    pub down: Binding,
    pub toggle_history: Binding,
    pub delete_entry: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            submit: Binding::new(&[(KeyModifiers::NONE, KeyCode::Enter)], "enter", "confirm"),
            cancel: Binding::new(
                &[
                    (KeyModifiers::NONE, KeyCode::Esc),
                    (KeyModifiers::CONTROL, KeyCode::Char('c')),
                ],
                "esc",
                "cancel",
            ),
            up: Binding::new(
                &[
                    (KeyModifiers::NONE, KeyCode::Up),
                    (KeyModifiers::CONTROL, KeyCode::Char('k')),
                ],
                "↑/ctrl+k",
                "up",
            ),
            down: Binding::new(
                &[
                    (KeyModifiers::NONE, KeyCode::Down),
                    (KeyModifiers::CONTROL, KeyCode::Char('j')),
                ],
                "↓/ctrl+j",
                "down",
            ),
            toggle_history: Binding::new(
                &[(KeyModifiers::CONTROL, KeyCode::Char('h'))],
                "ctrl+h",
                "toggle history",
            ),
            delete_entry: Binding::new(
                &[(KeyModifiers::CONTROL, KeyCode::Char('d'))],
                "ctrl+d",
                "delete entry",
            ),
        }
    }
}

/// One-line help footer for the given bindings.
pub fn help_line(bindings: &[&Binding]) -> Line<'static> {
    let key_style = Style::default().fg(Color::DarkGray);
    let desc_style = Style::default().fg(Color::Gray);
    let mut spans = Vec::new();
    for (i, binding) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", key_style));
        }
        spans.push(Span::styled(binding.help_keys, desc_style));
        spans.push(Span::styled(format!(" {}", binding.help_desc), key_style));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_matches_both_chords() {
        let km = KeyMap::default();
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(km.cancel.matches(&esc));
        assert!(km.cancel.matches(&ctrl_c));
        assert!(!km.cancel.matches(&plain_c));
    }
}
