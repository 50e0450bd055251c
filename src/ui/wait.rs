//! Wait panel: the spinner shown while a generation call is outstanding.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::keymap::{Binding, KeyMap};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Default)]
pub struct WaitPanel {
    frame: usize,
}

impl WaitPanel {
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let spinner = Span::styled(
            FRAMES[self.frame],
            Style::default().fg(Color::Indexed(205)),
        );
        let line = Line::from(vec![spinner, Span::raw(" Generating commands...")]);
        frame.render_widget(Paragraph::new(vec![Line::default(), line]), area);
    }

    /// Cancel is the only meaningful input while waiting.
    pub fn short_help<'a>(&self, km: &'a KeyMap) -> Vec<&'a Binding> {
        vec![&km.cancel]
    }
}
