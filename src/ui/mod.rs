//! The interactive session: an explicit state machine driven by messages.
//!
//! [`Session::update`] is the whole of the transition logic: it consumes one
//! message, mutates the session, and returns the side effects the runtime
//! shell must execute (launching generation, history writes). No I/O happens
//! in here, which keeps every transition testable without a terminal.

pub mod keymap;
pub mod prompt;
pub mod select;
pub mod wait;

use crossterm::event::{KeyEvent, KeyEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use thiserror::Error;

use crate::ctrl::HistoryEntry;
use keymap::KeyMap;
use prompt::PromptPanel;
use select::SelectPanel;
use wait::WaitPanel;

/// Terminal session outcomes that are not a selected command.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The user backed out. Not an application error: callers exit without
    /// printing anything.
    #[error("user cancelled")]
    Cancelled,
    #[error("no commands generated")]
    NoCommands,
    #[error("no command selected")]
    NoSelection,
    #[error("generating commands: {0}")]
    Generation(String),
    #[error("updating history: {0}")]
    History(String),
    #[error("running UI: {0}")]
    Ui(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Prompting,
    Generating,
    Selecting,
    Done,
}

/// Messages driving the session. Key input and spinner ticks come from the
/// event loop; the rest are effect results delivered back asynchronously.
#[derive(Debug)]
pub enum Msg {
    Key(KeyEvent),
    Tick,
    Generated {
        prompt: String,
        commands: Vec<String>,
    },
    GenerateFailed(String),
    DeleteFailed(String),
}

/// Side effects requested by a transition, executed by the runtime shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Launch an asynchronous generation call for this prompt.
    Generate(String),
    /// Record an accepted pair in the history store.
    Append(HistoryEntry),
    /// Remove a pair from the history store (the visible list was already
    /// updated optimistically).
    Delete(HistoryEntry),
}

pub struct Session {
    keymap: KeyMap,
    state: State,
    prompt_panel: PromptPanel,
    wait: WaitPanel,
    select: SelectPanel,
    /// The prompt text a generation call was launched with.
    prompt_text: String,
    selected: String,
    error: Option<SessionError>,
}

impl Session {
    pub fn new(history: Vec<HistoryEntry>) -> Self {
        Self {
            keymap: KeyMap::default(),
            state: State::Prompting,
            prompt_panel: PromptPanel::new(history),
            wait: WaitPanel::default(),
            select: SelectPanel::default(),
            prompt_text: String::new(),
            selected: String::new(),
            error: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// The final outcome once the session is done: the selected command
    /// (possibly empty when nothing was submitted) or the terminal error.
    pub fn into_outcome(self) -> Result<String, SessionError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.selected),
        }
    }

    /// Apply one message and return the effects to execute.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        if self.state == State::Done {
            return Vec::new();
        }
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Tick => {
                if self.state == State::Generating {
                    self.wait.tick();
                }
                Vec::new()
            }
            Msg::Generated { prompt, commands } => self.handle_completion(prompt, commands),
            Msg::GenerateFailed(err) => {
                self.fail(SessionError::Generation(err));
                Vec::new()
            }
            Msg::DeleteFailed(err) => {
                self.fail(SessionError::History(err));
                Vec::new()
            }
        }
    }

    /// Terminate the session with an error. Cancellation goes through here
    /// too; it is an outcome, not an application error.
    pub fn fail(&mut self, err: SessionError) {
        self.error = Some(err);
        self.selected.clear();
        self.state = State::Done;
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if !matches!(key.kind, KeyEventKind::Press) {
            return Vec::new();
        }
        if self.keymap.cancel.matches(&key) {
            self.fail(SessionError::Cancelled);
            return Vec::new();
        }
        if self.keymap.submit.matches(&key) {
            return self.handle_submit();
        }
        match self.state {
            State::Prompting => {
                if let Some(entry) = self.prompt_panel.handle_key(&key, &self.keymap) {
                    return vec![Effect::Delete(entry)];
                }
            }
            State::Selecting => self.select.handle_key(&key, &self.keymap),
            State::Generating | State::Done => {}
        }
        Vec::new()
    }

    fn handle_submit(&mut self) -> Vec<Effect> {
        match self.state {
            State::Prompting => {
                let selected = self.prompt_panel.selected();
                if selected.is_new() {
                    self.prompt_text = selected.prompt.clone();
                    self.state = State::Generating;
                    return vec![Effect::Generate(selected.prompt)];
                }
                // Reusing an existing pair: it is already in the history, so
                // there is nothing to append.
                self.selected = selected.command;
                self.state = State::Done;
                Vec::new()
            }
            State::Selecting => {
                let command = self.select.selected();
                self.finish_with(command)
            }
            State::Generating | State::Done => Vec::new(),
        }
    }

    fn handle_completion(&mut self, prompt: String, commands: Vec<String>) -> Vec<Effect> {
        if self.state != State::Generating {
            return Vec::new();
        }
        self.prompt_text = prompt;
        if commands.is_empty() {
            self.fail(SessionError::NoCommands);
            return Vec::new();
        }
        if commands.len() > 1 {
            self.select.set_items(commands);
            self.state = State::Selecting;
            return Vec::new();
        }
        let only = commands.into_iter().next().unwrap_or_default();
        self.finish_with(only)
    }

    fn finish_with(&mut self, command: String) -> Vec<Effect> {
        if command.is_empty() {
            self.fail(SessionError::NoSelection);
            return Vec::new();
        }
        self.selected = command.clone();
        self.state = State::Done;
        vec![Effect::Append(HistoryEntry::new(
            self.prompt_text.clone(),
            command,
        ))]
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(2),
            ])
            .split(frame.area());

        let title = Line::from(Span::styled(
            " cmdgen ",
            Style::default()
                .bg(Color::Indexed(62))
                .fg(Color::Indexed(230)),
        ));
        frame.render_widget(Paragraph::new(title), chunks[0]);

        match self.state {
            State::Prompting => self.prompt_panel.render(frame, chunks[1]),
            State::Generating => self.wait.render(frame, chunks[1]),
            State::Selecting => self.select.render(frame, chunks[1]),
            State::Done => {}
        }

        let bindings = match self.state {
            State::Prompting => self.prompt_panel.short_help(&self.keymap),
            State::Generating => self.wait.short_help(&self.keymap),
            State::Selecting => self.select.short_help(&self.keymap),
            State::Done => vec![&self.keymap.cancel],
        };
        frame.render_widget(Paragraph::new(keymap::help_line(&bindings)), chunks[2]);
    }
}
