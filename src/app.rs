//! Runtime shell around the session state machine.
//!
//! Owns the terminal, the event channels, and the controller. Each loop
//! iteration feeds exactly one message to [`Session::update`], executes the
//! effects it returns, and redraws. The generation call is the only
//! network-bound operation; it runs on a spawned task and reports back
//! through the message channel, so the loop keeps servicing input (Cancel in
//! particular) while it is outstanding.

use std::sync::Arc;
use std::time::Duration;

use ratatui::DefaultTerminal;
use tokio::sync::mpsc::{Receiver, UnboundedReceiver, UnboundedSender};

use crate::ctrl::Controller;
use crate::event::{self, UserEvent};
use crate::ui::{Effect, Msg, Session, SessionError};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

pub struct App {
    controller: Arc<dyn Controller>,
    session: Session,
    msg_tx: UnboundedSender<Msg>,
    msg_rx: UnboundedReceiver<Msg>,
    user_events: Receiver<std::io::Result<UserEvent>>,
}

impl App {
    pub fn new(controller: Arc<dyn Controller>) -> Self {
        let (msg_tx, msg_rx) = event::init_session_messages();
        let session = Session::new(controller.load_history());
        Self {
            controller,
            session,
            msg_tx,
            msg_rx,
            user_events: event::init_user_events(),
        }
    }

    /// Drive the session to a terminal outcome. Returns the selected
    /// command, which may be empty when the user submitted nothing.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> Result<String, SessionError> {
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        self.draw(terminal)?;
        loop {
            if self.session.is_done() {
                break;
            }
            let msg = tokio::select! {
                res = self.user_events.recv() => match res {
                    Some(Ok(UserEvent::Key(key))) => Msg::Key(key),
                    // Resize and the like: redraw on the next tick.
                    Some(Ok(_)) => Msg::Tick,
                    Some(Err(err)) => {
                        self.session.fail(SessionError::Ui(err.to_string()));
                        continue;
                    }
                    None => {
                        self.session.fail(SessionError::Ui("input stream ended".to_string()));
                        continue;
                    }
                },
                Some(msg) = self.msg_rx.recv() => msg,
                _ = ticker.tick() => Msg::Tick,
            };
            let effects = self.session.update(msg);
            self.run_effects(effects);
            self.draw(terminal)?;
        }
        self.session.into_outcome()
    }

    fn draw(&mut self, terminal: &mut DefaultTerminal) -> Result<(), SessionError> {
        terminal
            .draw(|frame| self.session.render(frame))
            .map_err(|err| SessionError::Ui(err.to_string()))?;
        Ok(())
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Generate(prompt) => self.spawn_generate(prompt),
                // The append accompanies the transition into the terminal
                // state; running it here keeps it before process exit. A
                // failure replaces the success outcome.
                Effect::Append(entry) => {
                    if let Err(err) = self.controller.append_history(&entry) {
                        tracing::error!("appending history entry: {err:#}");
                        self.session.fail(SessionError::History(format!("{err:#}")));
                    }
                }
                Effect::Delete(entry) => self.spawn_delete(entry),
            }
        }
    }

    fn spawn_generate(&self, prompt: String) {
        let controller = Arc::clone(&self.controller);
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let msg = match controller.generate(&prompt).await {
                Ok(commands) => Msg::Generated { prompt, commands },
                Err(err) => Msg::GenerateFailed(format!("{err:#}")),
            };
            // A closed channel means the session terminated while the call
            // was in flight; nobody is interested in the result anymore.
            tx.send(msg).ok();
        });
    }

    fn spawn_delete(&self, entry: crate::ctrl::HistoryEntry) {
        let controller = Arc::clone(&self.controller);
        let tx = self.msg_tx.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(err) = controller.delete_history(&entry) {
                tracing::error!("deleting history entry: {err:#}");
                tx.send(Msg::DeleteFailed(format!("{err:#}"))).ok();
            }
        });
    }
}
